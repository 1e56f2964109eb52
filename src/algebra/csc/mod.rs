#![allow(non_snake_case)]

mod core;
pub use self::core::*;

mod core;
pub use self::core::*;
mod assembly;
pub(crate) use assembly::*;
mod combine;
pub use combine::{BlockMap, CombineMap};
mod structure;
pub use structure::Matching;

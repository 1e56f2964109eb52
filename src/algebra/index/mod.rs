mod slice;
pub use slice::*;
#[allow(clippy::module_inception)]
mod index;
pub use index::*;

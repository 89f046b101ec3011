mod allocator;
mod backend;
mod call;
mod codegen;
mod expr;
mod listing;
mod recorder;
mod structure;

pub use allocator::*;
pub use backend::*;
pub use call::*;
pub use codegen::*;
pub use expr::*;
pub use recorder::*;
pub use structure::*;

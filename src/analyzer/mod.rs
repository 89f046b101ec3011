mod resolver;
mod symbol_table;

pub use resolver::*;
pub use symbol_table::*;

mod lexer;
mod preprocess;
mod token;

pub use lexer::*;
pub use preprocess::*;
pub use token::*;

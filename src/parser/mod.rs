pub mod parser;
pub mod scope;
pub mod types;

pub use parser::*;
pub use types::*;

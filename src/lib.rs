pub mod api;
pub mod ast;
pub mod error;
pub mod lexer;
pub mod options;
pub mod parser;

pub use api::{parse, parse_with_options};
pub use ast::*;
pub use error::*;
pub use lexer::{CancelHandle, LexItem, Lexer, NoteToken};
pub use options::ParseOptions;
pub use parser::Parser;

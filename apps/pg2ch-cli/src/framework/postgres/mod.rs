//! PostgreSQL side of the translator: tokenizer, `CREATE TABLE` parser and
//! the table model they produce.

pub mod errors;
pub mod lexer;
pub mod model;
pub mod parser;

pub use errors::{LexError, LexErrorKind, ParseError, Position};
pub use model::{BaseType, Column, DataType, Table};
pub use parser::parse_ddl;

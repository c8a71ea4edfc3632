pub mod command;
pub mod error;
pub mod field;
pub mod io;
pub mod parser;
pub mod roster;
pub mod storage;
pub mod student;
pub mod tokenizer;

pub use error::{Result, TeachStackError};

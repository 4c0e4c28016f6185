#![doc = include_str!("../README.md")]

pub mod errors;
pub mod parser;

pub use errors::ScriptError;
pub use parser::parse;

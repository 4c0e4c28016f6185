#![doc = include_str!("../README.md")]

pub mod errors;
pub mod parser;
pub mod serialize;

pub use errors::{Btor2Error, Btor2Reason};
pub use parser::parse;
pub use serialize::serialize;

#![doc = include_str!("../README.md")]

pub mod expr;
pub mod model;
pub mod sorts;
pub mod stimulus;

#![doc = include_str!("../README.md")]

pub mod binding;
pub mod bmc;
pub mod cursor;
pub mod encode;
pub mod trace;

pub use binding::{bind, BindingError, BoundStimulus};
pub use bmc::{run_bmc, BmcOptions, CancelFlag, RunOutcome};
pub use trace::Trace;

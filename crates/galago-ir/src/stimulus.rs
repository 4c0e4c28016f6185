//! Parsed stimulus/property script.

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use num::BigUint;

/// Comparison operator of a scripted property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for PropOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PropOp::Eq => "==",
            PropOp::Ne => "!=",
            PropOp::Lt => "<",
            PropOp::Le => "<=",
            PropOp::Gt => ">",
            PropOp::Ge => ">=",
        };
        f.write_str(s)
    }
}

/// The `[PROPERTY]` predicate: a leaf comparison against a literal, or
/// the always-true predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropSpec {
    True,
    Compare {
        signal: String,
        op: PropOp,
        literal: BigUint,
    },
}

impl fmt::Display for PropSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropSpec::True => f.write_str("true"),
            PropSpec::Compare { signal, op, literal } => {
                write!(f, "{signal} {op} {literal}")
            }
        }
    }
}

/// A contiguous range of steps during which the drive map is constant.
///
/// Drive maps are cumulative: each segment carries the full set of
/// assignments in effect, not just the ones introduced by its own lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub drives: IndexMap<String, BigUint>,
    pub hold: u32,
}

#[derive(Debug, Clone, Default)]
pub struct StimulusIR {
    /// Clock name -> period in unroll steps; at step k the clock value is
    /// `(k / period) mod 2`.
    pub clocks: IndexMap<String, u32>,
    /// Absent when the script has no `[PROPERTY]` section; the engine
    /// then falls back to the model's `bad` sinks.
    pub property: Option<PropSpec>,
    pub segments: Vec<Segment>,
    /// Signals whose scripted comparisons are signed.
    pub signed_signals: BTreeSet<String>,
}

use std::fmt;

use num::BigUint;

use crate::sorts::SmtSort;
use crate::terms::SmtTerm;

/// Result of a satisfiability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatResult {
    Sat,
    Unsat,
    Unknown(String),
}

/// Sparse model value of an array: explicitly stored entries plus an
/// optional default for every other index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayValue {
    pub entries: Vec<(BigUint, BigUint)>,
    pub default: Option<BigUint>,
}

/// A concrete value extracted from a satisfying assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValue {
    Bits { value: BigUint, width: u32 },
    Bool(bool),
    Array(ArrayValue),
}

impl fmt::Display for ModelValue {
    /// Trace rendering: `<decimal>_<width>` for vectors, `true`/`false`
    /// for booleans, `{idx: v, ..., default: d}` for arrays.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelValue::Bits { value, width } => write!(f, "{value}_{width}"),
            ModelValue::Bool(b) => write!(f, "{b}"),
            ModelValue::Array(a) => {
                write!(f, "{{")?;
                let mut first = true;
                for (idx, val) in &a.entries {
                    if !first {
                        write!(f, ", ")?;
                    }
                    first = false;
                    write!(f, "{idx}: {val}")?;
                }
                if let Some(default) = &a.default {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "default: {default}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Abstract SMT solver capability interface.
///
/// This is the only surface the BMC engine sees; naming a concrete
/// solver happens exclusively in the backend implementations.
pub trait SmtSolver {
    type Error: std::error::Error;

    /// Declare a fresh constant of the given sort.
    fn declare_const(&mut self, name: &str, sort: &SmtSort) -> Result<(), Self::Error>;

    /// Assert a Bool-typed formula.
    fn assert(&mut self, term: &SmtTerm) -> Result<(), Self::Error>;

    /// Push one assertion scope.
    fn push(&mut self) -> Result<(), Self::Error>;

    /// Pop one assertion scope.
    fn pop(&mut self) -> Result<(), Self::Error>;

    /// Check satisfiability of the current assertion stack.
    fn check_sat(&mut self) -> Result<SatResult, Self::Error>;

    /// Query the value of a term under the current satisfying
    /// assignment. Only meaningful directly after a `Sat` result.
    fn get_value(&mut self, term: &SmtTerm, sort: &SmtSort) -> Result<ModelValue, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_render_with_width_suffix() {
        let v = ModelValue::Bits {
            value: BigUint::from(2u32),
            width: 4,
        };
        assert_eq!(v.to_string(), "2_4");
    }

    #[test]
    fn bools_render_bare() {
        assert_eq!(ModelValue::Bool(true).to_string(), "true");
        assert_eq!(ModelValue::Bool(false).to_string(), "false");
    }

    #[test]
    fn arrays_render_sparse() {
        let v = ModelValue::Array(ArrayValue {
            entries: vec![
                (BigUint::from(0u32), BigUint::from(7u32)),
                (BigUint::from(3u32), BigUint::from(1u32)),
            ],
            default: Some(BigUint::from(0u32)),
        });
        assert_eq!(v.to_string(), "{0: 7, 3: 1, default: 0}");
    }

    #[test]
    fn array_without_entries_renders_default_only() {
        let v = ModelValue::Array(ArrayValue {
            entries: vec![],
            default: Some(BigUint::from(5u32)),
        });
        assert_eq!(v.to_string(), "{default: 5}");
    }
}

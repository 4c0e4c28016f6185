use num::BigUint;

use crate::sorts::SmtSort;

/// Abstract SMT term representation, solver-agnostic.
///
/// Boolean connectives are `Bool`-typed; `Bv*` operations are
/// bit-vector-typed and the comparison family (`BvUlt`, ...) crosses from
/// vectors back to `Bool`, matching SMT-LIB typing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmtTerm {
    /// Variable reference by name.
    Var(String),
    /// Bit-vector literal of a fixed width.
    BvLit { value: BigUint, width: u32 },
    /// Boolean literal.
    BoolLit(bool),

    // Boolean logic
    Not(Box<SmtTerm>),
    And(Vec<SmtTerm>),
    Or(Vec<SmtTerm>),
    Xor(Box<SmtTerm>, Box<SmtTerm>),
    Implies(Box<SmtTerm>, Box<SmtTerm>),
    Eq(Box<SmtTerm>, Box<SmtTerm>),
    Ite(Box<SmtTerm>, Box<SmtTerm>, Box<SmtTerm>),

    // Bit-vector arithmetic
    BvAdd(Box<SmtTerm>, Box<SmtTerm>),
    BvSub(Box<SmtTerm>, Box<SmtTerm>),
    BvMul(Box<SmtTerm>, Box<SmtTerm>),
    BvUdiv(Box<SmtTerm>, Box<SmtTerm>),
    BvSdiv(Box<SmtTerm>, Box<SmtTerm>),
    BvUrem(Box<SmtTerm>, Box<SmtTerm>),
    BvSrem(Box<SmtTerm>, Box<SmtTerm>),
    BvSmod(Box<SmtTerm>, Box<SmtTerm>),

    // Bit-vector bitwise and shifts
    BvNot(Box<SmtTerm>),
    BvNeg(Box<SmtTerm>),
    BvAnd(Box<SmtTerm>, Box<SmtTerm>),
    BvOr(Box<SmtTerm>, Box<SmtTerm>),
    BvXor(Box<SmtTerm>, Box<SmtTerm>),
    BvShl(Box<SmtTerm>, Box<SmtTerm>),
    BvLshr(Box<SmtTerm>, Box<SmtTerm>),
    BvAshr(Box<SmtTerm>, Box<SmtTerm>),

    // Bit-vector comparisons (Bool-typed)
    BvUlt(Box<SmtTerm>, Box<SmtTerm>),
    BvUle(Box<SmtTerm>, Box<SmtTerm>),
    BvUgt(Box<SmtTerm>, Box<SmtTerm>),
    BvUge(Box<SmtTerm>, Box<SmtTerm>),
    BvSlt(Box<SmtTerm>, Box<SmtTerm>),
    BvSle(Box<SmtTerm>, Box<SmtTerm>),
    BvSgt(Box<SmtTerm>, Box<SmtTerm>),
    BvSge(Box<SmtTerm>, Box<SmtTerm>),

    // Structural
    BvConcat(Box<SmtTerm>, Box<SmtTerm>),
    BvExtract { hi: u32, lo: u32, value: Box<SmtTerm> },
    BvZext { by: u32, value: Box<SmtTerm> },
    BvSext { by: u32, value: Box<SmtTerm> },

    // Arrays
    Select(Box<SmtTerm>, Box<SmtTerm>),
    Store(Box<SmtTerm>, Box<SmtTerm>, Box<SmtTerm>),
    /// Constant array, printed as `((as const <sort>) value)`.
    ConstArray { sort: SmtSort, value: Box<SmtTerm> },
}

#[allow(clippy::should_implement_trait)]
impl SmtTerm {
    pub fn var(name: impl Into<String>) -> Self {
        SmtTerm::Var(name.into())
    }

    pub fn bv(value: BigUint, width: u32) -> Self {
        SmtTerm::BvLit { value, width }
    }

    pub fn bv_u64(value: u64, width: u32) -> Self {
        SmtTerm::BvLit {
            value: BigUint::from(value),
            width,
        }
    }

    pub fn bool(b: bool) -> Self {
        SmtTerm::BoolLit(b)
    }

    pub fn not(self) -> Self {
        SmtTerm::Not(Box::new(self))
    }

    pub fn and(terms: Vec<SmtTerm>) -> Self {
        SmtTerm::And(terms)
    }

    pub fn or(terms: Vec<SmtTerm>) -> Self {
        SmtTerm::Or(terms)
    }

    pub fn implies(self, other: SmtTerm) -> Self {
        SmtTerm::Implies(Box::new(self), Box::new(other))
    }

    pub fn eq(self, other: SmtTerm) -> Self {
        SmtTerm::Eq(Box::new(self), Box::new(other))
    }

    pub fn ite(cond: SmtTerm, then_term: SmtTerm, else_term: SmtTerm) -> Self {
        SmtTerm::Ite(Box::new(cond), Box::new(then_term), Box::new(else_term))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_and_variable_builders() {
        assert_eq!(SmtTerm::var("x"), SmtTerm::Var("x".to_string()));
        assert_eq!(SmtTerm::bool(true), SmtTerm::BoolLit(true));
        assert_eq!(
            SmtTerm::bv_u64(5, 4),
            SmtTerm::BvLit {
                value: BigUint::from(5u32),
                width: 4
            }
        );
    }

    #[test]
    fn eq_preserves_operand_order() {
        let a = SmtTerm::var("a");
        let b = SmtTerm::var("b");
        assert_eq!(
            a.clone().eq(b.clone()),
            SmtTerm::Eq(Box::new(SmtTerm::var("a")), Box::new(SmtTerm::var("b")))
        );
        assert_ne!(a.clone().eq(b.clone()), b.eq(a));
    }

    #[test]
    fn connective_builders_create_expected_shapes() {
        let a = SmtTerm::var("a");
        let b = SmtTerm::var("b");
        assert!(matches!(a.clone().not(), SmtTerm::Not(_)));
        assert!(matches!(
            SmtTerm::and(vec![a.clone(), b.clone()]),
            SmtTerm::And(v) if v.len() == 2
        ));
        assert!(matches!(a.implies(b), SmtTerm::Implies(_, _)));
    }

    #[test]
    fn ite_preserves_all_three_branches() {
        let ite = SmtTerm::ite(
            SmtTerm::var("c"),
            SmtTerm::bv_u64(1, 4),
            SmtTerm::bv_u64(0, 4),
        );
        match ite {
            SmtTerm::Ite(c, t, e) => {
                assert_eq!(*c, SmtTerm::var("c"));
                assert_eq!(*t, SmtTerm::bv_u64(1, 4));
                assert_eq!(*e, SmtTerm::bv_u64(0, 4));
            }
            other => panic!("expected Ite, got {other:?}"),
        }
    }
}

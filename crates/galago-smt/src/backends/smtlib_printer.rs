use num::BigUint;

use crate::sorts::SmtSort;
use crate::terms::SmtTerm;

/// Print a bit-vector literal as a `#b` binary literal of its width.
pub fn bv_lit_to_smtlib(value: &BigUint, width: u32) -> String {
    let bits = value.to_str_radix(2);
    let width = width as usize;
    if bits.len() >= width {
        format!("#b{bits}")
    } else {
        format!("#b{}{bits}", "0".repeat(width - bits.len()))
    }
}

fn binary(op: &str, lhs: &SmtTerm, rhs: &SmtTerm) -> String {
    format!("({op} {} {})", to_smtlib(lhs), to_smtlib(rhs))
}

/// Print an `SmtTerm` in SMT-LIB2 format.
pub fn to_smtlib(term: &SmtTerm) -> String {
    match term {
        SmtTerm::Var(name) => name.clone(),
        SmtTerm::BvLit { value, width } => bv_lit_to_smtlib(value, *width),
        SmtTerm::BoolLit(b) => b.to_string(),

        SmtTerm::Not(inner) => format!("(not {})", to_smtlib(inner)),
        SmtTerm::And(terms) => {
            if terms.is_empty() {
                "true".to_string()
            } else if terms.len() == 1 {
                to_smtlib(&terms[0])
            } else {
                let inner: Vec<String> = terms.iter().map(to_smtlib).collect();
                format!("(and {})", inner.join(" "))
            }
        }
        SmtTerm::Or(terms) => {
            if terms.is_empty() {
                "false".to_string()
            } else if terms.len() == 1 {
                to_smtlib(&terms[0])
            } else {
                let inner: Vec<String> = terms.iter().map(to_smtlib).collect();
                format!("(or {})", inner.join(" "))
            }
        }
        SmtTerm::Xor(lhs, rhs) => binary("xor", lhs, rhs),
        SmtTerm::Implies(lhs, rhs) => binary("=>", lhs, rhs),
        SmtTerm::Eq(lhs, rhs) => binary("=", lhs, rhs),
        SmtTerm::Ite(cond, then_term, else_term) => format!(
            "(ite {} {} {})",
            to_smtlib(cond),
            to_smtlib(then_term),
            to_smtlib(else_term)
        ),

        SmtTerm::BvAdd(lhs, rhs) => binary("bvadd", lhs, rhs),
        SmtTerm::BvSub(lhs, rhs) => binary("bvsub", lhs, rhs),
        SmtTerm::BvMul(lhs, rhs) => binary("bvmul", lhs, rhs),
        SmtTerm::BvUdiv(lhs, rhs) => binary("bvudiv", lhs, rhs),
        SmtTerm::BvSdiv(lhs, rhs) => binary("bvsdiv", lhs, rhs),
        SmtTerm::BvUrem(lhs, rhs) => binary("bvurem", lhs, rhs),
        SmtTerm::BvSrem(lhs, rhs) => binary("bvsrem", lhs, rhs),
        SmtTerm::BvSmod(lhs, rhs) => binary("bvsmod", lhs, rhs),

        SmtTerm::BvNot(inner) => format!("(bvnot {})", to_smtlib(inner)),
        SmtTerm::BvNeg(inner) => format!("(bvneg {})", to_smtlib(inner)),
        SmtTerm::BvAnd(lhs, rhs) => binary("bvand", lhs, rhs),
        SmtTerm::BvOr(lhs, rhs) => binary("bvor", lhs, rhs),
        SmtTerm::BvXor(lhs, rhs) => binary("bvxor", lhs, rhs),
        SmtTerm::BvShl(lhs, rhs) => binary("bvshl", lhs, rhs),
        SmtTerm::BvLshr(lhs, rhs) => binary("bvlshr", lhs, rhs),
        SmtTerm::BvAshr(lhs, rhs) => binary("bvashr", lhs, rhs),

        SmtTerm::BvUlt(lhs, rhs) => binary("bvult", lhs, rhs),
        SmtTerm::BvUle(lhs, rhs) => binary("bvule", lhs, rhs),
        SmtTerm::BvUgt(lhs, rhs) => binary("bvugt", lhs, rhs),
        SmtTerm::BvUge(lhs, rhs) => binary("bvuge", lhs, rhs),
        SmtTerm::BvSlt(lhs, rhs) => binary("bvslt", lhs, rhs),
        SmtTerm::BvSle(lhs, rhs) => binary("bvsle", lhs, rhs),
        SmtTerm::BvSgt(lhs, rhs) => binary("bvsgt", lhs, rhs),
        SmtTerm::BvSge(lhs, rhs) => binary("bvsge", lhs, rhs),

        SmtTerm::BvConcat(lhs, rhs) => binary("concat", lhs, rhs),
        SmtTerm::BvExtract { hi, lo, value } => {
            format!("((_ extract {hi} {lo}) {})", to_smtlib(value))
        }
        SmtTerm::BvZext { by, value } => {
            format!("((_ zero_extend {by}) {})", to_smtlib(value))
        }
        SmtTerm::BvSext { by, value } => {
            format!("((_ sign_extend {by}) {})", to_smtlib(value))
        }

        SmtTerm::Select(array, index) => binary("select", array, index),
        SmtTerm::Store(array, index, value) => format!(
            "(store {} {} {})",
            to_smtlib(array),
            to_smtlib(index),
            to_smtlib(value)
        ),
        SmtTerm::ConstArray { sort, value } => {
            format!("((as const {sort}) {})", to_smtlib(value))
        }
    }
}

/// Print a sort in SMT-LIB2 format.
pub fn sort_to_smtlib(sort: &SmtSort) -> String {
    sort.to_string()
}

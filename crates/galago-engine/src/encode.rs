//! Per-step symbolic frames and expression lowering.
//!
//! Frame `k` holds one fresh solver constant per state and input; the
//! lowerer is the substitution homomorphism that rebuilds a model
//! expression over those copies. Lookups go through the `(step, name)`
//! maps, never through name mangling at use sites.

use std::collections::HashMap;

use indexmap::IndexMap;
use num::BigUint;

use galago_ir::expr::{Expr, ExprRef, VarRole};
use galago_ir::model::ModelIR;
use galago_ir::sorts::Sort;
use galago_smt::sorts::SmtSort;
use galago_smt::terms::SmtTerm;

pub fn lower_sort(sort: &Sort) -> SmtSort {
    match sort {
        Sort::Bool => SmtSort::Bool,
        Sort::BitVec(w) => SmtSort::BitVec(*w),
        Sort::Array { index, element } => SmtSort::array(lower_sort(index), lower_sort(element)),
    }
}

/// A declared solver constant.
#[derive(Debug, Clone)]
pub struct SmtVar {
    pub name: String,
    pub sort: SmtSort,
}

impl SmtVar {
    pub fn term(&self) -> SmtTerm {
        SmtTerm::var(&self.name)
    }
}

/// Symbolic copies of every state and input at one unroll step.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub step: usize,
    pub state_syms: IndexMap<String, SmtVar>,
    pub input_syms: IndexMap<String, SmtVar>,
}

impl Frame {
    /// Fresh constants for step `k`, named `<signal>@<k>`.
    pub fn materialize(model: &ModelIR, step: usize) -> Frame {
        let mut frame = Frame {
            step,
            ..Frame::default()
        };
        for state in &model.states {
            frame.state_syms.insert(
                state.name.clone(),
                SmtVar {
                    name: format!("{}@{step}", state.name),
                    sort: lower_sort(&state.sort),
                },
            );
        }
        for input in &model.inputs {
            frame.input_syms.insert(
                input.name.clone(),
                SmtVar {
                    name: format!("{}@{step}", input.name),
                    sort: lower_sort(&input.sort),
                },
            );
        }
        frame
    }
}

/// Rebuilds model expressions over one frame's symbolic copies.
///
/// Shared sub-expressions are translated once per step via the memo
/// table, mirroring the structural sharing of the arena.
pub struct StepLowerer<'a> {
    model: &'a ModelIR,
    frame: &'a Frame,
    memo: HashMap<ExprRef, SmtTerm>,
}

impl<'a> StepLowerer<'a> {
    pub fn new(model: &'a ModelIR, frame: &'a Frame) -> Self {
        StepLowerer {
            model,
            frame,
            memo: HashMap::new(),
        }
    }

    fn var_term(&self, name: &str, role: VarRole) -> SmtTerm {
        let sym = match role {
            VarRole::State => self.frame.state_syms.get(name),
            VarRole::Input => self.frame.input_syms.get(name),
            VarRole::Aux => None,
        };
        match sym {
            Some(v) => v.term(),
            // Auxiliary symbols are not stepped.
            None => SmtTerm::var(name),
        }
    }

    /// Translate with the expression's natural SMT type: `Bool` for
    /// comparisons and connectives, bit-vector or array otherwise.
    pub fn term(&mut self, e: ExprRef) -> SmtTerm {
        if let Some(t) = self.memo.get(&e) {
            return t.clone();
        }
        let node = self.model.ctx[e].clone();
        let term = match node {
            Expr::BvConst { value, width } => SmtTerm::bv(value, width),
            Expr::BoolConst(b) => SmtTerm::bool(b),
            Expr::Var { name, role, .. } => self.var_term(&name, role),

            Expr::Not(a) => self.term(a).not(),
            Expr::And(a, b) => SmtTerm::and(vec![self.term(a), self.term(b)]),
            Expr::Or(a, b) => SmtTerm::or(vec![self.term(a), self.term(b)]),
            Expr::Xor(a, b) => SmtTerm::Xor(Box::new(self.term(a)), Box::new(self.term(b))),
            Expr::Implies(a, b) => self.term(a).implies(self.term(b)),
            Expr::Iff(a, b) => self.term(a).eq(self.term(b)),

            Expr::BvAdd(a, b) => SmtTerm::BvAdd(self.boxed(a), self.boxed(b)),
            Expr::BvSub(a, b) => SmtTerm::BvSub(self.boxed(a), self.boxed(b)),
            Expr::BvMul(a, b) => SmtTerm::BvMul(self.boxed(a), self.boxed(b)),
            Expr::BvUdiv(a, b) => SmtTerm::BvUdiv(self.boxed(a), self.boxed(b)),
            Expr::BvSdiv(a, b) => SmtTerm::BvSdiv(self.boxed(a), self.boxed(b)),
            Expr::BvUrem(a, b) => SmtTerm::BvUrem(self.boxed(a), self.boxed(b)),
            Expr::BvSrem(a, b) => SmtTerm::BvSrem(self.boxed(a), self.boxed(b)),
            Expr::BvSmod(a, b) => SmtTerm::BvSmod(self.boxed(a), self.boxed(b)),

            Expr::BvAnd(a, b) => SmtTerm::BvAnd(self.boxed(a), self.boxed(b)),
            Expr::BvOr(a, b) => SmtTerm::BvOr(self.boxed(a), self.boxed(b)),
            Expr::BvXor(a, b) => SmtTerm::BvXor(self.boxed(a), self.boxed(b)),
            Expr::BvNot(a) => SmtTerm::BvNot(self.boxed(a)),
            Expr::BvNeg(a) => SmtTerm::BvNeg(self.boxed(a)),

            Expr::BvShl(a, b) => SmtTerm::BvShl(self.boxed(a), self.boxed(b)),
            Expr::BvLshr(a, b) => SmtTerm::BvLshr(self.boxed(a), self.boxed(b)),
            Expr::BvAshr(a, b) => SmtTerm::BvAshr(self.boxed(a), self.boxed(b)),

            Expr::BvUlt(a, b) => SmtTerm::BvUlt(self.boxed(a), self.boxed(b)),
            Expr::BvUle(a, b) => SmtTerm::BvUle(self.boxed(a), self.boxed(b)),
            Expr::BvUgt(a, b) => SmtTerm::BvUgt(self.boxed(a), self.boxed(b)),
            Expr::BvUge(a, b) => SmtTerm::BvUge(self.boxed(a), self.boxed(b)),
            Expr::BvSlt(a, b) => SmtTerm::BvSlt(self.boxed(a), self.boxed(b)),
            Expr::BvSle(a, b) => SmtTerm::BvSle(self.boxed(a), self.boxed(b)),
            Expr::BvSgt(a, b) => SmtTerm::BvSgt(self.boxed(a), self.boxed(b)),
            Expr::BvSge(a, b) => SmtTerm::BvSge(self.boxed(a), self.boxed(b)),

            Expr::BvConcat(a, b) => SmtTerm::BvConcat(self.boxed(a), self.boxed(b)),
            Expr::BvExtract { hi, lo, value } => SmtTerm::BvExtract {
                hi,
                lo,
                value: self.boxed(value),
            },
            Expr::BvZext { by, value } => SmtTerm::BvZext {
                by,
                value: self.boxed(value),
            },
            Expr::BvSext { by, value } => SmtTerm::BvSext {
                by,
                value: self.boxed(value),
            },

            Expr::Eq(a, b) => self.term(a).eq(self.term(b)),
            Expr::Neq(a, b) => self.term(a).eq(self.term(b)).not(),
            Expr::Ite {
                cond,
                then_value,
                else_value,
            } => SmtTerm::ite(
                self.term(cond),
                self.term(then_value),
                self.term(else_value),
            ),

            Expr::ArrayRead { array, index } => {
                SmtTerm::Select(self.boxed(array), self.boxed(index))
            }
            Expr::ArrayWrite { array, index, value } => {
                SmtTerm::Store(self.boxed(array), self.boxed(index), self.boxed(value))
            }
            Expr::ArrayConst { ref index, value } => SmtTerm::ConstArray {
                sort: SmtSort::array(
                    lower_sort(index),
                    lower_sort(self.model.ctx.sort_of(value)),
                ),
                value: self.boxed(value),
            },
        };
        self.memo.insert(e, term.clone());
        term
    }

    fn boxed(&mut self, e: ExprRef) -> Box<SmtTerm> {
        Box::new(self.term(e))
    }

    /// `Bool`-typed view: 1-bit vectors become `t = #b1`.
    pub fn bool_term(&mut self, e: ExprRef) -> SmtTerm {
        let t = self.term(e);
        match self.model.ctx.sort_of(e) {
            Sort::Bool => t,
            _ => t.eq(SmtTerm::bv_u64(1, 1)),
        }
    }

    /// Vector-typed view: booleans become `ite(t, #b1, #b0)`.
    pub fn bv_term(&mut self, e: ExprRef) -> SmtTerm {
        let t = self.term(e);
        match self.model.ctx.sort_of(e) {
            Sort::Bool => SmtTerm::ite(t, SmtTerm::bv_u64(1, 1), SmtTerm::bv_u64(0, 1)),
            _ => t,
        }
    }
}

/// Clock level at step `k` for a toggle period `p`: `(k / p) mod 2`.
pub fn clock_level(step: usize, period: u32) -> u64 {
    ((step as u64) / u64::from(period)) % 2
}

/// The clock waveform assertion `c_k = (k/p) mod 2`.
pub fn clock_assertion(sym: &SmtVar, step: usize, period: u32) -> SmtTerm {
    let width = sym.sort.bitvec_width().unwrap_or(1);
    sym.term()
        .eq(SmtTerm::bv(BigUint::from(clock_level(step, period)), width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use galago_ir::expr::Context;
    use galago_ir::model::{InputVar, StateVar};
    use galago_smt::backends::smtlib_printer::to_smtlib;

    fn counter_model() -> ModelIR {
        let mut ctx = Context::new();
        let out = ctx.var("out", Sort::BitVec(4), VarRole::State);
        let rst_n = ctx.var("rst_n", Sort::BitVec(1), VarRole::Input);
        let one = ctx.bv_one(4).unwrap();
        let zero = ctx.bv_zero(4).unwrap();
        let bumped = ctx.bv_add(out, one).unwrap();
        let active = ctx.to_bool(rst_n).unwrap();
        let next = ctx.ite(active, bumped, zero).unwrap();
        ModelIR {
            states: vec![StateVar {
                name: "out".into(),
                sort: Sort::BitVec(4),
                var: out,
                init: Some(zero),
                next,
            }],
            inputs: vec![InputVar {
                name: "rst_n".into(),
                sort: Sort::BitVec(1),
                var: rst_n,
            }],
            ctx,
            ..Default::default()
        }
    }

    #[test]
    fn frame_names_are_stepped() {
        let m = counter_model();
        let f = Frame::materialize(&m, 3);
        assert_eq!(f.state_syms["out"].name, "out@3");
        assert_eq!(f.input_syms["rst_n"].name, "rst_n@3");
        assert_eq!(f.state_syms["out"].sort, SmtSort::BitVec(4));
    }

    #[test]
    fn lowering_substitutes_frame_symbols() {
        let m = counter_model();
        let f = Frame::materialize(&m, 0);
        let mut lowerer = StepLowerer::new(&m, &f);
        let next = lowerer.term(m.states[0].next);
        assert_eq!(
            to_smtlib(&next),
            "(ite (= rst_n@0 #b1) (bvadd out@0 #b0001) #b0000)"
        );
    }

    #[test]
    fn lowering_same_expr_twice_reuses_the_memo() {
        let m = counter_model();
        let f = Frame::materialize(&m, 1);
        let mut lowerer = StepLowerer::new(&m, &f);
        let a = lowerer.term(m.states[0].next);
        let b = lowerer.term(m.states[0].next);
        assert_eq!(a, b);
    }

    #[test]
    fn bool_and_bv_views_adapt_sorts() {
        let m = counter_model();
        let f = Frame::materialize(&m, 0);
        let rst = m.inputs[0].var;
        let mut lowerer = StepLowerer::new(&m, &f);
        assert_eq!(to_smtlib(&lowerer.bool_term(rst)), "(= rst_n@0 #b1)");
        assert_eq!(to_smtlib(&lowerer.bv_term(rst)), "rst_n@0");
    }

    #[test]
    fn clock_levels_follow_the_period() {
        let levels: Vec<u64> = (0..8).map(|k| clock_level(k, 1)).collect();
        assert_eq!(levels, vec![0, 1, 0, 1, 0, 1, 0, 1]);
        let levels: Vec<u64> = (0..8).map(|k| clock_level(k, 2)).collect();
        assert_eq!(levels, vec![0, 0, 1, 1, 0, 0, 1, 1]);
    }

    #[test]
    fn clock_assertion_prints_expected_equality() {
        let sym = SmtVar {
            name: "clk@5".into(),
            sort: SmtSort::BitVec(1),
        };
        assert_eq!(to_smtlib(&clock_assertion(&sym, 5, 1)), "(= clk@5 #b1)");
        assert_eq!(to_smtlib(&clock_assertion(&sym, 4, 1)), "(= clk@5 #b0)");
    }
}

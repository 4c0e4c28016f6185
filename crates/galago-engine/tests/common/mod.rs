#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io;

use num::BigUint;

use galago_smt::solver::{ArrayValue, ModelValue, SatResult, SmtSolver};
use galago_smt::sorts::SmtSort;
use galago_smt::terms::SmtTerm;

/// A 4-bit counter with synchronous reset-load and sampled-clock edge
/// detection, in the shape yosys' `clk2fflogic` flow emits.
pub const COUNTER_BTOR2: &str = "\
1 sort bitvec 1
2 sort bitvec 4
3 input 1 clk
4 input 1 rst_n
5 input 2 initval
6 state 1 last_clk
7 state 2 out
8 zero 1
9 zero 2
10 init 1 6 8
11 init 2 7 9
12 next 1 6 3
13 not 1 3
14 and 1 13 6
15 one 2
16 add 2 7 15
17 ite 2 14 16 7
18 eq 1 4 8
19 ite 2 18 5 17
20 next 2 7 19
21 output 7 count
";

pub const COUNTER_SCRIPT: &str = "\
[CLOCK]
clk = 1

[PROPERTY]
out == 2

[PROCESS]
initval = 0
rst_n = 0
#5
rst_n = 1
";

/// Everything the solver was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Declare(String, SmtSort),
    Assert(SmtTerm),
    Push,
    Pop,
    CheckSat,
}

/// Scripted in-memory solver for engine tests.
#[derive(Debug, Default)]
pub struct MockSolver {
    pub ops: Vec<Op>,
    pub results: VecDeque<SatResult>,
    pub values: HashMap<String, ModelValue>,
}

impl MockSolver {
    /// Answers `Unsat` to every query.
    pub fn unsat_forever() -> Self {
        Self::default()
    }

    /// Answers the given results in order, then `Unsat`.
    pub fn with_results(results: impl IntoIterator<Item = SatResult>) -> Self {
        MockSolver {
            results: results.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn asserted(&self) -> impl Iterator<Item = &SmtTerm> {
        self.ops.iter().filter_map(|op| match op {
            Op::Assert(t) => Some(t),
            _ => None,
        })
    }

    pub fn declared(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            Op::Declare(name, _) => Some(name.as_str()),
            _ => None,
        })
    }
}

fn default_value(sort: &SmtSort) -> ModelValue {
    match sort {
        SmtSort::Bool => ModelValue::Bool(false),
        SmtSort::BitVec(w) => ModelValue::Bits {
            value: BigUint::from(0u32),
            width: *w,
        },
        SmtSort::Array(..) => ModelValue::Array(ArrayValue {
            entries: Vec::new(),
            default: Some(BigUint::from(0u32)),
        }),
    }
}

impl SmtSolver for MockSolver {
    type Error = io::Error;

    fn declare_const(&mut self, name: &str, sort: &SmtSort) -> Result<(), io::Error> {
        self.ops.push(Op::Declare(name.to_string(), sort.clone()));
        Ok(())
    }

    fn assert(&mut self, term: &SmtTerm) -> Result<(), io::Error> {
        self.ops.push(Op::Assert(term.clone()));
        Ok(())
    }

    fn push(&mut self) -> Result<(), io::Error> {
        self.ops.push(Op::Push);
        Ok(())
    }

    fn pop(&mut self) -> Result<(), io::Error> {
        self.ops.push(Op::Pop);
        Ok(())
    }

    fn check_sat(&mut self) -> Result<SatResult, io::Error> {
        self.ops.push(Op::CheckSat);
        Ok(self.results.pop_front().unwrap_or(SatResult::Unsat))
    }

    fn get_value(&mut self, term: &SmtTerm, sort: &SmtSort) -> Result<ModelValue, io::Error> {
        if let SmtTerm::Var(name) = term {
            if let Some(v) = self.values.get(name) {
                return Ok(v.clone());
            }
        }
        Ok(default_value(sort))
    }
}

/// Collect every variable name occurring in a term.
pub fn var_names(term: &SmtTerm, out: &mut Vec<String>) {
    match term {
        SmtTerm::Var(name) => out.push(name.clone()),
        SmtTerm::BvLit { .. } | SmtTerm::BoolLit(_) => {}
        SmtTerm::Not(a) | SmtTerm::BvNot(a) | SmtTerm::BvNeg(a) => var_names(a, out),
        SmtTerm::And(items) | SmtTerm::Or(items) => {
            for item in items {
                var_names(item, out);
            }
        }
        SmtTerm::Xor(a, b)
        | SmtTerm::Implies(a, b)
        | SmtTerm::Eq(a, b)
        | SmtTerm::BvAdd(a, b)
        | SmtTerm::BvSub(a, b)
        | SmtTerm::BvMul(a, b)
        | SmtTerm::BvUdiv(a, b)
        | SmtTerm::BvSdiv(a, b)
        | SmtTerm::BvUrem(a, b)
        | SmtTerm::BvSrem(a, b)
        | SmtTerm::BvSmod(a, b)
        | SmtTerm::BvAnd(a, b)
        | SmtTerm::BvOr(a, b)
        | SmtTerm::BvXor(a, b)
        | SmtTerm::BvShl(a, b)
        | SmtTerm::BvLshr(a, b)
        | SmtTerm::BvAshr(a, b)
        | SmtTerm::BvUlt(a, b)
        | SmtTerm::BvUle(a, b)
        | SmtTerm::BvUgt(a, b)
        | SmtTerm::BvUge(a, b)
        | SmtTerm::BvSlt(a, b)
        | SmtTerm::BvSle(a, b)
        | SmtTerm::BvSgt(a, b)
        | SmtTerm::BvSge(a, b)
        | SmtTerm::BvConcat(a, b)
        | SmtTerm::Select(a, b) => {
            var_names(a, out);
            var_names(b, out);
        }
        SmtTerm::Ite(a, b, c) | SmtTerm::Store(a, b, c) => {
            var_names(a, out);
            var_names(b, out);
            var_names(c, out);
        }
        SmtTerm::BvExtract { value, .. }
        | SmtTerm::BvZext { value, .. }
        | SmtTerm::BvSext { value, .. }
        | SmtTerm::ConstArray { value, .. } => var_names(value, out),
    }
}

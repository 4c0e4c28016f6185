//! Canonical BTOR2 serializer.
//!
//! Emits a model back as BTOR2 text: inputs, then states, then the
//! init/next/sink lines, with expression nodes written in dependency
//! order. Serializing, reparsing and serializing again is a fixpoint,
//! which is what the round-trip tests pin down.

use std::collections::HashMap;
use std::fmt::Write;

use thiserror::Error;

use galago_ir::expr::{Expr, ExprRef};
use galago_ir::model::{LivenessKind, ModelIR};
use galago_ir::sorts::Sort;

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("constant arrays can only appear as state initializers")]
    ConstArrayPosition,
}

pub fn serialize(model: &ModelIR) -> Result<String, SerializeError> {
    let mut s = Serializer {
        model,
        out: String::new(),
        next_nid: 1,
        sort_nids: HashMap::new(),
        expr_nids: HashMap::new(),
    };
    s.run()?;
    Ok(s.out)
}

struct Serializer<'a> {
    model: &'a ModelIR,
    out: String,
    next_nid: u64,
    sort_nids: HashMap<Sort, u64>,
    expr_nids: HashMap<ExprRef, u64>,
}

impl Serializer<'_> {
    fn fresh(&mut self) -> u64 {
        let n = self.next_nid;
        self.next_nid += 1;
        n
    }

    fn line(&mut self, nid: u64, rest: std::fmt::Arguments<'_>) {
        let _ = writeln!(self.out, "{nid} {rest}");
    }

    /// Booleans have no BTOR2 sort; they serialize as 1-bit vectors.
    fn normalized_sort(&self, e: ExprRef) -> Sort {
        match self.model.ctx.sort_of(e) {
            Sort::Bool => Sort::BitVec(1),
            other => other.clone(),
        }
    }

    fn sort_nid(&mut self, sort: &Sort) -> u64 {
        if let Some(&n) = self.sort_nids.get(sort) {
            return n;
        }
        let n = match sort {
            Sort::Bool => return self.sort_nid(&Sort::BitVec(1)),
            Sort::BitVec(w) => {
                let w = *w;
                let n = self.fresh();
                self.line(n, format_args!("sort bitvec {w}"));
                n
            }
            Sort::Array { index, element } => {
                let i = self.sort_nid(index);
                let e = self.sort_nid(element);
                let n = self.fresh();
                self.line(n, format_args!("sort array {i} {e}"));
                n
            }
        };
        self.sort_nids.insert(sort.clone(), n);
        n
    }

    fn emit(&mut self, e: ExprRef) -> Result<u64, SerializeError> {
        if let Some(&n) = self.expr_nids.get(&e) {
            return Ok(n);
        }
        let sort = self.normalized_sort(e);
        let sid = self.sort_nid(&sort);
        let node = self.model.ctx[e].clone();
        let nid = match node {
            Expr::BvConst { value, .. } => {
                let n = self.fresh();
                self.line(n, format_args!("constd {sid} {value}"));
                n
            }
            Expr::BoolConst(b) => {
                let n = self.fresh();
                self.line(n, format_args!("constd {sid} {}", u8::from(b)));
                n
            }
            // Registered states and inputs are emitted up front; a leaf
            // reached only here is an auxiliary symbol.
            Expr::Var { name, .. } => {
                let n = self.fresh();
                self.line(n, format_args!("input {sid} {name}"));
                n
            }
            Expr::Not(a) | Expr::BvNot(a) => self.unary("not", sid, a)?,
            Expr::BvNeg(a) => self.unary("neg", sid, a)?,
            Expr::And(a, b) | Expr::BvAnd(a, b) => self.binary("and", sid, a, b)?,
            Expr::Or(a, b) | Expr::BvOr(a, b) => self.binary("or", sid, a, b)?,
            Expr::Xor(a, b) | Expr::BvXor(a, b) => self.binary("xor", sid, a, b)?,
            Expr::Implies(a, b) => self.binary("implies", sid, a, b)?,
            Expr::Iff(a, b) => self.binary("iff", sid, a, b)?,
            Expr::BvAdd(a, b) => self.binary("add", sid, a, b)?,
            Expr::BvSub(a, b) => self.binary("sub", sid, a, b)?,
            Expr::BvMul(a, b) => self.binary("mul", sid, a, b)?,
            Expr::BvUdiv(a, b) => self.binary("udiv", sid, a, b)?,
            Expr::BvSdiv(a, b) => self.binary("sdiv", sid, a, b)?,
            Expr::BvUrem(a, b) => self.binary("urem", sid, a, b)?,
            Expr::BvSrem(a, b) => self.binary("srem", sid, a, b)?,
            Expr::BvSmod(a, b) => self.binary("smod", sid, a, b)?,
            Expr::BvShl(a, b) => self.binary("sll", sid, a, b)?,
            Expr::BvLshr(a, b) => self.binary("srl", sid, a, b)?,
            Expr::BvAshr(a, b) => self.binary("sra", sid, a, b)?,
            Expr::BvUlt(a, b) => self.binary("ult", sid, a, b)?,
            Expr::BvUle(a, b) => self.binary("ulte", sid, a, b)?,
            Expr::BvUgt(a, b) => self.binary("ugt", sid, a, b)?,
            Expr::BvUge(a, b) => self.binary("ugte", sid, a, b)?,
            Expr::BvSlt(a, b) => self.binary("slt", sid, a, b)?,
            Expr::BvSle(a, b) => self.binary("slte", sid, a, b)?,
            Expr::BvSgt(a, b) => self.binary("sgt", sid, a, b)?,
            Expr::BvSge(a, b) => self.binary("sgte", sid, a, b)?,
            Expr::BvConcat(a, b) => self.binary("concat", sid, a, b)?,
            Expr::Eq(a, b) => self.binary("eq", sid, a, b)?,
            Expr::Neq(a, b) => self.binary("neq", sid, a, b)?,
            Expr::BvExtract { hi, lo, value } => {
                let v = self.emit(value)?;
                let n = self.fresh();
                self.line(n, format_args!("slice {sid} {v} {hi} {lo}"));
                n
            }
            Expr::BvZext { by, value } => {
                let v = self.emit(value)?;
                let n = self.fresh();
                self.line(n, format_args!("uext {sid} {v} {by}"));
                n
            }
            Expr::BvSext { by, value } => {
                let v = self.emit(value)?;
                let n = self.fresh();
                self.line(n, format_args!("sext {sid} {v} {by}"));
                n
            }
            Expr::Ite {
                cond,
                then_value,
                else_value,
            } => {
                let c = self.emit(cond)?;
                let t = self.emit(then_value)?;
                let f = self.emit(else_value)?;
                let n = self.fresh();
                self.line(n, format_args!("ite {sid} {c} {t} {f}"));
                n
            }
            Expr::ArrayRead { array, index } => self.binary("read", sid, array, index)?,
            Expr::ArrayWrite { array, index, value } => {
                let a = self.emit(array)?;
                let i = self.emit(index)?;
                let v = self.emit(value)?;
                let n = self.fresh();
                self.line(n, format_args!("write {sid} {a} {i} {v}"));
                n
            }
            Expr::ArrayConst { .. } => return Err(SerializeError::ConstArrayPosition),
        };
        self.expr_nids.insert(e, nid);
        Ok(nid)
    }

    fn unary(&mut self, op: &str, sid: u64, a: ExprRef) -> Result<u64, SerializeError> {
        let a = self.emit(a)?;
        let n = self.fresh();
        self.line(n, format_args!("{op} {sid} {a}"));
        Ok(n)
    }

    fn binary(&mut self, op: &str, sid: u64, a: ExprRef, b: ExprRef) -> Result<u64, SerializeError> {
        let a = self.emit(a)?;
        let b = self.emit(b)?;
        let n = self.fresh();
        self.line(n, format_args!("{op} {sid} {a} {b}"));
        Ok(n)
    }

    fn run(&mut self) -> Result<(), SerializeError> {
        let model = self.model;
        for input in &model.inputs {
            let sid = self.sort_nid(&input.sort);
            let n = self.fresh();
            self.line(n, format_args!("input {sid} {}", input.name));
            self.expr_nids.insert(input.var, n);
        }
        for state in &model.states {
            let sid = self.sort_nid(&state.sort);
            let n = self.fresh();
            self.line(n, format_args!("state {sid} {}", state.name));
            self.expr_nids.insert(state.var, n);
        }

        for state in &model.states {
            let sid = self.sort_nid(&state.sort);
            let state_nid = self.expr_nids[&state.var];
            if let Some(init) = state.init {
                // An array initialized to a constant element serializes
                // back as the element itself.
                let value_nid = match &model.ctx[init] {
                    Expr::ArrayConst { value, .. } => self.emit(*value)?,
                    _ => self.emit(init)?,
                };
                let n = self.fresh();
                self.line(n, format_args!("init {sid} {state_nid} {value_nid}"));
            }
            let next_nid = self.emit(state.next)?;
            let n = self.fresh();
            self.line(n, format_args!("next {sid} {state_nid} {next_nid}"));
        }

        for output in &model.outputs {
            let e = self.emit(output.expr)?;
            let n = self.fresh();
            self.line(n, format_args!("output {e} {}", output.name));
        }
        for &bad in &model.bads {
            let e = self.emit(bad)?;
            let n = self.fresh();
            self.line(n, format_args!("bad {e}"));
        }
        for &constraint in &model.constraints {
            let e = self.emit(constraint)?;
            let n = self.fresh();
            self.line(n, format_args!("constraint {e}"));
        }
        for sink in &model.liveness {
            let e = self.emit(sink.expr)?;
            let n = self.fresh();
            match sink.kind {
                LivenessKind::Fair => self.line(n, format_args!("fair {e}")),
                LivenessKind::Justice => self.line(n, format_args!("justice 1 {e}")),
            }
        }
        Ok(())
    }
}

//! Single-pass BTOR2 parser.
//!
//! Each line defines a node; operands always reference earlier nodes, so
//! one linear pass over the file with an nid table is enough. Negative
//! operand references denote negation of the referenced node.

// Btor2Error carries the named source for diagnostics; boxing the error
// keeps Result sizes reasonable without losing the rendered snippet.
#![allow(clippy::result_large_err)]

use std::collections::HashMap;

use num::{BigUint, Num, One, Zero};
use tracing::warn;

use galago_ir::expr::{Context, ExprError, ExprRef, VarRole};
use galago_ir::model::{
    InputVar, LivenessKind, LivenessSink, ModelIR, Output, StateVar,
};
use galago_ir::sorts::Sort;
use indexmap::IndexMap;

use crate::errors::{Btor2Error, Btor2Reason};

impl From<ExprError> for Btor2Reason {
    fn from(e: ExprError) -> Self {
        match e {
            ExprError::SortMismatch { .. } => Btor2Reason::SortMismatch(e.to_string()),
            ExprError::WidthMismatch { .. }
            | ExprError::BadExtract { .. }
            | ExprError::ConstOverflow { .. }
            | ExprError::ZeroWidth => Btor2Reason::WidthMismatch(e.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Sort(Sort),
    Expr(ExprRef),
}

/// Source location of a line, for error spans.
#[derive(Debug, Clone, Copy)]
struct LineLoc {
    line_no: usize,
    offset: usize,
    len: usize,
}

#[derive(Debug)]
struct PendingState {
    name: String,
    sort: Sort,
    var: ExprRef,
    init: Option<ExprRef>,
    next: Option<ExprRef>,
    loc: LineLoc,
}

/// A bit-vector 1 declared sort is interchangeable with a boolean node:
/// BTOR2 has no boolean sort, comparisons in the IR do.
fn sorts_compatible(declared: &Sort, actual: &Sort) -> bool {
    declared == actual || (declared == &Sort::BitVec(1) && actual == &Sort::Bool)
}

#[derive(Default)]
struct Parser {
    ctx: Context,
    nodes: HashMap<u64, NodeKind>,
    sorts: IndexMap<u64, Sort>,
    state_slots: HashMap<u64, usize>,
    states: Vec<PendingState>,
    inputs: Vec<InputVar>,
    outputs: Vec<Output>,
    bads: Vec<ExprRef>,
    constraints: Vec<ExprRef>,
    liveness: Vec<LivenessSink>,
}

/// Parse a BTOR2 text stream into a [`ModelIR`].
///
/// The first offending line aborts parsing with a [`Btor2Error`]
/// carrying its location.
pub fn parse(source: &str, filename: &str) -> Result<ModelIR, Box<Btor2Error>> {
    let mut parser = Parser::default();
    let base = source.as_ptr() as usize;
    for (idx, raw) in source.lines().enumerate() {
        let offset = raw.as_ptr() as usize - base;
        let loc = LineLoc {
            line_no: idx + 1,
            offset,
            len: raw.len().max(1),
        };
        let line = raw.split(';').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        parser
            .handle_line(&tokens, loc)
            .map_err(|reason| error_at(reason, loc, source, filename))?;
    }
    parser.finish(source, filename)
}

fn error_at(reason: Btor2Reason, loc: LineLoc, source: &str, filename: &str) -> Box<Btor2Error> {
    Box::new(Btor2Error::new(
        reason,
        loc.line_no,
        loc.offset,
        loc.len,
        source,
        filename,
    ))
}

fn tok<'a>(tokens: &[&'a str], i: usize) -> Result<&'a str, Btor2Reason> {
    tokens
        .get(i)
        .copied()
        .ok_or_else(|| Btor2Reason::Malformed("missing operand".into()))
}

fn parse_u32(t: &str) -> Result<u32, Btor2Reason> {
    t.parse()
        .map_err(|_| Btor2Reason::Malformed(format!("expected an integer, found `{t}`")))
}

impl Parser {
    fn sort_ref(&self, t: &str) -> Result<Sort, Btor2Reason> {
        let nid: u64 = t
            .parse()
            .map_err(|_| Btor2Reason::Malformed(format!("expected a sort id, found `{t}`")))?;
        match self.nodes.get(&nid) {
            Some(NodeKind::Sort(s)) => Ok(s.clone()),
            Some(NodeKind::Expr(_)) => Err(Btor2Reason::SortMismatch(format!(
                "node {nid} is an expression, not a sort"
            ))),
            None => Err(Btor2Reason::UndefinedRef(nid as i64)),
        }
    }

    fn expr_ref(&mut self, t: &str) -> Result<ExprRef, Btor2Reason> {
        let n: i64 = t
            .parse()
            .map_err(|_| Btor2Reason::Malformed(format!("expected a node id, found `{t}`")))?;
        let nid = n.unsigned_abs();
        let e = match self.nodes.get(&nid) {
            Some(NodeKind::Expr(e)) => *e,
            Some(NodeKind::Sort(_)) => {
                return Err(Btor2Reason::SortMismatch(format!(
                    "node {nid} is a sort, not an expression"
                )))
            }
            None => return Err(Btor2Reason::UndefinedRef(n)),
        };
        if n >= 0 {
            return Ok(e);
        }
        match self.ctx.sort_of(e).clone() {
            Sort::Bool => Ok(self.ctx.not(e)?),
            Sort::BitVec(_) => Ok(self.ctx.bv_not(e)?),
            other => Err(Btor2Reason::SortMismatch(format!(
                "cannot negate a node of sort {other}"
            ))),
        }
    }

    /// Operand in a bit-vector position; boolean nodes are adapted to
    /// 1-bit vectors.
    fn bv_operand(&mut self, t: &str) -> Result<ExprRef, Btor2Reason> {
        let e = self.expr_ref(t)?;
        match self.ctx.sort_of(e).clone() {
            Sort::Bool => Ok(self.ctx.to_bv1(e)?),
            Sort::BitVec(_) => Ok(e),
            other => Err(Btor2Reason::SortMismatch(format!(
                "expected a bit-vector operand, found {other}"
            ))),
        }
    }

    /// Operand in a boolean position; 1-bit vectors are adapted.
    fn bool_operand(&mut self, t: &str) -> Result<ExprRef, Btor2Reason> {
        let e = self.expr_ref(t)?;
        Ok(self.ctx.to_bool(e)?)
    }

    /// Bring a boolean/1-bit pair onto the same sort.
    fn unify(&mut self, a: ExprRef, b: ExprRef) -> Result<(ExprRef, ExprRef), Btor2Reason> {
        let sa = self.ctx.sort_of(a).clone();
        let sb = self.ctx.sort_of(b).clone();
        match (sa, sb) {
            (Sort::Bool, Sort::BitVec(1)) => Ok((self.ctx.to_bv1(a)?, b)),
            (Sort::BitVec(1), Sort::Bool) => Ok((a, self.ctx.to_bv1(b)?)),
            _ => Ok((a, b)),
        }
    }

    fn define(&mut self, nid: u64, declared: &Sort, e: ExprRef) -> Result<(), Btor2Reason> {
        let actual = self.ctx.sort_of(e);
        if !sorts_compatible(declared, actual) {
            return Err(Btor2Reason::SortMismatch(format!(
                "declared {declared}, computed {actual}"
            )));
        }
        self.nodes.insert(nid, NodeKind::Expr(e));
        Ok(())
    }

    fn parse_const(&mut self, t: &str, radix: u32, width: u32) -> Result<ExprRef, Btor2Reason> {
        let (negative, digits) = match t.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, t),
        };
        let magnitude = BigUint::from_str_radix(digits, radix)
            .map_err(|_| Btor2Reason::Malformed(format!("bad constant `{t}`")))?;
        let modulus = BigUint::one() << width;
        let value = if negative {
            let m = &magnitude % &modulus;
            if m.is_zero() {
                m
            } else {
                &modulus - m
            }
        } else {
            if magnitude.bits() > u64::from(width) {
                return Err(Btor2Reason::WidthMismatch(format!(
                    "constant `{t}` does not fit in {width} bits"
                )));
            }
            magnitude
        };
        Ok(self.ctx.bv_const(value, width)?)
    }

    fn handle_line(&mut self, tokens: &[&str], loc: LineLoc) -> Result<(), Btor2Reason> {
        let nid: u64 = tok(tokens, 0)?
            .parse()
            .map_err(|_| Btor2Reason::Malformed("line must start with a node id".into()))?;
        if self.nodes.contains_key(&nid) {
            return Err(Btor2Reason::Malformed(format!("duplicate node id {nid}")));
        }
        let op = tok(tokens, 1)?;

        match op {
            "sort" => {
                let sort = match tok(tokens, 2)? {
                    "bitvec" => {
                        let w = parse_u32(tok(tokens, 3)?)?;
                        if w == 0 {
                            return Err(Btor2Reason::WidthMismatch(
                                "bit-vector width must be at least 1".into(),
                            ));
                        }
                        Sort::BitVec(w)
                    }
                    "array" => {
                        let index = self.sort_ref(tok(tokens, 3)?)?;
                        let element = self.sort_ref(tok(tokens, 4)?)?;
                        Sort::array(index, element)
                    }
                    other => {
                        return Err(Btor2Reason::Malformed(format!("unknown sort kind `{other}`")))
                    }
                };
                self.sorts.insert(nid, sort.clone());
                self.nodes.insert(nid, NodeKind::Sort(sort));
            }

            "input" => {
                let sort = self.sort_ref(tok(tokens, 2)?)?;
                let name = tokens
                    .get(3)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("input_{nid}"));
                let var = self.ctx.var(&name, sort.clone(), VarRole::Input);
                self.inputs.push(InputVar { name, sort, var });
                self.nodes.insert(nid, NodeKind::Expr(var));
            }

            "state" => {
                let sort = self.sort_ref(tok(tokens, 2)?)?;
                let name = tokens
                    .get(3)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("state_{nid}"));
                let var = self.ctx.var(&name, sort.clone(), VarRole::State);
                self.state_slots.insert(nid, self.states.len());
                self.states.push(PendingState {
                    name,
                    sort,
                    var,
                    init: None,
                    next: None,
                    loc,
                });
                self.nodes.insert(nid, NodeKind::Expr(var));
            }

            "init" => {
                let _sort = self.sort_ref(tok(tokens, 2)?)?;
                let slot = self.state_slot(tok(tokens, 3)?)?;
                if self.states[slot].init.is_some() {
                    return Err(Btor2Reason::DuplicateInit(self.states[slot].name.clone()));
                }
                let value = self.expr_ref(tok(tokens, 4)?)?;
                let coerced = self.coerce_state_value(slot, value)?;
                self.states[slot].init = Some(coerced);
            }

            "next" => {
                let _sort = self.sort_ref(tok(tokens, 2)?)?;
                let slot = self.state_slot(tok(tokens, 3)?)?;
                if self.states[slot].next.is_some() {
                    return Err(Btor2Reason::DuplicateNext(self.states[slot].name.clone()));
                }
                let value = self.expr_ref(tok(tokens, 4)?)?;
                let coerced = self.coerce_state_value(slot, value)?;
                self.states[slot].next = Some(coerced);
            }

            "const" | "constd" | "consth" => {
                let sort = self.sort_ref(tok(tokens, 2)?)?;
                let width = sort.bitvec_width().ok_or_else(|| {
                    Btor2Reason::SortMismatch("constants require a bit-vector sort".into())
                })?;
                let radix = match op {
                    "const" => 2,
                    "constd" => 10,
                    _ => 16,
                };
                let e = self.parse_const(tok(tokens, 3)?, radix, width)?;
                self.define(nid, &sort, e)?;
            }

            "zero" | "one" | "ones" => {
                let sort = self.sort_ref(tok(tokens, 2)?)?;
                let width = sort.bitvec_width().ok_or_else(|| {
                    Btor2Reason::SortMismatch("constants require a bit-vector sort".into())
                })?;
                let e = match op {
                    "zero" => self.ctx.bv_zero(width)?,
                    "one" => self.ctx.bv_one(width)?,
                    _ => self.ctx.bv_ones(width)?,
                };
                self.define(nid, &sort, e)?;
            }

            // Unary
            "not" | "neg" | "inc" | "dec" | "redand" | "redor" | "redxor" => {
                let sort = self.sort_ref(tok(tokens, 2)?)?;
                let a = self.bv_operand(tok(tokens, 3)?)?;
                let w = self.ctx.sort_of(a).bitvec_width().unwrap_or(1);
                let e = match op {
                    "not" => self.ctx.bv_not(a)?,
                    "neg" => self.ctx.bv_neg(a)?,
                    "inc" => {
                        let one = self.ctx.bv_one(w)?;
                        self.ctx.bv_add(a, one)?
                    }
                    "dec" => {
                        let one = self.ctx.bv_one(w)?;
                        self.ctx.bv_sub(a, one)?
                    }
                    "redand" => {
                        let ones = self.ctx.bv_ones(w)?;
                        self.ctx.eq(a, ones)?
                    }
                    "redor" => {
                        let zero = self.ctx.bv_zero(w)?;
                        self.ctx.neq(a, zero)?
                    }
                    _ => {
                        let mut acc = self.ctx.bv_extract(a, 0, 0)?;
                        for i in 1..w {
                            let bit = self.ctx.bv_extract(a, i, i)?;
                            acc = self.ctx.bv_xor(acc, bit)?;
                        }
                        acc
                    }
                };
                self.define(nid, &sort, e)?;
            }

            // Logical / bitwise binary
            "and" | "or" | "xor" | "nand" | "nor" | "xnor" => {
                let sort = self.sort_ref(tok(tokens, 2)?)?;
                let a = self.bv_operand(tok(tokens, 3)?)?;
                let b = self.bv_operand(tok(tokens, 4)?)?;
                let e = match op {
                    "and" => self.ctx.bv_and(a, b)?,
                    "or" => self.ctx.bv_or(a, b)?,
                    "xor" => self.ctx.bv_xor(a, b)?,
                    "nand" => {
                        let base = self.ctx.bv_and(a, b)?;
                        self.ctx.bv_not(base)?
                    }
                    "nor" => {
                        let base = self.ctx.bv_or(a, b)?;
                        self.ctx.bv_not(base)?
                    }
                    _ => {
                        let base = self.ctx.bv_xor(a, b)?;
                        self.ctx.bv_not(base)?
                    }
                };
                self.define(nid, &sort, e)?;
            }

            "implies" | "iff" => {
                let sort = self.sort_ref(tok(tokens, 2)?)?;
                let a = self.bool_operand(tok(tokens, 3)?)?;
                let b = self.bool_operand(tok(tokens, 4)?)?;
                let e = if op == "implies" {
                    self.ctx.implies(a, b)?
                } else {
                    self.ctx.iff(a, b)?
                };
                self.define(nid, &sort, e)?;
            }

            // Arithmetic and shifts
            "add" | "sub" | "mul" | "udiv" | "sdiv" | "urem" | "srem" | "smod" | "sll"
            | "srl" | "sra" => {
                let sort = self.sort_ref(tok(tokens, 2)?)?;
                let a = self.bv_operand(tok(tokens, 3)?)?;
                let b = self.bv_operand(tok(tokens, 4)?)?;
                let e = match op {
                    "add" => self.ctx.bv_add(a, b)?,
                    "sub" => self.ctx.bv_sub(a, b)?,
                    "mul" => self.ctx.bv_mul(a, b)?,
                    "udiv" => self.ctx.bv_udiv(a, b)?,
                    "sdiv" => self.ctx.bv_sdiv(a, b)?,
                    "urem" => self.ctx.bv_urem(a, b)?,
                    "srem" => self.ctx.bv_srem(a, b)?,
                    "smod" => self.ctx.bv_smod(a, b)?,
                    "sll" => self.ctx.bv_shl(a, b)?,
                    "srl" => self.ctx.bv_lshr(a, b)?,
                    _ => self.ctx.bv_ashr(a, b)?,
                };
                self.define(nid, &sort, e)?;
            }

            // Rotates have no SMT-LIB counterpart with a symbolic amount;
            // decompose into shifts over `amount mod width`.
            "rol" | "ror" => {
                let sort = self.sort_ref(tok(tokens, 2)?)?;
                let a = self.bv_operand(tok(tokens, 3)?)?;
                let b = self.bv_operand(tok(tokens, 4)?)?;
                let w = self.ctx.sort_of(a).bitvec_width().unwrap_or(1);
                let width_const = self.ctx.bv_const(BigUint::from(w), w)?;
                let amount = self.ctx.bv_urem(b, width_const)?;
                let inverse = self.ctx.bv_sub(width_const, amount)?;
                let e = if op == "rol" {
                    let left = self.ctx.bv_shl(a, amount)?;
                    let right = self.ctx.bv_lshr(a, inverse)?;
                    self.ctx.bv_or(left, right)?
                } else {
                    let right = self.ctx.bv_lshr(a, amount)?;
                    let left = self.ctx.bv_shl(a, inverse)?;
                    self.ctx.bv_or(right, left)?
                };
                self.define(nid, &sort, e)?;
            }

            // Comparisons
            "eq" | "neq" => {
                let sort = self.sort_ref(tok(tokens, 2)?)?;
                let a = self.expr_ref(tok(tokens, 3)?)?;
                let b = self.expr_ref(tok(tokens, 4)?)?;
                let (a, b) = self.unify(a, b)?;
                let e = if op == "eq" {
                    self.ctx.eq(a, b)?
                } else {
                    self.ctx.neq(a, b)?
                };
                self.define(nid, &sort, e)?;
            }

            "ult" | "ulte" | "ugt" | "ugte" | "slt" | "slte" | "sgt" | "sgte" => {
                let sort = self.sort_ref(tok(tokens, 2)?)?;
                let a = self.bv_operand(tok(tokens, 3)?)?;
                let b = self.bv_operand(tok(tokens, 4)?)?;
                let e = match op {
                    "ult" => self.ctx.bv_ult(a, b)?,
                    "ulte" => self.ctx.bv_ule(a, b)?,
                    "ugt" => self.ctx.bv_ugt(a, b)?,
                    "ugte" => self.ctx.bv_uge(a, b)?,
                    "slt" => self.ctx.bv_slt(a, b)?,
                    "slte" => self.ctx.bv_sle(a, b)?,
                    "sgt" => self.ctx.bv_sgt(a, b)?,
                    _ => self.ctx.bv_sge(a, b)?,
                };
                self.define(nid, &sort, e)?;
            }

            // Structural
            "concat" => {
                let sort = self.sort_ref(tok(tokens, 2)?)?;
                let a = self.bv_operand(tok(tokens, 3)?)?;
                let b = self.bv_operand(tok(tokens, 4)?)?;
                let e = self.ctx.bv_concat(a, b)?;
                self.define(nid, &sort, e)?;
            }

            "slice" => {
                let sort = self.sort_ref(tok(tokens, 2)?)?;
                let a = self.bv_operand(tok(tokens, 3)?)?;
                let hi = parse_u32(tok(tokens, 4)?)?;
                let lo = parse_u32(tok(tokens, 5)?)?;
                let e = self.ctx.bv_extract(a, hi, lo)?;
                self.define(nid, &sort, e)?;
            }

            "uext" | "sext" => {
                let sort = self.sort_ref(tok(tokens, 2)?)?;
                let a = self.bv_operand(tok(tokens, 3)?)?;
                let by = parse_u32(tok(tokens, 4)?)?;
                let e = if op == "uext" {
                    self.ctx.bv_zext(a, by)?
                } else {
                    self.ctx.bv_sext(a, by)?
                };
                self.define(nid, &sort, e)?;
            }

            "ite" => {
                let sort = self.sort_ref(tok(tokens, 2)?)?;
                let cond = self.bool_operand(tok(tokens, 3)?)?;
                let t = self.expr_ref(tok(tokens, 4)?)?;
                let f = self.expr_ref(tok(tokens, 5)?)?;
                let (t, f) = self.unify(t, f)?;
                let e = self.ctx.ite(cond, t, f)?;
                self.define(nid, &sort, e)?;
            }

            // Memory
            "read" => {
                let sort = self.sort_ref(tok(tokens, 2)?)?;
                let array = self.expr_ref(tok(tokens, 3)?)?;
                let index = self.bv_operand(tok(tokens, 4)?)?;
                let e = self.ctx.array_read(array, index)?;
                self.define(nid, &sort, e)?;
            }

            "write" => {
                let sort = self.sort_ref(tok(tokens, 2)?)?;
                let array = self.expr_ref(tok(tokens, 3)?)?;
                let index = self.bv_operand(tok(tokens, 4)?)?;
                let value = self.bv_operand(tok(tokens, 5)?)?;
                let e = self.ctx.array_write(array, index, value)?;
                self.define(nid, &sort, e)?;
            }

            // Sinks
            "output" => {
                let expr = self.expr_ref(tok(tokens, 2)?)?;
                let name = tokens
                    .get(3)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("output_{nid}"));
                self.outputs.push(Output { name, expr });
            }

            "bad" => {
                let e = self.bool_operand(tok(tokens, 2)?)?;
                self.bads.push(e);
            }

            "constraint" => {
                let e = self.bool_operand(tok(tokens, 2)?)?;
                self.constraints.push(e);
            }

            "fair" => {
                warn!(line = loc.line_no, "`fair` is recognized but not checked");
                let e = self.bool_operand(tok(tokens, 2)?)?;
                self.liveness.push(LivenessSink {
                    kind: LivenessKind::Fair,
                    expr: e,
                });
            }

            "justice" => {
                warn!(line = loc.line_no, "`justice` is recognized but not checked");
                let count = parse_u32(tok(tokens, 2)?)? as usize;
                for i in 0..count {
                    let e = self.bool_operand(tok(tokens, 3 + i)?)?;
                    self.liveness.push(LivenessSink {
                        kind: LivenessKind::Justice,
                        expr: e,
                    });
                }
            }

            other => return Err(Btor2Reason::UnknownOp(other.to_string())),
        }
        Ok(())
    }

    fn state_slot(&self, t: &str) -> Result<usize, Btor2Reason> {
        let nid: u64 = t
            .parse()
            .map_err(|_| Btor2Reason::Malformed(format!("expected a state id, found `{t}`")))?;
        match self.state_slots.get(&nid) {
            Some(slot) => Ok(*slot),
            None => match self.nodes.get(&nid) {
                Some(_) => Err(Btor2Reason::SortMismatch(format!(
                    "node {nid} is not a state"
                ))),
                None => Err(Btor2Reason::UndefinedRef(nid as i64)),
            },
        }
    }

    /// Coerce an init/next value onto the state's sort: booleans become
    /// 1-bit vectors, and an element value initializing an array state
    /// becomes a constant array.
    fn coerce_state_value(&mut self, slot: usize, value: ExprRef) -> Result<ExprRef, Btor2Reason> {
        let state_sort = self.states[slot].sort.clone();
        let value = match self.ctx.sort_of(value).clone() {
            Sort::Bool => self.ctx.to_bv1(value)?,
            _ => value,
        };
        let value_sort = self.ctx.sort_of(value).clone();
        match (&state_sort, &value_sort) {
            (Sort::Array { index, element }, Sort::BitVec(_)) => {
                if element.as_ref() != &value_sort {
                    return Err(Btor2Reason::SortMismatch(format!(
                        "array element sort {element} does not match value sort {value_sort}"
                    )));
                }
                Ok(self.ctx.array_const(index.as_ref().clone(), value)?)
            }
            _ if state_sort == value_sort => Ok(value),
            _ => Err(Btor2Reason::SortMismatch(format!(
                "state sort {state_sort} does not match value sort {value_sort}"
            ))),
        }
    }

    fn finish(self, source: &str, filename: &str) -> Result<ModelIR, Box<Btor2Error>> {
        let mut states = Vec::with_capacity(self.states.len());
        for pending in self.states {
            let next = pending.next.ok_or_else(|| {
                error_at(
                    Btor2Reason::DanglingState(pending.name.clone()),
                    pending.loc,
                    source,
                    filename,
                )
            })?;
            states.push(StateVar {
                name: pending.name,
                sort: pending.sort,
                var: pending.var,
                init: pending.init,
                next,
            });
        }
        Ok(ModelIR {
            ctx: self.ctx,
            sorts: self.sorts,
            states,
            inputs: self.inputs,
            outputs: self.outputs,
            bads: self.bads,
            constraints: self.constraints,
            liveness: self.liveness,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_reference_negates() {
        let src = "1 sort bitvec 4\n2 input 1 a\n3 not 1 -2\n4 output 3 na\n";
        let m = parse(src, "t.btor2").unwrap();
        // not(bvnot(a)) shares structure with a double negation tree
        assert_eq!(m.outputs.len(), 1);
        m.validate().unwrap();
    }

    #[test]
    fn duplicate_nid_is_rejected() {
        let src = "1 sort bitvec 4\n1 sort bitvec 8\n";
        let err = parse(src, "t.btor2").unwrap_err();
        assert!(matches!(err.reason, Btor2Reason::Malformed(_)));
        assert_eq!(err.line_no, 2);
    }

    #[test]
    fn constd_negative_wraps() {
        let src = "1 sort bitvec 4\n2 constd 1 -1\n3 output 2 allones\n";
        let m = parse(src, "t.btor2").unwrap();
        let out = m.outputs[0].expr;
        match &m.ctx[out] {
            galago_ir::expr::Expr::BvConst { value, width } => {
                assert_eq!(value, &BigUint::from(15u32));
                assert_eq!(*width, 4);
            }
            other => panic!("expected a constant, got {other:?}"),
        }
    }

    #[test]
    fn redxor_folds_to_single_bit() {
        let src = "1 sort bitvec 4\n2 input 1 a\n3 sort bitvec 1\n4 redxor 3 2\n5 output 4 parity\n";
        let m = parse(src, "t.btor2").unwrap();
        assert_eq!(m.ctx.sort_of(m.outputs[0].expr), &Sort::BitVec(1));
        m.validate().unwrap();
    }
}

//! Parsed transition system.
//!
//! A `ModelIR` owns the expression arena for one design. States, inputs
//! and sinks keep their declaration order; the BMC engine relies on that
//! order when materializing frames and printing traces.

use indexmap::IndexMap;
use thiserror::Error;

use crate::expr::{Context, Expr, ExprError, ExprRef, VarRole};
use crate::sorts::Sort;

/// A state variable with its initial and next-state expressions.
///
/// `init` is absent for states whose initial value is unconstrained.
#[derive(Debug, Clone)]
pub struct StateVar {
    pub name: String,
    pub sort: Sort,
    pub var: ExprRef,
    pub init: Option<ExprRef>,
    pub next: ExprRef,
}

#[derive(Debug, Clone)]
pub struct InputVar {
    pub name: String,
    pub sort: Sort,
    pub var: ExprRef,
}

/// A named `output` sink.
#[derive(Debug, Clone)]
pub struct Output {
    pub name: String,
    pub expr: ExprRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivenessKind {
    Fair,
    Justice,
}

/// `fair`/`justice` sinks are recognized but not checked; they are kept
/// here so the model is a faithful record of its source.
#[derive(Debug, Clone)]
pub struct LivenessSink {
    pub kind: LivenessKind,
    pub expr: ExprRef,
}

/// Resolution of a signal name, in property-lookup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalRef {
    State(usize),
    Input(usize),
    Output(usize),
}

#[derive(Debug, Default, Clone)]
pub struct ModelIR {
    pub ctx: Context,
    /// Declared sort table, keyed by the source nid.
    pub sorts: IndexMap<u64, Sort>,
    pub states: Vec<StateVar>,
    pub inputs: Vec<InputVar>,
    pub outputs: Vec<Output>,
    pub bads: Vec<ExprRef>,
    pub constraints: Vec<ExprRef>,
    pub liveness: Vec<LivenessSink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidateError {
    #[error("node sort disagrees with its operands: {0}")]
    Inconsistent(#[from] ExprError),
    #[error("state `{0}` has mismatched next-state sort")]
    NextSortMismatch(String),
    #[error("state `{0}` has mismatched init sort")]
    InitSortMismatch(String),
    #[error("variable `{0}` is not registered as a state or input")]
    UnregisteredVar(String),
}

impl ModelIR {
    /// Resolve a scripted signal name: states shadow inputs, inputs
    /// shadow outputs.
    pub fn lookup(&self, name: &str) -> Option<SignalRef> {
        if let Some(i) = self.states.iter().position(|s| s.name == name) {
            return Some(SignalRef::State(i));
        }
        if let Some(i) = self.inputs.iter().position(|s| s.name == name) {
            return Some(SignalRef::Input(i));
        }
        self.outputs
            .iter()
            .position(|o| o.name == name)
            .map(SignalRef::Output)
    }

    /// Every expression reachable from a state, sink, or output.
    pub fn roots(&self) -> Vec<ExprRef> {
        let mut roots = Vec::new();
        for s in &self.states {
            roots.push(s.var);
            roots.push(s.next);
            if let Some(init) = s.init {
                roots.push(init);
            }
        }
        roots.extend(self.inputs.iter().map(|i| i.var));
        roots.extend(self.outputs.iter().map(|o| o.expr));
        roots.extend(self.bads.iter().copied());
        roots.extend(self.constraints.iter().copied());
        roots.extend(self.liveness.iter().map(|l| l.expr));
        roots
    }

    /// Structural soundness check: every reachable node's cached sort
    /// matches the sort recomputed from its operands, state equations are
    /// well-sorted, and every symbolic leaf is registered in the state or
    /// input table.
    pub fn validate(&self) -> Result<(), ValidateError> {
        let mut seen = vec![false; self.ctx.len()];
        let mut todo = self.roots();
        while let Some(e) = todo.pop() {
            if seen[e.index()] {
                continue;
            }
            seen[e.index()] = true;
            let recomputed = self.ctx.recompute_sort(e)?;
            if &recomputed != self.ctx.sort_of(e) {
                return Err(ValidateError::Inconsistent(ExprError::SortMismatch {
                    expected: self.ctx.sort_of(e).to_string(),
                    found: recomputed.to_string(),
                }));
            }
            if let Expr::Var { name, role, .. } = &self.ctx[e] {
                let registered = match role {
                    VarRole::State => self.states.iter().any(|s| s.var == e),
                    VarRole::Input => self.inputs.iter().any(|i| i.var == e),
                    VarRole::Aux => true,
                };
                if !registered {
                    return Err(ValidateError::UnregisteredVar(name.clone()));
                }
            }
            self.ctx.for_each_child(e, |c| todo.push(c));
        }

        for s in &self.states {
            if self.ctx.sort_of(s.next) != &s.sort {
                return Err(ValidateError::NextSortMismatch(s.name.clone()));
            }
            if let Some(init) = s.init {
                if self.ctx.sort_of(init) != &s.sort {
                    return Err(ValidateError::InitSortMismatch(s.name.clone()));
                }
            }
        }
        Ok(())
    }
}

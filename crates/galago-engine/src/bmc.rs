//! Iterative unrolling and per-step property checks.
//!
//! Step `k` materializes fresh symbolic copies of every state and input,
//! asserts the init (k = 0) or transition relation, the environment
//! constraints, the stimulus drives and the clock waveform, then checks
//! the property inside a single `push`/`pop` bracket. Accumulated
//! transition constraints persist across steps; the property does not.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use galago_ir::model::{ModelIR, SignalRef};
use galago_ir::stimulus::PropOp;
use galago_smt::solver::{SatResult, SmtSolver};
use galago_smt::terms::SmtTerm;

use crate::binding::{BoundProperty, BoundStimulus};
use crate::cursor::SegmentCursor;
use crate::encode::{clock_assertion, Frame, StepLowerer};
use crate::trace::{extract_trace, Trace};

#[derive(Debug, Clone)]
pub struct BmcOptions {
    /// Exclusive unroll bound: steps `0..k_max` are checked.
    pub k_max: usize,
}

impl Default for BmcOptions {
    fn default() -> Self {
        BmcOptions { k_max: 20 }
    }
}

/// Cooperative cancellation, checked between steps.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Terminal verdict of one BMC run.
#[derive(Debug)]
pub enum RunOutcome {
    /// The property held at `step`; `trace` is the witness.
    PropertyHit { step: usize, trace: Trace },
    /// All steps up to the bound were UNSAT.
    BoundExhausted { k_max: usize },
    /// The backend answered unknown; no partial trace is produced.
    Inconclusive { step: usize, reason: String },
    /// The caller's cancellation flag was set.
    Cancelled { step: usize },
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::PropertyHit { trace, .. } => write!(f, "{trace}"),
            RunOutcome::BoundExhausted { k_max } => {
                write!(f, "Property not hit within {k_max} steps (bound exhausted).")
            }
            RunOutcome::Inconclusive { step, reason } => {
                write!(f, "Inconclusive at step {step}: {reason}")
            }
            RunOutcome::Cancelled { step } => write!(f, "Cancelled at step {step}."),
        }
    }
}

fn lower_property(model: &ModelIR, frame: &Frame, property: &BoundProperty) -> SmtTerm {
    match property {
        BoundProperty::Always => SmtTerm::bool(true),
        BoundProperty::Never => SmtTerm::bool(false),
        BoundProperty::Bads => {
            let mut lowerer = StepLowerer::new(model, frame);
            let bads: Vec<SmtTerm> = model
                .bads
                .iter()
                .map(|&bad| lowerer.bool_term(bad))
                .collect();
            SmtTerm::or(bads)
        }
        BoundProperty::Compare {
            target,
            op,
            literal,
            width,
            signed,
            ..
        } => {
            let mut lowerer = StepLowerer::new(model, frame);
            let lhs = match target {
                SignalRef::State(i) => lowerer.bv_term(model.states[*i].var),
                SignalRef::Input(i) => lowerer.bv_term(model.inputs[*i].var),
                SignalRef::Output(i) => lowerer.bv_term(model.outputs[*i].expr),
            };
            let rhs = SmtTerm::bv(literal.clone(), *width);
            let (l, r) = (Box::new(lhs), Box::new(rhs));
            match (op, signed) {
                (PropOp::Eq, _) => SmtTerm::Eq(l, r),
                (PropOp::Ne, _) => SmtTerm::Eq(l, r).not(),
                (PropOp::Lt, false) => SmtTerm::BvUlt(l, r),
                (PropOp::Le, false) => SmtTerm::BvUle(l, r),
                (PropOp::Gt, false) => SmtTerm::BvUgt(l, r),
                (PropOp::Ge, false) => SmtTerm::BvUge(l, r),
                (PropOp::Lt, true) => SmtTerm::BvSlt(l, r),
                (PropOp::Le, true) => SmtTerm::BvSle(l, r),
                (PropOp::Gt, true) => SmtTerm::BvSgt(l, r),
                (PropOp::Ge, true) => SmtTerm::BvSge(l, r),
            }
        }
    }
}

/// Run bounded model checking up to `options.k_max` steps.
///
/// Backend failures abort with the solver's error; everything else is a
/// terminal [`RunOutcome`].
pub fn run_bmc<S: SmtSolver>(
    solver: &mut S,
    model: &ModelIR,
    bound: &BoundStimulus,
    options: &BmcOptions,
    cancel: Option<&CancelFlag>,
) -> Result<RunOutcome, S::Error> {
    let mut frames: Vec<Frame> = Vec::with_capacity(options.k_max);
    let mut cursor = SegmentCursor::new();

    for k in 0..options.k_max {
        if cancel.is_some_and(|c| c.is_cancelled()) {
            info!(step = k, "BMC: cancelled");
            return Ok(RunOutcome::Cancelled { step: k });
        }
        info!(step = k, "BMC: checking step");

        let frame = Frame::materialize(model, k);
        for sym in frame.state_syms.values().chain(frame.input_syms.values()) {
            solver.declare_const(&sym.name, &sym.sort)?;
        }
        frames.push(frame);

        // Init at step 0; transition from the previous frame otherwise.
        if k == 0 {
            let frame = &frames[0];
            let mut lowerer = StepLowerer::new(model, frame);
            for state in &model.states {
                if let Some(init) = state.init {
                    let lhs = frame.state_syms[&state.name].term();
                    let rhs = lowerer.term(init);
                    solver.assert(&lhs.eq(rhs))?;
                }
            }
        } else {
            let (prev, cur) = (&frames[k - 1], &frames[k]);
            let mut lowerer = StepLowerer::new(model, prev);
            for state in &model.states {
                let lhs = cur.state_syms[&state.name].term();
                let rhs = lowerer.term(state.next);
                solver.assert(&lhs.eq(rhs))?;
            }
        }

        // Environment assumptions from `constraint` sinks.
        {
            let frame = &frames[k];
            let mut lowerer = StepLowerer::new(model, frame);
            for &constraint in &model.constraints {
                let term = lowerer.bool_term(constraint);
                solver.assert(&term)?;
            }
        }

        // Stimulus drives for the current segment.
        if let Some(segment) = cursor.current(&bound.segments) {
            let frame = &frames[k];
            for drive in &segment.drives {
                let input = &model.inputs[drive.input];
                let sym = &frame.input_syms[&input.name];
                let width = sym.sort.bitvec_width().unwrap_or(1);
                solver.assert(&sym.term().eq(SmtTerm::bv(drive.value.clone(), width)))?;
            }
        }

        // Clock waveforms.
        for clock in &bound.clocks {
            let input = &model.inputs[clock.input];
            let sym = &frames[k].input_syms[&input.name];
            solver.assert(&clock_assertion(sym, k, clock.period))?;
        }

        // Property check, bracketed by exactly one push/pop.
        let property = lower_property(model, &frames[k], &bound.property);
        solver.push()?;
        solver.assert(&property)?;
        match solver.check_sat()? {
            SatResult::Sat => {
                info!(step = k, "BMC: property hit");
                let trace = extract_trace(solver, model, &frames, k, bound.property.label())?;
                solver.pop()?;
                return Ok(RunOutcome::PropertyHit { step: k, trace });
            }
            SatResult::Unsat => {
                debug!(step = k, "BMC: no hit at this step");
                solver.pop()?;
            }
            SatResult::Unknown(reason) => {
                info!(step = k, %reason, "BMC: backend returned unknown");
                solver.pop()?;
                return Ok(RunOutcome::Inconclusive { step: k, reason });
            }
        }

        cursor.advance(&bound.segments);
    }

    info!(k_max = options.k_max, "BMC: bound exhausted");
    Ok(RunOutcome::BoundExhausted {
        k_max: options.k_max,
    })
}

//! Resolution of script names against the model.
//!
//! Binding happens once at engine startup so every later step works with
//! indices instead of names: state, input and output namespaces are kept
//! apart by [`SignalRef`] and cannot collide.

use num::BigUint;
use thiserror::Error;
use tracing::warn;

use galago_ir::model::{ModelIR, SignalRef};
use galago_ir::sorts::Sort;
use galago_ir::stimulus::{PropOp, PropSpec, StimulusIR};

#[derive(Debug, Error)]
pub enum BindingError {
    #[error("script references unknown signal `{0}`")]
    UnknownSignal(String),
    #[error("`{0}` is not an input and cannot be driven")]
    NotAnInput(String),
    #[error("input `{0}` is not a bit-vector")]
    NotBitVector(String),
    #[error("literal {literal} does not fit the {width}-bit signal `{signal}`")]
    OverflowLiteral {
        signal: String,
        literal: BigUint,
        width: u32,
    },
    #[error("property signal `{0}` has no comparable value")]
    UnsupportedPropertySort(String),
}

/// The property predicate after name resolution.
#[derive(Debug, Clone)]
pub enum BoundProperty {
    /// Scripted `true`: hits at the first step checked.
    Always,
    /// Scripted comparison against a literal.
    Compare {
        target: SignalRef,
        op: PropOp,
        literal: BigUint,
        width: u32,
        signed: bool,
        label: String,
    },
    /// No scripted property: the disjunction of the model's `bad` sinks.
    Bads,
    /// Neither a script property nor `bad` sinks: never hits.
    Never,
}

impl BoundProperty {
    /// Label used in the counter-example banner.
    pub fn label(&self) -> &str {
        match self {
            BoundProperty::Always => "true",
            BoundProperty::Compare { label, .. } => label,
            BoundProperty::Bads => "bad",
            BoundProperty::Never => "false",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoundDrive {
    /// Index into `model.inputs`.
    pub input: usize,
    pub value: BigUint,
}

#[derive(Debug, Clone)]
pub struct BoundSegment {
    pub drives: Vec<BoundDrive>,
    pub hold: u32,
}

#[derive(Debug, Clone)]
pub struct BoundClock {
    /// Index into `model.inputs`.
    pub input: usize,
    pub period: u32,
}

#[derive(Debug, Clone)]
pub struct BoundStimulus {
    pub property: BoundProperty,
    pub clocks: Vec<BoundClock>,
    pub segments: Vec<BoundSegment>,
}

fn signal_sort<'m>(model: &'m ModelIR, signal: SignalRef) -> &'m Sort {
    match signal {
        SignalRef::State(i) => &model.states[i].sort,
        SignalRef::Input(i) => &model.inputs[i].sort,
        SignalRef::Output(i) => model.ctx.sort_of(model.outputs[i].expr),
    }
}

fn input_index(model: &ModelIR, name: &str) -> Result<usize, BindingError> {
    match model.lookup(name) {
        Some(SignalRef::Input(i)) => Ok(i),
        Some(_) => Err(BindingError::NotAnInput(name.to_string())),
        None => Err(BindingError::UnknownSignal(name.to_string())),
    }
}

/// Resolve every name the script mentions and check literal widths.
pub fn bind(model: &ModelIR, stim: &StimulusIR) -> Result<BoundStimulus, BindingError> {
    let mut clocks = Vec::with_capacity(stim.clocks.len());
    for (name, period) in &stim.clocks {
        let input = input_index(model, name)?;
        if model.inputs[input].sort.bitvec_width().is_none() {
            return Err(BindingError::NotBitVector(name.clone()));
        }
        clocks.push(BoundClock {
            input,
            period: *period,
        });
    }

    let mut segments = Vec::with_capacity(stim.segments.len());
    for segment in &stim.segments {
        let mut drives = Vec::new();
        for (name, value) in &segment.drives {
            if stim.clocks.contains_key(name) {
                // The clock waveform owns this input; the drive would
                // conflict with the asserted clock value.
                warn!(input = %name, "drive is shadowed by the clock definition");
                continue;
            }
            let input = input_index(model, name)?;
            let width = model.inputs[input]
                .sort
                .bitvec_width()
                .ok_or_else(|| BindingError::NotBitVector(name.clone()))?;
            if value.bits() > u64::from(width) {
                return Err(BindingError::OverflowLiteral {
                    signal: name.clone(),
                    literal: value.clone(),
                    width,
                });
            }
            drives.push(BoundDrive {
                input,
                value: value.clone(),
            });
        }
        segments.push(BoundSegment {
            drives,
            hold: segment.hold,
        });
    }

    let property = match &stim.property {
        Some(PropSpec::True) => BoundProperty::Always,
        Some(spec @ PropSpec::Compare { signal, op, literal }) => {
            let target = model
                .lookup(signal)
                .ok_or_else(|| BindingError::UnknownSignal(signal.clone()))?;
            let width = match signal_sort(model, target) {
                Sort::BitVec(w) => *w,
                Sort::Bool => 1,
                Sort::Array { .. } => {
                    return Err(BindingError::UnsupportedPropertySort(signal.clone()))
                }
            };
            if literal.bits() > u64::from(width) {
                return Err(BindingError::OverflowLiteral {
                    signal: signal.clone(),
                    literal: literal.clone(),
                    width,
                });
            }
            BoundProperty::Compare {
                target,
                op: *op,
                literal: literal.clone(),
                width,
                signed: stim.signed_signals.contains(signal),
                label: spec.to_string(),
            }
        }
        None if model.bads.is_empty() => BoundProperty::Never,
        None => BoundProperty::Bads,
    };

    Ok(BoundStimulus {
        property,
        clocks,
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use galago_ir::expr::{Context, VarRole};
    use galago_ir::model::{InputVar, Output, StateVar};
    use galago_ir::stimulus::Segment;
    use indexmap::IndexMap;

    fn model() -> ModelIR {
        let mut ctx = Context::new();
        let out = ctx.var("out", Sort::BitVec(4), VarRole::State);
        let clk = ctx.var("clk", Sort::BitVec(1), VarRole::Input);
        let en = ctx.var("en", Sort::BitVec(4), VarRole::Input);
        ModelIR {
            states: vec![StateVar {
                name: "out".into(),
                sort: Sort::BitVec(4),
                var: out,
                init: None,
                next: out,
            }],
            inputs: vec![
                InputVar {
                    name: "clk".into(),
                    sort: Sort::BitVec(1),
                    var: clk,
                },
                InputVar {
                    name: "en".into(),
                    sort: Sort::BitVec(4),
                    var: en,
                },
            ],
            outputs: vec![Output {
                name: "value".into(),
                expr: out,
            }],
            ctx,
            ..Default::default()
        }
    }

    fn stim() -> StimulusIR {
        StimulusIR::default()
    }

    #[test]
    fn unknown_property_signal_is_fatal() {
        let mut s = stim();
        s.property = Some(PropSpec::Compare {
            signal: "missing".into(),
            op: PropOp::Eq,
            literal: BigUint::from(1u32),
        });
        assert!(matches!(
            bind(&model(), &s),
            Err(BindingError::UnknownSignal(name)) if name == "missing"
        ));
    }

    #[test]
    fn property_resolves_states_before_outputs() {
        let mut s = stim();
        s.property = Some(PropSpec::Compare {
            signal: "out".into(),
            op: PropOp::Eq,
            literal: BigUint::from(2u32),
        });
        let bound = bind(&model(), &s).unwrap();
        match bound.property {
            BoundProperty::Compare { target, width, label, .. } => {
                assert_eq!(target, SignalRef::State(0));
                assert_eq!(width, 4);
                assert_eq!(label, "out == 2");
            }
            other => panic!("expected a comparison, got {other:?}"),
        }
    }

    #[test]
    fn driving_a_state_is_rejected() {
        let mut s = stim();
        let mut drives = IndexMap::new();
        drives.insert("out".to_string(), BigUint::from(1u32));
        s.segments.push(Segment { drives, hold: 1 });
        assert!(matches!(
            bind(&model(), &s),
            Err(BindingError::NotAnInput(name)) if name == "out"
        ));
    }

    #[test]
    fn overflowing_drive_literal_is_rejected() {
        let mut s = stim();
        let mut drives = IndexMap::new();
        drives.insert("en".to_string(), BigUint::from(16u32));
        s.segments.push(Segment { drives, hold: 1 });
        assert!(matches!(
            bind(&model(), &s),
            Err(BindingError::OverflowLiteral { width: 4, .. })
        ));
    }

    #[test]
    fn clock_must_name_an_input() {
        let mut s = stim();
        s.clocks.insert("out".into(), 1);
        assert!(matches!(bind(&model(), &s), Err(BindingError::NotAnInput(_))));
    }

    #[test]
    fn clock_shadows_drive_of_same_input() {
        let mut s = stim();
        s.clocks.insert("clk".into(), 1);
        let mut drives = IndexMap::new();
        drives.insert("clk".to_string(), BigUint::from(1u32));
        drives.insert("en".to_string(), BigUint::from(3u32));
        s.segments.push(Segment { drives, hold: 2 });
        let bound = bind(&model(), &s).unwrap();
        assert_eq!(bound.segments.len(), 1);
        assert_eq!(bound.segments[0].drives.len(), 1);
        assert_eq!(bound.segments[0].drives[0].input, 1);
    }

    #[test]
    fn missing_property_falls_back_to_bads_or_never() {
        let s = stim();
        let m = model();
        let bound = bind(&m, &s).unwrap();
        assert!(matches!(bound.property, BoundProperty::Never));

        let mut with_bad = model();
        let zero = with_bad.ctx.bv_zero(4).unwrap();
        let out_var = with_bad.states[0].var;
        let is_zero = with_bad.ctx.eq(out_var, zero).unwrap();
        with_bad.bads.push(is_zero);
        let bound = bind(&with_bad, &s).unwrap();
        assert!(matches!(bound.property, BoundProperty::Bads));
        assert_eq!(bound.property.label(), "bad");
    }

    #[test]
    fn signedness_comes_from_the_declaration() {
        let mut s = stim();
        s.signed_signals.insert("en".into());
        s.property = Some(PropSpec::Compare {
            signal: "en".into(),
            op: PropOp::Lt,
            literal: BigUint::from(3u32),
        });
        let bound = bind(&model(), &s).unwrap();
        assert!(matches!(
            bound.property,
            BoundProperty::Compare { signed: true, .. }
        ));
    }
}

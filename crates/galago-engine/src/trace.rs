//! Counter-example extraction and rendering.

use std::collections::HashSet;
use std::fmt;

use galago_ir::model::ModelIR;
use galago_smt::solver::{ModelValue, SmtSolver};

use crate::encode::{lower_sort, Frame, StepLowerer};

/// Values of every signal at one step, in input/state/output order.
#[derive(Debug, Clone)]
pub struct TraceStep {
    pub values: Vec<(String, ModelValue)>,
}

/// A concrete witness: one [`TraceStep`] per unrolled step up to and
/// including the hit step.
#[derive(Debug, Clone)]
pub struct Trace {
    pub property: String,
    pub step: usize,
    pub steps: Vec<TraceStep>,
}

/// Query the model for every signal in every frame.
///
/// Must run directly after a `Sat` answer, before the enclosing scope is
/// popped. Outputs shadowed by a state or input of the same name are
/// skipped; their value is already in the step.
pub fn extract_trace<S: SmtSolver>(
    solver: &mut S,
    model: &ModelIR,
    frames: &[Frame],
    hit_step: usize,
    property: &str,
) -> Result<Trace, S::Error> {
    let mut steps = Vec::with_capacity(hit_step + 1);
    for frame in frames.iter().take(hit_step + 1) {
        let mut values = Vec::new();
        let mut seen = HashSet::new();
        for input in &model.inputs {
            let sym = &frame.input_syms[&input.name];
            let value = solver.get_value(&sym.term(), &sym.sort)?;
            seen.insert(input.name.clone());
            values.push((input.name.clone(), value));
        }
        for state in &model.states {
            let sym = &frame.state_syms[&state.name];
            let value = solver.get_value(&sym.term(), &sym.sort)?;
            seen.insert(state.name.clone());
            values.push((state.name.clone(), value));
        }
        let mut lowerer = StepLowerer::new(model, frame);
        for output in &model.outputs {
            if !seen.insert(output.name.clone()) {
                continue;
            }
            let term = lowerer.term(output.expr);
            let sort = lower_sort(model.ctx.sort_of(output.expr));
            let value = solver.get_value(&term, &sort)?;
            values.push((output.name.clone(), value));
        }
        steps.push(TraceStep { values });
    }
    Ok(Trace {
        property: property.to_string(),
        step: hit_step,
        steps,
    })
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "!!! Property '{}' holds at step {} !!!",
            self.property, self.step
        )?;
        for (k, step) in self.steps.iter().enumerate() {
            writeln!(f, "--- step {k} ---")?;
            for (name, value) in &step.values {
                writeln!(f, "  {name}: {value}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::BigUint;

    #[test]
    fn trace_renders_in_the_waveform_format() {
        let trace = Trace {
            property: "out == 2".into(),
            step: 1,
            steps: vec![
                TraceStep {
                    values: vec![
                        (
                            "clk".into(),
                            ModelValue::Bits {
                                value: BigUint::from(0u32),
                                width: 1,
                            },
                        ),
                        (
                            "out".into(),
                            ModelValue::Bits {
                                value: BigUint::from(0u32),
                                width: 4,
                            },
                        ),
                    ],
                },
                TraceStep {
                    values: vec![
                        (
                            "clk".into(),
                            ModelValue::Bits {
                                value: BigUint::from(1u32),
                                width: 1,
                            },
                        ),
                        (
                            "out".into(),
                            ModelValue::Bits {
                                value: BigUint::from(2u32),
                                width: 4,
                            },
                        ),
                    ],
                },
            ],
        };
        let rendered = trace.to_string();
        assert_eq!(
            rendered,
            "!!! Property 'out == 2' holds at step 1 !!!\n\
             --- step 0 ---\n  clk: 0_1\n  out: 0_4\n\
             --- step 1 ---\n  clk: 1_1\n  out: 2_4\n"
        );
    }
}

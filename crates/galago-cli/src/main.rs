//! `galago`: bounded model checking of synchronous hardware designs.
//!
//! Exit codes: 0 property hit, 1 bound exhausted, 2 inconclusive or
//! cancelled, 3 user/parse error, 4 backend error.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use galago_engine::binding::bind;
use galago_engine::bmc::{run_bmc, BmcOptions, RunOutcome};
use galago_engine::trace::Trace;
use galago_smt::backends::pipe::{PipeSolver, SolverKind};

mod synth;

const EXIT_PROPERTY_HIT: i32 = 0;
const EXIT_BOUND_EXHAUSTED: i32 = 1;
const EXIT_INCONCLUSIVE: i32 = 2;
const EXIT_USER_ERROR: i32 = 3;
const EXIT_INTERNAL_ERROR: i32 = 4;

#[derive(Parser)]
#[command(name = "galago")]
#[command(about = "Bounded model checking of synchronous hardware designs")]
#[command(version)]
struct Cli {
    /// HDL design, or an already-synthesized .btor2 file
    design: PathBuf,

    /// Top module name passed to the synthesis command
    top_module: String,

    /// Stimulus/property script
    stimulus: PathBuf,

    /// Maximum unroll depth
    #[arg(short = 'k', long = "k-max", default_value_t = 20)]
    k_max: usize,

    /// Solver backend: cvc5 | z3 | bitwuzla
    #[arg(long, default_value = "cvc5")]
    solver: String,

    /// Per-query solver timeout in seconds (0 disables)
    #[arg(long, default_value_t = 0)]
    timeout: u64,

    /// Output format: text | json
    #[arg(long, default_value = "text")]
    format: String,

    /// Tee the SMT-LIB stream sent to the solver into a file
    #[arg(long)]
    dump_smt: Option<PathBuf>,

    /// Synthesis command template with {input}, {top} and {output}
    /// placeholders (default: the yosys clk2fflogic flow)
    #[arg(long)]
    synth_cmd: Option<String>,
}

fn main() {
    // Logs go to stderr; stdout carries only the verdict and the
    // counter-example waveform.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    std::process::exit(run(cli));
}

fn diagnostic_error(err: impl miette::Diagnostic + Send + Sync + 'static) -> i32 {
    eprintln!("{:?}", miette::Report::new(err));
    EXIT_USER_ERROR
}

fn run(cli: Cli) -> i32 {
    let btor2_path = match synth::ensure_btor2(&cli.design, &cli.top_module, cli.synth_cmd.as_deref())
    {
        Ok(path) => path,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_USER_ERROR;
        }
    };

    let design_src = match fs::read_to_string(&btor2_path) {
        Ok(src) => src,
        Err(e) => {
            eprintln!("error: cannot read {}: {e}", btor2_path.display());
            return EXIT_USER_ERROR;
        }
    };
    let model = match galago_btor2::parse(&design_src, &btor2_path.display().to_string()) {
        Ok(model) => model,
        Err(e) => return diagnostic_error(*e),
    };

    let script_src = match fs::read_to_string(&cli.stimulus) {
        Ok(src) => src,
        Err(e) => {
            eprintln!("error: cannot read {}: {e}", cli.stimulus.display());
            return EXIT_USER_ERROR;
        }
    };
    let stim = match galago_stim::parse(&script_src, &cli.stimulus.display().to_string()) {
        Ok(stim) => stim,
        Err(e) => return diagnostic_error(e),
    };

    let bound = match bind(&model, &stim) {
        Ok(bound) => bound,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_USER_ERROR;
        }
    };

    let Some(kind) = SolverKind::from_name(&cli.solver) else {
        eprintln!("error: unknown solver `{}` (expected cvc5, z3 or bitwuzla)", cli.solver);
        return EXIT_USER_ERROR;
    };
    let timeout = (cli.timeout > 0).then(|| Duration::from_secs(cli.timeout));
    let mut solver = match PipeSolver::spawn(kind, timeout) {
        Ok(solver) => solver,
        Err(e) => {
            eprintln!("backend error: {e}");
            return EXIT_INTERNAL_ERROR;
        }
    };
    if let Some(path) = &cli.dump_smt {
        match fs::File::create(path) {
            Ok(file) => solver.set_dump(Box::new(file)),
            Err(e) => {
                eprintln!("error: cannot create {}: {e}", path.display());
                return EXIT_USER_ERROR;
            }
        }
    }

    let options = BmcOptions { k_max: cli.k_max };
    let outcome = match run_bmc(&mut solver, &model, &bound, &options, None) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("backend error: {e}");
            return EXIT_INTERNAL_ERROR;
        }
    };

    if cli.format == "json" {
        println!("{}", outcome_json(&outcome));
    } else {
        print!("{outcome}");
        if !matches!(outcome, RunOutcome::PropertyHit { .. }) {
            println!();
        }
    }

    match outcome {
        RunOutcome::PropertyHit { .. } => EXIT_PROPERTY_HIT,
        RunOutcome::BoundExhausted { .. } => EXIT_BOUND_EXHAUSTED,
        RunOutcome::Inconclusive { .. } | RunOutcome::Cancelled { .. } => EXIT_INCONCLUSIVE,
    }
}

fn trace_json(trace: &Trace) -> serde_json::Value {
    let steps: Vec<serde_json::Value> = trace
        .steps
        .iter()
        .enumerate()
        .map(|(k, step)| {
            let signals: serde_json::Map<String, serde_json::Value> = step
                .values
                .iter()
                .map(|(name, value)| (name.clone(), json!(value.to_string())))
                .collect();
            json!({ "step": k, "signals": signals })
        })
        .collect();
    json!({ "property": trace.property, "steps": steps })
}

fn outcome_json(outcome: &RunOutcome) -> serde_json::Value {
    match outcome {
        RunOutcome::PropertyHit { step, trace } => json!({
            "outcome": "property_hit",
            "step": step,
            "trace": trace_json(trace),
        }),
        RunOutcome::BoundExhausted { k_max } => json!({
            "outcome": "bound_exhausted",
            "k_max": k_max,
        }),
        RunOutcome::Inconclusive { step, reason } => json!({
            "outcome": "inconclusive",
            "step": step,
            "reason": reason,
        }),
        RunOutcome::Cancelled { step } => json!({
            "outcome": "cancelled",
            "step": step,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galago_engine::trace::TraceStep;
    use galago_smt::solver::ModelValue;

    #[test]
    fn outcome_json_shapes() {
        let v = outcome_json(&RunOutcome::BoundExhausted { k_max: 20 });
        assert_eq!(v["outcome"], "bound_exhausted");
        assert_eq!(v["k_max"], 20);

        let v = outcome_json(&RunOutcome::Inconclusive {
            step: 3,
            reason: "solver returned unknown".into(),
        });
        assert_eq!(v["outcome"], "inconclusive");
        assert_eq!(v["step"], 3);
    }

    #[test]
    fn trace_json_renders_values_as_strings() {
        let trace = Trace {
            property: "out == 2".into(),
            step: 0,
            steps: vec![TraceStep {
                values: vec![(
                    "out".into(),
                    ModelValue::Bits {
                        value: 2u32.into(),
                        width: 4,
                    },
                )],
            }],
        };
        let v = trace_json(&trace);
        assert_eq!(v["property"], "out == 2");
        assert_eq!(v["steps"][0]["signals"]["out"], "2_4");
    }
}

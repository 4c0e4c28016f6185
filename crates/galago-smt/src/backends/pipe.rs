//! Process-piped SMT-LIB2 backend.
//!
//! Spawns a solver binary, feeds it SMT-LIB2 over stdin and reads
//! responses from stdout. The engine only ever sees the [`SmtSolver`]
//! trait; which binary runs is decided here.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;

use num::{BigUint, Num};
use thiserror::Error;
use tracing::debug;

use crate::backends::smtlib_printer::{sort_to_smtlib, to_smtlib};
use crate::solver::{ArrayValue, ModelValue, SatResult, SmtSolver};
use crate::sorts::SmtSort;
use crate::terms::SmtTerm;

const LOGIC: &str = "QF_AUFBV";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("solver I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("solver not found: {0}")]
    NotFound(String),
    #[error("solver error: {0}")]
    Solver(String),
    #[error("failed to parse solver output: {0}")]
    Parse(String),
}

/// Supported solver binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverKind {
    Cvc5,
    Z3,
    Bitwuzla,
}

impl SolverKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cvc5" => Some(SolverKind::Cvc5),
            "z3" => Some(SolverKind::Z3),
            "bitwuzla" => Some(SolverKind::Bitwuzla),
            _ => None,
        }
    }

    pub fn command(&self) -> &'static str {
        match self {
            SolverKind::Cvc5 => "cvc5",
            SolverKind::Z3 => "z3",
            SolverKind::Bitwuzla => "bitwuzla",
        }
    }

    /// Command-line arguments, including the per-query time limit.
    fn args(&self, timeout: Option<Duration>) -> Vec<String> {
        let ms = timeout.map(|t| t.as_millis().max(1));
        match self {
            SolverKind::Cvc5 => {
                let mut args = vec![
                    "--lang".to_string(),
                    "smt2".to_string(),
                    "--incremental".to_string(),
                    "--produce-models".to_string(),
                ];
                if let Some(ms) = ms {
                    args.push(format!("--tlimit-per={ms}"));
                }
                args
            }
            SolverKind::Z3 => {
                let mut args = vec!["-smt2".to_string(), "-in".to_string()];
                if let Some(ms) = ms {
                    args.push(format!("-t:{ms}"));
                }
                args
            }
            SolverKind::Bitwuzla => {
                let mut args = vec!["--lang".to_string(), "smt2".to_string()];
                if let Some(ms) = ms {
                    args.push("--time-limit-per".to_string());
                    args.push(ms.to_string());
                }
                args
            }
        }
    }
}

pub struct PipeSolver {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    stderr: BufReader<ChildStderr>,
    dump: Option<Box<dyn Write + Send>>,
}

impl PipeSolver {
    /// Spawn one of the known solvers with an optional per-query timeout.
    pub fn spawn(kind: SolverKind, timeout: Option<Duration>) -> Result<Self, BackendError> {
        Self::with_command(kind.command(), &kind.args(timeout))
    }

    /// Spawn an arbitrary SMT-LIB2 solver command.
    pub fn with_command(program: &str, args: &[String]) -> Result<Self, BackendError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| BackendError::NotFound(format!("{program}: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| BackendError::Solver("failed to capture solver stdin".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BackendError::Solver("failed to capture solver stdout".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| BackendError::Solver("failed to capture solver stderr".into()))?;

        let mut solver = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            stderr: BufReader::new(stderr),
            dump: None,
        };
        solver.send("(set-option :produce-models true)")?;
        solver.send(&format!("(set-logic {LOGIC})"))?;
        Ok(solver)
    }

    /// Tee every SMT-LIB line sent to the solver into `writer`.
    pub fn set_dump(&mut self, writer: Box<dyn Write + Send>) {
        self.dump = Some(writer);
    }

    fn send(&mut self, cmd: &str) -> Result<(), BackendError> {
        debug!(target: "galago::smt", "{cmd}");
        if let Some(dump) = self.dump.as_mut() {
            let _ = writeln!(dump, "{cmd}");
        }
        writeln!(self.stdin, "{cmd}")?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Read one complete response: lines are accumulated until the
    /// parentheses balance, so multi-line `get-value` answers come back
    /// whole.
    fn read_response(&mut self, context: &str) -> Result<String, BackendError> {
        let mut response = String::new();
        let mut depth: i64 = 0;
        loop {
            let mut line = String::new();
            let n = self.stdout.read_line(&mut line)?;
            if n == 0 {
                let mut diag = String::new();
                let _ = self.stderr.read_line(&mut diag);
                return Err(BackendError::Solver(format!(
                    "no response for `{context}`. stderr: {}",
                    diag.trim()
                )));
            }
            for c in line.chars() {
                match c {
                    '(' => depth += 1,
                    ')' => depth -= 1,
                    _ => {}
                }
            }
            response.push_str(&line);
            if depth <= 0 && !response.trim().is_empty() {
                return Ok(response.trim().to_string());
            }
        }
    }

    fn send_expect_response(&mut self, cmd: &str) -> Result<String, BackendError> {
        self.send(cmd)?;
        let response = self.read_response(cmd)?;
        if response.starts_with("(error") {
            return Err(BackendError::Solver(response));
        }
        Ok(response)
    }
}

impl Drop for PipeSolver {
    fn drop(&mut self) {
        let _ = writeln!(self.stdin, "(exit)");
        let _ = self.stdin.flush();
        let _ = self.child.wait();
    }
}

impl SmtSolver for PipeSolver {
    type Error = BackendError;

    fn declare_const(&mut self, name: &str, sort: &SmtSort) -> Result<(), BackendError> {
        self.send(&format!("(declare-const {name} {})", sort_to_smtlib(sort)))
    }

    fn assert(&mut self, term: &SmtTerm) -> Result<(), BackendError> {
        self.send(&format!("(assert {})", to_smtlib(term)))
    }

    fn push(&mut self) -> Result<(), BackendError> {
        self.send("(push 1)")
    }

    fn pop(&mut self) -> Result<(), BackendError> {
        self.send("(pop 1)")
    }

    fn check_sat(&mut self) -> Result<SatResult, BackendError> {
        let response = self.send_expect_response("(check-sat)")?;
        match response.as_str() {
            "sat" => Ok(SatResult::Sat),
            "unsat" => Ok(SatResult::Unsat),
            "unknown" => Ok(SatResult::Unknown("solver returned unknown".into())),
            other => Err(BackendError::Solver(other.to_string())),
        }
    }

    fn get_value(&mut self, term: &SmtTerm, sort: &SmtSort) -> Result<ModelValue, BackendError> {
        let response = self.send_expect_response(&format!("(get-value ({}))", to_smtlib(term)))?;
        parse_value_response(&response, sort)
    }
}

// --- Response parsing ------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Sexp {
    Atom(String),
    List(Vec<Sexp>),
}

fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in input.chars() {
        match c {
            '(' | ')' => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(c.to_string());
            }
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn parse_sexp(tokens: &[String], pos: &mut usize) -> Result<Sexp, BackendError> {
    let token = tokens
        .get(*pos)
        .ok_or_else(|| BackendError::Parse("unexpected end of response".into()))?;
    *pos += 1;
    if token == "(" {
        let mut items = Vec::new();
        loop {
            match tokens.get(*pos).map(String::as_str) {
                Some(")") => {
                    *pos += 1;
                    return Ok(Sexp::List(items));
                }
                Some(_) => items.push(parse_sexp(tokens, pos)?),
                None => return Err(BackendError::Parse("unbalanced response".into())),
            }
        }
    } else if token == ")" {
        Err(BackendError::Parse("unexpected `)`".into()))
    } else {
        Ok(Sexp::Atom(token.clone()))
    }
}

/// Parse a full `get-value` response `((term value))` against the
/// expected sort of the queried term.
fn parse_value_response(response: &str, sort: &SmtSort) -> Result<ModelValue, BackendError> {
    let tokens = tokenize(response);
    let mut pos = 0;
    let sexp = parse_sexp(&tokens, &mut pos)?;
    let pair = match &sexp {
        Sexp::List(pairs) if !pairs.is_empty() => &pairs[0],
        _ => return Err(BackendError::Parse(format!("bad get-value response: {response}"))),
    };
    let value = match pair {
        Sexp::List(items) => match items.as_slice() {
            [_, .., value] => value,
            _ => return Err(BackendError::Parse(format!("bad get-value pair: {response}"))),
        },
        _ => return Err(BackendError::Parse(format!("bad get-value pair: {response}"))),
    };
    parse_model_value(value, sort)
}

fn parse_bits(sexp: &Sexp, width: u32) -> Result<BigUint, BackendError> {
    match sexp {
        Sexp::Atom(a) if a.starts_with("#b") => BigUint::from_str_radix(&a[2..], 2)
            .map_err(|e| BackendError::Parse(format!("bad binary literal `{a}`: {e}"))),
        Sexp::Atom(a) if a.starts_with("#x") => BigUint::from_str_radix(&a[2..], 16)
            .map_err(|e| BackendError::Parse(format!("bad hex literal `{a}`: {e}"))),
        Sexp::List(items) => match items.as_slice() {
            [Sexp::Atom(underscore), Sexp::Atom(bv), Sexp::Atom(_w)]
                if underscore == "_" && bv.starts_with("bv") =>
            {
                BigUint::from_str_radix(&bv[2..], 10)
                    .map_err(|e| BackendError::Parse(format!("bad literal `{bv}`: {e}")))
            }
            _ => Err(BackendError::Parse(format!(
                "expected a {width}-bit literal, got a compound value"
            ))),
        },
        Sexp::Atom(a) => Err(BackendError::Parse(format!(
            "expected a {width}-bit literal, got `{a}`"
        ))),
    }
}

fn parse_array_value(
    sexp: &Sexp,
    index_width: u32,
    element_width: u32,
) -> Result<ArrayValue, BackendError> {
    match sexp {
        // ((as const (Array ...)) default)
        Sexp::List(items)
            if items.len() == 2
                && matches!(&items[0], Sexp::List(head)
                    if head.first() == Some(&Sexp::Atom("as".into()))) =>
        {
            let default = parse_bits(&items[1], element_width)?;
            Ok(ArrayValue {
                entries: Vec::new(),
                default: Some(default),
            })
        }
        // (store base index value)
        Sexp::List(items)
            if items.len() == 4 && items[0] == Sexp::Atom("store".into()) =>
        {
            let mut base = parse_array_value(&items[1], index_width, element_width)?;
            let index = parse_bits(&items[2], index_width)?;
            let value = parse_bits(&items[3], element_width)?;
            base.entries.retain(|(i, _)| i != &index);
            base.entries.push((index, value));
            Ok(base)
        }
        other => Err(BackendError::Parse(format!(
            "unsupported array model value: {other:?}"
        ))),
    }
}

fn parse_model_value(sexp: &Sexp, sort: &SmtSort) -> Result<ModelValue, BackendError> {
    match sort {
        SmtSort::Bool => match sexp {
            Sexp::Atom(a) if a == "true" => Ok(ModelValue::Bool(true)),
            Sexp::Atom(a) if a == "false" => Ok(ModelValue::Bool(false)),
            other => Err(BackendError::Parse(format!("expected a boolean, got {other:?}"))),
        },
        SmtSort::BitVec(w) => Ok(ModelValue::Bits {
            value: parse_bits(sexp, *w)?,
            width: *w,
        }),
        SmtSort::Array(index, element) => {
            let iw = index.bitvec_width().ok_or_else(|| {
                BackendError::Parse("array index sort is not a bit-vector".into())
            })?;
            let ew = element.bitvec_width().ok_or_else(|| {
                BackendError::Parse("array element sort is not a bit-vector".into())
            })?;
            let mut array = parse_array_value(sexp, iw, ew)?;
            array.entries.sort_by(|a, b| a.0.cmp(&b.0));
            Ok(ModelValue::Array(array))
        }
    }
}

//! Stimulus script parser.
//!
//! The pest grammar is deliberately permissive about which statement
//! appears in which section; this AST phase enforces the section rules
//! so misplaced lines produce a spanned diagnostic.

// ScriptError carries the named source for diagnostics; keeping it by
// value keeps call sites simple, as in the other frontends.
#![allow(clippy::result_large_err)]

use indexmap::IndexMap;
use num::{BigUint, Num, ToPrimitive};
use pest::Parser as _;
use pest_derive::Parser;

use galago_ir::stimulus::{PropOp, PropSpec, Segment, StimulusIR};

use crate::errors::ScriptError;

#[derive(Parser)]
#[grammar = "grammar.pest"]
struct StimParser;

type Pair<'a> = pest::iterators::Pair<'a, Rule>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    Clock,
    Property,
    Process,
}

fn span_of(pair: &Pair<'_>) -> miette::SourceSpan {
    let s = pair.as_span();
    (s.start(), s.end() - s.start()).into()
}

fn named_src(source: &str, filename: &str) -> miette::NamedSource<String> {
    miette::NamedSource::new(filename, source.to_owned())
}

fn describe(rule: Rule) -> &'static str {
    match rule {
        Rule::assign_stmt => "an assignment",
        Rule::hold_stmt => "a hold directive",
        Rule::signed_stmt => "a `signed` declaration",
        Rule::cmp_stmt => "a property predicate",
        Rule::true_stmt => "`true`",
        _ => "this statement",
    }
}

/// Parse a stimulus script into a [`StimulusIR`].
pub fn parse(source: &str, filename: &str) -> Result<StimulusIR, ScriptError> {
    let syntax_error = |message: String, start: usize, len: usize| {
        let start = start.min(source.len());
        let len = len.min(source.len() - start);
        ScriptError::Syntax {
            message,
            span: (start, len).into(),
            src: named_src(source, filename),
        }
    };

    let mut pairs = StimParser::parse(Rule::script, source).map_err(|e| {
        let (start, end) = match e.location {
            pest::error::InputLocation::Pos(p) => (p, p + 1),
            pest::error::InputLocation::Span((s, e)) => (s, e),
        };
        syntax_error(
            e.variant.message().to_string(),
            start,
            end.saturating_sub(start).max(1),
        )
    })?;
    let script = pairs
        .next()
        .ok_or_else(|| syntax_error("empty script".into(), 0, 0))?;

    let literal_value = |pair: &Pair<'_>| -> Result<BigUint, ScriptError> {
        let inner = pair
            .clone()
            .into_inner()
            .next()
            .ok_or_else(|| syntax_error("invalid literal".into(), pair.as_span().start(), 1))?;
        let text = inner.as_str();
        let parsed = match inner.as_rule() {
            Rule::hex_lit => BigUint::from_str_radix(&text[2..], 16),
            Rule::bin_lit => BigUint::from_str_radix(&text[2..], 2),
            _ => BigUint::from_str_radix(text, 10),
        };
        parsed.map_err(|e| {
            syntax_error(
                format!("invalid literal `{text}`: {e}"),
                pair.as_span().start(),
                text.len(),
            )
        })
    };

    let mut ir = StimulusIR::default();
    let mut seen_sections: Vec<String> = Vec::new();
    let mut sticky: IndexMap<String, BigUint> = IndexMap::new();
    let mut pending: IndexMap<String, BigUint> = IndexMap::new();
    let mut saw_process = false;

    for section in script.into_inner() {
        if section.as_rule() != Rule::section {
            continue;
        }
        let mut inner = section.into_inner();
        let header = inner
            .next()
            .ok_or_else(|| syntax_error("missing section header".into(), 0, 0))?;
        let name_pair = header
            .into_inner()
            .next()
            .ok_or_else(|| syntax_error("missing section name".into(), 0, 0))?;
        let name = name_pair.as_str().to_string();
        let kind = match name.as_str() {
            "CLOCK" => SectionKind::Clock,
            "PROPERTY" => SectionKind::Property,
            "PROCESS" => SectionKind::Process,
            _ => {
                return Err(ScriptError::UnknownSection {
                    name,
                    span: span_of(&name_pair),
                    src: named_src(source, filename),
                })
            }
        };
        if seen_sections.contains(&name) {
            return Err(ScriptError::DuplicateSection {
                name,
                span: span_of(&name_pair),
                src: named_src(source, filename),
            });
        }
        seen_sections.push(name.clone());
        if kind == SectionKind::Process {
            saw_process = true;
        }

        for stmt_line in inner {
            let stmt = stmt_line
                .into_inner()
                .next()
                .ok_or_else(|| syntax_error("empty statement".into(), 0, 0))?;
            let item = stmt
                .into_inner()
                .next()
                .ok_or_else(|| syntax_error("empty statement".into(), 0, 0))?;
            let item_rule = item.as_rule();
            let item_span = span_of(&item);

            match (kind, item_rule) {
                (SectionKind::Clock, Rule::assign_stmt) => {
                    let mut parts = item.into_inner();
                    let ident = parts
                        .next()
                        .ok_or_else(|| syntax_error("missing clock name".into(), 0, 0))?;
                    let literal = parts
                        .next()
                        .ok_or_else(|| syntax_error("missing clock period".into(), 0, 0))?;
                    let period = literal_value(&literal)?
                        .to_u32()
                        .filter(|p| *p > 0)
                        .ok_or_else(|| ScriptError::BadClockPeriod {
                            span: span_of(&literal),
                            src: named_src(source, filename),
                        })?;
                    ir.clocks.insert(ident.as_str().to_string(), period);
                }

                (SectionKind::Property, Rule::true_stmt) => {
                    if ir.property.is_some() {
                        return Err(ScriptError::DuplicatePropertyLine {
                            span: item_span,
                            src: named_src(source, filename),
                        });
                    }
                    ir.property = Some(PropSpec::True);
                }

                (SectionKind::Property, Rule::cmp_stmt) => {
                    if ir.property.is_some() {
                        return Err(ScriptError::DuplicatePropertyLine {
                            span: item_span,
                            src: named_src(source, filename),
                        });
                    }
                    let mut parts = item.into_inner();
                    let ident = parts
                        .next()
                        .ok_or_else(|| syntax_error("missing signal".into(), 0, 0))?;
                    let op_pair = parts
                        .next()
                        .ok_or_else(|| syntax_error("missing operator".into(), 0, 0))?;
                    let literal = parts
                        .next()
                        .ok_or_else(|| syntax_error("missing literal".into(), 0, 0))?;
                    let op = match op_pair.as_str() {
                        "==" => PropOp::Eq,
                        "!=" => PropOp::Ne,
                        "<" => PropOp::Lt,
                        "<=" => PropOp::Le,
                        ">" => PropOp::Gt,
                        _ => PropOp::Ge,
                    };
                    ir.property = Some(PropSpec::Compare {
                        signal: ident.as_str().to_string(),
                        op,
                        literal: literal_value(&literal)?,
                    });
                }

                (SectionKind::Process, Rule::assign_stmt) => {
                    let mut parts = item.into_inner();
                    let ident = parts
                        .next()
                        .ok_or_else(|| syntax_error("missing input name".into(), 0, 0))?;
                    let literal = parts
                        .next()
                        .ok_or_else(|| syntax_error("missing drive value".into(), 0, 0))?;
                    pending.insert(ident.as_str().to_string(), literal_value(&literal)?);
                }

                (SectionKind::Process, Rule::hold_stmt) => {
                    let count_pair = item
                        .into_inner()
                        .next()
                        .ok_or_else(|| syntax_error("missing hold count".into(), 0, 0))?;
                    let hold: u32 = count_pair.as_str().parse().unwrap_or(0);
                    if hold == 0 {
                        return Err(ScriptError::BadHoldCount {
                            span: item_span,
                            src: named_src(source, filename),
                        });
                    }
                    let mut drives = sticky.clone();
                    for (k, v) in pending.drain(..) {
                        drives.insert(k, v);
                    }
                    ir.segments.push(Segment {
                        drives: drives.clone(),
                        hold,
                    });
                    sticky = drives;
                }

                (SectionKind::Process, Rule::signed_stmt) => {
                    let ident = item
                        .into_inner()
                        .find(|p| p.as_rule() == Rule::ident)
                        .ok_or_else(|| syntax_error("missing signal name".into(), 0, 0))?;
                    ir.signed_signals.insert(ident.as_str().to_string());
                }

                (_, rule) => {
                    return Err(ScriptError::MisplacedStatement {
                        found: describe(rule).to_string(),
                        section: name.clone(),
                        span: item_span,
                        src: named_src(source, filename),
                    })
                }
            }
        }
    }

    // A trailing drive set with no `#n` becomes a one-step segment; an
    // empty `[PROCESS]` still yields one so the engine has a tail to
    // persist.
    if !pending.is_empty() || (saw_process && ir.segments.is_empty()) {
        let mut drives = sticky.clone();
        for (k, v) in pending.drain(..) {
            drives.insert(k, v);
        }
        ir.segments.push(Segment { drives, hold: 1 });
    }

    Ok(ir)
}

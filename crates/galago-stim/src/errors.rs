use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ScriptError {
    #[error("syntax error: {message}")]
    #[diagnostic(code(galago::stim::syntax))]
    Syntax {
        message: String,
        #[label("here")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("unknown section `[{name}]`")]
    #[diagnostic(
        code(galago::stim::unknown_section),
        help("valid sections are [CLOCK], [PROPERTY] and [PROCESS]")
    )]
    UnknownSection {
        name: String,
        #[label("unknown section")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("section `[{name}]` appears more than once")]
    #[diagnostic(code(galago::stim::duplicate_section))]
    DuplicateSection {
        name: String,
        #[label("second occurrence")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("`[PROPERTY]` must contain exactly one predicate line")]
    #[diagnostic(code(galago::stim::duplicate_property))]
    DuplicatePropertyLine {
        #[label("extra predicate")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("clock period must be a positive number of steps")]
    #[diagnostic(code(galago::stim::bad_clock_period))]
    BadClockPeriod {
        #[label("bad period")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("`#` hold count must be at least 1")]
    #[diagnostic(code(galago::stim::bad_hold))]
    BadHoldCount {
        #[label("bad hold count")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("{found} is not valid inside `[{section}]`")]
    #[diagnostic(code(galago::stim::misplaced_statement))]
    MisplacedStatement {
        found: String,
        section: String,
        #[label("not allowed here")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = ScriptError::UnknownSection {
            name: "WAVES".into(),
            span: (0, 7).into(),
            src: miette::NamedSource::new("tb.txt", "[WAVES]".to_owned()),
        };
        assert_eq!(err.to_string(), "unknown section `[WAVES]`");

        let err = ScriptError::MisplacedStatement {
            found: "a hold directive".into(),
            section: "CLOCK".into(),
            span: (0, 2).into(),
            src: miette::NamedSource::new("tb.txt", "#5".to_owned()),
        };
        assert_eq!(
            err.to_string(),
            "a hold directive is not valid inside `[CLOCK]`"
        );
    }
}

use miette::Diagnostic;
use thiserror::Error;

/// Why a BTOR2 line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Btor2Reason {
    #[error("unknown operation `{0}`")]
    UnknownOp(String),
    #[error("reference to undefined node {0}")]
    UndefinedRef(i64),
    #[error("sort mismatch: {0}")]
    SortMismatch(String),
    #[error("width mismatch: {0}")]
    WidthMismatch(String),
    #[error("state `{0}` has more than one init")]
    DuplicateInit(String),
    #[error("state `{0}` has more than one next")]
    DuplicateNext(String),
    #[error("state `{0}` has no next")]
    DanglingState(String),
    #[error("malformed line: {0}")]
    Malformed(String),
}

/// Fatal parse error, reported with the offending line.
#[derive(Debug, Error, Diagnostic)]
#[error("BTOR2 parse error at line {line_no}: {reason}")]
#[diagnostic(code(galago::btor2::parse))]
pub struct Btor2Error {
    pub line_no: usize,
    pub reason: Btor2Reason,
    #[label("here")]
    pub span: miette::SourceSpan,
    #[source_code]
    pub src: miette::NamedSource<String>,
}

impl Btor2Error {
    pub fn new(
        reason: Btor2Reason,
        line_no: usize,
        offset: usize,
        len: usize,
        source: &str,
        filename: &str,
    ) -> Self {
        Btor2Error {
            line_no,
            reason,
            span: (offset, len).into(),
            src: miette::NamedSource::new(filename, source.to_owned()),
        }
    }
}

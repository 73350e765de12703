use thiserror::Error;

/// What is wrong with a rule line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptErrorKind {
    #[error("script contains no rules")]
    Empty,
    #[error("rule has no '| label'")]
    MissingLabel,
    #[error("syntax error at column {column}: {message}")]
    Syntax { column: usize, message: String },
    #[error("unknown address '@{0}'")]
    UnknownAddress(String),
    #[error("unknown modifier '+{0}'")]
    UnknownModifier(String),
    #[error("{addresses} address(es) but {values} value list(s)")]
    ArityMismatch { addresses: usize, values: usize },
    #[error("label '{0}' is already defined")]
    DuplicateLabel(String),
    #[error("reference to unknown rule '{0}'")]
    UnknownRule(String),
    #[error("invalid element: {0}")]
    InvalidElement(String),
}

/// An invalid script, pointing at the offending line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid script at line {line} ('{text}'): {kind}")]
pub struct ScriptError {
    /// 1-based line number in the script source, 0 for whole-script errors
    pub line: usize,
    pub text: String,
    pub kind: ScriptErrorKind,
}

impl ScriptError {
    pub fn new(line: usize, text: impl Into<String>, kind: ScriptErrorKind) -> Self {
        Self {
            line,
            text: text.into(),
            kind,
        }
    }

    pub fn empty() -> Self {
        Self::new(0, "", ScriptErrorKind::Empty)
    }
}

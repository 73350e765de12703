use thiserror::Error;

/// Failures loading a lexicon or word-list resource. Always fatal.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("cannot read resource {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed entry in {source_name} at line {line}: '{text}'")]
    Malformed {
        source_name: String,
        line: usize,
        text: String,
    },
}

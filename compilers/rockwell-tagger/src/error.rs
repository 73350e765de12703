use rockwell_protocol::ProtocolError;
use rockwell_script::ScriptError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("no rule labeled '{0}'")]
    UnknownRule(String),
    #[error("window {start}..{end} is outside a sentence of {len} tokens")]
    WindowOutOfBounds { start: usize, end: usize, len: usize },
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

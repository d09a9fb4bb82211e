// error.rs
use std::path::PathBuf;

/// Errors raised while building, parsing, resolving or comparing handshapes.
#[derive(Debug, thiserror::Error)]
pub enum HandshapeError {
    /// Malformed joint values or degree-of-freedom counts.
    #[error("validation error: {0}")]
    Validation(String),
    /// Bad digit member sets, overlapping finger groups or digit DOF mismatches.
    #[error("digit error: {0}")]
    Digit(String),
    /// Malformed prosodic-model notation.
    #[error("notation error: {0}")]
    Notation(String),
    /// Caller misuse, e.g. comparing strings of different length.
    #[error("specification error: {0}")]
    Specification(String),
    /// A letter or symbolic feature value with no table entry.
    #[error("unknown {kind} '{key}'")]
    Lookup { kind: &'static str, key: String },
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error in {name}: {source}")]
    Table {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("asset '{0}' is not embedded")]
    Asset(String),
    #[error("renderer failed: {0}")]
    Render(String),
}

impl HandshapeError {
    pub(crate) fn lookup(kind: &'static str, key: impl Into<String>) -> Self {
        Self::Lookup { kind, key: key.into() }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, HandshapeError>;

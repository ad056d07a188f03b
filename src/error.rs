//! Error kinds shared by the decoder, the narrowing views and the registry.
use crate::value::Shape;

pub type Result<T, E = ValueError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    /// Malformed token stream, or a token the decoder cannot accept here.
    #[error("parse error: {message}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    /// A narrowing accessor was invoked on an incompatible variant.
    #[error("unexpected type: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: Shape,
    },

    /// Structural decode into a typed target failed.
    #[error("cannot decode {target} at JSON path {path}: {message}")]
    Decode {
        target: String,
        path: String,
        message: String,
    },

    #[error("no decoder registered for `{0}`")]
    UnknownTarget(String),
}

impl ValueError {
    pub fn type_mismatch(expected: &'static str, found: Shape) -> Self {
        Self::TypeMismatch { expected, found }
    }

    /// Classify a `serde_json` failure raised while reading a token stream.
    pub(crate) fn parse(error: serde_json::Error) -> Self {
        Self::Parse {
            line: error.line(),
            column: error.column(),
            message: error.to_string(),
        }
    }

    pub fn is_parse(&self) -> bool { matches!(self, Self::Parse { .. }) }
    pub fn is_type_mismatch(&self) -> bool { matches!(self, Self::TypeMismatch { .. }) }
    pub fn is_decode(&self) -> bool { matches!(self, Self::Decode { .. }) }
}

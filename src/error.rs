use thiserror::Error;

#[derive(Debug, Error)]
pub enum PostprocessError {
    #[error("inference payload is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("inference payload has no usable `{path}`: {reason}")]
    Schema { path: String, reason: String },

    /// An element of the prediction vector that cannot become an integer class label.
    #[error("prediction element {index} ({value}) cannot be converted to an integer")]
    TypeConversion { index: usize, value: String },
}

impl PostprocessError {
    pub(crate) fn schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable name used in error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse_error",
            Self::Schema { .. } => "schema_error",
            Self::TypeConversion { .. } => "type_conversion_error",
        }
    }
}

pub type Result<T, E = PostprocessError> = std::result::Result<T, E>;

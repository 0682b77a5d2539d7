//! Error types for the Slant workspace.

use thiserror::Error;

/// Result type alias using the Slant error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Slant crates.
///
/// Scorers never surface these to their callers; they exist for configuration,
/// model loading, model inference, verdict storage and the confidence domain
/// guard.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A score outside the domain expected by the receiving function
    #[error("Score {score} is outside the {domain} domain")]
    ScoreOutOfRange { score: f64, domain: &'static str },

    /// Sentiment model failure (loading or inference)
    #[error("Model error: {0}")]
    Model(String),

    /// Verdict store failure
    #[error("Store error: {0}")]
    Store(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an error with additional context.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Check if this is a model error.
    pub fn is_model(&self) -> bool {
        match self {
            Self::Model(_) => true,
            Self::WithContext { source, .. } => source.is_model(),
            _ => false,
        }
    }

    /// Check if this is a domain violation.
    pub fn is_out_of_range(&self) -> bool {
        match self {
            Self::ScoreOutOfRange { .. } => true,
            Self::WithContext { source, .. } => source.is_out_of_range(),
            _ => false,
        }
    }
}

/// Extension trait for adding context to any error type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_with_context() {
        let err = Error::Model("weights missing".into());
        let with_ctx = err.with_context("loading sentiment model");
        assert!(matches!(with_ctx, Error::WithContext { .. }));
        assert!(with_ctx.is_model());
        assert_eq!(
            with_ctx.to_string(),
            "loading sentiment model: Model error: weights missing"
        );
    }

    #[test]
    fn test_out_of_range_display() {
        let err = Error::ScoreOutOfRange {
            score: -0.4,
            domain: "[0, 1] confidence",
        };
        assert!(err.is_out_of_range());
        assert!(err.to_string().contains("-0.4"));
    }

    #[test]
    fn test_result_ext_wraps_io() {
        let raw: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        let err = raw.context("reading weights").unwrap_err();
        assert!(matches!(err, Error::WithContext { .. }));
        assert!(!err.is_model());
    }
}

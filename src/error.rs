//! Error types for the classification engine.
//!
//! Classification itself never fails: per-element faults degrade into
//! zero-confidence results. These errors surface only from the helpers that
//! parse raw JSON records, serialize output, or read files in the CLI.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while preparing input or emitting output.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::enum_variant_names)] // "Invalid" prefix is intentional for clarity
pub enum Error {
    /// A raw record could not be read as a text element
    #[error("Invalid element at index {index}: {reason}")]
    InvalidElement {
        /// Position of the record in the input sequence
        index: usize,
        /// Reason the record was rejected
        reason: String,
    },

    /// Document metrics were missing or malformed
    #[error("Invalid document metrics: {0}")]
    InvalidMetrics(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_element_error() {
        let err = Error::InvalidElement {
            index: 7,
            reason: "expected an object".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("index 7"));
        assert!(msg.contains("expected an object"));
    }

    #[test]
    fn test_invalid_metrics_error() {
        let err = Error::InvalidMetrics("baseFontSize is not a number".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("Invalid document metrics"));
        assert!(msg.contains("baseFontSize"));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(format!("{}", err).starts_with("JSON error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(format!("{}", err).contains("missing.json"));
    }
}

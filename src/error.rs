use thiserror::Error;

/// Error type for codegrid-rs operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodeGridError {
    /// A value is malformed or outside its domain (e.g. longitude 200).
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },
    /// A value is well formed but geometrically inconsistent (e.g. outside its UTM zone).
    #[error("{field} out of range: {message}")]
    Range { field: &'static str, message: String },
    /// No registered cell matches a designator or a point.
    #[error("Not found: {0}")]
    NotFound(String),
    /// The projection engine failed to build or run a transform.
    #[error("Projection error: {0}")]
    ProjectionError(String),
    /// Cell definitions could not be parsed.
    #[error("Cell definition parse error: {0}")]
    CellParseError(String),
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(String),
    /// CSV parsing or writing error.
    #[error("CSV error: {0}")]
    CsvError(String),
}

impl CodeGridError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        CodeGridError::Validation {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn range(field: &'static str, message: impl Into<String>) -> Self {
        CodeGridError::Range {
            field,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_constraint() {
        let err = CodeGridError::validation("longitude", "should be between [-180, 180), got 200");
        assert_eq!(
            err.to_string(),
            "Invalid longitude: should be between [-180, 180), got 200"
        );

        let err = CodeGridError::range("latitude", "should be between [-80, 84], got 85");
        assert_eq!(
            err.to_string(),
            "latitude out of range: should be between [-80, 84], got 85"
        );

        let err = CodeGridError::NotFound("no cell for designator 'XYZ'".to_string());
        assert_eq!(err.to_string(), "Not found: no cell for designator 'XYZ'");
    }
}

//! Error types for textableslib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building, combining, or rendering tables
#[derive(Error, Debug)]
pub enum TexTableError {
    /// The format template is not a valid single-slot template
    #[error("invalid format template '{template}': {message}")]
    InvalidFormat { template: String, message: String },

    /// The format template cannot be applied to a cell value
    #[error("format template '{template}' cannot be applied to {value}: {message}")]
    FormatMismatch {
        template: String,
        value: String,
        message: String,
    },

    /// Operation that is deliberately not supported
    #[error("not implemented: {0}")]
    Unsupported(String),

    /// Tables or labels do not line up
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Stretch column position does not exist in the column format
    #[error("column format '{column_format}' has no position {position}")]
    ColumnFormat {
        column_format: String,
        position: usize,
    },

    /// Concatenation of an empty sequence of tables
    #[error("no tables to concatenate")]
    EmptyConcat,

    /// Failed to write rendered markup
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_format_message() {
        let err = TexTableError::ColumnFormat {
            column_format: "lll".to_string(),
            position: 5,
        };
        assert_eq!(err.to_string(), "column format 'lll' has no position 5");
    }

    #[test]
    fn test_file_write_keeps_source() {
        use std::error::Error as _;

        let err = TexTableError::FileWrite {
            path: PathBuf::from("/nowhere/table.tex"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/nowhere/table.tex"));
        assert!(err.source().is_some());
    }
}

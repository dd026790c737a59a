//! Error types for parsing and aggregation.

use std::path::PathBuf;

/// Errors raised while parsing a single measurement row.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Row field count does not match the expected record shape.
    WrongArity {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// Row field count matches no supported record shape.
    UnknownShape { line: usize, found: usize },
    /// Key field is not a positive integer.
    InvalidKey { line: usize, field: String },
    /// Value field is not a floating-point number.
    InvalidValue {
        line: usize,
        column: usize,
        field: String,
    },
}

impl ParseError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::WrongArity { .. } => "ROW_WRONG_ARITY",
            ParseError::UnknownShape { .. } => "ROW_UNKNOWN_SHAPE",
            ParseError::InvalidKey { .. } => "ROW_INVALID_KEY",
            ParseError::InvalidValue { .. } => "ROW_INVALID_VALUE",
        }
    }

    /// One-based line number of the offending row.
    pub fn line(&self) -> usize {
        match self {
            ParseError::WrongArity { line, .. }
            | ParseError::UnknownShape { line, .. }
            | ParseError::InvalidKey { line, .. }
            | ParseError::InvalidValue { line, .. } => *line,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::WrongArity {
                line,
                expected,
                found,
            } => write!(
                f,
                "[{}] line {}: expected {} fields, found {}",
                self.code(),
                line,
                expected,
                found
            ),
            ParseError::UnknownShape { line, found } => write!(
                f,
                "[{}] line {}: {} fields match no record shape (expected 3 or 4)",
                self.code(),
                line,
                found
            ),
            ParseError::InvalidKey { line, field } => write!(
                f,
                "[{}] line {}: key '{}' is not a positive integer",
                self.code(),
                line,
                field
            ),
            ParseError::InvalidValue {
                line,
                column,
                field,
            } => write!(
                f,
                "[{}] line {}: field {} '{}' is not a number",
                self.code(),
                line,
                column,
                field
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors that can occur while aggregating measurement sources.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateError {
    /// Source file does not exist.
    SourceNotFound { path: PathBuf },
    /// Source file could not be read.
    Io { path: PathBuf, message: String },
    /// Source file contains a malformed row.
    Parse { path: PathBuf, error: ParseError },
    /// Source file uses a different record shape than the rest of the run.
    ShapeMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
    /// Two sources share the same variant id.
    DuplicateVariant(String),
    /// Key is missing from one of the variants.
    MismatchedKeys { key: u64, variant: String },
    /// Entry does not match the declared variant count or tuple arity.
    InconsistentArity {
        key: u64,
        expected: usize,
        found: usize,
    },
    /// Key appears more than once in a prebuilt entry list.
    DuplicateKey(u64),
}

impl AggregateError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            AggregateError::SourceNotFound { .. } => "SOURCE_NOT_FOUND",
            AggregateError::Io { .. } => "SOURCE_IO",
            AggregateError::Parse { .. } => "SOURCE_MALFORMED",
            AggregateError::ShapeMismatch { .. } => "SOURCE_SHAPE_MISMATCH",
            AggregateError::DuplicateVariant(_) => "VARIANT_DUPLICATE",
            AggregateError::MismatchedKeys { .. } => "VARIANT_MISSING_KEY",
            AggregateError::InconsistentArity { .. } => "ENTRY_INCONSISTENT_ARITY",
            AggregateError::DuplicateKey(_) => "ENTRY_DUPLICATE_KEY",
        }
    }
}

impl std::fmt::Display for AggregateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateError::SourceNotFound { path } => write!(
                f,
                "[{}] Source file {} does not exist",
                self.code(),
                path.display()
            ),
            AggregateError::Io { path, message } => write!(
                f,
                "[{}] Failed to read {}: {}",
                self.code(),
                path.display(),
                message
            ),
            AggregateError::Parse { path, error } => {
                write!(f, "[{}] {}: {}", self.code(), path.display(), error)
            }
            AggregateError::ShapeMismatch {
                path,
                expected,
                found,
            } => write!(
                f,
                "[{}] {} has {}-field rows but earlier sources have {}-field rows",
                self.code(),
                path.display(),
                found,
                expected
            ),
            AggregateError::DuplicateVariant(variant) => {
                write!(f, "[{}] Variant '{}' given twice", self.code(), variant)
            }
            AggregateError::MismatchedKeys { key, variant } => write!(
                f,
                "[{}] Key {} has no measurements in variant '{}'",
                self.code(),
                key,
                variant
            ),
            AggregateError::InconsistentArity {
                key,
                expected,
                found,
            } => write!(
                f,
                "[{}] Key {}: expected {} values, found {}",
                self.code(),
                key,
                expected,
                found
            ),
            AggregateError::DuplicateKey(key) => {
                write!(f, "[{}] Key {} appears more than once", self.code(), key)
            }
        }
    }
}

impl std::error::Error for AggregateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AggregateError::Parse { error, .. } => Some(error),
            _ => None,
        }
    }
}

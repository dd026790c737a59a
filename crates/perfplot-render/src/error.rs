//! Render error types.

use std::path::PathBuf;

/// Errors that can occur while planning or writing charts.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Row width disagrees with the declared variants and record shape.
    InconsistentArity {
        key: u64,
        expected: usize,
        found: usize,
    },
    /// Two distinct rows share a key after canonicalization.
    ConflictingRows { key: u64 },
    /// Output directory could not be created.
    Io { path: PathBuf, message: String },
    /// Chart backend failed to draw or encode an image.
    Backend { path: PathBuf, message: String },
}

impl RenderError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            RenderError::InconsistentArity { .. } => "RENDER_INCONSISTENT_ARITY",
            RenderError::ConflictingRows { .. } => "RENDER_CONFLICTING_ROWS",
            RenderError::Io { .. } => "RENDER_IO",
            RenderError::Backend { .. } => "RENDER_BACKEND",
        }
    }
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::InconsistentArity {
                key,
                expected,
                found,
            } => write!(
                f,
                "[{}] Row for key {} has {} values, expected {}",
                self.code(),
                key,
                found,
                expected
            ),
            RenderError::ConflictingRows { key } => write!(
                f,
                "[{}] Key {} has conflicting rows",
                self.code(),
                key
            ),
            RenderError::Io { path, message } => write!(
                f,
                "[{}] Failed to prepare {}: {}",
                self.code(),
                path.display(),
                message
            ),
            RenderError::Backend { path, message } => write!(
                f,
                "[{}] Failed to draw {}: {}",
                self.code(),
                path.display(),
                message
            ),
        }
    }
}

impl std::error::Error for RenderError {}

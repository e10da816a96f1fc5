/// Crate-level error types for lynks diagnostics.
use std::path::PathBuf;

/// Every fatal condition in lynks. Each variant names the path and the
/// operation that failed so the operator can act without a debugger.
/// Unresolved links are not errors; they are a normal classification.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Config file exists but is not valid JSON or TOML.
    #[error("config invalid: {}: {reason}", path.display())]
    ConfigParse {
        /// Path to the offending config file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// Two paths could not be placed on a common absolute basis.
    #[error("incompatible paths: link from {} to {}", from.display(), to.display())]
    IncompatiblePaths {
        /// Document the link lives in.
        from: PathBuf,
        /// Document the link should point at.
        to: PathBuf,
    },

    /// A document could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Document that failed to read.
        path: PathBuf,
        /// The wrapped I/O error.
        source: std::io::Error,
    },

    /// The terminal could not be set up, drawn to, or restored.
    #[error("terminal: {0}")]
    Terminal(
        /// The wrapped I/O error from crossterm or ratatui.
        std::io::Error,
    ),

    /// Directory traversal under the configured root failed.
    #[error("failed to scan {}: {reason}", root.display())]
    Walk {
        /// Message from walkdir.
        reason: String,
        /// Configured document root.
        root: PathBuf,
    },

    /// A rewritten document could not be persisted.
    #[error("failed to {operation} {}: {source}", path.display())]
    Write {
        /// Which step failed: create, write, or persist.
        operation: &'static str,
        /// Document being rewritten.
        path: PathBuf,
        /// The wrapped I/O error.
        source: std::io::Error,
    },
}

impl Error {
    /// Shorthand for a failed document read.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        return Self::Read {
            path: path.into(),
            source,
        };
    }
}

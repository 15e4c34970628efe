//! Error types for archive installation operations.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for installation operations.
///
/// The `Display` output of these variants is what ends up in a
/// `Outcome::Failed { reason }`, so the messages are written for end users.
#[derive(Debug, Error)]
pub enum InstallError {
    /// No destination root was supplied by the configuration layer.
    #[error("destination root is not configured")]
    MissingDestinationRoot,

    /// Archive file not found at the specified path.
    #[error("archive not found: {0}")]
    SourceNotFound(PathBuf),

    /// The archive path has no usable base name to derive a folder from.
    #[error("cannot derive an install folder name from: {0}")]
    BadArchiveName(PathBuf),

    /// The external extraction tool could not be located.
    #[error("tool not found: install 7-Zip or add 7z to the search path")]
    ToolUnavailable,

    /// The external extraction tool ran but reported failure.
    #[error("tool exited with code {0}")]
    ToolExit(i32),

    /// The archive is corrupted or not actually the format its extension claims.
    #[error("corrupted archive: {0}")]
    Corrupted(String),

    /// The destination root is not writable even after the elevation path.
    #[error("destination root is not writable: {0}")]
    PermissionDenied(PathBuf),

    /// Relaunching the process with elevation failed to start.
    #[error("could not request elevation: {0}")]
    ElevationFailed(String),

    /// An I/O error occurred during installation.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

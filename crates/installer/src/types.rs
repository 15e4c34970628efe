//! Type definitions for archive installation.

use crate::error::InstallError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One request to install the contents of a single archive file.
///
/// Immutable for the lifetime of the job; `name` is the archive's base
/// filename with its extension stripped and is used verbatim as the install
/// folder name.
#[derive(Debug, Clone)]
pub struct ArchiveJob {
    /// Path to the source archive file
    pub source: PathBuf,

    /// Configured parent directory for all installs
    pub destination_root: PathBuf,

    /// Folder name derived from the archive filename
    pub name: String,
}

impl ArchiveJob {
    /// Build a job from an archive path and the configured destination root.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive does not exist or its filename yields
    /// an empty folder name.
    pub fn new(source: &Path, destination_root: &Path) -> Result<Self, InstallError> {
        if !source.exists() {
            return Err(InstallError::SourceNotFound(source.to_path_buf()));
        }

        let name = source
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_owned)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| InstallError::BadArchiveName(source.to_path_buf()))?;

        Ok(Self {
            source: source.to_path_buf(),
            destination_root: destination_root.to_path_buf(),
            name,
        })
    }
}

/// The computed install target for a job.
#[derive(Debug, Clone)]
pub struct InstallTarget {
    /// `destination_root/name`
    pub path: PathBuf,

    /// Whether the target already existed before this job
    pub pre_existing: bool,

    /// Whether the pre-existing target contains any entries
    pub non_empty: bool,
}

/// Latest progress snapshot for the running job.
///
/// `percent` is clamped to 0..=100 by the bus. Monotonic growth is a soft
/// expectation only; the external tool adapter parses free text and may
/// report duplicates or out-of-order values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressState {
    pub percent: u8,
    pub message: String,
}

/// Terminal result of one installation job, produced exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status")]
pub enum Outcome {
    /// Extraction finished and all entries were written
    Success { destination: PathBuf },

    /// The user declined to replace an existing non-empty target
    Cancelled,

    /// Extraction failed; partial output is retained on disk
    Failed { reason: String },
}

/// Result of the pre-extraction write-permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationDecision {
    /// The destination root is writable (or we already relaunched); install now
    Proceed,

    /// Re-invoke the whole program elevated; do not install in this process
    RelaunchElevated,
}

/// Completion notice handed to the presentation layer on a terminal outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,

    /// Install folder the notice refers to
    pub destination: Option<PathBuf>,

    /// Optional action the presentation layer may offer
    pub action: Option<NotifyAction>,
}

/// Actions a notification can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyAction {
    /// Open the install folder in the platform file browser
    OpenDestination,
}

/// How a call to [`crate::Installer::run`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStatus {
    /// The job ran to a terminal outcome in this process
    Finished(Outcome),

    /// An elevated copy of the process was launched; nothing was installed here
    Relaunched,
}

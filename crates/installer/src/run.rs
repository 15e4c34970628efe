//! Pipeline orchestration.
//!
//! `Installer` wires the guard, resolver, dispatcher and bus together: one
//! job per call, extraction on a dedicated worker thread, terminal outcome
//! delivered through the bus exactly once.

use crate::error::InstallError;
use crate::progress::{InstallObserver, ProgressBus};
use crate::resolve::{self, ConfirmReplace};
use crate::types::{ArchiveJob, ElevationDecision, InstallStatus, Outcome};
use crate::{dispatch, elevation};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Installs one archive into a per-archive folder under the destination root.
pub struct Installer {
    destination_root: PathBuf,
    bus: Arc<ProgressBus>,
    confirm: Option<Box<ConfirmReplace>>,
}

impl Installer {
    /// Create an installer for a configured destination root.
    ///
    /// The root comes from the settings collaborator; the core never invents
    /// a default.
    pub fn new(destination_root: impl Into<PathBuf>) -> Self {
        Self {
            destination_root: destination_root.into(),
            bus: Arc::new(ProgressBus::new()),
            confirm: None,
        }
    }

    /// Register the observer that receives progress and outcome callbacks.
    pub fn subscribe(&self, observer: Arc<dyn InstallObserver>) {
        self.bus.subscribe(observer);
    }

    /// Supply the replace-confirmation callback. Without one, conflicting
    /// installs are declined.
    pub fn confirm_replace_with<F>(&mut self, confirm: F)
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        self.confirm = Some(Box::new(confirm));
    }

    /// The shared progress bus, for observers that poll instead of subscribe.
    pub fn bus(&self) -> &ProgressBus {
        &self.bus
    }

    /// Run one installation job to a terminal outcome.
    ///
    /// Pre-flight failures (missing archive, unusable name) surface as
    /// errors; everything past the resolver is folded into the
    /// [`Outcome`] delivered through the bus.
    pub fn run(&self, archive: &Path) -> Result<InstallStatus, InstallError> {
        let relaunch_args: Vec<OsString> = std::env::args_os().skip(1).collect();
        self.run_with_relaunch_args(archive, &relaunch_args)
    }

    /// Same as [`run`](Self::run) with explicit arguments for the elevated
    /// relaunch.
    pub fn run_with_relaunch_args(
        &self,
        archive: &Path,
        relaunch_args: &[OsString],
    ) -> Result<InstallStatus, InstallError> {
        let job = ArchiveJob::new(archive, &self.destination_root)?;
        tracing::info!(archive = %job.source.display(), name = %job.name, "starting install job");
        self.bus.begin_job();

        // Permission gate before any destination mutation
        match elevation::check_elevation(&job.destination_root)? {
            ElevationDecision::Proceed => {}
            ElevationDecision::RelaunchElevated => {
                elevation::relaunch_elevated(relaunch_args)?;
                return Ok(InstallStatus::Relaunched);
            }
        }

        let target = resolve::resolve(&job)?;
        if !resolve::clear_if_confirmed(&target, self.confirm.as_deref())? {
            let outcome = Outcome::Cancelled;
            self.bus.finish(&outcome);
            return Ok(InstallStatus::Finished(outcome));
        }

        // Extraction runs on a worker thread and this thread blocks on its
        // result. The thread boundary is there to contain panics: a panicking
        // codec surfaces as a Failed outcome instead of unwinding through the
        // caller, and the bus always gets its terminal delivery below.
        let result = std::thread::scope(|scope| {
            scope
                .spawn(|| dispatch::extract(&job.source, &target.path, self.bus.as_ref()))
                .join()
        });

        let outcome = match result {
            Ok(Ok(())) => Outcome::Success {
                destination: target.path.clone(),
            },
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "extraction failed");
                Outcome::Failed {
                    reason: e.to_string(),
                }
            }
            Err(_) => Outcome::Failed {
                reason: "extraction worker panicked".to_owned(),
            },
        };

        self.bus.finish(&outcome);
        Ok(InstallStatus::Finished(outcome))
    }
}

//! # Installer
//!
//! Installs the contents of an archive into a per-archive folder under a
//! configured destination root, with live progress reporting and a
//! completion notification.
//!
//! ZIP archives are decoded in-process; every other format is delegated to
//! an external 7-Zip subprocess whose free-text output is parsed for
//! percentage markers. Conflicting destinations are only replaced after an
//! explicit confirmation, and an unwritable destination root triggers a
//! one-time elevated relaunch of the whole program instead of a mid-stream
//! permission failure.
//!
//! ## Example
//!
//! ```rust,no_run
//! use installer::{InstallObserver, InstallStatus, Installer, Outcome};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! struct Console;
//!
//! impl InstallObserver for Console {
//!     fn on_progress(&self, percent: u8, message: &str) {
//!         println!("{percent:>3}% {message}");
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut installer = Installer::new("/installs");
//! installer.subscribe(Arc::new(Console));
//! installer.confirm_replace_with(|path| {
//!     println!("replacing {}", path.display());
//!     true
//! });
//!
//! match installer.run(Path::new("app.zip"))? {
//!     InstallStatus::Finished(Outcome::Success { destination }) => {
//!         println!("installed to {}", destination.display());
//!     }
//!     InstallStatus::Finished(outcome) => println!("{outcome:?}"),
//!     InstallStatus::Relaunched => {} // an elevated copy took over
//! }
//! # Ok(())
//! # }
//! ```

pub mod dispatch;
pub mod elevation;
pub mod error;
pub mod notify;
pub mod progress;
pub mod reader;
pub mod resolve;
pub mod run;
pub mod tool;
pub mod types;

// Re-export main types
pub use error::InstallError;
pub use progress::{InstallObserver, ProgressBus, ProgressSink};
pub use resolve::ConfirmReplace;
pub use run::Installer;
pub use types::{
    ArchiveJob, ElevationDecision, InstallStatus, InstallTarget, Notification, NotifyAction,
    Outcome, ProgressState,
};

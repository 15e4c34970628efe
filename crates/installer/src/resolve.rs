//! Destination resolver.
//!
//! Computes the install target from the job and guards destructive
//! replacement behind an externally supplied confirmation callback. With no
//! callback available the job is declined; an unattended run must never
//! silently overwrite.

use crate::error::InstallError;
use crate::types::{ArchiveJob, InstallTarget};
use std::fs;
use std::path::Path;

/// Synchronous replace-confirmation callback supplied by the presentation layer.
pub type ConfirmReplace = dyn Fn(&Path) -> bool + Send + Sync;

/// Compute the install target for a job.
pub fn resolve(job: &ArchiveJob) -> Result<InstallTarget, InstallError> {
    let path = job.destination_root.join(&job.name);
    let pre_existing = path.exists();
    // A non-directory at the target path always conflicts; extraction could
    // not create the folder over it.
    let non_empty = if pre_existing && path.is_dir() {
        fs::read_dir(&path)?.next().is_some()
    } else {
        pre_existing
    };

    Ok(InstallTarget {
        path,
        pre_existing,
        non_empty,
    })
}

/// Clear a conflicting target if the caller confirms replacement.
///
/// Returns `false` when the job should be cancelled: the target is
/// pre-existing and non-empty, and either no confirmation mechanism exists or
/// the callback declined. On `true` the target path is free to extract into.
pub fn clear_if_confirmed(
    target: &InstallTarget,
    confirm: Option<&ConfirmReplace>,
) -> Result<bool, InstallError> {
    if !(target.pre_existing && target.non_empty) {
        return Ok(true);
    }

    match confirm {
        Some(confirm) if confirm(&target.path) => {
            tracing::debug!(target = %target.path.display(), "replacing existing destination");
            if target.path.is_dir() {
                fs::remove_dir_all(&target.path)?;
            } else {
                fs::remove_file(&target.path)?;
            }
            Ok(true)
        }
        Some(_) => Ok(false),
        None => {
            tracing::warn!(
                target = %target.path.display(),
                "destination exists and no confirmation mechanism is available"
            );
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn job_in(root: &Path) -> ArchiveJob {
        let archive = root.join("app.zip");
        fs::write(&archive, b"stub").unwrap();
        ArchiveJob::new(&archive, root).unwrap()
    }

    #[test]
    fn test_resolve_fresh_target() {
        let temp_dir = TempDir::new().unwrap();
        let target = resolve(&job_in(temp_dir.path())).unwrap();

        assert_eq!(target.path, temp_dir.path().join("app"));
        assert!(!target.pre_existing);
        assert!(!target.non_empty);
    }

    #[test]
    fn test_resolve_existing_empty_target() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("app")).unwrap();

        let target = resolve(&job_in(temp_dir.path())).unwrap();
        assert!(target.pre_existing);
        assert!(!target.non_empty);

        // Empty target needs no confirmation at all
        assert!(clear_if_confirmed(&target, None).unwrap());
    }

    #[test]
    fn test_decline_keeps_contents() {
        let temp_dir = TempDir::new().unwrap();
        let stale = temp_dir.path().join("app").join("stale.txt");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, b"old").unwrap();

        let target = resolve(&job_in(temp_dir.path())).unwrap();
        assert!(target.pre_existing && target.non_empty);

        let declined: Box<ConfirmReplace> = Box::new(|_: &Path| false);
        assert!(!clear_if_confirmed(&target, Some(&*declined)).unwrap());
        assert_eq!(fs::read(&stale).unwrap(), b"old");
    }

    #[test]
    fn test_no_callback_is_a_decline() {
        let temp_dir = TempDir::new().unwrap();
        let stale = temp_dir.path().join("app").join("stale.txt");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, b"old").unwrap();

        let target = resolve(&job_in(temp_dir.path())).unwrap();
        assert!(!clear_if_confirmed(&target, None).unwrap());
        assert!(stale.exists());
    }

    #[test]
    fn test_file_at_target_is_a_conflict() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("app");
        fs::write(&blocker, b"not a directory").unwrap();

        let target = resolve(&job_in(temp_dir.path())).unwrap();
        assert!(target.pre_existing && target.non_empty);

        // Declining keeps the file in place
        let declined: Box<ConfirmReplace> = Box::new(|_: &Path| false);
        assert!(!clear_if_confirmed(&target, Some(&*declined)).unwrap());
        assert_eq!(fs::read(&blocker).unwrap(), b"not a directory");

        // Accepting removes it so the folder can be created
        let accepted: Box<ConfirmReplace> = Box::new(|_: &Path| true);
        assert!(clear_if_confirmed(&target, Some(&*accepted)).unwrap());
        assert!(!blocker.exists());
    }

    #[test]
    fn test_accept_removes_tree() {
        let temp_dir = TempDir::new().unwrap();
        let stale = temp_dir.path().join("app").join("nested").join("stale.txt");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, b"old").unwrap();

        let target = resolve(&job_in(temp_dir.path())).unwrap();
        let accepted: Box<ConfirmReplace> = Box::new(|_: &Path| true);
        assert!(clear_if_confirmed(&target, Some(&*accepted)).unwrap());
        assert!(!target.path.exists());
    }
}

//! Elevation guard.
//!
//! Runs once, before any extraction or destination mutation: probes the
//! destination root for write access and, when that fails, asks the caller to
//! relaunch the whole program elevated instead of failing mid-stream.

use crate::error::InstallError;
use crate::types::ElevationDecision;
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Marker set on the relaunched process so the guard never loops.
pub const ELEVATED_ENV: &str = "ZIPINSTALL_ELEVATED";

fn already_elevated() -> bool {
    std::env::var_os(ELEVATED_ENV).is_some()
}

/// Decide whether installation may proceed in this process.
///
/// An unwritable root in a process that already relaunched is a hard error;
/// the one-time recovery attempt has been spent.
pub fn check_elevation(root: &Path) -> Result<ElevationDecision, InstallError> {
    if is_writable(root) {
        return Ok(ElevationDecision::Proceed);
    }
    if already_elevated() {
        tracing::warn!(root = %root.display(), "root still unwritable after elevation");
        return Err(InstallError::PermissionDenied(root.to_path_buf()));
    }
    tracing::info!(root = %root.display(), "destination root not writable, elevation required");
    Ok(ElevationDecision::RelaunchElevated)
}

/// Probe write access by creating the root (if absent) and a scratch file in it.
fn is_writable(root: &Path) -> bool {
    if fs::create_dir_all(root).is_err() {
        return false;
    }
    tempfile::Builder::new()
        .prefix(".zipinstall-probe")
        .tempfile_in(root)
        .is_ok()
}

/// Launch an elevated copy of this program with the given arguments.
///
/// The caller must not install anything afterwards; the elevated copy owns
/// the job from here.
pub fn relaunch_elevated(args: &[OsString]) -> Result<(), InstallError> {
    let exe = std::env::current_exe()?;
    tracing::info!(exe = %exe.display(), "relaunching elevated");
    spawn_elevated(&exe, args)
}

#[cfg(unix)]
fn spawn_elevated(exe: &Path, args: &[OsString]) -> Result<(), InstallError> {
    let marker = format!("{ELEVATED_ENV}=1");

    // pkexec first, sudo as fallback. Both reset the environment, so the
    // loop-prevention marker rides in through `env`.
    for launcher in ["pkexec", "sudo"] {
        let status = Command::new(launcher)
            .arg("env")
            .arg(&marker)
            .arg(exe)
            .args(args)
            .status();
        match status {
            Ok(status) if status.success() => return Ok(()),
            Ok(status) => {
                return Err(InstallError::ElevationFailed(format!(
                    "{launcher} exited with code {}",
                    status.code().unwrap_or(-1)
                )))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(InstallError::ElevationFailed(e.to_string())),
        }
    }
    Err(InstallError::ElevationFailed(
        "neither pkexec nor sudo is available".to_owned(),
    ))
}

#[cfg(windows)]
fn spawn_elevated(exe: &Path, args: &[OsString]) -> Result<(), InstallError> {
    // ShellExecute gives the elevated process a fresh environment, so the
    // marker variable does not survive; an elevated process passes the write
    // probe instead.
    let arg_list = args
        .iter()
        .map(|a| format!("'{}'", a.to_string_lossy().replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(",");
    let mut command = format!(
        "Start-Process -Verb RunAs -FilePath '{}'",
        exe.display().to_string().replace('\'', "''")
    );
    if !arg_list.is_empty() {
        command.push_str(&format!(" -ArgumentList @({arg_list})"));
    }

    Command::new("powershell")
        .args(["-NoProfile", "-Command", &command])
        .status()
        .map_err(|e| InstallError::ElevationFailed(e.to_string()))
        .and_then(|status| {
            if status.success() {
                Ok(())
            } else {
                Err(InstallError::ElevationFailed(format!(
                    "powershell exited with code {}",
                    status.code().unwrap_or(-1)
                )))
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writable_root_proceeds() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(
            check_elevation(&temp_dir.path().join("installs")).unwrap(),
            ElevationDecision::Proceed
        );
        // The probe is allowed to create the root itself
        assert!(temp_dir.path().join("installs").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_unwritable_root_requests_relaunch() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("locked");
        fs::create_dir(&root).unwrap();
        fs::set_permissions(&root, fs::Permissions::from_mode(0o555)).unwrap();

        // Running as root the mode bits do not apply; nothing to verify then
        if is_writable(&root) {
            return;
        }

        assert_eq!(
            check_elevation(&root).unwrap(),
            ElevationDecision::RelaunchElevated
        );
        // Nothing may be created under the locked root
        assert!(fs::read_dir(&root).unwrap().next().is_none());

        fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();
    }
}

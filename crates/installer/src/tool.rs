//! External tool adapter.
//!
//! Every format we do not decode in-process is delegated to 7-Zip, invoked as
//! `7z x <archive> -o<dest> -y`. The child's output is streamed line by line
//! and scanned for a percentage marker; unparsable lines are still forwarded
//! as progress messages.

use crate::error::InstallError;
use crate::progress::ProgressSink;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

static PERCENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)%").expect("valid percent pattern"));

/// Pull a percentage marker out of one line of tool output.
///
/// Returns the raw parsed value; callers clamp to 0..=100 before reporting.
pub fn parse_percent(line: &str) -> Option<u32> {
    PERCENT
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// Locate the 7z executable: search path first, then well-known install
/// directories. First match wins.
pub fn locate_tool() -> Option<PathBuf> {
    if let Ok(exe) = which::which("7z") {
        return Some(exe);
    }
    known_locations().into_iter().find(|p| p.exists())
}

#[cfg(windows)]
fn known_locations() -> Vec<PathBuf> {
    let program_files =
        std::env::var("ProgramFiles").unwrap_or_else(|_| r"C:\Program Files".to_owned());
    vec![
        Path::new(&program_files).join("7-Zip").join("7z.exe"),
        PathBuf::from(r"C:\Program Files (x86)\7-Zip\7z.exe"),
    ]
}

#[cfg(not(windows))]
fn known_locations() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/usr/local/bin/7z"),
        PathBuf::from("/opt/homebrew/bin/7z"),
        PathBuf::from("/usr/bin/7z"),
    ]
}

/// Extract `archive` into `dest` via the external tool.
pub fn extract_with_tool(
    archive: &Path,
    dest: &Path,
    sink: &dyn ProgressSink,
) -> Result<(), InstallError> {
    let exe = locate_tool().ok_or(InstallError::ToolUnavailable)?;
    tracing::debug!(tool = %exe.display(), "using external extraction tool");
    run_tool(&exe, archive, dest, sink)
}

/// Run one extraction tool invocation and stream its output into the sink.
///
/// Both output pipes are fully drained before waiting on the child, so no
/// trailing lines are lost.
pub(crate) fn run_tool(
    exe: &Path,
    archive: &Path,
    dest: &Path,
    sink: &dyn ProgressSink,
) -> Result<(), InstallError> {
    let mut child = Command::new(exe)
        .arg("x")
        .arg(archive)
        .arg(format!("-o{}", dest.display()))
        .arg("-y")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                InstallError::ToolUnavailable
            } else {
                InstallError::Io(e)
            }
        })?;

    let stdout = child.stdout.take().expect("stdout was piped");
    let stderr = child.stderr.take().expect("stderr was piped");

    std::thread::scope(|scope| {
        scope.spawn(|| forward_lines(stderr, sink));
        forward_lines(stdout, sink);
    });

    let status = child.wait()?;
    if !status.success() {
        return Err(InstallError::ToolExit(status.code().unwrap_or(-1)));
    }
    Ok(())
}

fn forward_lines<R: std::io::Read>(pipe: R, sink: &dyn ProgressSink) {
    for line in BufReader::new(pipe).lines() {
        let Ok(line) = line else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_percent(line) {
            Some(percent) => sink.report(percent.min(100), line),
            None => sink.message(line),
        }
    }
}

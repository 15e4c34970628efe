//! Extraction dispatcher.
//!
//! Picks a strategy by file extension alone; nothing here sniffs archive
//! contents. An archive with a lying extension fails inside the chosen
//! strategy instead.

use crate::error::InstallError;
use crate::progress::ProgressSink;
use crate::{reader, tool};
use std::fs;
use std::path::Path;

/// Which adapter will handle a given archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The in-process ZIP reader
    ZipReader,

    /// The external 7z subprocess, covering every other extension
    ExternalTool,
}

/// Select the extraction strategy for an archive path (case-insensitive).
pub fn strategy_for(archive: &Path) -> Strategy {
    let is_zip = archive
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("zip"))
        .unwrap_or(false);

    if is_zip {
        Strategy::ZipReader
    } else {
        Strategy::ExternalTool
    }
}

/// Extract `archive` into `dest`, creating the destination first.
pub fn extract(archive: &Path, dest: &Path, sink: &dyn ProgressSink) -> Result<(), InstallError> {
    fs::create_dir_all(dest)?;

    match strategy_for(archive) {
        Strategy::ZipReader => {
            tracing::debug!(archive = %archive.display(), "extracting with native zip reader");
            reader::extract_zip(archive, dest, sink)
        }
        Strategy::ExternalTool => {
            tracing::debug!(archive = %archive.display(), "extracting with external tool");
            tool::extract_with_tool(archive, dest, sink)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_goes_to_native_reader() {
        assert_eq!(strategy_for(Path::new("app.zip")), Strategy::ZipReader);
        assert_eq!(strategy_for(Path::new("APP.ZIP")), Strategy::ZipReader);
        assert_eq!(strategy_for(Path::new("dir/with.dots/a.Zip")), Strategy::ZipReader);
    }

    #[test]
    fn test_everything_else_goes_to_tool() {
        assert_eq!(strategy_for(Path::new("pkg.7z")), Strategy::ExternalTool);
        assert_eq!(strategy_for(Path::new("pkg.rar")), Strategy::ExternalTool);
        assert_eq!(strategy_for(Path::new("pkg.tar.gz")), Strategy::ExternalTool);
        // Unknown and missing extensions included
        assert_eq!(strategy_for(Path::new("pkg.xyz")), Strategy::ExternalTool);
        assert_eq!(strategy_for(Path::new("pkg")), Strategy::ExternalTool);
    }
}

//! Native ZIP reader.
//!
//! Decodes the one container format we handle in-process, entry by entry in
//! stored order, reporting `floor(done / total * 100)` after each entry. A
//! failed entry aborts the job; entries already written stay on disk.

use crate::error::InstallError;
use crate::progress::ProgressSink;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

/// Extract a ZIP archive into `dest`, which must already exist.
pub fn extract_zip(archive: &Path, dest: &Path, sink: &dyn ProgressSink) -> Result<(), InstallError> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(file).map_err(map_zip_error)?;

    let total = zip.len();
    if total == 0 {
        sink.report(100, "archive is empty");
        return Ok(());
    }

    for index in 0..total {
        let mut entry = zip.by_index(index).map_err(map_zip_error)?;
        let entry_name = entry.name().to_owned();
        let percent = ((index + 1) * 100 / total) as u32;

        // enclosed_name rejects entries that would escape the destination.
        // A skipped entry still counts as processed for progress purposes.
        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!(entry = %entry_name, "skipping entry with unsafe path");
            sink.report(percent, &format!("skipped {entry_name}"));
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
        } else {
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out_file = File::create(&out_path)?;
            io::copy(&mut entry, &mut out_file)?;
        }

        sink.report(percent, &entry_name);
    }

    Ok(())
}

fn map_zip_error(e: ZipError) -> InstallError {
    match e {
        ZipError::Io(io_err) => InstallError::Io(io_err),
        other => InstallError::Corrupted(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressBus;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::{SimpleFileOptions, ZipWriter};

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        for (name, contents) in entries {
            if name.ends_with('/') {
                zip.add_directory(name.trim_end_matches('/'), SimpleFileOptions::default())
                    .unwrap();
            } else {
                zip.start_file(*name, SimpleFileOptions::default()).unwrap();
                zip.write_all(contents).unwrap();
            }
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_extracts_entries_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("app.zip");
        let dest = temp_dir.path().join("out");
        fs::create_dir_all(&dest).unwrap();

        write_zip(
            &archive,
            &[
                ("readme.txt", b"hello".as_slice()),
                ("bin/", b"".as_slice()),
                ("bin/tool.exe", b"\x00binary\x01".as_slice()),
            ],
        );

        let bus = ProgressBus::new();
        extract_zip(&archive, &dest, &bus).unwrap();

        assert_eq!(fs::read(dest.join("readme.txt")).unwrap(), b"hello");
        assert_eq!(fs::read(dest.join("bin/tool.exe")).unwrap(), b"\x00binary\x01");
        assert_eq!(bus.snapshot().percent, 100);
    }

    #[test]
    fn test_unsafe_final_entry_still_reaches_100() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("app.zip");
        let dest = temp_dir.path().join("out");
        fs::create_dir_all(&dest).unwrap();

        write_zip(
            &archive,
            &[
                ("ok.txt", b"safe".as_slice()),
                ("../escape.txt", b"unsafe".as_slice()),
            ],
        );

        let bus = ProgressBus::new();
        extract_zip(&archive, &dest, &bus).unwrap();

        // The escaping entry is skipped but still advances progress
        assert_eq!(fs::read(dest.join("ok.txt")).unwrap(), b"safe");
        assert!(!temp_dir.path().join("escape.txt").exists());
        assert_eq!(bus.snapshot().percent, 100);
    }

    #[test]
    fn test_empty_archive_still_reaches_100() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("empty.zip");
        let dest = temp_dir.path().join("out");
        fs::create_dir_all(&dest).unwrap();

        write_zip(&archive, &[]);

        let bus = ProgressBus::new();
        extract_zip(&archive, &dest, &bus).unwrap();
        assert_eq!(bus.snapshot().percent, 100);
    }

    #[test]
    fn test_not_a_zip_is_corrupted() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("fake.zip");
        fs::write(&archive, b"this is not a zip file").unwrap();
        let dest = temp_dir.path().join("out");
        fs::create_dir_all(&dest).unwrap();

        let bus = ProgressBus::new();
        let result = extract_zip(&archive, &dest, &bus);
        assert!(matches!(result, Err(InstallError::Corrupted(_))));
    }
}

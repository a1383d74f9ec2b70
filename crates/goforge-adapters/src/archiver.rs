//! Deterministic zip packing of a staging tree.
//!
//! Entries are regular files only, visited in lexicographic order, named
//! with `/` separators relative to the root, stamped 1980-01-01 with mode
//! 0644. Identical trees produce identical bytes.

use std::{
    io::{Cursor, Write},
    path::Path,
};

use tracing::{debug, instrument};
use walkdir::WalkDir;
use zip::{CompressionMethod, DateTime, ZipWriter, write::SimpleFileOptions};

use goforge_core::{
    application::{ApplicationError, ports::Archiver},
    error::GenResult,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiver;

impl ZipArchiver {
    pub fn new() -> Self {
        Self
    }
}

impl Archiver for ZipArchiver {
    #[instrument(skip(self), fields(root = %root.display()))]
    fn pack(&self, root: &Path) -> GenResult<Vec<u8>> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644);

        let mut buffer = Vec::new();
        let mut entries = 0usize;
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));

            for entry in WalkDir::new(root).sort_by_file_name() {
                let entry = entry.map_err(|e| archive_error(format!("Failed to walk tree: {}", e)))?;
                if !entry.file_type().is_file() {
                    continue;
                }

                let name = entry_name(root, entry.path())?;
                let content = std::fs::read(entry.path()).map_err(|e| {
                    archive_error(format!("Failed to read {}: {}", entry.path().display(), e))
                })?;

                zip.start_file(name.as_str(), options)
                    .map_err(|e| archive_error(format!("Failed to add {}: {}", name, e)))?;
                zip.write_all(&content)
                    .map_err(|e| archive_error(format!("Failed to write {}: {}", name, e)))?;
                entries += 1;
            }

            zip.finish()
                .map_err(|e| archive_error(format!("Failed to finish archive: {}", e)))?;
        }

        debug!(entries, bytes = buffer.len(), "Archive packed");
        Ok(buffer)
    }
}

/// Root-relative entry name joined with `/`.
fn entry_name(root: &Path, path: &Path) -> GenResult<String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| archive_error(format!("{} is outside the staging root", path.display())))?;

    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

fn archive_error(reason: String) -> goforge_core::error::GenError {
    ApplicationError::ArchiveFailed { reason }.into()
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("internal/app")).unwrap();
        std::fs::create_dir_all(root.join("docs")).unwrap();
        std::fs::write(root.join("go.mod"), "module example.com/demo\n").unwrap();
        std::fs::write(root.join("internal/app/server.go"), "package app\n").unwrap();
        std::fs::write(root.join(".gitignore"), "bin/\n").unwrap();
        dir
    }

    fn names(bytes: &[u8]) -> Vec<String> {
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        archive.file_names().map(String::from).collect()
    }

    #[test]
    fn archives_files_only_in_sorted_order() {
        let dir = tree();
        let bytes = ZipArchiver::new().pack(dir.path()).unwrap();

        let mut entries = names(&bytes);
        let listed = entries.clone();
        entries.sort();
        assert_eq!(listed, entries);
        assert_eq!(listed, vec![".gitignore", "go.mod", "internal/app/server.go"]);
    }

    #[test]
    fn entry_contents_round_trip() {
        let dir = tree();
        let bytes = ZipArchiver::new().pack(dir.path()).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut content = String::new();
        archive
            .by_name("internal/app/server.go")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "package app\n");
    }

    #[test]
    fn identical_trees_produce_identical_bytes() {
        let a = tree();
        let b = tree();
        let archiver = ZipArchiver::new();
        assert_eq!(archiver.pack(a.path()).unwrap(), archiver.pack(b.path()).unwrap());
    }

    #[test]
    fn missing_root_fails() {
        let err = ZipArchiver::new()
            .pack(Path::new("/does/not/exist/anywhere"))
            .unwrap_err();
        assert_eq!(err.kind(), goforge_core::error::ErrorKind::FileSystem);
    }
}

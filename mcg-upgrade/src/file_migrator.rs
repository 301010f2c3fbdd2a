//! Per-file migration
//!
//! A file set is a directory plus an extension filter, optionally guarded by a
//! marker path whose existence means the migration already ran. Each matching
//! file is migrated on its own: one file failing is logged and counted, and
//! the rest still run.
//!
//! Destinations are always fully written before a source is removed, so an
//! interrupted run leaves the legacy source in place for the next one.

use crate::error::{IoContext, Result};
use crate::legacy::LINE_ENDING;
use crate::report::BatchResult;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Files in `dir` whose extension is `extension`
#[derive(Debug, Clone)]
pub struct FileSet<'a> {
    pub dir: &'a Path,
    pub extension: &'a str,
    /// Existing marker means the migration already completed
    pub done_marker: Option<&'a Path>,
}

/// What a scan of a file set found
#[derive(Debug, PartialEq, Eq)]
pub enum FileSetScan {
    SourceAbsent,
    AlreadyMigrated,
    /// Files to migrate, sorted by path (possibly empty)
    Files(Vec<PathBuf>),
}

impl<'a> FileSet<'a> {
    pub fn new(dir: &'a Path, extension: &'a str) -> Self {
        Self {
            dir,
            extension,
            done_marker: None,
        }
    }

    pub fn with_done_marker(mut self, marker: &'a Path) -> Self {
        self.done_marker = Some(marker);
        self
    }

    /// Classify the set; fails only when the directory cannot be enumerated
    pub fn scan(&self) -> Result<FileSetScan> {
        if !self.dir.is_dir() {
            return Ok(FileSetScan::SourceAbsent);
        }
        if self.done_marker.is_some_and(|marker| marker.exists()) {
            return Ok(FileSetScan::AlreadyMigrated);
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(self.dir).at(self.dir)? {
            let path = entry.at(self.dir)?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == self.extension) {
                files.push(path);
            }
        }
        files.sort();

        Ok(FileSetScan::Files(files))
    }
}

/// Run `migrate` on every file, isolating failures per file
pub fn migrate_each<F>(step: &str, files: &[PathBuf], mut migrate: F) -> BatchResult
where
    F: FnMut(&Path) -> Result<()>,
{
    let mut batch = BatchResult::default();

    for file in files {
        match migrate(file) {
            Ok(()) => {
                debug!("{}: migrated {}", step, file.display());
                batch.record_success();
            }
            Err(e) => {
                error!("{}: failed to migrate {}: {}", step, file.display(), e);
                batch.record_failure();
            }
        }
    }

    batch
}

/// Read a text file as lines (terminators stripped)
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).at(path)?;
    Ok(content.lines().map(str::to_string).collect())
}

/// Read lines, treating a missing file as empty
pub fn read_lines_or_empty(path: &Path) -> Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content.lines().map(str::to_string).collect()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e).at(path),
    }
}

/// Write lines, each followed by the platform terminator
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push_str(LINE_ENDING);
    }
    write_file(path, &content)
}

/// Replace `path` with `contents` via a sibling temp file and a rename
///
/// Creates the parent directory when needed. The target is either the old
/// content or the new content, never a truncated mix.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).at(parent)?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    fs::write(&temp_path, contents).at(&temp_path)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e).at(path);
    }
    Ok(())
}

/// Delete a file; the caller guarantees its replacement is already written
pub fn remove_source(path: &Path) -> Result<()> {
    fs::remove_file(path).at(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpgradeError;
    use tempfile::TempDir;

    #[test]
    fn test_scan_missing_dir_is_absent() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("levels");
        assert_eq!(FileSet::new(&missing, "prev").scan().unwrap(), FileSetScan::SourceAbsent);
    }

    #[test]
    fn test_scan_respects_done_marker() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("prev");
        fs::create_dir(&marker).unwrap();
        fs::write(dir.path().join("main.lvl.prev"), "x").unwrap();

        let scan = FileSet::new(dir.path(), "prev").with_done_marker(&marker).scan().unwrap();
        assert_eq!(scan, FileSetScan::AlreadyMigrated);
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["b.env", "a.env", "a.properties", "c.env.bak"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("dir.env")).unwrap();

        let scan = FileSet::new(dir.path(), "env").scan().unwrap();
        assert_eq!(
            scan,
            FileSetScan::Files(vec![dir.path().join("a.env"), dir.path().join("b.env")])
        );
    }

    #[test]
    fn test_migrate_each_isolates_failures() {
        let files: Vec<PathBuf> = ["1", "bad", "2", "bad", "3"].iter().map(PathBuf::from).collect();
        let mut visited = Vec::new();

        let batch = migrate_each("test", &files, |path| {
            visited.push(path.to_path_buf());
            if path == Path::new("bad") {
                Err(UpgradeError::malformed("bad", "nope"))
            } else {
                Ok(())
            }
        });

        assert_eq!(batch, BatchResult { processed: 3, failed: 2 });
        assert_eq!(visited.len(), 5);
    }

    #[test]
    fn test_write_file_creates_parent_and_cleans_temp() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("extra").join("bots").join("main.json");

        write_file(&target, "[]").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "[]");
        assert!(!dir.path().join("extra").join("bots").join("main.json.tmp").exists());
    }

    #[test]
    fn test_write_and_read_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lines.txt");
        let lines = vec!["one".to_string(), "two".to_string()];

        write_lines(&path, &lines).unwrap();
        assert_eq!(read_lines(&path).unwrap(), lines);
        assert!(read_lines_or_empty(&dir.path().join("missing.txt")).unwrap().is_empty());
    }
}

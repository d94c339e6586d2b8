//! Input document discovery.

use std::fs::{self, ReadDir};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Lazy iterator over documents in a directory with a matching extension.
///
/// Non-recursive and non-restartable: entries are pulled from the
/// underlying directory handle as the iterator advances. Directory
/// entries that cannot be read are logged and skipped.
pub struct DocumentIter {
    entries: ReadDir,
    extension: String,
}

impl DocumentIter {
    fn new(entries: ReadDir, extension: &str) -> Self {
        Self {
            entries,
            extension: extension.to_lowercase(),
        }
    }

    fn matches(&self, path: &Path) -> bool {
        if !path.is_file() {
            return false;
        }
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase() == self.extension)
            .unwrap_or(false)
    }
}

impl Iterator for DocumentIter {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            match self.entries.next()? {
                Ok(entry) => {
                    let path = entry.path();
                    if self.matches(&path) {
                        return Some(path);
                    }
                }
                Err(e) => {
                    log::warn!("Skipping unreadable directory entry: {}", e);
                }
            }
        }
    }
}

/// List documents in `dir` whose extension matches `extension`
/// (case-insensitive, without the leading dot).
///
/// Returns an error if the directory itself cannot be read. An empty
/// directory yields an iterator that produces nothing; the caller decides
/// how to report that.
pub fn documents_in(dir: &Path, extension: &str) -> Result<DocumentIter> {
    let entries = fs::read_dir(dir)?;
    Ok(DocumentIter::new(entries, extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).unwrap();
    }

    #[test]
    fn test_finds_matching_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.pdf");
        touch(dir.path(), "b.PDF");
        touch(dir.path(), "notes.txt");

        let mut found: Vec<String> = documents_in(dir.path(), "pdf")
            .unwrap()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        found.sort();
        assert_eq!(found, vec!["a.pdf", "b.PDF"]);
    }

    #[test]
    fn test_empty_directory_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let found: Vec<_> = documents_in(dir.path(), "pdf").unwrap().collect();
        assert!(found.is_empty());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(documents_in(&missing, "pdf").is_err());
    }

    #[test]
    fn test_subdirectories_are_not_recursed() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();
        std::fs::create_dir(dir.path().join("inner")).unwrap();
        touch(&dir.path().join("inner"), "deep.pdf");
        touch(dir.path(), "top.pdf");

        let found: Vec<_> = documents_in(dir.path(), "pdf").unwrap().collect();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("top.pdf"));
    }
}

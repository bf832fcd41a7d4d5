// Packaging domain models - what gets archived and what came out of it.

use std::path::PathBuf;

/// Files ending in this suffix are left out of the archive.
pub const DEFAULT_BACKUP_SUFFIX: &str = ".backup";

/// Settings for building an extension archive.
#[derive(Debug, Clone)]
pub struct PackageConfig {
    pub backup_suffix: String,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}

impl PackageConfig {
    pub fn is_backup(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.backup_suffix)
    }
}

/// A file found under the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Location on disk
    pub path: PathBuf,
    /// Name inside the archive, relative to the source root with `/` separators
    pub archive_name: String,
}

/// What `build_archive` produced.
#[derive(Debug, Clone)]
pub struct ArchiveReport {
    pub output: PathBuf,
    /// Entries written into the archive
    pub written: usize,
    /// Entries counted after reopening the finished archive
    pub verified: usize,
}

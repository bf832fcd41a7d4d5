// Extension packaging - zips a directory tree for upload.
//
// Every regular file under the source directory is stored under its relative
// path with Deflate compression. Backup files are skipped. The finished archive
// is reopened and its entries counted as a sanity check.

use super::package_models::{ArchiveReport, FileEntry, PackageConfig};
use std::fs::File;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;
use zip::{write::FileOptions, CompressionMethod, ZipArchive, ZipWriter};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Source path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to walk source directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Cannot derive an archive name for {}", .0.display())]
    Path(PathBuf),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Zip {
        context: String,
        #[source]
        source: zip::result::ZipError,
    },
}

fn io_error(context: impl Into<String>) -> impl FnOnce(std::io::Error) -> PackageError {
    let context = context.into();
    move |source| PackageError::Io { context, source }
}

fn zip_error(context: impl Into<String>) -> impl FnOnce(zip::result::ZipError) -> PackageError {
    let context = context.into();
    move |source| PackageError::Zip { context, source }
}

// ============================================================================
// OPERATIONS
// ============================================================================

/// Fail early when the source is missing, before anything touches the output.
fn ensure_source_dir(source: &Path) -> Result<(), PackageError> {
    if !source.exists() {
        return Err(PackageError::SourceNotFound(source.to_path_buf()));
    }
    if !source.is_dir() {
        return Err(PackageError::NotADirectory(source.to_path_buf()));
    }
    Ok(())
}

/// Relative path joined with `/`, whatever the host separator is.
fn archive_name(relative: &Path) -> Result<String, PackageError> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => match part.to_str() {
                Some(part) => parts.push(part),
                None => return Err(PackageError::Path(relative.to_path_buf())),
            },
            Component::CurDir => {}
            _ => return Err(PackageError::Path(relative.to_path_buf())),
        }
    }
    if parts.is_empty() {
        return Err(PackageError::Path(relative.to_path_buf()));
    }
    Ok(parts.join("/"))
}

/// List every file under `source` that belongs in the archive, sorted by archive name.
///
/// Only file names are checked against the backup suffix; a directory whose
/// name ends in the suffix is still descended into. A symlink to a file is
/// stored with the target's contents; symlinked directories are not descended.
pub fn collect_entries(
    source: &Path,
    config: &PackageConfig,
) -> Result<Vec<FileEntry>, PackageError> {
    ensure_source_dir(source)?;

    let mut entries = Vec::new();
    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry?;
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }

        if config.is_backup(&entry.file_name().to_string_lossy()) {
            tracing::debug!(path = %entry.path().display(), "Skipping backup file");
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| PackageError::Path(entry.path().to_path_buf()))?;

        entries.push(FileEntry {
            archive_name: archive_name(relative)?,
            path: entry.into_path(),
        });
    }

    entries.sort_by(|a, b| a.archive_name.cmp(&b.archive_name));
    Ok(entries)
}

/// Write the archive and return how many entries went into it.
///
/// A failure part-way through leaves whatever was written on disk.
pub fn write_archive(
    source: &Path,
    output: &Path,
    config: &PackageConfig,
) -> Result<usize, PackageError> {
    let mut entries = collect_entries(source, config)?;

    // An earlier archive sitting inside the source tree must not end up inside the new one.
    if let Ok(existing) = output.canonicalize() {
        entries.retain(|entry| {
            entry.path.canonicalize().ok().as_deref() != Some(existing.as_path())
        });
    }

    let file = File::create(output)
        .map_err(io_error(format!("Failed to create archive {}", output.display())))?;
    let mut zip = ZipWriter::new(file);
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in &entries {
        tracing::debug!(name = %entry.archive_name, "Adding file to archive");

        zip.start_file(entry.archive_name.as_str(), options)
            .map_err(zip_error(format!("Failed to add {} to archive", entry.archive_name)))?;

        let mut reader = File::open(&entry.path)
            .map_err(io_error(format!("Failed to read {}", entry.path.display())))?;
        std::io::copy(&mut reader, &mut zip).map_err(io_error(format!(
            "Failed to write {} into archive",
            entry.archive_name
        )))?;
    }

    zip.finish().map_err(zip_error("Failed to finalize archive"))?;

    tracing::info!(
        output = %output.display(),
        files = entries.len(),
        "Archive written"
    );
    Ok(entries.len())
}

/// Reopen a finished archive read-only and count its entries.
pub fn verify_archive(output: &Path) -> Result<usize, PackageError> {
    let file = File::open(output)
        .map_err(io_error(format!("Failed to reopen archive {}", output.display())))?;
    let archive = ZipArchive::new(file).map_err(zip_error("Failed to read archive"))?;
    Ok(archive.len())
}

/// Build the archive for `source` at `output`, then verify it.
pub fn build_archive(
    source: &Path,
    output: &Path,
    config: &PackageConfig,
) -> Result<ArchiveReport, PackageError> {
    let written = write_archive(source, output, config)?;
    let verified = verify_archive(output)?;

    if verified != written {
        tracing::warn!(written, verified, "Archive entry count differs from files written");
    }

    Ok(ArchiveReport {
        output: output.to_path_buf(),
        written,
        verified,
    })
}

// ============================================================================
// TESTS
// ============================================================================

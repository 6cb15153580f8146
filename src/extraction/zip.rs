use crate::error::{ExtractError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Archive extractor for ZIP files
///
/// Extraction is all-or-abort: the first entry that cannot be validated or
/// written stops the run with an error. Entries extracted before the failure
/// stay on disk; re-running overwrites them because created files truncate.
pub struct ZipExtractor;

impl ZipExtractor {
    /// Extract an archive into `dest_path`, returning the extracted file paths
    ///
    /// Creates the destination directory (and any entry parent directories)
    /// as needed. Directory entries are materialized but not included in the
    /// returned list. On Unix, stored permission bits are applied to
    /// extracted files and directories.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Open`] when the archive is missing or not a
    /// valid zip file, [`ExtractError::PathTraversal`] when an entry's
    /// resolved path would escape `dest_path` (nothing is written for that
    /// entry), and [`ExtractError::Entry`] when reading or writing an
    /// individual entry fails.
    pub fn extract(archive_path: &Path, dest_path: &Path) -> Result<Vec<PathBuf>> {
        debug!(?archive_path, ?dest_path, "extracting zip archive");

        std::fs::create_dir_all(dest_path)?;

        let file = std::fs::File::open(archive_path).map_err(|e| ExtractError::Open {
            archive: archive_path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut archive = zip::ZipArchive::new(file).map_err(|e| ExtractError::Open {
            archive: archive_path.to_path_buf(),
            reason: format!("not a valid zip archive: {e}"),
        })?;

        let mut extracted_files = Vec::new();

        for i in 0..archive.len() {
            let entry = archive.by_index(i).map_err(|e| ExtractError::Entry {
                archive: archive_path.to_path_buf(),
                entry: format!("#{i}"),
                reason: e.to_string(),
            })?;

            if let Some(file_path) = Self::extract_entry(entry, dest_path, archive_path)? {
                extracted_files.push(file_path);
            }
        }

        info!(
            ?archive_path,
            extracted_count = extracted_files.len(),
            "zip extraction complete"
        );

        Ok(extracted_files)
    }

    /// Extract a single entry to disk, creating directories as needed
    ///
    /// Returns `Ok(None)` for directory entries and `Ok(Some(path))` for
    /// files. The entry's stored name is validated first; a name that does
    /// not resolve to a path inside the destination is a fatal
    /// [`ExtractError::PathTraversal`].
    fn extract_entry(
        mut entry: zip::read::ZipFile,
        dest_path: &Path,
        archive_path: &Path,
    ) -> Result<Option<PathBuf>> {
        let name = entry.name().to_string();

        // enclosed_name rejects absolute paths and any `..` components
        let file_path = match entry.enclosed_name() {
            Some(relative) => dest_path.join(relative),
            None => {
                return Err(ExtractError::PathTraversal {
                    archive: archive_path.to_path_buf(),
                    entry: name,
                }
                .into());
            }
        };

        if entry.is_dir() {
            std::fs::create_dir_all(&file_path).map_err(|e| ExtractError::Entry {
                archive: archive_path.to_path_buf(),
                entry: name.clone(),
                reason: format!("failed to create directory: {e}"),
            })?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    std::fs::set_permissions(&file_path, std::fs::Permissions::from_mode(mode))
                        .map_err(|e| ExtractError::Entry {
                            archive: archive_path.to_path_buf(),
                            entry: name,
                            reason: format!("failed to set permissions: {e}"),
                        })?;
                }
            }

            return Ok(None);
        }

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ExtractError::Entry {
                archive: archive_path.to_path_buf(),
                entry: name.clone(),
                reason: format!("failed to create parent directories: {e}"),
            })?;
        }

        let mut outfile = std::fs::File::create(&file_path).map_err(|e| ExtractError::Entry {
            archive: archive_path.to_path_buf(),
            entry: name.clone(),
            reason: format!("failed to create output file: {e}"),
        })?;

        std::io::copy(&mut entry, &mut outfile).map_err(|e| ExtractError::Entry {
            archive: archive_path.to_path_buf(),
            entry: name.clone(),
            reason: format!("failed to write entry: {e}"),
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                std::fs::set_permissions(&file_path, std::fs::Permissions::from_mode(mode))
                    .map_err(|e| ExtractError::Entry {
                        archive: archive_path.to_path_buf(),
                        entry: name,
                        reason: format!("failed to set permissions: {e}"),
                    })?;
            }
        }

        Ok(Some(file_path))
    }
}

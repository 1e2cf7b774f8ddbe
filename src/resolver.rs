//! Match real files in an artifact directory to catalog definitions

use crate::error::{ReportError, Result};
use crate::ArtifactDefinition;
use chrono::{DateTime, Utc};
use globset::GlobSet;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A regular file found directly inside the artifact directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedFile {
    pub name: String,
    pub path: PathBuf,
}

/// One listing of an artifact directory, in filesystem order (not sorted)
#[derive(Debug, Clone, Default)]
pub struct DirectoryListing {
    files: Vec<ListedFile>,
}

impl DirectoryListing {
    /// List the regular files directly inside `dir`.
    ///
    /// Files whose names match `ignore` are left out. Any failure to reach or
    /// list the directory is a [`ReportError::DirectoryAccess`].
    pub fn read(dir: &Path, ignore: Option<&GlobSet>) -> Result<Self> {
        let access_err = |source: std::io::Error| ReportError::DirectoryAccess {
            path: dir.to_path_buf(),
            source,
        };

        let meta = fs::metadata(dir).map_err(access_err)?;
        if !meta.is_dir() {
            return Err(access_err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "not a directory",
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = match entry {
                Ok(entry) => entry,
                // Only the root failing is fatal; a bad entry (e.g. a dangling link) is skipped.
                Err(e) if e.depth() > 0 => continue,
                Err(e) => {
                    let msg = e.to_string();
                    return Err(access_err(e.into_io_error().unwrap_or_else(|| {
                        std::io::Error::new(std::io::ErrorKind::Other, msg)
                    })));
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if ignore.is_some_and(|set| set.is_match(&name)) {
                continue;
            }
            files.push(ListedFile {
                name,
                path: entry.into_path(),
            });
        }

        Ok(Self { files })
    }

    /// Build a listing from names in a given order (paths are relative to `dir`)
    pub fn from_names<I, S>(dir: &Path, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let files = names
            .into_iter()
            .map(|n| {
                let name = n.into();
                ListedFile {
                    path: dir.join(&name),
                    name,
                }
            })
            .collect();
        Self { files }
    }

    pub fn files(&self) -> &[ListedFile] {
        &self.files
    }

    /// First file in listing order that the definition recognizes
    pub fn resolve(&self, definition: &ArtifactDefinition) -> Option<&ListedFile> {
        self.files.iter().find(|f| definition.matches(&f.name))
    }
}

/// Metadata and content of a matched artifact file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub name: String,
    pub size_bytes: u64,
    pub last_modified: DateTime<Utc>,
    pub sha256: String,
    /// Content decoded as UTF-8, with invalid bytes replaced
    pub content: String,
}

impl ResolvedFile {
    /// Read size, mtime and content of a listed file
    pub fn read(file: &ListedFile) -> Result<Self> {
        let read_err = |source| ReportError::Read {
            path: file.path.clone(),
            source,
        };
        let meta = fs::metadata(&file.path).map_err(read_err)?;
        let modified = meta.modified().map_err(read_err)?;
        let bytes = fs::read(&file.path).map_err(read_err)?;

        Ok(Self {
            name: file.name.clone(),
            size_bytes: meta.len(),
            last_modified: DateTime::<Utc>::from(modified),
            sha256: hash_content(&bytes),
            content: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// SHA-256 of raw bytes as lowercase hex
pub fn hash_content(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ArtifactCatalog;
    use crate::config::build_ignore_set;
    use tempfile::TempDir;

    fn definition(id: &str) -> ArtifactDefinition {
        ArtifactCatalog::builtin()
            .unwrap()
            .definitions()
            .find(|d| d.id == id)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_first_listing_order_match_wins() {
        let dir = Path::new("/artifacts");
        let listing = DirectoryListing::from_names(
            dir,
            ["notes.md", "Hadolint-run2.txt", "hadolint.txt"],
        );
        let found = listing.resolve(&definition("hadolint")).unwrap();
        assert_eq!(found.name, "Hadolint-run2.txt");
        assert_eq!(found.path, dir.join("Hadolint-run2.txt"));
    }

    #[test]
    fn test_no_match_is_none() {
        let listing = DirectoryListing::from_names(Path::new("."), ["semgrep.log", "readme.txt"]);
        assert!(listing.resolve(&definition("semgrep")).is_none());
    }

    #[test]
    fn test_prefix_overlap_follows_listing_order() {
        // build-container also recognizes the report file; listing order decides.
        let listing = DirectoryListing::from_names(
            Path::new("."),
            ["build-container-report.txt", "build-container.txt"],
        );
        assert_eq!(
            listing.resolve(&definition("build-container")).unwrap().name,
            "build-container-report.txt"
        );
        assert_eq!(
            listing.resolve(&definition("build-container-report")).unwrap().name,
            "build-container-report.txt"
        );
    }

    #[test]
    fn test_read_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = DirectoryListing::read(&missing, None).unwrap_err();
        assert!(matches!(err, ReportError::DirectoryAccess { .. }));
    }

    #[test]
    fn test_read_file_instead_of_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("clamav.txt");
        fs::write(&file, "x").unwrap();
        let err = DirectoryListing::read(&file, None).unwrap_err();
        assert!(matches!(err, ReportError::DirectoryAccess { .. }));
        let cause = std::error::Error::source(&err).unwrap();
        assert!(cause.to_string().contains("not a directory"));
    }

    #[test]
    fn test_read_skips_subdirectories_and_ignored() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("semgrep.txt")).unwrap();
        fs::write(dir.path().join("clamav.txt"), "clean").unwrap();
        fs::write(dir.path().join("clamav.bak.txt"), "old").unwrap();
        let ignore = build_ignore_set(&["*.bak.txt".to_string()]).unwrap();

        let listing = DirectoryListing::read(dir.path(), Some(&ignore)).unwrap();
        let names: Vec<&str> = listing.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["clamav.txt"]);
        assert!(listing.resolve(&definition("semgrep")).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_read_skips_dangling_symlink() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("hadolint.txt"), "DL3008").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("latest.log")).unwrap();

        let listing = DirectoryListing::read(dir.path(), None).unwrap();
        let names: Vec<&str> = listing.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["hadolint.txt"]);
    }

    #[test]
    fn test_resolved_file_metadata() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("trufflehog.txt"), b"no secrets\xff").unwrap();
        let listing = DirectoryListing::read(dir.path(), None).unwrap();
        let file = listing.resolve(&definition("trufflehog")).unwrap();

        let resolved = ResolvedFile::read(file).unwrap();
        assert_eq!(resolved.name, "trufflehog.txt");
        assert_eq!(resolved.size_bytes, 11);
        assert_eq!(resolved.content, "no secrets\u{fffd}");
        assert_eq!(resolved.sha256, hash_content(b"no secrets\xff"));
        assert_eq!(resolved.sha256.len(), 64);
    }

    #[test]
    fn test_read_error_after_listing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("web-scan.txt");
        fs::write(&path, "report").unwrap();
        let listing = DirectoryListing::read(dir.path(), None).unwrap();
        fs::remove_file(&path).unwrap();

        let file = listing.resolve(&definition("web-scan")).unwrap();
        let err = ResolvedFile::read(file).unwrap_err();
        assert!(matches!(err, ReportError::Read { .. }));
        assert!(err.to_string().contains("web-scan.txt"));
    }

    #[test]
    fn test_hash_content_known_value() {
        assert_eq!(
            hash_content(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}

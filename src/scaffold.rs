//! Pre-create an empty artifact directory for a project

use crate::catalog::ArtifactCatalog;
use crate::error::{ReportError, Result};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// What a scaffold run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub dir: PathBuf,
    /// File names created, in catalog order
    pub created: Vec<String>,
    /// File names that already existed and were left untouched
    pub skipped: Vec<String>,
}

/// Create `parent/project/` with one zero-byte `<id>.txt` per catalog entry.
///
/// Existing files are never truncated, so running this twice is harmless.
pub fn scaffold(parent: &Path, project: &str, catalog: &ArtifactCatalog) -> Result<ScaffoldReport> {
    if project.trim().is_empty() {
        return Err(ReportError::Config("project name must not be empty".into()));
    }

    let dir = parent.join(project);
    fs::create_dir_all(&dir).map_err(|source| ReportError::Write {
        path: dir.clone(),
        source,
    })?;

    let mut created = Vec::new();
    let mut skipped = Vec::new();
    for definition in catalog.definitions() {
        let name = definition.canonical_file_name();
        let path = dir.join(&name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => created.push(name),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => skipped.push(name),
            Err(source) => return Err(ReportError::Write { path, source }),
        }
    }

    Ok(ScaffoldReport {
        dir,
        created,
        skipped,
    })
}

/// Sorted file names in a scaffolded directory, for display
pub fn sorted_listing(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|source| ReportError::DirectoryAccess {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names)
}

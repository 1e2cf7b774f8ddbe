//! Assemble the ordered report document from an artifact directory

use crate::ansi::AnsiConverter;
use crate::catalog::ArtifactCatalog;
use crate::config::DEFAULT_TITLE;
use crate::error::Result;
use crate::resolver::{DirectoryListing, ResolvedFile};
use crate::{ArtifactDefinition, ArtifactRecord, Document, GroupSection};
use globset::GlobSet;
use rayon::prelude::*;
use std::path::Path;

/// Builds a [`Document`] from one scan of a directory.
///
/// The directory is listed once. Each definition is resolved, read and
/// converted independently (in parallel on the rayon pool); the records are
/// then placed back in catalog order.
pub struct ReportAssembler<'a> {
    catalog: &'a ArtifactCatalog,
    ignore: Option<&'a GlobSet>,
    title: String,
    parallel: bool,
}

impl<'a> ReportAssembler<'a> {
    pub fn new(catalog: &'a ArtifactCatalog) -> Self {
        Self {
            catalog,
            ignore: None,
            title: DEFAULT_TITLE.to_string(),
            parallel: true,
        }
    }

    /// Leave file names matching these globs out of the listing
    pub fn with_ignore(mut self, ignore: Option<&'a GlobSet>) -> Self {
        self.ignore = ignore;
        self
    }

    /// Title shown after the directory name
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Resolve artifacts one at a time on the calling thread
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn assemble(&self, dir: &Path) -> Result<Document> {
        let listing = DirectoryListing::read(dir, self.ignore)?;
        self.assemble_from_listing(dir, &listing)
    }

    /// Assemble from an existing listing (the directory is not listed again)
    pub fn assemble_from_listing(&self, dir: &Path, listing: &DirectoryListing) -> Result<Document> {
        let definitions: Vec<&ArtifactDefinition> = self.catalog.definitions().collect();

        let records: Vec<ArtifactRecord> = if self.parallel {
            definitions
                .par_iter()
                .map(|d| build_record(listing, d))
                .collect::<Result<_>>()?
        } else {
            definitions
                .iter()
                .map(|d| build_record(listing, d))
                .collect::<Result<_>>()?
        };

        let mut records = records.into_iter();
        let groups = self
            .catalog
            .groups()
            .iter()
            .map(|group| GroupSection {
                group: group.clone(),
                records: records.by_ref().take(group.members.len()).collect(),
            })
            .collect();

        let source_dir = dir_base_name(dir);
        Ok(Document {
            title: format!("{} - {}", source_dir, self.title),
            source_dir,
            groups,
        })
    }
}

fn build_record(listing: &DirectoryListing, definition: &ArtifactDefinition) -> Result<ArtifactRecord> {
    let Some(file) = listing.resolve(definition) else {
        return Ok(ArtifactRecord::missing(definition.clone()));
    };

    let resolved = ResolvedFile::read(file)?;
    let rendered = AnsiConverter::new().convert(&resolved.content);

    Ok(ArtifactRecord {
        definition: definition.clone(),
        present: true,
        file_name: Some(resolved.name),
        size_bytes: Some(resolved.size_bytes),
        last_modified: Some(resolved.last_modified),
        sha256: Some(resolved.sha256),
        rendered_content: Some(rendered),
    })
}

/// Last path component, falling back to the canonical path for `.` and `..`
pub fn dir_base_name(dir: &Path) -> String {
    if let Some(name) = dir.file_name() {
        return name.to_string_lossy().into_owned();
    }
    dir.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "artifacts".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_records_follow_catalog_not_listing_order() {
        let catalog = ArtifactCatalog::builtin().unwrap();
        let dir = TempDir::new().unwrap();
        for name in ["review.txt", "web-scan.txt", "hadolint.txt", "clamav.txt"] {
            fs::write(dir.path().join(name), name).unwrap();
        }
        let listing = DirectoryListing::from_names(
            dir.path(),
            ["review.txt", "web-scan.txt", "hadolint.txt", "clamav.txt"],
        );

        let doc = ReportAssembler::new(&catalog)
            .assemble_from_listing(dir.path(), &listing)
            .unwrap();
        let ids: Vec<&str> = doc.records().map(|r| r.id()).collect();
        let expected: Vec<&str> = catalog.definitions().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, expected);

        let present: Vec<&str> = doc.records().filter(|r| r.present).map(|r| r.id()).collect();
        assert_eq!(present, ["hadolint", "clamav", "web-scan", "review"]);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let catalog = ArtifactCatalog::builtin().unwrap();
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("semgrep.txt"), "\u{1b}[31mfinding\u{1b}[0m").unwrap();
        fs::write(dir.path().join("stig-check.txt"), "pass").unwrap();

        let parallel = ReportAssembler::new(&catalog).assemble(dir.path()).unwrap();
        let sequential = ReportAssembler::new(&catalog)
            .sequential()
            .assemble(dir.path())
            .unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_title_uses_directory_name() {
        let catalog = ArtifactCatalog::builtin().unwrap();
        let root = TempDir::new().unwrap();
        let dir = root.path().join("my-service");
        fs::create_dir(&dir).unwrap();

        let doc = ReportAssembler::new(&catalog)
            .with_title("Nightly")
            .assemble(&dir)
            .unwrap();
        assert_eq!(doc.title, "my-service - Nightly");
        assert_eq!(doc.source_dir, "my-service");
        assert_eq!(doc.report_file_name(), "my-service_artifact_report.html");
    }

    #[test]
    fn test_dir_base_name() {
        assert_eq!(dir_base_name(Path::new("/ci/job-42/")), "job-42");
        assert_eq!(dir_base_name(Path::new("artifacts")), "artifacts");
        assert!(!dir_base_name(Path::new(".")).is_empty());
    }
}

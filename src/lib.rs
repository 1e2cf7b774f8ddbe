//! artifact-report: render CI/CD scan logs into a browsable HTML report
//!
//! A directory of plain-text scan-tool logs (hadolint, semgrep, clamav, ...)
//! is matched against a catalog of expected artifacts, ANSI-colored output is
//! converted to styled markup, and the result is assembled into an ordered
//! [`Document`] that the reporters serialize.

pub mod ansi;
pub mod assembler;
pub mod catalog;
pub mod config;
pub mod error;
pub mod reporter;
pub mod resolver;
pub mod scaffold;
pub mod status;
pub mod watcher;

pub use error::{ReportError, Result};
pub use status::{rollup, Status};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

/// One expected artifact, declared once in the catalog
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDefinition {
    pub id: String,
    pub group_id: String,
    /// Case-insensitive pattern source used to recognize the file
    pub match_pattern: String,
    #[serde(skip)]
    matcher: Regex,
}

impl ArtifactDefinition {
    pub(crate) fn new(id: &str, group_id: &str, matcher: Regex) -> Self {
        Self {
            id: id.to_string(),
            group_id: group_id.to_string(),
            match_pattern: matcher.as_str().to_string(),
            matcher,
        }
    }

    /// Whether a file name is recognized as this artifact
    pub fn matches(&self, file_name: &str) -> bool {
        self.matcher.is_match(file_name)
    }

    /// Name the scaffolding tool creates for this artifact
    pub fn canonical_file_name(&self) -> String {
        format!("{}.txt", self.id)
    }

    /// Element id of the artifact container in the HTML report
    pub fn element_id(&self) -> String {
        format!("artifact-{}", self.id)
    }
}

impl PartialEq for ArtifactDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.group_id == other.group_id
            && self.match_pattern == other.match_pattern
    }
}

impl Eq for ArtifactDefinition {}

/// An ordered phase of the pipeline (e.g. `pre-build-scan`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactGroup {
    pub id: String,
    /// Vertical display position, as declared
    pub order: usize,
    pub members: Vec<ArtifactDefinition>,
}

impl ArtifactGroup {
    /// Element id of the group container in the HTML report
    pub fn element_id(&self) -> String {
        format!("group-{}", self.id)
    }
}

/// What was found for one definition during a single run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRecord {
    pub definition: ArtifactDefinition,
    pub present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    /// Hex SHA-256 of the raw file content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered_content: Option<String>,
}

impl ArtifactRecord {
    /// Record for a definition with no matching file
    pub fn missing(definition: ArtifactDefinition) -> Self {
        Self {
            definition,
            present: false,
            file_name: None,
            size_bytes: None,
            last_modified: None,
            sha256: None,
            rendered_content: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }
}

/// A group together with its records, in catalog order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSection {
    pub group: ArtifactGroup,
    pub records: Vec<ArtifactRecord>,
}

impl GroupSection {
    pub fn present_count(&self) -> usize {
        self.records.iter().filter(|r| r.present).count()
    }
}

/// Complete output model for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub title: String,
    /// Base name of the scanned directory
    pub source_dir: String,
    pub groups: Vec<GroupSection>,
}

impl Document {
    pub fn records(&self) -> impl Iterator<Item = &ArtifactRecord> {
        self.groups.iter().flat_map(|g| g.records.iter())
    }

    pub fn present_count(&self) -> usize {
        self.groups.iter().map(GroupSection::present_count).sum()
    }

    pub fn artifact_count(&self) -> usize {
        self.groups.iter().map(|g| g.records.len()).sum()
    }

    /// Output file name: `<dir>_artifact_report.html`
    pub fn report_file_name(&self) -> String {
        format!("{}_artifact_report.html", self.source_dir)
    }
}

//! Artifact catalog: the known groups, their members, and match patterns

use crate::error::{ReportError, Result};
use crate::{ArtifactDefinition, ArtifactGroup};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Built-in groups in display order
pub const BUILTIN_GROUPS: &[(&str, &[&str])] = &[
    (
        "pre-build-scan",
        &["container-spec", "hadolint", "semgrep", "trufflehog"],
    ),
    ("build", &["build-container", "build-container-report"]),
    (
        "post-build-scan",
        &[
            "clamav",
            "stig-check",
            "syft-grype",
            "threat-assessment",
            "web-scan",
        ],
    ),
    ("clean", &["clean-container"]),
    ("review", &["review"]),
];

/// Declaration of one group as it appears in config files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub id: String,
    pub artifacts: Vec<String>,
}

impl GroupSpec {
    pub fn builtin() -> Vec<GroupSpec> {
        BUILTIN_GROUPS
            .iter()
            .map(|(id, artifacts)| GroupSpec {
                id: id.to_string(),
                artifacts: artifacts.iter().map(|a| a.to_string()).collect(),
            })
            .collect()
    }
}

/// Validated, immutable catalog. Build it once at startup and share by reference.
#[derive(Debug, Clone)]
pub struct ArtifactCatalog {
    groups: Vec<ArtifactGroup>,
}

impl ArtifactCatalog {
    /// The built-in catalog. Failing here means the table above is broken.
    pub fn builtin() -> Result<Self> {
        Self::from_groups(&GroupSpec::builtin())
    }

    /// Validate group declarations and compile every match pattern.
    pub fn from_groups(specs: &[GroupSpec]) -> Result<Self> {
        let mut group_ids = HashSet::new();
        let mut artifact_ids = HashSet::new();
        let mut groups = Vec::with_capacity(specs.len());

        for (order, spec) in specs.iter().enumerate() {
            validate_id(&spec.id)?;
            if !group_ids.insert(spec.id.as_str()) {
                return Err(ReportError::Pattern {
                    id: spec.id.clone(),
                    reason: "duplicate group id".into(),
                });
            }

            let mut members = Vec::with_capacity(spec.artifacts.len());
            for id in &spec.artifacts {
                validate_id(id)?;
                if !artifact_ids.insert(id.as_str()) {
                    return Err(ReportError::Pattern {
                        id: id.clone(),
                        reason: "duplicate artifact id".into(),
                    });
                }
                members.push(ArtifactDefinition::new(id, &spec.id, compile_pattern(id)?));
            }

            groups.push(ArtifactGroup {
                id: spec.id.clone(),
                order,
                members,
            });
        }

        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[ArtifactGroup] {
        &self.groups
    }

    /// All definitions, flattened in display order
    pub fn definitions(&self) -> impl Iterator<Item = &ArtifactDefinition> {
        self.groups.iter().flat_map(|g| g.members.iter())
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Back to the declaration form (used by `init` to write a config)
    pub fn to_specs(&self) -> Vec<GroupSpec> {
        self.groups
            .iter()
            .map(|g| GroupSpec {
                id: g.id.clone(),
                artifacts: g.members.iter().map(|m| m.id.clone()).collect(),
            })
            .collect()
    }
}

/// Ids become element ids, storage keys and file names.
fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(ReportError::Pattern {
            id: id.to_string(),
            reason: "id is empty".into(),
        });
    }
    if let Some(bad) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(ReportError::Pattern {
            id: id.to_string(),
            reason: format!("character '{}' is not allowed", bad),
        });
    }
    Ok(())
}

/// Pattern source for an id: only the first hyphen becomes optional.
///
/// `build-container-report` -> `^build-?container\-report.*\.txt$`
pub fn pattern_for(id: &str) -> String {
    let body = match id.split_once('-') {
        Some((head, tail)) => format!("{}-?{}", regex::escape(head), regex::escape(tail)),
        None => regex::escape(id),
    };
    format!(r"^{}.*\.txt$", body)
}

fn compile_pattern(id: &str) -> Result<Regex> {
    RegexBuilder::new(&pattern_for(id))
        .case_insensitive(true)
        .build()
        .map_err(|e| ReportError::Pattern {
            id: id.to_string(),
            reason: e.to_string(),
        })
}

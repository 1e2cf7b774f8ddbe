//! Config schema and deserialization

use crate::catalog::GroupSpec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TITLE: &str = "GitLab Artifacts Report";
pub const DEFAULT_OUTPUT_DIR: &str = "processed_artifacts";

/// Root config structure for .artifactrc.json
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Report title, shown after the directory name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Directory the report is written to (default: processed_artifacts)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Glob patterns for file names to leave out of matching
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,

    /// Replace the built-in artifact groups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<GroupSpec>>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, title: Option<String>, output_dir: Option<&Path>) -> Self {
        if title.is_some() {
            self.title = title;
        }
        if let Some(dir) = output_dir {
            self.output_dir = Some(dir.to_path_buf());
        }
        self
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.title.is_none() {
            self.title = base.title;
        }
        if self.output_dir.is_none() {
            self.output_dir = base.output_dir;
        }
        if self.groups.is_none() {
            self.groups = base.groups;
        }

        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    /// Group declarations in effect (config or built-in)
    pub fn group_specs(&self) -> Vec<GroupSpec> {
        self.groups.clone().unwrap_or_else(GroupSpec::builtin)
    }
}

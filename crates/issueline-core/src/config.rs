use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ErrorCode;
use crate::model::issue::Tracker;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    #[serde(default = "default_github")]
    pub github: TrackerConfig,
    #[serde(default = "default_jira")]
    pub jira: TrackerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vocabulary: VocabularyConfig::default(),
            github: default_github(),
            jira: default_jira(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub const fn tracker(&self, tracker: Tracker) -> &TrackerConfig {
        match tracker {
            Tracker::Github => &self.github,
            Tracker::Jira => &self.jira,
        }
    }
}

/// Label vocabularies that turn a label into a type or resolution tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyConfig {
    #[serde(default = "default_types")]
    pub types: Vec<String>,
    #[serde(default = "default_resolutions")]
    pub resolutions: Vec<String>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            types: default_types(),
            resolutions: default_resolutions(),
        }
    }
}

impl VocabularyConfig {
    #[must_use]
    pub fn is_type(&self, label: &str) -> bool {
        self.types.iter().any(|t| t.eq_ignore_ascii_case(label))
    }

    #[must_use]
    pub fn is_resolution(&self, label: &str) -> bool {
        self.resolutions.iter().any(|r| r.eq_ignore_ascii_case(label))
    }
}

/// Per-tracker knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// How far before a mention/subscription a comment may lie and still
    /// be treated as the comment that caused it.
    #[serde(default)]
    pub mention_tolerance_secs: u32,
}

impl TrackerConfig {
    #[must_use]
    pub fn mention_tolerance(&self) -> Duration {
        Duration::seconds(i64::from(self.mention_tolerance_secs))
    }
}

fn default_github() -> TrackerConfig {
    TrackerConfig {
        mention_tolerance_secs: 0,
    }
}

fn default_jira() -> TrackerConfig {
    TrackerConfig {
        mention_tolerance_secs: 1,
    }
}

fn default_types() -> Vec<String> {
    [
        "bug",
        "improvement",
        "enhancement",
        "new feature",
        "task",
        "test",
        "wish",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_resolutions() -> Vec<String> {
    [
        "unresolved",
        "fixed",
        "wontfix",
        "duplicate",
        "invalid",
        "incomplete",
        "cannot reproduce",
        "later",
        "not a problem",
        "implemented",
        "done",
        "auto closed",
        "pending",
        "closed",
        "remind",
        "resolved",
        "not a bug",
        "workaround",
        "staged",
        "delivered",
        "information provided",
        "works for me",
        "feedback received",
        "wontdo",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Load engine settings from a TOML file. A missing file means defaults.
pub fn load_engine_config(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        return Ok(EngineConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<EngineConfig>(&content).with_context(|| {
        format!(
            "{}: Failed to parse {}",
            ErrorCode::ConfigParseError,
            path.display()
        )
    })
}

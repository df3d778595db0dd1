use anyhow::{Context, Result};
use issueline_core::ErrorCode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Where the identity service lives and how patiently to talk to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdServiceConfig {
    #[serde(default = "default_hostname")]
    pub hostname: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Project the registered people belong to.
    #[serde(default)]
    pub project_id: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Extra attempts after the first transport failure.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Wait before retry `n` is `n * backoff_ms`.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for IdServiceConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            port: default_port(),
            project_id: 0,
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl IdServiceConfig {
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.hostname, self.port)
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub const fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

fn default_hostname() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8080
}

const fn default_timeout_ms() -> u64 {
    5_000
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_backoff_ms() -> u64 {
    250
}

/// Load identity service settings from a TOML file. A missing file means
/// defaults.
pub fn load_idservice_config(path: &Path) -> Result<IdServiceConfig> {
    if !path.exists() {
        return Ok(IdServiceConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<IdServiceConfig>(&content).with_context(|| {
        format!(
            "{}: Failed to parse {}",
            ErrorCode::ConfigParseError,
            path.display()
        )
    })
}

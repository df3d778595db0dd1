//! Raw per-issue records as the tracker wrappers hand them over.
//!
//! Every list may be absent or `null` and every identity field may be
//! missing; these types deserialize such input without error and leave the
//! judgement of what is structurally required to the normalizers.

pub mod github;
pub mod jira;

pub use github::RawGithubIssue;
pub use jira::RawJiraIssue;

use serde::{Deserialize, Deserializer};

use crate::model::identity::Identity;

/// One raw issue from either tracker.
#[derive(Debug, Clone)]
pub enum RawIssue {
    Github(RawGithubIssue),
    Jira(RawJiraIssue),
}

impl From<RawGithubIssue> for RawIssue {
    fn from(value: RawGithubIssue) -> Self {
        Self::Github(value)
    }
}

impl From<RawJiraIssue> for RawIssue {
    fn from(value: RawJiraIssue) -> Self {
        Self::Jira(value)
    }
}

/// Person as the wrappers serialize it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "login")]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl RawUser {
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::new(
            self.name.as_deref(),
            self.username.as_deref(),
            self.email.as_deref(),
        )
    }
}

/// `null` and absent both become `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fragment ids arrive as numbers from one wrapper and strings from another.
pub(crate) fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?
        .map(|raw| match raw {
            Raw::Number(n) => n.to_string(),
            Raw::Text(s) => s.trim().to_string(),
        })
        .filter(|s| !s.is_empty()))
}

pub(crate) fn identity_of(user: Option<&RawUser>) -> Option<Identity> {
    user.map(RawUser::identity).filter(|id| !id.is_empty())
}

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::identity::Identity;
use super::timestamp::Timestamp;
use crate::event::Event;

/// Tracker-scoped issue identifier.
///
/// GitHub numbers issues, JIRA keys them (`PROJ-123`); both deserialize
/// into the same textual form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct IssueId(String);

impl IssueId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for IssueId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for IssueId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for IssueId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Self::from(n),
            Raw::Text(s) => Self::new(s),
        })
    }
}

/// Running lifecycle state threaded through the reconstructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
    Reopened,
}

impl IssueState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Reopened => "reopened",
        }
    }

    /// Map a free-form tracker status (JIRA workflows are configurable)
    /// onto the three states the engine tracks.
    #[must_use]
    pub fn from_tracker_status(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "closed" | "resolved" | "done" => Self::Closed,
            "reopened" => Self::Reopened,
            _ => Self::Open,
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown state string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid issue state '{0}': expected open, closed or reopened")]
pub struct ParseIssueStateError(pub String);

impl FromStr for IssueState {
    type Err = ParseIssueStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "reopened" => Ok(Self::Reopened),
            _ => Err(ParseIssueStateError(s.to_string())),
        }
    }
}

/// Which tracker front end produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tracker {
    Github,
    Jira,
}

/// Plain issue or change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Issue,
    PullRequest,
}

impl IssueKind {
    /// Tag seeded into the running type set.
    #[must_use]
    pub const fn type_tag(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::PullRequest => "pull request",
        }
    }
}

/// One issue and its timeline: the unit of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub id: IssueId,
    pub title: String,
    pub tracker: Tracker,
    pub kind: IssueKind,
    pub author: Option<Identity>,
    pub created_at: Timestamp,
    pub closed_at: Timestamp,
    pub components: Vec<String>,
    /// Type tags in effect before the first event.
    pub initial_types: Vec<String>,
    /// Running type tags after replay.
    pub types: Vec<String>,
    /// Running resolution tags after replay.
    pub resolution: Vec<String>,
    pub state: IssueState,
    pub events: Vec<Event>,
}

impl Issue {
    #[must_use]
    pub fn new(id: IssueId, tracker: Tracker, kind: IssueKind, created_at: Timestamp) -> Self {
        let initial_types = vec![kind.type_tag().to_string()];
        Self {
            id,
            title: String::new(),
            tracker,
            kind,
            author: None,
            created_at,
            closed_at: Timestamp::EMPTY,
            components: Vec::new(),
            types: initial_types.clone(),
            initial_types,
            resolution: Vec::new(),
            state: IssueState::Open,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_pull_request(&self) -> bool {
        matches!(self.kind, IssueKind::PullRequest)
    }
}

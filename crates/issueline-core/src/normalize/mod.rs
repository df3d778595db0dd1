//! Tracker front ends: raw records in, common [`Event`] shape out.
//!
//! Both trackers emit the same [`NormalizedIssue`] contract: the issue
//! shell, its events grouped by source category, and the outbound
//! issue-to-issue references that the cross-issue backfill consumes.
//!
//! Structurally broken fragments are skipped with a warning carrying
//! [`ErrorCode::MalformedFragment`]. Fragments with incomplete actors are
//! kept; attribution is the merger's concern.

pub mod github;
pub mod jira;

use tracing::warn;

use crate::error::ErrorCode;
use crate::event::Event;
use crate::model::identity::Identity;
use crate::model::issue::{Issue, IssueId};
use crate::model::timestamp::Timestamp;
use crate::raw::RawIssue;

/// Normalized events of one issue, bucketed by source category.
///
/// The bucket order is the concatenation order fed to the stable sort, so
/// at equal timestamps comments precede core events, which precede links,
/// commits and reviews.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragments {
    pub comments: Vec<Event>,
    pub core: Vec<Event>,
    pub links: Vec<Event>,
    pub commits: Vec<Event>,
    pub reviews: Vec<Event>,
}

impl Fragments {
    #[must_use]
    pub fn len(&self) -> usize {
        self.comments.len()
            + self.core.len()
            + self.links.len()
            + self.commits.len()
            + self.reviews.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.comments
            .iter()
            .chain(&self.core)
            .chain(&self.links)
            .chain(&self.commits)
            .chain(&self.reviews)
    }

    /// Concatenate all buckets in precedence order.
    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        let mut events = Vec::with_capacity(self.len());
        events.extend(self.comments);
        events.extend(self.core);
        events.extend(self.links);
        events.extend(self.commits);
        events.extend(self.reviews);
        events
    }
}

/// An `add_link` to another issue, queued for the backfill pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossReference {
    pub source: IssueId,
    pub target: IssueId,
    pub actor: Option<Identity>,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone)]
pub struct NormalizedIssue {
    pub issue: Issue,
    pub fragments: Fragments,
    pub outbound: Vec<CrossReference>,
}

impl NormalizedIssue {
    /// Every raw identity this issue mentions, for the username backfill
    /// table.
    #[must_use]
    pub fn identities(&self) -> Vec<&Identity> {
        self.issue
            .author
            .iter()
            .chain(self.fragments.events().flat_map(Event::identities))
            .chain(self.outbound.iter().filter_map(|r| r.actor.as_ref()))
            .collect()
    }
}

/// Normalize one raw issue with the front end of its tracker.
#[must_use]
pub fn normalize(raw: &RawIssue) -> NormalizedIssue {
    match raw {
        RawIssue::Github(issue) => github::normalize(issue),
        RawIssue::Jira(issue) => jira::normalize(issue),
    }
}

fn skip_fragment(issue: &IssueId, fragment: &str, reason: &str) {
    warn!(
        code = %ErrorCode::MalformedFragment,
        issue = %issue,
        fragment,
        reason,
        "skipping malformed fragment"
    );
}

fn has_text(text: Option<&str>) -> bool {
    text.is_some_and(|t| !t.trim().is_empty())
}

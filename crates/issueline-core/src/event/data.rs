//! Typed payloads for each event kind.
//!
//! Trackers hand over two free-form slots per event; here each kind gets a
//! variant with named fields, and the output layer renders them back into
//! `info_1`/`info_2` (see [`crate::output`]).

use serde::Serialize;

use crate::model::identity::Identity;
use crate::model::issue::{IssueId, IssueState};

/// Kind-dependent payload of an [`Event`](super::Event).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "payload", rename_all = "snake_case")]
pub enum EventData {
    /// Nothing beyond actor, target and time.
    Empty,
    /// `created`: the state the issue was opened in.
    Created { state: IssueState },
    /// `commented`: state snapshot stamped during replay.
    Comment(CommentData),
    /// `state_updated`, and the raw `closed`/`reopened` before replay.
    StateChange { new: IssueState, old: IssueState },
    /// `type_updated` / `resolution_updated`.
    TagChange {
        new: Option<String>,
        old: Option<String>,
    },
    /// `labeled` / `unlabeled`, lower-cased.
    Label { name: String },
    /// `add_link` / `remove_link`.
    Link(LinkData),
    /// `referenced_by`: the issue that links here.
    ReferencedBy { issue: IssueId },
    /// `reviewed`.
    Review(ReviewData),
    /// `review_dismissed`.
    Dismissal { review_id: Option<String> },
    /// `commit_added` / `referenced`.
    Commit { hash: String },
    /// `assigned`, `unassigned` and review requests before replay moves the
    /// identities into actor/target.
    Assignment {
        assignee: Option<Identity>,
        assigner: Option<Identity>,
    },
    /// `renamed`.
    Rename { from: String, to: String },
    /// `milestoned` / `demilestoned`.
    Milestone { title: String },
}

/// Payload of a `commented` event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CommentData {
    /// Tracker comment id; absent for synthetic comments.
    pub comment_id: Option<String>,
    /// Issue state when the comment was written.
    pub state: IssueState,
    /// Resolution tags when the comment was written.
    pub resolution: Vec<String>,
}

impl CommentData {
    #[must_use]
    pub fn with_id(comment_id: Option<String>) -> Self {
        Self {
            comment_id,
            ..Self::default()
        }
    }
}

/// What an `add_link`/`remove_link` points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "target_kind", content = "target", rename_all = "lowercase")]
pub enum LinkTarget {
    Issue(IssueId),
    Commit(String),
}

impl LinkTarget {
    /// `"issue"` or `"commit"`.
    #[must_use]
    pub const fn kind_str(&self) -> &'static str {
        match self {
            Self::Issue(_) => "issue",
            Self::Commit(_) => "commit",
        }
    }

    #[must_use]
    pub fn reference(&self) -> &str {
        match self {
            Self::Issue(id) => id.as_str(),
            Self::Commit(hash) => hash,
        }
    }
}

/// Payload of `add_link` / `remove_link`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkData {
    pub target: LinkTarget,
}

/// Payload of a `reviewed` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewData {
    pub review_id: Option<String>,
    /// Lower-cased review outcome (`approved`, `changes_requested`, ...).
    pub outcome: String,
    /// Set once a later `review_dismissed` overwrote the outcome.
    pub dismissed: bool,
}

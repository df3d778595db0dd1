//! Closed vocabulary of timeline event kinds.
//!
//! The string form is the snake_case name the trackers and the output
//! records use (`state_updated`, `add_link`, ...). Raw tracker events that
//! do not parse into an [`EventKind`] are malformed fragments.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every kind of event a timeline may contain.
///
/// `Closed` and `Reopened` only exist between normalization and replay; the
/// reconstructor rewrites both into `StateUpdated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Created,
    Commented,
    StateUpdated,
    TypeUpdated,
    ResolutionUpdated,
    Labeled,
    Unlabeled,
    AddLink,
    RemoveLink,
    ReferencedBy,
    Reviewed,
    CommitAdded,
    Assigned,
    Unassigned,
    ReviewRequested,
    ReviewRequestRemoved,
    ReviewDismissed,
    Mentioned,
    Subscribed,
    Unsubscribed,
    Closed,
    Reopened,
    Referenced,
    Merged,
    Renamed,
    Milestoned,
    Demilestoned,
    Locked,
    Unlocked,
    HeadRefDeleted,
    HeadRefForcePushed,
    ReadyForReview,
    ConvertToDraft,
}

/// Error returned when parsing an unknown event kind string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventKind {
    /// The unrecognised input string.
    pub raw: String,
}

impl fmt::Display for UnknownEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event kind '{}'", self.raw)
    }
}

impl std::error::Error for UnknownEventKind {}

impl EventKind {
    pub const ALL: [Self; 33] = [
        Self::Created,
        Self::Commented,
        Self::StateUpdated,
        Self::TypeUpdated,
        Self::ResolutionUpdated,
        Self::Labeled,
        Self::Unlabeled,
        Self::AddLink,
        Self::RemoveLink,
        Self::ReferencedBy,
        Self::Reviewed,
        Self::CommitAdded,
        Self::Assigned,
        Self::Unassigned,
        Self::ReviewRequested,
        Self::ReviewRequestRemoved,
        Self::ReviewDismissed,
        Self::Mentioned,
        Self::Subscribed,
        Self::Unsubscribed,
        Self::Closed,
        Self::Reopened,
        Self::Referenced,
        Self::Merged,
        Self::Renamed,
        Self::Milestoned,
        Self::Demilestoned,
        Self::Locked,
        Self::Unlocked,
        Self::HeadRefDeleted,
        Self::HeadRefForcePushed,
        Self::ReadyForReview,
        Self::ConvertToDraft,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Commented => "commented",
            Self::StateUpdated => "state_updated",
            Self::TypeUpdated => "type_updated",
            Self::ResolutionUpdated => "resolution_updated",
            Self::Labeled => "labeled",
            Self::Unlabeled => "unlabeled",
            Self::AddLink => "add_link",
            Self::RemoveLink => "remove_link",
            Self::ReferencedBy => "referenced_by",
            Self::Reviewed => "reviewed",
            Self::CommitAdded => "commit_added",
            Self::Assigned => "assigned",
            Self::Unassigned => "unassigned",
            Self::ReviewRequested => "review_requested",
            Self::ReviewRequestRemoved => "review_request_removed",
            Self::ReviewDismissed => "review_dismissed",
            Self::Mentioned => "mentioned",
            Self::Subscribed => "subscribed",
            Self::Unsubscribed => "unsubscribed",
            Self::Closed => "closed",
            Self::Reopened => "reopened",
            Self::Referenced => "referenced",
            Self::Merged => "merged",
            Self::Renamed => "renamed",
            Self::Milestoned => "milestoned",
            Self::Demilestoned => "demilestoned",
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
            Self::HeadRefDeleted => "head_ref_deleted",
            Self::HeadRefForcePushed => "head_ref_force_pushed",
            Self::ReadyForReview => "ready_for_review",
            Self::ConvertToDraft => "convert_to_draft",
        }
    }

    /// Mention-like kinds whose reported actor is ambiguous when they
    /// collide with a comment.
    #[must_use]
    pub const fn is_mention(self) -> bool {
        matches!(self, Self::Mentioned | Self::Subscribed)
    }

    /// Kinds that carry no meaning without a target identity.
    #[must_use]
    pub const fn requires_target(self) -> bool {
        matches!(
            self,
            Self::Assigned | Self::Unassigned | Self::ReviewRequested | Self::ReviewRequestRemoved
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // GH-wrapper spells the review-request removal event this way.
        if s == "review_request_removed" || s == "review_requested_removed" {
            return Ok(Self::ReviewRequestRemoved);
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEventKind { raw: s.to_string() })
    }
}

impl Serialize for EventKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

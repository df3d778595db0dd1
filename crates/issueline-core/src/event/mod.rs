//! Event data model for issue timelines.
//!
//! An [`Event`] is one timestamped, kind-tagged occurrence in an issue's
//! lifecycle: who did it ([`Event::actor`]), to whom (`target`, for
//! mentions, assignments and review requests), and a typed payload.
//!
//! # Ordering
//!
//! Timelines are ordered by [`sort_timeline`]: a stable sort on the event
//! timestamp anchored to issue creation, with `created` winning ties.

pub mod data;
pub mod types;

pub use data::{CommentData, EventData, LinkData, LinkTarget, ReviewData};
pub use types::{EventKind, UnknownEventKind};

use serde::Serialize;

use crate::model::identity::Identity;
use crate::model::timestamp::Timestamp;

/// A single event in an issue timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub kind: EventKind,

    /// Who performed the event. `None` or an empty identity means the event
    /// cannot be attributed and is dropped by the merger.
    pub actor: Option<Identity>,

    /// May be empty for low-information synthetic events.
    pub timestamp: Timestamp,

    /// Mentioned/subscribed user, assignee or requested reviewer.
    pub target: Option<Identity>,

    pub data: EventData,
}

impl Event {
    #[must_use]
    pub const fn new(
        kind: EventKind,
        actor: Option<Identity>,
        timestamp: Timestamp,
        data: EventData,
    ) -> Self {
        Self {
            kind,
            actor,
            timestamp,
            target: None,
            data,
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: Option<Identity>) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn has_actor(&self) -> bool {
        self.actor.as_ref().is_some_and(|a| !a.is_empty())
    }

    #[must_use]
    pub fn has_target(&self) -> bool {
        self.target.as_ref().is_some_and(|t| !t.is_empty())
    }

    /// Every identity the event carries, including assignment payloads.
    pub fn identities(&self) -> impl Iterator<Item = &Identity> {
        let (assignee, assigner) = match &self.data {
            EventData::Assignment { assignee, assigner } => (assignee.as_ref(), assigner.as_ref()),
            _ => (None, None),
        };
        self.actor
            .iter()
            .chain(self.target.iter())
            .chain(assignee)
            .chain(assigner)
    }

    /// Sort key: the timestamp clamped to `anchor` (issue creation), then
    /// `created` before everything else at the same instant.
    ///
    /// Empty timestamps and timestamps before creation both sort at
    /// creation time.
    #[must_use]
    pub fn sort_key(&self, anchor: Timestamp) -> (Timestamp, u8) {
        let rank = u8::from(self.kind != EventKind::Created);
        (self.timestamp.max(anchor), rank)
    }
}

/// Stable-sort a timeline in place; equal keys keep insertion order.
pub fn sort_timeline(events: &mut [Event], anchor: Timestamp) {
    events.sort_by_key(|event| event.sort_key(anchor));
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let actor = self
            .actor
            .as_ref()
            .map(Identity::signature)
            .unwrap_or_default();
        write!(f, "{}\t{}\t{}", self.timestamp, self.kind, actor)?;
        if let Some(target) = &self.target {
            write!(f, "\t-> {target}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Flat output records handed to serializers.
//!
//! The typed [`EventData`] payload is rendered back into the two
//! `info_1`/`info_2` slots downstream consumers expect. A slot is either
//! text or a list of text (a resolution snapshot).

use serde::Serialize;

use crate::event::{Event, EventData, EventKind};
use crate::model::identity::Identity;
use crate::model::issue::{Issue, IssueId, IssueState};
use crate::model::timestamp::Timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum InfoValue {
    Text(String),
    List(Vec<String>),
}

impl InfoValue {
    fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    const fn empty() -> Self {
        Self::Text(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRecord {
    pub id: IssueId,
    pub title: String,
    #[serde(rename = "type")]
    pub types: Vec<String>,
    pub state: IssueState,
    pub resolution: Vec<String>,
    pub created_at: Timestamp,
    pub closed_at: Timestamp,
    pub components: Vec<String>,
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub kind: EventKind,
    pub actor_name: String,
    pub actor_email: String,
    pub timestamp: Timestamp,
    pub info_1: InfoValue,
    pub info_2: InfoValue,
}

impl From<&Issue> for IssueRecord {
    fn from(issue: &Issue) -> Self {
        Self {
            id: issue.id.clone(),
            title: issue.title.clone(),
            types: issue.types.clone(),
            state: issue.state,
            resolution: issue.resolution.clone(),
            created_at: issue.created_at,
            closed_at: issue.closed_at,
            components: issue.components.clone(),
            events: issue.events.iter().map(EventRecord::from).collect(),
        }
    }
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        let (info_1, info_2) = info(event);
        let (actor_name, actor_email) = name_and_email(event.actor.as_ref());
        Self {
            kind: event.kind,
            actor_name,
            actor_email,
            timestamp: event.timestamp,
            info_1,
            info_2,
        }
    }
}

/// Records for a whole batch, in order.
#[must_use]
pub fn records(issues: &[Issue]) -> Vec<IssueRecord> {
    issues.iter().map(IssueRecord::from).collect()
}

/// Render an event payload into its two info slots.
///
/// Events about another person (mentions, subscriptions, assignments,
/// review requests) carry that person's name and e-mail instead.
#[must_use]
pub fn info(event: &Event) -> (InfoValue, InfoValue) {
    if event.kind.is_mention() || event.kind.requires_target() {
        let (name, email) = name_and_email(event.target.as_ref());
        return (InfoValue::Text(name), InfoValue::Text(email));
    }

    match &event.data {
        EventData::Empty | EventData::Assignment { .. } => {
            (InfoValue::empty(), InfoValue::empty())
        }
        EventData::Created { state } => {
            (InfoValue::text(state.as_str()), InfoValue::List(Vec::new()))
        }
        EventData::Comment(comment) => (
            InfoValue::text(comment.state.as_str()),
            InfoValue::List(comment.resolution.clone()),
        ),
        EventData::StateChange { new, old } => {
            (InfoValue::text(new.as_str()), InfoValue::text(old.as_str()))
        }
        EventData::TagChange { new, old } => (
            InfoValue::text(new.clone().unwrap_or_default()),
            InfoValue::text(old.clone().unwrap_or_default()),
        ),
        EventData::Label { name } => (InfoValue::text(name.as_str()), InfoValue::empty()),
        EventData::Link(link) => (
            InfoValue::text(link.target.reference()),
            InfoValue::text(link.target.kind_str()),
        ),
        EventData::ReferencedBy { issue } => {
            (InfoValue::text(issue.as_str()), InfoValue::text("issue"))
        }
        EventData::Review(review) => (
            InfoValue::text(review.outcome.as_str()),
            InfoValue::text(review.review_id.clone().unwrap_or_default()),
        ),
        EventData::Dismissal { review_id } => (
            InfoValue::text(review_id.clone().unwrap_or_default()),
            InfoValue::empty(),
        ),
        EventData::Commit { hash } => (InfoValue::text(hash.as_str()), InfoValue::empty()),
        EventData::Rename { from, to } => {
            (InfoValue::text(to.as_str()), InfoValue::text(from.as_str()))
        }
        EventData::Milestone { title } => (InfoValue::text(title.as_str()), InfoValue::empty()),
    }
}

fn name_and_email(identity: Option<&Identity>) -> (String, String) {
    identity.map_or_else(Default::default, |id| {
        (id.display_name().to_string(), id.email_or_empty().to_string())
    })
}

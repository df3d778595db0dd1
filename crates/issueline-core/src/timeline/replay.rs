//! Forward state replay over a merged timeline.
//!
//! # Algorithm
//!
//! One left-to-right pass threads the running state, type set and
//! resolution set through the timeline:
//!
//! - `closed`/`reopened` become `state_updated` with the new/old pair.
//! - A label from the type or resolution vocabulary updates the matching
//!   set and synthesizes a `type_updated`/`resolution_updated` event.
//! - `commented` is stamped with the state and resolutions seen so far.
//! - Assignment kinds move the assignee into `target` and the assigner
//!   into `actor`. Review requests without a reviewer are dropped.
//! - An explicit `state_updated` to `reopened` is rewritten to the
//!   open-from-closed pair.
//! - `review_dismissed` marks the referenced review as dismissed.
//!
//! Synthesized events are appended and the timeline is stable re-sorted.
//! Comments are stamped once; a later insertion of an earlier event does
//! not revisit them.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::config::VocabularyConfig;
use crate::error::ErrorCode;
use crate::event::{Event, EventData, EventKind, sort_timeline};
use crate::model::issue::{Issue, IssueState};

/// Running values threaded through the pass.
#[derive(Debug, Clone)]
struct RunningState {
    state: IssueState,
    types: Vec<String>,
    resolution: Vec<String>,
}

/// Replay `events` onto `issue`, leaving the final timeline in
/// `issue.events` and the cumulative values in its running fields.
pub fn reconstruct(issue: &mut Issue, mut events: Vec<Event>, vocabulary: &VocabularyConfig) {
    let mut running = RunningState {
        state: IssueState::Open,
        types: issue.initial_types.clone(),
        resolution: Vec::new(),
    };
    let mut synthesized = Vec::new();
    let mut dismissed = HashSet::new();

    for event in &mut events {
        match event.kind {
            EventKind::Closed => {
                let old = running.state;
                running.state = IssueState::Closed;
                event.kind = EventKind::StateUpdated;
                event.data = EventData::StateChange {
                    new: IssueState::Closed,
                    old,
                };
            }
            EventKind::Reopened => {
                running.state = IssueState::Reopened;
                event.kind = EventKind::StateUpdated;
                event.data = EventData::StateChange {
                    new: IssueState::Open,
                    old: IssueState::Closed,
                };
            }
            EventKind::StateUpdated => {
                if let EventData::StateChange { new, .. } = event.data {
                    running.state = new;
                    // Reopening is reported as open-from-closed on every tracker.
                    if new == IssueState::Reopened {
                        event.data = EventData::StateChange {
                            new: IssueState::Open,
                            old: IssueState::Closed,
                        };
                    }
                }
            }
            EventKind::Labeled | EventKind::Unlabeled => {
                if let Some(derived) = apply_label(event, &mut running, vocabulary) {
                    synthesized.push(derived);
                }
            }
            EventKind::TypeUpdated => {
                if let EventData::TagChange { new, old } = &event.data {
                    swap_tag(&mut running.types, new.as_deref(), old.as_deref());
                }
            }
            EventKind::ResolutionUpdated => {
                if let EventData::TagChange { new, old } = &event.data {
                    swap_tag(&mut running.resolution, new.as_deref(), old.as_deref());
                }
            }
            EventKind::Commented => {
                if let EventData::Comment(comment) = &mut event.data {
                    comment.state = running.state;
                    comment.resolution.clone_from(&running.resolution);
                }
            }
            EventKind::ReviewDismissed => {
                if let EventData::Dismissal {
                    review_id: Some(id),
                } = &event.data
                {
                    dismissed.insert(id.clone());
                }
            }
            // A self-assignment may come without an assignee; a review
            // request without a reviewer has no target.
            EventKind::Assigned | EventKind::Unassigned => move_assignment(event, true),
            EventKind::ReviewRequested | EventKind::ReviewRequestRemoved => {
                move_assignment(event, false);
            }
            _ => {}
        }
    }

    if !dismissed.is_empty() {
        mark_dismissed(&mut events, &dismissed, issue);
    }

    events.retain(|event| {
        let keep = !event.kind.requires_target() || event.has_target();
        if !keep {
            warn!(
                code = %ErrorCode::UnresolvableActor,
                issue = %issue.id,
                kind = %event.kind,
                "dropping event without target"
            );
        }
        keep
    });

    debug!(
        issue = %issue.id,
        events = events.len(),
        synthesized = synthesized.len(),
        state = %running.state,
        "replayed timeline"
    );

    events.extend(synthesized);
    sort_timeline(&mut events, issue.created_at);

    issue.state = running.state;
    issue.types = running.types;
    issue.resolution = running.resolution;
    issue.events = events;
}

/// Move the assignee into `target` and the assigner into `actor`.
fn move_assignment(event: &mut Event, self_target: bool) {
    let EventData::Assignment { assignee, assigner } = &event.data else {
        return;
    };
    let performer = assigner.clone().or_else(|| event.actor.clone());
    let target = assignee
        .clone()
        .or_else(|| event.actor.clone().filter(|_| self_target));
    event.target = target;
    event.actor = performer;
}

/// Lower-case the label, update the matching set, and derive the
/// vocabulary event if the label belongs to one.
fn apply_label(
    event: &mut Event,
    running: &mut RunningState,
    vocabulary: &VocabularyConfig,
) -> Option<Event> {
    let EventData::Label { name } = &mut event.data else {
        return None;
    };
    *name = name.to_lowercase();
    let label = name.clone();
    let added = event.kind == EventKind::Labeled;

    let (kind, set) = if vocabulary.is_type(&label) {
        (EventKind::TypeUpdated, &mut running.types)
    } else if vocabulary.is_resolution(&label) {
        (EventKind::ResolutionUpdated, &mut running.resolution)
    } else {
        return None;
    };

    let data = if added {
        swap_tag(set, Some(label.as_str()), None);
        EventData::TagChange {
            new: Some(label),
            old: None,
        }
    } else {
        swap_tag(set, None, Some(label.as_str()));
        EventData::TagChange {
            new: None,
            old: Some(label),
        }
    };

    Some(Event::new(kind, event.actor.clone(), event.timestamp, data))
}

fn swap_tag(set: &mut Vec<String>, new: Option<&str>, old: Option<&str>) {
    if let Some(old) = old {
        set.retain(|tag| !tag.eq_ignore_ascii_case(old));
    }
    if let Some(new) = new {
        if !set.iter().any(|tag| tag.eq_ignore_ascii_case(new)) {
            set.push(new.to_string());
        }
    }
}

fn mark_dismissed(events: &mut [Event], dismissed: &HashSet<String>, issue: &Issue) {
    let mut found = HashSet::new();
    for event in events.iter_mut() {
        if let EventData::Review(review) = &mut event.data {
            if let Some(id) = review.review_id.as_ref().filter(|id| dismissed.contains(*id)) {
                found.insert(id.clone());
                review.outcome = "dismissed".to_string();
                review.dismissed = true;
            }
        }
    }

    for id in dismissed.difference(&found) {
        debug!(issue = %issue.id, review = %id, "dismissed review not in timeline");
    }
}

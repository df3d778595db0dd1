//! Per-issue merge of normalized fragments.
//!
//! # Algorithm
//!
//! 1. Index attributable comments by timestamp.
//! 2. For each `mentioned`/`subscribed` core event, find the latest comment
//!    at or up to `tolerance` before it. On a hit the reported user becomes
//!    the target and the comment author becomes the actor.
//! 3. Concatenate the buckets (comments, core, links, commits, reviews),
//!    drop unattributable events, and stable-sort with `created` first.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, warn};

use crate::error::ErrorCode;
use crate::event::{Event, sort_timeline};
use crate::model::identity::Identity;
use crate::model::issue::Issue;
use crate::normalize::Fragments;

/// Merge one issue's fragments into a sorted candidate timeline.
#[must_use]
pub fn merge(issue: &Issue, mut fragments: Fragments, tolerance: Duration) -> Vec<Event> {
    let comments = comment_index(&fragments.comments);
    for event in &mut fragments.core {
        rewrite_mention(event, &comments, tolerance);
    }

    let mut events = fragments.into_events();
    events.retain(|event| {
        let keep = event.has_actor();
        if !keep {
            warn!(
                code = %ErrorCode::UnresolvableActor,
                issue = %issue.id,
                kind = %event.kind,
                timestamp = %event.timestamp,
                "dropping event without actor"
            );
        }
        keep
    });

    sort_timeline(&mut events, issue.created_at);
    events
}

/// Comment author by comment time. A later comment at the same instant
/// replaces an earlier one.
fn comment_index(comments: &[Event]) -> BTreeMap<NaiveDateTime, Identity> {
    comments
        .iter()
        .filter_map(|comment| {
            let at = comment.timestamp.value()?;
            let author = comment.actor.clone().filter(|a| !a.is_empty())?;
            Some((at, author))
        })
        .collect()
}

fn rewrite_mention(
    event: &mut Event,
    comments: &BTreeMap<NaiveDateTime, Identity>,
    tolerance: Duration,
) {
    // An unattributed mention is dropped, not re-attributed.
    if !event.kind.is_mention() || !event.has_actor() {
        return;
    }
    let Some(at) = event.timestamp.value() else {
        return;
    };

    let window = at.checked_sub_signed(tolerance).unwrap_or(at)..=at;
    let Some((comment_at, author)) = comments.range(window).next_back() else {
        return;
    };

    debug!(
        kind = %event.kind,
        mention_at = %at,
        comment_at = %comment_at,
        author = %author,
        "attributing mention to colliding comment"
    );
    event.target = event.actor.take();
    event.actor = Some(author.clone());
}

//! Second pass: propagate issue links to their targets.
//!
//! Links are discovered while normalizing the *source* issue, but the
//! `referenced_by` event belongs on the *target*. All outbound references
//! are queued during the first pass and applied here once every issue of
//! the batch has a timeline.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::error::{EngineError, ErrorCode};
use crate::event::{Event, EventData, EventKind, sort_timeline};
use crate::identity::{IdentityCache, IdentityResolver};
use crate::model::issue::{Issue, IssueId};
use crate::normalize::CrossReference;

/// Append a `referenced_by` event to every in-batch link target and
/// re-sort the touched timelines. Returns the number of events added.
///
/// Targets outside the batch and self-references are skipped silently.
///
/// # Errors
///
/// Propagates identity resolution failures from `cache`.
pub fn backfill<R: IdentityResolver>(
    issues: &mut [Issue],
    references: &[CrossReference],
    cache: &mut IdentityCache<R>,
) -> Result<usize, EngineError> {
    let index: HashMap<IssueId, usize> = issues
        .iter()
        .enumerate()
        .map(|(i, issue)| (issue.id.clone(), i))
        .collect();

    let mut touched = BTreeSet::new();
    let mut added = 0;
    for reference in references {
        if reference.target == reference.source {
            continue;
        }
        let Some(&target) = index.get(&reference.target) else {
            debug!(
                source = %reference.source,
                target = %reference.target,
                "link target outside batch"
            );
            continue;
        };

        let raw_actor = reference.actor.clone().or_else(|| {
            index
                .get(&reference.source)
                .and_then(|&i| issues[i].author.clone())
        });
        let actor = match raw_actor {
            Some(raw) => cache.canonicalize(&raw)?,
            None => None,
        };
        if actor.is_none() {
            warn!(
                code = %ErrorCode::UnresolvableActor,
                source = %reference.source,
                target = %reference.target,
                "skipping backfill without actor"
            );
            continue;
        }

        issues[target].events.push(Event::new(
            EventKind::ReferencedBy,
            actor,
            reference.timestamp,
            EventData::ReferencedBy {
                issue: reference.source.clone(),
            },
        ));
        touched.insert(target);
        added += 1;
    }

    for &i in &touched {
        let issue = &mut issues[i];
        sort_timeline(&mut issue.events, issue.created_at);
    }

    Ok(added)
}

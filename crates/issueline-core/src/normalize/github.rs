//! GitHub front end.

use tracing::debug;

use super::{CrossReference, Fragments, NormalizedIssue, has_text, skip_fragment};
use crate::event::{CommentData, Event, EventData, EventKind, LinkData, LinkTarget, ReviewData};
use crate::model::identity::Identity;
use crate::model::issue::{Issue, IssueId, IssueKind, IssueState, Tracker};
use crate::model::timestamp::Timestamp;
use crate::raw::github::{
    RawAuthor, RawComment, RawCommit, RawGithubIssue, RawIssueEvent, RawRelatedCommit,
    RawRelatedIssue, RawReview,
};
use crate::raw::identity_of;

#[must_use]
pub fn normalize(raw: &RawGithubIssue) -> NormalizedIssue {
    let kind = if raw.is_pull_request {
        IssueKind::PullRequest
    } else {
        IssueKind::Issue
    };
    let created_at = Timestamp::parse_opt(raw.created_at.as_deref());

    let mut issue = Issue::new(raw.number.clone(), Tracker::Github, kind, created_at);
    issue.title.clone_from(&raw.title);
    issue.closed_at = Timestamp::parse_opt(raw.closed_at.as_deref());
    issue.author = identity_of(raw.user.as_ref());

    let mut fragments = Fragments::default();
    let mut outbound = Vec::new();

    fragments.core.push(Event::new(
        EventKind::Created,
        issue.author.clone(),
        created_at,
        EventData::Created {
            state: IssueState::Open,
        },
    ));

    if has_text(raw.body.as_deref()) {
        fragments.comments.push(Event::new(
            EventKind::Commented,
            issue.author.clone(),
            created_at,
            EventData::Comment(CommentData::default()),
        ));
    }

    for comment in raw.comments.iter().chain(&raw.review_comments) {
        if let Some(event) = comment_event(&issue.id, comment) {
            fragments.comments.push(event);
        }
    }

    for raw_event in &raw.events {
        let Some(event) = issue_event(&issue.id, raw_event) else {
            continue;
        };
        if let Some(comment) = dismissal_comment(raw_event, &event) {
            fragments.comments.push(comment);
        }
        fragments.core.push(event);
    }

    for related in &raw.related_issues {
        if let Some((event, reference)) = related_issue(&issue, related) {
            fragments.links.push(event);
            outbound.push(reference);
        }
    }

    for commit in &raw.related_commits {
        if let Some(event) = related_commit(&issue, commit) {
            fragments.links.push(event);
        }
    }

    for commit in &raw.commits {
        if let Some(event) = added_commit(&issue.id, commit) {
            fragments.commits.push(event);
        }
    }

    for review in &raw.reviews {
        let (event, comment) = review_events(review);
        fragments.reviews.push(event);
        if let Some(comment) = comment {
            fragments.comments.push(comment);
        }
    }

    debug!(
        issue = %issue.id,
        fragments = fragments.len(),
        outbound = outbound.len(),
        "normalized github issue"
    );

    NormalizedIssue {
        issue,
        fragments,
        outbound,
    }
}

fn comment_event(issue: &IssueId, comment: &RawComment) -> Option<Event> {
    if comment.id.is_none() {
        skip_fragment(issue, "comment", "missing id");
        return None;
    }

    Some(Event::new(
        EventKind::Commented,
        identity_of(comment.user.as_ref()),
        Timestamp::parse_opt(comment.created_at.as_deref()),
        EventData::Comment(CommentData::with_id(comment.id.clone())),
    ))
}

fn issue_event(issue: &IssueId, raw: &RawIssueEvent) -> Option<Event> {
    let Some(name) = raw.event.as_deref() else {
        skip_fragment(issue, "event", "missing event name");
        return None;
    };
    let kind = match name.parse::<EventKind>() {
        Ok(kind) => kind,
        Err(err) => {
            skip_fragment(issue, "event", &err.to_string());
            return None;
        }
    };

    let data = match kind {
        EventKind::Labeled | EventKind::Unlabeled => {
            let label = raw.label.as_ref().and_then(|l| l.name.as_deref());
            let Some(label) = label.filter(|l| !l.trim().is_empty()) else {
                skip_fragment(issue, name, "missing label");
                return None;
            };
            EventData::Label {
                name: label.trim().to_string(),
            }
        }
        EventKind::Assigned | EventKind::Unassigned => EventData::Assignment {
            assignee: identity_of(raw.assignee.as_ref()),
            assigner: identity_of(raw.assigner.as_ref()),
        },
        EventKind::ReviewRequested | EventKind::ReviewRequestRemoved => EventData::Assignment {
            assignee: identity_of(raw.requested_reviewer.as_ref()),
            assigner: identity_of(raw.user.as_ref()),
        },
        EventKind::ReviewDismissed => EventData::Dismissal {
            review_id: raw
                .dismissed_review
                .as_ref()
                .and_then(|r| r.review_id.clone()),
        },
        EventKind::Referenced | EventKind::Merged => raw
            .commit_id
            .as_deref()
            .filter(|hash| !hash.is_empty())
            .map_or(EventData::Empty, |hash| EventData::Commit {
                hash: hash.to_string(),
            }),
        EventKind::Renamed => {
            let Some(rename) = &raw.rename else {
                skip_fragment(issue, name, "missing rename payload");
                return None;
            };
            EventData::Rename {
                from: rename.from.clone(),
                to: rename.to.clone(),
            }
        }
        EventKind::Milestoned | EventKind::Demilestoned => {
            let title = raw.milestone.as_ref().and_then(|m| m.title.clone());
            let Some(title) = title else {
                skip_fragment(issue, name, "missing milestone title");
                return None;
            };
            EventData::Milestone { title }
        }
        EventKind::Closed
        | EventKind::Reopened
        | EventKind::Mentioned
        | EventKind::Subscribed
        | EventKind::Unsubscribed
        | EventKind::Locked
        | EventKind::Unlocked
        | EventKind::HeadRefDeleted
        | EventKind::HeadRefForcePushed
        | EventKind::ReadyForReview
        | EventKind::ConvertToDraft => EventData::Empty,
        EventKind::Created
        | EventKind::Commented
        | EventKind::StateUpdated
        | EventKind::TypeUpdated
        | EventKind::ResolutionUpdated
        | EventKind::AddLink
        | EventKind::RemoveLink
        | EventKind::ReferencedBy
        | EventKind::Reviewed
        | EventKind::CommitAdded => {
            skip_fragment(issue, name, "kind is not reported in the event list");
            return None;
        }
    };

    Some(Event::new(
        kind,
        identity_of(raw.user.as_ref()),
        Timestamp::parse_opt(raw.created_at.as_deref()),
        data,
    ))
}

/// A dismissal message is free text and joins the comment lookup.
fn dismissal_comment(raw: &RawIssueEvent, event: &Event) -> Option<Event> {
    if event.kind != EventKind::ReviewDismissed {
        return None;
    }
    let message = raw
        .dismissed_review
        .as_ref()
        .and_then(|r| r.dismissal_message.as_deref());
    if !has_text(message) {
        return None;
    }

    Some(Event::new(
        EventKind::Commented,
        event.actor.clone(),
        event.timestamp,
        EventData::Comment(CommentData::default()),
    ))
}

fn related_issue(issue: &Issue, related: &RawRelatedIssue) -> Option<(Event, CrossReference)> {
    let target = related.number().clone();
    if target.is_empty() {
        skip_fragment(&issue.id, "related issue", "missing issue number");
        return None;
    }

    let (user, created_at) = match related {
        RawRelatedIssue::Bare(_) => (None, None),
        RawRelatedIssue::Detailed {
            user, created_at, ..
        } => (identity_of(user.as_ref()), created_at.as_deref()),
    };
    let actor = user.or_else(|| issue.author.clone());
    let timestamp = Timestamp::parse_opt(created_at);

    let event = Event::new(
        EventKind::AddLink,
        actor.clone(),
        timestamp,
        EventData::Link(LinkData {
            target: LinkTarget::Issue(target.clone()),
        }),
    );
    let reference = CrossReference {
        source: issue.id.clone(),
        target,
        actor,
        timestamp,
    };
    Some((event, reference))
}

fn related_commit(issue: &Issue, commit: &RawRelatedCommit) -> Option<Event> {
    let Some(hash) = commit.hash.as_deref().filter(|h| !h.is_empty()) else {
        skip_fragment(&issue.id, "related commit", "missing hash");
        return None;
    };

    let actor = commit
        .author
        .as_ref()
        .map(RawAuthor::identity)
        .filter(|id| !id.is_empty())
        .or_else(|| issue.author.clone());

    Some(Event::new(
        EventKind::AddLink,
        actor,
        Timestamp::parse_opt(commit.time.as_deref()),
        EventData::Link(LinkData {
            target: LinkTarget::Commit(hash.to_string()),
        }),
    ))
}

/// The commit's own author wins over whoever pushed it.
fn added_commit(issue: &IssueId, commit: &RawCommit) -> Option<Event> {
    let Some(hash) = commit.hash.as_deref().filter(|h| !h.is_empty()) else {
        skip_fragment(issue, "commit", "missing hash");
        return None;
    };

    let actor: Option<Identity> =
        identity_of(commit.author.as_ref()).or_else(|| identity_of(commit.user.as_ref()));

    Some(Event::new(
        EventKind::CommitAdded,
        actor,
        Timestamp::parse_opt(commit.added_at.as_deref()),
        EventData::Commit {
            hash: hash.to_string(),
        },
    ))
}

fn review_events(review: &RawReview) -> (Event, Option<Event>) {
    let actor = identity_of(review.user.as_ref());
    let timestamp = Timestamp::parse_opt(review.submitted_at.as_deref());
    let outcome = review
        .state
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();

    let reviewed = Event::new(
        EventKind::Reviewed,
        actor.clone(),
        timestamp,
        EventData::Review(ReviewData {
            review_id: review.id.clone(),
            outcome,
            dismissed: false,
        }),
    );

    let comment = has_text(review.body.as_deref()).then(|| {
        Event::new(
            EventKind::Commented,
            actor,
            timestamp,
            EventData::Comment(CommentData::with_id(review.id.clone())),
        )
    });

    (reviewed, comment)
}

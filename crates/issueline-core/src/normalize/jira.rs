//! JIRA front end.
//!
//! JIRA has no event list; everything beyond comments comes out of the
//! changelog, where one history entry may change several fields at once.
//! Each relevant item becomes its own event sharing the entry's author and
//! time.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use super::{CrossReference, Fragments, NormalizedIssue, has_text, skip_fragment};
use crate::event::{CommentData, Event, EventData, EventKind, LinkData, LinkTarget};
use crate::model::identity::Identity;
use crate::model::issue::{Issue, IssueId, IssueKind, IssueState, Tracker};
use crate::model::timestamp::Timestamp;
use crate::raw::identity_of;
use crate::raw::jira::{RawChangeItem, RawChangelogEntry, RawJiraIssue};

#[must_use]
pub fn normalize(raw: &RawJiraIssue) -> NormalizedIssue {
    let created_at = Timestamp::parse_opt(raw.created.as_deref());

    let mut issue = Issue::new(raw.key.clone(), Tracker::Jira, IssueKind::Issue, created_at);
    issue.title.clone_from(&raw.title);
    issue.closed_at = Timestamp::parse_opt(raw.resolved.as_deref());
    issue.components.clone_from(&raw.components);
    issue.author = identity_of(raw.reporter.as_ref());

    if let Some(initial) = initial_type(raw) {
        issue.initial_types.push(initial.clone());
        issue.types.push(initial);
    }

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

    if has_text(raw.description.as_deref()) {
        fragments.comments.push(Event::new(
            EventKind::Commented,
            issue.author.clone(),
            created_at,
            EventData::Comment(CommentData::default()),
        ));
    }

    for comment in &raw.comments {
        if comment.id.is_none() {
            skip_fragment(&issue.id, "comment", "missing id");
            continue;
        }
        fragments.comments.push(Event::new(
            EventKind::Commented,
            identity_of(comment.author.as_ref()),
            Timestamp::parse_opt(comment.created.as_deref()),
            EventData::Comment(CommentData::with_id(comment.id.clone())),
        ));
    }

    let mut linked = HashSet::new();
    for entry in &raw.history {
        let actor = identity_of(entry.author.as_ref());
        let timestamp = Timestamp::parse_opt(entry.created.as_deref());
        for item in &entry.items {
            for event in changelog_events(&issue.id, item, actor.as_ref(), timestamp) {
                if let EventData::Link(LinkData {
                    target: LinkTarget::Issue(target),
                }) = &event.data
                {
                    if event.kind == EventKind::AddLink {
                        linked.insert(target.clone());
                        outbound.push(CrossReference {
                            source: issue.id.clone(),
                            target: target.clone(),
                            actor: event.actor.clone().or_else(|| issue.author.clone()),
                            timestamp,
                        });
                    }
                    fragments.links.push(event);
                } else {
                    fragments.core.push(event);
                }
            }
        }
    }

    for link in raw.issuelinks.iter().filter(|l| l.is_outward()) {
        let Some(target) = link.key.clone().filter(|k| !k.is_empty()) else {
            skip_fragment(&issue.id, "issue link", "missing key");
            continue;
        };
        if linked.contains(&target) {
            continue;
        }

        // Static links have no history entry: no time, and the reporter
        // stands in as actor.
        fragments.links.push(Event::new(
            EventKind::AddLink,
            issue.author.clone(),
            Timestamp::EMPTY,
            EventData::Link(LinkData {
                target: LinkTarget::Issue(target.clone()),
            }),
        ));
        outbound.push(CrossReference {
            source: issue.id.clone(),
            target: target.clone(),
            actor: issue.author.clone(),
            timestamp: Timestamp::EMPTY,
        });
        linked.insert(target);
    }

    debug!(
        issue = %issue.id,
        fragments = fragments.len(),
        outbound = outbound.len(),
        "normalized jira issue"
    );

    NormalizedIssue {
        issue,
        fragments,
        outbound,
    }
}

/// The type the issue was filed with: the old value of the earliest type
/// change, or the current type when it never changed.
fn initial_type(raw: &RawJiraIssue) -> Option<String> {
    let earliest_change = raw
        .history
        .iter()
        .filter_map(|entry| type_change(entry).map(|item| (entry, item)))
        .min_by_key(|(entry, _)| Timestamp::parse_opt(entry.created.as_deref()))
        .and_then(|(_, item)| item.old_value());

    earliest_change
        .or(raw.issue_type.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn type_change(entry: &RawChangelogEntry) -> Option<&RawChangeItem> {
    entry
        .items
        .iter()
        .find(|item| item.field.eq_ignore_ascii_case("issuetype"))
}

fn changelog_events(
    issue: &IssueId,
    item: &RawChangeItem,
    actor: Option<&Identity>,
    timestamp: Timestamp,
) -> Vec<Event> {
    let event = |kind, data| Event::new(kind, actor.cloned(), timestamp, data);

    match item.field.to_ascii_lowercase().as_str() {
        "status" => {
            let new = IssueState::from_tracker_status(item.new_value().unwrap_or_default());
            let old = IssueState::from_tracker_status(item.old_value().unwrap_or_default());
            if new == old {
                debug!(issue = %issue, state = %new, "status change without state change");
                return Vec::new();
            }
            vec![event(EventKind::StateUpdated, EventData::StateChange { new, old })]
        }
        "resolution" => tag_change(issue, item, EventKind::ResolutionUpdated)
            .map(|data| event(EventKind::ResolutionUpdated, data))
            .into_iter()
            .collect(),
        "issuetype" => tag_change(issue, item, EventKind::TypeUpdated)
            .map(|data| event(EventKind::TypeUpdated, data))
            .into_iter()
            .collect(),
        "assignee" => {
            let assigned = Identity::new(item.to_text.as_deref(), item.to.as_deref(), None);
            let previous = Identity::new(item.from_text.as_deref(), item.from.as_deref(), None);
            let (kind, assignee) = if !assigned.is_empty() {
                (EventKind::Assigned, assigned)
            } else if !previous.is_empty() {
                (EventKind::Unassigned, previous)
            } else {
                skip_fragment(issue, "assignee change", "no assignee on either side");
                return Vec::new();
            };
            vec![event(
                kind,
                EventData::Assignment {
                    assignee: Some(assignee),
                    assigner: actor.cloned(),
                },
            )]
        }
        "labels" => {
            let before = label_set(item.old_value());
            let after = label_set(item.new_value());
            let added = after
                .difference(&before)
                .map(|name| (EventKind::Labeled, name));
            let removed = before
                .difference(&after)
                .map(|name| (EventKind::Unlabeled, name));
            added
                .chain(removed)
                .map(|(kind, name)| {
                    event(
                        kind,
                        EventData::Label {
                            name: (*name).to_string(),
                        },
                    )
                })
                .collect()
        }
        "link" => {
            let (kind, key) = match (item.to.as_deref(), item.from.as_deref()) {
                (Some(to), _) if !to.trim().is_empty() => (EventKind::AddLink, to),
                (_, Some(from)) if !from.trim().is_empty() => (EventKind::RemoveLink, from),
                _ => {
                    skip_fragment(issue, "link change", "missing issue key");
                    return Vec::new();
                }
            };
            vec![event(
                kind,
                EventData::Link(LinkData {
                    target: LinkTarget::Issue(IssueId::new(key)),
                }),
            )]
        }
        _ => Vec::new(),
    }
}

fn tag_change(issue: &IssueId, item: &RawChangeItem, kind: EventKind) -> Option<EventData> {
    let new = item.new_value().map(str::to_lowercase);
    let old = item.old_value().map(str::to_lowercase);
    if new.is_none() && old.is_none() {
        skip_fragment(issue, kind.as_str(), "empty change");
        return None;
    }
    Some(EventData::TagChange { new, old })
}

fn label_set(raw: Option<&str>) -> BTreeSet<&str> {
    raw.map(|s| s.split_whitespace().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RawJiraIssue {
        serde_json::from_str(json).expect("valid raw issue")
    }

    fn core_kinds(normalized: &NormalizedIssue) -> Vec<EventKind> {
        normalized.fragments.core.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn initial_type_from_earliest_type_change() {
        let normalized = normalize(&parse(
            r#"{
                "key": "PROJ-1",
                "type": "Improvement",
                "created": "2014-01-01T00:00:00.000+0000",
                "reporter": {"name": "Rita Reporter", "username": "rita"},
                "history": [
                    {"created": "2014-01-05T00:00:00.000+0000",
                     "items": [{"field": "issuetype", "fromString": "Task", "toString": "Improvement"}]},
                    {"created": "2014-01-03T00:00:00.000+0000",
                     "items": [{"field": "issuetype", "fromString": "Bug", "toString": "Task"}]}
                ]
            }"#,
        ));
        assert_eq!(
            normalized.issue.types,
            vec!["issue".to_string(), "bug".to_string()]
        );
        assert_eq!(normalized.issue.initial_types, normalized.issue.types);
        assert_eq!(
            core_kinds(&normalized),
            vec![EventKind::Created, EventKind::TypeUpdated, EventKind::TypeUpdated]
        );
    }

    #[test]
    fn initial_type_falls_back_to_current_type() {
        let normalized = normalize(&parse(r#"{"key": "PROJ-2", "type": "New Feature"}"#));
        assert_eq!(normalized.issue.types, vec![
            "issue".to_string(),
            "new feature".to_string()
        ]);
    }

    #[test]
    fn status_changes_map_onto_issue_states() {
        let normalized = normalize(&parse(
            r#"{
                "key": "PROJ-3",
                "history": [
                    {"author": {"username": "dev"}, "created": "2014-02-01T10:00:00.000+0000",
                     "items": [
                        {"field": "status", "fromString": "Open", "toString": "In Progress"},
                        {"field": "status", "fromString": "In Progress", "toString": "Resolved"},
                        {"field": "resolution", "toString": "Fixed"}
                     ]}
                ]
            }"#,
        ));

        let events = &normalized.fragments.core;
        assert_eq!(
            core_kinds(&normalized),
            vec![
                EventKind::Created,
                EventKind::StateUpdated,
                EventKind::ResolutionUpdated
            ]
        );
        assert_eq!(
            events[1].data,
            EventData::StateChange {
                new: IssueState::Closed,
                old: IssueState::Open,
            }
        );
        assert_eq!(
            events[2].data,
            EventData::TagChange {
                new: Some("fixed".into()),
                old: None,
            }
        );
        assert_eq!(events[1].timestamp.to_canonical(), "2014-02-01 10:00:00");
    }

    #[test]
    fn assignee_and_label_changes() {
        let normalized = normalize(&parse(
            r#"{
                "key": "PROJ-4",
                "history": [
                    {"author": {"username": "lead"}, "created": "2014-02-01T10:00:00.000+0000",
                     "items": [
                        {"field": "assignee", "to": "jdoe", "toString": "John Doe"},
                        {"field": "labels", "fromString": "ui perf", "toString": "perf bug"}
                     ]},
                    {"author": {"username": "lead"}, "created": "2014-02-02T10:00:00.000+0000",
                     "items": [{"field": "assignee", "from": "jdoe", "fromString": "John Doe"}]},
                    {"author": {"username": "lead"}, "created": "2014-02-03T10:00:00.000+0000",
                     "items": [{"field": "assignee"}, {"field": "Fix Version", "toString": "2.0"}]}
                ]
            }"#,
        ));

        assert_eq!(
            core_kinds(&normalized),
            vec![
                EventKind::Created,
                EventKind::Assigned,
                EventKind::Labeled,
                EventKind::Unlabeled,
                EventKind::Unassigned,
            ]
        );
        let assigned = &normalized.fragments.core[1];
        assert!(matches!(
            &assigned.data,
            EventData::Assignment { assignee: Some(who), assigner: Some(by) }
                if who.signature() == "John Doe" && by.display_name() == "lead"
        ));
        assert_eq!(normalized.fragments.core[2].data, EventData::Label {
            name: "bug".into()
        });
        assert_eq!(normalized.fragments.core[3].data, EventData::Label {
            name: "ui".into()
        });
    }

    #[test]
    fn changelog_links_and_static_links() {
        let normalized = normalize(&parse(
            r#"{
                "key": "PROJ-5",
                "reporter": {"username": "rita"},
                "issuelinks": [
                    {"key": "PROJ-6", "relation": "relates to", "direction": "outward"},
                    {"key": "PROJ-7", "relation": "blocks", "direction": "outward"},
                    {"key": "PROJ-8", "relation": "is blocked by", "direction": "inward"}
                ],
                "history": [
                    {"author": {"username": "dev"}, "created": "2014-03-01T00:00:00.000+0000",
                     "items": [{"field": "Link", "to": "PROJ-6", "toString": "This issue relates to PROJ-6"}]},
                    {"author": {"username": "dev"}, "created": "2014-03-02T00:00:00.000+0000",
                     "items": [{"field": "Link", "from": "PROJ-9", "fromString": "This issue relates to PROJ-9"}]}
                ]
            }"#,
        ));

        let links = &normalized.fragments.links;
        let kinds: Vec<_> = links.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::AddLink, EventKind::RemoveLink, EventKind::AddLink]
        );

        let targets: Vec<_> = normalized
            .outbound
            .iter()
            .map(|r| r.target.as_str())
            .collect();
        assert_eq!(targets, vec!["PROJ-6", "PROJ-7"]);

        let static_link = &normalized.outbound[1];
        assert!(static_link.timestamp.is_empty());
        assert_eq!(static_link.actor, Some(Identity::from_username("rita")));
    }

    #[test]
    fn description_becomes_creation_comment() {
        let normalized = normalize(&parse(
            r#"{
                "key": "PROJ-11",
                "created": "2014-01-01T00:00:00.000+0000",
                "reporter": {"username": "rita"},
                "description": "Saving twice crashes the editor."
            }"#,
        ));
        let comments = &normalized.fragments.comments;
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].kind, EventKind::Commented);
        assert_eq!(comments[0].actor, Some(Identity::from_username("rita")));
        assert_eq!(comments[0].timestamp, normalized.issue.created_at);

        let blank = normalize(&parse(r#"{"key": "PROJ-12", "description": "  "}"#));
        assert!(blank.fragments.comments.is_empty());
    }

    #[test]
    fn comments_require_ids() {
        let normalized = normalize(&parse(
            r#"{
                "key": "PROJ-10",
                "comments": [
                    {"id": 100, "author": {"username": "a"}, "created": "Tue, 7 Jan 2014 08:15:00 +0000"},
                    {"author": {"username": "b"}, "created": "Tue, 7 Jan 2014 08:16:00 +0000"}
                ]
            }"#,
        ));
        assert_eq!(normalized.fragments.comments.len(), 1);
        assert_eq!(
            normalized.fragments.comments[0].timestamp.to_canonical(),
            "2014-01-07 08:15:00"
        );
    }
}

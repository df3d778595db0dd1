use serde::Deserialize;

use super::{RawUser, null_as_default, opt_id};
use crate::model::identity::Identity;
use crate::model::issue::IssueId;

/// One issue or pull request from the GitHub wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGithubIssue {
    pub number: IssueId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub closed_at: Option<String>,
    #[serde(default, rename = "isPullRequest")]
    pub is_pull_request: bool,
    #[serde(default)]
    pub user: Option<RawUser>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, rename = "commentsList", deserialize_with = "null_as_default")]
    pub comments: Vec<RawComment>,
    #[serde(default, rename = "eventsList", deserialize_with = "null_as_default")]
    pub events: Vec<RawIssueEvent>,
    #[serde(default, rename = "relatedCommits", deserialize_with = "null_as_default")]
    pub related_commits: Vec<RawRelatedCommit>,
    #[serde(default, rename = "relatedIssues", deserialize_with = "null_as_default")]
    pub related_issues: Vec<RawRelatedIssue>,
    #[serde(default, rename = "commitsList", deserialize_with = "null_as_default")]
    pub commits: Vec<RawCommit>,
    #[serde(default, rename = "reviewsList", deserialize_with = "null_as_default")]
    pub reviews: Vec<RawReview>,
    #[serde(
        default,
        rename = "reviewCommentsList",
        deserialize_with = "null_as_default"
    )]
    pub review_comments: Vec<RawComment>,
}

/// Issue comment or review comment.
#[derive(Debug, Clone, Deserialize)]
pub struct RawComment {
    #[serde(default, deserialize_with = "opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub user: Option<RawUser>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Entry of the wrapper's issue event list.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIssueEvent {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub user: Option<RawUser>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub label: Option<RawLabel>,
    #[serde(default)]
    pub assignee: Option<RawUser>,
    #[serde(default)]
    pub assigner: Option<RawUser>,
    #[serde(default)]
    pub requested_reviewer: Option<RawUser>,
    #[serde(default)]
    pub commit_id: Option<String>,
    #[serde(default)]
    pub dismissed_review: Option<RawDismissedReview>,
    #[serde(default)]
    pub rename: Option<RawRename>,
    #[serde(default)]
    pub milestone: Option<RawMilestone>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLabel {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDismissedReview {
    #[serde(default, deserialize_with = "opt_id")]
    pub review_id: Option<String>,
    #[serde(default)]
    pub dismissal_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRename {
    #[serde(default, deserialize_with = "null_as_default")]
    pub from: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub to: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMilestone {
    #[serde(default)]
    pub title: Option<String>,
}

/// Commit that mentions the issue.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRelatedCommit {
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub author: Option<RawAuthor>,
}

/// Older wrapper versions store a commit author as a bare string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAuthor {
    Name(String),
    User(RawUser),
}

impl RawAuthor {
    #[must_use]
    pub fn identity(&self) -> Identity {
        match self {
            Self::Name(name) => Identity::new(Some(name), Some(name), None),
            Self::User(user) => user.identity(),
        }
    }
}

/// Issue referenced from this one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRelatedIssue {
    Bare(IssueId),
    Detailed {
        #[serde(alias = "issue")]
        number: IssueId,
        #[serde(default)]
        user: Option<RawUser>,
        #[serde(default)]
        created_at: Option<String>,
    },
}

impl RawRelatedIssue {
    #[must_use]
    pub const fn number(&self) -> &IssueId {
        match self {
            Self::Bare(number) | Self::Detailed { number, .. } => number,
        }
    }
}

/// Commit pushed to a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCommit {
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub author: Option<RawUser>,
    #[serde(default)]
    pub user: Option<RawUser>,
    #[serde(default)]
    pub added_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawReview {
    #[serde(default, deserialize_with = "opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub user: Option<RawUser>,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_issue_has_empty_lists() {
        let raw: RawGithubIssue = serde_json::from_str(
            r#"{
                "number": 5,
                "title": null,
                "eventsList": null,
                "commentsList": null,
                "relatedCommits": null
            }"#,
        )
        .expect("parse");
        assert_eq!(raw.number.as_str(), "5");
        assert!(raw.title.is_empty());
        assert!(raw.events.is_empty());
        assert!(raw.comments.is_empty());
        assert!(raw.related_commits.is_empty());
        assert!(raw.related_issues.is_empty());
        assert!(raw.reviews.is_empty());
        assert!(!raw.is_pull_request);
    }

    #[test]
    fn related_commit_author_shapes() {
        let commits: Vec<RawRelatedCommit> = serde_json::from_str(
            r#"[
                {"hash": "aaa", "time": "2020-01-01T00:00:00+00:00", "author": "octo"},
                {"hash": "bbb", "author": {"name": "Octo Cat", "email": "o@c.at"}}
            ]"#,
        )
        .expect("parse");

        let bare = commits[0].author.as_ref().expect("author").identity();
        assert_eq!(bare.name.as_deref(), Some("octo"));
        assert_eq!(bare.username.as_deref(), Some("octo"));

        let object = commits[1].author.as_ref().expect("author").identity();
        assert_eq!(object.signature(), "Octo Cat <o@c.at>");
    }

    #[test]
    fn related_issue_shapes() {
        let issues: Vec<RawRelatedIssue> = serde_json::from_str(
            r#"[12, "13", {"number": 14, "user": {"username": "x"}, "created_at": "2020-01-01T00:00:00Z"}]"#,
        )
        .expect("parse");
        let numbers: Vec<_> = issues.iter().map(|i| i.number().as_str()).collect();
        assert_eq!(numbers, vec!["12", "13", "14"]);
        assert!(matches!(issues[2], RawRelatedIssue::Detailed { .. }));
    }

    #[test]
    fn issue_event_optional_payloads() {
        let event: RawIssueEvent = serde_json::from_str(
            r#"{
                "event": "review_dismissed",
                "user": {"username": "lead"},
                "created_at": "2020-02-02T00:00:00Z",
                "dismissed_review": {"review_id": 991, "state": "APPROVED", "dismissal_message": "stale"}
            }"#,
        )
        .expect("parse");
        let dismissed = event.dismissed_review.expect("dismissal");
        assert_eq!(dismissed.review_id.as_deref(), Some("991"));
        assert!(event.label.is_none());
    }
}

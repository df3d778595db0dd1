use serde::Deserialize;

use super::{RawUser, null_as_default, opt_id};
use crate::model::issue::IssueId;

/// One JIRA issue with its changelog.
#[derive(Debug, Clone, Deserialize)]
pub struct RawJiraIssue {
    pub key: IssueId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub resolved: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub issue_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: Vec<String>,
    #[serde(default)]
    pub reporter: Option<RawUser>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<RawJiraComment>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub issuelinks: Vec<RawIssueLink>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub history: Vec<RawChangelogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawJiraComment {
    #[serde(default, deserialize_with = "opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub author: Option<RawUser>,
    #[serde(default)]
    pub created: Option<String>,
}

/// Static link as listed on the issue itself.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIssueLink {
    #[serde(default)]
    pub key: Option<IssueId>,
    #[serde(default)]
    pub direction: Option<String>,
}

impl RawIssueLink {
    #[must_use]
    pub fn is_outward(&self) -> bool {
        self.direction
            .as_deref()
            .is_none_or(|d| d.eq_ignore_ascii_case("outward"))
    }
}

/// One changelog history entry; several fields may change at once.
#[derive(Debug, Clone, Deserialize)]
pub struct RawChangelogEntry {
    #[serde(default)]
    pub author: Option<RawUser>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<RawChangeItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawChangeItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub field: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default, rename = "fromString")]
    pub from_text: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default, rename = "toString")]
    pub to_text: Option<String>,
}

impl RawChangeItem {
    /// Display value before the change, falling back to the raw value.
    #[must_use]
    pub fn old_value(&self) -> Option<&str> {
        pick(self.from_text.as_deref(), self.from.as_deref())
    }

    /// Display value after the change, falling back to the raw value.
    #[must_use]
    pub fn new_value(&self) -> Option<&str> {
        pick(self.to_text.as_deref(), self.to.as_deref())
    }
}

/// A blank display string does not hide the raw value.
fn pick<'a>(text: Option<&'a str>, raw: Option<&'a str>) -> Option<&'a str> {
    let present = |value: Option<&'a str>| value.map(str::trim).filter(|s| !s.is_empty());
    present(text).or_else(|| present(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changelog_item_prefers_display_strings() {
        let item: RawChangeItem = serde_json::from_str(
            r#"{"field": "status", "from": "1", "fromString": "Open", "to": "5", "toString": "Resolved"}"#,
        )
        .expect("parse");
        assert_eq!(item.old_value(), Some("Open"));
        assert_eq!(item.new_value(), Some("Resolved"));

        let item: RawChangeItem =
            serde_json::from_str(r#"{"field": "assignee", "to": "jdoe", "toString": ""}"#)
                .expect("parse");
        assert_eq!(item.new_value(), Some("jdoe"));
        assert_eq!(item.old_value(), None);
    }

    #[test]
    fn blank_display_string_falls_back_to_raw_value() {
        let item: RawChangeItem = serde_json::from_str(
            r#"{"field": "status", "from": "Open", "fromString": "  ", "to": "Closed", "toString": ""}"#,
        )
        .expect("parse");
        assert_eq!(item.old_value(), Some("Open"));
        assert_eq!(item.new_value(), Some("Closed"));
    }

    #[test]
    fn issue_tolerates_null_collections() {
        let raw: RawJiraIssue = serde_json::from_str(
            r#"{"key": "PROJ-1", "components": null, "history": null, "issuelinks": null}"#,
        )
        .expect("parse");
        assert_eq!(raw.key.as_str(), "PROJ-1");
        assert!(raw.components.is_empty());
        assert!(raw.history.is_empty());
        assert!(raw.comments.is_empty());
    }

    #[test]
    fn link_direction_defaults_to_outward() {
        let links: Vec<RawIssueLink> = serde_json::from_str(
            r#"[{"key": "P-2"}, {"key": "P-3", "direction": "inward"}, {"key": "P-4", "direction": "Outward"}]"#,
        )
        .expect("parse");
        let outward: Vec<_> = links.iter().map(RawIssueLink::is_outward).collect();
        assert_eq!(outward, vec![true, false, true]);
    }
}

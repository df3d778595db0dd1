use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque key assigned by the identity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(pub u64);

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `(name, username, email)` description of an actor.
///
/// Raw identities come straight from tracker fragments and may have any
/// field missing. After canonicalization `name`/`email` hold the service's
/// canonical values and `key` is set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<IdentityKey>,
}

impl Identity {
    #[must_use]
    pub fn new(
        name: Option<&str>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Self {
        Self {
            name: non_empty(name),
            username: non_empty(username),
            email: non_empty(email),
            key: None,
        }
    }

    /// Identity known only by a tracker login.
    #[must_use]
    pub fn from_username(username: &str) -> Self {
        Self::new(None, Some(username), None)
    }

    /// True when no field carries any text; such an identity cannot be
    /// attributed and events carrying it as a required actor are dropped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.username.is_none() && self.email.is_none()
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.key.is_some()
    }

    /// Name for display and for the resolver signature: the name, falling
    /// back to the username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn email_or_empty(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }

    /// Lookup key for the resolver cache: `name` or `name <email>`.
    #[must_use]
    pub fn signature(&self) -> String {
        let name = self.display_name();
        match self.email.as_deref() {
            Some(email) => format!("{name} <{email}>"),
            None => name.to_string(),
        }
    }

    /// Fill missing name/email from a richer record seen elsewhere.
    pub fn complete_from(&mut self, richer: &Self) {
        if self.name.is_none() {
            self.name.clone_from(&richer.name);
        }
        if self.email.is_none() {
            self.email.clone_from(&richer.email);
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

/// Normalize blank strings to `None`.
pub(crate) fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_are_absent() {
        let id = Identity::new(Some("  "), Some(""), None);
        assert!(id.is_empty());
    }

    #[test]
    fn signature_with_and_without_email() {
        let id = Identity::new(Some("Alice"), Some("alice"), Some("a@example.com"));
        assert_eq!(id.signature(), "Alice <a@example.com>");

        let id = Identity::new(None, Some("bob"), None);
        assert_eq!(id.signature(), "bob");
    }

    #[test]
    fn complete_from_only_fills_gaps() {
        let mut sparse = Identity::new(None, Some("carol"), Some("c@old.org"));
        let rich = Identity::new(Some("Carol C"), Some("carol"), Some("c@new.org"));
        sparse.complete_from(&rich);
        assert_eq!(sparse.name.as_deref(), Some("Carol C"));
        assert_eq!(sparse.email.as_deref(), Some("c@old.org"));
    }

    #[test]
    fn deserializes_with_missing_fields() {
        let id: Identity = serde_json::from_str(r#"{"username":"dave"}"#).expect("parse");
        assert_eq!(id.username.as_deref(), Some("dave"));
        assert!(id.name.is_none());
        assert!(!id.is_resolved());
    }
}

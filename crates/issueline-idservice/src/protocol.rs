//! Response bodies of the identity service.
//!
//! Parsing is kept free of I/O so every shape the service may answer with
//! can be tested without a server.

use issueline_core::{IdentityKey, ResolvedPerson, ResolverError};
use serde::Deserialize;
use serde_json::Value;

/// Answer to `POST /post_user_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Registered(IdentityKey),
    /// The service refused the `(name, email)` pair, typically because the
    /// e-mail is missing or invalid.
    Rejected(String),
}

#[derive(Debug, Deserialize)]
struct RegistrationBody {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct PersonRow {
    id: Value,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email1: Option<String>,
}

/// Parse a registration answer.
///
/// # Errors
///
/// [`ResolverError::MalformedResponse`] when the body is not JSON or holds
/// neither a usable `id` nor an `error`.
pub fn parse_registration(body: &str) -> Result<Registration, ResolverError> {
    let parsed: RegistrationBody = serde_json::from_str(body)
        .map_err(|e| malformed(format!("registration body is not JSON: {e}")))?;

    if let Some(error) = parsed.error {
        let reason = error.as_str().map_or_else(|| error.to_string(), str::to_string);
        return Ok(Registration::Rejected(reason));
    }

    parsed
        .id
        .as_ref()
        .and_then(key_of)
        .map(Registration::Registered)
        .ok_or_else(|| malformed(format!("registration without id: {body}")))
}

/// Parse a `GET /getUser/<id>` answer into the canonical person.
///
/// # Errors
///
/// [`ResolverError::MalformedResponse`] when the body is not a non-empty
/// JSON array of person rows.
pub fn parse_person(body: &str) -> Result<ResolvedPerson, ResolverError> {
    let rows: Vec<PersonRow> = serde_json::from_str(body)
        .map_err(|e| malformed(format!("person body is not a row list: {e}")))?;
    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| malformed("person lookup returned no rows".to_string()))?;
    let id = key_of(&row.id).ok_or_else(|| malformed(format!("person id {} is not numeric", row.id)))?;

    Ok(ResolvedPerson {
        id,
        name: row.name.unwrap_or_default(),
        email: row.email1.unwrap_or_default(),
    })
}

/// E-mail to retry a rejected registration with.
#[must_use]
pub fn fallback_email(name: &str) -> String {
    format!("{name}@default.com")
}

/// Ids arrive as numbers, sometimes as numeric strings.
fn key_of(value: &Value) -> Option<IdentityKey> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .map(IdentityKey)
}

const fn malformed(reason: String) -> ResolverError {
    ResolverError::MalformedResponse(reason)
}

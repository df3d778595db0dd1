//! issueline-core library.
//!
//! Reconstructs per-issue event timelines from raw GitHub and JIRA
//! fragments and canonicalizes every actor through an [`IdentityResolver`].
//!
//! ```text
//! raw ─▶ normalize ─▶ merge ─▶ replay ─▶ canonicalize ─▶ backfill ─▶ output
//! ```
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums for engine failures, `anyhow::Result`
//!   for configuration loading.
//! - **Logging**: `tracing` macros; recoverable problems carry an
//!   [`ErrorCode`] in the `code` field.

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod identity;
pub mod model;
pub mod normalize;
pub mod output;
pub mod raw;
pub mod timeline;

pub use config::{EngineConfig, load_engine_config};
pub use engine::{BatchSummary, Engine};
pub use error::{EngineError, ErrorCode, ResolverError};
pub use event::{Event, EventData, EventKind};
pub use identity::{IdentityCache, IdentityResolver, InMemoryResolver, ResolvedPerson};
pub use model::{Identity, IdentityKey, Issue, IssueId, IssueState, Timestamp, Tracker};
pub use output::{EventRecord, InfoValue, IssueRecord};
pub use raw::{RawGithubIssue, RawIssue, RawJiraIssue};

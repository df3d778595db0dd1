//! Networked identity resolution for issueline.
//!
//! [`HttpIdResolver`] implements [`issueline_core::IdentityResolver`] on top
//! of the identity service's two endpoints:
//!
//! ```text
//! POST /post_user_id   projectID, name, email  ─▶ {"id": N} | {"error": ...}
//! GET  /getUser/<N>                             ─▶ [{"id", "name", "email1"}]
//! ```
//!
//! Requests are blocking (`ureq`), time-limited, and retried with linear
//! backoff on transport failure.

pub mod client;
pub mod config;
pub mod protocol;

pub use client::HttpIdResolver;
pub use config::{IdServiceConfig, load_idservice_config};

//! Identity canonicalization.
//!
//! Raw `(name, username, email)` triples harvested from different tracker
//! subsystems are resolved into canonical identities by an external
//! [`IdentityResolver`]. The [`IdentityCache`] sits in front of it for the
//! duration of one run.

pub mod cache;
pub mod memory;

pub use cache::IdentityCache;
pub use memory::InMemoryResolver;

use crate::error::ResolverError;
use crate::model::identity::IdentityKey;

/// Canonical record returned by a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPerson {
    pub id: IdentityKey,
    pub name: String,
    pub email: String,
}

/// Backend that maps a display name and e-mail to a canonical person.
///
/// Implementations must be idempotent for the same input.
pub trait IdentityResolver {
    /// # Errors
    ///
    /// [`ResolverError::Unavailable`] when the backend cannot be reached,
    /// [`ResolverError::MalformedResponse`] when it answers with garbage.
    fn resolve(&self, display_name: &str, email: &str) -> Result<ResolvedPerson, ResolverError>;
}

impl<R: IdentityResolver + ?Sized> IdentityResolver for &R {
    fn resolve(&self, display_name: &str, email: &str) -> Result<ResolvedPerson, ResolverError> {
        (**self).resolve(display_name, email)
    }
}

impl<R: IdentityResolver + ?Sized> IdentityResolver for Box<R> {
    fn resolve(&self, display_name: &str, email: &str) -> Result<ResolvedPerson, ResolverError> {
        (**self).resolve(display_name, email)
    }
}

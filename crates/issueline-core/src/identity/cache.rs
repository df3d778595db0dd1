//! Session-scoped cache in front of an [`IdentityResolver`].
//!
//! # Algorithm
//!
//! 1. Before any resolution, every actor and target of the batch is fed to
//!    [`IdentityCache::observe`], building a username-keyed backfill table
//!    of the richest name/e-mail seen for each login.
//! 2. [`IdentityCache::canonicalize`] completes a sparse identity from that
//!    table, builds its signature (`name` or `name <email>`), and only calls
//!    the resolver on a signature it has not seen this run.
//!
//! Resolver failures are fatal: every output row depends on canonical
//! names, so the error is propagated rather than skipped.

use std::collections::HashMap;

use tracing::debug;

use super::{IdentityResolver, ResolvedPerson};
use crate::error::EngineError;
use crate::model::identity::{Identity, non_empty};

#[derive(Debug)]
pub struct IdentityCache<R> {
    resolver: R,
    key_by_signature: HashMap<String, ResolvedPerson>,
    username_backfill: HashMap<String, Identity>,
    lookups: usize,
    hits: usize,
}

impl<R: IdentityResolver> IdentityCache<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            key_by_signature: HashMap::new(),
            username_backfill: HashMap::new(),
            lookups: 0,
            hits: 0,
        }
    }

    /// Record a raw identity in the username backfill table.
    pub fn observe(&mut self, identity: &Identity) {
        let Some(username) = identity.username.as_deref() else {
            return;
        };
        let entry = self
            .username_backfill
            .entry(username.to_lowercase())
            .or_insert_with(|| Identity::from_username(username));
        entry.complete_from(identity);
    }

    pub fn observe_all<'a>(&mut self, identities: impl IntoIterator<Item = &'a Identity>) {
        for identity in identities {
            self.observe(identity);
        }
    }

    /// Resolve a raw identity to its canonical form.
    ///
    /// Returns `Ok(None)` for an identity with no usable field, which the
    /// caller treats as unattributable. Already-resolved identities are
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// [`EngineError::Resolver`] when the resolver fails and
    /// [`EngineError::IncompleteIdentity`] when it answers without a name.
    pub fn canonicalize(&mut self, identity: &Identity) -> Result<Option<Identity>, EngineError> {
        if identity.is_resolved() {
            return Ok(Some(identity.clone()));
        }

        let mut completed = identity.clone();
        if completed.name.is_none() || completed.email.is_none() {
            let richer = completed
                .username
                .as_deref()
                .and_then(|u| self.username_backfill.get(&u.to_lowercase()));
            if let Some(richer) = richer {
                completed.complete_from(richer);
            }
        }

        if completed.is_empty() {
            return Ok(None);
        }

        let signature = completed.signature();
        if let Some(person) = self.key_by_signature.get(&signature) {
            self.hits += 1;
            debug!(%signature, "identity served from cache");
            return Ok(Some(apply(completed, person)));
        }

        self.lookups += 1;
        debug!(%signature, "passing identity to resolver");
        let person = self
            .resolver
            .resolve(completed.display_name(), completed.email_or_empty())
            .map_err(|source| EngineError::Resolver {
                signature: signature.clone(),
                source,
            })?;

        if person.name.trim().is_empty() {
            return Err(EngineError::IncompleteIdentity(signature));
        }

        let resolved = apply(completed, &person);
        self.key_by_signature.insert(signature, person);
        Ok(Some(resolved))
    }

    /// Canonicalize an optional slot in place; unattributable identities
    /// become `None`.
    ///
    /// # Errors
    ///
    /// Same as [`IdentityCache::canonicalize`].
    pub fn canonicalize_slot(&mut self, slot: &mut Option<Identity>) -> Result<(), EngineError> {
        if let Some(identity) = slot.as_ref() {
            *slot = self.canonicalize(identity)?;
        }
        Ok(())
    }

    /// External resolver calls issued this run.
    #[must_use]
    pub const fn lookups(&self) -> usize {
        self.lookups
    }

    /// Canonicalizations answered from the cache.
    #[must_use]
    pub const fn hits(&self) -> usize {
        self.hits
    }

    #[must_use]
    pub const fn resolver(&self) -> &R {
        &self.resolver
    }
}

fn apply(raw: Identity, person: &ResolvedPerson) -> Identity {
    Identity {
        name: Some(person.name.clone()),
        username: raw.username,
        email: non_empty(Some(&person.email)),
        key: Some(person.id),
    }
}

//! Batch driver.
//!
//! Sequencing per batch:
//!
//! 1. Normalize every raw issue.
//! 2. Feed every raw identity of the batch to the username backfill table.
//! 3. Per issue: merge, replay, canonicalize actors and targets.
//! 4. Apply queued cross-issue references and re-sort their targets.
//!
//! Any identity resolution failure aborts the batch; no partial output is
//! returned.

use std::time::Instant;

use tracing::info;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::identity::{IdentityCache, IdentityResolver};
use crate::model::issue::Issue;
use crate::normalize::{self, NormalizedIssue};
use crate::raw::RawIssue;
use crate::timeline;

/// Counters for the last processed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub issues: usize,
    pub events: usize,
    pub backfilled: usize,
    pub resolver_calls: usize,
    pub cache_hits: usize,
}

#[derive(Debug)]
pub struct Engine<R> {
    config: EngineConfig,
    cache: IdentityCache<R>,
    summary: BatchSummary,
}

impl<R: IdentityResolver> Engine<R> {
    pub fn new(config: EngineConfig, resolver: R) -> Self {
        Self {
            config,
            cache: IdentityCache::new(resolver),
            summary: BatchSummary::default(),
        }
    }

    /// Reconstruct the timelines of one batch, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the identity resolver fails or answers
    /// without a canonical name.
    pub fn process(&mut self, batch: &[RawIssue]) -> Result<Vec<Issue>, EngineError> {
        let start = Instant::now();
        let lookups_before = self.cache.lookups();
        let hits_before = self.cache.hits();

        let normalized: Vec<NormalizedIssue> = batch.iter().map(normalize::normalize).collect();
        for issue in &normalized {
            self.cache.observe_all(issue.identities());
        }

        let mut issues = Vec::with_capacity(normalized.len());
        let mut references = Vec::new();
        for NormalizedIssue {
            mut issue,
            fragments,
            outbound,
        } in normalized
        {
            let tolerance = self.config.tracker(issue.tracker).mention_tolerance();
            let events = timeline::merge(&issue, fragments, tolerance);
            timeline::reconstruct(&mut issue, events, &self.config.vocabulary);
            self.canonicalize(&mut issue)?;
            references.extend(outbound);
            issues.push(issue);
        }

        let backfilled = timeline::backfill(&mut issues, &references, &mut self.cache)?;

        self.summary = BatchSummary {
            issues: issues.len(),
            events: issues.iter().map(|i| i.events.len()).sum(),
            backfilled,
            resolver_calls: self.cache.lookups() - lookups_before,
            cache_hits: self.cache.hits() - hits_before,
        };
        info!(
            issues = self.summary.issues,
            events = self.summary.events,
            backfilled = self.summary.backfilled,
            resolver_calls = self.summary.resolver_calls,
            cache_hits = self.summary.cache_hits,
            elapsed_ms = start.elapsed().as_millis(),
            "processed issue batch"
        );

        Ok(issues)
    }

    fn canonicalize(&mut self, issue: &mut Issue) -> Result<(), EngineError> {
        self.cache.canonicalize_slot(&mut issue.author)?;
        for event in &mut issue.events {
            self.cache.canonicalize_slot(&mut event.actor)?;
            self.cache.canonicalize_slot(&mut event.target)?;
        }
        Ok(())
    }

    #[must_use]
    pub const fn summary(&self) -> BatchSummary {
        self.summary
    }

    #[must_use]
    pub const fn cache(&self) -> &IdentityCache<R> {
        &self.cache
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }
}

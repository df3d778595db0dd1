//! Timeline assembly: merge, state replay, and cross-issue backfill.

pub mod backfill;
pub mod merge;
pub mod replay;

pub use backfill::backfill;
pub use merge::merge;
pub use replay::reconstruct;

pub mod identity;
pub mod issue;
pub mod timestamp;

pub use identity::{Identity, IdentityKey};
pub use issue::{Issue, IssueId, IssueKind, IssueState, Tracker};
pub use timestamp::Timestamp;

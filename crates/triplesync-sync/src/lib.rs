//! # Triplesync Sync
//!
//! Keeps a triple store consistent with externally supplied entity
//! descriptions.
//!
//! For each entity the engine fetches what the store currently holds,
//! diffs it against the desired statement set, holds back removals of
//! shared reference nodes that other entities still point to, and applies
//! the rest as one delete+insert update.

pub mod diff;
pub mod error;
pub mod fetch;
pub mod reachability;
pub mod repository;

pub use diff::{diff, Diff};
pub use error::{RepoResult, SyncError, SyncStep};
pub use reachability::{filter_removable_reference_statements, ReferenceFilter};
pub use repository::{RdfRepository, SyncResult};

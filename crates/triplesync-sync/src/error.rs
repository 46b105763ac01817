//! Sync error types.

use std::fmt;

use thiserror::Error;
use triplesync_core::CoreError;
use triplesync_store::StoreError;

/// The step of a sync during which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    Fetch,
    Reachability,
    Apply,
    Revision,
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStep::Fetch => "fetching current state",
            SyncStep::Reachability => "checking reference reachability",
            SyncStep::Apply => "applying update",
            SyncStep::Revision => "reading revision",
        };
        f.write_str(name)
    }
}

/// Errors reported by the sync engine. Each carries the entity and step so
/// the caller can decide whether to retry.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] CoreError),

    #[error("Store unreachable while {step} for {entity}: {source}")]
    StoreUnreachable {
        entity: String,
        step: SyncStep,
        #[source]
        source: StoreError,
    },

    #[error("Malformed query while {step} for {entity}: {source}")]
    MalformedQuery {
        entity: String,
        step: SyncStep,
        #[source]
        source: StoreError,
    },

    #[error("Reachability check failed for {entity}: {source}")]
    ReachabilityCheckFailed {
        entity: String,
        #[source]
        source: StoreError,
    },

    #[error("Store error while {step} for {entity}: {source}")]
    Store {
        entity: String,
        step: SyncStep,
        #[source]
        source: StoreError,
    },

    #[error("Query failed: {0}")]
    Query(#[source] StoreError),
}

/// Result type for sync operations.
pub type RepoResult<T> = Result<T, SyncError>;

impl SyncError {
    /// Classify a store failure during `step` of a sync of `entity`.
    pub fn from_store(entity: &str, step: SyncStep, source: StoreError) -> Self {
        let entity = entity.to_string();
        if step == SyncStep::Reachability {
            return Self::ReachabilityCheckFailed { entity, source };
        }
        match source {
            StoreError::Unreachable(_) => Self::StoreUnreachable { entity, step, source },
            StoreError::MalformedQuery(_) => Self::MalformedQuery { entity, step, source },
            _ => Self::Store { entity, step, source },
        }
    }

    pub fn entity(&self) -> Option<&str> {
        match self {
            Self::StoreUnreachable { entity, .. }
            | Self::MalformedQuery { entity, .. }
            | Self::ReachabilityCheckFailed { entity, .. }
            | Self::Store { entity, .. } => Some(entity),
            Self::InvalidIdentifier(_) | Self::Query(_) => None,
        }
    }

    pub fn step(&self) -> Option<SyncStep> {
        match self {
            Self::StoreUnreachable { step, .. } | Self::MalformedQuery { step, .. } | Self::Store { step, .. } => {
                Some(*step)
            }
            Self::ReachabilityCheckFailed { .. } => Some(SyncStep::Reachability),
            Self::InvalidIdentifier(_) | Self::Query(_) => None,
        }
    }
}

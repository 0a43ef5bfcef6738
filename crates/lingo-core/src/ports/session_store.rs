//! Session store port - keyed persistence for session snapshots.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::SessionSnapshot;

/// Errors that can occur in snapshot persistence.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// Reading or writing the backing storage failed.
    #[error("snapshot storage error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored snapshot exists but cannot be decoded.
    ///
    /// Distinguished from [`SessionStoreError::Io`] so callers can fall back
    /// to a fresh session instead of retrying.
    #[error("stored snapshot for unit '{unit_id}' is corrupt: {source}")]
    Corrupt {
        unit_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// The snapshot could not be serialized.
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Port for persisting one snapshot per lesson unit.
///
/// `save` must be atomic from the caller's point of view: a reader must
/// never observe a transcript and dialogue context pair from two different
/// turns. Absence of a snapshot means "no session in progress".
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist the snapshot, overwriting any prior snapshot for the unit.
    async fn save(&self, unit_id: &str, snapshot: &SessionSnapshot)
    -> Result<(), SessionStoreError>;

    /// Retrieve the snapshot for a unit, if one exists.
    async fn load(&self, unit_id: &str) -> Result<Option<SessionSnapshot>, SessionStoreError>;

    /// Delete the snapshot for a unit. Deleting an absent snapshot is not an
    /// error.
    async fn clear(&self, unit_id: &str) -> Result<(), SessionStoreError>;
}

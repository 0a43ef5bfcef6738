//! In-memory session store, mainly for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use lingo_core::domain::SessionSnapshot;
use lingo_core::ports::{SessionStore, SessionStoreError};

/// Keeps snapshots in a map; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    snapshots: RwLock<HashMap<String, SessionSnapshot>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(
        &self,
        unit_id: &str,
        snapshot: &SessionSnapshot,
    ) -> Result<(), SessionStoreError> {
        self.snapshots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(unit_id.to_string(), snapshot.clone());
        Ok(())
    }

    async fn load(&self, unit_id: &str) -> Result<Option<SessionSnapshot>, SessionStoreError> {
        Ok(self
            .snapshots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(unit_id)
            .cloned())
    }

    async fn clear(&self, unit_id: &str) -> Result<(), SessionStoreError> {
        self.snapshots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(unit_id);
        Ok(())
    }
}

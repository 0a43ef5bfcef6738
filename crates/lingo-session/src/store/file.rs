//! File-backed session store: one JSON snapshot per unit.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use lingo_core::domain::SessionSnapshot;
use lingo_core::ports::{SessionStore, SessionStoreError};

/// Persists snapshots as `lingo_save_<unit>.json` files in one directory.
///
/// Writes go through a temp file and a rename so a crash mid-write leaves
/// the previous snapshot intact rather than a torn one.
#[derive(Debug)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, unit_id: &str) -> PathBuf {
        self.dir.join(format!("lingo_save_{}.json", sanitize(unit_id)))
    }
}

/// Keep unit ids filesystem-safe; anything exotic becomes an underscore.
fn sanitize(unit_id: &str) -> String {
    unit_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn save(
        &self,
        unit_id: &str,
        snapshot: &SessionSnapshot,
    ) -> Result<(), SessionStoreError> {
        let bytes = serde_json::to_vec_pretty(snapshot).map_err(SessionStoreError::Serialize)?;

        fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(unit_id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &path).await?;
        debug!(unit = unit_id, path = %path.display(), "snapshot written");
        Ok(())
    }

    async fn load(&self, unit_id: &str) -> Result<Option<SessionSnapshot>, SessionStoreError> {
        match fs::read(self.path_for(unit_id)).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map(Some).map_err(|source| {
                SessionStoreError::Corrupt {
                    unit_id: unit_id.to_string(),
                    source,
                }
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn clear(&self, unit_id: &str) -> Result<(), SessionStoreError> {
        match fs::remove_file(self.path_for(unit_id)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_passes_safe_ids_through() {
        assert_eq!(sanitize("unit-1_basics"), "unit-1_basics");
    }

    #[test]
    fn sanitize_replaces_path_characters() {
        assert_eq!(sanitize("unit/1..evil"), "unit_1__evil");
    }
}

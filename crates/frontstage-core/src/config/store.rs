//! Modification-time keyed cache of the parsed flow file.

use crate::error::ConfigError;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use super::FlowConfig;

struct Snapshot {
    modified: SystemTime,
    config: Arc<FlowConfig>,
}

/// Holds the current flow snapshot and reloads it when the file changes.
///
/// Callers get an `Arc<FlowConfig>` they can hold for the whole request; a
/// reload never mutates a snapshot already handed out.
pub struct ConfigStore {
    path: PathBuf,
    current: RwLock<Option<Snapshot>>,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: RwLock::new(None),
        }
    }

    /// Return the current snapshot, re-reading the file if its mtime moved.
    ///
    /// A file that fails to parse or validate is reported as an error and the
    /// previous snapshot stays cached.
    pub fn load(&self) -> Result<Arc<FlowConfig>, ConfigError> {
        let modified = std::fs::metadata(&self.path)?.modified()?;

        if let Some(config) = self.cached_if_fresh(modified) {
            return Ok(config);
        }

        let config = Arc::new(FlowConfig::load_from(&self.path)?);
        tracing::debug!("Loaded flow config from {}", self.path.display());

        let mut current = self
            .current
            .write()
            .map_err(|_| ConfigError::ValidationError("config cache lock poisoned".into()))?;
        *current = Some(Snapshot {
            modified,
            config: config.clone(),
        });
        Ok(config)
    }

    fn cached_if_fresh(&self, modified: SystemTime) -> Option<Arc<FlowConfig>> {
        let current = self.current.read().ok()?;
        current
            .as_ref()
            .filter(|snapshot| snapshot.modified == modified)
            .map(|snapshot| snapshot.config.clone())
    }
}

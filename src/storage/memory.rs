use super::StoragePort;
use crate::error::{Result, RiskMatrixError};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-memory store. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(e: impl std::fmt::Display) -> RiskMatrixError {
    RiskMatrixError::from_io_error(
        std::io::Error::other(format!("memory store lock poisoned: {}", e)),
        None,
    )
}

impl StoragePort for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.read().map_err(poisoned)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.data.write().map_err(poisoned)?.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.data.read().map_err(poisoned)?.keys().cloned().collect())
    }
}

use super::SnapshotStore;
use crate::errors::AppError;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-process store; nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with raw values.
    #[cfg(test)]
    pub fn with_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            values: Mutex::new(values.into_iter().collect()),
        }
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, AppError> {
        let values = self
            .values
            .lock()
            .map_err(|e| AppError::Store(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| AppError::Store(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

//! InMemoryStorage - HashMap-backed storage for tests and ephemeral programs.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::Storage;
use crate::error::{RecordError, Result};

/// Clone-friendly via Arc: clones see the same documents.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStorage {
    documents: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locations written so far, sorted.
    pub fn locations(&self) -> Result<Vec<String>> {
        let documents = self
            .documents
            .read()
            .map_err(|_| RecordError::LockPoisoned("storage read"))?;
        let mut locations: Vec<String> = documents.keys().cloned().collect();
        locations.sort();
        Ok(locations)
    }
}

impl Storage for InMemoryStorage {
    fn exists(&self, location: &str) -> Result<bool> {
        let documents = self
            .documents
            .read()
            .map_err(|_| RecordError::LockPoisoned("storage read"))?;
        Ok(documents.contains_key(location))
    }

    fn read(&self, location: &str) -> Result<Option<Vec<u8>>> {
        let documents = self
            .documents
            .read()
            .map_err(|_| RecordError::LockPoisoned("storage read"))?;
        Ok(documents.get(location).cloned())
    }

    fn write(&self, location: &str, bytes: &[u8]) -> Result<()> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| RecordError::LockPoisoned("storage write"))?;
        documents.insert(location.to_string(), bytes.to_vec());
        Ok(())
    }
}

//! In-process storage backend
//!
//! Follows the same create/update contract as the keychain backend but keeps
//! records in a map that lives as long as the store. Used by tests and for
//! dry runs where nothing should touch the OS credential store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use super::SecureStore;
use crate::error::{Result, SupplyError};

/// Map-backed storage
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
    /// When false, every operation fails with `StoreUnavailable`
    available: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the store becoming reachable or unreachable (e.g., device locked)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether no records are held
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SupplyError::StoreUnavailable(
                "In-memory store marked unavailable".to_string(),
            ))
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Vec<u8>>>> {
        self.ensure_available()?;
        self.entries
            .read()
            .map_err(|_| SupplyError::StoreUnavailable("Store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Vec<u8>>>> {
        self.ensure_available()?;
        self.entries
            .write()
            .map_err(|_| SupplyError::StoreUnavailable("Store lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecureStore for MemoryStore {
    fn create(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut entries = self.write()?;

        if entries.contains_key(key) {
            return Err(SupplyError::DuplicateEntry(key.to_string()));
        }

        entries.insert(key.to_string(), value.to_vec());
        debug!("Created entry in memory store: {}", key);
        Ok(())
    }

    fn update(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut entries = self.write()?;

        match entries.get_mut(key) {
            Some(existing) => {
                *existing = value.to_vec();
                debug!("Updated entry in memory store: {}", key);
                Ok(())
            }
            None => Err(SupplyError::NotFound(key.to_string())),
        }
    }

    fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let entries = self.read()?;

        entries
            .get(key)
            .cloned()
            .ok_or_else(|| SupplyError::NotFound(key.to_string()))
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.write()?;

        if entries.remove(key).is_some() {
            debug!("Deleted entry from memory store: {}", key);
        }
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.read()?.contains_key(key))
    }

    fn is_hardware_backed(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "In-Memory Store"
    }
}

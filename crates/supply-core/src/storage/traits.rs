//! Storage trait definitions

use crate::error::Result;

/// Trait for secure storage backends
///
/// Backends expose the create/update split of OS credential stores rather
/// than a single upsert. State per key:
///
/// - `Absent --create--> Present`
/// - `Present --update--> Present`
/// - `Present --create--> DuplicateEntry` (unchanged)
/// - `Absent --update--> NotFound` (unchanged)
pub trait SecureStore: Send + Sync {
    /// Insert a new record, failing with `DuplicateEntry` if one exists
    fn create(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Overwrite an existing record, failing with `NotFound` if absent
    fn update(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Read a record, failing with `NotFound` if absent
    fn fetch(&self, key: &str) -> Result<Vec<u8>>;

    /// Remove a record. Succeeds whether or not it existed.
    fn delete(&self, key: &str) -> Result<()>;

    /// Check if a key exists
    fn exists(&self, key: &str) -> Result<bool>;

    /// Check if this storage backend is hardware-backed
    fn is_hardware_backed(&self) -> bool;

    /// Get a human-readable name for this storage backend
    fn backend_name(&self) -> &'static str;
}

//! OS Keychain storage backend
//!
//! Uses the system keychain for secure storage:
//! - macOS: Keychain
//! - Windows: Credential Manager (DPAPI)
//! - Linux: Secret Service (GNOME Keyring, KWallet)
//!
//! The keyring API only offers an upsert (`set_password`), so the
//! create/update split is produced by reading the entry first. Between that
//! read and the write another writer could slip in; this store assumes a
//! single writer per service.
//!
//! A value that is present but not valid UTF-8 still counts as present, so a
//! corrupt record can be overwritten through `update`.

use keyring::Entry;
use tracing::{debug, warn};
use zeroize::{Zeroize, Zeroizing};

use super::SecureStore;
use crate::error::{Result, SupplyError};

/// Default service name used for keychain entries
pub const DEFAULT_SERVICE_NAME: &str = "supply";

/// OS Keychain storage backend
pub struct KeychainStorage {
    /// Service name all entries are filed under
    service: String,
    /// Whether keychain is available
    available: bool,
}

impl KeychainStorage {
    /// Create a keychain storage for the given service name
    pub fn new(service: &str) -> Self {
        let available = Self::test_availability(service);

        if available {
            debug!("Keychain storage is available for service {}", service);
        } else {
            warn!("Keychain storage is not available - profile changes will not persist");
        }

        Self {
            service: service.to_string(),
            available,
        }
    }

    /// Test if the keychain is available
    fn test_availability(service: &str) -> bool {
        let Ok(entry) = Entry::new(service, "__test_availability__") else {
            return false;
        };

        match entry.get_password() {
            Ok(_) | Err(keyring::Error::NoEntry) => true,
            Err(e) => {
                debug!("Keychain probe failed: {}", e);
                false
            }
        }
    }

    /// Get a keyring entry for a key
    fn get_entry(&self, key: &str) -> Result<Entry> {
        if !self.available {
            return Err(SupplyError::StoreUnavailable(
                "Keychain not available".to_string(),
            ));
        }

        Entry::new(&self.service, key).map_err(|e| map_keyring_error(key, e))
    }

    /// Read the raw stored string, if any
    fn read_encoded(&self, entry: &Entry, key: &str) -> Result<Option<Zeroizing<String>>> {
        match entry.get_password() {
            Ok(encoded) => Ok(Some(Zeroizing::new(encoded))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(map_keyring_error(key, e)),
        }
    }

    fn write(&self, entry: &Entry, key: &str, value: &[u8]) -> Result<()> {
        // Store as base64-encoded string (keychain stores strings)
        let encoded = Zeroizing::new(base64_encode(value));
        entry
            .set_password(&encoded)
            .map_err(|e| map_keyring_error(key, e))
    }

    /// Check if keychain is available
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Service name entries are filed under
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl SecureStore for KeychainStorage {
    fn create(&self, key: &str, value: &[u8]) -> Result<()> {
        let entry = self.get_entry(key)?;

        if entry_present(entry.get_password(), key)? {
            return Err(SupplyError::DuplicateEntry(key.to_string()));
        }

        self.write(&entry, key, value)?;
        debug!("Created key in keychain: {}", key);
        Ok(())
    }

    fn update(&self, key: &str, value: &[u8]) -> Result<()> {
        let entry = self.get_entry(key)?;

        if !entry_present(entry.get_password(), key)? {
            return Err(SupplyError::NotFound(key.to_string()));
        }

        self.write(&entry, key, value)?;
        debug!("Updated key in keychain: {}", key);
        Ok(())
    }

    fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let entry = self.get_entry(key)?;

        match self.read_encoded(&entry, key)? {
            Some(encoded) => {
                let decoded = base64_decode(&encoded)?;
                debug!("Retrieved key from keychain: {}", key);
                Ok(decoded)
            }
            None => {
                debug!("Key not found in keychain: {}", key);
                Err(SupplyError::NotFound(key.to_string()))
            }
        }
    }

    fn delete(&self, key: &str) -> Result<()> {
        let entry = self.get_entry(key)?;

        match entry.delete_password() {
            Ok(()) => {
                debug!("Deleted key from keychain: {}", key);
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(map_keyring_error(key, e)),
        }
    }

    fn exists(&self, key: &str) -> Result<bool> {
        let entry = self.get_entry(key)?;
        entry_present(entry.get_password(), key)
    }

    fn is_hardware_backed(&self) -> bool {
        // OS keychains count as hardware-backed here (Secure Enclave, DPAPI, etc.)
        self.available
    }

    fn backend_name(&self) -> &'static str {
        #[cfg(target_os = "macos")]
        return "macOS Keychain";

        #[cfg(target_os = "windows")]
        return "Windows Credential Manager";

        #[cfg(target_os = "linux")]
        return "Linux Secret Service";

        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        return "System Keychain";
    }
}

/// Translate keyring failures into the store's error taxonomy
fn map_keyring_error(key: &str, error: keyring::Error) -> SupplyError {
    match error {
        keyring::Error::NoEntry => SupplyError::NotFound(key.to_string()),
        keyring::Error::NoStorageAccess(e) => SupplyError::StoreUnavailable(e.to_string()),
        keyring::Error::PlatformFailure(e) => SupplyError::StoreUnavailable(e.to_string()),
        keyring::Error::BadEncoding(_) => {
            SupplyError::DecodeError(format!("Keychain entry {} is not valid UTF-8", key))
        }
        other => SupplyError::StorageError(other.to_string()),
    }
}

/// Whether a keychain read found a value, readable or not
fn entry_present(read: keyring::Result<String>, key: &str) -> Result<bool> {
    match read {
        Ok(mut value) => {
            value.zeroize();
            Ok(true)
        }
        Err(keyring::Error::BadEncoding(mut raw)) => {
            raw.zeroize();
            Ok(true)
        }
        Err(keyring::Error::NoEntry) => Ok(false),
        Err(e) => Err(map_keyring_error(key, e)),
    }
}

/// Base64 encode bytes
fn base64_encode(data: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(data)
}

/// Base64 decode string
fn base64_decode(encoded: &str) -> Result<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| SupplyError::DecodeError(format!("Base64 decode error: {}", e)))
}

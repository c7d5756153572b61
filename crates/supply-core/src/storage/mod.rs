//! Storage backends for secure profile persistence
//!
//! This module provides two storage backends:
//! 1. OS Keychain (hardware-backed where available)
//! 2. In-memory map (tests and dry runs)

mod traits;
mod keychain;
mod memory;

use std::sync::Arc;
use tracing::warn;

use crate::settings::{Settings, StoreBackend};

pub use traits::SecureStore;
pub use keychain::{KeychainStorage, DEFAULT_SERVICE_NAME};
pub use memory::MemoryStore;

/// Open the backend selected in the settings
pub fn open_store(settings: &Settings) -> Arc<dyn SecureStore> {
    match settings.backend {
        StoreBackend::Keychain => Arc::new(KeychainStorage::new(settings.effective_service_name())),
        StoreBackend::Memory => {
            warn!("Using in-memory profile store - nothing will survive this process");
            Arc::new(MemoryStore::new())
        }
    }
}

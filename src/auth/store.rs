//! Secure key-value persistence for session credentials.
//!
//! The session keeps exactly two durable keys, `token` and `role`. They are
//! always written and deleted as a pair by `SessionManager`; this module only
//! provides the storage seam.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use keyring::Entry;

/// Service name under which keychain entries are registered
const SERVICE_NAME: &str = "stocksim";

/// Durable key for the bearer token
pub const TOKEN_KEY: &str = "token";

/// Durable key for the authenticated role
pub const ROLE_KEY: &str = "role";

/// Storage backend for session credentials.
///
/// `get` returns `Ok(None)` for a missing key; only genuine backend failures
/// surface as errors. `delete` of a missing key succeeds, so clearing a
/// session is idempotent.
pub trait SecureStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}

/// Credential storage backed by the OS keychain.
pub struct KeyringStore;

impl KeyringStore {
    fn entry(key: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, key).context("Failed to create keyring entry")
    }
}

impl SecureStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match Self::entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to read credential from keychain"),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::entry(key)?
            .set_password(value)
            .context("Failed to store credential in keychain")
    }

    fn delete(&self, key: &str) -> Result<()> {
        match Self::entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete credential from keychain"),
        }
    }
}

/// In-process credential storage.
///
/// Used by tests and on platforms without a usable keychain. Clones share the
/// same underlying map, so a cloned handle observes writes made through the
/// session manager.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SecureStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}

//! Key-value collaborators: site-wide persistent state, per-visitor session
//! state, and the response-commit signal guarding session writes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::StoreError;

/// Site-wide state that survives across units of work.
///
/// Writes must be atomic per key: a concurrent reader sees either the old or
/// the new value, never a partial one.
pub trait StateStore {
    /// # Errors
    /// Returns a `StoreError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// # Errors
    /// Returns a `StoreError` if the backend cannot be written.
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// State scoped to one visitor.
pub trait SessionStore {
    fn has(&self, key: &str) -> bool;

    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: String);
}

/// The hosting environment's "point of no return": once the response has
/// started going out, session state can no longer be touched.
pub trait OutputPhase {
    fn is_committed(&self) -> bool;
}

/// Reads and decodes a typed value from a state store. A stored `null` reads
/// as absent.
pub(crate) fn load<T: DeserializeOwned>(
    store: &dyn StateStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    store
        .get(key)?
        .filter(|value| !value.is_null())
        .map(|value| {
            serde_json::from_value(value).map_err(|source| StoreError::Malformed {
                key: key.to_owned(),
                source,
            })
        })
        .transpose()
}

/// Encodes and writes a typed value to a state store.
pub(crate) fn save<T: Serialize>(store: &dyn StateStore, key: &str, value: &T) -> Result<(), StoreError> {
    let value = serde_json::to_value(value).map_err(|source| StoreError::Encode {
        key: key.to_owned(),
        source,
    })?;
    store.set(key, value)
}

/// A [`StateStore`] held in process memory.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes a key, as an administrator clearing state would.
    ///
    /// # Errors
    /// Returns `StoreError::Backend` if the lock was poisoned.
    pub fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.values
            .write()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .remove(key);
        Ok(())
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let values = self
            .values
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values
            .write()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .insert(key.to_owned(), value);
        Ok(())
    }
}

/// A [`SessionStore`] held in process memory.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn has(&self, key: &str) -> bool {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value);
    }
}

/// An [`OutputPhase`] flag the host flips when it starts sending the response.
#[derive(Debug, Default)]
pub struct ResponseCommit {
    committed: AtomicBool,
}

impl ResponseCommit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit(&self) {
        self.committed.store(true, Ordering::Release);
    }
}

impl OutputPhase for ResponseCommit {
    fn is_committed(&self) -> bool {
        self.committed.load(Ordering::Acquire)
    }
}

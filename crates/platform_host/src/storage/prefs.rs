//! Lightweight preference storage contracts and adapters.
//!
//! Values are JSON text stored per key. The contract is synchronous because the browser backing
//! (`localStorage`) is synchronous and runtime state is written on the UI thread after every
//! mutation.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Host service for lightweight preference values (JSON stored as text per key).
pub trait PrefsStore {
    /// Loads a raw JSON string for a preference key.
    fn load_pref(&self, key: &str) -> Result<Option<String>, String>;

    /// Saves a raw JSON string for a preference key.
    fn save_pref(&self, key: &str, raw_json: &str) -> Result<(), String>;

    /// Deletes a preference key.
    fn delete_pref(&self, key: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op preference store for unsupported targets and baseline tests.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_pref(&self, _key: &str) -> Result<Option<String>, String> {
        Ok(None)
    }

    fn save_pref(&self, _key: &str, _raw_json: &str) -> Result<(), String> {
        Ok(())
    }

    fn delete_pref(&self, _key: &str) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory preference store keyed by string.
///
/// Clones share the same backing map, so a test can keep one handle for inspection while the
/// runtime owns another.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryPrefsStore {
    /// Returns the raw value currently stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    /// Overwrites `key` with arbitrary text, bypassing serialization.
    pub fn insert_raw(&self, key: impl Into<String>, raw: impl Into<String>) {
        self.inner.borrow_mut().insert(key.into(), raw.into());
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn save_pref(&self, key: &str, raw_json: &str) -> Result<(), String> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), raw_json.to_string());
        Ok(())
    }

    fn delete_pref(&self, key: &str) -> Result<(), String> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}

/// Loads and deserializes a typed preference value through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when the store or JSON deserialization fails.
pub fn load_pref_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_pref(key)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    Ok(Some(value))
}

/// Serializes and saves a typed preference value through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or store save fails.
pub fn save_pref_with<S: PrefsStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.save_pref(key, &raw)
}

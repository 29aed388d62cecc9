//! Key-value storage contract
//!
//! The engine never touches a storage mechanism directly. Browser
//! `localStorage`, a directory of files or a plain map all sit behind
//! [`KvStore`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{Result, StorageError};

/// Minimal blob store keyed by string
pub trait KvStore {
    /// Read a value, `Ok(None)` when absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete a value; deleting an absent key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    /// Simulate a full or disabled backend
    pub fail_writes: bool,
    /// Simulate a backend that cannot be read
    pub fail_reads: bool,
    /// A key the backend refuses to delete
    pub pinned: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a key
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    /// Make removing `key` fail
    pub fn pinning(mut self, key: &str) -> Self {
        self.pinned = Some(key.to_string());
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads {
            return Err(StorageError::Unavailable);
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(StorageError::Backend("quota exceeded".to_string()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.fail_writes || self.pinned.as_deref() == Some(key) {
            return Err(StorageError::Unavailable);
        }
        self.entries.remove(key);
        Ok(())
    }
}

/// Cloneable handle onto one [`MemoryStore`], so a caller can keep
/// inspecting storage after handing a copy to the engine
#[derive(Debug, Clone, Default)]
pub struct SharedStore(Rc<RefCell<MemoryStore>>);

impl SharedStore {
    pub fn new(store: MemoryStore) -> Self {
        Self(Rc::new(RefCell::new(store)))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.borrow().contains(key)
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.0.borrow().raw(key).map(str::to_string)
    }
}

impl KvStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.0.borrow_mut().set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.0.borrow_mut().remove(key)
    }
}

//! Filter-state cache.
//!
//! Persistence needs exactly three operations on a byte-opaque store keyed by
//! one string. Real deployments adapt their cache (Redis, the session, ...)
//! behind [`FilterCache`]; [`MemoryCache`] is the in-process backend used by
//! tests and embedders without one.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::CacheError;

/// Addresses exactly one persisted filter state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key from target-collection identity + context + storage id.
    pub fn derive(collection: &str, context: Option<&str>, storage_id: &str) -> Self {
        match context {
            Some(context) => CacheKey(format!("filters:{}:{}:{}", collection, context, storage_id)),
            None => CacheKey(format!("filters:{}:{}", collection, storage_id)),
        }
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.0) }
}

/// Synchronous byte-opaque store. One filter state per key.
pub trait FilterCache: Send + Sync {
    fn read(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, CacheError>;
    fn write(&self, key: &CacheKey, payload: Vec<u8>) -> Result<(), CacheError>;
    fn delete(&self, key: &CacheKey) -> Result<(), CacheError>;
}

/// Mutex-guarded in-memory backend.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    pub fn new() -> Self { Self::default() }
}

impl FilterCache for MemoryCache {
    fn read(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.entries.lock().unwrap().get(key.as_str()).cloned())
    }

    fn write(&self, key: &CacheKey, payload: Vec<u8>) -> Result<(), CacheError> {
        self.entries.lock().unwrap().insert(key.as_str().to_string(), payload);
        Ok(())
    }

    fn delete(&self, key: &CacheKey) -> Result<(), CacheError> {
        self.entries.lock().unwrap().remove(key.as_str());
        Ok(())
    }
}

use crate::time::{now, DateTime};
use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Mutex;
use std::time::Duration;

/// KeyValueCache is the storage interface the credential layer keeps
/// short-lived secrets in.
///
/// Keys are plain strings; namespacing (prefix + credential name) is the
/// caller's responsibility, the cache itself is unaware of semantics. A read
/// after the entry's TTL elapsed MUST behave identically to "not present".
///
/// The interface is async so external backends (Redis, memcached) can
/// implement it without blocking.
#[async_trait::async_trait]
pub trait KeyValueCache: Debug + Send + Sync + 'static {
    /// Get the value under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key` for `ttl`, overwriting any prior entry.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Remove the entry under `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// In-memory cache backend.
///
/// Entries carry their expiry instant; expiry is judged at read time and
/// expired entries are evicted by the read that observes them. This is the
/// default backend a client is built with.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (String, DateTime)>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValueCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock().expect("lock poisoned");
        let Some((value, expires_at)) = entries.get(key) else {
            return Ok(None);
        };

        if *expires_at > now() {
            return Ok(Some(value.clone()));
        }

        entries.remove(key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let expires_at = now()
            + chrono::TimeDelta::from_std(ttl)
                .map_err(|e| Error::unexpected("cache ttl out of range").with_source(e))?;

        self.entries
            .lock()
            .expect("lock poisoned")
            .insert(key.to_string(), (value.to_string(), expires_at));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().expect("lock poisoned").remove(key);
        Ok(())
    }
}

/// NoopCache never stores anything; every read is a miss.
///
/// Useful when a caller wants credential fetches to bypass caching entirely,
/// e.g. in tests exercising the issuance path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait::async_trait]
impl KeyValueCache for NoopCache {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}

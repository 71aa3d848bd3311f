//! In-process TTL cache for analysis results
//!
//! Key: normalized listing URL. Eviction is lazy: an entry older than the
//! TTL is deleted and treated as a miss at the moment of lookup; there is
//! no background sweep. The clock is injected so expiry tests are
//! deterministic.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::model::AnalysisResult;

/// Time source, injectable for tests
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct CacheEntry {
    result: AnalysisResult,
    created_at: DateTime<Utc>,
}

/// Process-wide analysis cache with lazy TTL expiry
///
/// No per-key locking: concurrent requests for the same not-yet-cached URL
/// may each run the full pipeline and both write; last write wins.
pub struct AnalysisCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl AnalysisCache {
    pub fn new(ttl_seconds: u64) -> Self {
        Self::with_clock(ttl_seconds, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl_seconds: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: Duration::seconds(ttl_seconds as i64),
            clock,
        }
    }

    /// Return the cached result for a key, expiring it first if stale
    pub fn get(&self, key: &str) -> Option<AnalysisResult> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        let expired = match entries.get(key) {
            Some(entry) => self.clock.now() - entry.created_at > self.ttl,
            None => return None,
        };

        if expired {
            entries.remove(key);
            tracing::debug!(key = %key, "Cache entry expired");
            return None;
        }

        tracing::debug!(key = %key, "Cache hit");
        entries.get(key).map(|entry| entry.result.clone())
    }

    /// Store a result under a key, stamped with the current time
    pub fn set(&self, key: &str, result: AnalysisResult) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key.to_string(),
            CacheEntry {
                result,
                created_at: self.clock.now(),
            },
        );
    }
}

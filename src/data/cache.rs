//! In-memory TTL cache for API responses.
//!
//! Owned by the fetch worker; repeated requests inside the freshness
//! window are answered without touching the network.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::models::{
    Assessment, CompareResponse, GradeLevel, SchoolDetail, SearchResponse, TopScoresResponse,
};

/// Search results go stale quickly; detail-shaped data lives longer.
const SEARCH_TTL: Duration = Duration::from_secs(5 * 60);
const DETAIL_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Search { query: String, limit: usize },
    Detail { rcdts: String },
    Compare { ids: String },
    TopScores { assessment: Assessment, level: GradeLevel, limit: usize },
}

impl CacheKey {
    fn ttl(&self) -> Duration {
        match self {
            CacheKey::Search { .. } => SEARCH_TTL,
            _ => DETAIL_TTL,
        }
    }
}

#[derive(Debug, Clone)]
pub enum CachedValue {
    Search(SearchResponse),
    Detail(SchoolDetail),
    Compare(CompareResponse),
    TopScores(TopScoresResponse),
}

#[derive(Default)]
pub struct ResponseCache {
    entries: HashMap<CacheKey, (Instant, CachedValue)>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clone of the cached value, if present and still fresh.
    pub fn get(&self, key: &CacheKey) -> Option<CachedValue> {
        let (stored_at, value) = self.entries.get(key)?;
        if stored_at.elapsed() > key.ttl() {
            return None;
        }
        Some(value.clone())
    }

    pub fn put(&mut self, key: CacheKey, value: CachedValue) {
        self.entries.insert(key, (Instant::now(), value));
    }
}

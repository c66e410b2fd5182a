//! Day-scoped cache for lodging search results.
//!
//! Entries are keyed by the day they were stored on, so a result fetched
//! yesterday is never served today. Nearby positions share an entry:
//! coordinates are rounded to two decimals (roughly 1 km).

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache as MokaCache;

use crate::domain::Lodging;
use crate::providers::LodgingQuery;

/// Cache key: (day stored, query key).
type LodgingKey = (NaiveDate, String);

type LodgingEntry = Arc<Vec<Lodging>>;

/// Configuration for the lodging cache.
#[derive(Debug, Clone)]
pub struct LodgingCacheConfig {
    /// Upper bound on entry age; the day boundary usually expires entries
    /// first.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for LodgingCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            max_capacity: 500,
        }
    }
}

/// Cache for lodging search results.
pub struct LodgingCache {
    entries: MokaCache<LodgingKey, LodgingEntry>,
}

impl LodgingCache {
    pub fn new(config: &LodgingCacheConfig) -> Self {
        let entries = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        Self { entries }
    }

    /// Key shared by queries for the same stay near the same position.
    pub fn query_key(query: &LodgingQuery) -> String {
        format!(
            "{}_{}_{:.2}_{:.2}_{}_{}",
            query.check_in.format("%Y-%m-%d"),
            query.check_out.format("%Y-%m-%d"),
            query.coord.lat,
            query.coord.lng,
            query.guests,
            query.rooms
        )
    }

    pub async fn get(&self, today: NaiveDate, query: &LodgingQuery) -> Option<LodgingEntry> {
        self.entries.get(&(today, Self::query_key(query))).await
    }

    pub async fn insert(&self, today: NaiveDate, query: &LodgingQuery, lodgings: Vec<Lodging>) {
        self.entries
            .insert((today, Self::query_key(query)), Arc::new(lodgings))
            .await;
    }

    /// Number of cached entries (approximate until pending tasks run).
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }
}

//! In-memory caching using moka
//!
//! Holds each venue's pricing inputs (base price plus active rules) so that
//! pricing a page of slots does not hit the database per slot. Owners edit
//! rules rarely; a short TTL bounds how stale a displayed price can get and
//! rule edits invalidate the venue entry explicitly.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::pricing::models::Venue;
use crate::pricing::{queries, services};

/// Venues warmed per refresh
const WARM_VENUE_LIMIT: i64 = 200;

/// Application cache holding venue pricing inputs
#[derive(Clone)]
pub struct AppCache {
    /// Venue pricing inputs (venue id -> Venue with active rules)
    pub venues: Cache<i64, Arc<Venue>>,
    /// Bumped on every invalidation; loads started before a bump must not
    /// repopulate the cache
    generation: Arc<AtomicU64>,
}

impl AppCache {
    /// Create a new cache instance with the given TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            venues: Cache::builder()
                .max_capacity(1_000)
                .time_to_live(ttl)
                .build(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current invalidation generation. Capture before reading the database.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Cache a loaded venue unless an invalidation happened since `generation`.
    ///
    /// Returns whether the entry was kept.
    pub async fn insert_if_current(&self, venue_id: i64, venue: Arc<Venue>, generation: u64) -> bool {
        if self.generation() != generation {
            debug!("Skipping stale cache insert for venue: {}", venue_id);
            return false;
        }
        self.venues.insert(venue_id, venue).await;

        // An invalidation may have landed between the check and the insert
        if self.generation() != generation {
            self.venues.invalidate(&venue_id).await;
            return false;
        }
        true
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            venues_size: self.venues.entry_count(),
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.venues.invalidate_all();
        info!("All caches invalidated");
    }

    /// Invalidate a venue after its base price or rules changed
    pub async fn invalidate_venue(&self, venue_id: i64) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.venues.invalidate(&venue_id).await;
        info!("Pricing cache invalidated for venue: {}", venue_id);
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(5 * 60))
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub venues_size: u64,
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes every `every`.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool, every: Duration) {
    let mut interval = interval(every);
    loop {
        // First tick completes immediately
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Load the most recently updated venues into the cache
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    let venue_ids = match queries::get_active_venue_ids(db, WARM_VENUE_LIMIT).await {
        Ok(ids) => ids,
        Err(e) => {
            warn!("Failed to list venues for cache warm-up: {}", e);
            return;
        }
    };

    for venue_id in venue_ids {
        // Refresh rather than reuse a possibly stale entry
        cache.venues.invalidate(&venue_id).await;
        if let Err(e) = services::load_venue(db, cache, venue_id).await {
            warn!("Failed to warm pricing for venue {}: {}", venue_id, e);
        }
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}

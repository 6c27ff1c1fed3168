use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{Donor, Hospital};
use crate::services::postgres::StorageError;

const DONORS_KEY: &str = "donors:located";
const HOSPITALS_KEY: &str = "hospitals:accepting";

/// Short-lived in-memory cache of candidate lists
///
/// Candidate lists are loaded whole from PostgreSQL and reused by every
/// search until they expire or the main application signals a write
/// through [`CandidateCache::invalidate_all`]. Concurrent misses on the same
/// list share a single load.
///
/// A load already in flight when `invalidate_all` runs still stores its
/// result, so a write that lands during that load can stay hidden for up
/// to one TTL.
#[derive(Clone)]
pub struct CandidateCache {
    donors: Cache<&'static str, Arc<Vec<Donor>>>,
    hospitals: Cache<&'static str, Arc<Vec<Hospital>>>,
}

impl CandidateCache {
    pub fn new(ttl_secs: u64) -> Self {
        let ttl = Duration::from_secs(ttl_secs);

        Self {
            donors: Cache::builder().time_to_live(ttl).build(),
            hospitals: Cache::builder().time_to_live(ttl).build(),
        }
    }

    /// Cached donors, running `load` on a miss
    pub async fn donors<F>(&self, load: F) -> Result<Arc<Vec<Donor>>, StorageError>
    where
        F: Future<Output = Result<Vec<Donor>, StorageError>>,
    {
        get_or_load(&self.donors, DONORS_KEY, load).await
    }

    /// Cached hospitals, running `load` on a miss
    pub async fn hospitals<F>(&self, load: F) -> Result<Arc<Vec<Hospital>>, StorageError>
    where
        F: Future<Output = Result<Vec<Hospital>, StorageError>>,
    {
        get_or_load(&self.hospitals, HOSPITALS_KEY, load).await
    }

    /// Drop every cached candidate list
    pub async fn invalidate_all(&self) {
        self.donors.invalidate(DONORS_KEY).await;
        self.hospitals.invalidate(HOSPITALS_KEY).await;
        tracing::debug!("Invalidated candidate cache");
    }
}

async fn get_or_load<T, F>(
    cache: &Cache<&'static str, Arc<Vec<T>>>,
    key: &'static str,
    load: F,
) -> Result<Arc<Vec<T>>, StorageError>
where
    T: Send + Sync + 'static,
    F: Future<Output = Result<Vec<T>, StorageError>>,
{
    cache
        .try_get_with(key, async {
            tracing::trace!("Cache miss: {}", key);
            load.await.map(Arc::new)
        })
        .await
        .map_err(StorageError::Shared)
}

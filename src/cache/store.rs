//! Query cache with stale marking and single-flight fetches.

use chrono::{DateTime, Utc};
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, trace};

use crate::{
    cache::keys::{Bucket, QueryKey},
    error::{AppError, Result},
};

type CachedValue = Arc<dyn Any + Send + Sync>;

struct Entry {
    value: Option<CachedValue>,
    stale: bool,
    /// Bumped by every invalidation; a fetch only commits fresh if it is unchanged
    generation: u64,
    fetched_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn empty() -> Self {
        Self {
            value: None,
            stale: true,
            generation: 0,
            fetched_at: None,
        }
    }
}

#[derive(Default)]
struct Inner {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    flights: Mutex<HashMap<QueryKey, Arc<tokio::sync::Mutex<()>>>>,
    fetches: AtomicU64,
    /// Bumped by `clear`; results of fetches started in an older epoch are never stored
    epoch: AtomicU64,
}

#[derive(Clone, Default)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the fresh cached value for `key`, or run `fetcher` and cache its result.
    ///
    /// Concurrent calls for the same key share one request: later callers wait
    /// for the first and then read its result.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.fresh::<T>(&key)? {
            trace!("Cache hit for {}", key);
            return Ok(value);
        }

        let flight = self.flight(&key)?;
        let result = {
            let _guard = flight.lock().await;
            self.fetch_exclusive(&key, fetcher).await
        };
        self.release_flight(&key, flight);
        result
    }

    /// Body of [`fetch`](Self::fetch), run while holding the key's flight lock.
    async fn fetch_exclusive<T, F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.fresh::<T>(key)? {
            trace!("Cache filled by concurrent fetch for {}", key);
            return Ok(value);
        }

        let (epoch, generation) = {
            let mut entries = self.entries()?;
            let generation = entries.entry(key.clone()).or_insert_with(Entry::empty).generation;
            (self.inner.epoch.load(Ordering::SeqCst), generation)
        };

        debug!("Fetching {}", key);
        self.inner.fetches.fetch_add(1, Ordering::SeqCst);
        let value = fetcher().await?;

        let mut entries = self.entries()?;
        if self.inner.epoch.load(Ordering::SeqCst) != epoch {
            debug!("Cache cleared during fetch of {}, result not stored", key);
            return Ok(value);
        }
        let entry = entries.entry(key.clone()).or_insert_with(Entry::empty);
        entry.value = Some(Arc::new(value.clone()));
        entry.fetched_at = Some(Utc::now());
        if entry.generation == generation {
            entry.stale = false;
        } else {
            debug!("{} was invalidated during fetch, keeping it stale", key);
        }

        Ok(value)
    }

    /// Last cached value for `key`, fresh or stale.
    pub fn peek<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        let entries = self.entries().ok()?;
        entries
            .get(key)
            .and_then(|e| e.value.as_ref())
            .and_then(|v| v.downcast_ref::<T>())
            .cloned()
    }

    /// Absent keys count as stale.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries()
            .map(|entries| entries.get(key).map(|e| e.stale).unwrap_or(true))
            .unwrap_or(true)
    }

    pub fn fetched_at(&self, key: &QueryKey) -> Option<DateTime<Utc>> {
        self.entries().ok()?.get(key).and_then(|e| e.fetched_at)
    }

    /// Mark every key belonging to one of `buckets` stale. Returns the keys touched.
    pub fn invalidate(&self, buckets: &[Bucket]) -> Vec<QueryKey> {
        let Ok(mut entries) = self.entries() else {
            return Vec::new();
        };

        let mut touched: Vec<QueryKey> = entries
            .iter_mut()
            .filter(|(key, _)| buckets.contains(&key.bucket))
            .map(|(key, entry)| {
                entry.stale = true;
                entry.generation += 1;
                key.clone()
            })
            .collect();
        touched.sort();
        touched
    }

    pub fn stale_keys(&self) -> Vec<QueryKey> {
        let mut keys: Vec<QueryKey> = self
            .entries()
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(_, e)| e.stale)
                    .map(|(k, _)| k.clone())
                    .collect()
            })
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Number of fetchers actually run, i.e. network requests issued through the cache.
    pub fn fetch_count(&self) -> u64 {
        self.inner.fetches.load(Ordering::SeqCst)
    }

    /// Drop everything, used on logout.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries() {
            self.inner.epoch.fetch_add(1, Ordering::SeqCst);
            entries.clear();
        }
    }

    fn fresh<T: Clone + 'static>(&self, key: &QueryKey) -> Result<Option<T>> {
        let entries = self.entries()?;
        Ok(entries
            .get(key)
            .filter(|e| !e.stale)
            .and_then(|e| e.value.as_ref())
            .and_then(|v| v.downcast_ref::<T>())
            .cloned())
    }

    fn flight(&self, key: &QueryKey) -> Result<Arc<tokio::sync::Mutex<()>>> {
        let mut flights = self
            .inner
            .flights
            .lock()
            .map_err(|_| AppError::Other(anyhow::anyhow!("query cache poisoned")))?;
        Ok(flights.entry(key.clone()).or_default().clone())
    }

    /// Drop the key's flight lock once no other caller holds or waits on it.
    fn release_flight(&self, key: &QueryKey, flight: Arc<tokio::sync::Mutex<()>>) {
        let Ok(mut flights) = self.inner.flights.lock() else {
            return;
        };
        let ours = flights.get(key).is_some_and(|f| Arc::ptr_eq(f, &flight));
        // One reference in the map, one here
        if ours && Arc::strong_count(&flight) <= 2 {
            flights.remove(key);
        }
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<QueryKey, Entry>>> {
        self.inner
            .entries
            .lock()
            .map_err(|_| AppError::Other(anyhow::anyhow!("query cache poisoned")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn patient_key(id: &str) -> QueryKey {
        QueryKey::new(Bucket::Patient(id.to_string()))
    }

    #[tokio::test]
    async fn test_fresh_value_is_served_from_cache() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .fetch(patient_key("p1"), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, AppError>("Maria".to_string())
                })
                .await
                .unwrap();
            assert_eq!(value, "Maria");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.fetch_count(), 1);
        assert!(!cache.is_stale(&patient_key("p1")));
    }

    #[tokio::test]
    async fn test_invalidation_forces_refetch() {
        let cache = QueryCache::new();
        let list = QueryKey::with_params(Bucket::PatientList, "page=1");
        let list_page2 = QueryKey::with_params(Bucket::PatientList, "page=2");

        cache.fetch(list.clone(), || async { Ok::<_, AppError>(1u32) }).await.unwrap();
        cache.fetch(list_page2.clone(), || async { Ok::<_, AppError>(2u32) }).await.unwrap();
        cache.fetch(patient_key("p1"), || async { Ok::<_, AppError>(3u32) }).await.unwrap();

        let touched = cache.invalidate(&[Bucket::PatientList]);
        assert_eq!(touched, vec![list.clone(), list_page2.clone()]);
        assert!(cache.is_stale(&list));
        assert!(!cache.is_stale(&patient_key("p1")));
        assert_eq!(cache.peek::<u32>(&list), Some(1));

        let value = cache.fetch(list.clone(), || async { Ok::<_, AppError>(10u32) }).await.unwrap();
        assert_eq!(value, 10);
        assert_eq!(cache.fetch_count(), 4);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_previous_value() {
        let cache = QueryCache::new();
        let key = patient_key("p1");
        cache.fetch(key.clone(), || async { Ok::<_, AppError>(1u8) }).await.unwrap();
        cache.invalidate(&[Bucket::Patient("p1".to_string())]);

        let err = cache
            .fetch(key.clone(), || async { Err::<u8, _>(AppError::NotFound("p1".to_string())) })
            .await;
        assert!(err.is_err());
        assert!(cache.is_stale(&key));
        assert_eq!(cache.peek::<u8>(&key), Some(1));
    }

    #[tokio::test]
    async fn test_concurrent_fetches_share_one_request() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..5)
            .map(|_| {
                let cache = cache.clone();
                let calls = calls.clone();
                tokio::spawn(async move {
                    cache
                        .fetch(QueryKey::new(Bucket::Indicators), || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(20)).await;
                            Ok::<_, AppError>(vec![1, 2, 3])
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), vec![1, 2, 3]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidation_during_fetch_keeps_entry_stale() {
        let cache = QueryCache::new();
        let key = QueryKey::new(Bucket::Dashboard);
        let racing = cache.clone();

        let value = cache
            .fetch(key.clone(), || async move {
                racing.invalidate(&[Bucket::Dashboard]);
                Ok::<_, AppError>(7u64)
            })
            .await
            .unwrap();

        assert_eq!(value, 7);
        assert!(cache.is_stale(&key));
    }

    #[tokio::test]
    async fn test_clear_during_fetch_discards_result() {
        let cache = QueryCache::new();
        let key = QueryKey::new(Bucket::CurrentUser);
        let racing = cache.clone();

        let value = cache
            .fetch(key.clone(), || async move {
                racing.clear();
                Ok::<_, AppError>("user A data".to_string())
            })
            .await
            .unwrap();

        // The caller still gets its response, but nothing is cached for the next session
        assert_eq!(value, "user A data");
        assert!(cache.is_stale(&key));
        assert_eq!(cache.peek::<String>(&key), None);

        let next = cache
            .fetch(key.clone(), || async { Ok::<_, AppError>("user B data".to_string()) })
            .await
            .unwrap();
        assert_eq!(next, "user B data");
        assert!(!cache.is_stale(&key));
    }

    #[tokio::test]
    async fn test_flight_locks_are_released_after_fetch() {
        let cache = QueryCache::new();

        for page in 1..=10u32 {
            let key = QueryKey::with_params(Bucket::PatientList, format!("page={}", page));
            cache.fetch(key, || async move { Ok::<_, AppError>(page) }).await.unwrap();
        }
        let failing = patient_key("missing");
        let _ = cache
            .fetch(failing, || async { Err::<u8, _>(AppError::NotFound("missing".to_string())) })
            .await;

        assert!(cache.inner.flights.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_flight_lock_kept_while_others_wait() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let cache = cache.clone();
                let calls = calls.clone();
                tokio::spawn(async move {
                    cache
                        .fetch(QueryKey::new(Bucket::Notifications), || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(20)).await;
                            Ok::<_, AppError>(5u8)
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), 5);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.inner.flights.lock().unwrap().is_empty());
    }
}

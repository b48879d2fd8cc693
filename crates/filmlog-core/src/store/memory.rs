use async_trait::async_trait;
use filmlog_models::MovieWatchEvent;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::{listing_order, StoreError, WatchStore};

#[derive(Default)]
struct Inner {
    events: Vec<MovieWatchEvent>,
    next_id: i64,
}

/// In-process store with the same semantics as the Postgres one
#[derive(Default)]
pub struct MemoryWatchStore {
    inner: RwLock<Inner>,
    unavailable: AtomicBool,
}

impl MemoryWatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail as if the backing database were unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.events.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl WatchStore for MemoryWatchStore {
    fn store_name(&self) -> &str {
        "memory"
    }

    async fn exists(&self, guid: &str) -> Result<bool, StoreError> {
        self.check_available()?;
        let inner = self.inner.read().await;
        Ok(inner.events.iter().any(|e| e.guid == guid))
    }

    async fn insert(&self, event: &MovieWatchEvent) -> Result<(), StoreError> {
        self.check_available()?;
        let mut inner = self.inner.write().await;
        if inner.events.iter().any(|e| e.guid == event.guid) {
            return Err(StoreError::Duplicate {
                guid: event.guid.clone(),
            });
        }

        inner.next_id += 1;
        let mut stored = event.clone();
        stored.id = Some(inner.next_id);
        inner.events.push(stored);
        Ok(())
    }

    async fn find_by_guid(&self, guid: &str) -> Result<MovieWatchEvent, StoreError> {
        self.check_available()?;
        let inner = self.inner.read().await;
        inner
            .events
            .iter()
            .find(|e| e.guid == guid)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                guid: guid.to_string(),
            })
    }

    async fn list_all(&self) -> Result<Vec<MovieWatchEvent>, StoreError> {
        self.check_available()?;
        let mut events = self.inner.read().await.events.clone();
        events.sort_by(listing_order);
        Ok(events)
    }
}

//! Persistence for watch events.
//!
//! Events are append-only and keyed by feed `guid`. Stores never update a row once written.

mod memory;
mod postgres;

pub use memory::MemoryWatchStore;
pub use postgres::PgWatchStore;

use async_trait::async_trait;
use filmlog_models::MovieWatchEvent;
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no watch event with guid {guid}")]
    NotFound { guid: String },

    /// The guid was already stored, possibly by a concurrent run
    #[error("watch event {guid} already stored")]
    Duplicate { guid: String },

    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: &'static str, seconds: u64 },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

#[async_trait]
pub trait WatchStore: Send + Sync {
    fn store_name(&self) -> &str;

    async fn exists(&self, guid: &str) -> Result<bool, StoreError>;

    /// Append one event. A guid that is already present yields `StoreError::Duplicate`.
    async fn insert(&self, event: &MovieWatchEvent) -> Result<(), StoreError>;

    async fn find_by_guid(&self, guid: &str) -> Result<MovieWatchEvent, StoreError>;

    /// Every stored event, most recently watched first
    async fn list_all(&self) -> Result<Vec<MovieWatchEvent>, StoreError>;
}

/// Listing order: watched date descending, undated events last, then id ascending
pub(crate) fn listing_order(a: &MovieWatchEvent, b: &MovieWatchEvent) -> Ordering {
    match (a.watched_date, b.watched_date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(id: i64, date: Option<(i32, u32, u32)>) -> MovieWatchEvent {
        let mut event = MovieWatchEvent::draft(format!("g{}", id), "Title", "2020");
        event.id = Some(id);
        event.watched_date = date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        event
    }

    #[test]
    fn test_listing_order() {
        let mut events = vec![
            event(1, None),
            event(2, Some((2024, 1, 2))),
            event(3, Some((2024, 3, 15))),
            event(4, Some((2024, 1, 2))),
            event(5, None),
        ];
        events.sort_by(listing_order);

        let ids: Vec<i64> = events.iter().filter_map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2, 4, 1, 5]);
    }
}

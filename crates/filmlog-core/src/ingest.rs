use filmlog_models::MovieWatchEvent;
use filmlog_sources::{extract_entry, FeedReader, FeedSource, MetadataProvider, SourceError};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::store::{StoreError, WatchStore};

/// Terminal state of one feed entry within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Inserted,
    SkippedDuplicate,
    SkippedExtractFailure,
    SkippedCheckFailure,
    SkippedPersistFailure,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Inserted => "inserted",
            EntryStatus::SkippedDuplicate => "skipped_duplicate",
            EntryStatus::SkippedExtractFailure => "skipped_extract_failure",
            EntryStatus::SkippedCheckFailure => "skipped_check_failure",
            EntryStatus::SkippedPersistFailure => "skipped_persist_failure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryOutcome {
    /// Feed guid; empty when the entry had none
    pub guid: String,
    pub title: Option<String>,
    pub status: EntryStatus,
    /// Enrichment was attempted and succeeded
    pub enriched: bool,
    pub error: Option<String>,
}

impl EntryOutcome {
    fn new(guid: impl Into<String>, status: EntryStatus) -> Self {
        Self {
            guid: guid.into(),
            title: None,
            status,
            enriched: false,
            error: None,
        }
    }

    fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

pub struct IngestReport {
    /// Full store contents after the run, in listing order
    pub events: Vec<MovieWatchEvent>,
    /// One outcome per feed entry, in feed order
    pub outcomes: Vec<EntryOutcome>,
    pub duration: Duration,
}

impl IngestReport {
    pub fn count(&self, status: EntryStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn inserted(&self) -> usize {
        self.count(EntryStatus::Inserted)
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.inserted()
    }

    pub fn enriched(&self) -> usize {
        self.outcomes.iter().filter(|o| o.enriched).count()
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("feed could not be read: {0}")]
    FeedRead(#[source] SourceError),

    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}

pub struct IngestOrchestrator {
    reader: FeedReader,
    store: Arc<dyn WatchStore>,
    provider: Arc<dyn MetadataProvider>,
    enrichment: bool,
}

impl IngestOrchestrator {
    pub fn new(reader: FeedReader, store: Arc<dyn WatchStore>, provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            reader,
            store,
            provider,
            enrichment: true,
        }
    }

    /// Disable enrichment; every new event is stored with feed fields only
    pub fn with_enrichment(mut self, enabled: bool) -> Self {
        self.enrichment = enabled;
        self
    }

    pub fn store(&self) -> &Arc<dyn WatchStore> {
        &self.store
    }

    /// Ingest every entry of the feed once, then return the full store contents.
    ///
    /// Only an unreadable feed or a failing final listing abort the run. Per-entry
    /// failures are recorded in the report and the run moves on.
    #[instrument(skip(self, source), fields(source = %source))]
    pub async fn run(&self, source: &FeedSource) -> Result<IngestReport, IngestError> {
        let start = Instant::now();

        let entries = self.reader.read(source).await.map_err(IngestError::FeedRead)?;
        info!(
            operation = "ingest_start",
            entries = entries.len(),
            store = self.store.store_name(),
            "Starting ingestion"
        );

        let mut outcomes = Vec::with_capacity(entries.len());
        for entry in &entries {
            let outcome = match extract_entry(entry) {
                Ok(draft) => self.process(draft).await,
                Err(e) => {
                    warn!(guid = %entry.guid, error = %e, "Skipping entry that is not a diary watch");
                    EntryOutcome::new(entry.guid.trim(), EntryStatus::SkippedExtractFailure).with_error(e)
                }
            };
            debug!(guid = %outcome.guid, status = outcome.status.as_str(), "Entry processed");
            outcomes.push(outcome);
        }

        let events = self.store.list_all().await?;
        let report = IngestReport {
            events,
            outcomes,
            duration: start.elapsed(),
        };

        info!(
            operation = "ingest_complete",
            inserted = report.inserted(),
            skipped = report.skipped(),
            enriched = report.enriched(),
            total_events = report.events.len(),
            duration_ms = report.duration.as_millis() as u64,
            "Ingestion finished"
        );
        Ok(report)
    }

    async fn process(&self, mut draft: MovieWatchEvent) -> EntryOutcome {
        let outcome = |draft: &MovieWatchEvent, status| {
            EntryOutcome::new(draft.guid.as_str(), status).with_title(&draft.title)
        };

        match self.store.exists(&draft.guid).await {
            Ok(true) => {
                debug!(guid = %draft.guid, "Already stored");
                return outcome(&draft, EntryStatus::SkippedDuplicate);
            }
            Ok(false) => {}
            Err(e) => {
                warn!(guid = %draft.guid, error = %e, "Existence check failed, entry will be retried next run");
                return outcome(&draft, EntryStatus::SkippedCheckFailure).with_error(e);
            }
        }

        let mut enriched = false;
        if self.enrichment && draft.wants_enrichment() {
            let tmdb_id = draft.tmdb_id.clone().unwrap_or_default();
            match self.provider.enrich(&tmdb_id).await {
                Ok(metadata) => {
                    draft = draft.with_metadata(metadata);
                    enriched = true;
                }
                Err(e) => warn!(
                    guid = %draft.guid,
                    tmdb_id = %tmdb_id,
                    provider = self.provider.provider_name(),
                    status = ?e.status_code(),
                    error = %e,
                    "Enrichment failed, storing feed fields only"
                ),
            }
        }

        let result = match self.store.insert(&draft).await {
            Ok(()) => {
                info!(guid = %draft.guid, title = %draft.title, enriched, "Stored watch event");
                outcome(&draft, EntryStatus::Inserted)
            }
            Err(StoreError::Duplicate { .. }) => {
                debug!(guid = %draft.guid, "Lost insert race, already stored");
                outcome(&draft, EntryStatus::SkippedDuplicate)
            }
            Err(e) => {
                warn!(guid = %draft.guid, error = %e, "Failed to persist watch event");
                outcome(&draft, EntryStatus::SkippedPersistFailure).with_error(e)
            }
        };

        EntryOutcome { enriched, ..result }
    }
}

pub mod ingest;
pub mod store;

pub use ingest::{EntryOutcome, EntryStatus, IngestError, IngestOrchestrator, IngestReport};
pub use store::{MemoryWatchStore, PgWatchStore, StoreError, WatchStore};

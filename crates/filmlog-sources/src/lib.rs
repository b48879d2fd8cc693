pub mod error;
pub mod extract;
pub mod feed;
pub mod tmdb;
pub mod traits;

pub use error::SourceError;
pub use extract::{extract_entry, ExtractError};
pub use feed::{FeedReader, FeedSource, RawFeedEntry};
pub use tmdb::{merge_localized, TmdbClient};
pub use traits::MetadataProvider;

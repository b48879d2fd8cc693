pub mod api;
pub mod client;
pub mod merge;

pub use client::TmdbClient;
pub use merge::merge_localized;

pub mod parser;
pub mod reader;

pub use parser::{parse_feed, RawFeedEntry};
pub use reader::{FeedReader, FeedSource};

pub mod credits;
pub mod metadata;
pub mod watch_event;

pub use credits::{CastMember, CrewMember, MovieCredits};
pub use metadata::MovieMetadata;
pub use watch_event::{MovieWatchEvent, WATCHED_DATE_FORMAT};

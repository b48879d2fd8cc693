pub mod config;
pub mod paths;

pub use config::{Config, DatabaseConfig, FeedConfig, ServerConfig, TmdbConfig, PLACEHOLDER_ACCESS_TOKEN};
pub use paths::{PathManager, container_base_path};

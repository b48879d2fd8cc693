//! Read API over stored watch events.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use router::{build_cors_layer, build_router, shutdown_signal};
pub use state::AppState;

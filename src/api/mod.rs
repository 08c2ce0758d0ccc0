//! HTTP API layer

mod error;
mod handlers;
mod routes;

pub use error::{ApiError, ErrorResponse};
pub use routes::{create_router, ApiDoc, AppState};

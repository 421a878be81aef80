//! HTTP API for taskgen.
//!
//! ## Endpoints
//!
//! - `POST /generate-task` - Generate a speaking or writing task for a topic
//! - `GET /health` - Health check

mod routes;
pub mod types;

pub use routes::{router, serve, AppState};
pub use types::*;

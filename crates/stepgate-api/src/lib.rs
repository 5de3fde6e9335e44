//! # stepgate API
//!
//! HTTP surface of the approval gate:
//!
//! ```text
//! GET  /decision  - Apply an approve/reject link (302 to the console)
//! POST /notify    - Announce a suspended execution
//! GET  /health    - Health report
//! GET  /livez     - Liveness probe
//! ```

pub mod error;
pub mod http;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use http::routes::create_router;
pub use server::{ApiConfig, ApiServer};
pub use state::AppState;

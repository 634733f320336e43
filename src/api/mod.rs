//! HTTP API.
//!
//! Exposes the checklist, symptom log, profile and recovery scoring as
//! JSON endpoints. Routes are nested under `/api/`; every response goes
//! through the access log and carries `Cache-Control: no-store`.
//!
//! The router is composable: `api_router()` returns a `Router` that can
//! be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer, ApiSession, ServerError};
pub use types::ApiContext;

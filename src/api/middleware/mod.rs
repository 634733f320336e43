//! API middleware.
//!
//! Only the access log runs per request. Response headers and CORS are
//! tower-http layers applied in the router.

pub mod audit;

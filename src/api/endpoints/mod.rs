//! API endpoint handlers.
//!
//! Each module corresponds to one client screen or feature and reuses
//! the store functions directly.

pub mod brochures;
pub mod export;
pub mod health;
pub mod profile;
pub mod recovery;
pub mod symptoms;

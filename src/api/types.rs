//! Shared types for the API layer.

use std::sync::Arc;

use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::core_state::CoreState;

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

// ═══════════════════════════════════════════════════════════
// Response envelope
// ═══════════════════════════════════════════════════════════

/// Success body: `{success: true, message, data}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data,
        })
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

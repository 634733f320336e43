//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Layers (outermost → innermost):
//! 1. CORS → 2. `Cache-Control: no-store` → 3. Access log → Handler

use std::sync::Arc;

use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router.
///
/// `allowed_origin` restricts CORS to one browser origin. Without it
/// any origin is accepted, which suits a local single-user install.
pub fn api_router(core: Arc<CoreState>, allowed_origin: Option<&str>) -> Router {
    let ctx = ApiContext::new(core);

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/brochures/myomectomy", get(endpoints::brochures::myomectomy))
        .route(
            "/brochures/sections/:section_id",
            get(endpoints::brochures::section),
        )
        .route(
            "/brochures/sections/:section_id/toggle",
            post(endpoints::brochures::toggle_section),
        )
        .route(
            "/brochures/sections/:section_id/notes",
            put(endpoints::brochures::section_notes),
        )
        .route(
            "/brochures/progress",
            get(endpoints::brochures::list_progress).post(endpoints::brochures::update_progress),
        )
        .route("/brochures/progress/reset", delete(endpoints::brochures::reset))
        .route(
            "/symptoms",
            get(endpoints::symptoms::list).post(endpoints::symptoms::create),
        )
        .route("/symptoms/clear", delete(endpoints::symptoms::clear))
        .route(
            "/symptoms/:id",
            put(endpoints::symptoms::update).delete(endpoints::symptoms::delete),
        )
        .route(
            "/profile",
            get(endpoints::profile::get).put(endpoints::profile::save),
        )
        .route("/profile/surgery-date", patch(endpoints::profile::surgery_date))
        .route("/recovery/progress", get(endpoints::recovery::progress))
        .route("/recovery/phase", get(endpoints::recovery::phase))
        .route("/export", get(endpoints::export::report))
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    Router::new()
        .nest("/api", routes)
        .layer(cors_layer(allowed_origin))
}

fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let Some(origin) = allowed_origin else {
        return CorsLayer::permissive();
    };
    match HeaderValue::from_str(origin) {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([CONTENT_TYPE]),
        Err(_) => {
            tracing::warn!(origin, "Invalid CORS origin, falling back to permissive");
            CorsLayer::permissive()
        }
    }
}

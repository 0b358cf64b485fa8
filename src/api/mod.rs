//! HTTP routing for the contact score endpoints.

use crate::errors::AppError;
use crate::handlers::{self, AppState};
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Builds the application router.
///
/// The scoring endpoints only accept the configured origin; the inspection
/// endpoint is open to any origin. No route registers an `OPTIONS` handler:
/// the `CorsLayer` wrapping each group answers every `OPTIONS` request itself
/// with a bare 200. It also stamps `Access-Control-Allow-Origin` on every
/// other response, errors included.
pub fn router(state: Arc<AppState>) -> Result<Router, AppError> {
    let origin = HeaderValue::from_str(&state.config.allowed_origin).map_err(|e| {
        AppError::Internal(format!(
            "Invalid CORS origin '{}': {}",
            state.config.allowed_origin, e
        ))
    })?;

    let scoring_routes: Router<Arc<AppState>> = Router::new()
        .route("/api/getQualityScore", get(handlers::get_quality_score))
        .route("/api/debug-function", get(handlers::debug_quality_score))
        .layer(cors_layer(AllowOrigin::exact(origin)));

    // The misspelled path is the one already linked from live pages.
    let inspection_routes: Router<Arc<AppState>> = Router::new()
        .route("/api/insptectCustomFields", get(handlers::inspect_custom_fields))
        .route("/api/inspectCustomFields", get(handlers::inspect_custom_fields))
        .layer(cors_layer(AllowOrigin::from(Any)));

    Ok(Router::new()
        .route("/health", get(handlers::health))
        .merge(scoring_routes)
        .merge(inspection_routes)
        .with_state(state))
}

fn cors_layer(origin: AllowOrigin) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::api::handlers::{auth, products};
use crate::api::state::AppState;

/// All API routes bound to `state`
///
/// Product routes require a signed-in user; middleware layers such as CORS
/// and tracing are added by the caller.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(auth::health_check))
        // Auth routes
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/session", get(auth::session))
        .route("/api/auth/profile", patch(auth::update_profile))
        // Product routes
        .route("/api/products", get(products::list_products))
        .route("/api/products/stock", get(products::list_products_with_stock))
        .route("/api/products/stats", get(products::stock_summary))
        // Lookups live one level down so no SKU collides with the routes above
        .route("/api/products/sku/:sku", get(products::get_product))
        .with_state(state)
}

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::api::envelope::ApiResponse;
use crate::api::errors::ApiError;
use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;
use crate::domain::product::{Pagination, ProductFilter};

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StockQuery {
    pub search: Option<String>,
    pub status: Option<String>,
}

/// Paginated product listing
///
/// GET /api/products?page=1&limit=10
pub async fn list_products(
    State(state): State<AppState>,
    _user: CurrentUser,
    WithRejection(Query(query), _): WithRejection<Query<PageQuery>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let pagination = Pagination::new(query.page, query.limit).map_err(ApiError::validation)?;
    let page = state.products.list_products_paginated(pagination).await?;

    Ok((
        [(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")],
        Json(page),
    ))
}

/// Products with availability, optionally filtered
///
/// GET /api/products/stock?search=bolt&status=low_stock
pub async fn list_products_with_stock(
    State(state): State<AppState>,
    _user: CurrentUser,
    WithRejection(Query(query), _): WithRejection<Query<StockQuery>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = ProductFilter::new(query.search.as_deref(), query.status.as_deref())
        .map_err(ApiError::validation)?;
    let products = state.products.list_products_with_stock(&filter).await?;

    Ok(Json(ApiResponse::ok(products)))
}

/// Product totals per availability status
///
/// GET /api/products/stats
pub async fn stock_summary(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state.products.stock_summary().await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// Single product by SKU
///
/// GET /api/products/sku/:sku
pub async fn get_product(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(sku): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state.products.get_product_by_sku(&sku).await?;

    Ok((
        [(header::CACHE_CONTROL, "public, max-age=60")],
        Json(ApiResponse::ok(product)),
    ))
}

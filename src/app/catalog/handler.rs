//! 商品目录处理器

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    response::Json,
};

use super::{
    model::{CreateProductRequest, Product},
    service::{CatalogService, REMOVED_MESSAGE},
};
use crate::web::{
    error::ApiError,
    response::{HealthResponse, MessageResponse},
};

#[derive(Clone)]
pub struct AppState {
    pub catalog_service: CatalogService,
}

impl AppState {
    pub fn new(catalog_service: CatalogService) -> Self {
        Self { catalog_service }
    }
}

/// GET /products
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.catalog_service.list_products().await?;
    Ok(Json(products))
}

/// POST /products
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(request) = payload?;
    let product = state.catalog_service.create_product(request).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// DELETE /products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id?;
    state.catalog_service.remove_product(id).await?;
    Ok(Json(MessageResponse::new(REMOVED_MESSAGE)))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.catalog_service.backend()))
}

/// GET /
pub async fn api_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "Ekart Catalog API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /products": "list all products",
            "POST /products": "add a product: {name, price, description?}",
            "DELETE /products/:id": "remove (buy) a product",
            "GET /health": "health check"
        },
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// 未匹配路由
pub async fn not_found() -> ApiError {
    ApiError::NotFound("route not found".to_string())
}

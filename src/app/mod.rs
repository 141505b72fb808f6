//! 应用层：路由组装

pub mod catalog;

use std::time::Duration;

use axum::{
    middleware,
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::infrastructure::config::HttpConfig;
use crate::web::middleware::request_logging_middleware;
use catalog::handler::{self, AppState};

/// 创建商品目录路由
pub fn router(state: AppState, http: &HttpConfig) -> Router {
    Router::new()
        .route("/", get(handler::api_info))
        .route(
            "/products",
            get(handler::list_products).post(handler::create_product),
        )
        .route("/products/:id", delete(handler::delete_product))
        .route("/health", get(handler::health_check))
        .fallback(handler::not_found)
        .layer(TimeoutLayer::new(Duration::from_secs(http.timeout_seconds)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // 位于超时与 CORS 之外，预检和 408 响应同样带请求 id
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

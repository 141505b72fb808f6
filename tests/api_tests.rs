use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use ekart::app::catalog::store::{MemoryProductStore, ProductStore};
use ekart::infrastructure::{
    config::{DatabaseConfig, HttpConfig},
    database::open_store,
};
use ekart::web::error::ErrorResponse;
use ekart::{router, AppState, CatalogService, Product};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app_with(store: Arc<dyn ProductStore>) -> Router {
    router(
        AppState::new(CatalogService::new(store)),
        &HttpConfig::default(),
    )
}

fn memory_app() -> Router {
    app_with(Arc::new(MemoryProductStore::new()))
}

async fn sqlite_app() -> Router {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        ..DatabaseConfig::default()
    };
    app_with(open_store(&config).await.unwrap())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(body: Value) -> Request<Body> {
    Request::post("/products")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_products() -> Request<Body> {
    Request::get("/products").body(Body::empty()).unwrap()
}

fn delete_product(id: impl std::fmt::Display) -> Request<Body> {
    Request::delete(format!("/products/{}", id))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn create_then_list_returns_the_record() {
    for app in [memory_app(), sqlite_app().await] {
        let (status, created) = send(&app, post_json(json!({"name": "Pen", "price": 10}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            created,
            json!({"id": 1, "name": "Pen", "price": 10.0, "description": null})
        );

        let (status, listed) = send(&app, get_products()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!([created]));
    }
}

#[tokio::test]
async fn delete_first_of_two_leaves_the_second() {
    for app in [memory_app(), sqlite_app().await] {
        let (_, first) = send(&app, post_json(json!({"name": "Pen", "price": 10}))).await;
        let (_, second) = send(
            &app,
            post_json(json!({"name": "Ink", "price": "4.50", "description": "blue"})),
        )
        .await;

        let (status, body) = send(&app, delete_product(&first["id"])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Product removed"}));

        let (_, listed) = send(&app, get_products()).await;
        let listed: Vec<Product> = serde_json::from_value(listed).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, second["id"].as_i64().unwrap());
        assert_eq!(listed[0].price, 4.5);
        assert_eq!(listed[0].description.as_deref(), Some("blue"));
    }
}

#[tokio::test]
async fn deleting_unknown_id_succeeds_without_changes() {
    for app in [memory_app(), sqlite_app().await] {
        send(&app, post_json(json!({"name": "Pen", "price": 10}))).await;
        let (_, before) = send(&app, get_products()).await;

        let (status, body) = send(&app, delete_product(404)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Product removed");

        let (_, after) = send(&app, get_products()).await;
        assert_eq!(before, after);
    }
}

#[tokio::test]
async fn missing_fields_are_validation_errors() {
    let app = memory_app();

    let (status, body) = send(&app, post_json(json!({"name": "Pen"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_value(body).unwrap();
    assert_eq!(error.error, "VALIDATION_ERROR");
    assert_eq!(error.code, 400);

    let (status, _) = send(&app, post_json(json!({"price": 3}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, post_json(json!({"name": "Pen", "price": "cheap"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = send(&app, get_products()).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn malformed_requests_are_bad_requests() {
    let app = memory_app();

    let request = Request::post("/products")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");

    let (status, _) = send(&app, delete_product("abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_storage_backend() {
    let app = sqlite_app().await;
    let (status, body) = send(
        &app,
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "sqlite");
}

#[tokio::test]
async fn half_cent_prices_round_up_on_every_backend() {
    for app in [memory_app(), sqlite_app().await] {
        let (status, created) =
            send(&app, post_json(json!({"name": "Clip", "price": "1.005"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["price"], json!(1.01));

        let (_, listed) = send(&app, get_products()).await;
        assert_eq!(listed[0]["price"], json!(1.01));
    }
}

#[tokio::test]
async fn products_without_description_list_on_sqlite() {
    let app = sqlite_app().await;
    send(&app, post_json(json!({"name": "Pen", "price": 10}))).await;
    send(
        &app,
        post_json(json!({"name": "Ink", "price": 2.5, "description": "blue"})),
    )
    .await;

    let (status, listed) = send(&app, get_products()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["description"], Value::Null);
    assert_eq!(listed[1]["description"], json!("blue"));
}

//! 商品目录 HTTP 接口

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Response;
use tracing::debug;

use super::error::ClientError;
use crate::app::catalog::model::{NewProduct, Product};
use crate::web::response::MessageResponse;

/// 客户端对商品目录服务的访问接口
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, ClientError>;
    async fn create(&self, product: &NewProduct) -> Result<Product, ClientError>;
    async fn delete(&self, id: i64) -> Result<MessageResponse, ClientError>;
}

/// 基于 reqwest 的实现
#[derive(Clone)]
pub struct HttpCatalogApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCatalogApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn products_url(&self) -> String {
        format!("{}/products", self.base_url)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn list(&self) -> Result<Vec<Product>, ClientError> {
        let response = self.http.get(self.products_url()).send().await?;
        let products = ensure_success(response).await?.json().await?;
        Ok(products)
    }

    async fn create(&self, product: &NewProduct) -> Result<Product, ClientError> {
        let response = self
            .http
            .post(self.products_url())
            .json(product)
            .send()
            .await?;
        let created: Product = ensure_success(response).await?.json().await?;
        debug!("服务端已创建商品 id={}", created.id);
        Ok(created)
    }

    async fn delete(&self, id: i64) -> Result<MessageResponse, ClientError> {
        let response = self
            .http
            .delete(format!("{}/{}", self.products_url(), id))
            .send()
            .await?;
        let message = ensure_success(response).await?.json().await?;
        Ok(message)
    }
}

async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

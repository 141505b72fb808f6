//! 商品目录业务服务

use std::sync::Arc;

use tracing::{debug, info};
use validator::Validate;

use super::model::{CreateProductRequest, NewProduct, Product, PRICE_LIMIT};
use super::store::ProductStore;
use crate::web::error::ApiError;

/// 删除接口的固定确认消息
pub const REMOVED_MESSAGE: &str = "Product removed";

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn ProductStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let products = self.store.list().await?;
        debug!("查询到 {} 个商品", products.len());
        Ok(products)
    }

    /// 创建商品
    ///
    /// 仅要求 `name` 与 `price` 存在；`price` 可以是数字或数字字符串。
    pub async fn create_product(&self, request: CreateProductRequest) -> Result<Product, ApiError> {
        let new_product = Self::normalize(request)?;
        let product = self.store.create(&new_product).await?;
        info!("商品已创建: id={}, name={:?}", product.id, product.name);
        Ok(product)
    }

    /// 删除商品，不存在的 id 同样视为成功
    pub async fn remove_product(&self, id: i64) -> Result<(), ApiError> {
        let removed = self.store.delete(id).await?;
        if removed {
            info!("商品已删除: id={}", id);
        } else {
            debug!("删除的商品不存在: id={}", id);
        }
        Ok(())
    }

    fn normalize(request: CreateProductRequest) -> Result<NewProduct, ApiError> {
        let name = request
            .name
            .ok_or_else(|| ApiError::Validation("name is required".to_string()))?;
        let price_input = request
            .price
            .ok_or_else(|| ApiError::Validation("price is required".to_string()))?;
        let price = price_input
            .to_amount()
            .ok_or_else(|| ApiError::Validation("price must be a number".to_string()))?;

        let new_product = NewProduct::new(name, price, request.description);
        new_product.validate()?;
        if !new_product.price_in_range() {
            return Err(ApiError::Validation(format!(
                "price must be below {} in absolute value",
                PRICE_LIMIT
            )));
        }

        Ok(new_product)
    }
}

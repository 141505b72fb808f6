//! 商品存储层
//!
//! `ProductStore` 是目录服务唯一依赖的持久化接口，提供两种实现：
//! - `SqlProductStore`：基于 sqlx 的 Postgres / SQLite 连接池
//! - `MemoryProductStore`：进程内存储，用于演示与测试

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::model::{NewProduct, Product};
use crate::infrastructure::database::DbPool;

/// 存储层错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("unsupported database url: {0}")]
    UnsupportedUrl(String),
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// 按插入顺序返回全部商品
    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    /// 写入新商品并返回带 id 的完整记录
    async fn create(&self, product: &NewProduct) -> Result<Product, StoreError>;

    /// 删除指定商品，返回是否确实删除了一行
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    fn backend(&self) -> &'static str;
}

/// 在具体连接池上执行同一段查询
macro_rules! on_pool {
    ($pool:expr, |$p:ident| $body:expr) => {
        match $pool {
            DbPool::Postgres($p) => $body,
            DbPool::Sqlite($p) => $body,
        }
    };
}

pub struct SqlProductStore {
    pool: DbPool,
}

impl SqlProductStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for SqlProductStore {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let products = on_pool!(&self.pool, |pool| {
            sqlx::query_as::<_, Product>(
                "SELECT id, name, price, description FROM products ORDER BY id",
            )
            .fetch_all(pool)
            .await?
        });

        Ok(products)
    }

    async fn create(&self, product: &NewProduct) -> Result<Product, StoreError> {
        let price = product.rounded_price();

        let id = on_pool!(&self.pool, |pool| {
            sqlx::query_scalar::<_, i64>(
                "INSERT INTO products (name, price, description) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(product.name.as_str())
            .bind(price)
            .bind(product.description.as_deref())
            .fetch_one(pool)
            .await?
        });

        Ok(Product {
            id,
            name: product.name.clone(),
            price,
            description: product.description.clone(),
        })
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let rows_affected = on_pool!(&self.pool, |pool| {
            sqlx::query("DELETE FROM products WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?
                .rows_affected()
        });

        Ok(rows_affected > 0)
    }

    fn backend(&self) -> &'static str {
        self.pool.backend().name()
    }
}

#[derive(Default)]
struct MemoryCatalog {
    last_id: i64,
    products: BTreeMap<i64, Product>,
}

/// 进程内商品存储
///
/// id 单调递增，删除后不复用，行为与数据库自增主键一致。
#[derive(Default)]
pub struct MemoryProductStore {
    catalog: Mutex<MemoryCatalog>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let catalog = self.catalog.lock().await;
        Ok(catalog.products.values().cloned().collect())
    }

    async fn create(&self, product: &NewProduct) -> Result<Product, StoreError> {
        let mut catalog = self.catalog.lock().await;
        catalog.last_id += 1;

        let product = Product {
            id: catalog.last_id,
            name: product.name.clone(),
            price: product.rounded_price(),
            description: product.description.clone(),
        };
        catalog.products.insert(product.id, product.clone());

        Ok(product)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut catalog = self.catalog.lock().await;
        Ok(catalog.products.remove(&id).is_some())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

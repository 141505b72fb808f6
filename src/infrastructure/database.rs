//! 数据库基础设施

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::info;

use super::config::DatabaseConfig;
use crate::app::catalog::store::{MemoryProductStore, ProductStore, SqlProductStore, StoreError};

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
    Memory,
}

impl Backend {
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Some(Backend::Postgres)
        } else if url.starts_with("sqlite:") {
            Some(Backend::Sqlite)
        } else if url.starts_with("memory:") {
            Some(Backend::Memory)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Postgres => "postgres",
            Backend::Sqlite => "sqlite",
            Backend::Memory => "memory",
        }
    }

    /// 自增主键保证 id 删除后不被复用
    fn products_table_ddl(&self) -> Option<&'static str> {
        match self {
            Backend::Postgres => Some(
                r#"
                CREATE TABLE IF NOT EXISTS products (
                    id BIGSERIAL PRIMARY KEY,
                    name VARCHAR(255) NOT NULL,
                    price DOUBLE PRECISION NOT NULL,
                    description TEXT
                )
                "#,
            ),
            Backend::Sqlite => Some(
                r#"
                CREATE TABLE IF NOT EXISTS products (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    price REAL NOT NULL,
                    description TEXT
                )
                "#,
            ),
            Backend::Memory => None,
        }
    }
}

/// 具体驱动的连接池
#[derive(Debug, Clone)]
pub enum DbPool {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl DbPool {
    pub fn backend(&self) -> Backend {
        match self {
            DbPool::Postgres(_) => Backend::Postgres,
            DbPool::Sqlite(_) => Backend::Sqlite,
        }
    }
}

pub struct DatabaseManager {
    pool: DbPool,
    backend: Backend,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let backend = Backend::from_url(&config.url)
            .filter(|backend| *backend != Backend::Memory)
            .ok_or_else(|| StoreError::UnsupportedUrl(config.url.clone()))?;

        info!("连接数据库: {}", redact_url(&config.url));
        let acquire_timeout = Duration::from_secs(config.acquire_timeout_seconds);

        let pool = match backend {
            Backend::Postgres => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .min_connections(config.min_connections)
                    .acquire_timeout(acquire_timeout)
                    .idle_timeout(Duration::from_secs(600))
                    .connect(&config.url)
                    .await?;
                DbPool::Postgres(pool)
            }
            _ => {
                let options = SqlitePoolOptions::new().acquire_timeout(acquire_timeout);

                // 内存 SQLite 的数据随连接消失，只保留一个永不过期的连接
                let options = if is_in_memory_sqlite(&config.url) {
                    options
                        .max_connections(1)
                        .min_connections(1)
                        .idle_timeout(None)
                        .max_lifetime(None)
                } else {
                    options
                        .max_connections(config.max_connections)
                        .min_connections(config.min_connections)
                        .idle_timeout(Duration::from_secs(600))
                };

                DbPool::Sqlite(options.connect(&config.url).await?)
            }
        };

        Ok(Self { pool, backend })
    }

    /// 创建商品表（已存在则跳过）
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        let Some(ddl) = self.backend.products_table_ddl() else {
            return Ok(());
        };

        match &self.pool {
            DbPool::Postgres(pool) => {
                sqlx::query(ddl).execute(pool).await?;
            }
            DbPool::Sqlite(pool) => {
                sqlx::query(ddl).execute(pool).await?;
            }
        }
        info!("✅ 商品表已就绪");
        Ok(())
    }

    pub fn get_pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }
}

/// 按连接串打开商品存储，并完成建表
pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn ProductStore>, StoreError> {
    match Backend::from_url(&config.url) {
        Some(Backend::Memory) => {
            info!("使用进程内存储，数据不会持久化");
            Ok(Arc::new(MemoryProductStore::new()))
        }
        Some(_) => {
            let manager = DatabaseManager::new(config).await?;
            manager.init_schema().await?;
            Ok(Arc::new(SqlProductStore::new(manager.get_pool().clone())))
        }
        None => Err(StoreError::UnsupportedUrl(config.url.clone())),
    }
}

fn is_in_memory_sqlite(url: &str) -> bool {
    url.starts_with("sqlite:") && (url.contains(":memory:") || url.contains("mode=memory"))
}

/// 隐藏连接串中的密码
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            let credentials = &url[scheme_end + 3..at];
            match credentials.find(':') {
                Some(colon) => format!(
                    "{}{}:***{}",
                    &url[..scheme_end + 3],
                    &credentials[..colon],
                    &url[at..]
                ),
                None => url.to_string(),
            }
        }
        _ => url.to_string(),
    }
}

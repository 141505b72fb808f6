//! # Ekart 商品目录
//!
//! - `app`：商品目录的模型、存储、服务、处理器与路由
//! - `client`：持有本地缓存、每次变更后整体刷新的目录客户端
//! - `web`：统一错误、响应结构与请求日志中间件
//! - `infrastructure`：配置、数据库与日志

pub mod app;
pub mod client;
pub mod infrastructure;
pub mod web;

pub use app::catalog::handler::AppState;
pub use app::catalog::model::{NewProduct, Product};
pub use app::catalog::service::CatalogService;
pub use app::router;

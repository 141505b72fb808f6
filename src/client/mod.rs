//! 商品目录客户端
//!
//! 持有服务端目录的本地副本，每次变更后整体重新拉取。

pub mod api;
pub mod error;
pub mod render;
pub mod state;

pub use api::{CatalogApi, HttpCatalogApi};
pub use error::ClientError;
pub use state::{Action, CatalogClient, Confirm, LoadStatus, Outcome, ProductForm, ViewState};

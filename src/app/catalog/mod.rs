//! 商品目录：模型、存储、服务与处理器

pub mod handler;
pub mod model;
pub mod service;
pub mod store;

//! 客户端错误类型

/// 客户端错误
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// 表单校验失败，请求未发出
    #[error("validation error: {0}")]
    Validation(String),

    /// 请求未能完成（连接失败、超时、响应无法解析）
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 服务端返回非 2xx 状态
    #[error("server responded with {status}: {body}")]
    Status { status: u16, body: String },
}

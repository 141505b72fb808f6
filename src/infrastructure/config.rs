//! 服务端配置
//!
//! 加载顺序：内置默认值 → TOML 配置文件 → 环境变量 / 命令行参数。

use std::fs;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use super::database::Backend;

/// 服务端配置结构
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// 端口
    pub port: u16,
    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// 数据库配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 连接串：postgres://、sqlite: 或 memory:
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// 获取连接超时时间（秒）
    pub acquire_timeout_seconds: u64,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
    /// 日志文件目录，未设置时不写文件
    pub log_dir: Option<PathBuf>,
    /// 日志文件名前缀
    pub file_prefix: String,
    /// 是否启用控制台输出
    pub console_output: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 5000,
            timeout_seconds: 30,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://ekart.db?mode=rwc".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_seconds: 8,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            file_prefix: "ekart-server".to_string(),
            console_output: true,
        }
    }
}

impl HttpConfig {
    /// 解析监听地址，绑定地址可以是 IP 也可以是主机名
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        (self.bind_address.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| ConfigError::Validation(format!("无效的监听地址: {}", e)))?
            .next()
            .ok_or_else(|| {
                ConfigError::Validation(format!("无法解析监听地址: {}", self.bind_address))
            })
    }
}

/// 服务端命令行参数
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "ekart-server", about = "Ekart product catalog server", version)]
pub struct ServerArgs {
    #[arg(long, env = "EKART_CONFIG", value_name = "FILE", help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "EKART_BIND", value_name = "ADDR", help = "Address to bind the HTTP listener to")]
    pub bind: Option<String>,

    #[arg(long, env = "PORT", value_name = "PORT", help = "HTTP port")]
    pub port: Option<u16>,

    #[arg(long, env = "DATABASE_URL", value_name = "URL", help = "Database url (postgres://, sqlite: or memory:)")]
    pub database_url: Option<String>,

    #[arg(long, env = "EKART_LOG_LEVEL", value_name = "LEVEL", help = "Log level")]
    pub log_level: Option<String>,

    #[arg(long, env = "EKART_LOG_DIR", value_name = "DIR", help = "Directory for daily rolling log files")]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        Ok(config)
    }

    /// 按参数加载：显式配置文件优先，其次查找默认路径，最后应用覆盖项
    pub fn load(args: &ServerArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::load_from_file(path)?,
            None => load_default_file()?,
        };
        config.apply_overrides(args);
        Ok(config)
    }

    pub fn apply_overrides(&mut self, args: &ServerArgs) {
        if let Some(bind) = &args.bind {
            self.http.bind_address = bind.clone();
        }
        if let Some(port) = args.port {
            self.http.port = port;
        }
        if let Some(url) = &args.database_url {
            self.database.url = url.clone();
        }
        if let Some(level) = &args.log_level {
            self.logging.level = level.to_ascii_lowercase();
        }
        if let Some(dir) = &args.log_dir {
            self.logging.log_dir = Some(dir.clone());
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Validation("HTTP端口必须大于0".to_string()));
        }
        if self.http.bind_address.is_empty() {
            return Err(ConfigError::Validation("绑定地址不能为空".to_string()));
        }
        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::Validation("请求超时时间必须大于0".to_string()));
        }
        self.http.socket_addr()?;

        if Backend::from_url(&self.database.url).is_none() {
            return Err(ConfigError::Validation(format!(
                "不支持的数据库连接串: {}",
                self.database.url
            )));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation("最大连接数必须大于0".to_string()));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Validation(
                "最小连接数不能大于最大连接数".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("配置验证错误: {0}")]
    Validation(String),
}

fn load_default_file() -> Result<Config, ConfigError> {
    let config_paths = ["config.toml", "./config/config.toml"];

    for path in &config_paths {
        if Path::new(path).exists() {
            return Config::load_from_file(path);
        }
    }

    Ok(Config::default())
}

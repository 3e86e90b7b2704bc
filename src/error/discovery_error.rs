//! 服务发现统一错误类型

use super::code::ErrorCode;
use thiserror::Error;

/// 服务发现统一错误类型
///
/// 查询未知服务不是错误，返回空列表即可，所以这里没有 `ServiceNotFound`。
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// 实例 URI 非法（静态配置中的地址写错了）
    #[error("非法实例 URI `{uri}`: {reason}")]
    InvalidUri { uri: String, reason: String },

    /// 后端配置错误，构造阶段即失败
    #[error("后端配置错误: {0}")]
    Misconfigured(String),

    /// 后端在委派查询时出错
    #[error("服务发现后端 `{backend}` 出错: {reason}")]
    Backend { backend: String, reason: String },

    /// 后端查询超时
    #[error("服务发现后端 `{backend}` 超时 ({timeout_ms}ms)")]
    Timeout { backend: String, timeout_ms: u64 },

    /// 配置文件解析错误
    #[error("配置错误: {0}")]
    Config(String),

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(String),

    /// 自定义后端透传的错误
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DiscoveryError {
    /// 创建非法 URI 错误
    pub fn invalid_uri(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        DiscoveryError::InvalidUri {
            uri: uri.into(),
            reason: reason.into(),
        }
    }

    /// 创建后端配置错误
    pub fn misconfigured(msg: impl Into<String>) -> Self {
        DiscoveryError::Misconfigured(msg.into())
    }

    /// 创建后端错误
    pub fn backend(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        DiscoveryError::Backend {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    /// 创建超时错误
    pub fn timeout(backend: impl Into<String>, timeout_ms: u64) -> Self {
        DiscoveryError::Timeout {
            backend: backend.into(),
            timeout_ms,
        }
    }

    /// 创建配置错误
    pub fn config(msg: impl Into<String>) -> Self {
        DiscoveryError::Config(msg.into())
    }

    /// 获取错误代码
    pub fn code(&self) -> ErrorCode {
        match self {
            DiscoveryError::InvalidUri { .. } => ErrorCode::InvalidInstanceUri,
            DiscoveryError::Misconfigured(_) => ErrorCode::BackendMisconfigured,
            DiscoveryError::Backend { .. } => ErrorCode::BackendFailed,
            DiscoveryError::Timeout { .. } => ErrorCode::BackendTimeout,
            DiscoveryError::Config(_) => ErrorCode::ConfigurationError,
            DiscoveryError::Io(_) => ErrorCode::IoError,
            DiscoveryError::Other(_) => ErrorCode::UnknownError,
        }
    }

    /// 把任意错误归到指定后端名下
    ///
    /// 已经带有后端信息的错误原样返回。
    pub fn attribute_to(self, backend: &str) -> Self {
        match self {
            err @ (DiscoveryError::Backend { .. } | DiscoveryError::Timeout { .. }) => err,
            other => DiscoveryError::backend(backend, other.to_string()),
        }
    }
}

impl From<std::io::Error> for DiscoveryError {
    fn from(err: std::io::Error) -> Self {
        DiscoveryError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for DiscoveryError {
    fn from(err: toml::de::Error) -> Self {
        DiscoveryError::Config(err.to_string())
    }
}

/// 服务发现结果类型
pub type Result<T> = std::result::Result<T, DiscoveryError>;

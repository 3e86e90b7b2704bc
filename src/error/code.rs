//! 错误代码和错误类别定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 服务发现错误代码
///
/// 错误代码按类别分组，每个类别占用1000个代码范围：
/// - 1000-1999: 配置相关错误
/// - 2000-2999: 后端相关错误
/// - 9000-9999: 通用错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum ErrorCode {
    // ============================================================
    // 配置相关错误 (1000-1999)
    // ============================================================
    ConfigurationError = 1000,
    InvalidInstanceUri = 1001,
    BackendMisconfigured = 1002,

    // ============================================================
    // 后端相关错误 (2000-2999)
    // ============================================================
    BackendFailed = 2000,
    BackendTimeout = 2001,

    // ============================================================
    // 通用错误 (9000-9999)
    // ============================================================
    IoError = 9000,
    UnknownError = 9999,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ErrorCode {
    /// 获取错误代码的数字值
    #[inline]
    pub fn as_u32(&self) -> u32 {
        *self as u32
    }

    /// 从数字值创建错误代码
    pub fn from_u32(code: u32) -> Option<Self> {
        match code {
            1000 => Some(ErrorCode::ConfigurationError),
            1001 => Some(ErrorCode::InvalidInstanceUri),
            1002 => Some(ErrorCode::BackendMisconfigured),
            2000 => Some(ErrorCode::BackendFailed),
            2001 => Some(ErrorCode::BackendTimeout),
            9000 => Some(ErrorCode::IoError),
            9999 => Some(ErrorCode::UnknownError),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigurationError => "CONFIGURATION_ERROR",
            ErrorCode::InvalidInstanceUri => "INVALID_INSTANCE_URI",
            ErrorCode::BackendMisconfigured => "BACKEND_MISCONFIGURED",
            ErrorCode::BackendFailed => "BACKEND_FAILED",
            ErrorCode::BackendTimeout => "BACKEND_TIMEOUT",
            ErrorCode::IoError => "IO_ERROR",
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// 获取错误代码的类别
    pub fn category(&self) -> ErrorCategory {
        match self.as_u32() {
            1000..=1999 => ErrorCategory::Configuration,
            2000..=2999 => ErrorCategory::Backend,
            _ => ErrorCategory::General,
        }
    }

    /// 判断是否为运行期的瞬时错误（配置错误重试也不会恢复）
    pub fn is_transient(&self) -> bool {
        matches!(self, ErrorCode::BackendFailed | ErrorCode::BackendTimeout)
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    Configuration,
    Backend,
    General,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Configuration => write!(f, "CONFIGURATION"),
            ErrorCategory::Backend => write!(f, "BACKEND"),
            ErrorCategory::General => write!(f, "GENERAL"),
        }
    }
}

//! 健康检查模块
//!
//! 汇总组合客户端下每个服务发现后端的探活结果

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 健康状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
    Unknown,
    Serving,
    NotServing,
}

/// 单个后端的健康状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendHealth {
    /// 后端描述
    pub description: String,
    pub status: HealthStatus,
    /// 探活失败原因
    pub error: Option<String>,
}

impl BackendHealth {
    pub fn serving(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            status: HealthStatus::Serving,
            error: None,
        }
    }

    pub fn not_serving(description: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            status: HealthStatus::NotServing,
            error: Some(error.into()),
        }
    }
}

/// 服务发现健康报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryHealthReport {
    /// 汇总状态：全部后端正常为 Serving，没有后端为 Unknown，否则 NotServing
    pub status: HealthStatus,
    pub backends: Vec<BackendHealth>,
    pub checked_at: DateTime<Utc>,
}

impl DiscoveryHealthReport {
    pub fn new(backends: Vec<BackendHealth>) -> Self {
        let status = if backends.is_empty() {
            HealthStatus::Unknown
        } else if backends.iter().all(|b| b.status == HealthStatus::Serving) {
            HealthStatus::Serving
        } else {
            HealthStatus::NotServing
        };

        Self {
            status,
            backends,
            checked_at: Utc::now(),
        }
    }

    pub fn is_serving(&self) -> bool {
        self.status == HealthStatus::Serving
    }

    /// 序列化为 JSON，便于输出到诊断接口或日志
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

//! 服务发现配置

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// 静态（simple）服务发现后端配置
///
/// `instances` 以服务 ID 为键，值为按顺序排列的实例列表，查询时保持该顺序。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleDiscoveryConfig {
    /// 是否启用
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// 在组合客户端中的排序值（越小越靠前）
    #[serde(default)]
    pub order: i32,

    /// 服务 ID -> 实例列表
    #[serde(default)]
    pub instances: BTreeMap<String, Vec<SimpleInstanceConfig>>,
}

impl Default for SimpleDiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            order: 0,
            instances: BTreeMap::new(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// 单个静态实例配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleInstanceConfig {
    /// 实例地址（如 `https://s1-2:8443`）
    pub uri: String,

    /// 实例 ID（可选，默认为 `{service_id}-{index}`）
    #[serde(default)]
    pub instance_id: Option<String>,

    /// 自定义元数据
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl SimpleInstanceConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            instance_id: None,
            metadata: HashMap::new(),
        }
    }
}

/// 后端失败处理策略
///
/// 后端返回 `Err`、超时或 panic 都算作失败。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// 尽力聚合：跳过失败的后端，记录日志后继续
    #[default]
    BestEffort,
    /// 快速失败：第一个失败的后端直接把错误返回给调用方
    FailFast,
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "best_effort" | "besteffort" => Ok(FailurePolicy::BestEffort),
            "fail_fast" | "failfast" => Ok(FailurePolicy::FailFast),
            _ => Err(format!("Unknown failure policy: {}", s)),
        }
    }
}

/// 组合客户端配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompositeConfig {
    /// 后端失败处理策略
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// 是否并发查询各后端
    #[serde(default)]
    pub concurrent: bool,

    /// 单个后端的查询超时（毫秒）
    #[serde(default)]
    pub backend_timeout_ms: Option<u64>,
}

impl CompositeConfig {
    pub fn backend_timeout(&self) -> Option<Duration> {
        self.backend_timeout_ms.map(Duration::from_millis)
    }
}

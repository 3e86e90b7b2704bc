//! 服务发现后端抽象和实现

pub mod simple;

use async_trait::async_trait;

use crate::discovery::instance::ServiceInstance;
use crate::error::Result;

/// 默认排序值
pub const DEFAULT_ORDER: i32 = 0;

/// 服务发现后端 trait
///
/// 所有服务发现后端（静态配置、应用自定义、组合客户端本身）都需要实现这个 trait
/// 注意：由于需要动态分发（dyn），使用 async-trait
#[async_trait]
pub trait DiscoveryBackend: Send + Sync {
    /// 后端的可读描述，用于日志和诊断
    fn description(&self) -> &str;

    /// 列出该后端已知的所有服务 ID
    async fn get_services(&self) -> Result<Vec<String>>;

    /// 列出指定服务的实例
    ///
    /// 未知的服务 ID 返回空列表，而不是错误。
    async fn get_instances(&self, service_id: &str) -> Result<Vec<ServiceInstance>>;

    /// 在组合客户端中的排序值，越小越靠前
    fn order(&self) -> i32 {
        DEFAULT_ORDER
    }

    /// 探活
    ///
    /// 默认实现是列一次服务并丢弃结果
    async fn probe(&self) -> Result<()> {
        self.get_services().await.map(|_| ())
    }
}

//! 静态配置服务发现后端

use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::debug;

use crate::discovery::backend::{DEFAULT_ORDER, DiscoveryBackend};
use crate::discovery::config::SimpleDiscoveryConfig;
use crate::discovery::instance::ServiceInstance;
use crate::error::{DiscoveryError, Result};

/// 静态服务发现后端
///
/// 实例全部来自配置，构造时校验所有 URI，查询期间不会再失败。
#[derive(Debug, Clone)]
pub struct SimpleDiscoveryBackend {
    instances: BTreeMap<String, Vec<ServiceInstance>>,
    order: i32,
}

impl SimpleDiscoveryBackend {
    pub const DESCRIPTION: &'static str = "Simple Discovery Client";

    /// 从配置创建静态后端
    ///
    /// 任意一个 URI 非法都会导致构造失败
    pub fn new(config: &SimpleDiscoveryConfig) -> Result<Self> {
        let mut instances = BTreeMap::new();

        for (service_id, entries) in &config.instances {
            if service_id.is_empty() {
                return Err(DiscoveryError::misconfigured(
                    "simple discovery: service id must not be empty",
                ));
            }

            let mut list = Vec::with_capacity(entries.len());
            for (idx, entry) in entries.iter().enumerate() {
                let instance = ServiceInstance::from_uri(service_id.as_str(), &entry.uri)
                    .map_err(|e| {
                        DiscoveryError::misconfigured(format!(
                            "simple discovery: service `{}` instance #{}: {}",
                            service_id, idx, e
                        ))
                    })?
                    .with_instance_id(
                        entry
                            .instance_id
                            .clone()
                            .unwrap_or_else(|| format!("{}-{}", service_id, idx)),
                    )
                    .with_metadata_map(entry.metadata.clone());
                list.push(instance);
            }
            instances.insert(service_id.clone(), list);
        }

        debug!(
            services = instances.len(),
            order = config.order,
            "Simple discovery backend initialized"
        );

        Ok(Self {
            instances,
            order: config.order,
        })
    }

    /// 以编程方式构建静态后端
    pub fn builder() -> SimpleDiscoveryBackendBuilder {
        SimpleDiscoveryBackendBuilder::default()
    }
}

#[async_trait]
impl DiscoveryBackend for SimpleDiscoveryBackend {
    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    async fn get_services(&self) -> Result<Vec<String>> {
        Ok(self.instances.keys().cloned().collect())
    }

    async fn get_instances(&self, service_id: &str) -> Result<Vec<ServiceInstance>> {
        Ok(self
            .instances
            .get(service_id)
            .cloned()
            .unwrap_or_default())
    }

    fn order(&self) -> i32 {
        self.order
    }

    async fn probe(&self) -> Result<()> {
        Ok(())
    }
}

/// 静态后端构建器
pub struct SimpleDiscoveryBackendBuilder {
    instances: BTreeMap<String, Vec<ServiceInstance>>,
    order: i32,
}

impl Default for SimpleDiscoveryBackendBuilder {
    fn default() -> Self {
        Self {
            instances: BTreeMap::new(),
            order: DEFAULT_ORDER,
        }
    }
}

impl SimpleDiscoveryBackendBuilder {
    /// 追加一个实例，归入其 `service_id` 名下，保持追加顺序
    pub fn instance(mut self, instance: ServiceInstance) -> Self {
        self.instances
            .entry(instance.service_id().to_string())
            .or_default()
            .push(instance);
        self
    }

    /// 通过 URI 追加实例
    pub fn uri(self, service_id: &str, uri: &str) -> Result<Self> {
        let instance = ServiceInstance::from_uri(service_id, uri)?;
        Ok(self.instance(instance))
    }

    /// 设置排序值
    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn build(self) -> SimpleDiscoveryBackend {
        SimpleDiscoveryBackend {
            instances: self.instances,
            order: self.order,
        }
    }
}

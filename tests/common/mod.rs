//! 测试共用的后端与配置

#![allow(dead_code)]

use async_trait::async_trait;
use flare_discovery::{
    DiscoveryBackend, DiscoveryError, Result, ServiceInstance, SimpleDiscoveryBackend,
    SimpleDiscoveryConfig, SimpleInstanceConfig,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const CUSTOM_SERVICE_ID: &str = "custom";

/// 应用自定义后端：只提供 `custom` 一个服务
pub struct CustomDiscoveryBackend {
    order: i32,
    calls: AtomicUsize,
}

impl CustomDiscoveryBackend {
    pub fn new() -> Self {
        Self::with_order(0)
    }

    pub fn with_order(order: i32) -> Self {
        Self {
            order,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiscoveryBackend for CustomDiscoveryBackend {
    fn description(&self) -> &str {
        "Custom Discovery Client"
    }

    async fn get_services(&self) -> Result<Vec<String>> {
        Ok(vec![CUSTOM_SERVICE_ID.to_string()])
    }

    async fn get_instances(&self, service_id: &str) -> Result<Vec<ServiceInstance>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if service_id != CUSTOM_SERVICE_ID {
            return Ok(Vec::new());
        }
        Ok(vec![
            ServiceInstance::new(CUSTOM_SERVICE_ID, "custom-host", 8080, false)?
                .with_instance_id("custom-1"),
        ])
    }

    fn order(&self) -> i32 {
        self.order
    }
}

/// 总是失败的后端
pub struct FailingBackend {
    pub name: &'static str,
}

#[async_trait]
impl DiscoveryBackend for FailingBackend {
    fn description(&self) -> &str {
        self.name
    }

    async fn get_services(&self) -> Result<Vec<String>> {
        Err(DiscoveryError::backend(self.name, "registry unreachable"))
    }

    async fn get_instances(&self, _service_id: &str) -> Result<Vec<ServiceInstance>> {
        Err(anyhow::anyhow!("connection refused").into())
    }
}

/// 查询时直接 panic 的后端
pub struct PanickingBackend;

#[async_trait]
impl DiscoveryBackend for PanickingBackend {
    fn description(&self) -> &str {
        "Panicking Discovery Client"
    }

    async fn get_services(&self) -> Result<Vec<String>> {
        panic!("registry state corrupted");
    }

    async fn get_instances(&self, _service_id: &str) -> Result<Vec<ServiceInstance>> {
        panic!("registry state corrupted");
    }
}

/// 响应很慢的后端，用于超时测试
pub struct SlowBackend {
    pub delay: Duration,
}

#[async_trait]
impl DiscoveryBackend for SlowBackend {
    fn description(&self) -> &str {
        "Slow Discovery Client"
    }

    async fn get_services(&self) -> Result<Vec<String>> {
        tokio::time::sleep(self.delay).await;
        Ok(vec!["slow".to_string()])
    }

    async fn get_instances(&self, service_id: &str) -> Result<Vec<ServiceInstance>> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![ServiceInstance::new(service_id, "slow-host", 9000, false)?])
    }
}

/// service1 / service2 的静态配置
pub fn simple_config() -> SimpleDiscoveryConfig {
    let mut config = SimpleDiscoveryConfig::default();
    config.instances.insert(
        "service1".to_string(),
        vec![
            SimpleInstanceConfig::new("http://s1-1:8080"),
            SimpleInstanceConfig::new("https://s1-2:8443"),
        ],
    );
    config.instances.insert(
        "service2".to_string(),
        vec![
            SimpleInstanceConfig::new("https://s2-1:8080"),
            SimpleInstanceConfig::new("https://s2-2:443"),
        ],
    );
    config
}

pub fn simple_backend() -> Arc<dyn DiscoveryBackend> {
    Arc::new(SimpleDiscoveryBackend::new(&simple_config()).expect("valid simple config"))
}

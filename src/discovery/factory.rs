//! 服务发现工厂
//!
//! 从配置快速构建组合服务发现客户端

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::DiscoveryClientConfig;
use crate::discovery::backend::DiscoveryBackend;
use crate::discovery::backend::simple::SimpleDiscoveryBackend;
use crate::discovery::composite::CompositeDiscoveryClient;
use crate::error::Result;

/// 服务发现工厂
pub struct DiscoveryFactory;

impl DiscoveryFactory {
    /// 从配置创建组合服务发现客户端
    ///
    /// # 参数
    /// * `config` - 客户端配置，`[simple]` 段启用时会创建静态后端
    /// * `custom_backends` - 应用自定义的后端，按给定顺序追加在静态后端之后
    ///
    /// 最终顺序再按各后端的 `order()` 稳定排序。
    /// 静态配置里任意一个实例 URI 非法都会在这里直接返回错误。
    pub fn create_composite(
        config: &DiscoveryClientConfig,
        custom_backends: Vec<Arc<dyn DiscoveryBackend>>,
    ) -> Result<CompositeDiscoveryClient> {
        let mut builder = CompositeDiscoveryClient::builder().with_config(&config.composite);

        if config.simple.enabled {
            let simple = SimpleDiscoveryBackend::new(&config.simple)?;
            builder = builder.with_backend(Arc::new(simple));
        } else {
            debug!("Simple discovery backend disabled");
        }

        let client = builder.with_backends(custom_backends).build();

        info!(
            application = config.application_name().unwrap_or("unknown"),
            backends = client.len(),
            "Discovery client ready"
        );

        Ok(client)
    }

    /// 从 TOML 配置文件创建组合服务发现客户端
    pub fn from_file(
        path: &str,
        custom_backends: Vec<Arc<dyn DiscoveryBackend>>,
    ) -> Result<CompositeDiscoveryClient> {
        let config = DiscoveryClientConfig::load_from_file(path)?;
        Self::create_composite(&config, custom_backends)
    }
}

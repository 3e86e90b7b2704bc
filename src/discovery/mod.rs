//! 组合服务发现模块
//!
//! 提供统一的服务发现抽象，把多个后端（静态配置、应用自定义后端）
//! 聚合到同一个查询接口之后。

pub mod backend;
pub mod composite;
pub mod config;
pub mod factory;
pub mod instance;

pub use backend::simple::{SimpleDiscoveryBackend, SimpleDiscoveryBackendBuilder};
pub use backend::{DEFAULT_ORDER, DiscoveryBackend};
pub use composite::{CompositeDiscoveryClient, CompositeDiscoveryClientBuilder};
pub use config::{CompositeConfig, FailurePolicy, SimpleDiscoveryConfig, SimpleInstanceConfig};
pub use factory::DiscoveryFactory;
pub use instance::ServiceInstance;

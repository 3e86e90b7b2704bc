//! Flare Discovery
//!
//! Composite service discovery client: aggregates several discovery backends
//! (static configuration, application-defined registries) behind one query interface.

pub mod config;
pub mod discovery;
pub mod error;
pub mod health;
pub mod logging;

// Re-exports
pub use config::{ApplicationConfig, DiscoveryClientConfig};
pub use error::{DiscoveryError, ErrorCategory, ErrorCode, Result};
pub use health::{BackendHealth, DiscoveryHealthReport, HealthStatus};
pub use logging::init_tracing;

pub use discovery::{
    CompositeConfig, CompositeDiscoveryClient, CompositeDiscoveryClientBuilder, DiscoveryBackend,
    DiscoveryFactory, FailurePolicy, ServiceInstance, SimpleDiscoveryBackend,
    SimpleDiscoveryBackendBuilder, SimpleDiscoveryConfig, SimpleInstanceConfig,
};

use serde::{Deserialize, Serialize};

use crate::discovery::config::{CompositeConfig, SimpleDiscoveryConfig};
use crate::error::Result;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DiscoveryClientConfig {
    #[serde(default)]
    pub application: Option<ApplicationConfig>,
    #[serde(default)]
    pub simple: SimpleDiscoveryConfig,
    #[serde(default)]
    pub composite: CompositeConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApplicationConfig {
    pub name: String,
}

impl DiscoveryClientConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DiscoveryClientConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// 当前应用名（未配置时为 None）
    pub fn application_name(&self) -> Option<&str> {
        self.application.as_ref().map(|app| app.name.as_str())
    }
}

//! 服务实例定义

use std::collections::HashMap;
use std::fmt;

use http::Uri;
use http::uri::Scheme;

use crate::error::{DiscoveryError, Result};

/// 服务实例
///
/// 由后端创建，构造完成后不可变；组合客户端只聚合，不修改。
/// `uri` 的 scheme 为 `https` 当且仅当 `secure` 为 true，`host`/`port` 与 `uri` 的 authority 一致。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInstance {
    service_id: String,
    instance_id: String,
    host: String,
    port: u16,
    secure: bool,
    uri: Uri,
    metadata: HashMap<String, String>,
}

impl ServiceInstance {
    /// 通过主机、端口和是否加密创建服务实例
    ///
    /// IPv6 字面量可以不带方括号（`::1`），存储时统一为 `[::1]`，与 `from_uri` 一致。
    pub fn new(
        service_id: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        secure: bool,
    ) -> Result<Self> {
        let host = bracket_ipv6(host.into());
        let scheme = if secure { Scheme::HTTPS } else { Scheme::HTTP };
        let raw = format!("{}://{}:{}", scheme, host, port);

        if host.is_empty() {
            return Err(DiscoveryError::invalid_uri(raw, "host is empty"));
        }
        if port == 0 {
            return Err(DiscoveryError::invalid_uri(raw, "port must be in 1..=65535"));
        }

        let uri = Uri::builder()
            .scheme(scheme)
            .authority(format!("{}:{}", host, port))
            .path_and_query("/")
            .build()
            .map_err(|e| DiscoveryError::invalid_uri(&raw, e.to_string()))?;

        Ok(Self {
            service_id: service_id.into(),
            instance_id: format!("{}:{}", host, port),
            host,
            port,
            secure,
            uri,
            metadata: HashMap::new(),
        })
    }

    /// 从绝对 URI 创建服务实例
    ///
    /// 只接受 `http`/`https`；未写端口时按 scheme 取 80/443。
    pub fn from_uri(service_id: impl Into<String>, uri: &str) -> Result<Self> {
        let parsed: Uri = uri
            .parse()
            .map_err(|e: http::uri::InvalidUri| DiscoveryError::invalid_uri(uri, e.to_string()))?;

        let secure = match parsed.scheme_str() {
            Some("https") => true,
            Some("http") => false,
            Some(other) => {
                return Err(DiscoveryError::invalid_uri(
                    uri,
                    format!("unsupported scheme `{}`", other),
                ));
            }
            None => return Err(DiscoveryError::invalid_uri(uri, "uri is not absolute")),
        };

        let host = match parsed.host() {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => return Err(DiscoveryError::invalid_uri(uri, "host is missing")),
        };

        // `Uri::port_u16` 对越界或空端口同样返回 None，这里直接检查 authority 原文
        let authority = parsed.authority().map(|a| a.as_str()).unwrap_or_default();
        let port = match raw_port(authority) {
            Some(text) => match text.parse::<u16>() {
                Ok(port) if port != 0 => port,
                _ => {
                    return Err(DiscoveryError::invalid_uri(
                        uri,
                        format!("invalid port `{}`, must be in 1..=65535", text),
                    ));
                }
            },
            None if secure => 443,
            None => 80,
        };

        Ok(Self {
            service_id: service_id.into(),
            instance_id: format!("{}:{}", host, port),
            host,
            port,
            secure,
            uri: parsed,
            metadata: HashMap::new(),
        })
    }

    /// 设置实例 ID
    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = instance_id.into();
        self
    }

    /// 添加元数据
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// 批量添加元数据
    pub fn with_metadata_map(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata.extend(metadata);
        self
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// scheme：`https` 或 `http`
    pub fn scheme(&self) -> &'static str {
        if self.secure { "https" } else { "http" }
    }

    /// 转换为 `scheme://host:port` 形式的 URL（不带路径）
    pub fn to_url(&self) -> String {
        format!("{}://{}:{}", self.scheme(), self.host, self.port)
    }
}

/// authority 中 `:` 之后的端口原文；没有写端口时返回 None
fn raw_port(authority: &str) -> Option<&str> {
    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    let after_host = match host_port.strip_prefix('[') {
        Some(rest) => rest.split_once(']').map(|(_, tail)| tail).unwrap_or_default(),
        None => host_port.find(':').map(|i| &host_port[i..]).unwrap_or_default(),
    };
    after_host.strip_prefix(':')
}

fn bracket_ipv6(host: String) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{}]", host)
    } else {
        host
    }
}

impl fmt::Display for ServiceInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]@{}", self.service_id, self.instance_id, self.to_url())
    }
}

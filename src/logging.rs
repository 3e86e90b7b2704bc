//! 日志初始化

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// 初始化 tracing 订阅器
///
/// 优先使用 `RUST_LOG`，未设置时使用 `default_directive`（如 `"flare_discovery=info"`）。
/// 重复调用是安全的，已经存在全局订阅器时返回 false。
pub fn init_tracing(default_directive: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init()
        .is_ok()
}

//! 组合服务发现客户端
//!
//! 把多个服务发现后端聚合到同一个查询接口之后：
//! - 按构造时确定的顺序依次委派，结果按后端顺序拼接
//! - 服务 ID 去重合并
//! - 后端失败按 [`FailurePolicy`] 处理，默认尽力聚合

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::discovery::backend::DiscoveryBackend;
use crate::discovery::config::{CompositeConfig, FailurePolicy};
use crate::discovery::instance::ServiceInstance;
use crate::error::{DiscoveryError, Result};
use crate::health::{BackendHealth, DiscoveryHealthReport};

/// 组合服务发现客户端
///
/// 后端列表在构造后不再变化，因此可以被多个调用方并发使用而无需加锁。
/// 每次查询都会完整地重新委派一遍，不做跨调用缓存。
pub struct CompositeDiscoveryClient {
    backends: Vec<Arc<dyn DiscoveryBackend>>,
    failure_policy: FailurePolicy,
    concurrent: bool,
    backend_timeout: Option<Duration>,
}

impl CompositeDiscoveryClient {
    pub const DESCRIPTION: &'static str = "Composite Discovery Client";

    /// 使用默认策略（尽力聚合、顺序委派、无超时）创建组合客户端
    pub fn new(backends: Vec<Arc<dyn DiscoveryBackend>>) -> Self {
        Self::builder().with_backends(backends).build()
    }

    pub fn builder() -> CompositeDiscoveryClientBuilder {
        CompositeDiscoveryClientBuilder::new()
    }

    /// 按查询顺序排列的后端
    pub fn backends(&self) -> &[Arc<dyn DiscoveryBackend>] {
        &self.backends
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub fn is_concurrent(&self) -> bool {
        self.concurrent
    }

    pub fn backend_timeout(&self) -> Option<Duration> {
        self.backend_timeout
    }

    /// 对所有后端做一次探活并生成健康报告
    ///
    /// 与失败策略无关，每个后端都会被探活。
    pub async fn health(&self) -> DiscoveryHealthReport {
        let outcomes = self.delegate(false, |b| b.probe()).await;
        let backends = outcomes
            .into_iter()
            .map(|(description, outcome)| match outcome {
                Ok(()) => BackendHealth::serving(description),
                Err(e) => BackendHealth::not_serving(description, e.to_string()),
            })
            .collect();
        DiscoveryHealthReport::new(backends)
    }

    /// 调用单个后端：加上超时，捕获 panic，并把错误归到该后端名下
    ///
    /// 后端 panic 与返回 `Err` 同等对待，由失败策略决定是否跳过。
    async fn guarded<'a, T, F>(&self, backend: &'a dyn DiscoveryBackend, call: &F) -> Result<T>
    where
        F: Fn(&'a dyn DiscoveryBackend) -> BoxFuture<'a, Result<T>>,
    {
        let isolated = AssertUnwindSafe(async { call(backend).await })
            .catch_unwind()
            .map(|caught| {
                caught.unwrap_or_else(|panic| {
                    Err(DiscoveryError::backend(
                        backend.description(),
                        format!("backend panicked: {}", panic_message(&*panic)),
                    ))
                })
            });

        let outcome = match self.backend_timeout {
            Some(limit) => match tokio::time::timeout(limit, isolated).await {
                Ok(outcome) => outcome,
                Err(_) => Err(DiscoveryError::timeout(
                    backend.description(),
                    limit.as_millis() as u64,
                )),
            },
            None => isolated.await,
        };
        outcome.map_err(|e| e.attribute_to(backend.description()))
    }

    /// 把一次调用委派给全部后端，返回值与后端顺序一一对应
    ///
    /// 顺序模式下 `stop_on_error` 为 true 时，遇到第一个错误即停止，后续后端不再被调用。
    async fn delegate<'a, T, F>(&'a self, stop_on_error: bool, call: F) -> Vec<(&'a str, Result<T>)>
    where
        F: Fn(&'a dyn DiscoveryBackend) -> BoxFuture<'a, Result<T>>,
    {
        if self.concurrent {
            let pending = self
                .backends
                .iter()
                .map(|b| self.guarded(b.as_ref(), &call));
            let outcomes = join_all(pending).await;
            return self
                .backends
                .iter()
                .map(|b| b.description())
                .zip(outcomes)
                .collect();
        }

        let mut outcomes = Vec::with_capacity(self.backends.len());
        for backend in &self.backends {
            let outcome = self.guarded(backend.as_ref(), &call).await;
            let failed = outcome.is_err();
            outcomes.push((backend.description(), outcome));
            if failed && stop_on_error {
                break;
            }
        }
        outcomes
    }

    /// 按失败策略收敛各后端的结果
    fn settle<T>(&self, operation: &str, outcomes: Vec<(&str, Result<T>)>) -> Result<Vec<T>> {
        let mut values = Vec::with_capacity(outcomes.len());
        for (backend, outcome) in outcomes {
            match outcome {
                Ok(value) => values.push(value),
                Err(e) => match self.failure_policy {
                    FailurePolicy::FailFast => return Err(e),
                    FailurePolicy::BestEffort => {
                        warn!(
                            backend = %backend,
                            operation = %operation,
                            error = %e,
                            "⚠️ Discovery backend failed, skipping"
                        );
                    }
                },
            }
        }
        Ok(values)
    }

    fn fail_fast(&self) -> bool {
        self.failure_policy == FailurePolicy::FailFast
    }
}

#[async_trait]
impl DiscoveryBackend for CompositeDiscoveryClient {
    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    async fn get_services(&self) -> Result<Vec<String>> {
        let outcomes = self.delegate(self.fail_fast(), |b| b.get_services()).await;
        let per_backend = self.settle("get_services", outcomes)?;

        let mut seen = HashSet::new();
        let services: Vec<String> = per_backend
            .into_iter()
            .flatten()
            .filter(|id| seen.insert(id.clone()))
            .collect();

        debug!(services = services.len(), "Aggregated service ids");
        Ok(services)
    }

    async fn get_instances(&self, service_id: &str) -> Result<Vec<ServiceInstance>> {
        let outcomes = self
            .delegate(self.fail_fast(), |b| b.get_instances(service_id))
            .await;
        let per_backend = self.settle("get_instances", outcomes)?;

        let instances: Vec<ServiceInstance> = per_backend.into_iter().flatten().collect();
        debug!(
            service_id = %service_id,
            instances = instances.len(),
            "Aggregated service instances"
        );
        Ok(instances)
    }

    /// 快速失败模式下任一后端失败即失败；
    /// 尽力模式下只要没有后端或至少一个后端正常即视为成功
    async fn probe(&self) -> Result<()> {
        let outcomes = self.delegate(self.fail_fast(), |b| b.probe()).await;
        let total = outcomes.len();
        let healthy = self.settle("probe", outcomes)?.len();

        if total > 0 && healthy == 0 {
            return Err(DiscoveryError::backend(
                Self::DESCRIPTION,
                format!("all {} discovery backends failed probe", total),
            ));
        }
        Ok(())
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// 组合客户端构建器
pub struct CompositeDiscoveryClientBuilder {
    backends: Vec<Arc<dyn DiscoveryBackend>>,
    failure_policy: FailurePolicy,
    concurrent: bool,
    backend_timeout: Option<Duration>,
}

impl CompositeDiscoveryClientBuilder {
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
            failure_policy: FailurePolicy::default(),
            concurrent: false,
            backend_timeout: None,
        }
    }

    /// 追加一个后端
    pub fn with_backend(mut self, backend: Arc<dyn DiscoveryBackend>) -> Self {
        self.backends.push(backend);
        self
    }

    /// 追加多个后端，保持给定顺序
    pub fn with_backends(mut self, backends: impl IntoIterator<Item = Arc<dyn DiscoveryBackend>>) -> Self {
        self.backends.extend(backends);
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// 是否并发查询各后端（结果顺序与顺序模式一致）
    pub fn concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    /// 单个后端的查询超时
    pub fn backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = Some(timeout);
        self
    }

    /// 应用 `[composite]` 配置段
    pub fn with_config(mut self, config: &CompositeConfig) -> Self {
        self.failure_policy = config.failure_policy;
        self.concurrent = config.concurrent;
        self.backend_timeout = config.backend_timeout();
        self
    }

    /// 按 `order()` 稳定排序后构建，排序值相同的后端保持追加顺序
    pub fn build(mut self) -> CompositeDiscoveryClient {
        self.backends.sort_by_key(|b| b.order());

        let descriptions: Vec<&str> = self.backends.iter().map(|b| b.description()).collect();
        info!(
            backends = ?descriptions,
            failure_policy = ?self.failure_policy,
            concurrent = self.concurrent,
            "✅ Composite discovery client created"
        );

        CompositeDiscoveryClient {
            backends: self.backends,
            failure_policy: self.failure_policy,
            concurrent: self.concurrent,
            backend_timeout: self.backend_timeout,
        }
    }
}

impl Default for CompositeDiscoveryClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

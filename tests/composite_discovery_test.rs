//! 组合服务发现客户端行为测试
//!
//! 静态后端配置 service1 / service2，自定义后端提供 custom。

mod common;

use common::{CUSTOM_SERVICE_ID, CustomDiscoveryBackend, simple_backend};
use flare_discovery::{
    CompositeDiscoveryClient, DiscoveryBackend, SimpleDiscoveryBackend,
};
use http::Uri;
use std::sync::Arc;

fn discovery_client() -> CompositeDiscoveryClient {
    CompositeDiscoveryClient::new(vec![simple_backend(), Arc::new(CustomDiscoveryBackend::new())])
}

#[tokio::test]
async fn get_instances_by_service_id_delegates_call() {
    let client = discovery_client();

    let instances = client.get_instances("service1").await.unwrap();
    assert_eq!(instances.len(), 2);

    let s1 = &instances[0];
    assert_eq!(s1.host(), "s1-1");
    assert_eq!(s1.port(), 8080);
    assert_eq!(s1.uri(), &"http://s1-1:8080".parse::<Uri>().unwrap());
    assert!(!s1.is_secure());

    let s2 = &instances[1];
    assert_eq!(s2.host(), "s1-2");
    assert_eq!(s2.port(), 8443);
    assert!(s2.is_secure());
}

#[tokio::test]
async fn get_services_aggregates_all_service_names_once() {
    let client = discovery_client();

    let services = client.get_services().await.unwrap();
    for expected in ["service1", "service2", CUSTOM_SERVICE_ID] {
        assert_eq!(
            services.iter().filter(|s| s.as_str() == expected).count(),
            1,
            "{} should appear exactly once in {:?}",
            expected,
            services
        );
    }
    assert_eq!(services.len(), 3);
}

#[tokio::test]
async fn get_services_deduplicates_across_backends() {
    let client = CompositeDiscoveryClient::new(vec![
        simple_backend(),
        Arc::new(CustomDiscoveryBackend::new()),
        simple_backend(),
        Arc::new(CustomDiscoveryBackend::new()),
    ]);

    let mut services = client.get_services().await.unwrap();
    services.sort();
    assert_eq!(services, vec!["custom", "service1", "service2"]);
}

#[tokio::test]
async fn description_is_composite() {
    let client = discovery_client();
    assert_eq!(client.description(), "Composite Discovery Client");

    let empty = CompositeDiscoveryClient::new(vec![]);
    assert_eq!(empty.description(), "Composite Discovery Client");
    assert!(empty.is_empty());
}

#[tokio::test]
async fn repeated_queries_are_stable() {
    let custom = Arc::new(CustomDiscoveryBackend::new());
    let client = CompositeDiscoveryClient::new(vec![simple_backend(), custom.clone()]);

    let first = client.get_instances(CUSTOM_SERVICE_ID).await.unwrap();
    let second = client.get_instances(CUSTOM_SERVICE_ID).await.unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
    // 每次查询都重新委派，没有缓存
    assert_eq!(custom.calls(), 2);
}

#[tokio::test]
async fn unknown_service_id_returns_empty_list() {
    let client = discovery_client();

    assert!(client.get_instances("unknown").await.unwrap().is_empty());
    assert!(client.get_instances("").await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_composite_returns_nothing() {
    let client = CompositeDiscoveryClient::new(vec![]);

    assert!(client.get_services().await.unwrap().is_empty());
    assert!(client.get_instances("service1").await.unwrap().is_empty());
    assert!(client.probe().await.is_ok());
}

#[tokio::test]
async fn instances_follow_backend_order_then_backend_internal_order() {
    let first = SimpleDiscoveryBackend::builder()
        .uri("shared", "http://a-1:8080")
        .unwrap()
        .uri("shared", "http://a-2:8080")
        .unwrap()
        .build();
    let second = SimpleDiscoveryBackend::builder()
        .uri("shared", "https://b-1:8443")
        .unwrap()
        .build();

    let backends: Vec<Arc<dyn DiscoveryBackend>> = vec![Arc::new(first), Arc::new(second)];
    let client = CompositeDiscoveryClient::new(backends);

    let hosts: Vec<String> = client
        .get_instances("shared")
        .await
        .unwrap()
        .iter()
        .map(|i| i.host().to_string())
        .collect();
    assert_eq!(hosts, vec!["a-1", "a-2", "b-1"]);
}

#[tokio::test]
async fn service_served_by_one_backend_returns_only_its_instances() {
    let client = discovery_client();

    let instances = client.get_instances(CUSTOM_SERVICE_ID).await.unwrap();
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].instance_id(), "custom-1");
    assert_eq!(instances[0].host(), "custom-host");

    let service2: Vec<String> = client
        .get_instances("service2")
        .await
        .unwrap()
        .iter()
        .map(|i| i.to_url())
        .collect();
    assert_eq!(service2, vec!["https://s2-1:8080", "https://s2-2:443"]);
}

#[tokio::test]
async fn backends_are_sorted_by_order_stably() {
    let low: Arc<dyn DiscoveryBackend> = Arc::new(CustomDiscoveryBackend::with_order(-10));
    let simple: Arc<dyn DiscoveryBackend> = Arc::new(
        SimpleDiscoveryBackend::builder()
            .uri(CUSTOM_SERVICE_ID, "http://simple-custom:80")
            .unwrap()
            .build(),
    );
    let high: Arc<dyn DiscoveryBackend> = Arc::new(CustomDiscoveryBackend::with_order(10));

    let client = CompositeDiscoveryClient::new(vec![high, simple, low]);

    let orders: Vec<i32> = client.backends().iter().map(|b| b.order()).collect();
    assert_eq!(orders, vec![-10, 0, 10]);

    let hosts: Vec<String> = client
        .get_instances(CUSTOM_SERVICE_ID)
        .await
        .unwrap()
        .iter()
        .map(|i| i.host().to_string())
        .collect();
    assert_eq!(hosts, vec!["custom-host", "simple-custom", "custom-host"]);
}

#[tokio::test]
async fn composites_nest() {
    let inner: Arc<dyn DiscoveryBackend> = Arc::new(discovery_client());
    let outer = CompositeDiscoveryClient::new(vec![inner, Arc::new(CustomDiscoveryBackend::new())]);

    assert_eq!(outer.get_instances(CUSTOM_SERVICE_ID).await.unwrap().len(), 2);
    assert_eq!(outer.get_services().await.unwrap().len(), 3);
}

#[test]
fn client_is_usable_from_sync_code() {
    let client = discovery_client();
    let instances = tokio_test::block_on(client.get_instances("service1")).unwrap();
    assert_eq!(instances.len(), 2);
}

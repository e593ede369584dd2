//! Lifecycle tests for the hold expiry sweeper over a mock store actor.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tminus_core::SchedulingService;
use tminus_domain::SchedulerConfig;
use tminus_infra::queue::{HttpWriteQueue, HttpWriteQueueConfig};
use tminus_infra::store::{HttpSchedulingStore, HttpSchedulingStoreConfig};
use tminus_infra::sweep::{HoldSweeper, HoldSweeperConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("tminus_infra=debug")
        .with_test_writer()
        .try_init();
}

async fn service_backed_by(server: &MockServer) -> Arc<SchedulingService> {
    let mut store_config = HttpSchedulingStoreConfig::new(server.uri());
    store_config.max_retries = 1;
    let store = HttpSchedulingStore::new(store_config).unwrap();

    let mut queue_config = HttpWriteQueueConfig::new(format!("{}/queue/batch", server.uri()));
    queue_config.max_retries = 1;
    let queue = HttpWriteQueue::new(queue_config).unwrap();

    Arc::new(SchedulingService::new(Arc::new(store), Arc::new(queue), SchedulerConfig::default()))
}

#[tokio::test(flavor = "multi_thread")]
async fn sweeper_polls_for_expired_holds() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scheduling/get_expired_holds"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "holds": [] })))
        .mount(&server)
        .await;

    let service = service_backed_by(&server).await;
    let config = HoldSweeperConfig {
        cron_expression: "* * * * * *".into(), // every second
        ..Default::default()
    };
    let mut sweeper = HoldSweeper::with_config(config, service);

    sweeper.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    sweeper.stop().await.unwrap();
    assert!(!sweeper.is_running());

    let requests = server.received_requests().await.unwrap();
    assert!(!requests.is_empty(), "sweeper never polled the store");
}

#[tokio::test(flavor = "multi_thread")]
async fn double_start_is_rejected() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scheduling/get_expired_holds"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "holds": [] })))
        .mount(&server)
        .await;

    let service = service_backed_by(&server).await;
    let mut sweeper = HoldSweeper::new(service);

    sweeper.start().await.unwrap();
    let err = sweeper.start().await.unwrap_err();
    assert!(err.to_string().contains("already running"));
    sweeper.stop().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_without_start_is_rejected() {
    init_tracing();
    let server = MockServer::start().await;
    let service = service_backed_by(&server).await;
    let mut sweeper = HoldSweeper::new(service);

    assert!(sweeper.stop().await.is_err());
}

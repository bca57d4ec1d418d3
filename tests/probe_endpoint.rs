//! End-to-end probe tests against the HTTP server.

use std::time::Duration;

use galera_health::health::{FailureKind, QueryFailure, StatusVariable};
use galera_health::HealthConfig;

mod common;

use common::{client, start_server, ScriptedSource};

async fn get(server: &common::TestServer, path: &str) -> (u16, String) {
    let res = client()
        .get(server.url(path))
        .send()
        .await
        .expect("probe server unreachable");
    let status = res.status().as_u16();
    (status, res.text().await.unwrap())
}

#[tokio::test]
async fn synced_node_returns_ok() {
    let server = start_server(HealthConfig::default(), ScriptedSource::synced()).await;

    assert_eq!(get(&server, "/").await, (200, "synced".to_string()));

    server.shutdown.trigger();
}

#[tokio::test]
async fn any_method_and_path_is_a_probe() {
    let server = start_server(HealthConfig::default(), ScriptedSource::synced()).await;

    let res = client().post(server.url("/status")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers()["content-type"].to_str().unwrap(),
        "text/plain; charset=utf-8"
    );
    assert_eq!(res.text().await.unwrap(), "synced");

    let res = client().head(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    server.shutdown.trigger();
}

#[tokio::test]
async fn standalone_server_is_healthy() {
    let source = ScriptedSource::default();
    source.set(StatusVariable::WsrepOn, Ok(Some("OFF".into())));
    let server = start_server(HealthConfig::default(), source).await;

    assert_eq!(get(&server, "/").await, (200, "not a cluster node".to_string()));

    server.shutdown.trigger();
}

#[tokio::test]
async fn unhealthy_states_return_service_unavailable() {
    let cases = [
        (ScriptedSource::with_status("ON", "off", "ON", "4"), "not ready"),
        (ScriptedSource::with_status("ON", "ON", "OFF", "4"), "not connected"),
        (ScriptedSource::with_status("ON", "ON", "ON", "1"), "joining"),
        (ScriptedSource::with_status("ON", "ON", "ON", "3"), "joined"),
        (ScriptedSource::with_status("ON", "ON", "ON", "99"), "unrecognized state: 99"),
    ];

    for (source, reason) in cases {
        let server = start_server(HealthConfig::default(), source).await;
        assert_eq!(get(&server, "/").await, (503, reason.to_string()));
        server.shutdown.trigger();
    }
}

#[tokio::test]
async fn donor_follows_configured_policy() {
    let donor = || ScriptedSource::with_status("ON", "ON", "ON", "2");

    let server = start_server(HealthConfig::default(), donor()).await;
    assert_eq!(get(&server, "/").await, (200, "donor".to_string()));
    server.shutdown.trigger();

    let mut config = HealthConfig::default();
    config.available_when_donor = false;
    let server = start_server(config, donor()).await;
    assert_eq!(get(&server, "/").await, (503, "donor".to_string()));
    server.shutdown.trigger();
}

#[tokio::test]
async fn missing_variables_are_named() {
    let source = ScriptedSource::synced();
    source.remove(StatusVariable::WsrepOn);
    let server = start_server(HealthConfig::default(), source.clone()).await;

    assert_eq!(get(&server, "/").await, (503, "wsrep_on not set".to_string()));

    source.set(StatusVariable::WsrepOn, Ok(Some("ON".into())));
    source.remove(StatusVariable::WsrepConnected);
    assert_eq!(get(&server, "/").await, (503, "wsrep_connected not set".to_string()));

    server.shutdown.trigger();
}

#[tokio::test]
async fn refused_connection_is_canonicalised() {
    let source = ScriptedSource::synced();
    source.fail_acquire(Some(QueryFailure::from_message(
        "error communicating with database: Connection refused (os error 111)",
    )));
    let server = start_server(HealthConfig::default(), source.clone()).await;

    assert_eq!(get(&server, "/").await, (503, "connection refused".to_string()));
    assert_eq!(source.query_count(), 0);

    source.fail_acquire(None);
    source.set(
        StatusVariable::WsrepReady,
        Err(QueryFailure::new(FailureKind::ConnectionRefused, "dial tcp: connection refused")),
    );
    assert_eq!(get(&server, "/").await, (503, "connection refused".to_string()));

    server.shutdown.trigger();
}

#[tokio::test]
async fn recovers_between_probes() {
    let source = ScriptedSource::with_status("ON", "ON", "ON", "1");
    let server = start_server(HealthConfig::default(), source.clone()).await;

    assert_eq!(get(&server, "/").await.0, 503);

    source.set(StatusVariable::WsrepLocalState, Ok(Some("4".into())));
    assert_eq!(get(&server, "/").await, (200, "synced".to_string()));

    server.shutdown.trigger();
}

#[tokio::test]
async fn slow_probe_times_out_as_unhealthy() {
    let source = ScriptedSource::synced();
    source.delay_queries(Duration::from_millis(600));

    let mut config = HealthConfig::default();
    config.timeouts.request_secs = 1;
    let server = start_server(config, source).await;

    assert_eq!(get(&server, "/").await, (503, "probe timed out".to_string()));

    server.shutdown.trigger();
}

#[tokio::test]
async fn concurrent_probes_are_independent() {
    let source = ScriptedSource::synced();
    source.delay_queries(Duration::from_millis(10));
    let server = start_server(HealthConfig::default(), source.clone()).await;

    let client = client();
    let mut handles = Vec::new();
    for _ in 0..20 {
        let client = client.clone();
        let url = server.url("/");
        handles.push(tokio::spawn(async move {
            let res = client.get(url).send().await.unwrap();
            (res.status().as_u16(), res.text().await.unwrap())
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), (200, "synced".to_string()));
    }
    assert_eq!(source.query_count(), 80);

    server.shutdown.trigger();
}

//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use galera_health::health::{QueryFailure, StatusReader, StatusSource, StatusVariable};
use galera_health::{HealthConfig, ProbeServer, Shutdown};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

type Answer = Result<Option<String>, QueryFailure>;

#[derive(Default)]
struct Script {
    answers: HashMap<StatusVariable, Answer>,
    acquire_error: Option<QueryFailure>,
    delay: Duration,
}

/// A status source whose answers can be changed while the server runs.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    script: Arc<Mutex<Script>>,
    queries: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl ScriptedSource {
    /// A source reporting the given wsrep values.
    pub fn with_status(on: &str, ready: &str, connected: &str, state: &str) -> Self {
        let source = Self::default();
        source.set(StatusVariable::WsrepOn, Ok(Some(on.into())));
        source.set(StatusVariable::WsrepReady, Ok(Some(ready.into())));
        source.set(StatusVariable::WsrepConnected, Ok(Some(connected.into())));
        source.set(StatusVariable::WsrepLocalState, Ok(Some(state.into())));
        source
    }

    pub fn synced() -> Self {
        Self::with_status("ON", "ON", "ON", "4")
    }

    pub fn set(&self, variable: StatusVariable, answer: Answer) {
        self.script.lock().unwrap().answers.insert(variable, answer);
    }

    pub fn remove(&self, variable: StatusVariable) {
        self.script.lock().unwrap().answers.remove(&variable);
    }

    pub fn fail_acquire(&self, failure: Option<QueryFailure>) {
        self.script.lock().unwrap().acquire_error = failure;
    }

    pub fn delay_queries(&self, delay: Duration) {
        self.script.lock().unwrap().delay = delay;
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

pub struct ScriptedSession {
    source: ScriptedSource,
}

impl StatusSource for ScriptedSource {
    type Session = ScriptedSession;

    async fn acquire(&self) -> Result<ScriptedSession, QueryFailure> {
        let error = self.script.lock().unwrap().acquire_error.clone();
        match error {
            Some(failure) => Err(failure),
            None => Ok(ScriptedSession {
                source: self.clone(),
            }),
        }
    }
}

impl StatusReader for ScriptedSession {
    async fn read(&mut self, variable: StatusVariable) -> Result<Option<String>, QueryFailure> {
        self.source.queries.fetch_add(1, Ordering::SeqCst);
        let (answer, delay) = {
            let script = self.source.script.lock().unwrap();
            (
                script.answers.get(&variable).cloned().unwrap_or(Ok(None)),
                script.delay,
            )
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        answer
    }
}

/// A probe server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub task: JoinHandle<Result<(), std::io::Error>>,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn start_server(config: HealthConfig, source: ScriptedSource) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = ProbeServer::new(&config, source);
    let task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestServer { addr, shutdown, task }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

//! Status reading against the database engine.
//!
//! # Responsibilities
//! - Acquire a pooled connection per probe ([`StatusSource`])
//! - Issue one read-only query per status variable ([`StatusReader`])
//! - Distinguish "variable does not exist" from query failures
//!
//! # Design Decisions
//! - No retries: a failure surfaces immediately to the evaluator
//! - Every query is bounded by the configured query timeout
//! - The pool is shared by all in-flight checks and is the only place
//!   connections are opened, so `max_connections` bounds the sockets held

use std::future::Future;
use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::{Connection, MySql};

use crate::config::DbConfig;
use crate::health::failure::QueryFailure;
use crate::health::status::{StatusSnapshot, StatusValue, StatusVariable};

/// Something that can hand out a connection for one probe.
pub trait StatusSource: Send + Sync + 'static {
    type Session: StatusReader + Send;

    /// Obtain and validate a connection.
    fn acquire(&self) -> impl Future<Output = Result<Self::Session, QueryFailure>> + Send;
}

/// Reads individual status variables over an acquired connection.
pub trait StatusReader {
    /// `Ok(None)` when the engine does not define the variable.
    fn read(
        &mut self,
        variable: StatusVariable,
    ) -> impl Future<Output = Result<Option<String>, QueryFailure>> + Send;
}

/// Read all four variables, in order, into a fresh snapshot.
pub async fn read_snapshot<R: StatusReader + Send>(reader: &mut R) -> StatusSnapshot {
    let wsrep_on = read_value(reader, StatusVariable::WsrepOn).await;
    let ready = read_value(reader, StatusVariable::WsrepReady).await;
    let connected = read_value(reader, StatusVariable::WsrepConnected).await;
    let local_state = match read_value(reader, StatusVariable::WsrepLocalState).await {
        StatusValue::Present(raw) => match raw.trim().parse::<i64>() {
            Ok(code) => StatusValue::Present(code),
            Err(_) => StatusValue::Failed(QueryFailure::invalid_value(
                StatusVariable::WsrepLocalState.name(),
                &raw,
            )),
        },
        StatusValue::Absent => StatusValue::Absent,
        StatusValue::Failed(failure) => StatusValue::Failed(failure),
    };

    StatusSnapshot {
        wsrep_on,
        ready,
        connected,
        local_state,
    }
}

async fn read_value<R: StatusReader + Send>(
    reader: &mut R,
    variable: StatusVariable,
) -> StatusValue<String> {
    match reader.read(variable).await {
        Ok(Some(value)) => StatusValue::Present(value),
        Ok(None) => {
            tracing::warn!(variable = %variable, "Status variable not set");
            StatusValue::Absent
        }
        Err(failure) => {
            tracing::error!(
                variable = %variable,
                kind = failure.kind.as_str(),
                error = %failure,
                "Status query failed"
            );
            StatusValue::Failed(failure)
        }
    }
}

/// Pooled MySQL/MariaDB connections for status queries.
#[derive(Debug, Clone)]
pub struct MySqlSource {
    pool: MySqlPool,
    query_timeout: Duration,
}

impl MySqlSource {
    /// Build the pool without connecting; connections are opened on demand.
    pub fn connect_lazy(config: &DbConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .password(&config.password);

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(0)
            .max_lifetime(Some(config.max_lifetime()))
            .idle_timeout(Some(config.idle_timeout()))
            .acquire_timeout(config.acquire_timeout())
            .test_before_acquire(true)
            .connect_lazy_with(options);

        Self {
            pool,
            query_timeout: config.query_timeout(),
        }
    }

    /// Check that the database is reachable.
    pub async fn ping(&self) -> Result<(), QueryFailure> {
        let mut conn = self.acquire_connection().await?;
        conn.ping().await?;
        Ok(())
    }

    /// A refused connect is retried by the pool until the acquire deadline,
    /// so an unreachable server surfaces as a pool timeout.
    async fn acquire_connection(&self) -> Result<PoolConnection<MySql>, QueryFailure> {
        Ok(self.pool.acquire().await?)
    }

    /// Close every pooled connection. Pending acquires fail afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn pool_size(&self) -> u32 {
        self.pool.size()
    }
}

impl StatusSource for MySqlSource {
    type Session = MySqlSession;

    async fn acquire(&self) -> Result<MySqlSession, QueryFailure> {
        let conn = self.acquire_connection().await?;
        Ok(MySqlSession {
            conn,
            query_timeout: self.query_timeout,
        })
    }
}

/// One pooled connection, returned to the pool on drop.
pub struct MySqlSession {
    conn: PoolConnection<MySql>,
    query_timeout: Duration,
}

impl StatusReader for MySqlSession {
    async fn read(&mut self, variable: StatusVariable) -> Result<Option<String>, QueryFailure> {
        let query = sqlx::query_as::<_, (String, String)>(variable.query())
            .fetch_optional(&mut *self.conn);

        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(row) => Ok(row?.map(|(_, value)| value)),
            Err(_) => Err(QueryFailure::timeout(variable.query(), self.query_timeout)),
        }
    }
}

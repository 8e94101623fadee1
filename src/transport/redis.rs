//! Redis transport over a multiplexed async connection

use super::reply::Reply;
use super::traits::Transport;
use crate::error::TransportError;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;

/// [`Transport`] backed by the `redis` crate.
///
/// Cheap to clone: the multiplexed connection pipelines concurrent commands
/// over one socket, which is all the decoder needs for its catalog
/// side-queries.
#[derive(Clone)]
pub struct RedisTransport {
    connection: MultiplexedConnection,
}

impl RedisTransport {
    /// Open a connection to `url` (e.g. `redis://localhost:6379/`)
    pub async fn connect(url: &str) -> Result<Self, TransportError> {
        let client =
            redis::Client::open(url).map_err(|e| TransportError::Connection(e.to_string()))?;
        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(classify)?;
        tracing::debug!(url = %url, "Connected to Redis");
        Ok(Self { connection })
    }

    /// Wrap an already established connection
    pub fn from_connection(connection: MultiplexedConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl Transport for RedisTransport {
    async fn send(&self, command: &str, args: &[String]) -> Result<Reply, TransportError> {
        let mut cmd = redis::cmd(command);
        for arg in args {
            cmd.arg(arg);
        }

        let mut connection = self.connection.clone();
        let value: redis::Value = cmd.query_async(&mut connection).await.map_err(classify)?;
        Ok(convert(value))
    }
}

/// Map a RESP value onto [`Reply`] without interpreting it
fn convert(value: redis::Value) -> Reply {
    match value {
        redis::Value::Nil => Reply::Nil,
        redis::Value::Int(i) => Reply::Integer(i),
        redis::Value::Data(bytes) => Reply::String(String::from_utf8_lossy(&bytes).into_owned()),
        redis::Value::Bulk(items) => Reply::Array(items.into_iter().map(convert).collect()),
        redis::Value::Status(status) => Reply::String(status),
        redis::Value::Okay => Reply::String("OK".to_string()),
    }
}

fn classify(err: redis::RedisError) -> TransportError {
    if err.is_io_error()
        || err.is_connection_dropped()
        || err.is_connection_refusal()
        || err.is_timeout()
    {
        TransportError::Connection(err.to_string())
    } else if matches!(
        err.kind(),
        redis::ErrorKind::ResponseError | redis::ErrorKind::ExtensionError
    ) {
        TransportError::Server(err.to_string())
    } else {
        TransportError::Protocol(err.to_string())
    }
}

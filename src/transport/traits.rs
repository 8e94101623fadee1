//! Transport trait definition
//!
//! The single capability the client needs from whatever owns the connection:
//! send a named command and hand back the structured reply untouched.
//! `Send + Sync` so one connection can be shared as `Arc<dyn Transport>`.

use super::reply::Reply;
use crate::error::TransportError;
use async_trait::async_trait;

/// Abstract command channel to a graph server.
///
/// Implementations own connection management, pipelining, retries and
/// authentication. They must not interpret the reply.
///
/// # Implementations
///
/// - [`RedisTransport`](super::RedisTransport): multiplexed async Redis
///   connection (feature `redis`)
/// - [`MockTransport`](super::MockTransport): scripted in-memory replies that
///   record every command (for tests)
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue `command` with `args` and return the reply as received.
    ///
    /// # Errors
    ///
    /// Any connection, server or protocol failure, unchanged.
    async fn send(&self, command: &str, args: &[String]) -> Result<Reply, TransportError>;
}

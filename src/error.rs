//! Error types for the client and its transport collaborator

use thiserror::Error;

/// Failures reported by a [`Transport`](crate::transport::Transport).
///
/// The decoder never interprets these; they reach the caller unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The command never reached the server (connect, I/O, closed connection)
    #[error("connection error: {0}")]
    Connection(String),

    /// The server answered with an error reply
    #[error("server error: {0}")]
    Server(String),

    /// The reply could not be read as a RESP value
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Errors surfaced by [`Graph`](crate::graph::Graph) and the catalog resolver.
///
/// Cloneable so that one failed catalog hydration can be handed to every task
/// that was waiting on it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid client setup, raised before any transport call
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The reply does not have the shape of a graph query result
    #[error("malformed reply: {0}")]
    MalformedReply(String),
}

pub type Result<T> = std::result::Result<T, Error>;

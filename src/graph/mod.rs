//! Query façade
//!
//! [`Graph`] binds a transport and a session catalog to one graph name and
//! exposes `query`, `explain` and `delete`.

pub mod client;
pub mod models;

pub use client::{Graph, COMPACT_FLAG, DELETE_COMMAND, EXPLAIN_COMMAND, QUERY_COMMAND};
pub use models::QueryResult;

//! In-memory mock transport for tests
//!
//! Replies are scripted per `(command, query text)` pair and every command is
//! recorded, so tests can assert both what was decoded and how many
//! round-trips it took.

use super::reply::Reply;
use super::traits::Transport;
use crate::catalog::CatalogKind;
use crate::error::TransportError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

/// A command as seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    pub name: String,
    pub args: Vec<String>,
}

impl RecordedCommand {
    /// The query text argument (second argument), if any
    pub fn query(&self) -> Option<&str> {
        self.args.get(1).map(String::as_str)
    }
}

type ScriptKey = (String, String);

/// Scripted transport.
///
/// Lookups ignore the graph name and any trailing flags: a reply registered
/// for `("GRAPH.QUERY", "MATCH (n) RETURN n")` answers that query on every
/// graph, with or without `--compact`.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<HashMap<ScriptKey, Result<Reply, TransportError>>>,
    calls: Mutex<Vec<RecordedCommand>>,
    latency: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every reply, so concurrent callers overlap while a command is in
    /// flight.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Answer `command` carrying `query` with `reply`.
    ///
    /// Use an empty `query` for commands without query text (`GRAPH.DELETE`).
    pub fn respond(&self, command: &str, query: &str, reply: Reply) -> &Self {
        self.script
            .lock()
            .insert((command.to_string(), query.to_string()), Ok(reply));
        self
    }

    /// Fail `command` carrying `query` with `error`
    pub fn fail(&self, command: &str, query: &str, error: TransportError) -> &Self {
        self.script
            .lock()
            .insert((command.to_string(), query.to_string()), Err(error));
        self
    }

    /// Script the catalog procedure for `kind` to return `names`, where the
    /// position of each name is its ID.
    pub fn with_catalog(&self, kind: CatalogKind, names: &[&str]) -> &Self {
        let rows = names
            .iter()
            .map(|name| Reply::Array(vec![Reply::Array(vec![Reply::Integer(2), (*name).into()])]))
            .collect();
        let reply = Reply::Array(vec![
            Reply::Array(vec![Reply::Array(vec![
                Reply::Integer(1),
                kind.procedure_column().into(),
            ])]),
            Reply::Array(rows),
            Reply::Array(vec!["Query internal execution time: 0.1 milliseconds".into()]),
        ]);
        self.respond("GRAPH.QUERY", kind.procedure(), reply)
    }

    /// Every command received so far, in order
    pub fn calls(&self) -> Vec<RecordedCommand> {
        self.calls.lock().clone()
    }

    /// Number of commands received carrying `query` as their query text
    pub fn call_count(&self, query: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.query() == Some(query))
            .count()
    }

    /// Number of catalog hydrations issued for `kind`
    pub fn hydration_count(&self, kind: CatalogKind) -> usize {
        self.call_count(kind.procedure())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, command: &str, args: &[String]) -> Result<Reply, TransportError> {
        self.calls.lock().push(RecordedCommand {
            name: command.to_string(),
            args: args.to_vec(),
        });

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let query = args.get(1).cloned().unwrap_or_default();
        let key = (command.to_string(), query);
        self.script.lock().get(&key).cloned().unwrap_or_else(|| {
            Err(TransportError::Server(format!(
                "no scripted reply for {} {:?}",
                key.0, key.1
            )))
        })
    }
}

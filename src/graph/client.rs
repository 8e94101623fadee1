//! Graph session: query, explain and delete against one named graph

use super::models::QueryResult;
use crate::catalog::CatalogResolver;
use crate::decode::decode_reply;
use crate::error::{Error, Result};
use crate::transport::{Reply, Transport};
use crate::GraphConfig;
use std::sync::Arc;
use tracing::{debug, info};

pub const QUERY_COMMAND: &str = "GRAPH.QUERY";
pub const DELETE_COMMAND: &str = "GRAPH.DELETE";
pub const EXPLAIN_COMMAND: &str = "GRAPH.EXPLAIN";
/// Asks the server for the compact (ID-interned) reply format
pub const COMPACT_FLAG: &str = "--compact";

/// Client for one named graph.
///
/// Owns the session catalog used to resolve IDs in compact replies. Clones
/// share the transport and the catalog.
#[derive(Clone)]
pub struct Graph {
    name: String,
    transport: Arc<dyn Transport>,
    catalog: Arc<CatalogResolver>,
}

impl Graph {
    /// Bind a session to `name`.
    ///
    /// Fails with [`Error::Configuration`] if the name is empty or blank;
    /// nothing is sent in that case.
    pub fn new(name: impl Into<String>, transport: Arc<dyn Transport>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::Configuration(
                "a graph name is required".to_string(),
            ));
        }

        let catalog = Arc::new(CatalogResolver::new(name.clone(), Arc::clone(&transport)));
        debug!(graph = %name, "Graph session created");
        Ok(Self {
            name,
            transport,
            catalog,
        })
    }

    pub fn from_config(config: &GraphConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        Self::new(config.name.clone(), transport)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn catalog(&self) -> &CatalogResolver {
        &self.catalog
    }

    /// Run `cypher` and decode the compact reply
    pub async fn query(&self, cypher: &str) -> Result<QueryResult> {
        let args = [
            self.name.clone(),
            cypher.to_string(),
            COMPACT_FLAG.to_string(),
        ];
        debug!(graph = %self.name, query = cypher, "Sending query");
        let reply = self.transport.send(QUERY_COMMAND, &args).await?;

        let (records, statistics) = decode_reply(self.catalog.as_ref(), reply).await?;
        debug!(
            graph = %self.name,
            records = records.len(),
            statistics = statistics.len(),
            "Query decoded"
        );
        Ok(QueryResult::new(records, statistics))
    }

    /// Drop the graph on the server; the reply is returned undecoded.
    ///
    /// The session catalog is cleared on success since a recreated graph
    /// hands out IDs from scratch.
    pub async fn delete(&self) -> Result<Reply> {
        let reply = self
            .transport
            .send(DELETE_COMMAND, &[self.name.clone()])
            .await?;
        self.catalog.clear();
        info!(graph = %self.name, "Graph deleted");
        Ok(reply)
    }

    /// Execution plan for `cypher`, as returned by the server
    pub async fn explain(&self, cypher: &str) -> Result<Reply> {
        debug!(graph = %self.name, query = cypher, "Explaining query");
        let reply = self
            .transport
            .send(EXPLAIN_COMMAND, &[self.name.clone(), cypher.to_string()])
            .await?;
        Ok(reply)
    }
}

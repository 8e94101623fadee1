//! Session catalog with lazy, single-flight hydration
//!
//! ## Design
//!
//! Each catalog kind owns a name map and an optional in-flight hydration:
//! 1. `resolve` answers from the map when it can (no round-trip)
//! 2. On a miss it joins the pending hydration for that kind, or starts one
//!    under the `pending` lock if none is running
//! 3. The hydration runs the catalog procedure, replaces the whole map and
//!    clears `pending` before completing
//! 4. Every waiter gets the same shared outcome, then re-reads the map
//!
//! Locks are never held across an `.await`.

use super::kind::CatalogKind;
use super::traits::NameResolver;
use crate::decode::wire::WireReply;
use crate::error::Result;
use crate::graph::{COMPACT_FLAG, QUERY_COMMAND};
use crate::transport::{Reply, Transport};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

type Hydration = Shared<BoxFuture<'static, Result<()>>>;

/// One catalog kind: cached names plus the hydration currently in flight
struct CatalogSlot {
    kind: CatalogKind,
    names: RwLock<HashMap<i64, String>>,
    pending: Mutex<Option<Hydration>>,
}

impl CatalogSlot {
    fn new(kind: CatalogKind) -> Arc<Self> {
        Arc::new(Self {
            kind,
            names: RwLock::new(HashMap::new()),
            pending: Mutex::new(None),
        })
    }
}

/// ID → name catalogs of one graph, fetched through the graph's transport.
///
/// Created empty; grows as IDs are encountered and lives as long as the
/// owning session.
pub struct CatalogResolver {
    graph: String,
    transport: Arc<dyn Transport>,
    labels: Arc<CatalogSlot>,
    property_keys: Arc<CatalogSlot>,
    relationship_types: Arc<CatalogSlot>,
}

impl CatalogResolver {
    pub fn new(graph: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            graph: graph.into(),
            transport,
            labels: CatalogSlot::new(CatalogKind::Label),
            property_keys: CatalogSlot::new(CatalogKind::PropertyKey),
            relationship_types: CatalogSlot::new(CatalogKind::RelationshipType),
        }
    }

    fn slot(&self, kind: CatalogKind) -> &Arc<CatalogSlot> {
        match kind {
            CatalogKind::Label => &self.labels,
            CatalogKind::PropertyKey => &self.property_keys,
            CatalogKind::RelationshipType => &self.relationship_types,
        }
    }

    /// Cached name for `id`, without touching the transport
    pub fn lookup(&self, kind: CatalogKind, id: i64) -> Option<String> {
        self.slot(kind).names.read().get(&id).cloned()
    }

    /// Number of cached names of `kind`
    pub fn len(&self, kind: CatalogKind) -> usize {
        self.slot(kind).names.read().len()
    }

    pub fn is_empty(&self) -> bool {
        CatalogKind::ALL.iter().all(|kind| self.len(*kind) == 0)
    }

    /// Forget every cached name (e.g. after the graph was deleted)
    pub fn clear(&self) {
        for kind in CatalogKind::ALL {
            self.slot(kind).names.write().clear();
        }
        debug!(graph = %self.graph, "Catalog cleared");
    }

    /// Name for `id`, hydrating the `kind` catalog on a miss.
    ///
    /// Returns `Ok(None)` when the ID is still unknown after hydration, which
    /// can happen when the server created the name after the catalog was read.
    pub async fn resolve(&self, kind: CatalogKind, id: i64) -> Result<Option<String>> {
        if let Some(name) = self.lookup(kind, id) {
            return Ok(Some(name));
        }

        self.refresh(kind).await?;

        let name = self.lookup(kind, id);
        if name.is_none() {
            warn!(
                graph = %self.graph,
                kind = %kind,
                id,
                "Catalog id still unknown after refresh"
            );
        }
        Ok(name)
    }

    /// Re-read the whole `kind` catalog from the server.
    ///
    /// Joins the hydration already in flight for `kind` if there is one.
    pub async fn refresh(&self, kind: CatalogKind) -> Result<()> {
        self.hydration(kind).await
    }

    /// The in-flight hydration for `kind`, started if none is running
    fn hydration(&self, kind: CatalogKind) -> Hydration {
        let slot = self.slot(kind);
        let mut pending = slot.pending.lock();

        if let Some(hydration) = pending.as_ref() {
            debug!(graph = %self.graph, kind = %kind, "Joining in-flight catalog hydration");
            return hydration.clone();
        }

        let hydration = hydrate(
            Arc::clone(slot),
            Arc::clone(&self.transport),
            self.graph.clone(),
        )
        .boxed()
        .shared();
        *pending = Some(hydration.clone());
        hydration
    }
}

async fn hydrate(slot: Arc<CatalogSlot>, transport: Arc<dyn Transport>, graph: String) -> Result<()> {
    debug!(graph = %graph, kind = %slot.kind, "Hydrating catalog");

    let outcome = fetch_names(transport.as_ref(), &graph, slot.kind).await;
    let result = match outcome {
        Ok(names) => {
            debug!(graph = %graph, kind = %slot.kind, count = names.len(), "Catalog hydrated");
            *slot.names.write() = names;
            Ok(())
        }
        Err(e) => {
            warn!(graph = %graph, kind = %slot.kind, error = %e, "Catalog hydration failed");
            Err(e)
        }
    };

    slot.pending.lock().take();
    result
}

/// Run the catalog procedure for `kind`; the row index is the ID
async fn fetch_names(
    transport: &dyn Transport,
    graph: &str,
    kind: CatalogKind,
) -> Result<HashMap<i64, String>> {
    let args = [
        graph.to_string(),
        kind.procedure().to_string(),
        COMPACT_FLAG.to_string(),
    ];
    let reply = transport.send(QUERY_COMMAND, &args).await?;
    let rows = WireReply::parse(reply)?
        .result_set
        .map(|(_, rows)| rows)
        .unwrap_or_default();

    let mut names = HashMap::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let id = index as i64;
        match row_name(row) {
            Some(name) => {
                names.insert(id, name.to_string());
            }
            None => warn!(kind = %kind, id, "Skipping unreadable catalog row"),
        }
    }
    Ok(names)
}

/// Name from a one-column procedure row: `[[scalarTag, "name"]]` or `["name"]`
fn row_name(row: &Reply) -> Option<&str> {
    let cell = row.as_array()?.first()?;
    match cell {
        Reply::String(name) => Some(name),
        Reply::Array(pair) => pair.get(1)?.as_str(),
        _ => None,
    }
}

#[async_trait]
impl NameResolver for CatalogResolver {
    async fn resolve(&self, kind: CatalogKind, id: i64) -> Result<Option<String>> {
        CatalogResolver::resolve(self, kind, id).await
    }
}

//! Fixed in-memory catalog
//!
//! Resolves names from a mapping given up front and never talks to a server.
//! Used by decoder tests and for decoding captured replies offline.

use super::kind::CatalogKind;
use super::traits::NameResolver;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// A [`NameResolver`] over a fixed mapping
///
/// # Example
///
/// ```rust
/// use redisgraph_client::decode::{decode_cell, ColumnType};
/// use redisgraph_client::{reply, CatalogKind, StaticCatalog};
///
/// # tokio_test::block_on(async {
/// let catalog = StaticCatalog::new()
///     .with(CatalogKind::Label, 2, "person")
///     .with(CatalogKind::PropertyKey, 0, "name");
///
/// let node = decode_cell(&catalog, ColumnType::Node, reply!([7, [2], [[0, 1, "Chuck"]]]))
///     .await
///     .unwrap();
/// assert_eq!(
///     serde_json::to_string(&node).unwrap(),
///     r#"{"id":7,"labels":["person"],"name":"Chuck"}"#
/// );
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    names: HashMap<(CatalogKind, i64), String>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single `id → name` entry
    pub fn with(mut self, kind: CatalogKind, id: i64, name: &str) -> Self {
        self.names.insert((kind, id), name.to_string());
        self
    }

    /// Add `names` for `kind`, using each name's position as its ID
    pub fn with_names(mut self, kind: CatalogKind, names: &[&str]) -> Self {
        for (id, name) in names.iter().enumerate() {
            self.names.insert((kind, id as i64), name.to_string());
        }
        self
    }
}

#[async_trait]
impl NameResolver for StaticCatalog {
    async fn resolve(&self, kind: CatalogKind, id: i64) -> Result<Option<String>> {
        Ok(self.names.get(&(kind, id)).cloned())
    }
}

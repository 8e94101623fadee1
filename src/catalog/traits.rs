//! NameResolver trait definition
//!
//! The seam between the entity decoder and wherever names come from: the live
//! catalog of a graph session, or a fixed mapping in tests.

use super::kind::CatalogKind;
use crate::error::Result;
use async_trait::async_trait;

/// Resolves interned catalog IDs to names.
#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Name for `id` in the `kind` catalog.
    ///
    /// `Ok(None)` means the ID is unknown even after the resolver did what it
    /// could to learn it (a catalog miss). That is not an error.
    ///
    /// # Errors
    ///
    /// Transport failures while fetching the catalog.
    async fn resolve(&self, kind: CatalogKind, id: i64) -> Result<Option<String>>;
}

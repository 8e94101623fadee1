//! Label, property-key and relationship-type catalogs
//!
//! Compact replies reference names by integer ID. This module turns those IDs
//! back into names:
//! - `NameResolver` trait: what the decoder asks
//! - `CatalogResolver`: live per-graph catalog, hydrated on demand through the
//!   transport with one in-flight request per kind
//! - `StaticCatalog`: fixed mapping for tests and offline decoding

pub mod kind;
pub mod mock;
pub mod resolver;
pub mod traits;

pub use kind::CatalogKind;
pub use mock::StaticCatalog;
pub use resolver::CatalogResolver;
pub use traits::NameResolver;

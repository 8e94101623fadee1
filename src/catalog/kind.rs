//! The three interned name dictionaries a graph keeps

use std::fmt;

/// Which catalog an integer ID refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Label,
    PropertyKey,
    RelationshipType,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 3] = [
        CatalogKind::Label,
        CatalogKind::PropertyKey,
        CatalogKind::RelationshipType,
    ];

    /// Procedure call that lists every name of this kind, in ID order
    pub fn procedure(self) -> &'static str {
        match self {
            CatalogKind::Label => "CALL db.labels()",
            CatalogKind::PropertyKey => "CALL db.propertyKeys()",
            CatalogKind::RelationshipType => "CALL db.relationshipTypes()",
        }
    }

    /// Column name the procedure yields
    pub fn procedure_column(self) -> &'static str {
        match self {
            CatalogKind::Label => "label",
            CatalogKind::PropertyKey => "propertyKey",
            CatalogKind::RelationshipType => "relationshipType",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CatalogKind::Label => "label",
            CatalogKind::PropertyKey => "property_key",
            CatalogKind::RelationshipType => "relationship_type",
        };
        f.write_str(name)
    }
}

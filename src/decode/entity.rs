//! Cell decoding
//!
//! Cell shapes by column type:
//!
//! ```text
//! scalar        [scalarTag, value]
//! node          [id, [labelId, ...], [[keyId, typeTag, value], ...]]
//! relationship  [id, typeId, srcId, dstId, [[keyId, typeTag, value], ...]]
//! ```
//!
//! Property type tags are ignored and values pass through verbatim. Cells of
//! an unknown type, or whose shape does not match their column type, decode
//! to [`Value::Null`] with a warning.

use super::models::{ColumnType, Node, Relationship, Value};
use crate::catalog::{CatalogKind, NameResolver};
use crate::error::Result;
use crate::transport::Reply;
use futures::future::{try_join, try_join_all};
use tracing::warn;

/// A property before its key is resolved
struct RawProperty {
    key_id: i64,
    value: Reply,
}

/// Decode one cell according to its column type.
///
/// Only catalog hydration failures are returned as errors.
pub async fn decode_cell(
    resolver: &dyn NameResolver,
    column_type: ColumnType,
    cell: Reply,
) -> Result<Value> {
    match column_type {
        ColumnType::Scalar => Ok(decode_scalar(cell)),
        ColumnType::Node => decode_node(resolver, cell).await,
        ColumnType::Relationship => decode_relationship(resolver, cell).await,
        ColumnType::Unknown(tag) => {
            warn!(tag, "Unknown column type, decoding cell as null");
            Ok(Value::Null)
        }
    }
}

fn decode_scalar(cell: Reply) -> Value {
    let shape = cell.kind();
    match cell.into_array().map(<[Reply; 2]>::try_from) {
        Ok(Ok([_tag, value])) => Value::from(value),
        _ => {
            warn!(shape, "Scalar cell is not [type, value], decoding as null");
            Value::Null
        }
    }
}

async fn decode_node(resolver: &dyn NameResolver, cell: Reply) -> Result<Value> {
    let shape = cell.kind();
    let Some((id, label_ids, properties)) = split_node(cell) else {
        warn!(shape, "Malformed node cell, decoding as null");
        return Ok(Value::Null);
    };

    let (labels, properties) = try_join(
        resolve_labels(resolver, CatalogKind::Label, label_ids),
        resolve_properties(resolver, properties),
    )
    .await?;

    Ok(Value::Node(Node {
        id,
        labels,
        properties,
    }))
}

async fn decode_relationship(resolver: &dyn NameResolver, cell: Reply) -> Result<Value> {
    let shape = cell.kind();
    let Some((id, type_id, source_node_id, destination_node_id, properties)) =
        split_relationship(cell)
    else {
        warn!(shape, "Malformed relationship cell, decoding as null");
        return Ok(Value::Null);
    };

    let (labels, properties) = try_join(
        resolve_labels(resolver, CatalogKind::RelationshipType, vec![type_id]),
        resolve_properties(resolver, properties),
    )
    .await?;

    Ok(Value::Relationship(Relationship {
        id,
        labels,
        source_node_id,
        destination_node_id,
        properties,
    }))
}

fn split_node(cell: Reply) -> Option<(i64, Vec<i64>, Vec<RawProperty>)> {
    let [id, labels, properties] = <[Reply; 3]>::try_from(cell.into_array().ok()?).ok()?;
    let labels = labels
        .as_array()?
        .iter()
        .map(Reply::as_i64)
        .collect::<Option<Vec<_>>>()?;
    Some((id.as_i64()?, labels, split_properties(properties)?))
}

fn split_relationship(cell: Reply) -> Option<(i64, i64, i64, i64, Vec<RawProperty>)> {
    let [id, type_id, src, dst, properties] =
        <[Reply; 5]>::try_from(cell.into_array().ok()?).ok()?;
    Some((
        id.as_i64()?,
        type_id.as_i64()?,
        src.as_i64()?,
        dst.as_i64()?,
        split_properties(properties)?,
    ))
}

fn split_properties(properties: Reply) -> Option<Vec<RawProperty>> {
    properties
        .into_array()
        .ok()?
        .into_iter()
        .map(|property| {
            let [key, _type_tag, value] =
                <[Reply; 3]>::try_from(property.into_array().ok()?).ok()?;
            Some(RawProperty {
                key_id: key.as_i64()?,
                value,
            })
        })
        .collect()
}

/// Resolve label (or relationship type) IDs, keeping order and duplicates
async fn resolve_labels(
    resolver: &dyn NameResolver,
    kind: CatalogKind,
    ids: Vec<i64>,
) -> Result<Vec<Option<String>>> {
    try_join_all(ids.into_iter().map(|id| resolver.resolve(kind, id))).await
}

/// Resolve property keys; properties whose key stays unknown are dropped
async fn resolve_properties(
    resolver: &dyn NameResolver,
    properties: Vec<RawProperty>,
) -> Result<Vec<(String, Value)>> {
    let names = try_join_all(
        properties
            .iter()
            .map(|p| resolver.resolve(CatalogKind::PropertyKey, p.key_id)),
    )
    .await?;

    Ok(names
        .into_iter()
        .zip(properties)
        .filter_map(|(name, property)| match name {
            Some(name) => Some((name, Value::from(property.value))),
            None => {
                warn!(key_id = property.key_id, "Dropping property with unknown key");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogResolver, StaticCatalog};
    use crate::error::{Error, TransportError};
    use crate::reply;
    use crate::transport::{MockTransport, Transport};
    use serde_json::json;
    use std::sync::Arc;

    fn catalog() -> StaticCatalog {
        StaticCatalog::new()
            .with(CatalogKind::Label, 2, "person")
            .with(CatalogKind::Label, 3, "employee")
            .with(CatalogKind::PropertyKey, 0, "name")
            .with(CatalogKind::PropertyKey, 1, "id")
            .with(CatalogKind::RelationshipType, 5, "friendsWith")
    }

    #[tokio::test]
    async fn test_node_cell() {
        let value = decode_cell(&catalog(), ColumnType::Node, reply!([7, [2], [[0, 1, "Chuck"]]]))
            .await
            .unwrap();
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"id":7,"labels":["person"],"name":"Chuck"}"#
        );
    }

    #[tokio::test]
    async fn test_relationship_cell() {
        let value = decode_cell(&catalog(), ColumnType::Relationship, reply!([3, 5, 1, 2, []]))
            .await
            .unwrap();
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"id":3,"labels":["friendsWith"],"sourceNodeId":1,"destinationNodeId":2}"#
        );
    }

    #[tokio::test]
    async fn test_scalar_passes_value_through() {
        let catalog = catalog();
        let int = decode_cell(&catalog, ColumnType::Scalar, reply!([3, 9])).await.unwrap();
        assert_eq!(int, Value::Integer(9));

        // no coercion from the scalar tag
        let text = decode_cell(&catalog, ColumnType::Scalar, reply!([3, "9"])).await.unwrap();
        assert_eq!(text, Value::from("9"));

        let nil = decode_cell(&catalog, ColumnType::Scalar, reply!([1, nil])).await.unwrap();
        assert!(nil.is_null());
    }

    #[tokio::test]
    async fn test_unknown_column_type_is_null() {
        let value = decode_cell(&catalog(), ColumnType::Unknown(42), reply!([1, 2]))
            .await
            .unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn test_malformed_cells_are_null() {
        let catalog = catalog();
        let cases = [
            (ColumnType::Scalar, reply!("bare")),
            (ColumnType::Node, reply!([7, [2]])),
            (ColumnType::Node, reply!([7, ["person"], []])),
            (ColumnType::Node, reply!([7, [2], [[0, "Chuck"]]])),
            (ColumnType::Relationship, reply!([3, 5, 1, []])),
        ];
        for (column_type, cell) in cases {
            let value = decode_cell(&catalog, column_type, cell).await.unwrap();
            assert!(value.is_null(), "{:?} should decode to null", column_type);
        }
    }

    #[tokio::test]
    async fn test_property_cannot_overwrite_id() {
        let value = decode_cell(
            &catalog(),
            ColumnType::Node,
            reply!([7, [2], [[1, 1, 100], [0, 2, "Chuck"]]]),
        )
        .await
        .unwrap();
        let node = value.as_node().unwrap();
        assert_eq!(node.get("id"), Some(Value::Integer(7)));
        assert_eq!(node.property("id"), Some(&Value::Integer(100)));
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({"id": 7, "labels": ["person"], "name": "Chuck"})
        );
    }

    #[tokio::test]
    async fn test_labels_keep_order_and_duplicates() {
        let value = decode_cell(&catalog(), ColumnType::Node, reply!([1, [3, 2, 3], []]))
            .await
            .unwrap();
        assert_eq!(
            value.as_node().unwrap().labels,
            vec![
                Some("employee".to_string()),
                Some("person".to_string()),
                Some("employee".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_catalog_misses() {
        let value = decode_cell(
            &catalog(),
            ColumnType::Node,
            reply!([1, [2, 9], [[0, 1, "Chuck"], [8, 1, "lost"]]]),
        )
        .await
        .unwrap();
        let node = value.as_node().unwrap();
        assert_eq!(node.labels, vec![Some("person".to_string()), None]);
        assert_eq!(node.properties, vec![("name".to_string(), Value::from("Chuck"))]);

        let rel = decode_cell(&catalog(), ColumnType::Relationship, reply!([3, 6, 1, 2, []]))
            .await
            .unwrap();
        assert_eq!(rel.as_relationship().unwrap().relationship_type(), None);
    }

    #[tokio::test]
    async fn test_property_values_verbatim() {
        let value = decode_cell(
            &catalog(),
            ColumnType::Node,
            reply!([1, [], [[0, 7, [1, 2]]]]),
        )
        .await
        .unwrap();
        assert_eq!(
            value.as_node().unwrap().property("name"),
            Some(&Value::Array(vec![Value::Integer(1), Value::Integer(2)]))
        );
    }

    #[tokio::test]
    async fn test_hydration_failure_propagates() {
        let mock = MockTransport::new();
        mock.fail(
            "GRAPH.QUERY",
            "CALL db.labels()",
            TransportError::Server("ERR graph missing".into()),
        );
        let resolver = CatalogResolver::new("g", Arc::new(mock) as Arc<dyn Transport>);

        let err = decode_cell(&resolver, ColumnType::Node, reply!([1, [0], []]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(TransportError::Server(_))));
    }
}

//! Decoded result values: scalars, nodes, relationships and records

use crate::transport::Reply;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::sync::Arc;

// ============================================================================
// Column headers
// ============================================================================

/// Type tag of a result column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Scalar,
    Node,
    Relationship,
    /// Any tag this client does not know how to decode
    Unknown(i64),
}

impl ColumnType {
    pub fn from_tag(tag: i64) -> Self {
        match tag {
            1 => ColumnType::Scalar,
            2 => ColumnType::Node,
            3 => ColumnType::Relationship,
            other => ColumnType::Unknown(other),
        }
    }

    pub fn tag(self) -> i64 {
        match self {
            ColumnType::Scalar => 1,
            ColumnType::Node => 2,
            ColumnType::Relationship => 3,
            ColumnType::Unknown(tag) => tag,
        }
    }
}

/// One result column: how to decode it and what to call it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub column_type: ColumnType,
    pub name: String,
}

// ============================================================================
// Values
// ============================================================================

/// A decoded cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Array(Vec<Value>),
    Node(Node),
    Relationship(Relationship),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_relationship(&self) -> Option<&Relationship> {
        match self {
            Value::Relationship(rel) => Some(rel),
            _ => None,
        }
    }
}

/// Structural mapping only: the wire value is passed through as-is.
impl From<Reply> for Value {
    fn from(reply: Reply) -> Self {
        match reply {
            Reply::Nil => Value::Null,
            Reply::Integer(i) => Value::Integer(i),
            Reply::Double(d) => Value::Double(d),
            Reply::Boolean(b) => Value::Boolean(b),
            Reply::String(s) => Value::String(s),
            Reply::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Double(d) => serializer.serialize_f64(*d),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Node(node) => node.serialize(serializer),
            Value::Relationship(rel) => rel.serialize(serializer),
        }
    }
}

// ============================================================================
// Field merge
// ============================================================================

/// Lay `properties` underneath an entity's explicit fields.
///
/// Precedence is first-wins: every explicit field is kept as given, and a
/// property is appended only if no field of the same name is present yet. A
/// property called `id` therefore never replaces the entity id, and a
/// repeated property name keeps its first value.
pub fn merge_fields(
    explicit: Vec<(String, Value)>,
    properties: &[(String, Value)],
) -> Vec<(String, Value)> {
    let mut merged = explicit;
    merged.reserve(properties.len());
    for (name, value) in properties {
        if merged.iter().any(|(existing, _)| existing == name) {
            continue;
        }
        merged.push((name.clone(), value.clone()));
    }
    merged
}

fn labels_value(labels: &[Option<String>]) -> Value {
    Value::Array(
        labels
            .iter()
            .map(|label| label.clone().map(Value::String).unwrap_or(Value::Null))
            .collect(),
    )
}

fn serialize_fields<S: Serializer>(
    fields: Vec<(String, Value)>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for (name, value) in &fields {
        map.serialize_entry(name, value)?;
    }
    map.end()
}

// ============================================================================
// Graph entities
// ============================================================================

/// A node with its catalog names resolved
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: i64,
    /// Label names in wire order; `None` where the catalog had no name
    pub labels: Vec<Option<String>>,
    /// Properties in wire order, values untouched
    pub properties: Vec<(String, Value)>,
}

impl Node {
    /// Raw property value (first occurrence of `name`)
    pub fn property(&self, name: &str) -> Option<&Value> {
        find(&self.properties, name)
    }

    /// Resolved label names, skipping catalog misses
    pub fn label_names(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().filter_map(|l| l.as_deref())
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.label_names().any(|l| l == label)
    }

    /// Merged view: `id`, `labels`, then properties (see [`merge_fields`])
    pub fn fields(&self) -> Vec<(String, Value)> {
        merge_fields(
            vec![
                ("id".to_string(), Value::Integer(self.id)),
                ("labels".to_string(), labels_value(&self.labels)),
            ],
            &self.properties,
        )
    }

    /// Field of the merged view by name
    pub fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::Integer(self.id)),
            "labels" => Some(labels_value(&self.labels)),
            _ => self.property(field).cloned(),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_fields(self.fields(), serializer)
    }
}

/// A relationship with its type name resolved.
///
/// The type is kept as a one-element `labels` list so nodes and
/// relationships read the same way.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub id: i64,
    pub labels: Vec<Option<String>>,
    pub source_node_id: i64,
    pub destination_node_id: i64,
    pub properties: Vec<(String, Value)>,
}

impl Relationship {
    /// Resolved type name, `None` on a catalog miss
    pub fn relationship_type(&self) -> Option<&str> {
        self.labels.first().and_then(|l| l.as_deref())
    }

    /// Raw property value (first occurrence of `name`)
    pub fn property(&self, name: &str) -> Option<&Value> {
        find(&self.properties, name)
    }

    /// Merged view: `id`, `labels`, `sourceNodeId`, `destinationNodeId`,
    /// then properties (see [`merge_fields`])
    pub fn fields(&self) -> Vec<(String, Value)> {
        merge_fields(
            vec![
                ("id".to_string(), Value::Integer(self.id)),
                ("labels".to_string(), labels_value(&self.labels)),
                ("sourceNodeId".to_string(), Value::Integer(self.source_node_id)),
                (
                    "destinationNodeId".to_string(),
                    Value::Integer(self.destination_node_id),
                ),
            ],
            &self.properties,
        )
    }

    /// Field of the merged view by name
    pub fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::Integer(self.id)),
            "labels" => Some(labels_value(&self.labels)),
            "sourceNodeId" => Some(Value::Integer(self.source_node_id)),
            "destinationNodeId" => Some(Value::Integer(self.destination_node_id)),
            _ => self.property(field).cloned(),
        }
    }
}

impl Serialize for Relationship {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_fields(self.fields(), serializer)
    }
}

fn find<'a>(fields: &'a [(String, Value)], name: &str) -> Option<&'a Value> {
    fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
}

// ============================================================================
// Records
// ============================================================================

/// One result row: values keyed by column name, in column order.
///
/// Rows of the same result share one column list.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Record {
    /// Pair `columns` with `values` by position
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Value of the first column called `column`
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(column, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chuck() -> Node {
        Node {
            id: 7,
            labels: vec![Some("person".into())],
            properties: vec![("name".into(), "Chuck".into())],
        }
    }

    #[test]
    fn test_column_type_tags() {
        assert_eq!(ColumnType::from_tag(1), ColumnType::Scalar);
        assert_eq!(ColumnType::from_tag(2), ColumnType::Node);
        assert_eq!(ColumnType::from_tag(3), ColumnType::Relationship);
        assert_eq!(ColumnType::from_tag(9), ColumnType::Unknown(9));
        assert_eq!(ColumnType::Unknown(9).tag(), 9);
    }

    #[test]
    fn test_merge_explicit_fields_win() {
        let merged = merge_fields(
            vec![("id".into(), Value::Integer(1))],
            &[
                ("id".into(), Value::Integer(99)),
                ("name".into(), "a".into()),
                ("name".into(), "b".into()),
            ],
        );
        assert_eq!(
            merged,
            vec![
                ("id".to_string(), Value::Integer(1)),
                ("name".to_string(), Value::from("a")),
            ]
        );
    }

    #[test]
    fn test_node_merged_view() {
        let mut node = chuck();
        node.properties.push(("labels".into(), "shadowed".into()));

        assert_eq!(node.get("id"), Some(Value::Integer(7)));
        assert_eq!(
            node.get("labels"),
            Some(Value::Array(vec![Value::from("person")]))
        );
        assert_eq!(node.get("name"), Some(Value::from("Chuck")));
        assert_eq!(node.property("labels"), Some(&Value::from("shadowed")));
        assert_eq!(node.fields().len(), 3);
        assert!(node.has_label("person"));
    }

    #[test]
    fn test_node_serializes_flat_and_ordered() {
        let json = serde_json::to_string(&chuck()).unwrap();
        assert_eq!(json, r#"{"id":7,"labels":["person"],"name":"Chuck"}"#);
    }

    #[test]
    fn test_missing_label_serializes_as_null() {
        let node = Node {
            id: 1,
            labels: vec![None, Some("team".into())],
            properties: vec![],
        };
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({"id": 1, "labels": [null, "team"]})
        );
        assert_eq!(node.label_names().collect::<Vec<_>>(), vec!["team"]);
    }

    #[test]
    fn test_relationship_merged_view() {
        let rel = Relationship {
            id: 3,
            labels: vec![Some("friendsWith".into())],
            source_node_id: 1,
            destination_node_id: 2,
            properties: vec![("sourceNodeId".into(), Value::Integer(42))],
        };
        assert_eq!(rel.relationship_type(), Some("friendsWith"));
        assert_eq!(rel.get("sourceNodeId"), Some(Value::Integer(1)));
        assert_eq!(
            serde_json::to_value(&rel).unwrap(),
            json!({"id": 3, "labels": ["friendsWith"], "sourceNodeId": 1, "destinationNodeId": 2})
        );
    }

    #[test]
    fn test_value_from_reply_is_structural() {
        let reply = Reply::Array(vec![
            Reply::Integer(1),
            Reply::String("1".into()),
            Reply::Nil,
            Reply::Double(0.5),
        ]);
        assert_eq!(
            Value::from(reply),
            Value::Array(vec![
                Value::Integer(1),
                Value::from("1"),
                Value::Null,
                Value::Double(0.5),
            ])
        );
    }

    #[test]
    fn test_record_lookup_and_order() {
        let columns: Arc<[String]> = vec!["a".to_string(), "id(a)".to_string()].into();
        let record = Record::new(columns, vec![Value::Node(chuck()), Value::Integer(7)]);

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("id(a)"), Some(&Value::Integer(7)));
        assert!(record.get("b").is_none());
        assert_eq!(record.get_index(0).and_then(Value::as_node).map(|n| n.id), Some(7));
        assert_eq!(
            record.iter().map(|(c, _)| c).collect::<Vec<_>>(),
            vec!["a", "id(a)"]
        );
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"a":{"id":7,"labels":["person"],"name":"Chuck"},"id(a)":7}"#
        );
    }
}

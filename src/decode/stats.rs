//! Query statistics
//!
//! Every reply ends with human-readable lines such as `"Nodes created: 1"`.
//! They are kept as strings under lowerCamelCase keys (`nodesCreated`);
//! the typed accessors parse on demand.

use crate::transport::Reply;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::time::Duration;
use tracing::warn;

pub const NODES_CREATED: &str = "nodesCreated";
pub const NODES_DELETED: &str = "nodesDeleted";
pub const RELATIONSHIPS_CREATED: &str = "relationshipsCreated";
pub const RELATIONSHIPS_DELETED: &str = "relationshipsDeleted";
pub const PROPERTIES_SET: &str = "propertiesSet";
pub const LABELS_ADDED: &str = "labelsAdded";
pub const CACHED_EXECUTION: &str = "cachedExecution";
pub const EXECUTION_TIME: &str = "queryInternalExecutionTime";

/// Statistics of one query, in reply order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    entries: Vec<(String, String)>,
}

impl Statistics {
    /// Raw value of `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key)?.parse().ok()
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key)?.parse().ok()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    // Counters are omitted by the server when zero.

    pub fn nodes_created(&self) -> u64 {
        self.get_u64(NODES_CREATED).unwrap_or(0)
    }

    pub fn nodes_deleted(&self) -> u64 {
        self.get_u64(NODES_DELETED).unwrap_or(0)
    }

    pub fn relationships_created(&self) -> u64 {
        self.get_u64(RELATIONSHIPS_CREATED).unwrap_or(0)
    }

    pub fn relationships_deleted(&self) -> u64 {
        self.get_u64(RELATIONSHIPS_DELETED).unwrap_or(0)
    }

    pub fn properties_set(&self) -> u64 {
        self.get_u64(PROPERTIES_SET).unwrap_or(0)
    }

    pub fn labels_added(&self) -> u64 {
        self.get_u64(LABELS_ADDED).unwrap_or(0)
    }

    /// Whether the server reused a cached execution plan
    pub fn cached_execution(&self) -> bool {
        self.get_u64(CACHED_EXECUTION) == Some(1)
    }

    /// Server-side execution time (`"0.25 milliseconds"`)
    pub fn execution_time(&self) -> Option<Duration> {
        let millis: f64 = self.get(EXECUTION_TIME)?.split_whitespace().next()?.parse().ok()?;
        if !millis.is_finite() || millis < 0.0 {
            return None;
        }
        Some(Duration::from_nanos((millis * 1_000_000.0).round() as u64))
    }

    fn insert(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }
}

impl Serialize for Statistics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Parse the trailing statistics lines of a reply.
///
/// Lines without a `": "` separator, and non-string entries, are skipped.
pub fn parse_statistics(lines: &[Reply]) -> Statistics {
    let mut stats = Statistics::default();
    for line in lines {
        let Some(text) = line.as_str() else {
            warn!(shape = line.kind(), "Skipping non-text statistics entry");
            continue;
        };
        let Some((label, value)) = text.split_once(": ") else {
            warn!(line = text, "Skipping unparseable statistics line");
            continue;
        };
        stats.insert(camel_case(label), value.trim().to_string());
    }
    stats
}

/// `"Query internal execution time"` → `queryInternalExecutionTime`
pub fn camel_case(label: &str) -> String {
    let mut key = String::with_capacity(label.len());
    let words = label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty());
    for (i, word) in words.enumerate() {
        let lower = word.to_lowercase();
        if i == 0 {
            key.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            key.extend(first.to_uppercase());
            key.push_str(chars.as_str());
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply;

    #[test]
    fn test_single_line() {
        let stats = parse_statistics(&[Reply::from("Nodes created: 1")]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats.get("nodesCreated"), Some("1"));
        assert_eq!(stats.nodes_created(), 1);
    }

    #[test]
    fn test_key_count_matches_parseable_lines() {
        let lines = vec![
            Reply::from("Labels added: 1"),
            Reply::from("no separator here"),
            Reply::from("Nodes created: 2"),
            Reply::Integer(3),
            Reply::from("Properties set:   4  "),
        ];
        let stats = parse_statistics(&lines);
        assert_eq!(stats.len(), 3);
        assert_eq!(stats.get("propertiesSet"), Some("4"));
        assert_eq!(
            stats.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            vec!["labelsAdded", "nodesCreated", "propertiesSet"]
        );
    }

    #[test]
    fn test_splits_on_first_separator() {
        let stats = parse_statistics(&[Reply::from("Note: a: b")]);
        assert_eq!(stats.get("note"), Some("a: b"));
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("Nodes created"), "nodesCreated");
        assert_eq!(
            camel_case("Query internal execution time"),
            "queryInternalExecutionTime"
        );
        assert_eq!(camel_case("Cached execution"), "cachedExecution");
        assert_eq!(camel_case("relationships-deleted"), "relationshipsDeleted");
        assert_eq!(camel_case(""), "");
    }

    #[test]
    fn test_typed_accessors() {
        let stats = parse_statistics(&[
            reply!("Relationships created: 2"),
            reply!("Relationships deleted: 1"),
            reply!("Nodes deleted: 5"),
            reply!("Cached execution: 1"),
            reply!("Query internal execution time: 1.5 milliseconds"),
        ]);
        assert_eq!(stats.relationships_created(), 2);
        assert_eq!(stats.relationships_deleted(), 1);
        assert_eq!(stats.nodes_deleted(), 5);
        assert_eq!(stats.labels_added(), 0);
        assert!(stats.cached_execution());
        assert_eq!(stats.execution_time(), Some(Duration::from_micros(1500)));
    }

    #[test]
    fn test_bad_execution_time() {
        let stats = parse_statistics(&[reply!("Query internal execution time: soon")]);
        assert_eq!(stats.execution_time(), None);
        assert_eq!(Statistics::default().execution_time(), None);
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let stats = parse_statistics(&[reply!("Nodes created: 1"), reply!("Labels added: 1")]);
        assert_eq!(
            serde_json::to_string(&stats).unwrap(),
            r#"{"nodesCreated":"1","labelsAdded":"1"}"#
        );
    }
}

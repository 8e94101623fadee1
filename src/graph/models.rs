//! Query results

use crate::decode::{Record, Statistics};
use serde::Serialize;

/// Decoded records of one query, with its statistics as metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    pub records: Vec<Record>,
    pub statistics: Statistics,
}

impl QueryResult {
    pub fn new(records: Vec<Record>, statistics: Statistics) -> Self {
        Self {
            records,
            statistics,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl IntoIterator for QueryResult {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

//! Compact reply decoding
//!
//! Turns the tagged, ID-interned compact reply format into records of named
//! values. Names are looked up through a [`NameResolver`](crate::catalog::NameResolver),
//! so the same code decodes against a live catalog or a fixed one.

pub mod entity;
pub mod models;
pub mod result_set;
pub mod stats;
pub mod wire;

pub use entity::decode_cell;
pub use models::{merge_fields, ColumnHeader, ColumnType, Node, Record, Relationship, Value};
pub use result_set::{decode_reply, decode_result_set, parse_headers};
pub use stats::{camel_case, parse_statistics, Statistics};
pub use wire::WireReply;

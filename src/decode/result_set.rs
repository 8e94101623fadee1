//! Result-set decoding: headers, rows, and whole replies

use super::entity::decode_cell;
use super::models::{ColumnHeader, ColumnType, Record, Value};
use super::stats::{parse_statistics, Statistics};
use super::wire::WireReply;
use crate::catalog::NameResolver;
use crate::error::{Error, Result};
use crate::transport::Reply;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// Parse `[typeTag, name]` column headers
pub fn parse_headers(headers: &[Reply]) -> Result<Vec<ColumnHeader>> {
    headers
        .iter()
        .enumerate()
        .map(|(position, header)| match header.as_array() {
            Some([Reply::Integer(tag), Reply::String(name)]) => Ok(ColumnHeader {
                column_type: ColumnType::from_tag(*tag),
                name: name.clone(),
            }),
            _ => Err(Error::MalformedReply(format!(
                "column header {} is not [type, name]: {:?}",
                position, header
            ))),
        })
        .collect()
}

/// Decode every row against `headers`.
///
/// Rows are decoded concurrently; the output keeps row order.
pub async fn decode_result_set(
    resolver: &dyn NameResolver,
    headers: Vec<Reply>,
    rows: Vec<Reply>,
) -> Result<Vec<Record>> {
    let headers = parse_headers(&headers)?;
    let columns: Arc<[String]> = headers.iter().map(|h| h.name.clone()).collect();

    let records = try_join_all(
        rows.into_iter()
            .enumerate()
            .map(|(index, row)| decode_row(resolver, &headers, Arc::clone(&columns), index, row)),
    )
    .await?;

    debug!(columns = columns.len(), rows = records.len(), "Result set decoded");
    Ok(records)
}

async fn decode_row(
    resolver: &dyn NameResolver,
    headers: &[ColumnHeader],
    columns: Arc<[String]>,
    index: usize,
    row: Reply,
) -> Result<Record> {
    let cells = row.into_array().map_err(|other| {
        Error::MalformedReply(format!("row {} is not an array, got {}", index, other.kind()))
    })?;

    if cells.len() != headers.len() {
        warn!(
            row = index,
            cells = cells.len(),
            columns = headers.len(),
            "Row width does not match headers; missing cells become null, extra cells are ignored"
        );
    }

    let padded = cells
        .into_iter()
        .map(Some)
        .chain(std::iter::repeat_with(|| None));
    let values = try_join_all(headers.iter().zip(padded).map(|(header, cell)| async move {
        match cell {
            Some(cell) => decode_cell(resolver, header.column_type, cell).await,
            None => Ok(Value::Null),
        }
    }))
    .await?;

    Ok(Record::new(columns, values))
}

/// Decode a whole compact reply into records and statistics.
///
/// A reply without a result set yields no records.
pub async fn decode_reply(
    resolver: &dyn NameResolver,
    reply: Reply,
) -> Result<(Vec<Record>, Statistics)> {
    let wire = WireReply::parse(reply)?;
    let statistics = parse_statistics(&wire.stats);

    let records = match wire.result_set {
        Some((headers, rows)) => decode_result_set(resolver, headers, rows).await?,
        None => Vec::new(),
    };
    Ok((records, statistics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogKind, CatalogResolver, StaticCatalog};
    use crate::reply;
    use crate::transport::{MockTransport, Transport};
    use std::time::Duration;

    fn catalog() -> StaticCatalog {
        StaticCatalog::new()
            .with(CatalogKind::Label, 2, "person")
            .with(CatalogKind::PropertyKey, 0, "name")
    }

    #[tokio::test]
    async fn test_node_and_scalar_columns() {
        let reply = reply!([
            [[2, "a"], [1, "id(a)"]],
            [[[9, [2], [[0, 1, "Zack"]]], [1, 9]]],
            ["Query internal execution time: 0.2 milliseconds"]
        ]);
        let (records, stats) = decode_reply(&catalog(), reply).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(
            serde_json::to_string(&records[0]).unwrap(),
            r#"{"a":{"id":9,"labels":["person"],"name":"Zack"},"id(a)":9}"#
        );
        assert_eq!(stats.len(), 1);
    }

    #[tokio::test]
    async fn test_no_result_set_is_empty() {
        let reply = reply!([["Nodes created: 1", "Properties set: 1"]]);
        let (records, stats) = decode_reply(&catalog(), reply).await.unwrap();
        assert!(records.is_empty());
        assert_eq!(stats.nodes_created(), 1);
    }

    #[tokio::test]
    async fn test_empty_rows() {
        let reply = reply!([[[1, "n"]], [], []]);
        let (records, stats) = decode_reply(&catalog(), reply).await.unwrap();
        assert!(records.is_empty());
        assert!(stats.is_empty());
    }

    #[tokio::test]
    async fn test_rows_keep_order() {
        let rows: Vec<Reply> = (0..20).map(|i| reply!([[3, (i as i64)]])).collect();
        let records = decode_result_set(&catalog(), vec![reply!([1, "i"])], rows)
            .await
            .unwrap();
        let values: Vec<i64> = records
            .iter()
            .filter_map(|r| r.get("i").and_then(Value::as_i64))
            .collect();
        assert_eq!(values, (0..20).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn test_rows_keep_order_with_slow_hydration() {
        // first row waits on the label catalog, the second does not
        let mock = MockTransport::new().with_latency(Duration::from_millis(15));
        mock.with_catalog(CatalogKind::Label, &["person"]);
        let resolver = CatalogResolver::new("g", Arc::new(mock) as Arc<dyn Transport>);

        let records = decode_result_set(
            &resolver,
            vec![reply!([1, "tag"]), reply!([2, "n"])],
            vec![
                reply!([[2, "first"], [1, [0], []]]),
                reply!([[2, "second"], [1, [], []]]),
            ],
        )
        .await
        .unwrap();

        assert_eq!(records[0].get("tag").and_then(Value::as_str), Some("first"));
        assert_eq!(records[1].get("tag").and_then(Value::as_str), Some("second"));
        let node = records[0].get("n").and_then(Value::as_node).unwrap();
        assert!(node.has_label("person"));
    }

    #[tokio::test]
    async fn test_unknown_column_keeps_rest_of_row() {
        let records = decode_result_set(
            &catalog(),
            vec![reply!([7, "mystery"]), reply!([1, "x"])],
            vec![reply!([[1, 2], [3, 5]])],
        )
        .await
        .unwrap();
        assert_eq!(records[0].get("mystery"), Some(&Value::Null));
        assert_eq!(records[0].get("x"), Some(&Value::Integer(5)));
    }

    #[tokio::test]
    async fn test_ragged_rows() {
        let headers = vec![reply!([1, "a"]), reply!([1, "b"])];
        let records = decode_result_set(
            &catalog(),
            headers,
            vec![reply!([[3, 1]]), reply!([[3, 1], [3, 2], [3, 3]])],
        )
        .await
        .unwrap();

        assert_eq!(records[0].values(), &[Value::Integer(1), Value::Null]);
        assert_eq!(records[1].values(), &[Value::Integer(1), Value::Integer(2)]);
    }

    #[tokio::test]
    async fn test_bad_header_is_malformed() {
        let err = decode_result_set(&catalog(), vec![reply!(["a", 1])], vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedReply(_)));
    }

    #[tokio::test]
    async fn test_non_array_row_is_malformed() {
        let err = decode_result_set(&catalog(), vec![reply!([1, "a"])], vec![reply!(5)])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("row 0"));
    }

    #[test]
    fn test_parse_headers() {
        let headers = parse_headers(&[reply!([2, "a"]), reply!([3, "r"]), reply!([0, "?"])]).unwrap();
        assert_eq!(
            headers.iter().map(|h| h.column_type).collect::<Vec<_>>(),
            vec![
                ColumnType::Node,
                ColumnType::Relationship,
                ColumnType::Unknown(0)
            ]
        );
        assert_eq!(headers[0].name, "a");
    }
}

//! Top-level shape of a compact query reply
//!
//! ```text
//! [ headers, rows, stats ]   query with a result set
//! [ stats ]                  pure side-effect query
//! ```

use crate::error::{Error, Result};
use crate::transport::Reply;

/// A reply split into its result-set prefix and trailing statistics lines
#[derive(Debug, Clone, PartialEq)]
pub struct WireReply {
    /// `(headers, rows)` when the query produced a result set
    pub result_set: Option<(Vec<Reply>, Vec<Reply>)>,
    pub stats: Vec<Reply>,
}

impl WireReply {
    /// Split a raw reply.
    ///
    /// # Errors
    ///
    /// `MalformedReply` when the reply is not an array, is empty, has no
    /// statistics array last, or has a prefix other than `[headers, rows]`.
    pub fn parse(reply: Reply) -> Result<Self> {
        let mut parts = reply.into_array().map_err(|other| {
            Error::MalformedReply(format!("expected an array reply, got {}", other.kind()))
        })?;

        let stats = parts
            .pop()
            .ok_or_else(|| Error::MalformedReply("empty reply".to_string()))?
            .into_array()
            .map_err(|other| {
                Error::MalformedReply(format!(
                    "expected statistics array as last element, got {}",
                    other.kind()
                ))
            })?;

        let result_set = match parts.len() {
            0 => None,
            2 => {
                let rows = parts.pop().map(Reply::into_array);
                let headers = parts.pop().map(Reply::into_array);
                match (headers, rows) {
                    (Some(Ok(headers)), Some(Ok(rows))) => Some((headers, rows)),
                    _ => {
                        return Err(Error::MalformedReply(
                            "result set headers and rows must be arrays".to_string(),
                        ))
                    }
                }
            }
            n => {
                return Err(Error::MalformedReply(format!(
                    "expected [headers, rows] before statistics, got {} element(s)",
                    n
                )))
            }
        };

        Ok(Self { result_set, stats })
    }
}

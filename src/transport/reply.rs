//! Wire-level reply values handed back by a [`Transport`](super::Transport).
//!
//! `Reply` mirrors the RESP value tree one-to-one and
//! carries no knowledge of what a graph query result looks like. Interpreting
//! the tree is the job of the decoder.

use serde::Serialize;

/// A structured reply exactly as the server sent it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Nil,
    Integer(i64),
    Double(f64),
    Boolean(bool),
    String(String),
    Array(Vec<Reply>),
}

impl Reply {
    /// Integer payload, if this is an integer reply
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Reply::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// String payload, if this is a string reply
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Reply::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the elements of an array reply
    pub fn as_array(&self) -> Option<&[Reply]> {
        match self {
            Reply::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Take ownership of the elements of an array reply.
    ///
    /// Returns the reply unchanged in `Err` when it is not an array so callers
    /// can report what they actually got.
    pub fn into_array(self) -> Result<Vec<Reply>, Reply> {
        match self {
            Reply::Array(items) => Ok(items),
            other => Err(other),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Reply::Nil)
    }

    /// Short name of the variant, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Reply::Nil => "nil",
            Reply::Integer(_) => "integer",
            Reply::Double(_) => "double",
            Reply::Boolean(_) => "boolean",
            Reply::String(_) => "string",
            Reply::Array(_) => "array",
        }
    }
}

impl From<i32> for Reply {
    fn from(value: i32) -> Self {
        Reply::Integer(i64::from(value))
    }
}

impl From<i64> for Reply {
    fn from(value: i64) -> Self {
        Reply::Integer(value)
    }
}

impl From<f64> for Reply {
    fn from(value: f64) -> Self {
        Reply::Double(value)
    }
}

impl From<bool> for Reply {
    fn from(value: bool) -> Self {
        Reply::Boolean(value)
    }
}

impl From<&str> for Reply {
    fn from(value: &str) -> Self {
        Reply::String(value.to_string())
    }
}

impl From<String> for Reply {
    fn from(value: String) -> Self {
        Reply::String(value)
    }
}

impl<T: Into<Reply>> From<Vec<T>> for Reply {
    fn from(items: Vec<T>) -> Self {
        Reply::Array(items.into_iter().map(Into::into).collect())
    }
}

/// Build a [`Reply`] tree with array/literal syntax.
///
/// ```rust
/// use redisgraph_client::reply;
/// use redisgraph_client::transport::Reply;
///
/// let cell = reply!([7, [2], [[0, 1, "Chuck"]]]);
/// assert_eq!(cell.as_array().map(|a| a.len()), Some(3));
/// assert_eq!(reply!(nil), Reply::Nil);
/// ```
#[macro_export]
macro_rules! reply {
    (nil) => {
        $crate::transport::Reply::Nil
    };
    ([ $($item:tt),* $(,)? ]) => {
        $crate::transport::Reply::Array(vec![ $( $crate::reply!($item) ),* ])
    };
    ($other:expr) => {
        $crate::transport::Reply::from($other)
    };
}

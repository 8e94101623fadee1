//! Transport collaborator: the command channel the decoder runs over
//!
//! Architecture follows the project pattern (trait + impl + mock):
//! - `Transport` trait: send a named command, get the raw reply back
//! - `RedisTransport`: real implementation on the `redis` crate (feature `redis`)
//! - `MockTransport`: scripted replies for tests

pub mod mock;
#[cfg(feature = "redis")]
pub mod redis;
pub mod reply;
pub mod traits;

pub use mock::{MockTransport, RecordedCommand};
#[cfg(feature = "redis")]
pub use self::redis::RedisTransport;
pub use reply::Reply;
pub use traits::Transport;

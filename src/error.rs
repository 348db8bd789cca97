//! # Error handling utilities.
//! Storage write failures carry their own kinds so callers can tell a
//! full store apart from a broken one; everything recoverable on the
//! read path degrades locally instead of surfacing here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The backing store ran out of capacity while persisting a
    /// collection. The attempted record is not committed.
    #[error("storage full while writing collection `{collection}`")]
    StorageFull { collection: &'static str },

    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("live channel unavailable: {0}")]
    ChannelUnavailable(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

use crate::protocol::Method;
use thiserror::Error;

/// Errors produced while encoding, decoding or dispatching a message.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Failed to encode {method} message: {source}")]
    Encoding {
        method: Method,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to decode message: {0}")]
    Decoding(#[source] serde_json::Error),

    #[error("Unknown method: {0:?}")]
    UnknownMethod(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;

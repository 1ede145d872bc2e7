//! Error types for the daemon layer.
//!
//! Accepting-side errors ([`ServeError`]) only ever end the one connection
//! they happened on. Initiating-side errors ([`JoinError`]) are fatal to node
//! startup.

use join_core::{CodecError, Method};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Write failed: {0}")]
    Write(#[source] io::Error),

    #[error("Read failed: {0}")]
    Read(#[source] io::Error),

    #[error("Connection closed before a complete message was received")]
    Closed,

    #[error("Message exceeds max size ({size} > {max})")]
    MessageTooLarge { size: usize, max: usize },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Invalid reply: {0}")]
    InvalidReply(#[source] CodecError),

    #[error("Unexpected reply: expected {expected}, got {got}")]
    UnexpectedReply { expected: Method, got: Method },
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Unhandled method: {0}")]
    UnhandledMethod(Method),
}

/// Why an accepted connection was closed without a reply.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Handler(#[from] HandlerError),
}

#[derive(Debug, Error)]
pub enum JoinError {
    #[error("Failed bootstrap introduction to {addr}: {source}")]
    Bootstrap {
        addr: String,
        #[source]
        source: TransportError,
    },

    #[error("Failed introduction to parent {addr}: {source}")]
    Parent {
        addr: String,
        #[source]
        source: TransportError,
    },

    #[error("Parent {addr} rejected introduction")]
    Rejected { addr: String },
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to listen on {addr}: {source}")]
    Listen {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Join(#[from] JoinError),
}

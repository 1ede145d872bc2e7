//! join-core: Shared wire protocol and registry logic for the chain join protocol.
//!
//! This crate provides the I/O-free pieces used by both the bootstrap and
//! the nodes:
//! - Message envelope, typed payloads and the encode/decode/dispatch codec
//! - The bootstrap registry and its parent-assignment rule

pub mod error;
pub mod protocol;
pub mod registry;

pub use error::CodecError;
pub use protocol::{
    Envelope, Method, NodeIntroduction, NodeIntroductionResponse, OkResponse, Payload,
    WireMessage,
};
pub use registry::Registry;

//! Protocol definitions for the chain join protocol.
//!
//! This module defines the wire protocol between bootstrap and nodes:
//! - Typed payloads and their method tags
//! - The `{method, params}` JSON envelope and its codec

pub mod envelope;
pub mod messages;

pub use envelope::{decode, dispatch, encode, Envelope};
pub use messages::{
    Method, NodeIntroduction, NodeIntroductionResponse, OkResponse, Payload, WireMessage,
};

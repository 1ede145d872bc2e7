//! Wire envelope and codec.
//!
//! Wire format: `{"method":"introduction","params":{"addr":"127.0.0.1:4000"}}`
//!
//! Decoding happens in two steps. [`decode`] only parses the outer envelope
//! and leaves `params` untouched; [`dispatch`] resolves the method tag and
//! parses `params` into the matching [`Payload`] variant.

use super::messages::{
    Method, NodeIntroduction, NodeIntroductionResponse, OkResponse, Payload, WireMessage,
};
use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A decoded envelope whose params have not been interpreted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub method: String,
    pub params: Value,
}

impl Envelope {
    /// Resolve the tag and parse the params. See [`dispatch`].
    pub fn dispatch(self) -> Result<Payload> {
        dispatch(&self.method, self.params)
    }
}

/// Borrowing counterpart of [`Envelope`] used on the encode path.
#[derive(Serialize)]
struct OutgoingEnvelope<'a, T> {
    method: Method,
    params: &'a T,
}

fn encode_as<T: Serialize>(method: Method, params: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(&OutgoingEnvelope { method, params })
        .map_err(|source| CodecError::Encoding { method, source })
}

/// Serialize a payload together with its canonical method tag.
pub fn encode(payload: &Payload) -> Result<Vec<u8>> {
    match payload {
        Payload::Introduction(msg) => encode_as(NodeIntroduction::METHOD, msg),
        Payload::IntroductionResponse(msg) => encode_as(NodeIntroductionResponse::METHOD, msg),
        Payload::Ok(msg) => encode_as(OkResponse::METHOD, msg),
    }
}

/// Parse the outer envelope only.
pub fn decode(data: &[u8]) -> Result<Envelope> {
    serde_json::from_slice(data).map_err(CodecError::Decoding)
}

/// Parse `params` into the payload variant registered for `method`.
pub fn dispatch(method: &str, params: Value) -> Result<Payload> {
    let method: Method = method.parse()?;
    let payload = match method {
        Method::Introduction => serde_json::from_value(params).map(Payload::Introduction),
        Method::IntroductionResponse => {
            serde_json::from_value(params).map(Payload::IntroductionResponse)
        }
        Method::OkResponse => serde_json::from_value(params).map(Payload::Ok),
    };
    payload.map_err(CodecError::Decoding)
}

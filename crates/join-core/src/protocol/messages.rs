//! Join protocol message types.
//!
//! Every payload travels inside an [`Envelope`](super::Envelope) tagged with
//! its [`Method`]. The set of methods is closed: anything else is rejected
//! at dispatch time.

use crate::error::CodecError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Method tag carried in the envelope's `method` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Method {
    /// `"introduction"`: a process announcing its own address
    Introduction,
    /// `"introductionResponse"`: the bootstrap's parent assignment
    IntroductionResponse,
    /// `"okResponse"`: acknowledgement from a node
    OkResponse,
}

impl Method {
    /// Wire representation of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Introduction => "introduction",
            Method::IntroductionResponse => "introductionResponse",
            Method::OkResponse => "okResponse",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "introduction" => Ok(Method::Introduction),
            "introductionResponse" => Ok(Method::IntroductionResponse),
            "okResponse" => Ok(Method::OkResponse),
            other => Err(CodecError::UnknownMethod(other.to_string())),
        }
    }
}

/// Announces the sender's address. Sent node→bootstrap and node→node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIntroduction {
    pub addr: String,
}

impl NodeIntroduction {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }
}

/// The bootstrap's answer to an introduction.
///
/// `addr` is the assigned parent and is empty when `first` is set.
/// `nodes` is the registry as it stood right after the newcomer was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIntroductionResponse {
    pub addr: String,
    pub first: bool,
    pub nodes: Vec<String>,
}

impl NodeIntroductionResponse {
    /// The parent to attach to, or `None` for the root of the chain.
    pub fn parent(&self) -> Option<&str> {
        if self.first {
            None
        } else {
            Some(self.addr.as_str())
        }
    }
}

/// Generic acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn accepted() -> Self {
        Self { ok: true }
    }

    pub fn rejected() -> Self {
        Self { ok: false }
    }
}

/// Any payload the protocol knows how to carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Introduction(NodeIntroduction),
    IntroductionResponse(NodeIntroductionResponse),
    Ok(OkResponse),
}

impl Payload {
    /// Canonical tag for this variant.
    pub fn method(&self) -> Method {
        match self {
            Payload::Introduction(_) => Method::Introduction,
            Payload::IntroductionResponse(_) => Method::IntroductionResponse,
            Payload::Ok(_) => Method::OkResponse,
        }
    }
}

/// A typed payload bound to its method tag.
///
/// Lets callers decode a reply straight into the type they expect instead
/// of matching on [`Payload`] by hand.
pub trait WireMessage: Serialize + DeserializeOwned + Into<Payload> + Sized {
    const METHOD: Method;

    /// Narrow a dispatched payload to this type, handing it back on mismatch.
    fn from_payload(payload: Payload) -> Result<Self, Payload>;
}

impl WireMessage for NodeIntroduction {
    const METHOD: Method = Method::Introduction;

    fn from_payload(payload: Payload) -> Result<Self, Payload> {
        match payload {
            Payload::Introduction(msg) => Ok(msg),
            other => Err(other),
        }
    }
}

impl WireMessage for NodeIntroductionResponse {
    const METHOD: Method = Method::IntroductionResponse;

    fn from_payload(payload: Payload) -> Result<Self, Payload> {
        match payload {
            Payload::IntroductionResponse(msg) => Ok(msg),
            other => Err(other),
        }
    }
}

impl WireMessage for OkResponse {
    const METHOD: Method = Method::OkResponse;

    fn from_payload(payload: Payload) -> Result<Self, Payload> {
        match payload {
            Payload::Ok(msg) => Ok(msg),
            other => Err(other),
        }
    }
}

impl From<NodeIntroduction> for Payload {
    fn from(msg: NodeIntroduction) -> Self {
        Payload::Introduction(msg)
    }
}

impl From<NodeIntroductionResponse> for Payload {
    fn from(msg: NodeIntroductionResponse) -> Self {
        Payload::IntroductionResponse(msg)
    }
}

impl From<OkResponse> for Payload {
    fn from(msg: OkResponse) -> Self {
        Payload::Ok(msg)
    }
}

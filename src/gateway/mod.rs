//! Host Collection Gateway: the boundary between the overlay and whatever owns
//! the real tabs.
//!
//! Requests go out through [`HostGateway::submit`] tagged with a
//! [`RequestId`]; answers come back later as [`GatewayReply`] values on a
//! channel the host event loop drains. The overlay never blocks on a reply.
//!
//! Two hosts ship with the crate:
//! - [`MemoryGateway`]: an in-process tab store served by a worker thread
//! - [`StdioGateway`]: an external process speaking newline-delimited JSON

mod memory;
mod protocol;
mod stdio;


use crate::item::{Item, ItemId};
use std::fmt;

pub use memory::{MemoryGateway, TabStore};
pub use protocol::{decode_reply, encode_request, RequestKind, WireReply, WireRequest};
pub use stdio::StdioGateway;

/// Correlates a reply with the request that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayRequest {
    GetItems,
    SwitchTo { item_id: ItemId },
    Close { item_id: ItemId },
    TogglePin { item_id: ItemId, pinned: bool },
    GetZoom,
}

impl GatewayRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            GatewayRequest::GetItems => RequestKind::GetItems,
            GatewayRequest::SwitchTo { .. } => RequestKind::SwitchTo,
            GatewayRequest::Close { .. } => RequestKind::Close,
            GatewayRequest::TogglePin { .. } => RequestKind::TogglePin,
            GatewayRequest::GetZoom => RequestKind::GetZoom,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayResponse {
    Items(Vec<Item>),
    Zoom(f64),
    /// A mutation finished (successfully) on the host side.
    Ack,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No response, broken pipe, or host exited.
    Unavailable(String),
    /// A response arrived but did not carry what the request needs.
    Malformed(String),
    /// The host refused a mutation.
    Rejected(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Unavailable(msg) => write!(f, "gateway unavailable: {msg}"),
            GatewayError::Malformed(msg) => write!(f, "malformed gateway response: {msg}"),
            GatewayError::Rejected(msg) => write!(f, "host rejected request: {msg}"),
        }
    }
}

impl std::error::Error for GatewayError {}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayReply {
    pub id: RequestId,
    pub result: Result<GatewayResponse, GatewayError>,
}

impl GatewayReply {
    pub fn ok(id: RequestId, response: GatewayResponse) -> Self {
        Self {
            id,
            result: Ok(response),
        }
    }

    pub fn err(id: RequestId, error: GatewayError) -> Self {
        Self {
            id,
            result: Err(error),
        }
    }
}

/// Outbound half of the gateway. Replies are delivered out of band.
///
/// `submit` only fails when the request could not be handed to the host at
/// all; everything else arrives as a [`GatewayReply`]. `SwitchTo` is
/// fire-and-forget and hosts may skip replying to it.
pub trait HostGateway {
    fn submit(&mut self, id: RequestId, request: GatewayRequest) -> Result<(), GatewayError>;
}

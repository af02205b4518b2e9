//! Newline-delimited JSON spoken with an external host.
//!
//! Requests (overlay → host): `{"id": 3, "action": "getItems"}`
//! Replies (host → overlay): `{"id": 3, "items": [...]}`

use serde::{Deserialize, Deserializer, Serialize};

use super::{GatewayError, GatewayRequest, GatewayResponse, RequestId};
use crate::item::{Item, ItemId};
use crate::{log_debug, log_debug_content};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WireRequest {
    pub id: u64,
    #[serde(flatten)]
    pub action: WireAction,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "action")]
pub enum WireAction {
    #[serde(rename = "getItems")]
    GetItems,
    #[serde(rename = "switchTo")]
    SwitchTo {
        #[serde(rename = "itemId")]
        item_id: ItemId,
    },
    #[serde(rename = "close")]
    Close {
        #[serde(rename = "itemId")]
        item_id: ItemId,
    },
    #[serde(rename = "togglePin")]
    TogglePin {
        #[serde(rename = "itemId")]
        item_id: ItemId,
        #[serde(rename = "pinnedState")]
        pinned_state: bool,
    },
    #[serde(rename = "getZoom")]
    GetZoom,
}

/// Every field is optional; which ones must be present depends on the request.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WireReply {
    pub id: u64,
    #[serde(default, deserialize_with = "items_skipping_invalid")]
    pub items: Option<Vec<Item>>,
    #[serde(default)]
    pub zoom_factor: Option<f64>,
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One unreadable entry (no id, odd id type) costs that entry, not the list.
fn items_skipping_invalid<'de, D>(deserializer: D) -> Result<Option<Vec<Item>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .filter_map(|(idx, entry)| match serde_json::from_value::<Item>(entry.clone()) {
                Ok(item) => Some(item),
                Err(err) => {
                    log_debug(&format!("dropping host item at index {idx}: {err}"));
                    log_debug_content(&format!("dropped item: {entry}"));
                    None
                }
            })
            .collect()
    }))
}

/// Shape of the request a reply answers, kept so replies can be checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    GetItems,
    SwitchTo,
    Close,
    TogglePin,
    GetZoom,
}

impl RequestKind {
    /// Whether the host is expected to answer at all.
    pub fn expects_reply(self) -> bool {
        !matches!(self, RequestKind::SwitchTo)
    }
}

pub fn encode_request(id: RequestId, request: &GatewayRequest) -> serde_json::Result<String> {
    let action = match request {
        GatewayRequest::GetItems => WireAction::GetItems,
        GatewayRequest::SwitchTo { item_id } => WireAction::SwitchTo {
            item_id: item_id.clone(),
        },
        GatewayRequest::Close { item_id } => WireAction::Close {
            item_id: item_id.clone(),
        },
        GatewayRequest::TogglePin { item_id, pinned } => WireAction::TogglePin {
            item_id: item_id.clone(),
            pinned_state: *pinned,
        },
        GatewayRequest::GetZoom => WireAction::GetZoom,
    };
    serde_json::to_string(&WireRequest { id: id.0, action })
}

/// Interpret a reply in light of what was asked.
pub fn decode_reply(
    kind: RequestKind,
    reply: WireReply,
) -> Result<GatewayResponse, GatewayError> {
    if reply.ok == Some(false) {
        let message = reply
            .error
            .unwrap_or_else(|| "host reported failure".to_string());
        return Err(match kind {
            RequestKind::GetItems | RequestKind::GetZoom => GatewayError::Unavailable(message),
            _ => GatewayError::Rejected(message),
        });
    }
    match kind {
        RequestKind::GetItems => reply
            .items
            .map(GatewayResponse::Items)
            .ok_or_else(|| GatewayError::Malformed("reply has no item list".to_string())),
        RequestKind::GetZoom => match reply.zoom_factor {
            Some(zoom) if zoom.is_finite() && zoom > 0.0 => Ok(GatewayResponse::Zoom(zoom)),
            Some(zoom) => Err(GatewayError::Malformed(format!(
                "zoom factor out of range: {zoom}"
            ))),
            None => Err(GatewayError::Malformed(
                "reply has no zoom factor".to_string(),
            )),
        },
        RequestKind::SwitchTo | RequestKind::Close | RequestKind::TogglePin => {
            Ok(GatewayResponse::Ack)
        }
    }
}

//! Bridge wire protocol definitions.
//!
//! Protocol version 1. Every call the untrusted front-end makes into the
//! privileged host crosses the process boundary as a JSON frame.
//!
//! Frame types:
//! - `RequestFrame`  — front-end → host invoke call
//! - `ResponseFrame` — host → front-end invoke result
//! - `EventFrame`    — host → front-end server-push

use serde::{Deserialize, Serialize};

// ── Constants ────────────────────────────────────────────────────────────────

pub const PROTOCOL_VERSION: u32 = 1;

// ── Error codes ──────────────────────────────────────────────────────────────

pub mod error_codes {
    /// Channel is not in the allowlist; the call never reached a handler.
    pub const INVALID_CHANNEL: &str = "INVALID_CHANNEL";
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const UNAVAILABLE: &str = "UNAVAILABLE";
}

// ── Error shape ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorShape {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl ErrorShape {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: None,
        }
    }

    /// The fail-closed rejection produced by the bridge gateway before any
    /// forwarding occurs. The `Invalid channel:` prefix is part of the
    /// observable contract; front-end callers key off of it.
    pub fn invalid_channel(channel: &str) -> Self {
        Self::new(
            error_codes::INVALID_CHANNEL,
            format!("Invalid channel: {channel}"),
        )
    }

    /// True when this error was raised by the boundary itself rather than
    /// inside a privileged operation.
    pub fn is_validation(&self) -> bool {
        self.code == error_codes::INVALID_CHANNEL
    }
}

// ── Channels ─────────────────────────────────────────────────────────────────

/// Call pattern a channel is used with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelDirection {
    /// Request/response.
    Invoke,
    /// Fire-and-forget.
    Send,
    /// Event subscription.
    On,
}

/// A parsed `<namespace>:<action>` channel identifier.
///
/// Parsing is a convenience for introspection only; allowlist membership is
/// always decided on the raw string with exact byte equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Channel {
    raw: String,
    colon: usize,
}

impl Channel {
    pub fn parse(raw: &str) -> Result<Self, ErrorShape> {
        match raw.split_once(':') {
            Some((namespace, action)) if !namespace.is_empty() && !action.is_empty() => Ok(Self {
                raw: raw.to_string(),
                colon: namespace.len(),
            }),
            _ => Err(ErrorShape::new(
                error_codes::INVALID_REQUEST,
                format!("malformed channel: {raw}"),
            )),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.raw[..self.colon]
    }

    pub fn action(&self) -> &str {
        &self.raw[self.colon + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

// ── Frames ───────────────────────────────────────────────────────────────────

/// Front-end → host invoke call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestFrame {
    pub r#type: String, // always "req"
    pub id: String,
    pub channel: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<serde_json::Value>,
}

impl RequestFrame {
    pub fn new(
        id: impl Into<String>,
        channel: impl Into<String>,
        args: Vec<serde_json::Value>,
    ) -> Self {
        Self {
            r#type: "req".into(),
            id: id.into(),
            channel: channel.into(),
            args,
        }
    }
}

/// Host → front-end invoke result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseFrame {
    pub r#type: String, // always "res"
    pub id: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorShape>,
}

impl ResponseFrame {
    pub fn ok(id: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            r#type: "res".into(),
            id: id.into(),
            ok: true,
            payload: Some(payload),
            error: None,
        }
    }

    pub fn err(id: impl Into<String>, error: ErrorShape) -> Self {
        Self {
            r#type: "res".into(),
            id: id.into(),
            ok: false,
            payload: None,
            error: Some(error),
        }
    }
}

/// Host → front-end server-push event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventFrame {
    pub r#type: String, // always "event"
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
}

impl EventFrame {
    pub fn new(channel: impl Into<String>, payload: serde_json::Value, seq: u64) -> Self {
        Self {
            r#type: "event".into(),
            channel: channel.into(),
            payload: Some(payload),
            seq: Some(seq),
        }
    }
}

/// Discriminated union of all frame types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BridgeFrame {
    #[serde(rename = "req")]
    Request(RequestFrameInner),
    #[serde(rename = "res")]
    Response(ResponseFrameInner),
    #[serde(rename = "event")]
    Event(EventFrameInner),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestFrameInner {
    pub id: String,
    pub channel: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseFrameInner {
    pub id: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorShape>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventFrameInner {
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
}

// ── Feature advertisement ────────────────────────────────────────────────────

/// Sent by the host after the transport comes up so the front-end knows the
/// exact channel surface it may call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Features {
    pub channels: Vec<String>,
}

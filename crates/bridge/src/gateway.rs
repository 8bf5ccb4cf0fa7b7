//! Validate-before-forward dispatch for every privileged call.

use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use {
    tokio::sync::RwLock,
    tracing::{debug, warn},
};

use vaultdesk_protocol::{ErrorShape, Features, RequestFrame, ResponseFrame, error_codes};

use crate::{channels, registry::ChannelRegistry, services::BridgeServices};

// ── Types ────────────────────────────────────────────────────────────────────

/// Context passed to every channel handler.
pub struct ChannelContext {
    pub channel: String,
    /// Ordered argument list, forwarded verbatim from the caller.
    pub args: Vec<serde_json::Value>,
    pub services: Arc<BridgeServices>,
}

/// The result a channel handler produces.
pub type ChannelResult = Result<serde_json::Value, ErrorShape>;

/// A shared async channel handler. `Arc` rather than `Box` so fire-and-forget
/// sends can run the handler on a spawned task.
pub type HandlerFn =
    Arc<dyn Fn(ChannelContext) -> Pin<Box<dyn Future<Output = ChannelResult> + Send>> + Send + Sync>;

/// Callback invoked for every host-side event pushed on a subscribed channel.
pub type ListenerFn = Arc<dyn Fn(serde_json::Value) + Send + Sync>;

type ListenerMap = HashMap<String, HashMap<u64, ListenerFn>>;

/// Handle returned by [`BridgeGateway::on`]; removes the listener again.
pub struct Subscription {
    channel: String,
    id: u64,
    listeners: Arc<RwLock<ListenerMap>>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &self.channel)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Subscription {
    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub async fn unsubscribe(self) {
        let mut map = self.listeners.write().await;
        if let Some(entry) = map.get_mut(&self.channel) {
            entry.remove(&self.id);
            if entry.is_empty() {
                map.remove(&self.channel);
            }
        }
    }
}

// ── Gateway ──────────────────────────────────────────────────────────────────

/// The single entry point exposed to the untrusted front-end.
///
/// Invariant: `invoke`, `send` and `on` all check the allowlist before doing
/// anything else. There is no trusted call path that skips the check, and the
/// check never suspends, so a rejected channel fails without waiting on the
/// host side.
pub struct BridgeGateway {
    registry: ChannelRegistry,
    services: Arc<BridgeServices>,
    handlers: HashMap<String, HandlerFn>,
    listeners: Arc<RwLock<ListenerMap>>,
    next_listener_id: AtomicU64,
}

impl Default for BridgeGateway {
    fn default() -> Self {
        Self::new(BridgeServices::default())
    }
}

impl BridgeGateway {
    pub fn new(services: BridgeServices) -> Self {
        let mut gateway = Self {
            registry: ChannelRegistry::new(),
            services: Arc::new(services),
            handlers: HashMap::new(),
            listeners: Arc::new(RwLock::new(HashMap::new())),
            next_listener_id: AtomicU64::new(1),
        };
        channels::register_vault(&mut gateway);
        channels::register_vercel(&mut gateway);
        gateway
    }

    pub(crate) fn register(&mut self, channel: impl Into<String>, handler: HandlerFn) {
        self.handlers.insert(channel.into(), handler);
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    /// Sorted list of channels the front-end may call.
    pub fn channel_names(&self) -> Vec<&'static str> {
        self.registry.channel_names()
    }

    /// Request/response call form. Validation happens before the first await
    /// point; a channel outside the allowlist is rejected with
    /// `Invalid channel: <channel>` and no handler is ever reached.
    pub async fn invoke(&self, channel: &str, args: Vec<serde_json::Value>) -> ChannelResult {
        let handler = self.validated_handler(channel)?;
        let ctx = ChannelContext {
            channel: channel.to_string(),
            args,
            services: self.services.clone(),
        };

        debug!(channel, "dispatching channel");
        match handler(ctx).await {
            Ok(payload) => {
                debug!(channel, "channel ok");
                Ok(payload)
            },
            Err(err) => {
                warn!(channel, code = %err.code, msg = %err.message, "channel error");
                Err(err)
            },
        }
    }

    /// Fire-and-forget call form. Validation is identical to `invoke` and the
    /// failure is returned synchronously; on success the handler runs on a
    /// spawned task and its outcome is discarded.
    ///
    /// Must be called from within a tokio runtime.
    pub fn send(&self, channel: &str, args: Vec<serde_json::Value>) -> Result<(), ErrorShape> {
        let handler = self.validated_handler(channel)?.clone();
        let ctx = ChannelContext {
            channel: channel.to_string(),
            args,
            services: self.services.clone(),
        };

        debug!(channel, "dispatching send channel");
        let channel = channel.to_string();
        tokio::spawn(async move {
            if let Err(err) = handler(ctx).await {
                warn!(channel = %channel, code = %err.code, msg = %err.message, "send channel error");
            }
        });
        Ok(())
    }

    /// Event-subscription call form. Validation is identical to `invoke`; a
    /// rejected channel registers nothing.
    pub async fn on(&self, channel: &str, listener: ListenerFn) -> Result<Subscription, ErrorShape> {
        if !self.registry.is_allowed(channel) {
            warn!(channel, "rejected channel");
            return Err(ErrorShape::invalid_channel(channel));
        }

        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .write()
            .await
            .entry(channel.to_string())
            .or_default()
            .insert(id, listener);
        debug!(channel, id, "listener registered");

        Ok(Subscription {
            channel: channel.to_string(),
            id,
            listeners: self.listeners.clone(),
        })
    }

    /// Host-side push to every live listener on `channel`. Returns the number
    /// of listeners reached. Pushes on unregistered channels are dropped; the
    /// allowlist gates both directions.
    pub async fn emit(&self, channel: &str, payload: serde_json::Value) -> usize {
        if !self.registry.is_allowed(channel) {
            warn!(channel, "dropping event on rejected channel");
            return 0;
        }

        let map = self.listeners.read().await;
        let Some(entry) = map.get(channel) else {
            return 0;
        };
        for listener in entry.values() {
            listener(payload.clone());
        }
        entry.len()
    }

    /// Channel surface advertised to the front-end after the transport
    /// comes up.
    pub fn features(&self) -> Features {
        Features {
            channels: self
                .channel_names()
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
        }
    }

    /// Wire-level entry point used by the transport layer.
    pub async fn handle_frame(&self, frame: RequestFrame) -> ResponseFrame {
        match self.invoke(&frame.channel, frame.args).await {
            Ok(payload) => ResponseFrame::ok(&frame.id, payload),
            Err(err) => ResponseFrame::err(&frame.id, err),
        }
    }

    /// The one gate: allowlist membership first, then handler lookup. Kept
    /// synchronous so rejection cannot be reordered past a suspension point.
    fn validated_handler(&self, channel: &str) -> Result<&HandlerFn, ErrorShape> {
        if !self.registry.is_allowed(channel) {
            warn!(channel, "rejected channel");
            return Err(ErrorShape::invalid_channel(channel));
        }
        self.handlers.get(channel).ok_or_else(|| {
            warn!(channel, "no handler registered");
            ErrorShape::new(
                error_codes::UNAVAILABLE,
                format!("no handler registered for channel: {channel}"),
            )
        })
    }
}

//! Bridge gateway: the single privileged-call entry point between the
//! untrusted front-end process and the host.
//!
//! Every call is validated against the channel allowlist before anything
//! else happens. A channel that is not registered fails closed with
//! `Invalid channel: <channel>` and never reaches a handler.
//!
//! All domain logic (vault, deployments) lives behind the service traits in
//! `vaultdesk-service-traits` and is invoked through channel handlers
//! registered in `channels.rs`.

pub mod channels;
pub mod gateway;
pub mod registry;
pub mod services;

pub use {
    gateway::{BridgeGateway, ChannelContext, ChannelResult, HandlerFn, ListenerFn, Subscription},
    registry::{ChannelRegistry, VAULT_CHANNELS, VERCEL_CHANNELS},
    services::BridgeServices,
};

//! Privilege boundary between the embedded page and the host process.
//!
//! The page can only reach host capabilities through a fixed allow-list of
//! named channels ([`Channel`]). [`Bridge`] decodes each request, runs it
//! against the host traits, the user store, the cookie jar or the
//! notification emitter, and hands back either a value or an error.

pub mod bridge;
pub mod channel;
pub mod cookies;
pub mod lifecycle;
pub mod request;
pub mod theme;
pub mod window;

pub use bridge::Bridge;
pub use channel::{Channel, ChannelKind};
pub use cookies::{CookieError, CookieFilter, CookieJar, CookieRecord, SameSite};
pub use lifecycle::{Lifecycle, Stage, StageSignal, Transition};
pub use request::Request;
pub use theme::{ThemeHost, ThemeSource, ThemeState};
pub use window::WindowHost;

use user_store::StoreError;

/// Failure inside a host capability (windows, theme).
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Window not found: {0}")]
    WindowNotFound(String),

    #[error("Host error: {0}")]
    Backend(String),
}

/// Error returned to the page for a request/response channel.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    #[error("Channel {0} does not return a response")]
    NotInvokable(&'static str),

    #[error("Invalid payload for {channel}: {reason}")]
    InvalidPayload {
        channel: &'static str,
        reason: String,
    },

    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Cookie(#[from] CookieError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Host(#[from] HostError),
}

#[cfg(test)]
mod tests;

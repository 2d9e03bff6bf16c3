//! Local desktop notifications with templated, randomized content.
//!
//! The catalog is compiled in and grouped by [`Category`]. Templates carry
//! `{name}` placeholders that [`populate`] fills from live application state
//! plus caller overrides, and [`Emitter`] hands the result to an OS
//! [`NotificationSink`].

pub mod catalog;
pub mod emitter;
pub mod placeholder;
pub mod populate;

pub use catalog::{Category, NotificationTemplate, get_templates, list_categories};
pub use emitter::{Emitter, NotificationSink};
pub use placeholder::{Placeholder, PopulateContext};
pub use populate::{PopulatedNotification, populate};

/// Catalog lookup error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Unknown notification category: {0}")]
    UnknownCategory(String),
}

/// Failure reported by a notification sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Notifications are not supported on this system")]
    Unsupported,

    #[error("Notification backend error: {0}")]
    Backend(String),
}

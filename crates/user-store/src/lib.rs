//! Persisted user profile and activity record.
//!
//! One JSON document per install. Loading merges whatever is on disk over
//! the defaults, and anything unreadable is replaced by the defaults and
//! written straight back.

pub mod merge;
pub mod model;
pub mod store;

pub use model::{Activity, ActivityKind, AppInfo, Profile, UserState};
pub use store::UserStore;

/// File name of the persisted state inside the app data directory.
pub const USER_DATA_FILE: &str = "userData.json";

/// User store error type.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed user data: {0}")]
    Malformed(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Unknown activity kind: {0}")]
    UnknownActivityKind(String),
}

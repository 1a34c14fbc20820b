use serde::{Deserialize, Serialize};

use super::domain::GeoPosition;

/// Transient message kinds matching the toast surface the form drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

/// One fire-and-forget notification. Delivery transport is entirely the
/// sink's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// Outbound notification hook (toast adapter, log bridge, test recorder).
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification) -> Result<(), NotificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Post-completion navigation hook. Invoked at most once per session, after
/// the completion notification has had time to surface.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str) -> Result<(), NavigationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("navigation target unavailable: {0}")]
    Unavailable(String),
}

/// Single-shot position capability with exactly two outcomes. Only one
/// request is ever in flight per session by convention, so no cancellation
/// semantics are modeled.
pub trait GeolocationProvider: Send + Sync {
    fn current_position(&self) -> Result<GeoPosition, GeolocationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GeolocationError {
    #[error("geolocation is not supported in this environment")]
    Unsupported,
    #[error("failed to fetch location: {0}")]
    Failed(String),
}

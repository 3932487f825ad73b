//! Bridge error types

use thiserror::Error;

/// Errors reported by a broadcast host backend.
#[derive(Error, Debug)]
pub enum HostError {
    /// No live registration matches the handle.
    #[error("receiver is not registered")]
    NotRegistered,

    /// The platform rejected the registration.
    #[error("registration failed: {0}")]
    RegistrationFailed(String),

    /// Backend-specific failure (JNI attach, missing class, ...).
    #[error("broadcast host error: {0}")]
    Platform(String),
}

/// Errors reported by the scan bridge.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// `subscribe` was called while the stream already has its subscriber.
    #[error("scan stream already has a subscriber")]
    AlreadySubscribed,

    /// The underlying broadcast host failed.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Result type for bridge operations
pub type Result<T, E = BridgeError> = std::result::Result<T, E>;

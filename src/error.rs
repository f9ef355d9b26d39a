use thiserror::Error;

/// Errors surfaced by storage gateways and engine initialization.
///
/// Cookie codec failures are deliberately not part of this taxonomy: the
/// codec reports failure through `false`/`None` sentinels and never returns
/// an error to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The storage backend refused a write because its quota is exhausted.
    #[error("Storage quota exceeded")]
    StorageQuotaExceeded,

    /// The storage backend denied access (security restriction).
    #[error("Storage access denied: {message}")]
    StorageAccessDenied { message: String },

    /// The host environment lacks a working cookie channel.
    ///
    /// Reserved for external [`StorageGateway`](crate::storage::StorageGateway)
    /// and jar implementations; the in-memory backends never produce it.
    #[error("Environment unsupported: cookie jar is not writable")]
    EnvironmentUnsupported,

    /// Any other backend-specific failure. Like
    /// [`StorageAccessDenied`](SyncError::StorageAccessDenied), this exists
    /// for external [`StorageGateway`](crate::storage::StorageGateway)
    /// implementations (a browser-backed gateway surfaces `SecurityError`
    /// and friends here); the engine treats every variant the same way,
    /// logging it and moving on or handing it back unchanged.
    #[error("Storage backend error: {message}")]
    Backend { message: String },
}

impl SyncError {
    /// Convenience constructor for gateway implementations.
    pub fn access_denied(message: impl Into<String>) -> Self {
        SyncError::StorageAccessDenied {
            message: message.into(),
        }
    }

    /// Convenience constructor for gateway implementations.
    pub fn backend(message: impl Into<String>) -> Self {
        SyncError::Backend {
            message: message.into(),
        }
    }
}

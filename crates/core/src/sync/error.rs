//! Sync error taxonomy.

use thiserror::Error;

/// Errors that can occur during external synchronization.
///
/// Per-record import failures are NOT errors: they are collected as
/// [`super::import::RecordFailure`] values and the run continues. Only
/// transport and parse failures abort a whole run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Connection or timeout talking to the external system.
    #[error("External transport error: {0}")]
    Transport(String),

    /// The external document could not be parsed.
    #[error("Failed to parse external document: {0}")]
    Parse(String),

    /// Another sync run is already in progress; request rejected, not queued.
    #[error("Sync already in progress")]
    AlreadySyncing,

    /// Synchronization is disabled in the configuration.
    #[error("Synchronization is disabled")]
    Disabled,
}

impl SyncError {
    /// Returns the error code for API responses and run records.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "EXTERNAL_TRANSPORT_ERROR",
            Self::Parse(_) => "PARSE_ERROR",
            Self::AlreadySyncing => "ALREADY_SYNCING",
            Self::Disabled => "SYNC_DISABLED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Transport(_) | Self::Parse(_) => 502,
            Self::AlreadySyncing => 409,
            Self::Disabled => 422,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SyncError::Transport("timeout".into()).error_code(),
            "EXTERNAL_TRANSPORT_ERROR"
        );
        assert_eq!(SyncError::AlreadySyncing.error_code(), "ALREADY_SYNCING");
        assert_eq!(SyncError::Disabled.error_code(), "SYNC_DISABLED");
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(SyncError::Transport(String::new()).http_status_code(), 502);
        assert_eq!(SyncError::AlreadySyncing.http_status_code(), 409);
        assert_eq!(SyncError::Disabled.http_status_code(), 422);
    }
}

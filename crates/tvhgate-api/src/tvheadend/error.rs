//! Backend failure taxonomy.

use std::fmt;

/// Coarse classification of a backend failure.
///
/// Drives the retention policy at the refresh boundary: every kind keeps the
/// last published data, only the log severity differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network failure, timeout, or server-side (5xx) error.
    BackendUnavailable,
    /// Credentials rejected by the backend.
    BackendAuth,
    /// Response was not the expected JSON/XML shape.
    BackendProtocol,
}

impl ErrorKind {
    /// Stable identifier used in structured log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BackendUnavailable => "backend_unavailable",
            Self::BackendAuth => "backend_auth",
            Self::BackendProtocol => "backend_protocol",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by backend requests.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend could not be reached or did not answer in time.
    #[error("backend unavailable ({endpoint}): {reason}")]
    Unavailable {
        /// Endpoint path that was requested.
        endpoint: String,
        /// Human-readable cause.
        reason: String,
    },
    /// The backend rejected the configured credentials.
    #[error("backend rejected credentials ({endpoint}): HTTP {status}")]
    Auth {
        /// Endpoint path that was requested.
        endpoint: String,
        /// HTTP status returned by the backend.
        status: u16,
    },
    /// The backend answered with something other than the expected payload.
    #[error("backend protocol error ({endpoint}): {reason}")]
    Protocol {
        /// Endpoint path that was requested.
        endpoint: String,
        /// Human-readable cause.
        reason: String,
    },
}

impl BackendError {
    /// Returns the failure classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unavailable { .. } => ErrorKind::BackendUnavailable,
            Self::Auth { .. } => ErrorKind::BackendAuth,
            Self::Protocol { .. } => ErrorKind::BackendProtocol,
        }
    }

    pub(crate) fn unavailable(endpoint: &str, reason: impl fmt::Display) -> Self {
        Self::Unavailable {
            endpoint: String::from(endpoint),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn protocol(endpoint: &str, reason: impl fmt::Display) -> Self {
        Self::Protocol {
            endpoint: String::from(endpoint),
            reason: reason.to_string(),
        }
    }
}

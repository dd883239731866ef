//! Refresh cycle errors and the failure record kept in snapshots.

use std::fmt;

use chrono::{DateTime, Utc};
use tvhgate_api::tvheadend::{BackendError, ErrorKind};

use crate::guide::GuideError;

/// Which published value a refresh step produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshTarget {
    /// Channel lineup.
    Lineup,
    /// Program guide.
    Guide,
}

impl RefreshTarget {
    /// Lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lineup => "lineup",
            Self::Guide => "guide",
        }
    }
}

impl fmt::Display for RefreshTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why one step of a refresh cycle failed.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum RefreshError {
    /// The backend could not be reached or answered badly.
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// The guide payload could not be transformed.
    #[error(transparent)]
    Guide(#[from] GuideError),
    /// The transformation task was cancelled or panicked.
    #[error("guide transformation did not complete: {0}")]
    TransformAborted(#[from] tokio::task::JoinError),
}

impl RefreshError {
    /// Classification of the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Backend(err) => err.kind(),
            Self::Guide(err) => err.kind(),
            Self::TransformAborted(_) => ErrorKind::BackendProtocol,
        }
    }
}

/// Most recent failed refresh step, surfaced to operators.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct RefreshFailure {
    /// Step that failed.
    pub target: RefreshTarget,
    /// Failure classification.
    pub kind: ErrorKind,
    /// Human-readable cause.
    pub message: String,
    /// When the failure was recorded.
    pub at: DateTime<Utc>,
}

impl RefreshFailure {
    /// Records `err` as the failure of `target`, timestamped now.
    #[must_use]
    pub fn new(target: RefreshTarget, err: &RefreshError) -> Self {
        Self {
            target,
            kind: err.kind(),
            message: err.to_string(),
            at: Utc::now(),
        }
    }
}

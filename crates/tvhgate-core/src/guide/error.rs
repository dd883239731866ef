//! Guide transformation errors and non-fatal warnings.

use std::fmt;

use tvhgate_api::tvheadend::ErrorKind;

/// Fatal guide transformation error. The refresh cycle keeps the previously
/// published guide when one of these occurs.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum GuideError {
    /// The backend document is not parseable XMLTV.
    #[error("XMLTV document could not be parsed: {0}")]
    Parse(String),

    /// A programme references a channel id that no `<channel>` declares.
    #[error("programme references unknown channel '{channel}'")]
    UnresolvedChannel {
        /// The unresolved backend channel id.
        channel: String,
    },

    /// The transformed document could not be written back out.
    #[error("XMLTV document could not be serialized: {0}")]
    Serialize(String),
}

impl GuideError {
    /// All guide errors stem from malformed backend payloads.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::BackendProtocol
    }
}

/// Condition noticed during transformation that does not stop the cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum GuideWarning {
    /// Two backend channels map to the same device number.
    DuplicateChannelNumber {
        /// The shared number.
        number: String,
        /// Backend id that claimed the number first.
        first_id: String,
        /// Backend id that claimed it again.
        duplicate_id: String,
    },
    /// One backend id is listed twice with different numbers. Its programmes
    /// stay on the first number.
    DuplicateChannelId {
        /// Backend channel id.
        id: String,
        /// Number the id resolves to.
        first_number: String,
        /// Number of the later listing.
        later_number: String,
    },
    /// A channel declares no numeric display name; its backend id is kept.
    MissingChannelNumber {
        /// Backend channel id.
        id: String,
    },
    /// A channel had no programmes and was filled with placeholders.
    MissingProgrammes {
        /// Device channel number.
        number: String,
        /// Channel display name used for the placeholder titles.
        name: String,
    },
}

impl fmt::Display for GuideWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateChannelNumber {
                number,
                first_id,
                duplicate_id,
            } => write!(
                f,
                "channel number {number} used by both {first_id} and {duplicate_id}"
            ),
            Self::DuplicateChannelId {
                id,
                first_number,
                later_number,
            } => write!(
                f,
                "channel {id} listed as both {first_number} and {later_number}"
            ),
            Self::MissingChannelNumber { id } => {
                write!(f, "channel {id} has no channel number")
            }
            Self::MissingProgrammes { number, name } => {
                write!(f, "no programmes for channel {number} ({name})")
            }
        }
    }
}

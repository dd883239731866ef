//! Tvheadend response types and custom deserializers.

use serde::{Deserialize, Deserializer};

/// Channel record from `api/channel/grid`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[allow(clippy::module_name_repetitions)]
pub struct TvhChannel {
    /// Backend-native identifier (`uuid`; older exports use `id`).
    #[serde(rename = "uuid", alias = "id")]
    pub id: String,
    /// Device-facing channel number (`""` when the backend has none).
    #[serde(deserialize_with = "deserialize_channel_number", default)]
    pub number: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Whether the channel should appear in the lineup.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

/// Channel number as it appears on the wire.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireNumber {
    Integer(u64),
    Float(f64),
    Text(String),
}

/// Deserializes a channel number given as integer, float, string or `null`
/// into its string form.
fn deserialize_channel_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<WireNumber> = Option::deserialize(deserializer)?;
    Ok(match raw {
        None => String::new(),
        Some(WireNumber::Integer(n)) => n.to_string(),
        Some(WireNumber::Float(f)) => f.to_string(),
        Some(WireNumber::Text(s)) => String::from(s.trim()),
    })
}

/// `api/channel/grid` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct ChannelGridResponse {
    /// Channel entries.
    pub entries: Vec<TvhChannel>,
    /// Total number of channels known to the backend.
    #[serde(default)]
    pub total: Option<u64>,
}

/// Well-formed XMLTV payload as returned by `xmltv/channels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawXmlDocument(String);

impl RawXmlDocument {
    /// Wraps an XML string without validation.
    #[must_use]
    pub fn new(xml: impl Into<String>) -> Self {
        Self(xml.into())
    }

    /// Returns the XML text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the document, returning the XML text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for RawXmlDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

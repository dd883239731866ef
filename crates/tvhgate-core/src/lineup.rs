//! Lineup construction from backend channel records.

use serde::Serialize;
use tvhgate_api::tvheadend::TvhChannel;

/// One device-facing lineup row, serialized with the HDHomeRun field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct LineupEntry {
    /// Channel number as shown to clients.
    #[serde(rename = "GuideNumber")]
    pub guide_number: String,
    /// Channel display name.
    #[serde(rename = "GuideName")]
    pub guide_name: String,
    /// Stream location for this channel.
    #[serde(rename = "URL")]
    pub url: String,
}

/// Parameters embedded into every stream URL.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct LineupSettings {
    /// Base URL streams are served from (usually the backend URL).
    pub stream_base_url: String,
    /// Streaming profile name.
    pub profile: String,
    /// Subscription weight.
    pub weight: u32,
}

impl LineupSettings {
    /// Builds the stream URL for a backend channel id.
    #[must_use]
    pub fn stream_url(&self, channel_id: &str) -> String {
        format!(
            "{}/stream/channel/{channel_id}?profile={}&weight={}",
            self.stream_base_url.trim_end_matches('/'),
            self.profile,
            self.weight
        )
    }
}

/// Builds the lineup from backend channel records.
///
/// Disabled channels are dropped; enabled channels keep their backend order.
/// Duplicate numbers are passed through unchanged.
#[must_use]
pub fn build_lineup(channels: &[TvhChannel], settings: &LineupSettings) -> Vec<LineupEntry> {
    channels
        .iter()
        .filter(|channel| channel.enabled)
        .map(|channel| LineupEntry {
            guide_number: channel.number.clone(),
            guide_name: channel.name.clone(),
            url: settings.stream_url(&channel.id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn channel(id: &str, number: &str, name: &str, enabled: bool) -> TvhChannel {
        TvhChannel {
            id: String::from(id),
            number: String::from(number),
            name: String::from(name),
            enabled,
        }
    }

    fn settings() -> LineupSettings {
        LineupSettings {
            stream_base_url: String::from("http://tvh:9981/"),
            profile: String::from("pass"),
            weight: 300,
        }
    }

    #[test]
    fn test_build_lineup_skips_disabled_channels() {
        // Arrange
        let channels = vec![
            channel("a1", "5", "Five", true),
            channel("a2", "6", "Six", false),
        ];

        // Act
        let lineup = build_lineup(&channels, &settings());

        // Assert
        assert_eq!(
            lineup,
            vec![LineupEntry {
                guide_number: String::from("5"),
                guide_name: String::from("Five"),
                url: String::from("http://tvh:9981/stream/channel/a1?profile=pass&weight=300"),
            }]
        );
    }

    #[test]
    fn test_build_lineup_keeps_order_and_duplicates() {
        // Arrange
        let channels = vec![
            channel("c", "7", "Seven", true),
            channel("a", "2", "Two", true),
            channel("b", "7", "Seven HD", true),
        ];

        // Act
        let numbers: Vec<String> = build_lineup(&channels, &settings())
            .into_iter()
            .map(|entry| entry.guide_number)
            .collect();

        // Assert
        assert_eq!(numbers, vec!["7", "2", "7"]);
    }

    #[test]
    fn test_build_lineup_empty_when_all_disabled() {
        let channels = vec![channel("a", "1", "One", false)];

        assert!(build_lineup(&channels, &settings()).is_empty());
    }

    #[test]
    fn test_stream_url_without_trailing_slash() {
        // Arrange
        let settings = LineupSettings {
            stream_base_url: String::from("http://tvh:9981"),
            profile: String::from("webtv-h264"),
            weight: 10,
        };

        // Act
        let url = settings.stream_url("abc");

        // Assert
        assert_eq!(
            url,
            "http://tvh:9981/stream/channel/abc?profile=webtv-h264&weight=10"
        );
    }

    #[test]
    fn test_lineup_entry_json_field_names() {
        // Arrange
        let entry = LineupEntry {
            guide_number: String::from("101"),
            guide_name: String::from("News"),
            url: String::from("http://x/stream/channel/c1?profile=pass&weight=300"),
        };

        // Act
        let json = serde_json::to_value(&entry).unwrap();

        // Assert
        assert_eq!(json["GuideNumber"], "101");
        assert_eq!(json["GuideName"], "News");
        assert_eq!(
            json["URL"],
            "http://x/stream/channel/c1?profile=pass&weight=300"
        );
    }
}

//! Serde model of the XMLTV elements the gateway reads and writes.
//!
//! Covers every child the XMLTV DTD allows in `<channel>` and `<programme>`.
//! Field order follows the DTD so a parsed document serializes back in a form
//! strict consumers accept. Non-standard extension elements are not kept.

use serde::{Deserialize, Serialize};

/// `<tv>` root element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "tv")]
pub struct Xmltv {
    /// Date the listings were produced.
    #[serde(rename = "@date", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Source description URL.
    #[serde(
        rename = "@source-info-url",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_info_url: Option<String>,
    /// Source name.
    #[serde(
        rename = "@source-info-name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_info_name: Option<String>,
    /// Source data URL.
    #[serde(
        rename = "@source-data-url",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_data_url: Option<String>,
    /// Generator name.
    #[serde(
        rename = "@generator-info-name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub generator_info_name: Option<String>,
    /// Generator URL.
    #[serde(
        rename = "@generator-info-url",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub generator_info_url: Option<String>,
    /// Channel definitions.
    #[serde(rename = "channel", default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<XmltvChannel>,
    /// Programme listings.
    #[serde(rename = "programme", default, skip_serializing_if = "Vec::is_empty")]
    pub programmes: Vec<XmltvProgramme>,
}

/// `<channel>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmltvChannel {
    /// Channel identifier referenced by programmes.
    #[serde(rename = "@id")]
    pub id: String,
    /// Display names; the first is the primary name.
    #[serde(rename = "display-name", default, skip_serializing_if = "Vec::is_empty")]
    pub display_names: Vec<LangText>,
    /// Icons.
    #[serde(rename = "icon", default, skip_serializing_if = "Vec::is_empty")]
    pub icons: Vec<Icon>,
    /// Related URLs.
    #[serde(rename = "url", default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<String>,
}

impl XmltvChannel {
    /// First display name, or `""`.
    #[must_use]
    pub fn primary_name(&self) -> &str {
        self.display_names
            .first()
            .map_or("", |name| name.value.as_str())
    }
}

/// `<programme>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmltvProgramme {
    /// Start time.
    #[serde(rename = "@start")]
    pub start: String,
    /// Stop time.
    #[serde(rename = "@stop", default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
    /// Channel identifier.
    #[serde(rename = "@channel")]
    pub channel: String,
    /// Titles.
    #[serde(rename = "title", default, skip_serializing_if = "Vec::is_empty")]
    pub titles: Vec<LangText>,
    /// Episode titles.
    #[serde(rename = "sub-title", default, skip_serializing_if = "Vec::is_empty")]
    pub sub_titles: Vec<LangText>,
    /// Descriptions.
    #[serde(rename = "desc", default, skip_serializing_if = "Vec::is_empty")]
    pub descriptions: Vec<LangText>,
    /// Cast and crew.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<Credits>,
    /// Production date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Categories.
    #[serde(rename = "category", default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<LangText>,
    /// Keywords.
    #[serde(rename = "keyword", default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<LangText>,
    /// Spoken language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<LangText>,
    /// Original language.
    #[serde(
        rename = "orig-language",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub orig_language: Option<LangText>,
    /// Running time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<Length>,
    /// Icons.
    #[serde(rename = "icon", default, skip_serializing_if = "Vec::is_empty")]
    pub icons: Vec<Icon>,
    /// Related URLs.
    #[serde(rename = "url", default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<String>,
    /// Countries of production.
    #[serde(rename = "country", default, skip_serializing_if = "Vec::is_empty")]
    pub countries: Vec<LangText>,
    /// Episode numbers.
    #[serde(rename = "episode-num", default, skip_serializing_if = "Vec::is_empty")]
    pub episode_nums: Vec<EpisodeNum>,
    /// Picture details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<Video>,
    /// Sound details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<Audio>,
    /// Earlier airing.
    #[serde(
        rename = "previously-shown",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub previously_shown: Option<PreviouslyShown>,
    /// Premiere marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premiere: Option<LangText>,
    /// Last showing marker.
    #[serde(rename = "last-chance", default, skip_serializing_if = "Option::is_none")]
    pub last_chance: Option<LangText>,
    /// First showing of a new programme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<Marker>,
    /// Subtitle tracks.
    #[serde(rename = "subtitles", default, skip_serializing_if = "Vec::is_empty")]
    pub subtitles: Vec<Subtitles>,
    /// Content ratings.
    #[serde(rename = "rating", default, skip_serializing_if = "Vec::is_empty")]
    pub ratings: Vec<Rating>,
    /// Star ratings.
    #[serde(rename = "star-rating", default, skip_serializing_if = "Vec::is_empty")]
    pub star_ratings: Vec<Rating>,
    /// Reviews.
    #[serde(rename = "review", default, skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<Review>,
    /// Images.
    #[serde(rename = "image", default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,
}

impl XmltvProgramme {
    /// First title, or `""`.
    #[must_use]
    pub fn primary_title(&self) -> &str {
        self.titles.first().map_or("", |title| title.value.as_str())
    }
}

/// Text element with an optional `lang` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LangText {
    /// Language code.
    #[serde(rename = "@lang", default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Text value.
    #[serde(rename = "$text", default)]
    pub value: String,
}

impl LangText {
    /// Text without a language tag.
    #[must_use]
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            lang: None,
            value: value.into(),
        }
    }

    /// Text tagged with `lang`.
    #[must_use]
    pub fn tagged(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            lang: Some(lang.into()),
            value: value.into(),
        }
    }
}

/// `<icon>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    /// Image URL.
    #[serde(rename = "@src")]
    pub src: String,
    /// Width in pixels.
    #[serde(rename = "@width", default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    /// Height in pixels.
    #[serde(rename = "@height", default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

/// `<credits>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    /// Directors.
    #[serde(rename = "director", default, skip_serializing_if = "Vec::is_empty")]
    pub directors: Vec<String>,
    /// Actors.
    #[serde(rename = "actor", default, skip_serializing_if = "Vec::is_empty")]
    pub actors: Vec<Actor>,
    /// Writers.
    #[serde(rename = "writer", default, skip_serializing_if = "Vec::is_empty")]
    pub writers: Vec<String>,
    /// Adapters.
    #[serde(rename = "adapter", default, skip_serializing_if = "Vec::is_empty")]
    pub adapters: Vec<String>,
    /// Producers.
    #[serde(rename = "producer", default, skip_serializing_if = "Vec::is_empty")]
    pub producers: Vec<String>,
    /// Composers.
    #[serde(rename = "composer", default, skip_serializing_if = "Vec::is_empty")]
    pub composers: Vec<String>,
    /// Editors.
    #[serde(rename = "editor", default, skip_serializing_if = "Vec::is_empty")]
    pub editors: Vec<String>,
    /// Presenters.
    #[serde(rename = "presenter", default, skip_serializing_if = "Vec::is_empty")]
    pub presenters: Vec<String>,
    /// Commentators.
    #[serde(rename = "commentator", default, skip_serializing_if = "Vec::is_empty")]
    pub commentators: Vec<String>,
    /// Guests.
    #[serde(rename = "guest", default, skip_serializing_if = "Vec::is_empty")]
    pub guests: Vec<String>,
}

/// `<actor>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Role played.
    #[serde(rename = "@role", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Actor name.
    #[serde(rename = "$text", default)]
    pub name: String,
}

/// `<episode-num>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeNum {
    /// Numbering or rating system.
    #[serde(rename = "@system", default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Text value.
    #[serde(rename = "$text", default)]
    pub value: String,
}

/// `<previously-shown>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviouslyShown {
    /// Start time.
    #[serde(rename = "@start", default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// Channel identifier.
    #[serde(rename = "@channel", default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

/// `<length>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Length {
    /// `seconds`, `minutes` or `hours`.
    #[serde(rename = "@units", default)]
    pub units: String,
    /// Amount in `units`.
    #[serde(rename = "$text", default)]
    pub value: String,
}

/// `<video>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    /// `yes` or `no`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present: Option<String>,
    /// `yes` or `no`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
    /// Aspect ratio such as `16:9`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect: Option<String>,
    /// Picture quality such as `HDTV`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

/// `<audio>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audio {
    /// `yes` or `no`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present: Option<String>,
    /// `mono`, `stereo`, `dolby`, `dolby digital`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stereo: Option<String>,
}

/// Empty flag element such as `<new/>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {}

/// `<subtitles>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtitles {
    /// `teletext`, `onscreen` or `deaf-signed`.
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Subtitle language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<LangText>,
}

/// `<review>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// `text` or `url`.
    #[serde(rename = "@type", default)]
    pub kind: String,
    /// Publication the review appeared in.
    #[serde(rename = "@source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Reviewer name.
    #[serde(rename = "@reviewer", default, skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,
    /// Language code.
    #[serde(rename = "@lang", default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Review text or URL.
    #[serde(rename = "$text", default)]
    pub value: String,
}

/// `<image>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// `poster`, `backdrop`, `still`, `person` or `character`.
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Relative size, `1` to `3`.
    #[serde(rename = "@size", default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// `P` (portrait) or `L` (landscape).
    #[serde(rename = "@orient", default, skip_serializing_if = "Option::is_none")]
    pub orient: Option<String>,
    /// Source system.
    #[serde(rename = "@system", default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Image URL.
    #[serde(rename = "$text", default)]
    pub url: String,
}

/// `<rating>` and `<star-rating>` elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Numbering or rating system.
    #[serde(rename = "@system", default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Text value.
    #[serde(default)]
    pub value: String,
    /// Icons.
    #[serde(rename = "icon", default, skip_serializing_if = "Vec::is_empty")]
    pub icons: Vec<Icon>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_deserialize_backend_export() {
        // Arrange
        let xml = include_str!("../../../../fixtures/tvheadend/xmltv_channels.xml");

        // Act
        let tv: Xmltv = quick_xml::de::from_str(xml).unwrap();

        // Assert
        assert_eq!(tv.generator_info_name.as_deref(), Some("TVHeadend-4.3-2189~g0d0f4f6"));
        assert_eq!(tv.channels.len(), 3);
        assert_eq!(tv.channels[0].primary_name(), "Channel Five");
        assert_eq!(tv.channels[0].display_names[1].value, "5");
        assert_eq!(tv.programmes.len(), 3);
        assert_eq!(tv.programmes[0].primary_title(), "Evening News");
        assert_eq!(
            tv.programmes[0].descriptions[0].value,
            "Headlines & weather."
        );
    }

    #[test]
    fn test_deserialize_credits_and_ratings() {
        // Arrange
        let xml = r#"<tv><programme start="20240101000000 +0000" stop="20240101010000 +0000" channel="x">
            <title>Film</title>
            <credits><director>D. Rector</director><actor role="Lead">A. Ctor</actor></credits>
            <previously-shown start="20231201000000 +0000" channel="y"/>
            <rating system="VCHIP"><value>TV-PG</value></rating>
            <star-rating><value>3/5</value></star-rating>
        </programme></tv>"#;

        // Act
        let tv: Xmltv = quick_xml::de::from_str(xml).unwrap();
        let programme = &tv.programmes[0];

        // Assert
        let credits = programme.credits.as_ref().unwrap();
        assert_eq!(credits.directors, vec!["D. Rector"]);
        assert_eq!(credits.actors[0].role.as_deref(), Some("Lead"));
        assert_eq!(credits.actors[0].name, "A. Ctor");
        assert_eq!(
            programme
                .previously_shown
                .as_ref()
                .and_then(|p| p.channel.as_deref()),
            Some("y")
        );
        assert_eq!(programme.ratings[0].system.as_deref(), Some("VCHIP"));
        assert_eq!(programme.ratings[0].value, "TV-PG");
        assert_eq!(programme.star_ratings[0].value, "3/5");
    }

    #[test]
    fn test_serialize_orders_children_like_dtd() {
        // Arrange
        let programme = XmltvProgramme {
            start: String::from("20240101000000 +0000"),
            stop: Some(String::from("20240101020000 +0000")),
            channel: String::from("5"),
            titles: vec![LangText::tagged("Show", "eng")],
            descriptions: vec![LangText::tagged("About", "eng")],
            categories: vec![LangText::plain("News")],
            ..XmltvProgramme::default()
        };
        let tv = Xmltv {
            channels: vec![XmltvChannel {
                id: String::from("5"),
                display_names: vec![LangText::plain("Five")],
                ..XmltvChannel::default()
            }],
            programmes: vec![programme],
            ..Xmltv::default()
        };

        // Act
        let xml = quick_xml::se::to_string(&tv).unwrap();

        // Assert
        let channel = xml.find("<channel id=\"5\">").unwrap();
        let start = xml.find("<programme start=\"20240101000000 +0000\"").unwrap();
        let title = xml.find("<title lang=\"eng\">Show</title>").unwrap();
        let desc = xml.find("<desc lang=\"eng\">About</desc>").unwrap();
        let category = xml.find("<category>News</category>").unwrap();
        assert!(channel < start);
        assert!(title < desc && desc < category);
        assert!(!xml.contains("sub-title"));
    }
}

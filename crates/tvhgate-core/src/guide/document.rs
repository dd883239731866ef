//! Published guide document and its typed per-channel view.

use std::collections::{BTreeSet, HashSet};

use bytes::Bytes;
use chrono::{DateTime, FixedOffset};

use super::GuideError;
use crate::xmltv::{Xmltv, XmltvProgramme, parse_xmltv_time, render_xml};

/// Guide served before the first successful refresh.
const EMPTY_GUIDE: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<!DOCTYPE tv SYSTEM \"xmltv.dtd\">\n<tv generator-info-name=\"tvhgate\"/>\n";

/// Transformed XMLTV guide, keyed by device channel number.
///
/// The serialized form is rendered once at construction; every reader of a
/// published document shares the same buffer.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct GuideDocument {
    tv: Xmltv,
    synthetic: BTreeSet<String>,
    xml: Bytes,
}

/// One programme as seen by clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Programme {
    /// Device channel number.
    pub channel_number: String,
    /// Start time.
    pub start: DateTime<FixedOffset>,
    /// Stop time, when the listing has one.
    pub stop: Option<DateTime<FixedOffset>>,
    /// Primary title.
    pub title: String,
    /// Primary description (`""` when absent).
    pub description: String,
    /// Language of the title.
    pub language: Option<String>,
}

impl Programme {
    fn from_xmltv(programme: &XmltvProgramme) -> Option<Self> {
        let start = parse_xmltv_time(&programme.start)?;
        let stop = programme.stop.as_deref().and_then(parse_xmltv_time);
        Some(Self {
            channel_number: programme.channel.clone(),
            start,
            stop,
            title: String::from(programme.primary_title()),
            description: programme
                .descriptions
                .first()
                .map(|desc| desc.value.clone())
                .unwrap_or_default(),
            language: programme.titles.first().and_then(|title| title.lang.clone()),
        })
    }
}

/// Listings for a single device channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelGuide {
    /// Device channel number.
    pub number: String,
    /// Primary display name.
    pub name: String,
    /// Whether the programmes are placeholders.
    pub synthetic: bool,
    /// Programmes in document order.
    pub programmes: Vec<Programme>,
}

impl GuideDocument {
    pub(crate) fn from_xmltv(tv: Xmltv, synthetic: BTreeSet<String>) -> Result<Self, GuideError> {
        let xml = render_xml(&tv, true).map_err(GuideError::Serialize)?;
        Ok(Self {
            tv,
            synthetic,
            xml: Bytes::from(xml),
        })
    }

    /// Document with no channels or programmes.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            tv: Xmltv {
                generator_info_name: Some(String::from("tvhgate")),
                ..Xmltv::default()
            },
            synthetic: BTreeSet::new(),
            xml: Bytes::from_static(EMPTY_GUIDE.as_bytes()),
        }
    }

    /// Serialized XMLTV.
    #[must_use]
    pub fn to_xml(&self) -> &str {
        std::str::from_utf8(&self.xml).unwrap_or_default()
    }

    /// Serialized XMLTV as a shared buffer, for response bodies.
    #[must_use]
    pub fn xml_bytes(&self) -> Bytes {
        self.xml.clone()
    }

    /// Underlying XMLTV model.
    #[must_use]
    pub const fn xmltv(&self) -> &Xmltv {
        &self.tv
    }

    /// Channel numbers in document order, without repeats.
    #[must_use]
    pub fn channel_numbers(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.tv
            .channels
            .iter()
            .map(|channel| channel.id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Total number of programmes, placeholders included.
    #[must_use]
    pub fn programme_count(&self) -> usize {
        self.tv.programmes.len()
    }

    /// Whether `number` was filled with placeholder programmes.
    #[must_use]
    pub fn is_synthetic(&self, number: &str) -> bool {
        self.synthetic.contains(number)
    }

    /// Listings for one channel number.
    #[must_use]
    pub fn channel_guide(&self, number: &str) -> Option<ChannelGuide> {
        let channel = self.tv.channels.iter().find(|c| c.id == number)?;
        let programmes = self
            .tv
            .programmes
            .iter()
            .filter(|programme| programme.channel == number)
            .filter_map(Programme::from_xmltv)
            .collect();
        Some(ChannelGuide {
            number: String::from(number),
            name: String::from(channel.primary_name()),
            synthetic: self.is_synthetic(number),
            programmes,
        })
    }

    /// Listings for every channel, in document order.
    #[must_use]
    pub fn channel_guides(&self) -> Vec<ChannelGuide> {
        self.channel_numbers()
            .into_iter()
            .filter_map(|number| self.channel_guide(number))
            .collect()
    }
}

impl Default for GuideDocument {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let document = GuideDocument::empty();

        assert!(document.channel_numbers().is_empty());
        assert_eq!(document.programme_count(), 0);
        assert!(document.to_xml().contains("<tv generator-info-name=\"tvhgate\"/>"));
        assert!(document.channel_guide("5").is_none());
    }

    #[test]
    fn test_xml_bytes_share_one_buffer() {
        // Arrange
        let document = GuideDocument::empty();
        let published = document.clone();

        // Act
        let first = document.xml_bytes();
        let second = published.xml_bytes();

        // Assert
        assert_eq!(first.as_ptr(), second.as_ptr());
        assert_eq!(&first[..], document.to_xml().as_bytes());
    }
}

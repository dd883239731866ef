//! Backend XMLTV to device XMLTV transformation.

use std::collections::{BTreeSet, HashSet};
use std::fmt::Display;
use std::sync::LazyLock;

use chrono::{DateTime, TimeZone};
use regex::Regex;
use tracing::instrument;

use super::{ChannelIdentifierMap, GuideDocument, GuideError, GuideWarning, synthesize_programmes};
use crate::lineup::LineupEntry;
use crate::xmltv::{LangText, Xmltv, XmltvChannel, XmltvProgramme};

/// Display names that read as a channel number: `5`, `101`, `5.1`, `5-1`.
static CHANNEL_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(?:[.\-]\d+)?$").expect("failed to compile channel number regex")
});

/// Result of a successful transformation.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct TransformOutput {
    /// The re-keyed, gap-filled guide.
    pub document: GuideDocument,
    /// Non-fatal conditions noticed along the way.
    pub warnings: Vec<GuideWarning>,
}

/// Transforms a backend XMLTV export into the device guide.
///
/// See [`transform_with_lineup`]; this variant adds no lineup channels.
///
/// # Errors
///
/// Returns [`GuideError`] when the document cannot be parsed, a programme
/// references an undeclared channel, or the result cannot be serialized.
pub fn transform<Tz>(raw: &str, reference: &DateTime<Tz>) -> Result<TransformOutput, GuideError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    transform_with_lineup(raw, &[], reference)
}

/// Transforms a backend XMLTV export into the device guide.
///
/// Channels are re-keyed from backend ids to their numeric display name,
/// programmes follow their channel, lineup entries missing from the guide
/// are declared, and every channel left without programmes gets 72 hours of
/// placeholders anchored at `reference`.
///
/// # Errors
///
/// Returns [`GuideError`] when the document cannot be parsed, a programme
/// references an undeclared channel, or the result cannot be serialized.
#[instrument(skip_all, fields(bytes = raw.len(), lineup = lineup.len()))]
pub fn transform_with_lineup<Tz>(
    raw: &str,
    lineup: &[LineupEntry],
    reference: &DateTime<Tz>,
) -> Result<TransformOutput, GuideError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut tv: Xmltv =
        quick_xml::de::from_str(raw).map_err(|e| GuideError::Parse(e.to_string()))?;
    let mut warnings = Vec::new();

    let mut ids = rekey_channels(&mut tv.channels, &mut warnings);
    rekey_programmes(&mut tv.programmes, &ids)?;
    declare_lineup_channels(&mut tv.channels, lineup, &mut ids);
    let synthetic = fill_missing_channels(&mut tv, reference, &mut warnings);

    tracing::info!(
        channels = ids.len(),
        programmes = tv.programmes.len(),
        filled = synthetic.len(),
        "Guide transformed"
    );

    let document = GuideDocument::from_xmltv(tv, synthetic)?;
    Ok(TransformOutput { document, warnings })
}

/// Removes and returns the first non-primary display name that reads as a
/// channel number.
fn take_channel_number(channel: &mut XmltvChannel) -> Option<String> {
    let position = channel
        .display_names
        .iter()
        .skip(1)
        .position(|name| CHANNEL_NUMBER_RE.is_match(name.value.trim()))?
        .checked_add(1)?;
    let taken = channel.display_names.remove(position);
    Some(String::from(taken.value.trim()))
}

fn rekey_channels(
    channels: &mut [XmltvChannel],
    warnings: &mut Vec<GuideWarning>,
) -> ChannelIdentifierMap {
    let mut ids = ChannelIdentifierMap::new();
    for channel in channels {
        if let Some(number) = take_channel_number(channel) {
            if let Some(warning) = ids.record(&channel.id, &number) {
                warnings.push(warning);
            }
            channel.id = number;
        } else {
            tracing::warn!(id = %channel.id, "Channel has no channel number, keeping backend id");
            warnings.push(GuideWarning::MissingChannelNumber {
                id: channel.id.clone(),
            });
            if let Some(warning) = ids.record(&channel.id, &channel.id) {
                warnings.push(warning);
            }
        }
    }
    ids
}

fn rekey_programmes(
    programmes: &mut [XmltvProgramme],
    ids: &ChannelIdentifierMap,
) -> Result<(), GuideError> {
    for programme in programmes {
        let number = ids
            .resolve(&programme.channel)
            .ok_or_else(|| GuideError::UnresolvedChannel {
                channel: programme.channel.clone(),
            })?;
        programme.channel = String::from(number);

        // Re-airings on channels outside the guide keep their original id.
        if let Some(previous) = programme.previously_shown.as_mut()
            && let Some(channel) = previous.channel.as_mut()
            && let Some(number) = ids.resolve(channel)
        {
            *channel = String::from(number);
        }
    }
    Ok(())
}

fn declare_lineup_channels(
    channels: &mut Vec<XmltvChannel>,
    lineup: &[LineupEntry],
    ids: &mut ChannelIdentifierMap,
) {
    for entry in lineup {
        if entry.guide_number.is_empty() || ids.contains_number(&entry.guide_number) {
            continue;
        }
        tracing::debug!(
            number = %entry.guide_number,
            name = %entry.guide_name,
            "Lineup channel missing from guide, declaring it"
        );
        ids.record(&entry.guide_number, &entry.guide_number);
        channels.push(XmltvChannel {
            id: entry.guide_number.clone(),
            display_names: vec![LangText::plain(entry.guide_name.clone())],
            ..XmltvChannel::default()
        });
    }
}

fn fill_missing_channels<Tz>(
    tv: &mut Xmltv,
    reference: &DateTime<Tz>,
    warnings: &mut Vec<GuideWarning>,
) -> BTreeSet<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let missing: Vec<(String, String)> = {
        let covered: HashSet<&str> = tv.programmes.iter().map(|p| p.channel.as_str()).collect();
        let mut seen = HashSet::new();
        tv.channels
            .iter()
            .filter(|channel| seen.insert(channel.id.as_str()))
            .filter(|channel| !covered.contains(channel.id.as_str()))
            .map(|channel| {
                let name = match channel.primary_name() {
                    "" => channel.id.clone(),
                    name => String::from(name),
                };
                (channel.id.clone(), name)
            })
            .collect()
    };

    let mut synthetic = BTreeSet::new();
    for (number, name) in missing {
        tracing::warn!(number = %number, name = %name, "No programmes for channel, adding placeholders");
        tv.programmes
            .extend(synthesize_programmes(&number, &name, reference));
        warnings.push(GuideWarning::MissingProgrammes {
            number: number.clone(),
            name,
        });
        synthetic.insert(number);
    }
    synthetic
}

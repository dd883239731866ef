//! XMLTV document model, timestamps and rendering.

mod model;
mod time;

pub use model::{
    Actor, Audio, Credits, EpisodeNum, Icon, Image, LangText, Length, Marker, PreviouslyShown,
    Rating, Review, Subtitles, Video, Xmltv, XmltvChannel, XmltvProgramme,
};
pub use time::{XMLTV_TIME_FORMAT, format_xmltv_time, parse_xmltv_time};

use serde::Serialize;

/// Prologue written ahead of every rendered guide.
const XML_PROLOGUE: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE tv SYSTEM \"xmltv.dtd\">\n";

/// Renders a serializable root element as an indented XML document.
///
/// `doctype` selects whether the XMLTV `DOCTYPE` line is emitted after the
/// declaration.
///
/// # Errors
///
/// Returns the serializer's message when the value cannot be represented as
/// XML.
pub(crate) fn render_xml<T: Serialize>(root: &T, doctype: bool) -> Result<String, String> {
    let mut body = String::new();
    let mut serializer = quick_xml::se::Serializer::new(&mut body);
    serializer.indent(' ', 2);
    root.serialize(serializer).map_err(|e| e.to_string())?;

    let mut document = String::with_capacity(body.len().saturating_add(XML_PROLOGUE.len()));
    if doctype {
        document.push_str(XML_PROLOGUE);
    } else {
        document.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    }
    document.push_str(&body);
    document.push('\n');
    Ok(document)
}

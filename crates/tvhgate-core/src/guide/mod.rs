//! Guide transformation: re-keys the backend XMLTV export to device channel
//! numbers and fills channels that carry no listings.

mod document;
mod error;
mod filler;
mod identifiers;
mod transform;

pub use document::{ChannelGuide, GuideDocument, Programme};
pub use error::{GuideError, GuideWarning};
pub use filler::{
    FILLER_BLOCK_HOURS, FILLER_BLOCKS, FILLER_DESCRIPTION, FILLER_LANGUAGE, filler_window_start,
    synthesize_programmes,
};
pub use identifiers::ChannelIdentifierMap;
pub use transform::{TransformOutput, transform, transform_with_lineup};

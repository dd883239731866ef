//! Channel lineup and EPG transformation gateway.
//!
//! Maps Tvheadend channel records into an HDHomeRun-style lineup, re-keys
//! the backend's XMLTV export to device channel numbers, fills channels that
//! have no guide data with placeholder programmes, and keeps the latest
//! results published for concurrent readers.

/// HDHomeRun device descriptor and status documents.
pub mod device;
/// Guide transformation (re-keying and gap filling).
pub mod guide;
/// Lineup building.
pub mod lineup;
/// Refresh scheduling and atomic publication.
pub mod refresh;
/// XMLTV document model.
pub mod xmltv;

pub use device::{DeviceDescriptor, DeviceError, LineupStatus};
pub use guide::{
    ChannelGuide, ChannelIdentifierMap, GuideDocument, GuideError, GuideWarning, Programme,
    TransformOutput, transform, transform_with_lineup,
};
pub use lineup::{LineupEntry, LineupSettings, build_lineup};
pub use refresh::{
    Gateway, Published, RefreshError, RefreshFailure, RefreshMode, RefreshOutcome, RefreshReport,
    RefreshTarget, Snapshot, spawn_refresh_task,
};

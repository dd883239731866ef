//! `TvheadendApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::BackendError;
use super::types::{RawXmlDocument, TvhChannel};

/// Tvheadend backend trait.
///
/// Abstracts backend operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TvheadendApi: Send)]
pub trait LocalTvheadendApi {
    /// Fetches the full channel list in a single page.
    ///
    /// # Errors
    ///
    /// - `BackendError::Unavailable` on network failure or timeout.
    /// - `BackendError::Auth` if the credentials are rejected.
    /// - `BackendError::Protocol` if the body is not the expected JSON shape.
    async fn fetch_channels(&self) -> Result<Vec<TvhChannel>, BackendError>;

    /// Fetches the XMLTV guide export.
    ///
    /// # Errors
    ///
    /// Same as [`LocalTvheadendApi::fetch_channels`], with
    /// `BackendError::Protocol` also covering payloads that are not
    /// well-formed XML.
    async fn fetch_guide_xml(&self) -> Result<RawXmlDocument, BackendError>;
}

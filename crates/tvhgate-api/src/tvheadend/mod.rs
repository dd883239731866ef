//! Tvheadend API client module.
//!
//! Handles authenticated HTTP requests to the Tvheadend channel grid
//! (`api/channel/grid`) and XMLTV export (`xmltv/channels`) endpoints.

mod api;
mod auth;
mod client;
mod error;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTvheadendApi, TvheadendApi};
pub use auth::{AuthScheme, Credentials};
#[allow(clippy::module_name_repetitions)]
pub use client::{TvheadendClient, TvheadendClientBuilder};
pub use error::{BackendError, ErrorKind};
pub use types::{RawXmlDocument, TvhChannel};

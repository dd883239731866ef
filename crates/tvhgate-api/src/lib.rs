//! Backend client library for tvhgate.
//!
//! Provides an authenticated client for the Tvheadend channel grid and
//! XMLTV export endpoints.

/// Tvheadend API client.
pub mod tvheadend;

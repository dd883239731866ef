//! HTTP layer exposing the emulated HDHomeRun endpoints.

mod handlers;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use bytes::Bytes;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tvhgate_api::tvheadend::TvheadendApi;
use tvhgate_core::{DeviceDescriptor, Gateway};

/// Shared handler state.
pub struct AppState<A> {
    /// Lineup and guide source.
    pub gateway: Arc<Gateway<A>>,
    /// Descriptor served on `discover.json`.
    pub device: Arc<DeviceDescriptor>,
    /// Pre-rendered `device.xml`.
    pub device_xml: Bytes,
}

impl<A> AppState<A> {
    /// Creates the state, rendering `device.xml` once.
    ///
    /// # Errors
    ///
    /// Returns an error if the device description cannot be rendered.
    pub fn new(gateway: Arc<Gateway<A>>, device: DeviceDescriptor) -> Result<Self> {
        let device_xml = device
            .device_xml()
            .context("failed to render device.xml")?;
        Ok(Self {
            gateway,
            device: Arc::new(device),
            device_xml: Bytes::from(device_xml),
        })
    }
}

impl<A> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            device: Arc::clone(&self.device),
            device_xml: self.device_xml.clone(),
        }
    }
}

impl<A> std::fmt::Debug for AppState<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

/// Builds the router with request tracing.
pub fn router<A>(state: AppState<A>) -> Router
where
    A: TvheadendApi + Sync + 'static,
{
    Router::new()
        .route("/", get(handlers::device_xml::<A>))
        .route("/device.xml", get(handlers::device_xml::<A>))
        .route("/discover.json", get(handlers::discover::<A>))
        .route("/lineup_status.json", get(handlers::lineup_status))
        .route("/lineup.json", get(handlers::lineup::<A>))
        .route(
            "/lineup.post",
            get(handlers::lineup_post::<A>).post(handlers::lineup_post::<A>),
        )
        .route("/epg.xml", get(handlers::epg::<A>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves `app` until `shutdown` is cancelled.
///
/// # Errors
///
/// Returns an error if the server stops for any reason other than shutdown.
pub async fn serve(listener: TcpListener, app: Router, shutdown: CancellationToken) -> Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("HTTP server failed")
}

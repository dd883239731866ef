//! HDHomeRun endpoint handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tvhgate_api::tvheadend::TvheadendApi;
use tvhgate_core::{GuideDocument, LineupEntry, LineupStatus};

use super::AppState;

const XML_CONTENT_TYPE: [(header::HeaderName, &str); 1] =
    [(header::CONTENT_TYPE, "application/xml")];

/// `GET /discover.json`
pub async fn discover<A>(State(state): State<AppState<A>>) -> Response
where
    A: Send + Sync + 'static,
{
    Json(&*state.device).into_response()
}

/// `GET /lineup_status.json`
pub async fn lineup_status() -> Json<LineupStatus> {
    Json(LineupStatus::default())
}

/// `GET /lineup.json`; an empty array until a lineup has been published.
pub async fn lineup<A>(State(state): State<AppState<A>>) -> Response
where
    A: TvheadendApi + Sync + 'static,
{
    let entries = state.gateway.lineup().await;
    let entries: &[LineupEntry] = entries.as_deref().map_or(&[], Vec::as_slice);
    Json(entries).into_response()
}

/// `GET|POST /lineup.post`: schedules a refresh and returns immediately.
pub async fn lineup_post<A>(State(state): State<AppState<A>>) -> StatusCode
where
    A: TvheadendApi + Sync + 'static,
{
    let gateway = Arc::clone(&state.gateway);
    tokio::spawn(async move {
        let report = gateway.refresh().await;
        tracing::info!(
            generation = report.generation,
            success = report.is_success(),
            "Refresh requested by client finished"
        );
    });
    StatusCode::OK
}

/// `GET /epg.xml`; an empty `<tv/>` until a guide has been published.
pub async fn epg<A>(State(state): State<AppState<A>>) -> Response
where
    A: TvheadendApi + Sync + 'static,
{
    let body = state
        .gateway
        .guide()
        .await
        .map_or_else(
            || GuideDocument::empty().xml_bytes(),
            |document| document.xml_bytes(),
        );
    (XML_CONTENT_TYPE, body).into_response()
}

/// `GET /` and `GET /device.xml`
pub async fn device_xml<A>(State(state): State<AppState<A>>) -> Response
where
    A: Send + Sync + 'static,
{
    (XML_CONTENT_TYPE, state.device_xml.clone()).into_response()
}

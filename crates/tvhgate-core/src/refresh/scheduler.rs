//! Periodic background refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tvhgate_api::tvheadend::TvheadendApi;

use super::{Gateway, RefreshOutcome, RefreshReport};

/// Spawns the interval refresh loop.
///
/// The first cycle runs immediately, then one per `period`. Cycles never
/// overlap: a slow cycle delays the next tick instead of stacking. Cancelling
/// `shutdown` stops the loop and drops any in-flight cycle unpublished.
pub fn spawn_refresh_task<A>(
    gateway: Arc<Gateway<A>>,
    period: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()>
where
    A: TvheadendApi + Sync + 'static,
{
    tokio::spawn(async move { run_refresh_loop(&gateway, period, &shutdown).await })
}

async fn run_refresh_loop<A>(gateway: &Gateway<A>, period: Duration, shutdown: &CancellationToken)
where
    A: TvheadendApi + Sync,
{
    tracing::info!(period_secs = period.as_secs(), "Refresh task started");
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            _ = ticker.tick() => {}
        }
        tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            report = gateway.refresh() => log_report(&report),
        }
    }

    tracing::info!("Refresh task stopped");
}

fn log_report(report: &RefreshReport) {
    if report.is_success() {
        tracing::debug!(
            generation = report.generation,
            warnings = report.warnings.len(),
            "Refresh cycle completed"
        );
        return;
    }
    let describe = |outcome: &RefreshOutcome| match outcome {
        RefreshOutcome::Published { .. } => "published",
        RefreshOutcome::Superseded => "superseded",
        RefreshOutcome::Failed(_) => "failed",
    };
    tracing::info!(
        generation = report.generation,
        lineup = describe(&report.lineup),
        guide = describe(&report.guide),
        "Refresh cycle completed with failures"
    );
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use tvhgate_api::tvheadend::{BackendError, RawXmlDocument, TvhChannel};

    use super::*;
    use crate::lineup::LineupSettings;
    use crate::refresh::RefreshMode;

    #[derive(Debug)]
    struct StaticApi;

    impl TvheadendApi for StaticApi {
        async fn fetch_channels(&self) -> Result<Vec<TvhChannel>, BackendError> {
            Ok(vec![TvhChannel {
                id: String::from("a"),
                number: String::from("5"),
                name: String::from("Five"),
                enabled: true,
            }])
        }

        async fn fetch_guide_xml(&self) -> Result<RawXmlDocument, BackendError> {
            Ok(RawXmlDocument::new(String::from("<tv/>")))
        }
    }

    fn gateway() -> Arc<Gateway<StaticApi>> {
        Arc::new(Gateway::new(
            StaticApi,
            LineupSettings {
                stream_base_url: String::from("http://tvh:9981"),
                profile: String::from("pass"),
                weight: 300,
            },
            RefreshMode::Interval(Duration::from_secs(3600)),
        ))
    }

    #[tokio::test]
    async fn test_first_cycle_runs_immediately() {
        // Arrange
        let gateway = gateway();
        let mut receiver = gateway.subscribe();
        let shutdown = CancellationToken::new();

        // Act
        let handle = spawn_refresh_task(
            Arc::clone(&gateway),
            Duration::from_secs(3600),
            shutdown.clone(),
        );
        receiver
            .wait_for(|snapshot| snapshot.lineup.is_some() && snapshot.guide.is_some())
            .await
            .unwrap();

        // Assert
        let snapshot = gateway.snapshot();
        assert_eq!(snapshot.lineup_entries().unwrap().len(), 1);
        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_stops_task() {
        // Arrange
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        // Act
        let handle = spawn_refresh_task(gateway(), Duration::from_millis(10), shutdown);

        // Assert
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}

//! Gateway state: fetches from the backend, transforms, and publishes
//! immutable snapshots that readers swap in atomically.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use tokio::sync::watch;
use tracing::instrument;
use tvhgate_api::tvheadend::{ErrorKind, RawXmlDocument, TvheadendApi};

use super::{RefreshError, RefreshFailure, RefreshTarget};
use crate::guide::{GuideDocument, GuideWarning, TransformOutput, transform_with_lineup};
use crate::lineup::{LineupEntry, LineupSettings, build_lineup};

/// When the gateway talks to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// A background task refreshes every period; reads never block on the
    /// backend.
    Interval(Duration),
    /// Every read recomputes from the backend, falling back to the last good
    /// value when the backend fails.
    OnDemand,
}

/// A value together with the refresh cycle that produced it.
#[derive(Debug)]
pub struct Published<T> {
    /// The published value.
    pub value: Arc<T>,
    /// Cycle generation; strictly increasing across publishes.
    pub generation: u64,
    /// Publication time.
    pub published_at: DateTime<Utc>,
}

impl<T> Published<T> {
    fn new(value: T, generation: u64) -> Self {
        Self {
            value: Arc::new(value),
            generation,
            published_at: Utc::now(),
        }
    }
}

impl<T> Clone for Published<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            generation: self.generation,
            published_at: self.published_at,
        }
    }
}

/// Everything readers see at one instant. Replaced wholesale on publish.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Last good lineup.
    pub lineup: Option<Published<Vec<LineupEntry>>>,
    /// Last good guide.
    pub guide: Option<Published<GuideDocument>>,
    /// Most recent failed refresh step.
    pub last_failure: Option<RefreshFailure>,
}

impl Snapshot {
    /// Shared handle to the published lineup.
    #[must_use]
    pub fn lineup_entries(&self) -> Option<Arc<Vec<LineupEntry>>> {
        self.lineup.as_ref().map(|p| Arc::clone(&p.value))
    }

    /// Shared handle to the published guide.
    #[must_use]
    pub fn guide_document(&self) -> Option<Arc<GuideDocument>> {
        self.guide.as_ref().map(|p| Arc::clone(&p.value))
    }
}

/// What happened to one target during a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The new value is now visible to readers.
    Published {
        /// Lineup entries or guide programmes published.
        items: usize,
    },
    /// A newer cycle published first; this result was dropped.
    Superseded,
    /// The step failed; the previous value stays published.
    Failed(RefreshFailure),
}

impl RefreshOutcome {
    /// Whether the value was published.
    #[must_use]
    pub const fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }
}

/// Summary of one full refresh cycle.
#[derive(Debug, Clone)]
pub struct RefreshReport {
    /// Cycle generation.
    pub generation: u64,
    /// Lineup step result.
    pub lineup: RefreshOutcome,
    /// Guide step result.
    pub guide: RefreshOutcome,
    /// Guide transformation warnings.
    pub warnings: Vec<GuideWarning>,
}

impl RefreshReport {
    /// Whether both lineup and guide were published.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.lineup.is_published() && self.guide.is_published()
    }
}

/// Backend-facing gateway shared by the HTTP handlers and the scheduler.
#[derive(Debug)]
pub struct Gateway<A> {
    api: A,
    settings: LineupSettings,
    mode: RefreshMode,
    snapshot: watch::Sender<Arc<Snapshot>>,
    generation: AtomicU64,
}

impl<A> Gateway<A> {
    /// Creates a gateway with nothing published yet.
    pub fn new(api: A, settings: LineupSettings, mode: RefreshMode) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Snapshot::default()));
        Self {
            api,
            settings,
            mode,
            snapshot,
            generation: AtomicU64::new(0),
        }
    }

    /// Configured refresh mode.
    pub const fn mode(&self) -> RefreshMode {
        self.mode
    }

    /// Lineup settings used for stream URLs.
    pub const fn settings(&self) -> &LineupSettings {
        &self.settings
    }

    /// Current snapshot. Never blocks on a refresh in progress.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.borrow())
    }

    /// Receiver notified on every publish or recorded failure.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.snapshot.subscribe()
    }

    fn next_generation(&self) -> u64 {
        self.generation
            .fetch_add(1, Ordering::SeqCst)
            .wrapping_add(1)
    }

    fn publish_lineup(
        &self,
        generation: u64,
        result: Result<Vec<LineupEntry>, RefreshError>,
    ) -> RefreshOutcome {
        let entries = match result {
            Ok(entries) => entries,
            Err(err) => return self.record_failure(RefreshTarget::Lineup, generation, &err),
        };
        let items = entries.len();
        let published = Published::new(entries, generation);
        let accepted = self.snapshot.send_if_modified(|current| {
            if current
                .lineup
                .as_ref()
                .is_some_and(|newer| newer.generation > generation)
            {
                return false;
            }
            Arc::make_mut(current).lineup = Some(published);
            true
        });

        if accepted {
            tracing::info!(generation, entries = items, "Lineup published");
            RefreshOutcome::Published { items }
        } else {
            tracing::debug!(generation, "Discarding lineup from superseded refresh");
            RefreshOutcome::Superseded
        }
    }

    fn publish_guide(
        &self,
        generation: u64,
        result: Result<GuideDocument, RefreshError>,
    ) -> RefreshOutcome {
        let document = match result {
            Ok(document) => document,
            Err(err) => return self.record_failure(RefreshTarget::Guide, generation, &err),
        };
        let items = document.programme_count();
        let published = Published::new(document, generation);
        let accepted = self.snapshot.send_if_modified(|current| {
            if current
                .guide
                .as_ref()
                .is_some_and(|newer| newer.generation > generation)
            {
                return false;
            }
            Arc::make_mut(current).guide = Some(published);
            true
        });

        if accepted {
            tracing::info!(generation, programmes = items, "Guide published");
            RefreshOutcome::Published { items }
        } else {
            tracing::debug!(generation, "Discarding guide from superseded refresh");
            RefreshOutcome::Superseded
        }
    }

    fn record_failure(
        &self,
        target: RefreshTarget,
        generation: u64,
        err: &RefreshError,
    ) -> RefreshOutcome {
        let failure = RefreshFailure::new(target, err);
        match failure.kind {
            ErrorKind::BackendUnavailable => tracing::warn!(
                part = target.as_str(),
                generation,
                error = %err,
                "Backend unavailable, keeping last published data"
            ),
            ErrorKind::BackendAuth => tracing::error!(
                part = target.as_str(),
                generation,
                error = %err,
                "Backend rejected credentials, keeping last published data"
            ),
            ErrorKind::BackendProtocol => tracing::error!(
                part = target.as_str(),
                generation,
                error = %err,
                "Backend payload unusable, keeping last published data"
            ),
        }

        let recorded = failure.clone();
        self.snapshot.send_modify(|current| {
            Arc::make_mut(current).last_failure = Some(recorded);
        });
        RefreshOutcome::Failed(failure)
    }
}

impl<A: TvheadendApi + Sync> Gateway<A> {
    /// Runs one full cycle: channels and guide are fetched concurrently,
    /// then each is published independently.
    #[instrument(skip_all)]
    pub async fn refresh(&self) -> RefreshReport {
        let generation = self.next_generation();
        tracing::debug!(generation, "Refresh cycle started");

        let (channels, raw_guide) =
            tokio::join!(self.api.fetch_channels(), self.api.fetch_guide_xml());

        let lineup = self.publish_lineup(
            generation,
            channels
                .map(|channels| build_lineup(&channels, &self.settings))
                .map_err(RefreshError::from),
        );

        let transformed = match raw_guide {
            Ok(raw) => self.transform_guide(raw).await,
            Err(err) => Err(RefreshError::from(err)),
        };
        let (guide, warnings) = match transformed {
            Ok(output) => (
                self.publish_guide(generation, Ok(output.document)),
                output.warnings,
            ),
            Err(err) => (self.publish_guide(generation, Err(err)), Vec::new()),
        };

        RefreshReport {
            generation,
            lineup,
            guide,
            warnings,
        }
    }

    /// Lineup for a client request.
    ///
    /// In on-demand mode the lineup is recomputed first; otherwise the
    /// published value is returned as is. `None` until a lineup has been
    /// published at least once.
    pub async fn lineup(&self) -> Option<Arc<Vec<LineupEntry>>> {
        if self.mode == RefreshMode::OnDemand {
            self.refresh_lineup().await;
        }
        self.snapshot().lineup_entries()
    }

    /// Guide for a client request. Same mode rules as [`Self::lineup`].
    pub async fn guide(&self) -> Option<Arc<GuideDocument>> {
        if self.mode == RefreshMode::OnDemand {
            self.refresh_guide().await;
        }
        self.snapshot().guide_document()
    }

    /// Refreshes only the lineup.
    #[instrument(skip_all)]
    pub async fn refresh_lineup(&self) -> RefreshOutcome {
        let generation = self.next_generation();
        let result = self
            .api
            .fetch_channels()
            .await
            .map(|channels| build_lineup(&channels, &self.settings))
            .map_err(RefreshError::from);
        self.publish_lineup(generation, result)
    }

    /// Refreshes only the guide, filling against the last published lineup.
    #[instrument(skip_all)]
    pub async fn refresh_guide(&self) -> RefreshOutcome {
        let generation = self.next_generation();
        let result = match self.api.fetch_guide_xml().await {
            Ok(raw) => self
                .transform_guide(raw)
                .await
                .map(|output| output.document),
            Err(err) => Err(RefreshError::from(err)),
        };
        self.publish_guide(generation, result)
    }

    /// Transforms `raw` on the blocking pool; large guides take long enough
    /// to stall a runtime worker.
    async fn transform_guide(&self, raw: RawXmlDocument) -> Result<TransformOutput, RefreshError> {
        let lineup = self.snapshot().lineup_entries();
        let reference = Local::now();
        let output = tokio::task::spawn_blocking(move || {
            let entries = lineup.as_deref().map_or(&[][..], Vec::as_slice);
            transform_with_lineup(raw.as_str(), entries, &reference)
        })
        .await??;
        Ok(output)
    }
}

//! The collection loop: fetch, deduplicate, advance, and decide when to stop.

use harvest_core::{Item, RunParams};
use tokio_util::sync::CancellationToken;

use crate::dedup::Deduplicator;
use crate::error::CollectorError;
use crate::extract::{capture_timestamp, RawCandidate};
use crate::feed::FeedProvider;
use crate::phase::{PhaseTracker, RunPhase};
use crate::stagnation::StagnationDetector;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// `target_count` items were collected.
    TargetReached,
    /// The progress signal stayed unchanged for `stagnation_threshold`
    /// consecutive advances.
    Exhausted,
    /// Cancellation was requested between advances.
    Cancelled,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::TargetReached => write!(f, "target_reached"),
            RunStatus::Exhausted => write!(f, "exhausted"),
            RunStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Result of a completed run: deduplicated items in admission order.
#[derive(Debug, Clone)]
pub struct CollectionOutcome {
    pub items: Vec<Item>,
    pub status: RunStatus,
    /// Number of times the feed was advanced.
    pub advances: u32,
}

/// Mutable state of one run, owned by the loop for its whole duration.
struct CollectionState<S> {
    items: Vec<Item>,
    dedup: Deduplicator,
    stagnation: StagnationDetector<S>,
}

impl<S: PartialEq> CollectionState<S> {
    fn new(stagnation_threshold: u32) -> Self {
        Self {
            items: Vec::new(),
            dedup: Deduplicator::new(),
            stagnation: StagnationDetector::new(stagnation_threshold),
        }
    }

    /// Appends `item` unless its id was already admitted. The identity set
    /// and the sequence are updated together.
    fn admit(&mut self, item: Item) -> bool {
        if !self.dedup.admit(&item.id) {
            return false;
        }
        self.items.push(item);
        true
    }
}

/// Collects up to `params.target_count` unique items for `query`.
///
/// Each iteration reads the visible batch and admits unseen items until the
/// target is reached, then advances the feed and waits `params.scroll_pause`.
/// A run that holds `target_count` items stops there with
/// [`RunStatus::TargetReached`]; otherwise the new progress signal is checked
/// for stagnation. The progress signal read right after navigation is the
/// baseline, so a feed that never moves is declared exhausted after exactly
/// `stagnation_threshold` advances.
///
/// Cancellation is honoured only at the top of an iteration; a batch is
/// always filtered to completion.
///
/// # Errors
///
/// - [`CollectorError::Navigation`] if the feed view cannot be opened.
/// - [`CollectorError::Provider`] if reading, advancing or sampling the feed
///   fails mid-run.
pub async fn collect<P: FeedProvider>(
    provider: &mut P,
    query: &str,
    params: &RunParams,
    cancel: &CancellationToken,
) -> Result<CollectionOutcome, CollectorError> {
    let target = params.target_count;
    tracing::info!(query, target, "starting collection");

    provider.navigate(query).await?;

    let mut state = CollectionState::new(params.stagnation_threshold);
    let baseline = provider.progress_signal().await?;
    state.stagnation.observe(baseline);

    let mut tracker = PhaseTracker::new();
    let mut advances: u32 = 0;

    let status = loop {
        if cancel.is_cancelled() {
            tracker.transition(RunPhase::Cancelled);
            tracing::warn!(collected = state.items.len(), "collection cancelled");
            break RunStatus::Cancelled;
        }

        tracker.transition(RunPhase::Fetching);
        let batch = provider.fetch_visible_candidates().await?;

        tracker.transition(RunPhase::Filtering);
        let captured_at = capture_timestamp();
        for candidate in &batch {
            if state.items.len() >= target {
                break;
            }
            match candidate.extract(&captured_at) {
                Ok(item) => {
                    let id = item.id.clone();
                    if state.admit(item) {
                        tracing::info!(
                            id = %id,
                            collected = state.items.len(),
                            target,
                            "collected item"
                        );
                    } else {
                        tracing::debug!(id = %id, "skipping duplicate item");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "skipping candidate that failed extraction");
                }
            }
        }

        provider.advance().await?;
        advances = advances.saturating_add(1);
        if !params.scroll_pause.is_zero() {
            tokio::time::sleep(params.scroll_pause).await;
        }

        // Checked before stagnation: a full result is never reported as exhausted.
        if state.items.len() >= target {
            tracker.transition(RunPhase::TargetReached);
            tracing::info!(advances, "target reached");
            break RunStatus::TargetReached;
        }

        let signal = provider.progress_signal().await?;
        tracing::debug!(?signal, advances, "feed advanced");
        if state.stagnation.observe(signal) {
            tracker.transition(RunPhase::Exhausted);
            tracing::info!(
                advances,
                unchanged = state.stagnation.consecutive_unchanged(),
                "reached end of available content"
            );
            break RunStatus::Exhausted;
        }
    };

    tracker.transition(RunPhase::Terminated);
    tracing::info!(
        collected = state.items.len(),
        unique_ids = state.dedup.len(),
        advances,
        status = %status,
        phase = %tracker.phase(),
        "collection finished"
    );

    Ok(CollectionOutcome {
        items: state.items,
        status,
        advances,
    })
}

/// Runs a full session against `provider`: authenticate, collect, and close.
///
/// The provider is closed on every exit path, including authentication and
/// navigation failures. A close failure is logged and never replaces the
/// run's own result.
///
/// # Errors
///
/// Propagates [`CollectorError::Authentication`] and every error from
/// [`collect`].
pub async fn harvest<P: FeedProvider>(
    mut provider: P,
    query: &str,
    params: &RunParams,
    cancel: &CancellationToken,
) -> Result<CollectionOutcome, CollectorError> {
    let result = run_session(&mut provider, query, params, cancel).await;

    if let Err(e) = provider.close().await {
        tracing::warn!(error = %e, "failed to close feed provider");
    }

    result
}

async fn run_session<P: FeedProvider>(
    provider: &mut P,
    query: &str,
    params: &RunParams,
    cancel: &CancellationToken,
) -> Result<CollectionOutcome, CollectorError> {
    provider.authenticate().await?;
    collect(provider, query, params, cancel).await
}

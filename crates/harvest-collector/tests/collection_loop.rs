//! Integration tests for the collection loop and session handling.
//!
//! A scripted `StubFeed` stands in for a real provider: it serves a fixed
//! list of batches (one per advance, sticking on the last), a fixed list of
//! progress signals, and records how it was driven.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use harvest_collector::providers::{FeedFixture, FixturePage};
use harvest_collector::{
    collect, harvest, CollectorError, ExtractionError, FeedProvider, FixtureFeed, PostCard,
    RawCandidate, RunStatus,
};
use harvest_core::{Item, RunParams};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
enum Candidate {
    Post(&'static str),
    Malformed,
}

impl RawCandidate for Candidate {
    fn extract(&self, captured_at: &str) -> Result<Item, ExtractionError> {
        match self {
            Candidate::Post(id) => Ok(Item {
                id: (*id).to_owned(),
                author_handle: "tatamotors".to_owned(),
                author_display_name: "Tata Motors".to_owned(),
                timestamp: captured_at.to_owned(),
                text: format!("post {id}"),
                like_count: 0,
                retweet_count: 0,
                reply_count: 0,
                url: format!("https://x.com/tatamotors/status/{id}"),
            }),
            Candidate::Malformed => Err(ExtractionError::MissingPermalink),
        }
    }
}

#[derive(Default)]
struct Probe {
    advances: AtomicU32,
    closed: AtomicBool,
    navigated: AtomicBool,
}

struct StubFeed {
    batches: Vec<Vec<Candidate>>,
    signals: Vec<u64>,
    signal_reads: usize,
    probe: Arc<Probe>,
    fail_auth: bool,
    fail_navigate: bool,
    fail_advance_at: Option<u32>,
    cancel_after_advance: Option<CancellationToken>,
}

impl StubFeed {
    fn new(batches: Vec<Vec<Candidate>>, signals: Vec<u64>) -> (Self, Arc<Probe>) {
        let probe = Arc::new(Probe::default());
        let feed = Self {
            batches,
            signals,
            signal_reads: 0,
            probe: Arc::clone(&probe),
            fail_auth: false,
            fail_navigate: false,
            fail_advance_at: None,
            cancel_after_advance: None,
        };
        (feed, probe)
    }
}

#[async_trait]
impl FeedProvider for StubFeed {
    type Candidate = Candidate;
    type Signal = u64;

    async fn authenticate(&mut self) -> Result<(), CollectorError> {
        if self.fail_auth {
            return Err(CollectorError::Authentication {
                reason: "bad credentials".to_owned(),
            });
        }
        Ok(())
    }

    async fn navigate(&mut self, query: &str) -> Result<(), CollectorError> {
        if self.fail_navigate {
            return Err(CollectorError::Navigation {
                query: query.to_owned(),
                reason: "search page unreachable".to_owned(),
            });
        }
        self.probe.navigated.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn fetch_visible_candidates(&mut self) -> Result<Vec<Candidate>, CollectorError> {
        let advances = self.probe.advances.load(Ordering::SeqCst) as usize;
        let idx = advances.min(self.batches.len().saturating_sub(1));
        Ok(self.batches.get(idx).cloned().unwrap_or_default())
    }

    async fn advance(&mut self) -> Result<(), CollectorError> {
        let n = self.probe.advances.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_advance_at == Some(n) {
            return Err(CollectorError::Provider {
                operation: "advance",
                reason: "session dropped".to_owned(),
            });
        }
        if let Some(token) = &self.cancel_after_advance {
            token.cancel();
        }
        Ok(())
    }

    async fn progress_signal(&mut self) -> Result<u64, CollectorError> {
        let idx = self.signal_reads.min(self.signals.len() - 1);
        self.signal_reads += 1;
        Ok(self.signals[idx])
    }

    async fn close(&mut self) -> Result<(), CollectorError> {
        self.probe.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn params(target_count: usize, stagnation_threshold: u32) -> RunParams {
    RunParams::new(target_count, Duration::ZERO, stagnation_threshold).unwrap()
}

fn ids(items: &[Item]) -> Vec<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

// ---------------------------------------------------------------------------
// deduplication and bounds
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_id_across_batches_is_admitted_once() {
    let (mut feed, _) = StubFeed::new(
        vec![
            vec![Candidate::Post("1001"), Candidate::Post("1002")],
            vec![Candidate::Post("1001"), Candidate::Post("1003")],
        ],
        vec![100, 200, 200],
    );
    let outcome = collect(&mut feed, "tata motors", &params(10, 2), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(ids(&outcome.items), vec!["1001", "1002", "1003"]);
    assert_eq!(
        outcome.items.iter().filter(|i| i.id == "1001").count(),
        1,
        "id 1001 must appear exactly once"
    );
}

#[tokio::test]
async fn five_distinct_candidates_reach_target_of_five() {
    let batch = ["1", "2", "3", "4", "5"].map(Candidate::Post).to_vec();
    let (mut feed, probe) = StubFeed::new(vec![batch], vec![100]);
    let outcome = collect(&mut feed, "q", &params(5, 3), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::TargetReached);
    assert_eq!(outcome.items.len(), 5);
    assert_eq!(outcome.advances, 1);
    assert_eq!(probe.advances.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn target_wins_when_feed_stagnates_on_the_same_advance() {
    // The second advance would be the second unchanged signal, but the
    // batch read just before it already filled the target.
    let (mut feed, _) = StubFeed::new(
        vec![
            vec![Candidate::Post("1")],
            vec![Candidate::Post("1"), Candidate::Post("2")],
        ],
        vec![100],
    );
    let outcome = collect(&mut feed, "q", &params(2, 2), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::TargetReached);
    assert_eq!(outcome.advances, 2);
    assert_eq!(ids(&outcome.items), vec!["1", "2"]);
}

#[tokio::test]
async fn result_never_exceeds_target() {
    let batch = ["1", "2", "3", "4", "5", "6", "7"].map(Candidate::Post).to_vec();
    let (mut feed, _) = StubFeed::new(vec![batch], vec![100]);
    let outcome = collect(&mut feed, "q", &params(4, 3), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::TargetReached);
    assert_eq!(ids(&outcome.items), vec!["1", "2", "3", "4"]);
}

#[tokio::test]
async fn malformed_candidates_are_skipped() {
    let (mut feed, _) = StubFeed::new(
        vec![vec![
            Candidate::Malformed,
            Candidate::Post("1"),
            Candidate::Malformed,
            Candidate::Post("2"),
        ]],
        vec![100],
    );
    let outcome = collect(&mut feed, "q", &params(2, 3), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::TargetReached);
    assert_eq!(ids(&outcome.items), vec!["1", "2"]);
}

// ---------------------------------------------------------------------------
// termination
// ---------------------------------------------------------------------------

#[tokio::test]
async fn constant_signal_exhausts_after_exactly_threshold_advances() {
    for threshold in 1..=4 {
        let (mut feed, probe) = StubFeed::new(vec![vec![Candidate::Post("1")]], vec![500]);
        let outcome = collect(
            &mut feed,
            "q",
            &params(1_000, threshold),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.status, RunStatus::Exhausted);
        assert_eq!(outcome.advances, threshold);
        assert_eq!(probe.advances.load(Ordering::SeqCst), threshold);
        assert_eq!(ids(&outcome.items), vec!["1"]);
    }
}

#[tokio::test]
async fn growing_signal_resets_stagnation() {
    // Heights grow for three advances, then freeze.
    let (mut feed, _) = StubFeed::new(
        vec![
            vec![Candidate::Post("1")],
            vec![Candidate::Post("2")],
            vec![Candidate::Post("3")],
            vec![Candidate::Post("4")],
        ],
        vec![100, 200, 300, 400, 400, 400],
    );
    let outcome = collect(&mut feed, "q", &params(100, 2), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::Exhausted);
    assert_eq!(outcome.advances, 5);
    assert_eq!(ids(&outcome.items), vec!["1", "2", "3", "4"]);
}

// ---------------------------------------------------------------------------
// cancellation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cancelled_before_first_batch_returns_empty() {
    let (mut feed, probe) = StubFeed::new(vec![vec![Candidate::Post("1")]], vec![100]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = collect(&mut feed, "q", &params(10, 3), &cancel)
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::Cancelled);
    assert!(outcome.items.is_empty());
    assert!(probe.navigated.load(Ordering::SeqCst));
}

#[tokio::test]
async fn cancellation_between_advances_keeps_completed_batch() {
    let cancel = CancellationToken::new();
    let (mut feed, _) = StubFeed::new(
        vec![
            vec![Candidate::Post("1"), Candidate::Post("2")],
            vec![Candidate::Post("3")],
        ],
        vec![100, 200, 300],
    );
    feed.cancel_after_advance = Some(cancel.clone());

    let outcome = collect(&mut feed, "q", &params(10, 3), &cancel)
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::Cancelled);
    assert_eq!(ids(&outcome.items), vec!["1", "2"]);
    assert_eq!(outcome.advances, 1);
}

// ---------------------------------------------------------------------------
// session handling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn harvest_closes_provider_after_success() {
    let (feed, probe) = StubFeed::new(vec![vec![Candidate::Post("1")]], vec![100]);
    let outcome = harvest(feed, "q", &params(1, 3), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::TargetReached);
    assert!(probe.closed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn harvest_closes_provider_after_authentication_failure() {
    let (mut feed, probe) = StubFeed::new(vec![vec![Candidate::Post("1")]], vec![100]);
    feed.fail_auth = true;

    let err = harvest(feed, "q", &params(1, 3), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CollectorError::Authentication { .. }));
    assert!(!probe.navigated.load(Ordering::SeqCst));
    assert!(probe.closed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn harvest_closes_provider_after_navigation_failure() {
    let (mut feed, probe) = StubFeed::new(vec![vec![Candidate::Post("1")]], vec![100]);
    feed.fail_navigate = true;

    let err = harvest(feed, "tata motors", &params(1, 3), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CollectorError::Navigation { ref query, .. } if query == "tata motors"));
    assert!(probe.closed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn provider_failure_mid_run_is_fatal_and_closes() {
    let (mut feed, probe) = StubFeed::new(
        vec![vec![Candidate::Post("1")], vec![Candidate::Post("2")]],
        vec![100, 200, 300],
    );
    feed.fail_advance_at = Some(2);

    let err = harvest(feed, "q", &params(10, 3), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CollectorError::Provider {
            operation: "advance",
            ..
        }
    ));
    assert!(probe.closed.load(Ordering::SeqCst));
}

// ---------------------------------------------------------------------------
// fixture provider end to end
// ---------------------------------------------------------------------------

fn card(id: &str) -> PostCard {
    PostCard {
        permalink: Some(format!("https://x.com/tatamotors/status/{id}?s=20")),
        author_href: Some("https://x.com/tatamotors".to_owned()),
        text: Some(format!("post {id}")),
        datetime: Some("2025-01-01T10:00:00.000Z".to_owned()),
        like_label: Some(format!("{id} Likes")),
        ..PostCard::default()
    }
}

#[tokio::test]
async fn fixture_feed_with_overlapping_pages_yields_unique_items() {
    let fixture = FeedFixture {
        pages: vec![
            FixturePage {
                height: 1_000,
                cards: vec![card("1"), card("2"), card("3")],
            },
            FixturePage {
                height: 2_000,
                cards: vec![card("2"), card("3"), card("4")],
            },
            FixturePage {
                height: 3_000,
                cards: vec![
                    card("4"),
                    PostCard {
                        permalink: Some("https://x.com/tatamotors".to_owned()),
                        ..PostCard::default()
                    },
                    card("5"),
                ],
            },
        ],
    };

    let outcome = harvest(
        FixtureFeed::new(fixture),
        "tata motors",
        &params(100, 3),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.status, RunStatus::Exhausted);
    assert_eq!(ids(&outcome.items), vec!["1", "2", "3", "4", "5"]);
    // Two advances reach the last page, three more find it unchanged.
    assert_eq!(outcome.advances, 5);
    assert_eq!(outcome.items[3].like_count, 4);
}

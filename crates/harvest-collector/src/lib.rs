//! Incremental feed collection.
//!
//! Pulls batches of candidates from a [`FeedProvider`], keeps only unseen
//! post ids, advances the feed until a target count is reached or the
//! progress signal stagnates, and partitions the result into recency
//! buckets.

pub mod bucketize;
pub mod collect;
pub mod dedup;
pub mod error;
pub mod extract;
pub mod feed;
pub mod phase;
pub mod providers;
pub mod stagnation;

pub use bucketize::bucketize;
pub use collect::{collect, harvest, CollectionOutcome, RunStatus};
pub use dedup::Deduplicator;
pub use error::{CollectorError, ExtractionError};
pub use extract::{PostCard, RawCandidate};
pub use feed::FeedProvider;
pub use phase::RunPhase;
pub use providers::{BirdFeed, BirdFeedConfig, FixtureFeed};
pub use stagnation::StagnationDetector;

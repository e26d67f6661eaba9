//! Concrete [`crate::FeedProvider`] implementations.

pub mod bird;
pub mod fixture;

pub use bird::{BirdFeed, BirdFeedConfig, BirdTweet};
pub use fixture::{FeedFixture, FixtureFeed, FixturePage};

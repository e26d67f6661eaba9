//! Recorded feed replayed from a JSON fixture.
//!
//! ## Fixture shape
//!
//! ```json
//! {
//!   "pages": [
//!     { "height": 1200, "cards": [ { "permalink": "https://x.com/a/status/1", ... } ] },
//!     { "height": 2400, "cards": [ ... ] }
//!   ]
//! }
//! ```
//!
//! Each page is one scroll position: its `cards` are what is visible there
//! and `height` is the page height reported as the progress signal. Advancing
//! past the last page stays on it, so the height stops changing and the feed
//! eventually stagnates.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::CollectorError;
use crate::extract::PostCard;
use crate::feed::FeedProvider;

#[derive(Debug, Clone, Deserialize)]
pub struct FeedFixture {
    pub pages: Vec<FixturePage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixturePage {
    pub height: u64,
    #[serde(default)]
    pub cards: Vec<PostCard>,
}

/// A [`FeedProvider`] that replays a [`FeedFixture`].
#[derive(Debug)]
pub struct FixtureFeed {
    fixture: FeedFixture,
    cursor: usize,
    navigated: bool,
}

impl FixtureFeed {
    #[must_use]
    pub fn new(fixture: FeedFixture) -> Self {
        Self {
            fixture,
            cursor: 0,
            navigated: false,
        }
    }

    /// Loads a fixture from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Fixture`] if the file cannot be read or is
    /// not a valid fixture.
    pub async fn load(path: &Path) -> Result<Self, CollectorError> {
        let display = path.display().to_string();
        let body = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CollectorError::Fixture {
                path: display.clone(),
                reason: e.to_string(),
            })?;
        let fixture =
            serde_json::from_str::<FeedFixture>(&body).map_err(|e| CollectorError::Fixture {
                path: display,
                reason: e.to_string(),
            })?;
        Ok(Self::new(fixture))
    }

    fn current_page(&self, operation: &'static str) -> Result<&FixturePage, CollectorError> {
        if !self.navigated {
            return Err(CollectorError::Provider {
                operation,
                reason: "feed has not been navigated".to_owned(),
            });
        }
        self.fixture
            .pages
            .get(self.cursor)
            .ok_or_else(|| CollectorError::Provider {
                operation,
                reason: format!("no fixture page at position {}", self.cursor),
            })
    }
}

#[async_trait]
impl FeedProvider for FixtureFeed {
    type Candidate = PostCard;
    type Signal = u64;

    async fn navigate(&mut self, query: &str) -> Result<(), CollectorError> {
        if self.fixture.pages.is_empty() {
            return Err(CollectorError::Navigation {
                query: query.to_owned(),
                reason: "fixture has no pages".to_owned(),
            });
        }
        self.cursor = 0;
        self.navigated = true;
        tracing::debug!(query, pages = self.fixture.pages.len(), "replaying feed fixture");
        Ok(())
    }

    async fn fetch_visible_candidates(&mut self) -> Result<Vec<PostCard>, CollectorError> {
        Ok(self.current_page("fetch_visible_candidates")?.cards.clone())
    }

    async fn advance(&mut self) -> Result<(), CollectorError> {
        self.current_page("advance")?;
        let last = self.fixture.pages.len() - 1;
        self.cursor = (self.cursor + 1).min(last);
        Ok(())
    }

    async fn progress_signal(&mut self) -> Result<u64, CollectorError> {
        Ok(self.current_page("progress_signal")?.height)
    }
}

//! Twitter/X search feed via the `bird` CLI.
//!
//! Invokes `bird search "{query}" --json -n {window} --auth-token ... --ct0 ...`
//! as a subprocess. The CLI has no cursor, so "advancing" widens the result
//! window by one page and re-runs the search; the progress signal is the
//! number of tweets returned. Once the search stops yielding more tweets the
//! signal stops changing and the collection loop declares exhaustion.

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use harvest_core::{Item, UNKNOWN_AUTHOR};
use serde::Deserialize;

use crate::error::{CollectorError, ExtractionError};
use crate::extract::RawCandidate;
use crate::feed::FeedProvider;

/// Timestamp layout of the legacy Twitter API (`Wed Oct 10 20:19:24 +0000 2018`).
const LEGACY_TWITTER_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirdTweet {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub author: Option<BirdAuthor>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub retweet_count: Option<u64>,
    #[serde(default)]
    pub reply_count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BirdAuthor {
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl RawCandidate for BirdTweet {
    fn extract(&self, captured_at: &str) -> Result<Item, ExtractionError> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(ExtractionError::MissingStatusId {
                url: String::new(),
            });
        }

        let handle = self
            .author
            .as_ref()
            .map(|a| a.username.trim())
            .filter(|u| !u.is_empty());
        let display_name = self
            .author
            .as_ref()
            .and_then(|a| a.name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .or(handle)
            .unwrap_or(UNKNOWN_AUTHOR);

        let url = format!("https://x.com/{}/status/{id}", handle.unwrap_or("i"));

        let timestamp = self
            .created_at
            .as_deref()
            .map(normalize_created_at)
            .unwrap_or_else(|| captured_at.to_owned());

        Ok(Item {
            id: id.to_owned(),
            author_handle: handle.unwrap_or(UNKNOWN_AUTHOR).to_owned(),
            author_display_name: display_name.to_owned(),
            timestamp,
            text: self.text.clone(),
            like_count: self.like_count.unwrap_or(0),
            retweet_count: self.retweet_count.unwrap_or(0),
            reply_count: self.reply_count.unwrap_or(0),
            url,
        })
    }
}

/// Rewrites legacy Twitter timestamps as RFC 3339; anything else is kept
/// verbatim for the bucketizer to interpret.
fn normalize_created_at(raw: &str) -> String {
    let raw = raw.trim();
    DateTime::parse_from_str(raw, LEGACY_TWITTER_FORMAT)
        .map_or_else(|_| raw.to_owned(), |dt| dt.to_rfc3339())
}

/// Settings for [`BirdFeed`].
#[derive(Clone)]
pub struct BirdFeedConfig {
    /// Path or name of the `bird` executable.
    pub bin: String,
    /// Tweets added to the search window on every advance.
    pub page_size: u32,
    /// A search still running after this long is killed.
    pub timeout: Duration,
    pub auth_token: Option<String>,
    pub ct0: Option<String>,
}

impl std::fmt::Debug for BirdFeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BirdFeedConfig")
            .field("bin", &self.bin)
            .field("page_size", &self.page_size)
            .field("timeout", &self.timeout)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[redacted]"))
            .field("ct0", &self.ct0.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// A [`FeedProvider`] backed by repeated `bird search` invocations.
pub struct BirdFeed {
    config: BirdFeedConfig,
    credentials: Option<(String, String)>,
    query: Option<String>,
    window: u32,
    tweets: Vec<BirdTweet>,
}

enum SearchFailure {
    Spawn(String),
    Exit(String),
    TimedOut(String),
}

impl BirdFeed {
    #[must_use]
    pub fn new(config: BirdFeedConfig) -> Self {
        Self {
            config,
            credentials: None,
            query: None,
            window: 0,
            tweets: Vec::new(),
        }
    }

    async fn search(&self, query: &str, count: u32) -> Result<Vec<BirdTweet>, SearchFailure> {
        let Some((auth_token, ct0)) = &self.credentials else {
            return Err(SearchFailure::Exit("not authenticated".to_owned()));
        };

        let count = count.to_string();
        let mut command = tokio::process::Command::new(&self.config.bin);
        command
            .args([
                "search",
                query,
                "--json",
                "-n",
                count.as_str(),
                "--auth-token",
                auth_token.as_str(),
                "--ct0",
                ct0.as_str(),
            ])
            .kill_on_drop(true);

        // Dropping the timed-out future kills the child.
        let output = tokio::time::timeout(self.config.timeout, command.output())
            .await
            .map_err(|_| {
                SearchFailure::TimedOut(format!(
                    "bird search did not finish within {:?}",
                    self.config.timeout
                ))
            })?
            .map_err(|e| SearchFailure::Spawn(format!("bird subprocess error: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SearchFailure::Exit(format!(
                "bird search exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        serde_json::from_slice::<Vec<BirdTweet>>(&output.stdout)
            .map_err(|e| SearchFailure::Exit(format!("bird search returned invalid JSON: {e}")))
    }
}

#[async_trait]
impl FeedProvider for BirdFeed {
    type Candidate = BirdTweet;
    type Signal = usize;

    async fn authenticate(&mut self) -> Result<(), CollectorError> {
        match (&self.config.auth_token, &self.config.ct0) {
            (Some(a), Some(c)) if !a.is_empty() && !c.is_empty() => {
                self.credentials = Some((a.clone(), c.clone()));
                Ok(())
            }
            _ => Err(CollectorError::Authentication {
                reason: "TWITTER_AUTH_TOKEN and TWITTER_CT0 must both be set".to_owned(),
            }),
        }
    }

    async fn navigate(&mut self, query: &str) -> Result<(), CollectorError> {
        let window = self.config.page_size.max(1);
        let tweets = self.search(query, window).await.map_err(|failure| {
            let reason = match failure {
                SearchFailure::Spawn(r) | SearchFailure::Exit(r) | SearchFailure::TimedOut(r) => {
                    r
                }
            };
            CollectorError::Navigation {
                query: query.to_owned(),
                reason,
            }
        })?;

        tracing::debug!(query, window, returned = tweets.len(), "bird search opened");
        self.query = Some(query.to_owned());
        self.window = window;
        self.tweets = tweets;
        Ok(())
    }

    async fn fetch_visible_candidates(&mut self) -> Result<Vec<BirdTweet>, CollectorError> {
        Ok(self.tweets.clone())
    }

    async fn advance(&mut self) -> Result<(), CollectorError> {
        let Some(query) = self.query.clone() else {
            return Err(CollectorError::Provider {
                operation: "advance",
                reason: "feed has not been navigated".to_owned(),
            });
        };

        let window = self.window.saturating_add(self.config.page_size.max(1));
        match self.search(&query, window).await {
            Ok(tweets) => {
                self.window = window;
                self.tweets = tweets;
                Ok(())
            }
            // A failed re-run leaves the window as it was; the unchanged
            // signal then counts towards stagnation.
            Err(SearchFailure::Exit(reason)) => {
                tracing::warn!(query = %query, window, reason = %reason, "bird search failed while advancing");
                Ok(())
            }
            Err(SearchFailure::Spawn(reason) | SearchFailure::TimedOut(reason)) => {
                Err(CollectorError::Provider {
                    operation: "advance",
                    reason,
                })
            }
        }
    }

    async fn progress_signal(&mut self) -> Result<usize, CollectorError> {
        Ok(self.tweets.len())
    }

    async fn close(&mut self) -> Result<(), CollectorError> {
        self.credentials = None;
        self.tweets.clear();
        Ok(())
    }
}

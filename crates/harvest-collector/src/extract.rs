//! Conversion of provider-specific raw candidates into [`Item`]s.
//!
//! Each candidate is extracted on its own and reports failure through
//! [`ExtractionError`], so one malformed card never aborts a batch.

use chrono::Local;
use harvest_core::{parse_count_label, Item, UNKNOWN_AUTHOR};
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// A provider-specific record that may be turned into an [`Item`].
pub trait RawCandidate {
    /// Extracts an item from this candidate.
    ///
    /// `captured_at` is the ISO-8601 capture instant, used when the candidate
    /// carries no timestamp of its own.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError`] when the candidate lacks an identity.
    fn extract(&self, captured_at: &str) -> Result<Item, ExtractionError>;
}

/// Formats the current local instant the way a missing post timestamp is
/// recorded: naive ISO-8601 with microseconds.
#[must_use]
pub fn capture_timestamp() -> String {
    Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Pulls the status id out of a post permalink.
///
/// `https://x.com/someone/status/1234?s=20` yields `1234`. Any trailing
/// path (`/photo/1`), query or fragment is cut off.
#[must_use]
pub fn status_id_from_url(url: &str) -> Option<&str> {
    let (_, tail) = url.rsplit_once("/status/")?;
    let id = tail
        .split(['?', '/', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// Fields scraped from one rendered post card.
///
/// Every field is optional because the rendered markup is not reliable;
/// [`RawCandidate::extract`] applies the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCard {
    /// `href` of the first `/status/` link in the card.
    pub permalink: Option<String>,
    /// `href` of the author's profile link.
    pub author_href: Option<String>,
    /// Rendered text of the author block: display name, then handle.
    pub author_block: Option<String>,
    pub text: Option<String>,
    /// `datetime` attribute of the card's `<time>` element.
    pub datetime: Option<String>,
    pub reply_label: Option<String>,
    pub retweet_label: Option<String>,
    pub like_label: Option<String>,
}

impl RawCandidate for PostCard {
    fn extract(&self, captured_at: &str) -> Result<Item, ExtractionError> {
        let url = self
            .permalink
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ExtractionError::MissingPermalink)?;
        let id = status_id_from_url(url).ok_or_else(|| ExtractionError::MissingStatusId {
            url: url.to_owned(),
        })?;

        let (author_handle, author_display_name) = self.author();

        let timestamp = self
            .datetime
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(captured_at)
            .to_owned();

        let count = |label: Option<&str>| label.map_or(0, parse_count_label);

        Ok(Item {
            id: id.to_owned(),
            author_handle,
            author_display_name,
            timestamp,
            text: self.text.clone().unwrap_or_default(),
            like_count: count(self.like_label.as_deref()),
            retweet_count: count(self.retweet_label.as_deref()),
            reply_count: count(self.reply_label.as_deref()),
            url: url.to_owned(),
        })
    }
}

impl PostCard {
    /// Resolves `(handle, display_name)`.
    ///
    /// Without a profile link both fall back to [`UNKNOWN_AUTHOR`]. The
    /// display name is the first line of a multi-line author block, else the
    /// handle.
    fn author(&self) -> (String, String) {
        let Some(handle) = self
            .author_href
            .as_deref()
            .and_then(|href| href.trim_end_matches('/').rsplit('/').next())
            .filter(|h| !h.is_empty())
        else {
            return (UNKNOWN_AUTHOR.to_owned(), UNKNOWN_AUTHOR.to_owned());
        };

        let display_name = self
            .author_block
            .as_deref()
            .filter(|block| block.contains('\n'))
            .and_then(|block| block.lines().next())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(handle);

        (handle.to_owned(), display_name.to_owned())
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;

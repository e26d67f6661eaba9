//! CSV export of the full ordered collection.
//!
//! Columns, in order:
//! `user_id,user_name,timestamp,tweet_text,likes,retweets,replies,tweet_url,tweet_id`.
//! A file written here can be read back with [`read_items_csv`].

use std::path::Path;

use harvest_core::Item;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// One CSV row. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularRow {
    pub user_id: String,
    pub user_name: String,
    pub timestamp: String,
    pub tweet_text: String,
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
    pub tweet_url: String,
    pub tweet_id: String,
}

impl From<&Item> for TabularRow {
    fn from(item: &Item) -> Self {
        Self {
            user_id: item.author_handle.clone(),
            user_name: item.author_display_name.clone(),
            timestamp: item.timestamp.clone(),
            tweet_text: item.text.clone(),
            likes: item.like_count,
            retweets: item.retweet_count,
            replies: item.reply_count,
            tweet_url: item.url.clone(),
            tweet_id: item.id.clone(),
        }
    }
}

impl From<TabularRow> for Item {
    fn from(row: TabularRow) -> Self {
        Self {
            id: row.tweet_id,
            author_handle: row.user_id,
            author_display_name: row.user_name,
            timestamp: row.timestamp,
            text: row.tweet_text,
            like_count: row.likes,
            retweet_count: row.retweets,
            reply_count: row.replies,
            url: row.tweet_url,
        }
    }
}

/// Writes `items` to `path` as CSV with a header row, creating missing
/// parent directories.
///
/// # Errors
///
/// - [`ExportError::EmptyCollection`] if `items` is empty. Nothing is written.
/// - [`ExportError::Io`] / [`ExportError::Csv`] if the file cannot be
///   created or written.
pub fn write_items_csv(path: &Path, items: &[Item]) -> Result<(), ExportError> {
    if items.is_empty() {
        return Err(ExportError::EmptyCollection);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for item in items {
        writer.serialize(TabularRow::from(item))?;
    }
    writer.flush()?;

    tracing::info!(path = %path.display(), records = items.len(), "wrote CSV export");
    Ok(())
}

/// Reads a CSV previously written by [`write_items_csv`] back into items,
/// preserving row order.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] if the file cannot be opened or a row does
/// not match the expected columns.
pub fn read_items_csv(path: &Path) -> Result<Vec<Item>, ExportError> {
    let mut reader = csv::Reader::from_path(path)?;
    let items = reader
        .deserialize::<TabularRow>()
        .map(|row| row.map(Item::from))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(path = %path.display(), records = items.len(), "read CSV export");
    Ok(items)
}

#[cfg(test)]
#[path = "tabular_test.rs"]
mod tests;

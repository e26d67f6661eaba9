//! Human-readable grouped text export, one file per non-empty recency bucket.

use std::path::{Path, PathBuf};

use harvest_core::{Item, RecencyBucket, RecencyBuckets};

use crate::error::ExportError;

/// Width of the dashed line that closes each rendered item.
pub const SEPARATOR_WIDTH: usize = 80;

/// File the given bucket is written to.
#[must_use]
pub const fn file_name(bucket: RecencyBucket) -> &'static str {
    match bucket {
        RecencyBucket::Within24h => "Few_Hours_Ago.txt",
        RecencyBucket::Within7d => "Few_Days_Ago.txt",
        RecencyBucket::Within4w => "Few_Weeks_Ago.txt",
        RecencyBucket::Older => "Older_Tweets.txt",
    }
}

/// Renders one item as a block of labelled lines followed by a separator
/// and a blank line.
#[must_use]
pub fn render_item(item: &Item) -> String {
    format!(
        "User: @{handle} ({name})\n\
         Time: {ts}\n\
         Tweet: {text}\n\
         Engagement: ❤️ {likes} | 🔁 {retweets} | 💬 {replies}\n\
         URL: {url}\n\
         {sep}\n\n",
        handle = item.author_handle,
        name = item.author_display_name,
        ts = item.timestamp,
        text = item.text,
        likes = item.like_count,
        retweets = item.retweet_count,
        replies = item.reply_count,
        url = item.url,
        sep = "-".repeat(SEPARATOR_WIDTH),
    )
}

/// Writes each non-empty bucket of `buckets` into `dir`, overwriting any
/// previous file of the same name. Empty buckets produce no file.
///
/// Returns the written paths, freshest bucket first.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if `dir` cannot be created or a file cannot
/// be written. Files written before the failure are left in place.
pub fn write_categorized(
    dir: &Path,
    buckets: &RecencyBuckets,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for (bucket, items) in buckets.iter() {
        if items.is_empty() {
            continue;
        }
        let path = dir.join(file_name(bucket));
        let body: String = items.iter().map(render_item).collect();
        std::fs::write(&path, body)?;
        tracing::info!(
            bucket = %bucket,
            path = %path.display(),
            records = items.len(),
            "wrote categorized export"
        );
        written.push(path);
    }
    Ok(written)
}

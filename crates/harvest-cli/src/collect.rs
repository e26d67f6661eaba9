//! `harvest collect`: run one collection session and export the result.
//!
//! The collection summary is printed before anything is persisted, so an
//! export failure is reported without hiding what was collected.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use harvest_collector::{
    bucketize, harvest, BirdFeed, BirdFeedConfig, CollectionOutcome, FixtureFeed,
};
use harvest_core::{ConfigError, HarvestConfig, RecencyBuckets, RunParams};
use harvest_export::ExportError;
use tokio_util::sync::CancellationToken;

const SAMPLE_SIZE: usize = 3;
const SAMPLE_TEXT_CHARS: usize = 100;
/// Exit status after a second Ctrl-C (128 + SIGINT).
const FORCED_EXIT_CODE: i32 = 130;

/// Applies CLI overrides on top of the env-derived run defaults.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidParam`] if the merged values are invalid.
pub(crate) fn resolve_params(
    defaults: &RunParams,
    target: Option<usize>,
    scroll_pause_ms: Option<u64>,
    stagnation_threshold: Option<u32>,
) -> Result<RunParams, ConfigError> {
    RunParams::new(
        target.unwrap_or(defaults.target_count),
        scroll_pause_ms.map_or(defaults.scroll_pause, Duration::from_millis),
        stagnation_threshold.unwrap_or(defaults.stagnation_threshold),
    )
}

pub(crate) fn bird_config(config: &HarvestConfig) -> BirdFeedConfig {
    BirdFeedConfig {
        bin: config.bird_bin.clone(),
        page_size: config.bird_page_size,
        timeout: config.bird_timeout,
        auth_token: config.twitter_auth_token.clone(),
        ct0: config.twitter_ct0.clone(),
    }
}

/// Collects posts for `query`, prints a summary and a short sample, then
/// writes the CSV and categorized exports into `out_dir`.
///
/// Uses the recorded feed at `fixture` when given, otherwise the live
/// `bird` provider.
///
/// # Errors
///
/// Returns an error if the session fails (authentication, navigation or a
/// provider failure mid-run) or if any export could not be written.
pub(crate) async fn run_collect(
    config: &HarvestConfig,
    query: &str,
    params: &RunParams,
    fixture: Option<&Path>,
    out_dir: &Path,
) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let outcome = match fixture {
        Some(path) => {
            let feed = FixtureFeed::load(path)
                .await
                .with_context(|| format!("failed to load fixture {}", path.display()))?;
            harvest(feed, query, params, &cancel).await
        }
        None => harvest(BirdFeed::new(bird_config(config)), query, params, &cancel).await,
    }
    .with_context(|| format!("collection for \"{query}\" failed"))?;

    print_summary(query, &outcome);

    let buckets = bucketize(&outcome.items, Local::now().fixed_offset());
    print_bucket_counts(&buckets);

    let mut failed_exports: usize = 0;

    let csv_path = out_dir.join(&config.csv_filename);
    match harvest_export::write_items_csv(&csv_path, &outcome.items) {
        Ok(()) => println!(
            "saved {} records to {}",
            outcome.items.len(),
            csv_path.display()
        ),
        Err(ExportError::EmptyCollection) => println!("no posts to save"),
        Err(e) => {
            eprintln!("error: failed to write {}: {e}", csv_path.display());
            failed_exports += 1;
        }
    }

    match harvest_export::write_categorized(out_dir, &buckets) {
        Ok(paths) => {
            for path in paths {
                println!("saved {}", path.display());
            }
        }
        Err(e) => {
            eprintln!(
                "error: failed to write categorized files to {}: {e}",
                out_dir.display()
            );
            failed_exports += 1;
        }
    }

    if failed_exports > 0 {
        anyhow::bail!("{failed_exports} export(s) failed; the collection itself completed");
    }
    Ok(())
}

/// Installs the Ctrl-C handler for a run. The first press requests a
/// graceful stop; a second press exits the process at once.
fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        let forced =
            watch_interrupts(&cancel, || async { tokio::signal::ctrl_c().await.is_ok() }).await;
        if forced {
            eprintln!("interrupted again, exiting without finishing the run");
            std::process::exit(FORCED_EXIT_CODE);
        }
    });
}

/// Cancels `cancel` on the first interrupt and returns `true` on the
/// second. `next_interrupt` resolves to `false` if the signal source fails,
/// in which case this returns `false`.
pub(crate) async fn watch_interrupts<F, Fut>(
    cancel: &CancellationToken,
    mut next_interrupt: F,
) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    if !next_interrupt().await {
        tracing::warn!("could not listen for ctrl-c; the run can only be stopped by killing it");
        return false;
    }
    tracing::info!("received ctrl-c, stopping after the current batch (press again to exit now)");
    cancel.cancel();

    next_interrupt().await
}

fn print_summary(query: &str, outcome: &CollectionOutcome) {
    println!(
        "collected {} unique posts for \"{query}\" (status: {}, advances: {})",
        outcome.items.len(),
        outcome.status,
        outcome.advances
    );

    for (idx, item) in outcome.items.iter().take(SAMPLE_SIZE).enumerate() {
        let text: String = item.text.chars().take(SAMPLE_TEXT_CHARS).collect();
        println!(
            "{}. @{} ({}) at {}",
            idx + 1,
            item.author_handle,
            item.author_display_name,
            item.timestamp
        );
        println!("   {text}");
        println!(
            "   ❤️ {} | 🔁 {} | 💬 {}",
            item.like_count, item.retweet_count, item.reply_count
        );
    }
}

pub(crate) fn print_bucket_counts(buckets: &RecencyBuckets) {
    for (bucket, items) in buckets.iter() {
        println!("  {bucket}: {}", items.len());
    }
}

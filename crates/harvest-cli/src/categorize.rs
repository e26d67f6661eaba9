//! `harvest categorize`: re-group a CSV export against the current time.

use std::path::Path;

use anyhow::Context;
use chrono::Local;
use harvest_collector::bucketize;

use crate::collect::print_bucket_counts;

/// Reads a CSV written by `harvest collect`, buckets its rows relative to
/// now, and writes the categorized files into `out_dir`.
///
/// # Errors
///
/// Returns an error if the CSV cannot be read or the categorized files
/// cannot be written.
pub(crate) fn run_categorize(input: &Path, out_dir: &Path) -> anyhow::Result<()> {
    let items = harvest_export::read_items_csv(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let buckets = bucketize(&items, Local::now().fixed_offset());
    println!("categorized {} posts from {}", items.len(), input.display());
    print_bucket_counts(&buckets);

    let written = harvest_export::write_categorized(out_dir, &buckets)
        .with_context(|| format!("failed to write categorized files to {}", out_dir.display()))?;
    for path in written {
        println!("saved {}", path.display());
    }
    Ok(())
}

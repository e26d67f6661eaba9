//! Partitioning of collected items into recency buckets.
//!
//! `now` is an explicit argument so callers (and tests) choose the reference
//! instant. Timestamps carrying an offset are compared against `now` as
//! absolute instants; naive timestamps are compared against `now`'s local
//! wall-clock time. Anything that does not parse lands in
//! [`RecencyBucket::Older`].

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use harvest_core::{Item, RecencyBucket, RecencyBuckets};

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Splits `items` into the four recency buckets relative to `now`.
///
/// Pure and order-preserving: within each bucket items keep their
/// collection order.
#[must_use]
pub fn bucketize(items: &[Item], now: DateTime<FixedOffset>) -> RecencyBuckets {
    let mut buckets = RecencyBuckets::default();
    for item in items {
        let bucket = classify(&item.timestamp, now);
        buckets.push(bucket, item.clone());
    }
    buckets
}

/// Classifies a single ISO-8601 timestamp relative to `now`.
#[must_use]
pub fn classify(timestamp: &str, now: DateTime<FixedOffset>) -> RecencyBucket {
    match age(timestamp, now) {
        Some(delta) => bucket_for_age(delta),
        None => {
            tracing::debug!(timestamp, "unparsable timestamp, classifying as older");
            RecencyBucket::Older
        }
    }
}

/// Maps an age onto its bucket. Each bound is exclusive on the fresh side:
/// exactly 24 hours is already `Within7d`.
#[must_use]
pub fn bucket_for_age(delta: TimeDelta) -> RecencyBucket {
    if delta < TimeDelta::hours(24) {
        RecencyBucket::Within24h
    } else if delta < TimeDelta::days(7) {
        RecencyBucket::Within7d
    } else if delta < TimeDelta::days(28) {
        RecencyBucket::Within4w
    } else {
        RecencyBucket::Older
    }
}

fn age(timestamp: &str, now: DateTime<FixedOffset>) -> Option<TimeDelta> {
    let raw = timestamp.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(aware) = DateTime::parse_from_rfc3339(raw) {
        return Some(now.with_timezone(&Utc) - aware.with_timezone(&Utc));
    }

    let naive = parse_naive(raw)?;
    Some(now.naive_local() - naive)
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
#[path = "bucketize_test.rs"]
mod tests;

//! Recency classes used to partition a finished collection.

use crate::item::Item;

/// One of four disjoint time-since-now classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecencyBucket {
    /// Less than 24 hours old.
    Within24h,
    /// At least 24 hours and less than 7 days old.
    Within7d,
    /// At least 7 days and less than 28 days old.
    Within4w,
    /// 28 days or older, or with a timestamp that could not be interpreted.
    Older,
}

impl RecencyBucket {
    /// All buckets, freshest first.
    pub const ALL: [RecencyBucket; 4] = [
        RecencyBucket::Within24h,
        RecencyBucket::Within7d,
        RecencyBucket::Within4w,
        RecencyBucket::Older,
    ];
}

impl std::fmt::Display for RecencyBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecencyBucket::Within24h => write!(f, "within_24h"),
            RecencyBucket::Within7d => write!(f, "within_7d"),
            RecencyBucket::Within4w => write!(f, "within_4w"),
            RecencyBucket::Older => write!(f, "older"),
        }
    }
}

/// The four recency partitions of a collection, each in collection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecencyBuckets {
    pub within_24h: Vec<Item>,
    pub within_7d: Vec<Item>,
    pub within_4w: Vec<Item>,
    pub older: Vec<Item>,
}

impl RecencyBuckets {
    #[must_use]
    pub fn get(&self, bucket: RecencyBucket) -> &[Item] {
        match bucket {
            RecencyBucket::Within24h => &self.within_24h,
            RecencyBucket::Within7d => &self.within_7d,
            RecencyBucket::Within4w => &self.within_4w,
            RecencyBucket::Older => &self.older,
        }
    }

    pub fn push(&mut self, bucket: RecencyBucket, item: Item) {
        match bucket {
            RecencyBucket::Within24h => self.within_24h.push(item),
            RecencyBucket::Within7d => self.within_7d.push(item),
            RecencyBucket::Within4w => self.within_4w.push(item),
            RecencyBucket::Older => self.older.push(item),
        }
    }

    /// Iterates `(bucket, items)` pairs, freshest bucket first.
    pub fn iter(&self) -> impl Iterator<Item = (RecencyBucket, &[Item])> {
        RecencyBucket::ALL.into_iter().map(|b| (b, self.get(b)))
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.within_24h.len() + self.within_7d.len() + self.within_4w.len() + self.older.len()
    }
}

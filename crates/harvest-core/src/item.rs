use serde::{Deserialize, Serialize};

/// Placeholder used when a post's author cannot be determined.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// A single collected post.
///
/// `id` is the deduplication key and comes from the post's permalink.
/// `timestamp` is kept as the ISO-8601 text the provider supplied (or the
/// capture instant when it supplied none); it is parsed lazily by the
/// bucketizer so an unparsable value never blocks collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub author_handle: String,
    pub author_display_name: String,
    pub timestamp: String,
    pub text: String,
    pub like_count: u64,
    pub retweet_count: u64,
    pub reply_count: u64,
    pub url: String,
}

/// Parses an engagement label such as `"1,234 Likes. Like"` into a count.
///
/// All non-digit characters are discarded and the remaining digits are read
/// as one number. Labels with no digits, or whose digits overflow `u64`,
/// count as zero.
#[must_use]
pub fn parse_count_label(label: &str) -> u64 {
    let digits: String = label.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<u64>().unwrap_or(0)
}

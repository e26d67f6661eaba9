use std::time::Duration;

use crate::ConfigError;

pub const DEFAULT_TARGET_COUNT: usize = 100;
pub const DEFAULT_SCROLL_PAUSE: Duration = Duration::from_secs(3);
pub const DEFAULT_STAGNATION_THRESHOLD: u32 = 3;

/// Tuning for a single collection run.
///
/// `target_count` is a best-effort upper bound on the number of items
/// returned. `stagnation_threshold` is how many consecutive advances with an
/// unchanged progress signal are tolerated before the feed is declared
/// exhausted; it is a heuristic, and slow-loading content can trip it early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParams {
    pub target_count: usize,
    pub scroll_pause: Duration,
    pub stagnation_threshold: u32,
}

impl RunParams {
    /// Builds validated run parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParam`] if `target_count` is zero or
    /// `stagnation_threshold` is zero.
    pub fn new(
        target_count: usize,
        scroll_pause: Duration,
        stagnation_threshold: u32,
    ) -> Result<Self, ConfigError> {
        if target_count == 0 {
            return Err(ConfigError::InvalidParam {
                param: "target_count",
                reason: "must be greater than zero".to_owned(),
            });
        }
        if stagnation_threshold == 0 {
            return Err(ConfigError::InvalidParam {
                param: "stagnation_threshold",
                reason: "must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            target_count,
            scroll_pause,
            stagnation_threshold,
        })
    }
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            target_count: DEFAULT_TARGET_COUNT,
            scroll_pause: DEFAULT_SCROLL_PAUSE,
            stagnation_threshold: DEFAULT_STAGNATION_THRESHOLD,
        }
    }
}

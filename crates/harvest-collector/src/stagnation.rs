//! Feed exhaustion detection from a comparable progress signal.

/// Declares a feed exhausted after `threshold` consecutive observations of an
/// unchanged progress signal.
///
/// The first observation only establishes the baseline. Any change resets
/// the run of unchanged observations.
#[derive(Debug)]
pub struct StagnationDetector<S> {
    threshold: u32,
    last_signal: Option<S>,
    consecutive_unchanged: u32,
}

impl<S: PartialEq> StagnationDetector<S> {
    /// `threshold` below 1 is treated as 1.
    #[must_use]
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            last_signal: None,
            consecutive_unchanged: 0,
        }
    }

    /// Records `signal` and returns `true` once the threshold of consecutive
    /// unchanged signals has been reached.
    pub fn observe(&mut self, signal: S) -> bool {
        if self.last_signal.as_ref() == Some(&signal) {
            self.consecutive_unchanged = self.consecutive_unchanged.saturating_add(1);
        } else {
            self.consecutive_unchanged = 0;
            self.last_signal = Some(signal);
        }
        self.consecutive_unchanged >= self.threshold
    }

    #[must_use]
    pub fn consecutive_unchanged(&self) -> u32 {
        self.consecutive_unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_never_counts_as_unchanged() {
        let mut detector = StagnationDetector::new(1);
        assert!(!detector.observe(100));
        assert_eq!(detector.consecutive_unchanged(), 0);
    }

    #[test]
    fn reports_exhaustion_after_threshold_unchanged() {
        let mut detector = StagnationDetector::new(3);
        assert!(!detector.observe(500));
        assert!(!detector.observe(500));
        assert!(!detector.observe(500));
        assert!(detector.observe(500));
    }

    #[test]
    fn change_resets_counter() {
        let mut detector = StagnationDetector::new(2);
        detector.observe(1);
        assert!(!detector.observe(1));
        assert!(!detector.observe(2));
        assert_eq!(detector.consecutive_unchanged(), 0);
        assert!(!detector.observe(2));
        assert!(detector.observe(2));
    }

    #[test]
    fn threshold_one_exhausts_on_first_repeat() {
        let mut detector = StagnationDetector::new(1);
        detector.observe("h");
        assert!(detector.observe("h"));
    }

    #[test]
    fn zero_threshold_behaves_like_one() {
        let mut detector = StagnationDetector::new(0);
        assert!(!detector.observe(7));
        assert!(detector.observe(7));
    }
}

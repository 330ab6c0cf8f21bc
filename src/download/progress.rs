//! Progress percentage computation and notification throttling.

/// Tracks the last reported percentage for one attempt.
///
/// A percentage is reported only when it differs from the previous report and
/// is divisible by 2 or 3, so values such as 1, 5, 7, 11 are never emitted.
/// Existing clients depend on this exact sequence.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    total: Option<u64>,
    last_reported: u8,
}

impl ProgressThrottle {
    /// Creates a throttle for a transfer of `total` bytes (`None` if unknown).
    #[must_use]
    pub fn new(total: Option<u64>) -> Self {
        Self {
            total: total.filter(|&total| total > 0),
            last_reported: 0,
        }
    }

    /// Returns the percentage to report after `count` bytes are persisted,
    /// or `None` if nothing should be emitted.
    pub fn observe(&mut self, count: u64) -> Option<u8> {
        let total = self.total?;
        let progress = percent(count, total);
        if progress != self.last_reported && (progress % 2 == 0 || progress % 3 == 0) {
            self.last_reported = progress;
            Some(progress)
        } else {
            None
        }
    }

    #[must_use]
    pub fn last_reported(&self) -> u8 {
        self.last_reported
    }
}

// floor(count * 100 / total), clamped: a decoded body may exceed the declared length.
fn percent(count: u64, total: u64) -> u8 {
    let value = u128::from(count) * 100 / u128::from(total);
    u8::try_from(value.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulate(total: u64, start: u64, chunk: u64) -> Vec<u8> {
        let mut throttle = ProgressThrottle::new(Some(total));
        let mut reported = Vec::new();
        let mut count = start;
        while count < total {
            count = (count + chunk).min(total);
            if let Some(progress) = throttle.observe(count) {
                reported.push(progress);
            }
        }
        reported
    }

    #[test]
    fn test_reported_values_pass_filter_and_increase() {
        let reported = simulate(100_000, 0, 1024);
        assert!(!reported.is_empty());
        for window in reported.windows(2) {
            assert!(window[0] < window[1], "not increasing: {reported:?}");
        }
        for value in &reported {
            assert!(value % 2 == 0 || value % 3 == 0, "unfiltered value {value}");
        }
        assert_eq!(reported.last(), Some(&100));
    }

    #[test]
    fn test_filter_skips_values_not_divisible_by_two_or_three() {
        let mut throttle = ProgressThrottle::new(Some(100));
        assert_eq!(throttle.observe(1), None);
        assert_eq!(throttle.observe(2), Some(2));
        assert_eq!(throttle.observe(3), Some(3));
        assert_eq!(throttle.observe(4), Some(4));
        assert_eq!(throttle.observe(5), None);
        assert_eq!(throttle.observe(6), Some(6));
        assert_eq!(throttle.observe(7), None);
        assert_eq!(throttle.last_reported(), 6);
    }

    #[test]
    fn test_same_percentage_is_reported_once() {
        let mut throttle = ProgressThrottle::new(Some(10_000));
        assert_eq!(throttle.observe(200), Some(2));
        assert_eq!(throttle.observe(250), None);
        assert_eq!(throttle.observe(299), None);
        assert_eq!(throttle.observe(300), Some(3));
    }

    #[test]
    fn test_zero_percent_is_never_reported() {
        let mut throttle = ProgressThrottle::new(Some(1_000_000));
        assert_eq!(throttle.observe(1024), None);
    }

    #[test]
    fn test_unknown_or_zero_total_never_reports() {
        let mut unknown = ProgressThrottle::new(None);
        assert_eq!(unknown.observe(1024), None);
        let mut zero = ProgressThrottle::new(Some(0));
        assert_eq!(zero.observe(1024), None);
    }

    #[test]
    fn test_resumed_transfer_starts_from_offset() {
        let reported = simulate(10_000, 5_000, 1024);
        assert!(reported.iter().all(|&value| value > 50));
    }

    #[test]
    fn test_overshoot_is_clamped_to_one_hundred() {
        let mut throttle = ProgressThrottle::new(Some(100));
        assert_eq!(throttle.observe(250), Some(100));
        assert_eq!(throttle.observe(300), None);
    }
}

//! Three-state threshold classification

use crate::results::Severity;
use crate::types::threshold::{Direction, ThresholdPair};

/// Classify one scalar metric against a threshold pair
///
/// The critical boundary is tested first, then the warning boundary; both
/// comparisons are inclusive.
pub fn classify(metric: f64, thresholds: &ThresholdPair<f64>, direction: Direction) -> Severity {
    let breaches = |boundary: f64| match direction {
        Direction::HigherIsWorse => metric >= boundary,
        Direction::LowerIsWorse => metric <= boundary,
    };

    if breaches(thresholds.critical) {
        Severity::Critical
    } else if breaches(thresholds.warning) {
        Severity::Warning
    } else {
        Severity::Ok
    }
}

/// Integer convenience wrapper used by count-based checks
pub fn classify_count(count: u64, thresholds: &ThresholdPair<f64>, direction: Direction) -> Severity {
    classify(count as f64, thresholds, direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_higher_is_worse() {
        let pair = ThresholdPair::new(90.0, 95.0);
        assert_eq!(classify(97.0, &pair, Direction::HigherIsWorse), Severity::Critical);
        assert_eq!(classify(92.0, &pair, Direction::HigherIsWorse), Severity::Warning);
        assert_eq!(classify(50.0, &pair, Direction::HigherIsWorse), Severity::Ok);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let pair = ThresholdPair::new(90.0, 95.0);
        assert_eq!(classify(95.0, &pair, Direction::HigherIsWorse), Severity::Critical);
        assert_eq!(classify(90.0, &pair, Direction::HigherIsWorse), Severity::Warning);
        assert_eq!(classify(89.99, &pair, Direction::HigherIsWorse), Severity::Ok);
    }

    #[test]
    fn test_lower_is_worse() {
        let pair = ThresholdPair::new(20.0, 10.0);
        assert_eq!(classify(5.0, &pair, Direction::LowerIsWorse), Severity::Critical);
        assert_eq!(classify(10.0, &pair, Direction::LowerIsWorse), Severity::Critical);
        assert_eq!(classify(15.0, &pair, Direction::LowerIsWorse), Severity::Warning);
        assert_eq!(classify(50.0, &pair, Direction::LowerIsWorse), Severity::Ok);
    }

    #[test]
    fn test_inverted_pair_checks_critical_first() {
        // Critical below warning: anything past critical is critical
        let pair = ThresholdPair::new(25.0, 4.0);
        assert_eq!(classify_count(5, &pair, Direction::HigherIsWorse), Severity::Critical);
        assert_eq!(classify_count(3, &pair, Direction::HigherIsWorse), Severity::Ok);
    }

    #[test]
    fn test_monotonic_over_range() {
        let pair = ThresholdPair::new(60.0, 90.0);
        let mut previous = Severity::Ok;
        for metric in 0..=120 {
            let severity = classify(metric as f64, &pair, Direction::HigherIsWorse);
            assert!(severity >= previous);
            previous = severity;
        }
    }
}

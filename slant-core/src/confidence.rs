//! Confidence bucketing.
//!
//! Maps a [0, 1] model confidence to a discrete level. Polarity scores from
//! the lexicon model are a different domain and are rejected, not bucketed.

use slant_common::config::ConfidenceConfig;
use slant_common::Result;

use crate::types::{Confidence, ConfidenceLevel};

/// Lower bounds for the medium and high levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceCutPoints {
    /// At or above: high
    pub high: f64,
    /// At or above (and below `high`): medium
    pub medium: f64,
}

impl Default for ConfidenceCutPoints {
    fn default() -> Self {
        Self {
            high: 0.75,
            medium: 0.55,
        }
    }
}

impl ConfidenceCutPoints {
    pub fn from_config(config: &ConfidenceConfig) -> Self {
        Self {
            high: config.high,
            medium: config.medium,
        }
    }

    /// Bucket a validated confidence.
    pub fn level(&self, confidence: Confidence) -> ConfidenceLevel {
        let score = confidence.value();
        if score >= self.high {
            ConfidenceLevel::High
        } else if score >= self.medium {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    /// Bucket a raw score, rejecting anything outside [0, 1].
    pub fn bucket(&self, score: f64) -> Result<ConfidenceLevel> {
        Ok(self.level(Confidence::new(score)?))
    }
}

impl ConfidenceLevel {
    /// Bucket with the default cut points.
    pub fn from_confidence(confidence: Confidence) -> Self {
        ConfidenceCutPoints::default().level(confidence)
    }
}

/// Bucket a [0, 1] score with the default cut points (0.75 / 0.55).
///
/// Returns `Error::ScoreOutOfRange` for negative, greater-than-one or
/// non-finite scores.
pub fn bucket_confidence(score: f64) -> Result<ConfidenceLevel> {
    ConfidenceCutPoints::default().bucket(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case(0.0 => ConfidenceLevel::Low ; "zero")]
    #[test_case(0.549 => ConfidenceLevel::Low ; "just below medium")]
    #[test_case(0.55 => ConfidenceLevel::Medium ; "medium boundary")]
    #[test_case(0.7499 => ConfidenceLevel::Medium ; "just below high")]
    #[test_case(0.75 => ConfidenceLevel::High ; "high boundary")]
    #[test_case(1.0 => ConfidenceLevel::High ; "one")]
    fn test_bucket_boundaries(score: f64) -> ConfidenceLevel {
        bucket_confidence(score).unwrap()
    }

    #[test_case(-0.2 ; "negative polarity")]
    #[test_case(1.1 ; "above one")]
    #[test_case(f64::NAN ; "nan")]
    #[test_case(f64::INFINITY ; "infinity")]
    fn test_rejects_out_of_domain(score: f64) {
        let err = bucket_confidence(score).unwrap_err();
        assert!(err.is_out_of_range());
    }

    #[test]
    fn test_custom_cut_points() {
        let cuts = ConfidenceCutPoints::from_config(&ConfidenceConfig {
            high: 0.9,
            medium: 0.6,
        });
        assert_eq!(cuts.bucket(0.8).unwrap(), ConfidenceLevel::Medium);
        assert_eq!(cuts.bucket(0.9).unwrap(), ConfidenceLevel::High);
    }

    #[test]
    fn test_from_confidence() {
        let c = Confidence::new(0.76).unwrap();
        assert_eq!(ConfidenceLevel::from_confidence(c), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_confidence(Confidence::ZERO), ConfidenceLevel::Low);
    }

    proptest! {
        #[test]
        fn prop_bucket_is_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(bucket_confidence(lo).unwrap() <= bucket_confidence(hi).unwrap());
        }

        #[test]
        fn prop_in_domain_never_fails(score in 0.0f64..=1.0) {
            prop_assert!(bucket_confidence(score).is_ok());
        }
    }
}

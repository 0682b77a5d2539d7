//! Framing bias reasoner.
//!
//! Combines the sentiment label, the confidence level and the lexicon bias
//! level into a final verdict.
//!
//! | Rule | Condition | Framing | Reason |
//! |------|-----------|---------|--------|
//! | 1 | default | low | No strong framing detected |
//! | 2 | neutral, bias moderate/high | moderate | Neutral tone with emotive or exaggerated language |
//! | 3 | positive/negative, bias moderate/high | high | Emotional sentiment reinforced by biased language |
//! | 4 | confidence low | low | Low model confidence, framing unclear |
//!
//! Later rules override earlier ones. Rule 4 always wins.

use crate::types::{BiasLevel, ConfidenceLevel, FramingVerdict, SentimentLabel};

pub const REASON_NONE: &str = "No strong framing detected";
pub const REASON_NEUTRAL_BIASED: &str = "Neutral tone with emotive or exaggerated language";
pub const REASON_EMOTIONAL_BIASED: &str = "Emotional sentiment reinforced by biased language";
pub const REASON_LOW_CONFIDENCE: &str = "Low model confidence, framing unclear";

/// Assess framing bias. Pure and total.
///
/// `BiasLevel::High` is handled like `Moderate` even though the lexicon
/// scorer never emits it.
pub fn assess_framing(
    label: SentimentLabel,
    confidence: ConfidenceLevel,
    bias: BiasLevel,
) -> FramingVerdict {
    let (framing_bias, reason) = if confidence == ConfidenceLevel::Low {
        (BiasLevel::Low, REASON_LOW_CONFIDENCE)
    } else if !bias.is_elevated() {
        (BiasLevel::Low, REASON_NONE)
    } else if label.is_emotional() {
        (BiasLevel::High, REASON_EMOTIONAL_BIASED)
    } else {
        (BiasLevel::Moderate, REASON_NEUTRAL_BIASED)
    };

    FramingVerdict {
        framing_bias,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    use crate::types::{BiasLevel as B, ConfidenceLevel as C, SentimentLabel as S};

    #[test_case(S::Neutral, C::High, B::Moderate => (B::Moderate, REASON_NEUTRAL_BIASED) ; "neutral with biased language")]
    #[test_case(S::Positive, C::Low, B::High => (B::Low, REASON_LOW_CONFIDENCE) ; "low confidence overrides emotional and biased")]
    #[test_case(S::Negative, C::Medium, B::Moderate => (B::High, REASON_EMOTIONAL_BIASED) ; "negative with biased language")]
    #[test_case(S::Positive, C::High, B::Low => (B::Low, REASON_NONE) ; "emotional but unbiased")]
    #[test_case(S::Neutral, C::Medium, B::Low => (B::Low, REASON_NONE) ; "neutral and unbiased")]
    #[test_case(S::Neutral, C::High, B::High => (B::Moderate, REASON_NEUTRAL_BIASED) ; "neutral with high bias")]
    #[test_case(S::Positive, C::High, B::High => (B::High, REASON_EMOTIONAL_BIASED) ; "positive with high bias")]
    #[test_case(S::Neutral, C::Low, B::Moderate => (B::Low, REASON_LOW_CONFIDENCE) ; "low confidence overrides neutral rule")]
    #[test_case(S::Negative, C::Low, B::Low => (B::Low, REASON_LOW_CONFIDENCE) ; "low confidence without bias")]
    fn test_decision_table(label: S, confidence: C, bias: B) -> (B, &'static str) {
        let verdict = assess_framing(label, confidence, bias);
        let reason = [
            REASON_NONE,
            REASON_NEUTRAL_BIASED,
            REASON_EMOTIONAL_BIASED,
            REASON_LOW_CONFIDENCE,
        ]
        .into_iter()
        .find(|r| *r == verdict.reason)
        .unwrap();
        (verdict.framing_bias, reason)
    }

    #[test]
    fn test_total_over_all_inputs() {
        let labels = [S::Positive, S::Neutral, S::Negative];
        let confidences = [C::Low, C::Medium, C::High];
        let biases = [B::Low, B::Moderate, B::High];

        for label in labels {
            for confidence in confidences {
                for bias in biases {
                    let verdict = assess_framing(label, confidence, bias);
                    assert!(!verdict.reason.is_empty());
                    if confidence == C::Low {
                        assert_eq!(verdict.framing_bias, B::Low);
                    }
                }
            }
        }
    }

    #[test]
    fn test_serializes_lowercase() {
        let verdict = assess_framing(S::Negative, C::Medium, B::Moderate);
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["framing_bias"], "high");
        assert_eq!(json["reason"], REASON_EMOTIONAL_BIASED);
    }
}

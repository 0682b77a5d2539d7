//! Dual-model sentiment comparison.

use std::sync::Arc;
use tracing::debug;

use crate::sentiment::SentimentClassifier;
use crate::types::DualSentimentReport;

/// Runs a statistical and a lexicon classifier side by side.
///
/// The comparator only reports agreement. What to do about disagreement is
/// up to the caller.
#[derive(Clone)]
pub struct DualModelComparator {
    statistical: Arc<dyn SentimentClassifier>,
    lexicon: Arc<dyn SentimentClassifier>,
}

impl DualModelComparator {
    pub fn new(
        statistical: Arc<dyn SentimentClassifier>,
        lexicon: Arc<dyn SentimentClassifier>,
    ) -> Self {
        Self {
            statistical,
            lexicon,
        }
    }

    /// Classify `text` with both models.
    pub fn compare(&self, text: &str) -> DualSentimentReport {
        compare_dual_sentiment(self.statistical.as_ref(), self.lexicon.as_ref(), text)
    }
}

/// Classify `text` with both models and report whether their labels match.
pub fn compare_dual_sentiment(
    statistical: &dyn SentimentClassifier,
    lexicon: &dyn SentimentClassifier,
    text: &str,
) -> DualSentimentReport {
    let statistical = statistical.classify(text);
    let lexicon = lexicon.classify(text);
    let agreement = statistical.label == lexicon.label;

    if !agreement {
        debug!(
            statistical = %statistical.label,
            lexicon = %lexicon.label,
            "Sentiment models disagree"
        );
    }

    DualSentimentReport {
        statistical,
        lexicon,
        agreement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::LexiconSentimentClassifier;
    use crate::types::{ModelKind, SentimentLabel, SentimentVerdict};

    /// Always answers with the same label.
    struct FixedClassifier(SentimentLabel);

    impl SentimentClassifier for FixedClassifier {
        fn kind(&self) -> ModelKind {
            ModelKind::Statistical
        }

        fn classify(&self, _text: &str) -> SentimentVerdict {
            SentimentVerdict {
                label: self.0,
                score: 0.9,
                model: ModelKind::Statistical,
            }
        }
    }

    fn comparator(statistical: SentimentLabel) -> DualModelComparator {
        DualModelComparator::new(
            Arc::new(FixedClassifier(statistical)),
            Arc::new(LexiconSentimentClassifier::new()),
        )
    }

    #[test]
    fn test_disagreement_when_labels_differ() {
        let report = comparator(SentimentLabel::Neutral)
            .compare("What a wonderful, excellent and delightful day");
        assert_eq!(report.lexicon.label, SentimentLabel::Positive);
        assert_eq!(report.statistical.label, SentimentLabel::Neutral);
        assert!(!report.agreement);
    }

    #[test]
    fn test_agreement_when_labels_match() {
        let report = comparator(SentimentLabel::Positive)
            .compare("What a wonderful, excellent and delightful day");
        assert!(report.agreement);
    }

    #[test]
    fn test_empty_text_both_neutral() {
        let report = comparator(SentimentLabel::Neutral).compare("");
        assert_eq!(report.lexicon, SentimentVerdict::neutral(ModelKind::Lexicon));
        assert!(report.agreement);
    }

    #[test]
    fn test_verdicts_keep_their_domains() {
        let report = comparator(SentimentLabel::Negative).compare("a terrible outcome");
        assert_eq!(report.statistical.model, ModelKind::Statistical);
        assert_eq!(report.lexicon.model, ModelKind::Lexicon);
    }
}

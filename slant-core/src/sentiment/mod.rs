//! Sentiment classifiers.
//!
//! Two independent classifiers share one interface:
//!
//! - [`LexiconSentimentClassifier`]: rule-based polarity in [-1, 1]
//! - [`StatisticalSentimentClassifier`]: pretrained model confidence in [0, 1]
//!
//! The two scores live in different domains. Only statistical scores are
//! confidences; see [`SentimentVerdict::confidence`](crate::types::SentimentVerdict::confidence).

pub mod lexicon;
pub mod model;
pub mod statistical;
#[cfg(feature = "transformer")]
pub mod transformer;

pub use lexicon::{classify_sentiment_lexicon, LabelThresholds, LexiconSentimentClassifier};
pub use model::{
    load_sentiment_model, map_raw_label, LabelScore, LinearSentimentModel, SentimentModel,
};
#[cfg(feature = "transformer")]
pub use transformer::TransformerSentimentModel;
pub use statistical::StatisticalSentimentClassifier;

use crate::types::{ModelKind, SentimentVerdict};

/// A text-to-sentiment classifier.
///
/// Implementations never fail: any internal failure yields the neutral verdict.
pub trait SentimentClassifier: Send + Sync {
    /// Which score domain this classifier reports in.
    fn kind(&self) -> ModelKind;

    /// Classify a text sample.
    fn classify(&self, text: &str) -> SentimentVerdict;
}

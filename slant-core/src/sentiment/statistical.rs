//! Statistical sentiment classifier.
//!
//! Wraps an injected [`SentimentModel`] with input validation, truncation and
//! a fail-safe-to-neutral policy: whatever the backend does, the caller gets a
//! verdict, never an error. A panicking backend is contained as well.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

use slant_common::config::StatisticalConfig;
use slant_common::Result;

use super::model::{load_sentiment_model, map_raw_label, LabelScore, SentimentModel};
use super::SentimentClassifier;
use crate::types::{round_to, ModelKind, SentimentVerdict};

/// Characters of input passed to the model.
pub const DEFAULT_MAX_CHARS: usize = 512;
/// Trimmed inputs shorter than this are not classified.
pub const DEFAULT_MIN_CHARS: usize = 10;

/// Longest prefix of `text` holding at most `max_chars` characters.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// First label with the highest score.
fn top_label(scores: &[LabelScore]) -> Option<&LabelScore> {
    scores.iter().fold(None, |best: Option<&LabelScore>, s| match best {
        Some(b) if b.score >= s.score => Some(b),
        _ => Some(s),
    })
}

/// Sentiment from a pretrained model, scored as top-label confidence in [0, 1].
#[derive(Clone)]
pub struct StatisticalSentimentClassifier {
    model: Arc<dyn SentimentModel>,
    max_chars: usize,
    min_chars: usize,
}

impl fmt::Debug for StatisticalSentimentClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatisticalSentimentClassifier")
            .field("model", &self.model.name())
            .field("max_chars", &self.max_chars)
            .field("min_chars", &self.min_chars)
            .finish()
    }
}

impl StatisticalSentimentClassifier {
    /// Wrap a loaded model with the default input limits.
    pub fn new(model: Arc<dyn SentimentModel>) -> Self {
        Self {
            model,
            max_chars: DEFAULT_MAX_CHARS,
            min_chars: DEFAULT_MIN_CHARS,
        }
    }

    /// Load the configured backend and apply the configured limits.
    pub fn from_config(config: &StatisticalConfig) -> Result<Self> {
        let model = load_sentiment_model(config)?;
        Ok(Self::new(model).with_limits(config.min_chars, config.max_chars))
    }

    pub fn with_limits(mut self, min_chars: usize, max_chars: usize) -> Self {
        self.min_chars = min_chars;
        self.max_chars = max_chars;
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Classify possibly-missing text.
    pub fn classify_optional(&self, text: Option<&str>) -> SentimentVerdict {
        let neutral = SentimentVerdict::neutral(ModelKind::Statistical);

        let Some(text) = text else {
            debug!("No text supplied, statistical sentiment defaults to neutral");
            return neutral;
        };

        let trimmed_chars = text.trim().chars().count();
        if trimmed_chars < self.min_chars {
            debug!(
                chars = trimmed_chars,
                min_chars = self.min_chars,
                "Text too short, statistical sentiment defaults to neutral"
            );
            return neutral;
        }

        let input = truncate_chars(text, self.max_chars);

        let scores = match panic::catch_unwind(AssertUnwindSafe(|| self.model.predict(input))) {
            Ok(Ok(scores)) => scores,
            Ok(Err(e)) => {
                warn!(model = %self.model.name(), error = %e, "Sentiment model failed");
                return neutral;
            }
            Err(_) => {
                warn!(model = %self.model.name(), "Sentiment model panicked");
                return neutral;
            }
        };

        let Some(top) = top_label(&scores) else {
            warn!(model = %self.model.name(), "Sentiment model returned no labels");
            return neutral;
        };

        let Some(label) = map_raw_label(&top.label) else {
            warn!(model = %self.model.name(), label = %top.label, "Unknown sentiment label");
            return neutral;
        };

        if !top.score.is_finite() || !(0.0..=1.0).contains(&top.score) {
            warn!(
                model = %self.model.name(),
                score = top.score,
                "Sentiment model returned an invalid probability"
            );
            return neutral;
        }

        SentimentVerdict {
            label,
            score: round_to(top.score, 3),
            model: ModelKind::Statistical,
        }
    }
}

impl SentimentClassifier for StatisticalSentimentClassifier {
    fn kind(&self) -> ModelKind {
        ModelKind::Statistical
    }

    fn classify(&self, text: &str) -> SentimentVerdict {
        self.classify_optional(Some(text))
    }
}

/// Classify possibly-missing text with a loaded model and the default limits.
pub fn classify_sentiment_statistical(
    model: Arc<dyn SentimentModel>,
    text: Option<&str>,
) -> SentimentVerdict {
    StatisticalSentimentClassifier::new(model).classify_optional(text)
}

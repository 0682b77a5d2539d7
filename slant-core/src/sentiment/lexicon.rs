//! Lexicon polarity model.
//!
//! Bag-of-words polarity in the Pattern style: each known word contributes its
//! polarity, scaled by a directly preceding intensifier or diminisher and
//! flipped (at half strength) by a negation in the two preceding tokens. The
//! text's polarity is the mean contribution, clamped to [-1, 1].

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use tracing::trace;

use slant_common::config::LexiconSentimentConfig;

use super::SentimentClassifier;
use crate::tokenizer::tokenize;
use crate::types::{ModelKind, SentimentLabel, SentimentVerdict};

/// Multiplier applied to a word's polarity when it is negated.
const NEGATION_FACTOR: f64 = -0.5;

/// How many tokens before a word a negation may appear.
const NEGATION_WINDOW: usize = 2;

/// General-purpose polarity lexicon.
const POLARITY_WORDS: &[(&str, f64)] = &[
    // Positive
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("wonderful", 1.0),
    ("fantastic", 0.4),
    ("amazing", 0.6),
    ("brilliant", 0.9),
    ("best", 1.0),
    ("better", 0.5),
    ("nice", 0.6),
    ("happy", 0.8),
    ("glad", 0.5),
    ("pleased", 0.5),
    ("love", 0.5),
    ("loved", 0.7),
    ("beautiful", 0.85),
    ("positive", 0.23),
    ("successful", 0.75),
    ("success", 0.5),
    ("win", 0.8),
    ("wins", 0.8),
    ("victory", 0.6),
    ("strong", 0.43),
    ("stronger", 0.5),
    ("safe", 0.5),
    ("secure", 0.4),
    ("healthy", 0.5),
    ("helpful", 0.5),
    ("hopeful", 0.5),
    ("optimistic", 0.5),
    ("impressive", 1.0),
    ("remarkable", 0.75),
    ("outstanding", 0.5),
    ("perfect", 1.0),
    ("fair", 0.7),
    ("effective", 0.6),
    ("efficient", 0.5),
    ("improved", 0.4),
    ("improve", 0.4),
    ("growth", 0.3),
    ("gain", 0.3),
    ("gains", 0.3),
    ("benefit", 0.4),
    ("benefits", 0.4),
    ("celebrate", 0.6),
    ("welcome", 0.8),
    ("praised", 0.6),
    ("support", 0.2),
    ("progress", 0.4),
    ("recovery", 0.3),
    ("stable", 0.3),
    ("calm", 0.3),
    ("peaceful", 0.5),
    ("thriving", 0.6),
    ("encouraging", 0.5),
    ("favorable", 0.5),
    ("generous", 0.6),
    ("innovative", 0.5),
    ("smart", 0.2),
    ("clear", 0.1),
    // Negative
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("worst", -1.0),
    ("worse", -0.4),
    ("poor", -0.4),
    ("sad", -0.5),
    ("angry", -0.5),
    ("upset", -0.4),
    ("hate", -0.8),
    ("hated", -0.9),
    ("ugly", -0.7),
    ("wrong", -0.5),
    ("failure", -0.3),
    ("fail", -0.5),
    ("failed", -0.5),
    ("fails", -0.5),
    ("loss", -0.3),
    ("losses", -0.3),
    ("lose", -0.3),
    ("lost", -0.3),
    ("weak", -0.375),
    ("weaker", -0.4),
    ("decline", -0.3),
    ("declined", -0.3),
    ("harmful", -0.5),
    ("harm", -0.4),
    ("dangerous", -0.6),
    ("danger", -0.5),
    ("threat", -0.4),
    ("corrupt", -0.5),
    ("fraud", -0.6),
    ("crime", -0.4),
    ("violent", -0.8),
    ("violence", -0.6),
    ("death", -0.5),
    ("killed", -0.6),
    ("war", -0.4),
    ("fear", -0.5),
    ("afraid", -0.6),
    ("worried", -0.4),
    ("concern", -0.2),
    ("concerns", -0.2),
    ("problem", -0.3),
    ("problems", -0.3),
    ("difficult", -0.5),
    ("painful", -0.7),
    ("unfair", -0.5),
    ("disappointing", -0.6),
    ("disappointed", -0.75),
    ("shocking", -1.0),
    ("disaster", -0.6),
    ("disastrous", -0.8),
    ("crisis", -0.4),
    ("chaos", -0.5),
    ("outrage", -0.6),
    ("furious", -0.6),
    ("devastating", -0.5),
    ("catastrophic", -0.8),
    ("horrific", -1.0),
    ("brutal", -0.875),
    ("alarming", -0.4),
    ("scandal", -0.5),
    ("panic", -0.5),
    ("nightmare", -0.7),
    ("collapse", -0.5),
    ("crash", -0.5),
    ("slump", -0.4),
];

/// Words that scale the polarity of the word directly after them.
const MODIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("extremely", 1.5),
    ("incredibly", 1.4),
    ("highly", 1.3),
    ("deeply", 1.3),
    ("truly", 1.2),
    ("so", 1.2),
    ("too", 1.2),
    ("most", 1.4),
    ("remarkably", 1.3),
    ("quite", 1.1),
    ("fairly", 0.8),
    ("rather", 0.8),
    ("somewhat", 0.6),
    ("slightly", 0.5),
    ("barely", 0.4),
];

/// Tokens that negate a following word. `t` covers contractions such as
/// "isn't", which the tokenizer splits into "isn" and "t".
const NEGATIONS: &[&str] = &[
    "not", "no", "never", "nor", "neither", "cannot", "without", "t",
];

/// Polarity cut points for labelling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelThresholds {
    /// Polarity strictly above this is positive
    pub positive: f64,
    /// Polarity strictly below this is negative
    pub negative: f64,
}

impl Default for LabelThresholds {
    fn default() -> Self {
        Self {
            positive: 0.1,
            negative: -0.1,
        }
    }
}

impl LabelThresholds {
    /// The stricter variant (0.20 / -0.20).
    pub fn strict() -> Self {
        Self {
            positive: 0.2,
            negative: -0.2,
        }
    }

    pub fn from_config(config: &LexiconSentimentConfig) -> Self {
        Self {
            positive: config.positive_threshold,
            negative: config.negative_threshold,
        }
    }

    /// Label a polarity score.
    pub fn label(&self, polarity: f64) -> SentimentLabel {
        if polarity > self.positive {
            SentimentLabel::Positive
        } else if polarity < self.negative {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// Lexicon polarity sentiment classifier.
#[derive(Debug, Clone)]
pub struct LexiconSentimentClassifier {
    words: HashMap<String, f64>,
    modifiers: HashMap<String, f64>,
    negations: HashSet<String>,
    thresholds: LabelThresholds,
}

impl Default for LexiconSentimentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconSentimentClassifier {
    /// Create a classifier with the built-in lexicon and default thresholds.
    pub fn new() -> Self {
        Self {
            words: POLARITY_WORDS
                .iter()
                .map(|(w, p)| ((*w).to_string(), *p))
                .collect(),
            modifiers: MODIFIERS
                .iter()
                .map(|(w, m)| ((*w).to_string(), *m))
                .collect(),
            negations: NEGATIONS.iter().map(|w| (*w).to_string()).collect(),
            thresholds: LabelThresholds::default(),
        }
    }

    /// Create from the `lexicon_sentiment` configuration section.
    pub fn from_config(config: &LexiconSentimentConfig) -> Self {
        Self::new().with_thresholds(LabelThresholds::from_config(config))
    }

    /// Set label thresholds.
    pub fn with_thresholds(mut self, thresholds: LabelThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Add or override polarity entries. Values are clamped to [-1, 1].
    pub fn with_words<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        for (word, polarity) in entries {
            self.words
                .insert(word.into().to_lowercase(), polarity.clamp(-1.0, 1.0));
        }
        self
    }

    pub fn thresholds(&self) -> LabelThresholds {
        self.thresholds
    }

    /// Polarity of a text in [-1, 1]. Zero when no known word occurs.
    pub fn polarity(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        let mut contributions = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.words.get(token) else {
                continue;
            };

            let mut value = base;

            if i >= 1 {
                if let Some(&factor) = self.modifiers.get(&tokens[i - 1]) {
                    value = (value * factor).clamp(-1.0, 1.0);
                }
            }

            let window_start = i.saturating_sub(NEGATION_WINDOW);
            if tokens[window_start..i]
                .iter()
                .any(|t| self.negations.contains(t))
            {
                value *= NEGATION_FACTOR;
            }

            trace!(word = %token, base, value, "Polarity contribution");
            contributions.push(value);
        }

        if contributions.is_empty() {
            return 0.0;
        }

        let mean = contributions.iter().sum::<f64>() / contributions.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

impl SentimentClassifier for LexiconSentimentClassifier {
    fn kind(&self) -> ModelKind {
        ModelKind::Lexicon
    }

    fn classify(&self, text: &str) -> SentimentVerdict {
        let polarity = self.polarity(text);
        SentimentVerdict {
            label: self.thresholds.label(polarity),
            score: polarity,
            model: ModelKind::Lexicon,
        }
    }
}

static DEFAULT_CLASSIFIER: Lazy<LexiconSentimentClassifier> =
    Lazy::new(LexiconSentimentClassifier::new);

/// Classify text with the built-in lexicon and default thresholds.
pub fn classify_sentiment_lexicon(text: &str) -> SentimentVerdict {
    DEFAULT_CLASSIFIER.classify(text)
}

//! Lexicon bias scorer.
//!
//! Counts emotionally charged and absolutist vocabulary and turns the counts
//! into an explainable bias level.
//!
//! # Classification
//!
//! | Condition | Level |
//! |-----------|-------|
//! | no tokens | low (short-circuit) |
//! | emotive ratio > ratio threshold | moderate |
//! | absolutist count >= count threshold | moderate |
//! | otherwise | low |
//!
//! The scorer never produces `High`.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use tracing::debug;

use slant_common::config::{BiasConfig, DEFAULT_ABSOLUTIST_WORDS, DEFAULT_EMOTIVE_WORDS};

use crate::tokenizer::tokenize;
use crate::types::{round_to, BiasLevel, BiasReport};

/// Thresholds for the moderate bias level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiasThresholds {
    /// Emotive ratio strictly above this is moderate
    pub emotive_ratio: f64,
    /// Absolutist count at or above this is moderate
    pub absolutist_count: usize,
}

impl Default for BiasThresholds {
    fn default() -> Self {
        Self {
            emotive_ratio: 0.01,
            absolutist_count: 2,
        }
    }
}

impl BiasThresholds {
    /// The older, more permissive cut points (0.015 / 3).
    pub fn legacy() -> Self {
        Self {
            emotive_ratio: 0.015,
            absolutist_count: 3,
        }
    }

    /// Classify counts into a bias level.
    pub fn classify(&self, emotive_ratio: f64, absolutist_count: usize) -> BiasLevel {
        if emotive_ratio > self.emotive_ratio || absolutist_count >= self.absolutist_count {
            BiasLevel::Moderate
        } else {
            BiasLevel::Low
        }
    }
}

/// The two closed term sets.
#[derive(Debug, Clone, PartialEq)]
pub struct BiasLexicon {
    emotive: HashSet<String>,
    absolutist: HashSet<String>,
}

impl Default for BiasLexicon {
    fn default() -> Self {
        Self::new(
            DEFAULT_EMOTIVE_WORDS.iter().copied(),
            DEFAULT_ABSOLUTIST_WORDS.iter().copied(),
        )
    }
}

impl BiasLexicon {
    /// Build from word lists. Words are lowercased so lookups match tokens.
    pub fn new<E, A>(emotive: E, absolutist: A) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        Self {
            emotive: emotive.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
            absolutist: absolutist
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn is_emotive(&self, token: &str) -> bool {
        self.emotive.contains(token)
    }

    pub fn is_absolutist(&self, token: &str) -> bool {
        self.absolutist.contains(token)
    }
}

/// Scores text for emotive and absolutist language.
#[derive(Debug, Clone, Default)]
pub struct LexiconBiasScorer {
    lexicon: BiasLexicon,
    thresholds: BiasThresholds,
}

impl LexiconBiasScorer {
    pub fn new(lexicon: BiasLexicon, thresholds: BiasThresholds) -> Self {
        Self {
            lexicon,
            thresholds,
        }
    }

    /// Build from the `bias` configuration section.
    pub fn from_config(config: &BiasConfig) -> Self {
        Self::new(
            BiasLexicon::new(&config.emotive_words, &config.absolutist_words),
            BiasThresholds {
                emotive_ratio: config.emotive_ratio_threshold,
                absolutist_count: config.absolutist_count_threshold,
            },
        )
    }

    pub fn thresholds(&self) -> BiasThresholds {
        self.thresholds
    }

    /// Score a text sample.
    pub fn score(&self, text: &str) -> BiasReport {
        let words = tokenize(text);
        let total_words = words.len();

        if total_words == 0 {
            debug!("No tokens in text, bias defaults to low");
            return BiasReport::empty();
        }

        let emotive_count = words.iter().filter(|w| self.lexicon.is_emotive(w)).count();
        let absolutist_count = words
            .iter()
            .filter(|w| self.lexicon.is_absolutist(w))
            .count();

        let emotive_ratio = emotive_count as f64 / total_words as f64;
        let bias_level = self.thresholds.classify(emotive_ratio, absolutist_count);

        debug!(
            total_words,
            emotive_count,
            absolutist_count,
            bias_level = %bias_level,
            "Scored lexicon bias"
        );

        BiasReport {
            emotive_ratio: round_to(emotive_ratio, 4),
            absolutist_count,
            bias_level,
            emotive_count,
            total_words,
        }
    }
}

static DEFAULT_SCORER: Lazy<LexiconBiasScorer> = Lazy::new(LexiconBiasScorer::default);

/// Score text with the default lexicon and thresholds.
pub fn score_lexicon_bias(text: &str) -> BiasReport {
    DEFAULT_SCORER.score(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filler(n: usize) -> String {
        vec!["report"; n].join(" ")
    }

    #[test]
    fn test_empty_text() {
        let report = score_lexicon_bias("");
        assert_eq!(report.emotive_ratio, 0.0);
        assert_eq!(report.absolutist_count, 0);
        assert_eq!(report.bias_level, BiasLevel::Low);
    }

    #[test]
    fn test_punctuation_only_short_circuits() {
        assert_eq!(score_lexicon_bias("!!! ... ???"), BiasReport::empty());
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(score_lexicon_bias("SHOCKING"), score_lexicon_bias("shocking"));
    }

    #[test]
    fn test_two_absolutist_words_trigger_moderate() {
        let text = format!("always never {}", filler(98));
        let report = score_lexicon_bias(&text);
        assert_eq!(report.total_words, 100);
        assert_eq!(report.emotive_count, 0);
        assert_eq!(report.absolutist_count, 2);
        assert_eq!(report.bias_level, BiasLevel::Moderate);
    }

    #[test]
    fn test_one_absolutist_word_stays_low() {
        let text = format!("always {}", filler(99));
        assert_eq!(score_lexicon_bias(&text).bias_level, BiasLevel::Low);
    }

    #[test]
    fn test_emotive_ratio_threshold_is_strict() {
        // 1 / 100 == 0.01, not above the threshold
        let text = format!("chaos {}", filler(99));
        let report = score_lexicon_bias(&text);
        assert_eq!(report.emotive_ratio, 0.01);
        assert_eq!(report.bias_level, BiasLevel::Low);

        // 2 / 100 is above it
        let text = format!("chaos crisis {}", filler(98));
        assert_eq!(score_lexicon_bias(&text).bias_level, BiasLevel::Moderate);
    }

    #[test]
    fn test_ratio_half_rounds_to_even() {
        // 1 / 32 == 0.03125 exactly
        let text = format!("chaos {}", filler(31));
        let report = score_lexicon_bias(&text);
        assert_eq!(report.total_words, 32);
        assert_eq!(report.emotive_ratio, 0.0312);
        assert_eq!(report.bias_level, BiasLevel::Moderate);
    }

    #[test]
    fn test_duplicates_counted_and_ratio_rounded() {
        let report = score_lexicon_bias("Outrage! Outrage! The outrage continues.");
        assert_eq!(report.emotive_count, 3);
        assert_eq!(report.total_words, 5);
        assert_eq!(report.emotive_ratio, 0.6);

        let report = score_lexicon_bias("crisis talks resumed");
        assert_eq!(report.emotive_ratio, 0.3333);
    }

    #[test]
    fn test_legacy_thresholds() {
        let scorer = LexiconBiasScorer::new(BiasLexicon::default(), BiasThresholds::legacy());
        let text = format!("always never {}", filler(98));
        assert_eq!(scorer.score(&text).bias_level, BiasLevel::Low);

        let text = format!("always never everyone {}", filler(97));
        assert_eq!(scorer.score(&text).bias_level, BiasLevel::Moderate);
    }

    #[test]
    fn test_from_config_custom_lexicon() {
        let config = BiasConfig {
            emotive_words: vec!["uproar".into()],
            absolutist_words: vec!["invariably".into()],
            ..Default::default()
        };
        let scorer = LexiconBiasScorer::from_config(&config);

        let report = scorer.score("An uproar over shocking claims");
        assert_eq!(report.emotive_count, 1);
        assert_eq!(report.bias_level, BiasLevel::Moderate);
    }

    #[test]
    fn test_never_high() {
        let report = score_lexicon_bias("shocking outrage chaos always never everyone");
        assert_eq!(report.bias_level, BiasLevel::Moderate);
    }
}

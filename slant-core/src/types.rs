//! Value types shared by the scorers.
//!
//! Every type here is created fresh per analysis call and never mutated after
//! construction. Labels serialize as lowercase strings.

use serde::{Deserialize, Serialize};
use slant_common::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Round to a fixed number of decimal digits for reporting.
///
/// Exact halves round to the even neighbour, so `0.03125` reports as `0.0312`.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

// ============================================================================
// Labels and Levels
// ============================================================================

/// Three-way sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }

    /// Positive or negative, i.e. not neutral.
    pub fn is_emotional(&self) -> bool {
        !matches!(self, SentimentLabel::Neutral)
    }
}

/// Bias level shared by the lexicon scorer and the framing reasoner.
///
/// The lexicon scorer never emits `High`; the framing reasoner still handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiasLevel {
    Low,
    Moderate,
    High,
}

impl BiasLevel {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            BiasLevel::Low => "low",
            BiasLevel::Moderate => "moderate",
            BiasLevel::High => "high",
        }
    }

    /// Moderate or high.
    pub fn is_elevated(&self) -> bool {
        *self >= BiasLevel::Moderate
    }
}

/// Discrete confidence bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        }
    }

    /// One step lower, saturating at `Low`.
    pub fn step_down(self) -> Self {
        match self {
            ConfidenceLevel::High => ConfidenceLevel::Medium,
            ConfidenceLevel::Medium | ConfidenceLevel::Low => ConfidenceLevel::Low,
        }
    }
}

macro_rules! impl_label_text {
    ($ty:ty, $kind:literal, [$($variant:ident),+]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let normalized = s.trim().to_lowercase();
                $(
                    if normalized == <$ty>::$variant.as_str() {
                        return Ok(<$ty>::$variant);
                    }
                )+
                Err(Error::InvalidInput(format!("unknown {} '{}'", $kind, s)))
            }
        }
    };
}

impl_label_text!(SentimentLabel, "sentiment label", [Positive, Neutral, Negative]);
impl_label_text!(BiasLevel, "bias level", [Low, Moderate, High]);
impl_label_text!(ConfidenceLevel, "confidence level", [Low, Medium, High]);

// ============================================================================
// Confidence
// ============================================================================

/// A probability-like confidence, guaranteed finite and within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Zero confidence.
    pub const ZERO: Confidence = Confidence(0.0);

    /// Validate a raw score as a confidence.
    pub fn new(score: f64) -> Result<Self> {
        if score.is_finite() && (0.0..=1.0).contains(&score) {
            Ok(Self(score))
        } else {
            Err(Error::ScoreOutOfRange {
                score,
                domain: "[0, 1] confidence",
            })
        }
    }

    /// The raw value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> f64 {
        c.0
    }
}

// ============================================================================
// Verdicts
// ============================================================================

/// Which classifier produced a verdict, and so which domain its score lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Score is a polarity in [-1, 1]
    Lexicon,
    /// Score is a top-label confidence in [0, 1]
    Statistical,
}

/// A sentiment label with the producing model's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentVerdict {
    pub label: SentimentLabel,
    /// Polarity for `Lexicon`, confidence for `Statistical`
    pub score: f64,
    pub model: ModelKind,
}

impl SentimentVerdict {
    /// The fail-safe verdict: neutral with a zero score.
    pub fn neutral(model: ModelKind) -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: 0.0,
            model,
        }
    }

    /// The score as a confidence. `None` for lexicon polarity scores, which
    /// are not confidences and must not be bucketed.
    pub fn confidence(&self) -> Option<Confidence> {
        match self.model {
            ModelKind::Statistical => Confidence::new(self.score).ok(),
            ModelKind::Lexicon => None,
        }
    }
}

/// Output of the lexicon bias scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasReport {
    /// Emotive tokens over all tokens, rounded to 4 decimals
    pub emotive_ratio: f64,
    pub absolutist_count: usize,
    pub bias_level: BiasLevel,
    pub emotive_count: usize,
    pub total_words: usize,
}

impl BiasReport {
    /// Report for text with no tokens.
    pub fn empty() -> Self {
        Self {
            emotive_ratio: 0.0,
            absolutist_count: 0,
            bias_level: BiasLevel::Low,
            emotive_count: 0,
            total_words: 0,
        }
    }
}

/// Both sentiment verdicts for one text and whether their labels match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualSentimentReport {
    pub statistical: SentimentVerdict,
    pub lexicon: SentimentVerdict,
    pub agreement: bool,
}

/// Final framing verdict with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramingVerdict {
    pub framing_bias: BiasLevel,
    pub reason: String,
}

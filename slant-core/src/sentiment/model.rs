//! Statistical sentiment model backends.
//!
//! A `SentimentModel` is the inference runtime behind the statistical
//! classifier: it turns text into a probability per raw label. Backends are
//! loaded once, never mutated, and shared through `Arc` across threads.
//! Backends that are not thread-safe must serialize calls internally.
//!
//! Two backends ship with the crate:
//!
//! - `TransformerSentimentModel` (feature `transformer`): a pretrained
//!   RoBERTa classifier loaded from `statistical.model_dir`
//! - [`LinearSentimentModel`]: an offline fallback for tests and machines
//!   without a checkpoint

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use slant_common::config::StatisticalConfig;
use slant_common::{Error, Result, ResultExt};

use crate::tokenizer::tokenize;
use crate::types::SentimentLabel;

/// Raw label emitted for negative sentiment.
pub const LABEL_NEGATIVE: &str = "LABEL_0";
/// Raw label emitted for neutral sentiment.
pub const LABEL_NEUTRAL: &str = "LABEL_1";
/// Raw label emitted for positive sentiment.
pub const LABEL_POSITIVE: &str = "LABEL_2";

/// Parameters shipped with the crate.
const BUNDLED_PARAMETERS: &str = include_str!("../../models/sentiment_default.json");

/// Probability assigned to one raw label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Map a raw model label to a sentiment label.
///
/// Accepts the indexed labels of three-way models as well as plain label
/// names. Returns `None` for anything else.
pub fn map_raw_label(raw: &str) -> Option<SentimentLabel> {
    match raw.trim().to_lowercase().as_str() {
        "label_0" | "negative" | "neg" => Some(SentimentLabel::Negative),
        "label_1" | "neutral" | "neu" => Some(SentimentLabel::Neutral),
        "label_2" | "positive" | "pos" => Some(SentimentLabel::Positive),
        _ => None,
    }
}

/// Inference backend for the statistical classifier.
pub trait SentimentModel: Send + Sync {
    /// Model name for logs.
    fn name(&self) -> &str;

    /// Score every raw label for the given text.
    fn predict(&self, text: &str) -> Result<Vec<LabelScore>>;
}

/// Load the configured backend.
///
/// `model_dir` selects the pretrained transformer. Without it the offline
/// linear model is used, read from `model_path` or the bundled parameters.
pub fn load_sentiment_model(config: &StatisticalConfig) -> Result<Arc<dyn SentimentModel>> {
    match config.resolved_model_dir() {
        Some(dir) => load_transformer(&dir),
        None => {
            let model = LinearSentimentModel::from_config(config)?;
            warn!(
                model = %model.name(),
                "No pretrained model directory configured, using the offline linear fallback"
            );
            Ok(Arc::new(model))
        }
    }
}

#[cfg(feature = "transformer")]
fn load_transformer(dir: &Path) -> Result<Arc<dyn SentimentModel>> {
    let model = super::transformer::TransformerSentimentModel::load(dir)?;
    Ok(Arc::new(model))
}

#[cfg(not(feature = "transformer"))]
fn load_transformer(dir: &Path) -> Result<Arc<dyn SentimentModel>> {
    Err(Error::Config(format!(
        "statistical.model_dir is set to {} but slant was built without the `transformer` feature",
        dir.display()
    )))
}

// ============================================================================
// Linear bag-of-words fallback
// ============================================================================

#[derive(Debug, Deserialize)]
struct LinearParameters {
    name: String,
    labels: Vec<String>,
    bias: Vec<f64>,
    #[serde(default = "default_negation_window")]
    negation_window: usize,
    #[serde(default)]
    negations: Vec<String>,
    weights: HashMap<String, Vec<f64>>,
}

fn default_negation_window() -> usize {
    2
}

/// Offline softmax model over unigram features.
///
/// The bundled parameters were fitted against the polarity lexicon, so its
/// verdicts are not independent of [`LexiconSentimentClassifier`]. It exists
/// for tests and for machines without a transformer checkpoint.
///
/// [`LexiconSentimentClassifier`]: super::LexiconSentimentClassifier
///
/// Tokens that follow a negation within the window use their `NOT_` feature
/// when one exists. Logits are the label bias plus the summed feature weights
/// scaled by `1 / sqrt(token_count)`.
#[derive(Debug, Clone)]
pub struct LinearSentimentModel {
    name: String,
    labels: Vec<String>,
    bias: Vec<f64>,
    negation_window: usize,
    negations: HashSet<String>,
    weights: HashMap<String, Vec<f64>>,
}

impl LinearSentimentModel {
    /// Load the parameters bundled with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_PARAMETERS).context("loading bundled sentiment model")
    }

    /// Load parameters from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("reading sentiment model {}", path.display()))?;
        let model = Self::from_json(&content)
            .context(format!("loading sentiment model {}", path.display()))?;
        info!(
            model = %model.name,
            path = %path.display(),
            features = model.weights.len(),
            "Loaded sentiment model"
        );
        Ok(model)
    }

    /// Load from the configured path, or the bundled parameters when unset.
    pub fn from_config(config: &StatisticalConfig) -> Result<Self> {
        match config.resolved_model_path() {
            Some(path) => Self::load(&path),
            None => Self::bundled(),
        }
    }

    /// Parse and validate a JSON parameter document.
    pub fn from_json(json: &str) -> Result<Self> {
        let params: LinearParameters = serde_json::from_str(json)?;
        Self::from_parameters(params)
    }

    fn from_parameters(params: LinearParameters) -> Result<Self> {
        let width = params.labels.len();
        if width == 0 {
            return Err(Error::Model("model declares no labels".into()));
        }
        if params.bias.len() != width {
            return Err(Error::Model(format!(
                "bias has {} entries for {} labels",
                params.bias.len(),
                width
            )));
        }
        if params.bias.iter().any(|b| !b.is_finite()) {
            return Err(Error::Model("bias contains a non-finite value".into()));
        }
        for (feature, row) in &params.weights {
            if row.len() != width {
                return Err(Error::Model(format!(
                    "feature '{}' has {} weights for {} labels",
                    feature,
                    row.len(),
                    width
                )));
            }
            if row.iter().any(|w| !w.is_finite()) {
                return Err(Error::Model(format!(
                    "feature '{}' contains a non-finite weight",
                    feature
                )));
            }
        }

        Ok(Self {
            name: params.name,
            labels: params.labels,
            bias: params.bias,
            negation_window: params.negation_window,
            negations: params.negations.into_iter().collect(),
            weights: params.weights,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn logits(&self, tokens: &[String]) -> Vec<f64> {
        let mut sums = vec![0.0; self.labels.len()];
        let mut matched = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            if self.negations.contains(token) {
                continue;
            }

            let start = i.saturating_sub(self.negation_window);
            let negated = tokens[start..i].iter().any(|t| self.negations.contains(t));

            let row = if negated {
                self.weights
                    .get(&format!("NOT_{}", token))
                    .or_else(|| self.weights.get(token))
            } else {
                self.weights.get(token)
            };

            if let Some(row) = row {
                matched += 1;
                for (sum, w) in sums.iter_mut().zip(row) {
                    *sum += w;
                }
            }
        }

        let scale = (tokens.len().max(1) as f64).sqrt();
        debug!(tokens = tokens.len(), matched, "Computed logits");

        self.bias
            .iter()
            .zip(sums)
            .map(|(b, s)| b + s / scale)
            .collect()
    }
}

/// Numerically stable softmax.
fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

impl SentimentModel for LinearSentimentModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, text: &str) -> Result<Vec<LabelScore>> {
        let tokens = tokenize(text);
        let probabilities = softmax(&self.logits(&tokens));

        Ok(self
            .labels
            .iter()
            .zip(probabilities)
            .map(|(label, p)| LabelScore::new(label.clone(), p))
            .collect())
    }
}

//! Configuration management for Slant.
//!
//! Configuration lives at `~/.slant/config.json`. Every section is optional and
//! falls back to the defaults below, which reproduce the current scoring
//! behaviour exactly.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (SLANT_* prefix)
//! 2. Explicit config file values (`config.json`, then `lexicons.json`)
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `SLANT_LOG_LEVEL` → observability.log_level
//! - `SLANT_LOG_FORMAT` → observability.log_format
//! - `SLANT_MODEL_PATH` → statistical.model_path
//! - `SLANT_MODEL_DIR` → statistical.model_dir
//! - `SLANT_EMOTIVE_RATIO_THRESHOLD` → bias.emotive_ratio_threshold
//! - `SLANT_ABSOLUTIST_COUNT_THRESHOLD` → bias.absolutist_count_threshold

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".slant"),
        |dirs| dirs.home_dir().join(".slant"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Default Lexicons
// ============================================================================

/// Vocabulary chosen to evoke strong reader emotion.
pub const DEFAULT_EMOTIVE_WORDS: &[&str] = &[
    "shocking",
    "outrage",
    "outraged",
    "crisis",
    "disaster",
    "chaos",
    "slam",
    "slammed",
    "blow",
    "attack",
    "fury",
    "furious",
    "devastating",
    "explosive",
    "dramatic",
    "massive",
    "urgent",
    "horrific",
    "catastrophic",
    "scandal",
    "panic",
    "terrifying",
    "brutal",
    "alarming",
    "destroy",
    "destroyed",
    "nightmare",
    "stunning",
    "bombshell",
    "meltdown",
];

/// Vocabulary expressing unqualified, totalizing claims.
pub const DEFAULT_ABSOLUTIST_WORDS: &[&str] = &[
    "always",
    "never",
    "everyone",
    "everybody",
    "nobody",
    "nothing",
    "everything",
    "completely",
    "entirely",
    "totally",
    "absolutely",
    "forever",
];

// ============================================================================
// Bias Scorer Configuration
// ============================================================================

/// Lexicon bias scorer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasConfig {
    /// Emotive ratio strictly above this marks the text as moderately biased
    #[serde(default = "default_emotive_ratio_threshold")]
    pub emotive_ratio_threshold: f64,

    /// Absolutist term count at or above this marks the text as moderately biased
    #[serde(default = "default_absolutist_count_threshold")]
    pub absolutist_count_threshold: usize,

    /// Emotionally charged vocabulary (single lowercase words)
    #[serde(default = "default_emotive_words")]
    pub emotive_words: Vec<String>,

    /// Absolutist vocabulary (single lowercase words)
    #[serde(default = "default_absolutist_words")]
    pub absolutist_words: Vec<String>,
}

impl Default for BiasConfig {
    fn default() -> Self {
        Self {
            emotive_ratio_threshold: default_emotive_ratio_threshold(),
            absolutist_count_threshold: default_absolutist_count_threshold(),
            emotive_words: default_emotive_words(),
            absolutist_words: default_absolutist_words(),
        }
    }
}

fn default_emotive_ratio_threshold() -> f64 {
    0.01
}

fn default_absolutist_count_threshold() -> usize {
    2
}

fn default_emotive_words() -> Vec<String> {
    DEFAULT_EMOTIVE_WORDS.iter().map(|w| (*w).to_string()).collect()
}

fn default_absolutist_words() -> Vec<String> {
    DEFAULT_ABSOLUTIST_WORDS
        .iter()
        .map(|w| (*w).to_string())
        .collect()
}

// ============================================================================
// Sentiment Configuration
// ============================================================================

/// Label cut points for the lexicon polarity model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconSentimentConfig {
    /// Polarity strictly above this is positive
    #[serde(default = "default_positive_threshold")]
    pub positive_threshold: f64,

    /// Polarity strictly below this is negative
    #[serde(default = "default_negative_threshold")]
    pub negative_threshold: f64,
}

impl Default for LexiconSentimentConfig {
    fn default() -> Self {
        Self {
            positive_threshold: default_positive_threshold(),
            negative_threshold: default_negative_threshold(),
        }
    }
}

fn default_positive_threshold() -> f64 {
    0.1
}

fn default_negative_threshold() -> f64 {
    -0.1
}

/// Statistical (pretrained) model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalConfig {
    /// Directory holding a pretrained transformer classifier: `config.json`,
    /// `tokenizer.json` and `model.safetensors` or `pytorch_model.bin`.
    #[serde(default)]
    pub model_dir: Option<String>,

    /// Path to a JSON parameter file for the offline linear fallback. Only
    /// read when `model_dir` is unset; the bundled parameters are used when
    /// both are unset.
    #[serde(default)]
    pub model_path: Option<String>,

    /// Input longer than this many characters is truncated before inference
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Trimmed input shorter than this many characters is not classified
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
}

impl Default for StatisticalConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            model_path: None,
            max_chars: default_max_chars(),
            min_chars: default_min_chars(),
        }
    }
}

fn default_max_chars() -> usize {
    512
}

fn default_min_chars() -> usize {
    10
}

/// Expand `~`, `$VAR` and `${VAR}` in a configured path. An undefined
/// variable leaves the path with only `~` expanded.
fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(e) => {
            tracing::warn!(path = %raw, error = %e, "Could not expand path variables");
            PathBuf::from(shellexpand::tilde(raw).into_owned())
        }
    }
}

impl StatisticalConfig {
    /// Transformer model directory with `~` and environment variables expanded.
    pub fn resolved_model_dir(&self) -> Option<PathBuf> {
        self.model_dir.as_deref().map(expand_path)
    }

    /// Model path with `~` and environment variables expanded.
    pub fn resolved_model_path(&self) -> Option<PathBuf> {
        self.model_path.as_deref().map(expand_path)
    }
}

/// Cut points for bucketing a [0, 1] confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    /// Confidence at or above this is high
    #[serde(default = "default_high_cut")]
    pub high: f64,

    /// Confidence at or above this (and below `high`) is medium
    #[serde(default = "default_medium_cut")]
    pub medium: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            high: default_high_cut(),
            medium: default_medium_cut(),
        }
    }
}

fn default_high_cut() -> f64 {
    0.75
}

fn default_medium_cut() -> f64 {
    0.55
}

// ============================================================================
// Pipeline Configuration
// ============================================================================

/// Article pipeline policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PipelineConfig {
    /// Drop the confidence level one step when the two sentiment models disagree
    #[serde(default)]
    pub downgrade_on_disagreement: bool,
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Additional module targets to set to `warn`.
    #[serde(default)]
    pub excluded_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            excluded_targets: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// JSON Schema reference
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Lexicon bias scorer thresholds and word lists
    #[serde(default)]
    pub bias: BiasConfig,

    /// Lexicon polarity model label thresholds
    #[serde(default)]
    pub lexicon_sentiment: LexiconSentimentConfig,

    /// Statistical model settings
    #[serde(default)]
    pub statistical: StatisticalConfig,

    /// Confidence bucket cut points
    #[serde(default)]
    pub confidence: ConfidenceConfig,

    /// Article pipeline policy
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Logging
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default directory.
    ///
    /// Missing files are not an error; defaults are used instead.
    pub fn load() -> Result<Self> {
        let dir = config_dir();
        if !dir.join("config.json").exists() && !dir.join("lexicons.json").exists() {
            return Ok(Self::default());
        }
        Self::load_from_dir(&dir)
    }

    /// Load configuration from a directory using the modular loader.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let value = crate::config_loader::load_modular_config(Some(dir.to_path_buf()))?;
        serde_json::from_value(value)
            .with_context(|| format!("Failed to parse config from {}", dir.display()))
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup. Unparseable numbers are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("SLANT_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("SLANT_LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if let Some(path) = lookup("SLANT_MODEL_PATH") {
            self.statistical.model_path = Some(path);
        }
        if let Some(dir) = lookup("SLANT_MODEL_DIR") {
            self.statistical.model_dir = Some(dir);
        }
        if let Some(raw) = lookup("SLANT_EMOTIVE_RATIO_THRESHOLD") {
            match raw.parse() {
                Ok(v) => self.bias.emotive_ratio_threshold = v,
                Err(_) => tracing::warn!(value = %raw, "Ignoring SLANT_EMOTIVE_RATIO_THRESHOLD"),
            }
        }
        if let Some(raw) = lookup("SLANT_ABSOLUTIST_COUNT_THRESHOLD") {
            match raw.parse() {
                Ok(v) => self.bias.absolutist_count_threshold = v,
                Err(_) => tracing::warn!(value = %raw, "Ignoring SLANT_ABSOLUTIST_COUNT_THRESHOLD"),
            }
        }
    }
}

//! Configuration validation.
//!
//! Catches thresholds and word lists that would make the scorers produce
//! meaningless verdicts before any text is analysed.

use std::collections::HashSet;
use thiserror::Error;

use crate::config::{
    BiasConfig, ConfidenceConfig, Config, LexiconSentimentConfig, ObservabilityConfig,
    StatisticalConfig,
};

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Configuration conflict: {reason}")]
    Conflict { reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

impl Config {
    /// Validate the entire configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.bias.validate() {
            errors.push(e);
        }
        if let Err(e) = self.lexicon_sentiment.validate() {
            errors.push(e);
        }
        if let Err(e) = self.statistical.validate() {
            errors.push(e);
        }
        if let Err(e) = self.confidence.validate() {
            errors.push(e);
        }
        if let Err(e) = self.observability.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }

    /// Load (with environment overrides) and validate configuration.
    pub fn load_and_validate() -> anyhow::Result<Self> {
        let config = Self::load_with_env()?;
        config.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(config)
    }
}

fn check_unit_interval(value: f64, field: &str) -> ValidationResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::InvalidValue {
            field: field.into(),
            reason: format!("must be a finite number in [0, 1], got {}", value),
        });
    }
    Ok(())
}

fn check_word_list(words: &[String], field: &str) -> ValidationResult<()> {
    if words.is_empty() {
        return Err(ValidationError::MissingField {
            field: field.into(),
        });
    }

    for word in words {
        let single_token = !word.is_empty()
            && word.chars().all(|c| c.is_alphanumeric() || c == '_')
            && word.to_lowercase() == *word;
        if !single_token {
            return Err(ValidationError::InvalidValue {
                field: field.into(),
                reason: format!("'{}' is not a single lowercase word", word),
            });
        }
    }

    Ok(())
}

impl Validate for BiasConfig {
    fn validate(&self) -> ValidationResult<()> {
        check_unit_interval(self.emotive_ratio_threshold, "bias.emotive_ratio_threshold")?;

        if self.absolutist_count_threshold == 0 {
            return Err(ValidationError::InvalidValue {
                field: "bias.absolutist_count_threshold".into(),
                reason: "must be greater than 0".into(),
            });
        }

        check_word_list(&self.emotive_words, "bias.emotive_words")?;
        check_word_list(&self.absolutist_words, "bias.absolutist_words")?;

        // A word in both lists would be counted twice
        let emotive: HashSet<&str> = self.emotive_words.iter().map(String::as_str).collect();
        if let Some(shared) = self
            .absolutist_words
            .iter()
            .find(|w| emotive.contains(w.as_str()))
        {
            return Err(ValidationError::Conflict {
                reason: format!(
                    "'{}' appears in both bias.emotive_words and bias.absolutist_words",
                    shared
                ),
            });
        }

        Ok(())
    }
}

impl Validate for LexiconSentimentConfig {
    fn validate(&self) -> ValidationResult<()> {
        for (value, field) in [
            (self.positive_threshold, "lexicon_sentiment.positive_threshold"),
            (self.negative_threshold, "lexicon_sentiment.negative_threshold"),
        ] {
            if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    reason: format!("must be a finite number in [-1, 1], got {}", value),
                });
            }
        }

        if self.negative_threshold > self.positive_threshold {
            return Err(ValidationError::Conflict {
                reason: format!(
                    "lexicon_sentiment.negative_threshold ({}) is above positive_threshold ({})",
                    self.negative_threshold, self.positive_threshold
                ),
            });
        }

        Ok(())
    }
}

impl Validate for StatisticalConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.max_chars == 0 {
            return Err(ValidationError::InvalidValue {
                field: "statistical.max_chars".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.min_chars > self.max_chars {
            return Err(ValidationError::Conflict {
                reason: format!(
                    "statistical.min_chars ({}) exceeds statistical.max_chars ({})",
                    self.min_chars, self.max_chars
                ),
            });
        }

        for (field, value) in [
            ("statistical.model_dir", &self.model_dir),
            ("statistical.model_path", &self.model_path),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    reason: "must not be blank when set".into(),
                });
            }
        }

        if self.model_dir.is_some() && self.model_path.is_some() {
            return Err(ValidationError::Conflict {
                reason: "statistical.model_dir and statistical.model_path are both set".into(),
            });
        }

        Ok(())
    }
}

impl Validate for ConfidenceConfig {
    fn validate(&self) -> ValidationResult<()> {
        check_unit_interval(self.high, "confidence.high")?;
        check_unit_interval(self.medium, "confidence.medium")?;

        if self.medium > self.high {
            return Err(ValidationError::Conflict {
                reason: format!(
                    "confidence.medium ({}) is above confidence.high ({})",
                    self.medium, self.high
                ),
            });
        }

        Ok(())
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            });
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.log_format.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            });
        }

        Ok(())
    }
}

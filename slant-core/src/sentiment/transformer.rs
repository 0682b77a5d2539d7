//! Pretrained transformer sentiment backend.
//!
//! Runs a RoBERTa-family sequence classifier on the CPU with candle. Any
//! three-way checkpoint with the `LABEL_0/1/2` layout works; the reference
//! model is `cardiffnlp/twitter-roberta-base-sentiment`.
//!
//! The model directory holds:
//!
//! - `config.json`: the Hugging Face model config, including `id2label`
//! - `tokenizer.json`: a serialized fast tokenizer
//! - `model.safetensors` or `pytorch_model.bin`: the weights

use candle_core::{DType, Device, Tensor, D};
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{
    Config as EncoderConfig, XLMRobertaForSequenceClassification,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use slant_common::{Error, Result, ResultExt};

use super::model::{LabelScore, SentimentModel};

pub const CONFIG_FILE: &str = "config.json";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const SAFETENSORS_FILE: &str = "model.safetensors";
pub const PYTORCH_FILE: &str = "pytorch_model.bin";

/// Tokens per sequence, special tokens included.
const MAX_TOKENS: usize = 512;

/// Classes assumed when `config.json` has no `id2label`.
const DEFAULT_NUM_LABELS: usize = 3;

fn model_error(action: &str, e: impl Display) -> Error {
    Error::Model(format!("{}: {}", action, e))
}

#[derive(Debug, Default, Deserialize)]
struct LabelMap {
    #[serde(default)]
    id2label: BTreeMap<String, String>,
}

/// Raw label names in class-index order.
fn label_names(config_json: &serde_json::Value) -> Result<Vec<String>> {
    let map: LabelMap = serde_json::from_value(config_json.clone())?;
    if map.id2label.is_empty() {
        return Ok((0..DEFAULT_NUM_LABELS).map(|i| format!("LABEL_{}", i)).collect());
    }

    let mut labels = vec![None; map.id2label.len()];
    for (id, name) in map.id2label {
        let index: usize = id
            .parse()
            .map_err(|_| Error::Model(format!("id2label key '{}' is not a class index", id)))?;
        match labels.get_mut(index) {
            Some(slot) => *slot = Some(name),
            None => {
                return Err(Error::Model(format!(
                    "id2label index {} is out of range",
                    index
                )))
            }
        }
    }

    labels
        .into_iter()
        .enumerate()
        .map(|(i, name)| name.ok_or_else(|| Error::Model(format!("id2label has no entry {}", i))))
        .collect()
}

/// Fill in the encoder keys older RoBERTa checkpoints omit.
fn with_encoder_defaults(config_json: &serde_json::Value) -> serde_json::Value {
    let mut value = config_json.clone();
    if let Some(obj) = value.as_object_mut() {
        obj.entry("position_embedding_type")
            .or_insert_with(|| serde_json::Value::from("absolute"));
    }
    value
}

fn encoder_config(config_json: &serde_json::Value) -> Result<EncoderConfig> {
    Ok(serde_json::from_value(with_encoder_defaults(config_json))?)
}

/// Softmax classifier over a RoBERTa encoder.
pub struct TransformerSentimentModel {
    name: String,
    labels: Vec<String>,
    tokenizer: Tokenizer,
    model: XLMRobertaForSequenceClassification,
    device: Device,
}

impl TransformerSentimentModel {
    /// Load tokenizer, config and weights from a model directory.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE);
        let raw = fs::read_to_string(&config_path)
            .context(format!("reading model config {}", config_path.display()))?;
        let config_json: serde_json::Value = serde_json::from_str(&raw)
            .context(format!("parsing model config {}", config_path.display()))?;
        let labels = label_names(&config_json)?;
        let config = encoder_config(&config_json)
            .context(format!("reading encoder settings from {}", config_path.display()))?;

        let tokenizer_path = dir.join(TOKENIZER_FILE);
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| model_error(&format!("loading {}", tokenizer_path.display()), e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| model_error("configuring truncation", e))?;

        let device = Device::Cpu;
        let safetensors = dir.join(SAFETENSORS_FILE);
        let weights = if safetensors.is_file() {
            // SAFETY: the weights file must not change while it is mapped.
            unsafe { VarBuilder::from_mmaped_safetensors(&[&safetensors], DType::F32, &device) }
        } else {
            VarBuilder::from_pth(dir.join(PYTORCH_FILE), DType::F32, &device)
        };
        let vb = weights
            .map_err(|e| model_error(&format!("loading weights from {}", dir.display()), e))?;

        let model = XLMRobertaForSequenceClassification::new(labels.len(), &config, vb)
            .map_err(|e| model_error("building classifier", e))?;

        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());

        info!(
            model = %name,
            path = %dir.display(),
            labels = labels.len(),
            "Loaded transformer sentiment model"
        );

        Ok(Self {
            name,
            labels,
            tokenizer,
            model,
            device,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn probabilities(
        &self,
        ids: &[u32],
        mask: &[u32],
        type_ids: &[u32],
    ) -> candle_core::Result<Vec<f32>> {
        let input_ids = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(mask, &self.device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(type_ids, &self.device)?.unsqueeze(0)?;

        let logits = self
            .model
            .forward(&input_ids, &attention_mask, &token_type_ids)?;
        candle_nn::ops::softmax(&logits, D::Minus1)?
            .squeeze(0)?
            .to_vec1::<f32>()
    }
}

impl SentimentModel for TransformerSentimentModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, text: &str) -> Result<Vec<LabelScore>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| model_error("tokenizing input", e))?;

        let probs = self
            .probabilities(
                encoding.get_ids(),
                encoding.get_attention_mask(),
                encoding.get_type_ids(),
            )
            .map_err(|e| model_error("running inference", e))?;

        if probs.len() != self.labels.len() {
            return Err(Error::Model(format!(
                "classifier returned {} scores for {} labels",
                probs.len(),
                self.labels.len()
            )));
        }

        debug!(model = %self.name, tokens = encoding.get_ids().len(), "Transformer inference");

        Ok(self
            .labels
            .iter()
            .zip(probs)
            .map(|(label, p)| LabelScore::new(label.clone(), f64::from(p)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_label_names_from_id2label() {
        let config = json!({"id2label": {"2": "LABEL_2", "0": "LABEL_0", "1": "LABEL_1"}});
        assert_eq!(label_names(&config).unwrap(), vec!["LABEL_0", "LABEL_1", "LABEL_2"]);

        let named = json!({"id2label": {"0": "negative", "1": "neutral", "2": "positive"}});
        assert_eq!(label_names(&named).unwrap()[2], "positive");
    }

    #[test]
    fn test_label_names_default_to_three_way() {
        assert_eq!(
            label_names(&json!({"hidden_size": 768})).unwrap(),
            vec!["LABEL_0", "LABEL_1", "LABEL_2"]
        );
    }

    #[test]
    fn test_label_names_reject_gaps_and_bad_keys() {
        assert!(label_names(&json!({"id2label": {"0": "a", "2": "c"}})).is_err());
        assert!(label_names(&json!({"id2label": {"zero": "a"}})).is_err());
    }

    #[test]
    fn test_encoder_defaults_keep_explicit_values() {
        let filled = with_encoder_defaults(&json!({"hidden_size": 768}));
        assert_eq!(filled["position_embedding_type"], "absolute");
        assert_eq!(filled["hidden_size"], 768);

        let explicit = with_encoder_defaults(&json!({"position_embedding_type": "relative_key"}));
        assert_eq!(explicit["position_embedding_type"], "relative_key");
    }

    #[test]
    fn test_incomplete_encoder_config_is_rejected() {
        assert!(encoder_config(&json!({"hidden_size": 32})).is_err());
    }

    #[test]
    fn test_missing_directory_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let err = TransformerSentimentModel::load(&dir.path().join("absent"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn test_incomplete_directory_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), r#"{"id2label": {"0": "LABEL_0"}}"#).unwrap();
        assert!(TransformerSentimentModel::load(dir.path()).is_err());
    }

    /// Runs only when `SLANT_TEST_MODEL_DIR` points at a downloaded checkpoint.
    #[test]
    fn test_pretrained_checkpoint_when_available() {
        let Ok(dir) = std::env::var("SLANT_TEST_MODEL_DIR") else {
            return;
        };
        let model = TransformerSentimentModel::load(Path::new(&dir)).unwrap();

        let scores = model
            .predict("What a wonderful day, I love this place!")
            .unwrap();
        assert_eq!(scores.len(), model.labels().len());
        let total: f64 = scores.iter().map(|s| s.score).sum();
        assert!((total - 1.0).abs() < 1e-3);

        let top = scores
            .iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .unwrap();
        assert_eq!(
            super::super::model::map_raw_label(&top.label),
            Some(crate::types::SentimentLabel::Positive)
        );
    }
}

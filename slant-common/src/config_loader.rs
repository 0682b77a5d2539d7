//! Modular configuration loader.
//!
//! Supports loading configuration from multiple files:
//! - `config.json` - Core configuration
//! - `lexicons.json` - Bias word lists and thresholds, merged into `bias`
//!
//! Files are loaded from `~/.slant/` unless another directory is given.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::config_dir;

/// Configuration file names
pub const CONFIG_FILES: &[&str] = &["config.json", "lexicons.json"];

/// Load a JSON file and return its contents as a Value.
/// Returns None if file doesn't exist.
fn load_json_file(path: &Path) -> Result<Option<Value>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok(Some(value))
}

/// Deep merge `overlay` into `base`.
///
/// Objects merge key by key; any other overlay value (lists included)
/// replaces the base value.
fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                if let Some(existing) = base_map.get_mut(&key) {
                    merge_json(existing, value);
                } else {
                    base_map.insert(key, value);
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Load modular configuration from the config directory.
///
/// Priority (lowest to highest):
/// 1. config.json
/// 2. lexicons.json (merged into the `bias` section)
/// 3. Environment variables (applied separately)
pub fn load_modular_config(dir: Option<PathBuf>) -> Result<Value> {
    let base = dir.unwrap_or_else(config_dir);
    tracing::debug!(dir = %base.display(), "Loading modular config");

    let mut config = load_json_file(&base.join("config.json"))?
        .unwrap_or(Value::Object(Default::default()));

    if let Some(lexicons) = load_json_file(&base.join("lexicons.json"))? {
        // Filter out meta-fields ($schema, _comment, etc.)
        let filtered = match lexicons {
            Value::Object(obj) => Value::Object(
                obj.into_iter()
                    .filter(|(key, _)| !key.starts_with('$') && !key.starts_with('_'))
                    .collect(),
            ),
            other => other,
        };

        if let Some(config_obj) = config.as_object_mut() {
            match config_obj.get_mut("bias") {
                Some(existing) => merge_json(existing, filtered),
                None => {
                    config_obj.insert("bias".to_string(), filtered);
                }
            }
        }
        tracing::debug!("Loaded lexicons.json");
    }

    Ok(config)
}

/// Each known config file name paired with whether it is present in `dir`.
pub fn check_modular_files(dir: Option<PathBuf>) -> Vec<(String, bool)> {
    let base = dir.unwrap_or_else(config_dir);
    CONFIG_FILES
        .iter()
        .map(|name| (name.to_string(), base.join(name).is_file()))
        .collect()
}

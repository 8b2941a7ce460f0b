//! # Document Loading
//!
//! Reads typesets and input documents from JSON or YAML files. The format is
//! chosen by extension: `.yaml` and `.yml` are YAML, everything else is JSON.
//! YAML documents are converted to JSON values before use, so both formats
//! describe exactly the same values.

use std::path::Path;

use anyhow::{bail, Context, Result};
use rtv_core::{verify_typeset, GrammarOptions, Typeset};
use serde_json::Value;

/// Loads a JSON or YAML file as a JSON value.
pub fn load_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    if is_yaml(path) {
        let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML in {}", path.display()))?;
        yaml_to_json_value(yaml).with_context(|| format!("unsupported YAML in {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON in {}", path.display()))
    }
}

/// Loads and classifies a typeset file, and checks its full grammar.
pub fn load_typeset(path: &Path) -> Result<Typeset> {
    let doc = load_document(path)?;
    let typeset = Typeset::from_json(&doc)
        .and_then(|ts| verify_typeset(&ts, GrammarOptions::deep()).map(|()| ts))
        .with_context(|| format!("{} is not a valid typeset", path.display()))?;
    tracing::debug!(path = %path.display(), %typeset, "loaded typeset");
    Ok(typeset)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Converts a YAML value to a JSON value.
///
/// Mapping keys must be scalars; non-string scalar keys are rendered as
/// strings. Tags are stripped. Non-finite floats have no JSON form and are
/// rejected.
pub fn yaml_to_json_value(yaml: serde_yaml::Value) -> Result<Value> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                match serde_json::Number::from_f64(f) {
                    Some(n) => Ok(Value::Number(n)),
                    None => bail!("non-finite number {f} has no JSON form"),
                }
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s)),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>> = seq.into_iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut obj = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    serde_yaml::Value::Null => "null".to_string(),
                    other => bail!("unsupported mapping key {other:?}"),
                };
                obj.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(obj))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(tagged.value),
    }
}

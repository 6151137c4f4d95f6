//! Reading input documents and writing JSON output.
//!
//! Documents are JSON unless the file extension is `.yaml` or `.yml`. YAML is
//! converted to a JSON value before loading, so both formats go through the
//! same validating `Schema::load` path. YAML mapping keys that are numbers
//! or booleans (e.g. unquoted nesting parent codes) become JSON strings.

use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// Read a JSON or YAML document into a JSON value.
pub fn read_document(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value = match path.extension().and_then(OsStr::to_str) {
        Some("yaml" | "yml") => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(&text)
                .with_context(|| format!("failed to parse YAML: {}", path.display()))?;
            yaml_to_json(yaml)?
        }
        _ => serde_json::from_str(&text)
            .with_context(|| format!("failed to parse JSON: {}", path.display()))?,
    };
    tracing::debug!(path = %path.display(), "read document");
    Ok(value)
}

/// Write `value` as one line of compact JSON.
pub fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    let text = serde_json::to_string(value)?;
    writeln!(out, "{text}")?;
    Ok(())
}

fn yaml_to_json(value: serde_yaml::Value) -> Result<Value> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => yaml_number(&n)?,
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_json).collect::<Result<_>>()?)
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (k, v) in mapping {
                map.insert(yaml_key(k)?, yaml_to_json(v)?);
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_number(n: &serde_yaml::Number) -> Result<Value> {
    if let Some(i) = n.as_i64() {
        Ok(Value::from(i))
    } else if let Some(u) = n.as_u64() {
        Ok(Value::from(u))
    } else {
        n.as_f64()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| anyhow!("YAML number {n} has no JSON representation"))
    }
}

fn yaml_key(key: serde_yaml::Value) -> Result<String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(anyhow!("unsupported YAML mapping key: {other:?}")),
    }
}

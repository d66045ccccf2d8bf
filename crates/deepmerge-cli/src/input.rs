//! Reading call arguments and rendering results

use anyhow::{Context, Result};
use deepmerge_core::Value;
use std::io::Read;
use std::path::{Path, PathBuf};

/// How a result is printed by `deepmerge call`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain JSON; fails if the result contains unknown values
    #[default]
    Json,
    /// The lossless typed encoding
    Typed,
    /// Compact human-readable rendering
    Display,
}

/// Read every argument in order.
///
/// Standard input can only be read once, so `-` may appear at most once.
pub fn load_arguments(paths: &[PathBuf], typed: bool) -> Result<Vec<Value>> {
    let stdin_count = paths.iter().filter(|p| p.as_path() == Path::new("-")).count();
    if stdin_count > 1 {
        anyhow::bail!(
            "Standard input (`-`) was given {} times; it can only be read once",
            stdin_count
        );
    }

    paths.iter().map(|path| load_argument(path, typed)).collect()
}

/// Read one argument. `-` reads standard input.
///
/// Plain arguments are JSON, or YAML when the extension says so. Typed
/// arguments use the lossless encoding and may contain unknown values.
pub fn load_argument(path: &Path, typed: bool) -> Result<Value> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read argument from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read argument file: {:?}", path))?
    };

    parse_argument(&content, path, typed).with_context(|| format!("Invalid argument: {:?}", path))
}

fn parse_argument(content: &str, path: &Path, typed: bool) -> Result<Value> {
    if typed {
        return Ok(Value::from_typed_json(content)?);
    }

    let json: serde_json::Value = match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
            reject_non_finite(&yaml, "$")?;
            serde_json::to_value(yaml)?
        }
        _ => serde_json::from_str(content)?,
    };
    Ok(Value::from_json(json))
}

/// JSON has no `.nan` or `.inf`; converting them would silently yield null,
/// which then wipes out every earlier layer.
fn reject_non_finite(value: &serde_yaml::Value, path: &str) -> Result<()> {
    match value {
        serde_yaml::Value::Number(n) if n.is_nan() || n.is_infinite() => {
            anyhow::bail!("Non-finite number {} at {} has no JSON form", n, path)
        }
        serde_yaml::Value::Sequence(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| reject_non_finite(item, &format!("{}[{}]", path, i))),
        serde_yaml::Value::Mapping(entries) => entries.iter().try_for_each(|(key, item)| {
            let key = match key.as_str() {
                Some(key) => key.to_string(),
                None => serde_yaml::to_string(key)?.trim_end().to_string(),
            };
            reject_non_finite(item, &format!("{}.{}", path, key))
        }),
        serde_yaml::Value::Tagged(tagged) => reject_non_finite(&tagged.value, path),
        _ => Ok(()),
    }
}

pub fn render(value: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let json = value
                .to_json()
                .context("Result cannot be printed as plain JSON; use --output typed")?;
            Ok(serde_json::to_string_pretty(&json)?)
        }
        OutputFormat::Typed => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Display => Ok(value.to_string()),
    }
}

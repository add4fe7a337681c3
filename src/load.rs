//! Spec file loading and the dual-format output writers.
//!
//! The loader picks JSON or YAML from the file extension and tolerates a
//! UTF-8 BOM. Missing or unparseable inputs yield `None`; only the caller
//! knows whether that is fatal (it is for the destination spec, permissive
//! for everything else).

use crate::Result;
use crate::diagnostics;

use anyhow::Context;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load a structured document, or `None` when the file is missing or does
/// not parse.
pub fn load_spec_file(path: &Path) -> Option<Value> {
    if !path.exists() {
        return None;
    }

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            diagnostics::warn(format!("could not read {}: {}", path.display(), err));
            return None;
        }
    };
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let parsed: std::result::Result<Value, String> = if is_yaml(path) {
        serde_yaml::from_str(text).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(text).map_err(|e| e.to_string())
    };

    match parsed {
        Ok(doc) => {
            diagnostics::info(format!("Loaded spec file: {}", path.display()));
            Some(doc)
        }
        Err(err) => {
            diagnostics::warn(format!("could not parse {}: {}", path.display(), err));
            None
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml")
    )
}

/// Write the finished document in both renditions: pretty JSON for machines,
/// YAML for humans. Both serialize from the same tree so they always agree.
pub fn write_outputs(doc: &Value, json_path: &Path, yaml_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(doc)?;
    fs::write(json_path, json + "\n")
        .with_context(|| diagnostics::error_message(format!("write {}", json_path.display())))?;

    let yaml = serde_yaml::to_string(doc)?;
    fs::write(yaml_path, yaml)
        .with_context(|| diagnostics::error_message(format!("write {}", yaml_path.display())))?;

    Ok(())
}

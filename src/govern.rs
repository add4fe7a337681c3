//! Governance filter: include/ignore decisions against the legacy baseline,
//! and materialization of included changes into the output document.

use crate::Result;
use crate::addr::{self, Token};
use crate::baseline::LegacySet;
use crate::diagnostics;
use crate::key::OpKey;

use serde_json::{Value, json};
use std::collections::BTreeSet;

/// Why a key was included or ignored. The tag strings are diagnostic only
/// and never affect downstream processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    IgnoreLegacyOperation,
    IgnoreLegacyPath,
    IncludeNewMethodOnLegacyPath,
    IncludeNewOperation,
    IncludeNewPath,
}

impl Decision {
    pub fn tag(&self) -> &'static str {
        match self {
            Decision::IgnoreLegacyOperation => "legacy operation changed",
            Decision::IgnoreLegacyPath => "legacy path",
            Decision::IncludeNewMethodOnLegacyPath => "new method on legacy path",
            Decision::IncludeNewOperation => "new/modern operation",
            Decision::IncludeNewPath => "new path",
        }
    }

    pub fn is_include(&self) -> bool {
        matches!(
            self,
            Decision::IncludeNewMethodOnLegacyPath
                | Decision::IncludeNewOperation
                | Decision::IncludeNewPath
        )
    }
}

/// Pure decision function of (key, legacy set).
pub fn decide(key: &OpKey, legacy: &LegacySet) -> Decision {
    match key {
        OpKey::Operation { .. } => {
            if legacy.contains(key) {
                Decision::IgnoreLegacyOperation
            } else if legacy.contains_path(key.path()) {
                Decision::IncludeNewMethodOnLegacyPath
            } else {
                Decision::IncludeNewOperation
            }
        }
        OpKey::PathOnly { path } => {
            if legacy.contains_path(path) {
                Decision::IgnoreLegacyPath
            } else {
                Decision::IncludeNewPath
            }
        }
    }
}

/// Fresh output skeleton. Populated by `apply_decisions`, repaired and
/// pruned afterwards, serialized, and discarded.
pub fn new_output_doc() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": { "title": "Changed-Only API Spec", "version": "1.0.0" },
        "paths": {},
        "components": { "schemas": {} }
    })
}

/// Walk the affected set (already sorted by the set type, so output is
/// reproducible), narrate each decision, and copy included sub-trees from
/// the destination document. Copies are full replacements, never merges:
/// the output stays self-consistent even when the diff report carried a
/// partial `value` payload.
pub fn apply_decisions(
    affected: &BTreeSet<OpKey>,
    legacy: &LegacySet,
    dest: &Value,
    mark_removed: bool,
) -> Result<(Value, Vec<(OpKey, Decision)>)> {
    let mut out = new_output_doc();
    let mut decisions = Vec::with_capacity(affected.len());

    for key in affected {
        let decision = decide(key, legacy);
        match decision {
            Decision::IgnoreLegacyOperation => {
                diagnostics::info(format!("Ignoring change in legacy operation: {}", key));
            }
            Decision::IgnoreLegacyPath => {
                diagnostics::info(format!("Ignoring change in legacy path: {}", key.path()));
            }
            Decision::IncludeNewPath => {
                diagnostics::info(format!("Including new path: {}", key.path()));
                copy_path_item(&mut out, dest, key.path(), mark_removed)?;
            }
            Decision::IncludeNewMethodOnLegacyPath | Decision::IncludeNewOperation => {
                diagnostics::info(format!(
                    "Including changed operation: {} ({})",
                    key,
                    decision.tag()
                ));
                copy_operation(&mut out, dest, key, mark_removed)?;
            }
        }
        decisions.push((key.clone(), decision));
    }

    Ok((out, decisions))
}

/// Deep-copy one operation from the destination document into the output at
/// the same path/method address. A key the destination no longer defines is
/// a stale diff location: no-op, or a tombstone when the run asked for
/// soft-delete marking.
fn copy_operation(out: &mut Value, dest: &Value, key: &OpKey, mark_removed: bool) -> Result<()> {
    let Some(method) = key.method_lower() else {
        return Ok(());
    };
    // Paths are object keys that may themselves contain dots, so the token
    // path is built directly rather than re-split from a location string.
    let tokens = [
        Token::key("paths"),
        Token::key(key.path()),
        Token::key(&method),
    ];

    match dest
        .get("paths")
        .and_then(|p| p.get(key.path()))
        .and_then(|item| item.get(&method))
    {
        Some(op) => addr::set(out, &tokens, op.clone()),
        None if mark_removed => addr::mark_removed(out, &tokens),
        None => Ok(()),
    }
}

fn copy_path_item(out: &mut Value, dest: &Value, path: &str, mark_removed: bool) -> Result<()> {
    let tokens = [Token::key("paths"), Token::key(path)];
    match dest.get("paths").and_then(|p| p.get(path)) {
        Some(item) => addr::set(out, &tokens, item.clone()),
        None if mark_removed => addr::mark_removed(out, &tokens),
        None => Ok(()),
    }
}

//! End-to-end document pipeline, independent of file I/O.
//!
//! extract -> govern -> repair -> resolve over in-memory documents. The
//! whole run is deterministic for fixed inputs: affected keys live in
//! ordered sets and the document tree keeps its mappings canonically
//! ordered, so re-running produces a byte-identical output document.

use crate::Result;
use crate::baseline::LegacySet;
use crate::diagnostics;
use crate::diff::DiffItem;
use crate::{extract, govern, repair, resolve};

use serde_json::Value;

/// Build the changed-only output document.
pub fn generate(
    items: &[DiffItem],
    legacy: &LegacySet,
    source: &Value,
    dest: &Value,
    mark_removed: bool,
) -> Result<Value> {
    let affected = extract::affected_keys(items, source, dest);
    diagnostics::info(format!(
        "Total affected operations (diff + deep compare): {}",
        affected.len()
    ));

    let (mut out, _decisions) = govern::apply_decisions(&affected, legacy, dest, mark_removed)?;

    repair::sync_from_base(&mut out, dest);
    repair::ensure_responses(&mut out, dest, source);

    resolve::prune_components(&mut out, dest);

    Ok(out)
}

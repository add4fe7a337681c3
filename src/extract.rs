//! Affected-set extraction: the diff-report strategy unioned with an
//! independent deep comparison of the two full documents.
//!
//! The diff tool may omit purely cosmetic changes (descriptions, summaries,
//! examples) that still matter for governance review, so deep-compare is a
//! correctness backstop, not an optimization. The union guarantees recall;
//! the governance filter resolves any redundancy uniformly.

use crate::diagnostics;
use crate::diff::DiffItem;
use crate::key::{OpKey, is_http_method};

use serde_json::Value;
use std::collections::BTreeSet;

/// Operation keys flagged by either detection strategy.
pub fn affected_keys(items: &[DiffItem], source: &Value, dest: &Value) -> BTreeSet<OpKey> {
    let mut affected = BTreeSet::new();
    let mut removals = BTreeSet::new();

    // 1) Diff-report strategy: location -> key, destination side preferred.
    //    Items without a recognizable location are skipped, not fatal.
    for item in items {
        let Some(location) = item.location() else {
            continue;
        };
        let Some(key) = OpKey::from_location(location) else {
            continue;
        };
        if item.is_removal() {
            removals.insert(key.clone());
        }
        affected.insert(key);
    }

    // 2) Deep-compare strategy: catches changes the diff tool skipped.
    affected.extend(deep_compare_keys(source, dest));

    // 3) The diff tool can report a removal for an operation that is in
    //    fact present and identical in both documents. The documents are
    //    ground truth; drop the key and flag the discrepancy.
    for key in removals {
        if unchanged_in_both(&key, source, dest) {
            diagnostics::warn(format!(
                "diff report marks {} as removed, but it is unchanged in both specs; dropping it",
                key
            ));
            affected.remove(&key);
        }
    }

    affected
}

/// Compare every method-operation in the destination against the same slot
/// in the source. Affected when the slot is new, or when the two sub-trees
/// differ (tree equality over canonically-ordered mappings, so key order
/// never matters).
fn deep_compare_keys(source: &Value, dest: &Value) -> BTreeSet<OpKey> {
    let mut out = BTreeSet::new();

    let Some(dest_paths) = dest.get("paths").and_then(Value::as_object) else {
        return out;
    };

    for (path, item) in dest_paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        for (method, op) in item {
            if !is_http_method(method) {
                continue;
            }
            match operation_body(source, path, method) {
                Some(prev) if prev == op => {}
                _ => {
                    out.insert(OpKey::operation(method, path));
                }
            }
        }
    }

    out
}

fn unchanged_in_both(key: &OpKey, source: &Value, dest: &Value) -> bool {
    let Some(method) = key.method_lower() else {
        return false;
    };
    match (
        operation_body(source, key.path(), &method),
        operation_body(dest, key.path(), &method),
    ) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn operation_body<'a>(doc: &'a Value, path: &str, method: &str) -> Option<&'a Value> {
    doc.get("paths")?.get(path)?.get(method)
}

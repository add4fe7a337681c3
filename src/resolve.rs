//! Transitive component closure.
//!
//! Named components form a directed graph discoverable only by scanning for
//! `$ref` strings (`#/components/{category}/{name}`) anywhere in a sub-tree.
//! Starting from the output document's retained paths, every reachable
//! component is copied from the base specification; nothing else leaks
//! through. A visited set guarantees termination under cyclic references.

use crate::diagnostics;

use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Collect every `$ref` string reachable in `node`, over both mapping and
/// sequence containers.
pub fn collect_refs(node: &Value, found: &mut BTreeSet<String>) {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get("$ref") {
                found.insert(reference.clone());
            }
            for value in map.values() {
                collect_refs(value, found);
            }
        }
        Value::Array(seq) => {
            for value in seq {
                collect_refs(value, found);
            }
        }
        _ => {}
    }
}

/// Parse `#/components/{category}/{name}`. Deeper segments (e.g. into a
/// schema's properties) still resolve to the owning component.
fn parse_component_ref(reference: &str) -> Option<(&str, &str)> {
    if !reference.starts_with("#/components/") {
        return None;
    }
    let parts: Vec<&str> = reference.split('/').collect();
    if parts.len() < 4 {
        return None;
    }
    Some((parts[2], parts[3]))
}

/// Copy the transitive closure of components referenced from the output
/// document's paths out of `base`. Dangling references are logged and
/// skipped; they must never abort the run.
pub fn prune_components(out: &mut Value, base: &Value) {
    let Some(base_comps) = base.get("components").and_then(Value::as_object) else {
        // Nothing to resolve against; the skeleton dictionary stays as is.
        return;
    };

    let mut queue: BTreeSet<String> = BTreeSet::new();
    if let Some(paths) = out.get("paths") {
        collect_refs(paths, &mut queue);
    }

    let mut visited: BTreeSet<String> = BTreeSet::new();
    let mut copied = 0usize;

    while let Some(reference) = queue.pop_first() {
        if !visited.insert(reference.clone()) {
            continue;
        }
        let Some((category, name)) = parse_component_ref(&reference) else {
            continue;
        };

        let Some(definition) = base_comps.get(category).and_then(|cat| cat.get(name)) else {
            diagnostics::warn(format!("reference {} not found in base spec", reference));
            continue;
        };

        if insert_component(out, category, name, definition) {
            copied += 1;
            // A copied definition can reference further components (e.g. a
            // response referencing a schema): re-scan it.
            collect_refs(definition, &mut queue);
        }
    }

    diagnostics::info(format!(
        "Pruned components. Kept {} referenced components.",
        copied
    ));
}

/// Returns true when the component was newly copied.
fn insert_component(out: &mut Value, category: &str, name: &str, definition: &Value) -> bool {
    let Some(root) = out.as_object_mut() else {
        return false;
    };
    let comps = root
        .entry("components")
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(comps) = comps.as_object_mut() else {
        return false;
    };
    let cat = comps
        .entry(category.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(cat) = cat.as_object_mut() else {
        return false;
    };

    if cat.contains_key(name) {
        return false;
    }
    cat.insert(name.to_string(), definition.clone());
    true
}

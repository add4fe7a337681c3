//! Legacy baseline: the operation surface that must never be auto-reported.

use crate::key::{OpKey, is_http_method};

use serde_json::Value;
use std::collections::BTreeSet;

/// Operation keys defined by the baseline document. Materialized once at
/// start and immutable for the run.
#[derive(Debug, Clone, Default)]
pub struct LegacySet {
    ops: BTreeSet<OpKey>,
}

impl LegacySet {
    /// Collect one `METHOD@path` entry per method-shaped key in the
    /// baseline. An absent or unreadable baseline yields an empty set:
    /// everything is treated as new rather than blocking the run.
    pub fn from_baseline(baseline: Option<&Value>) -> Self {
        let mut ops = BTreeSet::new();

        let paths = baseline
            .and_then(|doc| doc.get("paths"))
            .and_then(Value::as_object);
        if let Some(paths) = paths {
            for (path, item) in paths {
                let Some(item) = item.as_object() else {
                    continue;
                };
                for method in item.keys() {
                    if is_http_method(method) {
                        ops.insert(OpKey::operation(method, path));
                    }
                }
            }
        }

        LegacySet { ops }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn contains(&self, key: &OpKey) -> bool {
        self.ops.contains(key)
    }

    /// True when any method on `path` is legacy.
    pub fn contains_path(&self, path: &str) -> bool {
        self.ops.iter().any(|key| key.path() == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn collects_method_keys_and_skips_shared_fields() {
        let baseline = json!({
            "paths": {
                "/v1/users": {
                    "get": {},
                    "post": {},
                    "parameters": [ { "name": "page" } ],
                    "description": "users"
                },
                "/v1/health": "not a path item"
            }
        });

        let legacy = LegacySet::from_baseline(Some(&baseline));
        assert_eq!(legacy.len(), 2);
        assert!(legacy.contains(&OpKey::operation("get", "/v1/users")));
        assert!(legacy.contains(&OpKey::operation("POST", "/v1/users")));
        assert!(!legacy.contains(&OpKey::operation("put", "/v1/users")));
        assert!(legacy.contains_path("/v1/users"));
        assert!(!legacy.contains_path("/v1/health"));
    }

    #[test]
    fn missing_baseline_means_everything_is_new() {
        let legacy = LegacySet::from_baseline(None);
        assert!(legacy.is_empty());
        assert!(!legacy.contains_path("/v1/users"));
    }
}

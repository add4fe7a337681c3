//! Diff report data contract.
//!
//! JSON shape (categorized):
//! {
//!   "breakingDifferences": [
//!     {
//!       "action": "add",
//!       "sourceSpecEntityDetails": [ { "location": "paths./x.get", "value": {...} } ],
//!       "destinationSpecEntityDetails": [ { "location": "paths./x.get", "value": {...} } ]
//!     }
//!   ],
//!   "nonBreakingDifferences": [...],
//!   "unclassifiedDifferences": [...],
//!   "differences": [...]
//! }
//! or a bare array of items. The diff tool may also prepend log noise to the
//! JSON payload, or emit a plain-text "no changes" sentinel instead of any
//! structure at all; both are handled here before parsing.

use crate::diagnostics;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DiffReport {
    Categorized(CategorizedDiff),
    Flat(Vec<DiffItem>),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategorizedDiff {
    #[serde(default, rename = "breakingDifferences")]
    pub breaking: Option<Vec<DiffItem>>,

    #[serde(default, rename = "nonBreakingDifferences")]
    pub non_breaking: Option<Vec<DiffItem>>,

    #[serde(default, rename = "unclassifiedDifferences")]
    pub unclassified: Option<Vec<DiffItem>>,

    #[serde(default)]
    pub differences: Option<Vec<DiffItem>>,
}

/// One change item as produced by the external diff tool.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiffItem {
    #[serde(default)]
    pub action: Option<String>,

    #[serde(default, rename = "sourceSpecEntityDetails")]
    pub source_details: Vec<EntityDetail>,

    #[serde(default, rename = "destinationSpecEntityDetails")]
    pub destination_details: Vec<EntityDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityDetail {
    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub value: Option<Value>,
}

impl DiffItem {
    /// The location that identifies this item. Destination side preferred;
    /// pure removals carry only a source side.
    pub fn location(&self) -> Option<&str> {
        self.destination_details
            .first()
            .and_then(|d| d.location.as_deref())
            .or_else(|| {
                self.source_details
                    .first()
                    .and_then(|d| d.location.as_deref())
            })
    }

    pub fn is_removal(&self) -> bool {
        self.action.as_deref() == Some("remove")
    }
}

impl DiffReport {
    /// Flatten the categorized lists (breaking, non-breaking, unclassified)
    /// in order; the flat `differences` list is only consulted when all
    /// three are absent or empty.
    pub fn into_items(self) -> Vec<DiffItem> {
        match self {
            DiffReport::Flat(items) => items,
            DiffReport::Categorized(cat) => {
                let mut items = Vec::new();
                for bucket in [cat.breaking, cat.non_breaking, cat.unclassified] {
                    if let Some(arr) = bucket {
                        items.extend(arr);
                    }
                }
                if items.is_empty() {
                    if let Some(arr) = cat.differences {
                        items = arr;
                    }
                }
                items
            }
        }
    }
}

/// Outcome of reading the diff artifact.
#[derive(Debug, Clone)]
pub enum DiffInput {
    /// No artifact, an empty one, or a malformed one. The run proceeds on
    /// the deep-compare strategy alone.
    Absent,
    /// The diff tool's plain-text "no changes" sentinel: short-circuit to an
    /// empty output document.
    NoChanges,
    Items(Vec<DiffItem>),
}

pub fn load_diff_file(path: &Path) -> DiffInput {
    if !path.exists() {
        diagnostics::info(format!(
            "No diff report at {}; relying on deep comparison.",
            path.display()
        ));
        return DiffInput::Absent;
    }
    match fs::read_to_string(path) {
        Ok(text) => parse_diff_text(&text),
        Err(err) => {
            diagnostics::warn(format!("could not read {}: {}", path.display(), err));
            DiffInput::Absent
        }
    }
}

/// Interpret the raw artifact text.
pub fn parse_diff_text(raw: &str) -> DiffInput {
    let text = raw.trim_start_matches('\u{feff}').trim();
    if text.is_empty() {
        return DiffInput::Absent;
    }

    // Locate the first structural character; the tool sometimes prefixes the
    // payload with its own log lines.
    let start = match (text.find('{'), text.find('[')) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };

    let Some(start) = start else {
        let sentinel = Regex::new(r"(?i)no\s+(relevant\s+)?(changes|differences)")
            .ok()
            .is_some_and(|re| re.is_match(text));
        if sentinel {
            return DiffInput::NoChanges;
        }
        diagnostics::warn("diff report is plain text but not the no-changes sentinel; ignoring it");
        return DiffInput::Absent;
    };

    match serde_json::from_str::<DiffReport>(&text[start..]) {
        Ok(report) => DiffInput::Items(report.into_items()),
        Err(err) => {
            diagnostics::warn(format!(
                "failed to parse diff report: {}; relying on deep comparison",
                err
            ));
            DiffInput::Absent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn items_of(input: DiffInput) -> Vec<DiffItem> {
        match input {
            DiffInput::Items(items) => items,
            other => panic!("expected items, got {:?}", other),
        }
    }

    #[test]
    fn flattens_categorized_lists_in_order() {
        let report: DiffReport = serde_json::from_value(json!({
            "breakingDifferences": [
                { "action": "remove",
                  "sourceSpecEntityDetails": [ { "location": "paths./a.get" } ] }
            ],
            "nonBreakingDifferences": [
                { "action": "add",
                  "destinationSpecEntityDetails": [ { "location": "paths./b.post" } ] }
            ],
            "differences": [
                { "action": "change",
                  "destinationSpecEntityDetails": [ { "location": "paths./ignored.get" } ] }
            ]
        }))
        .unwrap();

        let items = report.into_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].location(), Some("paths./a.get"));
        assert_eq!(items[1].location(), Some("paths./b.post"));
    }

    #[test]
    fn falls_back_to_the_flat_differences_list() {
        let report: DiffReport = serde_json::from_value(json!({
            "differences": [
                { "action": "change",
                  "destinationSpecEntityDetails": [ { "location": "paths./a.get" } ] }
            ]
        }))
        .unwrap();
        assert_eq!(report.into_items().len(), 1);
    }

    #[test]
    fn accepts_a_bare_item_array() {
        let items = items_of(parse_diff_text(
            r#"[ { "action": "add",
                   "destinationSpecEntityDetails": [ { "location": "paths./a.put" } ] } ]"#,
        ));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].location(), Some("paths./a.put"));
    }

    #[test]
    fn skips_log_noise_before_the_payload() {
        let items = items_of(parse_diff_text(
            "comparing specs...\n{\"differences\": [ { \"action\": \"change\", \
             \"destinationSpecEntityDetails\": [ { \"location\": \"paths./a.get\" } ] } ]}",
        ));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn plain_text_sentinel_short_circuits() {
        assert!(matches!(
            parse_diff_text("No changes found between the two specifications."),
            DiffInput::NoChanges
        ));
    }

    #[test]
    fn empty_and_garbage_text_degrade_to_absent() {
        assert!(matches!(parse_diff_text("   "), DiffInput::Absent));
        assert!(matches!(
            parse_diff_text("tool crashed before writing output"),
            DiffInput::Absent
        ));
        assert!(matches!(
            parse_diff_text("{ not json at all"),
            DiffInput::Absent
        ));
    }

    #[test]
    fn location_prefers_the_destination_side() {
        let item: DiffItem = serde_json::from_value(json!({
            "action": "change",
            "sourceSpecEntityDetails": [ { "location": "paths./old.get" } ],
            "destinationSpecEntityDetails": [ { "location": "paths./new.get" } ]
        }))
        .unwrap();
        assert_eq!(item.location(), Some("paths./new.get"));

        let removal: DiffItem = serde_json::from_value(json!({
            "action": "remove",
            "sourceSpecEntityDetails": [ { "location": "paths./old.get" } ]
        }))
        .unwrap();
        assert_eq!(removal.location(), Some("paths./old.get"));
        assert!(removal.is_removal());
    }
}

//! Post-processing of the output document.
//!
//! Diff payloads may carry denormalized schema fragments where the
//! destination document uses `$ref`; the sync pass restores the referential
//! form so the resolver can prune correctly. The ensure pass guarantees
//! every retained operation leaves with at least one response entry, so the
//! output is always a parseable specification.

use crate::addr::{self, Token};
use crate::diagnostics;
use crate::key::is_http_method;

use serde_json::{Value, json};

/// Pass 1: for every retained operation, overwrite `responses` and
/// `requestBody` with a deep copy of the destination's version whenever the
/// destination has a non-empty one.
pub fn sync_from_base(out: &mut Value, dest: &Value) {
    let Some(paths) = out.get_mut("paths").and_then(Value::as_object_mut) else {
        return;
    };

    for (path, item) in paths.iter_mut() {
        let Some(item) = item.as_object_mut() else {
            continue;
        };
        for (method, op) in item.iter_mut() {
            if !is_http_method(method) {
                continue;
            }
            let Some(op) = op.as_object_mut() else {
                continue;
            };
            for field in ["responses", "requestBody"] {
                if let Some(fresh) = operation_field(dest, path, method, field) {
                    op.insert(field.to_string(), fresh.clone());
                }
            }
        }
    }
}

/// Pass 2: retained operations still lacking a non-empty `responses` field
/// backfill from the destination, then the source, then a synthesized
/// placeholder.
pub fn ensure_responses(out: &mut Value, dest: &Value, source: &Value) {
    let Some(paths) = out.get_mut("paths").and_then(Value::as_object_mut) else {
        return;
    };

    for (path, item) in paths.iter_mut() {
        let Some(item) = item.as_object_mut() else {
            continue;
        };
        for (method, op) in item.iter_mut() {
            if !is_http_method(method) {
                continue;
            }
            let Some(op) = op.as_object_mut() else {
                continue;
            };
            if op.get("responses").and_then(non_empty).is_some() {
                continue;
            }

            let filled = operation_field(dest, path, method, "responses")
                .or_else(|| operation_field(source, path, method, "responses"))
                .cloned();
            let filled = match filled {
                Some(responses) => responses,
                None => {
                    diagnostics::warn(format!(
                        "operation {} {} has no responses in either spec; synthesizing a placeholder",
                        method.to_ascii_uppercase(),
                        path
                    ));
                    json!({ "default": { "description": "Default response" } })
                }
            };
            op.insert("responses".to_string(), filled);
        }
    }
}

fn operation_field<'a>(doc: &'a Value, path: &str, method: &str, field: &str) -> Option<&'a Value> {
    let tokens = [
        Token::key("paths"),
        Token::key(path),
        Token::key(method),
        Token::key(field),
    ];
    addr::get(doc, &tokens).and_then(non_empty)
}

fn non_empty(value: &Value) -> Option<&Value> {
    match value {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        _ => Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn sync_restores_referential_form_from_the_destination() {
        // The retained copy carries an inlined fragment; the destination
        // keeps a $ref. The $ref version must win.
        let mut out = json!({
            "paths": {
                "/a": {
                    "get": {
                        "responses": {
                            "200": { "content": { "application/json": {
                                "schema": { "type": "object" } } } }
                        }
                    }
                }
            }
        });
        let dest = json!({
            "paths": {
                "/a": {
                    "get": {
                        "responses": { "200": { "$ref": "#/components/responses/Ok" } },
                        "requestBody": { "$ref": "#/components/requestBodies/Body" }
                    }
                }
            }
        });

        sync_from_base(&mut out, &dest);
        let op = &out["paths"]["/a"]["get"];
        assert_eq!(
            op["responses"],
            json!({ "200": { "$ref": "#/components/responses/Ok" } })
        );
        assert_eq!(
            op["requestBody"],
            json!({ "$ref": "#/components/requestBodies/Body" })
        );
    }

    #[test]
    fn sync_leaves_fields_alone_when_the_destination_has_none() {
        let mut out = json!({
            "paths": { "/a": { "get": { "responses": { "200": {} } } } }
        });
        let dest = json!({
            "paths": { "/a": { "get": { "responses": {} } } }
        });

        sync_from_base(&mut out, &dest);
        assert_eq!(out["paths"]["/a"]["get"]["responses"], json!({ "200": {} }));
    }

    #[test]
    fn ensure_backfills_from_destination_then_source() {
        let mut out = json!({
            "paths": {
                "/a": { "get": {} },
                "/b": { "post": { "responses": {} } }
            }
        });
        let dest = json!({
            "paths": { "/a": { "get": { "responses": { "200": { "description": "ok" } } } } }
        });
        let source = json!({
            "paths": { "/b": { "post": { "responses": { "201": { "description": "made" } } } } }
        });

        ensure_responses(&mut out, &dest, &source);
        assert_eq!(
            out["paths"]["/a"]["get"]["responses"],
            json!({ "200": { "description": "ok" } })
        );
        assert_eq!(
            out["paths"]["/b"]["post"]["responses"],
            json!({ "201": { "description": "made" } })
        );
    }

    #[test]
    fn ensure_synthesizes_a_placeholder_as_a_last_resort() {
        let mut out = json!({
            "paths": { "/a": { "put": {} } }
        });
        let empty = json!({});

        ensure_responses(&mut out, &empty, &empty);
        assert_eq!(
            out["paths"]["/a"]["put"]["responses"],
            json!({ "default": { "description": "Default response" } })
        );
    }
}

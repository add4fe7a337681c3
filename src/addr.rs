//! Dotted-location addressing over an untyped document tree.
//!
//! Example diff location: "paths./v1/users.get.responses"
//!   =>  [Key("paths"), Key("/v1/users"), Key("get"), Key("responses")]
//!
//! All-digit segments address sequence indices. Mutations are forgiving:
//! diff reports routinely reference stale locations, so every address miss
//! degrades to a no-op. Only an empty token path is an error.

use crate::Result;
use crate::diagnostics;

use anyhow::bail;
use serde_json::{Map, Value, json};

/// A single step in a token path: an object key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Token {
    Key(String),
    Index(usize),
}

impl Token {
    pub fn key(k: impl Into<String>) -> Self {
        Token::Key(k.into())
    }
}

/// Split a dotted location string into tokens.
pub fn parse_token_path(location: &str) -> Vec<Token> {
    location.split('.').map(classify).collect()
}

fn classify(segment: &str) -> Token {
    if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(idx) = segment.parse::<usize>() {
            return Token::Index(idx);
        }
    }
    Token::Key(segment.to_string())
}

/// Read the value at `path`. Empty paths and any miss return `None`.
pub fn get<'a>(doc: &'a Value, path: &[Token]) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let mut cur = doc;
    for token in path {
        cur = match token {
            Token::Key(k) => cur.as_object()?.get(k)?,
            Token::Index(i) => cur.as_array()?.get(*i)?,
        };
    }
    Some(cur)
}

/// Write `value` at `path`, creating intermediate containers as needed.
///
/// A missing or null intermediate becomes an empty object, or an empty
/// sequence when the following token is an index. Sequence indices beyond
/// the current length pad with nulls. The final token overwrites
/// unconditionally. An intermediate of the wrong container kind makes the
/// whole call a no-op.
pub fn set(doc: &mut Value, path: &[Token], value: Value) -> Result<()> {
    let Some((last, walk)) = path.split_last() else {
        bail!("{}", diagnostics::error_message("empty token path"));
    };

    let mut cur = doc;
    for (i, token) in walk.iter().enumerate() {
        let next = walk.get(i + 1).unwrap_or(last);
        match token {
            Token::Key(k) => {
                let Value::Object(map) = cur else {
                    return Ok(());
                };
                let slot = map.entry(k.clone()).or_insert(Value::Null);
                if slot.is_null() {
                    *slot = empty_container(next);
                }
                cur = slot;
            }
            Token::Index(idx) => {
                let Value::Array(seq) = cur else {
                    return Ok(());
                };
                if *idx >= seq.len() {
                    seq.resize(*idx + 1, Value::Null);
                }
                let slot = &mut seq[*idx];
                if slot.is_null() {
                    *slot = empty_container(next);
                }
                cur = slot;
            }
        }
    }

    match last {
        Token::Key(k) => {
            if let Value::Object(map) = cur {
                map.insert(k.clone(), value);
            }
        }
        Token::Index(idx) => {
            if let Value::Array(seq) = cur {
                if *idx < seq.len() {
                    seq[*idx] = value;
                } else {
                    seq.resize(*idx, Value::Null);
                    seq.push(value);
                }
            }
        }
    }
    Ok(())
}

fn empty_container(next: &Token) -> Value {
    match next {
        Token::Key(_) => Value::Object(Map::new()),
        Token::Index(_) => Value::Array(Vec::new()),
    }
}

/// Remove the value at `path`. Descends without creating; any miss is a
/// silent no-op, so double deletion is idempotent. Sequence removal shifts
/// subsequent elements down.
pub fn delete(doc: &mut Value, path: &[Token]) -> Result<()> {
    let Some((last, walk)) = path.split_last() else {
        bail!("{}", diagnostics::error_message("empty token path"));
    };

    let mut cur = doc;
    for token in walk {
        match token {
            Token::Key(k) => match cur {
                Value::Object(map) => match map.get_mut(k) {
                    Some(v) => cur = v,
                    None => return Ok(()),
                },
                _ => return Ok(()),
            },
            Token::Index(idx) => match cur {
                Value::Array(seq) => match seq.get_mut(*idx) {
                    Some(v) => cur = v,
                    None => return Ok(()),
                },
                _ => return Ok(()),
            },
        }
    }

    match last {
        Token::Key(k) => {
            if let Value::Object(map) = cur {
                map.remove(k);
            }
        }
        Token::Index(idx) => {
            if let Value::Array(seq) = cur {
                if *idx < seq.len() {
                    seq.remove(*idx);
                }
            }
        }
    }
    Ok(())
}

/// Soft-delete variant: write an `x-removed` tombstone at `path` instead of
/// structurally deleting the node.
pub fn mark_removed(doc: &mut Value, path: &[Token]) -> Result<()> {
    set(doc, path, json!({ "x-removed": true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn path(loc: &str) -> Vec<Token> {
        parse_token_path(loc)
    }

    #[test]
    fn parses_numeric_segments_as_indices() {
        assert_eq!(
            path("paths./v1/users.0"),
            vec![
                Token::key("paths"),
                Token::key("/v1/users"),
                Token::Index(0)
            ]
        );
    }

    #[test]
    fn set_creates_intermediate_objects() {
        let mut doc = json!({});
        set(&mut doc, &path("a.b.c"), json!(1)).unwrap();
        assert_eq!(doc, json!({ "a": { "b": { "c": 1 } } }));
    }

    #[test]
    fn set_creates_sequences_before_numeric_tokens() {
        let mut doc = json!({});
        set(&mut doc, &path("a.0.b"), json!("x")).unwrap();
        assert_eq!(doc, json!({ "a": [ { "b": "x" } ] }));
    }

    #[test]
    fn set_pads_sequences_with_nulls() {
        let mut doc = json!({ "a": [] });
        set(&mut doc, &path("a.2"), json!(7)).unwrap();
        assert_eq!(doc, json!({ "a": [null, null, 7] }));
    }

    #[test]
    fn set_overwrites_existing_values() {
        let mut doc = json!({ "a": { "b": 1 } });
        set(&mut doc, &path("a.b"), json!(2)).unwrap();
        assert_eq!(doc, json!({ "a": { "b": 2 } }));
    }

    #[test]
    fn set_through_scalar_is_a_noop() {
        let mut doc = json!({ "a": 5 });
        set(&mut doc, &path("a.b.c"), json!(1)).unwrap();
        assert_eq!(doc, json!({ "a": 5 }));
    }

    #[test]
    fn empty_path_is_rejected() {
        let mut doc = json!({});
        assert!(set(&mut doc, &[], json!(1)).is_err());
        assert!(delete(&mut doc, &[]).is_err());
        assert_eq!(get(&doc, &[]), None);
    }

    #[test]
    fn get_reads_nested_values() {
        let doc = json!({ "a": [ { "b": 3 } ] });
        assert_eq!(get(&doc, &path("a.0.b")), Some(&json!(3)));
        assert_eq!(get(&doc, &path("a.1.b")), None);
    }

    #[test]
    fn delete_removes_keys_and_shifts_sequences() {
        let mut doc = json!({ "a": [1, 2, 3], "b": { "c": 1 } });
        delete(&mut doc, &path("a.1")).unwrap();
        delete(&mut doc, &path("b.c")).unwrap();
        assert_eq!(doc, json!({ "a": [1, 3], "b": {} }));
    }

    #[test]
    fn delete_is_idempotent_on_missing_paths() {
        let mut doc = json!({ "a": {} });
        delete(&mut doc, &path("a.b.c")).unwrap();
        delete(&mut doc, &path("a.b.c")).unwrap();
        assert_eq!(doc, json!({ "a": {} }));
    }

    #[test]
    fn mark_removed_writes_a_tombstone() {
        let mut doc = json!({ "paths": { "/x": { "get": { "summary": "s" } } } });
        mark_removed(&mut doc, &path("paths./x.get")).unwrap();
        assert_eq!(
            doc,
            json!({ "paths": { "/x": { "get": { "x-removed": true } } } })
        );
    }
}

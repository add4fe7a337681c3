//! Operation identity: the unit of governance decisions.
//!
//! A key is either `METHOD@path` (operation-level) or `PATH_ONLY@path`
//! (path-level, used when a diff item touches shared fields like parameters
//! rather than a specific method). Methods are case-normalized, paths kept
//! verbatim.

use std::fmt;

/// The fixed set of method-shaped keys allowed under a path item.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "patch", "options", "head", "trace",
];

pub fn is_http_method(s: &str) -> bool {
    HTTP_METHODS.iter().any(|m| m.eq_ignore_ascii_case(s))
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OpKey {
    /// `METHOD@path`; the method is stored uppercased.
    Operation { method: String, path: String },
    /// `PATH_ONLY@path`; no method resolved from the location.
    PathOnly { path: String },
}

impl OpKey {
    pub fn operation(method: &str, path: &str) -> Self {
        OpKey::Operation {
            method: method.to_ascii_uppercase(),
            path: path.to_string(),
        }
    }

    pub fn path_only(path: &str) -> Self {
        OpKey::PathOnly {
            path: path.to_string(),
        }
    }

    /// Derive a key from a dotted diff location.
    ///
    /// Locations must begin with `paths.`; three or more tokens name an
    /// operation, exactly two name a path item, anything else is
    /// unrecognized and the caller skips the item rather than failing the
    /// run.
    pub fn from_location(location: &str) -> Option<OpKey> {
        let tokens: Vec<&str> = location.split('.').collect();
        if tokens.first() != Some(&"paths") {
            return None;
        }
        match tokens.len() {
            0 | 1 => None,
            2 => Some(OpKey::path_only(tokens[1])),
            _ => Some(OpKey::operation(tokens[2], tokens[1])),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            OpKey::Operation { path, .. } | OpKey::PathOnly { path } => path,
        }
    }

    /// Lowercased method name, as it appears as a path-item key. `None` for
    /// path-only keys.
    pub fn method_lower(&self) -> Option<String> {
        match self {
            OpKey::Operation { method, .. } => Some(method.to_ascii_lowercase()),
            OpKey::PathOnly { .. } => None,
        }
    }
}

impl fmt::Display for OpKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpKey::Operation { method, path } => write!(f, "{}@{}", method, path),
            OpKey::PathOnly { path } => write!(f, "PATH_ONLY@{}", path),
        }
    }
}

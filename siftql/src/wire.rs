//! Bracket-notation wire codec.
//!
//! The filter builder's state travels as ordinary query parameters with
//! bracketed keys: `q[name_cont]=john`, `q[g][0][m]=and`,
//! `q[status_in][]=active`. This module converts an ordered list of
//! URL-decoded `(key, value)` pairs into a nested [`ParamMap`] and back.
//!
//! Parsing is lenient: keys with unbalanced brackets or with `[]` anywhere but
//! the tail are dropped. Duplicate scalar keys are last-write-wins.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Ordered map of raw parameters. Insertion order is semantic - it drives
/// condition order after parsing and pair order after serialization.
pub type ParamMap = IndexMap<String, ParamValue>;

/// One raw parameter value: a scalar, a repeated `key[]` list, or a nested
/// bracketed map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Scalar(String),
    List(Vec<String>),
    Map(ParamMap),
}

impl ParamValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            ParamValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ParamMap> {
        match self {
            ParamValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            ParamValue::Scalar(s) => s.is_empty(),
            ParamValue::List(items) => items.iter().all(|item| item.is_empty()),
            ParamValue::Map(map) => map.is_empty(),
        }
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self { ParamValue::Scalar(s) }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self { ParamValue::Scalar(s.to_string()) }
}

impl From<Vec<String>> for ParamValue {
    fn from(items: Vec<String>) -> Self { ParamValue::List(items) }
}

impl From<ParamMap> for ParamValue {
    fn from(map: ParamMap) -> Self { ParamValue::Map(map) }
}

/// A key split into its head, bracketed path segments, and a trailing-`[]`
/// list marker. `q[g][0][name_cont]` -> `("q", ["g", "0", "name_cont"], false)`.
fn split_key(key: &str) -> Option<(&str, Vec<&str>, bool)> {
    let (head, mut rest) = match key.find('[') {
        Some(at) => key.split_at(at),
        None => (key, ""),
    };
    if head.is_empty() {
        return None;
    }
    let mut segments = Vec::new();
    let mut is_list = false;
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let close = inner.find(']')?;
        let segment = &inner[..close];
        rest = &inner[close + 1..];
        if segment.is_empty() {
            // `[]` is only meaningful as the final segment
            if !rest.is_empty() {
                return None;
            }
            is_list = true;
        } else {
            segments.push(segment);
        }
    }
    Some((head, segments, is_list))
}

fn insert_path(map: &mut ParamMap, head: &str, segments: &[&str], is_list: bool, value: &str) {
    if segments.is_empty() {
        if is_list {
            let entry = map.entry(head.to_string()).or_insert_with(|| ParamValue::List(Vec::new()));
            match entry {
                ParamValue::List(items) => items.push(value.to_string()),
                other => *other = ParamValue::List(vec![value.to_string()]),
            }
        } else {
            map.insert(head.to_string(), ParamValue::Scalar(value.to_string()));
        }
        return;
    }
    let entry = map.entry(head.to_string()).or_insert_with(|| ParamValue::Map(ParamMap::new()));
    if !matches!(entry, ParamValue::Map(_)) {
        // scalar/list at an interior position is overwritten, last write wins
        *entry = ParamValue::Map(ParamMap::new());
    }
    match entry {
        ParamValue::Map(nested) => insert_path(nested, segments[0], &segments[1..], is_list, value),
        _ => unreachable!("interior entries are maps"),
    }
}

/// Parse an ordered list of URL-decoded `(key, value)` pairs into a nested
/// parameter map. Malformed keys are dropped.
pub fn parse_pairs<I, K, V>(pairs: I) -> ParamMap
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut map = ParamMap::new();
    for (key, value) in pairs {
        let key = key.as_ref();
        match split_key(key) {
            Some((head, segments, is_list)) => insert_path(&mut map, head, &segments, is_list, value.as_ref()),
            None => trace!(key, "dropping malformed parameter key"),
        }
    }
    map
}

fn push_pairs(value: &ParamValue, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        ParamValue::Scalar(s) => out.push((prefix.to_string(), s.clone())),
        ParamValue::List(items) => {
            for item in items {
                out.push((format!("{}[]", prefix), item.clone()));
            }
        }
        ParamValue::Map(map) => {
            for (key, nested) in map {
                push_pairs(nested, &format!("{}[{}]", prefix, key), out);
            }
        }
    }
}

/// Serialize a parameter map back to ordered `(key, value)` pairs in
/// bracket notation. Inverse of [`parse_pairs`] for maps it produced.
pub fn to_pairs(map: &ParamMap) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for (key, value) in map {
        push_pairs(value, key, &mut out);
    }
    out
}

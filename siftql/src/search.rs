//! Quick multi-field search codec.
//!
//! One text input fans out as an OR-combined "contains" predicate across
//! several declared fields. On the wire that is a single key built from the
//! field list: `q[name_or_genre_or_tenant_name_cont]=value`.

use crate::wire::{ParamMap, ParamValue};

/// Compose the search predicate key for an ordered field list. Deterministic:
/// the declaration order is preserved exactly, so the key is stable across
/// instances and round-trip tests.
pub fn predicate_key<S: AsRef<str>>(fields: &[S]) -> String {
    let joined = fields.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("_or_");
    format!("{}_cont", joined)
}

/// Extract the search value for a composed predicate key. Blank and non-scalar
/// values read as absent.
pub fn extract(params: &ParamMap, predicate_key: &str) -> Option<String> {
    params.get(predicate_key).and_then(ParamValue::as_scalar).filter(|value| !value.is_empty()).map(str::to_string)
}

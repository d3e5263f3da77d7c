//! Flat-key condition codec.
//!
//! A condition's attribute and operator travel as one query-parameter key,
//! `<attribute>_<operator>`. Decoding scans the operator vocabulary in
//! [`Operator::SUFFIX_ORDER`] - longest/most-specific match first - so a short
//! operator never swallows part of a longer one (`status_not_eq` is
//! `(status, not_eq)`, never `(status_not, eq)`).
//!
//! The encoding is ambiguous by construction: an attribute literally named
//! `status_not` filtered with `eq` produces the same key as `status` with
//! `not_eq`, and decoding always picks the longer operator. That collision is
//! an acknowledged limitation of the wire format, not something this module
//! attempts to resolve.

use crate::ast::Operator;

/// Encode an attribute/operator pair into its flat key.
pub fn encode(attribute: &str, operator: Operator) -> String { format!("{}_{}", attribute, operator.as_str()) }

/// Decode a flat key into its attribute/operator pair.
///
/// Returns `None` for keys carrying no recognized operator suffix; callers
/// drop those leniently. A blank attribute (`"_cont"`) is legal and decodes to
/// an empty string.
pub fn decode(key: &str) -> Option<(String, Operator)> {
    for operator in Operator::SUFFIX_ORDER {
        if let Some(attribute) = key.strip_suffix(operator.as_str()).and_then(|rest| rest.strip_suffix('_')) {
            return Some((attribute.to_string(), operator));
        }
    }
    None
}

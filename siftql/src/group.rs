//! Group parser / serializer.
//!
//! A raw group map is a flat set of `<attribute>_<operator>` keys plus the
//! combinator entry `m`. Parsing aggregates decoded keys per attribute so that
//! a `gteq`/`lteq` pair over the same attribute can be consolidated into one
//! `between` condition; serialization expands it back. Unrecognized keys are
//! dropped, never reported.

use indexmap::IndexMap;
use tracing::trace;

use crate::ast::{Combinator, Condition, ConditionValue, FilterGroup, Operator};
use crate::codec;
use crate::wire::{ParamMap, ParamValue};

/// Reserved key carrying a group's (or the filter's) combinator.
pub const COMBINATOR_KEY: &str = "m";

fn condition_value(raw: &ParamValue) -> Option<ConditionValue> {
    match raw {
        ParamValue::Scalar(s) => Some(ConditionValue::Scalar(s.clone())),
        ParamValue::List(items) => Some(ConditionValue::List(items.clone())),
        ParamValue::Map(_) => None,
    }
}

/// Parse one raw group map into a [`FilterGroup`].
///
/// Duplicate `(attribute, operator)` entries are last-write-wins. An empty
/// parse result is replaced by the default blank condition so a group is never
/// empty.
pub fn parse(raw: &ParamMap) -> FilterGroup {
    // attribute -> operator -> value, both levels in first-seen order
    let mut by_attribute: IndexMap<String, IndexMap<Operator, ConditionValue>> = IndexMap::new();
    for (key, value) in raw {
        if key == COMBINATOR_KEY {
            continue;
        }
        let Some((attribute, operator)) = codec::decode(key) else {
            trace!(%key, "dropping unrecognized condition key");
            continue;
        };
        let Some(value) = condition_value(value) else {
            trace!(%key, "dropping nested value for condition key");
            continue;
        };
        by_attribute.entry(attribute).or_default().insert(operator, value);
    }

    let mut conditions = Vec::new();
    for (attribute, operators) in by_attribute {
        // gteq + lteq over the same attribute consolidate into one `between`;
        // either bound alone stays a plain inequality
        let consolidated = operators.contains_key(&Operator::Gteq) && operators.contains_key(&Operator::Lteq);
        if consolidated {
            let start = operators.get(&Operator::Gteq).map(ConditionValue::to_scalar).unwrap_or_default();
            let end = operators.get(&Operator::Lteq).map(ConditionValue::to_scalar).unwrap_or_default();
            conditions.push(Condition {
                attribute: attribute.clone(),
                operator: Operator::Between,
                value: ConditionValue::Range { start, end },
            });
        }
        for (operator, value) in operators {
            if consolidated && matches!(operator, Operator::Gteq | Operator::Lteq) {
                continue;
            }
            conditions.push(Condition { attribute: attribute.clone(), operator, value });
        }
    }

    let combinator = raw
        .get(COMBINATOR_KEY)
        .and_then(ParamValue::as_scalar)
        .and_then(|m| m.parse::<Combinator>().ok())
        .unwrap_or(Combinator::Or);

    if conditions.is_empty() {
        conditions.push(Condition::default());
    }
    FilterGroup { combinator, conditions }
}

/// Parse an indexed map of raw groups (`{"0": {...}, "1": {...}}`) into an
/// ordered list, preserving input index order (indices sort numerically, so
/// group `"10"` follows group `"2"`).
pub fn parse_all(raw: &ParamMap) -> Vec<FilterGroup> {
    let mut indexed: Vec<(&String, &ParamMap)> = raw
        .iter()
        .filter_map(|(index, value)| match value {
            ParamValue::Map(group) => Some((index, group)),
            _ => {
                trace!(%index, "dropping non-map group entry");
                None
            }
        })
        .collect();
    indexed.sort_by_key(|(index, _)| index.parse::<u64>().unwrap_or(u64::MAX));
    indexed.into_iter().map(|(_, group)| parse(group)).collect()
}

fn range_bounds(value: &ConditionValue) -> (String, String) {
    match value {
        ConditionValue::Range { start, end } => (start.clone(), end.clone()),
        other => {
            let scalar = other.to_scalar();
            (scalar.clone(), scalar)
        }
    }
}

/// Serialize a [`FilterGroup`] back into its raw map. A `between` condition
/// expands into the `gteq`/`lteq` key pair it was consolidated from.
pub fn serialize(group: &FilterGroup) -> ParamMap {
    let mut raw = ParamMap::new();
    for condition in &group.conditions {
        if condition.operator == Operator::Between {
            let (start, end) = range_bounds(&condition.value);
            raw.insert(codec::encode(&condition.attribute, Operator::Gteq), ParamValue::Scalar(start));
            raw.insert(codec::encode(&condition.attribute, Operator::Lteq), ParamValue::Scalar(end));
            continue;
        }
        let value = match &condition.value {
            ConditionValue::Scalar(s) => ParamValue::Scalar(s.clone()),
            ConditionValue::List(items) => ParamValue::List(items.clone()),
            ConditionValue::Range { start, .. } => ParamValue::Scalar(start.clone()),
        };
        raw.insert(codec::encode(&condition.attribute, condition.operator), value);
    }
    raw.insert(COMBINATOR_KEY.to_string(), ParamValue::Scalar(group.combinator.to_string()));
    raw
}

/// Serialize an ordered list of groups back into the indexed wire map.
pub fn serialize_all(groups: &[FilterGroup]) -> ParamMap {
    groups
        .iter()
        .enumerate()
        .map(|(index, group)| (index.to_string(), ParamValue::Map(serialize(group))))
        .collect()
}

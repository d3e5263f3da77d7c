mod common;

use anyhow::Result;
use sifter::{AttributeRegistry, Combinator, Condition, ConditionValue, FilterGroup, Operator};
use siftql::wire::{ParamMap, ParamValue};
use siftql::{codec, group, search};

fn raw(entries: &[(&str, &str)]) -> ParamMap {
    entries.iter().map(|(k, v)| (k.to_string(), ParamValue::Scalar(v.to_string()))).collect()
}

#[test]
fn groups_without_between_round_trip() -> Result<()> {
    let original = FilterGroup {
        combinator: Combinator::And,
        conditions: vec![
            Condition::new("name", Operator::Cont, "john"),
            Condition::new("status", Operator::NotEq, "archived"),
            Condition {
                attribute: "genre".to_string(),
                operator: Operator::In,
                value: ConditionValue::List(vec!["jazz".to_string(), "grunge".to_string()]),
            },
            Condition::new("", Operator::Cont, ""),
        ],
    };
    assert_eq!(group::parse(&group::serialize(&original)), original);
    Ok(())
}

#[test]
fn range_pairs_consolidate_into_one_between_condition() -> Result<()> {
    let parsed = group::parse(&raw(&[("name_gteq", "2024-01-01"), ("name_lteq", "2024-12-31"), ("m", "and")]));
    assert_eq!(parsed, FilterGroup {
        combinator: Combinator::And,
        conditions: vec![Condition {
            attribute: "name".to_string(),
            operator: Operator::Between,
            value: ConditionValue::Range { start: "2024-01-01".to_string(), end: "2024-12-31".to_string() },
        }],
    });
    Ok(())
}

#[test]
fn decoding_prefers_the_longest_operator() -> Result<()> {
    assert_eq!(codec::decode("status_not_eq"), Some(("status".to_string(), Operator::NotEq)));
    // never (status_not, eq)
    assert_ne!(codec::decode("status_not_eq"), Some(("status_not".to_string(), Operator::Eq)));
    Ok(())
}

#[test]
fn empty_input_parses_to_the_default_condition() -> Result<()> {
    let parsed = group::parse(&ParamMap::new());
    assert_eq!(parsed.conditions, vec![Condition {
        attribute: String::new(),
        operator: Operator::Cont,
        value: ConditionValue::Scalar(String::new()),
    }]);
    Ok(())
}

#[test]
fn search_predicate_key_is_stable() -> Result<()> {
    // declaration order decides the key, nothing else does
    let direct = search::predicate_key(&["name", "genre", "tenant_name"]);
    assert_eq!(direct, "name_or_genre_or_tenant_name_cont");

    let first = common::album_registry();
    let second = common::album_registry();
    assert_eq!(first.search_predicate_key(), second.search_predicate_key());
    assert_eq!(first.search_predicate_key(), Some(direct));
    assert_eq!(AttributeRegistry::new().search_predicate_key(), None);
    Ok(())
}

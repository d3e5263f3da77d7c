#![allow(dead_code)]

use std::collections::BTreeMap;

use tracing::Level;

use sifter::{
    AttributeDefinition, AttributeRegistry, AttributeType, QueryError, QueryRequest, QueryTarget, ResultSet,
    SelectOption,
};
use siftql::ast::{Combinator, Operator};
use siftql::wire::{ParamMap, ParamValue};
use siftql::{codec, group};

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() { tracing_subscriber::fmt().with_max_level(Level::INFO).with_test_writer().init(); }

pub type Row = BTreeMap<String, String>;

pub fn row(fields: &[(&str, &str)]) -> Row {
    fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// The registry used across the integration suite.
#[allow(unused)]
pub fn album_registry() -> AttributeRegistry {
    AttributeRegistry::new()
        .attribute(AttributeDefinition::new("name", AttributeType::Text, "Name"))
        .attribute(AttributeDefinition::new("genre", AttributeType::Text, "Genre"))
        .attribute(AttributeDefinition::new("tenant_name", AttributeType::Text, "Tenant"))
        .attribute(AttributeDefinition::new("status", AttributeType::Select, "Status").with_options(vec![
            SelectOption::new("Active", "active"),
            SelectOption::new("Archived", "archived"),
        ]))
        .attribute(AttributeDefinition::new("released_on", AttributeType::Date, "Released"))
        .search_fields(["name", "genre", "tenant_name"])
}

#[allow(unused)]
pub fn album_rows() -> Vec<Row> {
    vec![
        row(&[("name", "Blue Train"), ("genre", "jazz"), ("tenant_name", "acme"), ("status", "active"), ("released_on", "1958-01-15")]),
        row(&[("name", "Kind of Blue"), ("genre", "jazz"), ("tenant_name", "acme"), ("status", "archived"), ("released_on", "1959-08-17")]),
        row(&[("name", "Nevermind"), ("genre", "grunge"), ("tenant_name", "umbrella"), ("status", "active"), ("released_on", "1991-09-24")]),
    ]
}

/// A `Vec`-backed result set; range filters compare lexicographically, which
/// is exact for ISO dates.
#[derive(Debug, Clone)]
pub struct Records {
    pub rows: Vec<Row>,
}

impl ResultSet for Records {
    fn filter_range(mut self, attribute: &str, start: &str, end: &str) -> Self {
        self.rows.retain(|row| {
            row.get(attribute).is_some_and(|value| value.as_str() >= start && value.as_str() <= end)
        });
        self
    }
}

fn matches_scalar(row_value: Option<&String>, operator: Operator, wanted: &str) -> bool {
    let value = row_value.map(String::as_str).unwrap_or("");
    match operator {
        Operator::Eq => value == wanted,
        Operator::NotEq => value != wanted,
        Operator::Cont => value.contains(wanted),
        Operator::NotCont => !value.contains(wanted),
        Operator::Start => value.starts_with(wanted),
        Operator::End => value.ends_with(wanted),
        Operator::Matches => value == wanted,
        Operator::Gt => value > wanted,
        Operator::Lt => value < wanted,
        Operator::Gteq => value >= wanted,
        Operator::Lteq => value <= wanted,
        _ => true,
    }
}

fn matches_condition(row: &Row, attribute: &str, operator: Operator, value: &ParamValue) -> bool {
    // quick-search keys arrive as one composed attribute; OR across its fields
    if attribute.contains("_or_") && operator == Operator::Cont {
        if let ParamValue::Scalar(wanted) = value {
            return attribute.split("_or_").any(|field| matches_scalar(row.get(field), Operator::Cont, wanted));
        }
    }
    match (operator, value) {
        (Operator::In, ParamValue::List(items)) => items.iter().any(|item| row.get(attribute) == Some(item)),
        (Operator::NotIn, ParamValue::List(items)) => !items.iter().any(|item| row.get(attribute) == Some(item)),
        (_, ParamValue::Scalar(wanted)) => matches_scalar(row.get(attribute), operator, wanted),
        _ => true,
    }
}

fn matches_group(row: &Row, raw: &ParamMap) -> bool {
    let combinator = raw
        .get(group::COMBINATOR_KEY)
        .and_then(ParamValue::as_scalar)
        .and_then(|m| m.parse::<Combinator>().ok())
        .unwrap_or(Combinator::Or);
    let mut checks = raw.iter().filter(|(key, _)| key.as_str() != group::COMBINATOR_KEY).filter_map(|(key, value)| {
        codec::decode(key).map(|(attribute, operator)| matches_condition(row, &attribute, operator, value))
    });
    match combinator {
        Combinator::And => checks.all(|matched| matched),
        Combinator::Or => checks.any(|matched| matched),
    }
}

/// In-memory query executor interpreting the assembled flat parameter map.
pub struct Albums {
    pub rows: Vec<Row>,
}

#[allow(unused)]
impl Albums {
    pub fn new(rows: Vec<Row>) -> Self { Self { rows } }
}

impl QueryTarget for Albums {
    type ResultSet = Records;

    fn collection_id(&self) -> &str { "albums" }

    fn execute(&self, request: &QueryRequest) -> Result<Records, QueryError> {
        let mut rows = self.rows.clone();
        for (key, value) in &request.params {
            if key == "s" || key == "g" || key == group::COMBINATOR_KEY {
                continue;
            }
            let Some((attribute, operator)) = codec::decode(key) else { continue };
            rows.retain(|row| matches_condition(row, &attribute, operator, value));
        }
        if let Some(ParamValue::Map(groupings)) = request.params.get("g") {
            let combinator = request
                .params
                .get(group::COMBINATOR_KEY)
                .and_then(ParamValue::as_scalar)
                .and_then(|m| m.parse::<Combinator>().ok())
                .unwrap_or(Combinator::And);
            rows.retain(|row| {
                let mut groups = groupings.values().filter_map(ParamValue::as_map).map(|raw| matches_group(row, raw));
                match combinator {
                    Combinator::And => groups.all(|matched| matched),
                    Combinator::Or => groups.any(|matched| matched),
                }
            });
        }
        if request.options.distinct {
            let mut seen = Vec::new();
            rows.retain(|row| {
                if seen.contains(row) {
                    false
                } else {
                    seen.push(row.clone());
                    true
                }
            });
        }
        Ok(Records { rows })
    }
}

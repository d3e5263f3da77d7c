use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Boolean joiner for conditions within a group and for groups within a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::And => "and",
            Combinator::Or => "or",
        }
    }
}

impl std::fmt::Display for Combinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

impl std::str::FromStr for Combinator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "and" => Ok(Combinator::And),
            "or" => Ok(Combinator::Or),
            other => Err(ParseError::InvalidCombinator(other.to_string())),
        }
    }
}

/// Comparison operator vocabulary.
///
/// Every variant except `Between` appears on the wire as a key suffix
/// (`name_cont`, `status_not_eq`, ...). `Between` is synthesized by the group
/// parser when an attribute carries both `gteq` and `lteq`, and is expanded
/// back into that pair on serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    NotCont,
    NotEq,
    NotIn,
    Gteq,
    Lteq,
    Cont,
    Start,
    End,
    Matches,
    Eq,
    Gt,
    Lt,
    In,
    Any,
    All,
    Between,
}

impl Operator {
    /// Wire-decodable operators in decode precedence order: most specific
    /// first, so `status_not_eq` resolves to `not_eq` before `eq` can claim
    /// the shorter suffix.
    pub const SUFFIX_ORDER: [Operator; 15] = [
        Operator::NotCont,
        Operator::NotEq,
        Operator::NotIn,
        Operator::Gteq,
        Operator::Lteq,
        Operator::Cont,
        Operator::Start,
        Operator::End,
        Operator::Matches,
        Operator::Eq,
        Operator::Gt,
        Operator::Lt,
        Operator::In,
        Operator::Any,
        Operator::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::NotCont => "not_cont",
            Operator::NotEq => "not_eq",
            Operator::NotIn => "not_in",
            Operator::Gteq => "gteq",
            Operator::Lteq => "lteq",
            Operator::Cont => "cont",
            Operator::Start => "start",
            Operator::End => "end",
            Operator::Matches => "matches",
            Operator::Eq => "eq",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
            Operator::In => "in",
            Operator::Any => "any",
            Operator::All => "all",
            Operator::Between => "between",
        }
    }

    /// Operators whose wire value is an array (`q[attr_in][]=...`).
    pub fn takes_list(&self) -> bool { matches!(self, Operator::In | Operator::NotIn | Operator::Any | Operator::All) }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

impl std::str::FromStr for Operator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::SUFFIX_ORDER
            .iter()
            .copied()
            .chain(std::iter::once(Operator::Between))
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ParseError::UnknownOperator(s.to_string()))
    }
}

/// The value side of a condition: a scalar, a list (`in`-family operators),
/// or a consolidated range pair (`between`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Scalar(String),
    List(Vec<String>),
    Range { start: String, end: String },
}

impl ConditionValue {
    /// Blank values are kept through round-trips but excluded from
    /// active-filter introspection.
    pub fn is_blank(&self) -> bool {
        match self {
            ConditionValue::Scalar(s) => s.is_empty(),
            ConditionValue::List(items) => items.iter().all(|item| item.is_empty()),
            ConditionValue::Range { start, end } => start.is_empty() && end.is_empty(),
        }
    }

    /// Collapse to a single scalar: lists yield their first element, ranges
    /// their start bound.
    pub fn to_scalar(&self) -> String {
        match self {
            ConditionValue::Scalar(s) => s.clone(),
            ConditionValue::List(items) => items.first().cloned().unwrap_or_default(),
            ConditionValue::Range { start, .. } => start.clone(),
        }
    }
}

impl From<String> for ConditionValue {
    fn from(s: String) -> Self { ConditionValue::Scalar(s) }
}

impl From<&str> for ConditionValue {
    fn from(s: &str) -> Self { ConditionValue::Scalar(s.to_string()) }
}

/// One attribute/operator/value triple, or a consolidated range pair.
///
/// A blank attribute is legal: the filter-builder UI submits empty rows, and
/// they must survive a parse/serialize round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub attribute: String,
    pub operator: Operator,
    pub value: ConditionValue,
}

impl Condition {
    pub fn new(attribute: impl Into<String>, operator: Operator, value: impl Into<ConditionValue>) -> Self {
        Self { attribute: attribute.into(), operator, value: value.into() }
    }
}

/// The placeholder the builder starts from and the substitute for an empty
/// parse result.
impl Default for Condition {
    fn default() -> Self { Self { attribute: String::new(), operator: Operator::Cont, value: ConditionValue::Scalar(String::new()) } }
}

/// A non-empty ordered set of conditions joined by one combinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub combinator: Combinator,
    pub conditions: Vec<Condition>,
}

impl FilterGroup {
    pub fn new(combinator: Combinator, conditions: Vec<Condition>) -> Self { Self { combinator, conditions } }
}

impl Default for FilterGroup {
    fn default() -> Self { Self { combinator: Combinator::Or, conditions: vec![Condition::default()] } }
}

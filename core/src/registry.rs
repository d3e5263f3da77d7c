//! Attribute registry.
//!
//! Static configuration of what a collection lets users filter on: the
//! declared attributes (key, type, label, options), the quick-search field
//! list, and the simple equality filters. Built once per collection and passed
//! into every form - composition replaces the class-level registries of the
//! systems this engine is extracted from; a "subclass" is just another preset.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use siftql::{codec, search, ConditionValue};

use crate::simple::SimpleFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Text,
    Number,
    Date,
    DateTime,
    Select,
    Boolean,
}

impl AttributeType {
    /// Date-valued attributes get their consolidated ranges re-applied as
    /// direct range filters after query execution.
    pub fn is_temporal(&self) -> bool { matches!(self, AttributeType::Date | AttributeType::DateTime) }
}

/// One label/value pair of a `select` (or `boolean`) attribute's option list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self { Self { label: label.into(), value: value.into() } }
}

/// A declared filterable attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub key: String,
    pub kind: AttributeType,
    pub label: String,
    /// Ordered label/value pairs, consulted for `select` and `boolean`
    /// display translation only.
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

impl AttributeDefinition {
    pub fn new(key: impl Into<String>, kind: AttributeType, label: impl Into<String>) -> Self {
        Self { key: key.into(), kind, label: label.into(), options: Vec::new() }
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    /// Translate a stored value into its configured display label. Values with
    /// no matching option pass through unchanged, as do non-enumerated types.
    pub fn display_value(&self, value: &str) -> String {
        if !matches!(self.kind, AttributeType::Select | AttributeType::Boolean) {
            return value.to_string();
        }
        self.options.iter().find(|option| option.value == value).map(|option| option.label.clone()).unwrap_or_else(|| value.to_string())
    }
}

/// Declared attributes, quick-search fields, and simple filters for one
/// collection.
#[derive(Debug, Clone, Default)]
pub struct AttributeRegistry {
    attributes: IndexMap<String, AttributeDefinition>,
    search_fields: Vec<String>,
    simple_filters: Vec<SimpleFilter>,
}

impl AttributeRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn attribute(mut self, definition: AttributeDefinition) -> Self {
        self.attributes.insert(definition.key.clone(), definition);
        self
    }

    pub fn search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn simple_filter(mut self, filter: SimpleFilter) -> Self {
        self.simple_filters.push(filter);
        self
    }

    pub fn definition(&self, attribute: &str) -> Option<&AttributeDefinition> { self.attributes.get(attribute) }

    pub fn definitions(&self) -> impl Iterator<Item = &AttributeDefinition> { self.attributes.values() }

    pub fn is_declared(&self, attribute: &str) -> bool { self.attributes.contains_key(attribute) }

    /// A raw condition key is permitted iff it decodes to a declared
    /// attribute. Everything else is dropped at the form boundary - this is
    /// what bounds parameter injection.
    pub fn permits_key(&self, key: &str) -> bool {
        codec::decode(key).is_some_and(|(attribute, _)| self.attributes.contains_key(&attribute))
    }

    /// Human label for an attribute; undeclared attributes fall back to their
    /// raw name.
    pub fn label(&self, attribute: &str) -> String {
        self.attributes.get(attribute).map(|definition| definition.label.clone()).unwrap_or_else(|| attribute.to_string())
    }

    /// Translate one scalar through the attribute's option list.
    pub fn display_value(&self, attribute: &str, value: &str) -> String {
        match self.attributes.get(attribute) {
            Some(definition) => definition.display_value(value),
            None => value.to_string(),
        }
    }

    /// Translate the scalars inside a condition value; range bounds are never
    /// enumerated and pass through untouched.
    pub fn display_condition_value(&self, attribute: &str, value: ConditionValue) -> ConditionValue {
        match value {
            ConditionValue::Scalar(s) => ConditionValue::Scalar(self.display_value(attribute, &s)),
            ConditionValue::List(items) => {
                ConditionValue::List(items.into_iter().map(|item| self.display_value(attribute, &item)).collect())
            }
            range @ ConditionValue::Range { .. } => range,
        }
    }

    pub fn declared_search_fields(&self) -> &[String] { &self.search_fields }

    /// The composed quick-search predicate key, or `None` when no search
    /// fields are declared.
    pub fn search_predicate_key(&self) -> Option<String> {
        if self.search_fields.is_empty() {
            None
        } else {
            Some(search::predicate_key(&self.search_fields))
        }
    }

    pub fn declared_simple_filters(&self) -> &[SimpleFilter] { &self.simple_filters }
}

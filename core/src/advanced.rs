//! Standalone advanced filter form.
//!
//! A simpler peer of [`FilterForm`](crate::form::FilterForm) for contexts
//! without a backing declared-attribute container: attribute metadata is
//! purely declarative, group semantics are identical, `clear_filters` is
//! honored, and nothing persists.

use siftql::ast::{Combinator, FilterGroup};
use siftql::group;
use siftql::wire::{ParamMap, ParamValue};

use crate::form::{truthy, CLEAR_FILTERS_KEY, GROUPINGS_KEY, QUERY_KEY};
use crate::registry::AttributeDefinition;

pub struct AdvancedFilterForm {
    attributes: Vec<AttributeDefinition>,
    groups: Vec<FilterGroup>,
    combinator: Option<Combinator>,
}

impl AdvancedFilterForm {
    pub fn new(params: &ParamMap, attributes: Vec<AttributeDefinition>) -> Self {
        let empty = ParamMap::new();
        let q = params.get(QUERY_KEY).and_then(ParamValue::as_map).unwrap_or(&empty);

        if truthy(params.get(CLEAR_FILTERS_KEY)) {
            return Self { attributes, groups: vec![FilterGroup::default()], combinator: None };
        }

        let groups = q.get(GROUPINGS_KEY).and_then(ParamValue::as_map).map(group::parse_all).unwrap_or_default();
        let groups = if groups.is_empty() { vec![FilterGroup::default()] } else { groups };
        let combinator = q.get(group::COMBINATOR_KEY).and_then(ParamValue::as_scalar).and_then(|m| m.parse::<Combinator>().ok());
        Self { attributes, groups, combinator }
    }

    /// The declarative attribute metadata this form renders against.
    pub fn attributes(&self) -> &[AttributeDefinition] { &self.attributes }

    pub fn definition(&self, key: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|definition| definition.key == key)
    }

    pub fn filter_groups(&self) -> &[FilterGroup] { &self.groups }

    pub fn combinator(&self) -> Combinator { self.combinator.unwrap_or(Combinator::And) }

    /// Re-serialize the current groups into the `q` sub-map they came from,
    /// for re-rendering the builder.
    pub fn to_group_params(&self) -> ParamMap {
        let mut q = ParamMap::new();
        q.insert(GROUPINGS_KEY.to_string(), ParamValue::Map(group::serialize_all(&self.groups)));
        if let Some(combinator) = self.combinator {
            q.insert(group::COMBINATOR_KEY.to_string(), ParamValue::Scalar(combinator.to_string()));
        }
        q
    }
}

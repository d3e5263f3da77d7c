//! Per-request filter form.
//!
//! One `FilterForm` is built and consumed within one request/response cycle:
//! it narrows the raw parameters to the declared surface, extracts the
//! grouping/combinator/search state, runs the persistence decision table when
//! a storage id is configured, and exposes query assembly plus introspection
//! over the committed state. Lazy fields use `OnceCell`, which also keeps the
//! form deliberately `!Sync` - it is a request-local object, not a shared one.

use std::cell::OnceCell;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use siftql::ast::{Combinator, ConditionValue, FilterGroup, Operator};
use siftql::wire::{ParamMap, ParamValue};
use siftql::{codec, group, search, wire};

use crate::cache::{CacheKey, FilterCache};
use crate::error::QueryError;
use crate::persistence::{PersistedState, PersistenceStore, Signals};
use crate::registry::AttributeRegistry;
use crate::simple::{self, SimpleFilter};
use crate::target::{QueryRequest, QueryTarget, ResultOptions, ResultSet};

/// Top-level parameter carrying the whole filter payload.
pub const QUERY_KEY: &str = "q";
/// Sub-key of `q` carrying the indexed raw groups.
pub const GROUPINGS_KEY: &str = "g";
/// Sub-key of `q` carrying the sort expression; passes through to the
/// executor but never counts as a filter.
pub const SORT_KEY: &str = "s";
/// Out-of-band control signals; never persisted as filters.
pub const CLEAR_FILTERS_KEY: &str = "clear_filters";
pub const CLEAR_SEARCH_KEY: &str = "clear_search";

/// Construction-time configuration. `search_fields` / `simple_filters`
/// override the registry's declared defaults when set.
#[derive(Debug, Clone, Default)]
pub struct FormConfig {
    pub storage_id: Option<String>,
    pub context: Option<String>,
    pub search_fields: Option<Vec<String>>,
    pub simple_filters: Option<Vec<SimpleFilter>>,
    pub persist_enabled: bool,
}

/// One active condition resolved for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveFilter {
    pub attribute: String,
    pub label: String,
    pub operator: Operator,
    /// Display-translated: `select`/`boolean` scalars are mapped through the
    /// attribute's option labels.
    pub value: ConditionValue,
}

pub(crate) fn truthy(value: Option<&ParamValue>) -> bool {
    matches!(value.and_then(ParamValue::as_scalar), Some("true") | Some("1"))
}

fn parses_as_temporal(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
}

/// The per-request filter state and its operations.
pub struct FilterForm<'a, T: QueryTarget> {
    target: &'a T,
    registry: &'a AttributeRegistry,
    search_fields: Vec<String>,
    attributes: ParamMap,
    sort: Option<ParamValue>,
    groupings: Option<ParamMap>,
    combinator: Option<Combinator>,
    search_value: Option<String>,
    simple_values: ParamMap,
    groups: OnceCell<Vec<FilterGroup>>,
    result: OnceCell<T::ResultSet>,
}

impl<'a, T: QueryTarget> FilterForm<'a, T> {
    pub fn new(
        target: &'a T,
        registry: &'a AttributeRegistry,
        params: &ParamMap,
        config: FormConfig,
        cache: Option<&'a dyn FilterCache>,
    ) -> Self {
        let empty = ParamMap::new();
        let q = params.get(QUERY_KEY).and_then(ParamValue::as_map).unwrap_or(&empty);

        // 1. declared attribute keys only - unknown keys are dropped here,
        // which is what bounds parameter injection
        let mut attributes = ParamMap::new();
        for (key, value) in q {
            if registry.permits_key(key) && !matches!(value, ParamValue::Map(_)) {
                attributes.insert(key.clone(), value.clone());
            }
        }
        let sort = q.get(SORT_KEY).cloned();

        // 2. raw groupings and top-level combinator, opaque until parsed
        let mut groupings = q.get(GROUPINGS_KEY).and_then(ParamValue::as_map).cloned();
        let mut combinator = q.get(group::COMBINATOR_KEY).and_then(ParamValue::as_scalar).and_then(|m| m.parse::<Combinator>().ok());

        // 3. quick search, gated on configured fields
        let search_fields = config.search_fields.unwrap_or_else(|| registry.declared_search_fields().to_vec());
        let mut search_value =
            if search_fields.is_empty() { None } else { search::extract(q, &search::predicate_key(&search_fields)) };

        // simple filters resolve from the raw request only; they are not part
        // of the persisted record
        let simple_filters = config.simple_filters.unwrap_or_else(|| registry.declared_simple_filters().to_vec());
        let mut simple_values = ParamMap::new();
        simple::inject(&mut simple_values, &simple_filters, q);

        // 4. the persistence decision table may override everything above
        if let Some(storage_id) = &config.storage_id {
            let key = CacheKey::derive(target.collection_id(), config.context.as_deref(), storage_id);
            let signals = Signals {
                persist_enabled: config.persist_enabled,
                has_incoming_filters: !attributes.is_empty()
                    || groupings.as_ref().is_some_and(|groupings| !groupings.is_empty())
                    || search_value.is_some(),
                clear_filters: truthy(params.get(CLEAR_FILTERS_KEY)),
                clear_search: truthy(params.get(CLEAR_SEARCH_KEY)),
            };
            let state = PersistedState {
                attributes: attributes.clone(),
                groupings: groupings.clone(),
                combinator,
                search_value: search_value.clone(),
            };
            let resolved = PersistenceStore::new(cache, key).resolve(signals, state);
            attributes = resolved.attributes;
            groupings = resolved.groupings;
            combinator = resolved.combinator;
            search_value = resolved.search_value;
        }

        // 5. commit
        Self {
            target,
            registry,
            search_fields,
            attributes,
            sort,
            groupings,
            combinator,
            search_value,
            simple_values,
            groups: OnceCell::new(),
            result: OnceCell::new(),
        }
    }

    /// The committed attribute container: declared flat keys only.
    pub fn attributes(&self) -> &ParamMap { &self.attributes }

    pub fn search_value(&self) -> Option<&str> { self.search_value.as_deref() }

    /// Simple-filter values in effect, keyed by their `<attribute>_eq` form.
    pub fn simple_values(&self) -> &ParamMap { &self.simple_values }

    /// Parsed filter groups; one default group+condition when no groupings
    /// exist.
    pub fn filter_groups(&self) -> &[FilterGroup] {
        self.groups.get_or_init(|| {
            let groups = self.groupings.as_ref().map(|raw| group::parse_all(raw)).unwrap_or_default();
            if groups.is_empty() {
                vec![FilterGroup::default()]
            } else {
                groups
            }
        })
    }

    /// The inter-group combinator.
    pub fn combinator(&self) -> Combinator { self.combinator.unwrap_or(Combinator::And) }

    /// Count of active filters: container attributes plus group conditions
    /// with non-blank values. Blank-attribute conditions and the sort
    /// parameter never count.
    pub fn active_filters_count(&self) -> usize {
        let container = self.attributes.values().filter(|value| !value.is_blank()).count();
        let grouped = self
            .filter_groups()
            .iter()
            .flat_map(|group| &group.conditions)
            .filter(|condition| !condition.attribute.is_empty() && !condition.value.is_blank())
            .count();
        container + grouped
    }

    pub fn has_active_filters(&self) -> bool { self.active_filters_count() > 0 }

    /// Every active condition with its attribute label resolved and its value
    /// translated for display.
    pub fn active_filter_details(&self) -> Vec<ActiveFilter> {
        let mut details = Vec::new();
        for (key, value) in &self.attributes {
            let Some((attribute, operator)) = codec::decode(key) else { continue };
            if attribute.is_empty() || value.is_blank() {
                continue;
            }
            let value = match value {
                ParamValue::Scalar(s) => ConditionValue::Scalar(s.clone()),
                ParamValue::List(items) => ConditionValue::List(items.clone()),
                ParamValue::Map(_) => continue,
            };
            details.push(self.detail(attribute, operator, value));
        }
        for condition in self.filter_groups().iter().flat_map(|group| &group.conditions) {
            if condition.attribute.is_empty() || condition.value.is_blank() {
                continue;
            }
            details.push(self.detail(condition.attribute.clone(), condition.operator, condition.value.clone()));
        }
        details
    }

    fn detail(&self, attribute: String, operator: Operator, value: ConditionValue) -> ActiveFilter {
        let label = self.registry.label(&attribute);
        let value = self.registry.display_condition_value(&attribute, value);
        ActiveFilter { attribute, label, operator, value }
    }

    /// The flat parameter map handed to the executor: declared attributes,
    /// sort, groupings, top-level combinator, quick-search predicate, and
    /// simple-filter equality predicates.
    fn assembled_params(&self) -> ParamMap {
        let mut params = self.attributes.clone();
        if let Some(sort) = &self.sort {
            params.insert(SORT_KEY.to_string(), sort.clone());
        }
        if let Some(groupings) = &self.groupings {
            if !groupings.is_empty() {
                params.insert(GROUPINGS_KEY.to_string(), ParamValue::Map(groupings.clone()));
            }
        }
        if let Some(combinator) = self.combinator {
            params.insert(group::COMBINATOR_KEY.to_string(), ParamValue::Scalar(combinator.to_string()));
        }
        if let Some(value) = &self.search_value {
            if !self.search_fields.is_empty() {
                params.insert(search::predicate_key(&self.search_fields), ParamValue::Scalar(value.clone()));
            }
        }
        for (key, value) in &self.simple_values {
            params.insert(key.clone(), value.clone());
        }
        params
    }

    pub fn query_request(&self, options: ResultOptions) -> QueryRequest {
        QueryRequest { collection: self.target.collection_id().to_string(), params: self.assembled_params(), options }
    }

    /// Consolidated ranges over declared date/datetime attributes, applied as
    /// direct range filters after execution. Bounds that don't look like
    /// dates are skipped.
    fn date_ranges(&self) -> Vec<(String, String, String)> {
        let mut ranges = Vec::new();
        for definition in self.registry.definitions().filter(|definition| definition.kind.is_temporal()) {
            let start = self.attributes.get(&codec::encode(&definition.key, Operator::Gteq)).and_then(ParamValue::as_scalar);
            let end = self.attributes.get(&codec::encode(&definition.key, Operator::Lteq)).and_then(ParamValue::as_scalar);
            if let (Some(start), Some(end)) = (start, end) {
                ranges.push((definition.key.clone(), start.to_string(), end.to_string()));
            }
        }
        for condition in self.filter_groups().iter().flat_map(|group| &group.conditions) {
            if condition.operator != Operator::Between {
                continue;
            }
            let temporal = self.registry.definition(&condition.attribute).is_some_and(|definition| definition.kind.is_temporal());
            if !temporal {
                continue;
            }
            if let ConditionValue::Range { start, end } = &condition.value {
                ranges.push((condition.attribute.clone(), start.clone(), end.clone()));
            }
        }
        ranges.retain(|(attribute, start, end)| {
            let plausible = parses_as_temporal(start) || parses_as_temporal(end);
            if !plausible {
                debug!(attribute = %attribute, "skipping range with non-temporal bounds");
            }
            plausible
        });
        ranges
    }

    /// Execute via the target and apply date-range post-filters. Memoized per
    /// instance: the first call's result set is returned for every later
    /// call.
    pub fn result(&self, options: ResultOptions) -> Result<&T::ResultSet, QueryError> {
        if let Some(existing) = self.result.get() {
            return Ok(existing);
        }
        let request = self.query_request(options);
        let mut results = self.target.execute(&request)?;
        for (attribute, start, end) in self.date_ranges() {
            results = results.filter_range(&attribute, &start, &end);
        }
        Ok(self.result.get_or_init(|| results))
    }

    /// Re-emit the committed state as wire pairs, for rendering links that
    /// reproduce this request's filters.
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        let mut top = ParamMap::new();
        top.insert(QUERY_KEY.to_string(), ParamValue::Map(self.assembled_params()));
        wire::to_pairs(&top)
    }
}

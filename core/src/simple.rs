//! Simple equality filters.
//!
//! A simple filter is a single-attribute dropdown, independent of the
//! group/condition model: its wire shape is always `<attribute>_eq`. Option
//! collections may be produced by a closure resolved at read time - never
//! cached - so dropdowns backed by live data stay current.

use std::fmt;
use std::sync::Arc;

use siftql::{ParamMap, ParamValue};

use crate::registry::SelectOption;

/// Where a simple filter's option list comes from.
#[derive(Clone)]
pub enum OptionSource {
    Static(Vec<SelectOption>),
    Dynamic(Arc<dyn Fn() -> Vec<SelectOption> + Send + Sync>),
}

impl OptionSource {
    /// Resolve the current option list. Dynamic sources run on every call.
    pub fn resolve(&self) -> Vec<SelectOption> {
        match self {
            OptionSource::Static(options) => options.clone(),
            OptionSource::Dynamic(producer) => producer(),
        }
    }
}

impl fmt::Debug for OptionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSource::Static(options) => f.debug_tuple("Static").field(options).finish(),
            OptionSource::Dynamic(_) => f.debug_tuple("Dynamic").field(&"..").finish(),
        }
    }
}

/// One simple equality filter definition.
#[derive(Debug, Clone)]
pub struct SimpleFilter {
    pub attribute: String,
    pub source: OptionSource,
    pub blank_label: Option<String>,
    pub label: Option<String>,
    pub default: Option<String>,
}

impl SimpleFilter {
    pub fn new(attribute: impl Into<String>, source: OptionSource) -> Self {
        Self { attribute: attribute.into(), source, blank_label: None, label: None, default: None }
    }

    pub fn blank_label(mut self, label: impl Into<String>) -> Self {
        self.blank_label = Some(label.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// The wire key this filter reads and writes.
    pub fn key(&self) -> String { format!("{}_eq", self.attribute) }

    /// Read the submitted value from the raw parameters; blank reads as
    /// absent.
    pub fn extract_value(&self, params: &ParamMap) -> Option<String> {
        params.get(&self.key()).and_then(ParamValue::as_scalar).filter(|value| !value.is_empty()).map(str::to_string)
    }

    /// The value in effect for this request: submitted, else the definition
    /// default.
    pub fn resolved_value(&self, params: &ParamMap) -> Option<String> {
        self.extract_value(params).or_else(|| self.default.clone())
    }
}

/// Write `<attribute>_eq = value` into the accumulator for every definition
/// with a present resolved value.
pub fn inject(accumulator: &mut ParamMap, filters: &[SimpleFilter], params: &ParamMap) {
    for filter in filters {
        if let Some(value) = filter.resolved_value(params) {
            accumulator.insert(filter.key(), ParamValue::Scalar(value));
        }
    }
}

//! # Sifter
//!
//! Sifter turns a user-driven AND/OR filter builder's query parameters into
//! typed filter state - and back - and decides when that state is persisted
//! and restored across requests.
//!
//! ## Core concepts
//!
//! - **Condition**: one attribute/operator/value triple, or a consolidated
//!   `between` range pair
//! - **Group**: a non-empty set of conditions joined by one combinator
//!   (`and`/`or`)
//! - **Quick search**: one text input fanned out as an OR-combined "contains"
//!   predicate across several declared fields
//! - **Simple filter**: a single-attribute equality dropdown, independent of
//!   the group model
//! - **Persisted filter state**: the last-submitted state, cached under a
//!   stable key for later restoration
//!
//! ## Example
//!
//! ```rust
//! use sifter::{Combinator, Operator};
//! use sifter::siftql::{group, wire};
//!
//! // the wire shape a filter-builder UI submits
//! let params = wire::parse_pairs([
//!     ("q[g][0][name_cont]", "blue"),
//!     ("q[g][0][released_on_gteq]", "2024-01-01"),
//!     ("q[g][0][released_on_lteq]", "2024-12-31"),
//!     ("q[g][0][m]", "and"),
//! ]);
//!
//! let q = params.get("q").and_then(|v| v.as_map()).unwrap();
//! let groups = group::parse_all(q.get("g").and_then(|v| v.as_map()).unwrap());
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].combinator, Combinator::And);
//! // the gteq/lteq pair consolidated into one `between` condition
//! assert_eq!(groups[0].conditions[1].operator, Operator::Between);
//! ```

pub use sifter_core::{
    ActiveFilter, AdvancedFilterForm, AttributeDefinition, AttributeRegistry, AttributeType, CacheError, CacheKey,
    FilterCache, FilterForm, FormConfig, MemoryCache, OptionSource, PersistedState, PersistenceStore, QueryError,
    QueryRequest, QueryTarget, ResultOptions, ResultSet, SelectOption, Signals, SimpleFilter,
};
pub use siftql::{Combinator, Condition, ConditionValue, FilterGroup, Operator, ParamMap, ParamValue, ParseError};

/// The underlying crates, for callers that need the full module surface.
pub use sifter_core;
pub use siftql;

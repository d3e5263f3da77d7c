//! Query-target seam.
//!
//! The engine never executes queries. It assembles one flat parameter map and
//! hands it to the target-collection handle; whatever that handle returns is
//! treated as a lazily-evaluated result set that can still take direct range
//! filters (for the consolidated `between` ranges an executor may not
//! natively understand).

use siftql::ParamMap;

use crate::error::QueryError;

/// Options forwarded to the executor alongside the assembled parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultOptions {
    pub distinct: bool,
}

/// The assembled, flat executor input: declared attributes, groupings,
/// top-level combinator, quick-search predicate, and simple-filter equality
/// predicates, exactly as they would appear under `q` on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub collection: String,
    pub params: ParamMap,
    pub options: ResultOptions,
}

/// The target-collection handle: a stable identity (feeding cache-key
/// derivation) plus delegated query execution. Executor failures propagate
/// uncaught.
pub trait QueryTarget {
    type ResultSet: ResultSet;

    fn collection_id(&self) -> &str;

    fn execute(&self, request: &QueryRequest) -> Result<Self::ResultSet, QueryError>;
}

/// A result set that can take additional direct range filters after
/// execution.
pub trait ResultSet: Sized {
    fn filter_range(self, attribute: &str, start: &str, end: &str) -> Self;
}

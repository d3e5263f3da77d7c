//! # Sifter core
//!
//! Per-request filter-state orchestration on top of [`siftql`]: attribute
//! registries, simple equality filters, the persistence decision table, and
//! the [`FilterForm`] that ties them together and hands one flat parameter
//! map to an external query executor.

pub mod advanced;
pub mod cache;
pub mod error;
pub mod form;
pub mod persistence;
pub mod registry;
pub mod simple;
pub mod target;

pub use advanced::AdvancedFilterForm;
pub use cache::{CacheKey, FilterCache, MemoryCache};
pub use error::{CacheError, QueryError};
pub use form::{ActiveFilter, FilterForm, FormConfig};
pub use persistence::{PersistedState, PersistenceStore, Signals};
pub use registry::{AttributeDefinition, AttributeRegistry, AttributeType, SelectOption};
pub use simple::{OptionSource, SimpleFilter};
pub use target::{QueryRequest, QueryTarget, ResultOptions, ResultSet};

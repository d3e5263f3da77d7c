//! Persistence decision logic.
//!
//! Filter state is a UI convenience, not a transactional record: every branch
//! here degrades to "no persistence" when the cache is missing or failing,
//! and concurrent requests under one key are allowed to race.

use serde::{Deserialize, Serialize};
use siftql::{Combinator, ParamMap};
use tracing::{debug, warn};

use crate::cache::{CacheKey, FilterCache};

/// The persisted record. Opaque to callers; stored as JSON bytes under one
/// cache key.
///
/// Earlier deployments stored only `attributes` - the other fields default to
/// empty on decode so legacy records keep loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub attributes: ParamMap,
    #[serde(default)]
    pub groupings: Option<ParamMap>,
    #[serde(default)]
    pub combinator: Option<Combinator>,
    #[serde(default)]
    pub search_value: Option<String>,
}

impl PersistedState {
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
            && self.groupings.as_ref().is_none_or(|groupings| groupings.is_empty())
            && self.combinator.is_none()
            && self.search_value.is_none()
    }
}

/// Per-request control signals feeding the decision table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Signals {
    pub persist_enabled: bool,
    /// Any attribute/grouping/search value present in the current request.
    pub has_incoming_filters: bool,
    pub clear_filters: bool,
    pub clear_search: bool,
}

/// Load/save/clear decisions against the cache, bound to one key.
pub struct PersistenceStore<'a> {
    cache: Option<&'a dyn FilterCache>,
    key: CacheKey,
}

impl<'a> PersistenceStore<'a> {
    pub fn new(cache: Option<&'a dyn FilterCache>, key: CacheKey) -> Self { Self { cache, key } }

    /// Run the decision table, first match wins:
    ///
    /// 1. incoming filters: write them through and return them unchanged -
    ///    written even when persistence is off, so a later opt-in recovers
    ///    recent history
    /// 2. `clear_filters`: delete the entry, return empty state
    /// 3. `clear_search`: rewrite any cached entry without its search value
    ///    and return the rewritten record, else empty state
    /// 4. persistence on: return whatever is cached, else empty state
    /// 5. otherwise empty state; the cache is never read
    pub fn resolve(&self, signals: Signals, state: PersistedState) -> PersistedState {
        if signals.has_incoming_filters {
            self.write(&state);
            return state;
        }
        if signals.clear_filters {
            debug!(key = %self.key, "clearing persisted filter state");
            self.delete();
            return PersistedState::default();
        }
        if signals.clear_search {
            return match self.read() {
                Some(mut cached) => {
                    cached.search_value = None;
                    self.write(&cached);
                    cached
                }
                None => PersistedState::default(),
            };
        }
        if signals.persist_enabled {
            return self.read().unwrap_or_default();
        }
        PersistedState::default()
    }

    fn read(&self) -> Option<PersistedState> {
        let cache = self.cache?;
        match cache.read(&self.key) {
            Ok(Some(payload)) => match serde_json::from_slice(&payload) {
                Ok(state) => Some(state),
                Err(error) => {
                    warn!(key = %self.key, %error, "discarding undecodable cached filter state");
                    None
                }
            },
            Ok(None) => None,
            Err(error) => {
                warn!(key = %self.key, %error, "filter cache read failed, continuing without persistence");
                None
            }
        }
    }

    fn write(&self, state: &PersistedState) {
        let Some(cache) = self.cache else { return };
        let payload = match serde_json::to_vec(state) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(key = %self.key, %error, "could not serialize filter state, skipping write");
                return;
            }
        };
        if let Err(error) = cache.write(&self.key, payload) {
            warn!(key = %self.key, %error, "filter cache write failed, continuing without persistence");
        }
    }

    fn delete(&self) {
        let Some(cache) = self.cache else { return };
        if let Err(error) = cache.delete(&self.key) {
            warn!(key = %self.key, %error, "filter cache delete failed");
        }
    }
}

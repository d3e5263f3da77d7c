//! # SiftQL
//!
//! The Sifter query-parameter language: a flat, wire-compatible encoding of
//! boolean filter groups, and the codecs that move between the wire shape and
//! typed values.
//!
//! A filter travels as ordinary query parameters. Each condition is one
//! bracketed key whose tail names the operator:
//!
//! ```text
//! q[name_cont]=john                  scalar condition
//! q[status_in][]=active              array-valued condition
//! q[g][0][age_gteq]=21               grouped condition
//! q[g][0][m]=and                     intra-group combinator
//! q[m]=or                            inter-group combinator
//! q[name_or_genre_cont]=jazz         quick multi-field search
//! ```
//!
//! [`wire`] converts pair lists to nested maps, [`codec`] splits condition
//! keys with longest-operator-match-first precedence, [`group`] parses and
//! serializes whole groups (consolidating `gteq`+`lteq` pairs into `between`),
//! and [`search`] composes the quick-search predicate key.

pub mod ast;
pub mod codec;
pub mod error;
pub mod group;
pub mod search;
pub mod wire;

pub use ast::{Combinator, Condition, ConditionValue, FilterGroup, Operator};
pub use error::ParseError;
pub use wire::{ParamMap, ParamValue};

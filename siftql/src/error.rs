use thiserror::Error;

/// Errors from the strict parsing entry points (`FromStr` impls).
///
/// Wire-side decoding is deliberately lenient - unrecognized keys are dropped,
/// not reported - so this only surfaces where a caller hands us a value that
/// claims to already be a vocabulary member.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("unknown operator: {0}")]
    UnknownOperator(String),
    #[error("invalid combinator: {0} (expected \"and\" or \"or\")")]
    InvalidCombinator(String),
}

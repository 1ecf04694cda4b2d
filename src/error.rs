use thiserror::Error;

/// Errors reported to callers.
///
/// Resolution itself never fails with an error: unification failure and
/// search exhaustion are recovered by backtracking and surface as "no
/// solution". Only malformed input is reported here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Something that is not a well-formed rule was declared into a rule set
    #[error("invalid rule shape: {0}")]
    InvalidRuleShape(String),

    /// A trace level could not be parsed from configuration
    #[error("invalid trace level: {0:?}")]
    InvalidTraceLevel(String),

    /// Clause or query text could not be parsed
    #[cfg(feature = "parsing")]
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

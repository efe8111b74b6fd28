use crate::{discovery::DiscoveryError, pattern::PatternError};
use thiserror::Error as ThisError;

///
/// RouteError
///
/// Failure surfaced synchronously by configuration or by a routing call.
/// The planner decides whether to retry, fail the query, or fall back.
///

#[derive(Debug, ThisError)]
pub enum RouteError {
    #[error("invalid route configuration for '{option}': {message}")]
    Configuration { option: String, message: String },

    #[error("value '{value}' does not match date pattern '{pattern}'")]
    ValueParse { value: String, pattern: String },

    #[error("range start '{start}' is after range end '{end}'")]
    InvertedRange { start: String, end: String },

    #[error("no bucket label could be derived for table '{table}' from value '{value}'")]
    UnresolvedLabel { table: String, value: String },

    #[error("date arithmetic overflowed while stepping from '{value}'")]
    DateOverflow { value: String },

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

impl RouteError {
    /// Construct a configuration error for one option key.
    pub(crate) fn configuration(option: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            option: option.into(),
            message: message.into(),
        }
    }

    pub(crate) fn value_parse(value: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::ValueParse {
            value: value.into(),
            pattern: pattern.into(),
        }
    }

    /// True for errors raised while loading configuration rather than routing.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

///
/// TESTS
///

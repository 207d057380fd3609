//! Error types for matcher construction and navigation.
//!
//! Matching itself never fails: a classifier with no bound rule, or an
//! unknown classifier name passed to a direct lookup, falls through to the
//! next classifier or to the default producer. Errors only surface while a
//! rule tree is being built or walked.

use thiserror::Error;

/// Errors raised while building or navigating a matcher tree.
///
/// # Examples
///
/// ```
/// use u_matcher::{MapMatcher, MatchError};
///
/// let matcher: MapMatcher<String, &str> = MapMatcher::new();
/// let err = matcher.rule("missing", "a", "value").unwrap_err();
/// assert!(matches!(err, MatchError::Configuration(_)));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MatchError {
    /// A rule referenced a classifier that is neither registered nor callable.
    #[error("classifier \"{0}\" is not registered and no function was given")]
    Configuration(String),

    /// `end()` was called with no parent to return to.
    #[error("cannot navigate to parent matcher: {0}")]
    Navigation(&'static str),

    /// A registry query named a classifier that does not exist.
    #[error("there is no classifier registered with the name \"{0}\"")]
    UnknownClassifier(String),

    /// A [`MatcherConfig`](crate::MatcherConfig) failed validation.
    #[error("invalid matcher config: {0}")]
    InvalidConfig(String),
}

//! The matcher capability.

use crate::rules::{Outcome, Producer};

/// Anything that maps an input to an outcome with a fallback default.
///
/// Implemented by [`MapMatcher`](super::MapMatcher) and by wrappers such as
/// [`PostMatcher`](crate::PostMatcher).
pub trait Matcher<V, R> {
    /// The producer consulted when no rule applies.
    fn default_producer(&self) -> Producer<V, R>;

    /// Returns the first matching result, or the default's outcome.
    fn match_value(&self, value: &V) -> Outcome<R>;

    /// Returns every matching result in evaluation order. Never consults
    /// the default.
    fn match_all(&self, value: &V) -> Vec<R>;
}

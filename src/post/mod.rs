//! Post-processing of match results.
//!
//! [`PostMatcher`] wraps any [`Matcher`] and rewrites its results after the
//! fact. Results that are the inner matcher's non-answer (the `NoMatch`
//! sentinel, or exactly what the inner default produces for the same input)
//! pass through untouched.

use crate::engine::Matcher;
use crate::rules::{Outcome, Producer};

/// Rewrites a matched result.
pub trait Transform<V, R> {
    /// `result` is what `inner` matched for `value`.
    fn transform(&self, result: R, value: &V, inner: &dyn Matcher<V, R>) -> R;
}

impl<V, R, F> Transform<V, R> for F
where
    F: Fn(R, &V, &dyn Matcher<V, R>) -> R,
{
    fn transform(&self, result: R, value: &V, inner: &dyn Matcher<V, R>) -> R {
        self(result, value, inner)
    }
}

/// A matcher that transforms the results of another matcher.
///
/// # Examples
///
/// ```
/// use u_matcher::{Matcher, MapMatcher, Outcome, PostMatcher};
///
/// # fn main() -> Result<(), u_matcher::MatchError> {
/// let inner: MapMatcher<String, String> = MapMatcher::with_default("none".to_string());
/// inner
///     .define_classifier("first", |s: &String| s.chars().next(), 0)
///     .rule_with("first", 'f', |s: &String| s[..2].to_string())?;
///
/// let post = PostMatcher::new(inner, |r: String, v: &String, _: &dyn Matcher<String, String>| {
///     format!("{v}:{}", r.to_uppercase())
/// });
///
/// assert_eq!(post.match_value(&"foo bar".into()), Outcome::Matched("foo bar:FO".to_string()));
/// assert_eq!(post.match_value(&"not here".into()), Outcome::Matched("none".to_string()));
/// # Ok(())
/// # }
/// ```
pub struct PostMatcher<M, T> {
    inner: M,
    transform: T,
}

impl<M, T> PostMatcher<M, T> {
    pub fn new(inner: M, transform: T) -> Self {
        Self { inner, transform }
    }

    /// The wrapped matcher.
    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn into_inner(self) -> M {
        self.inner
    }
}

/// Whether `result` is exactly what `inner` falls back to for `value`.
fn is_default<V, R: PartialEq, M: Matcher<V, R>>(inner: &M, result: &R, value: &V) -> bool {
    match inner.default_producer().produce(value) {
        Outcome::Matched(default) => default == *result,
        Outcome::NoMatch => false,
    }
}

impl<V, R, M, T> Matcher<V, R> for PostMatcher<M, T>
where
    M: Matcher<V, R>,
    T: Transform<V, R>,
    R: PartialEq,
{
    fn default_producer(&self) -> Producer<V, R> {
        self.inner.default_producer()
    }

    fn match_value(&self, value: &V) -> Outcome<R> {
        match self.inner.match_value(value) {
            Outcome::Matched(result) if !is_default(&self.inner, &result, value) => {
                Outcome::Matched(self.transform.transform(result, value, &self.inner))
            }
            other => other,
        }
    }

    fn match_all(&self, value: &V) -> Vec<R> {
        self.inner
            .match_all(value)
            .into_iter()
            .map(|result| self.transform.transform(result, value, &self.inner))
            .collect()
    }
}

//! Result producers.

use super::outcome::Outcome;
use std::fmt;
use std::rc::Rc;

/// Computes the result bound to a rule.
///
/// Producers receive the original input value. Returning
/// [`Outcome::NoMatch`] declines the rule, letting the matcher continue with
/// its next classifier; nested matchers rely on this to defer upward.
pub trait Produce<V, R> {
    fn produce(&self, value: &V) -> Outcome<R>;
}

struct Constant<R>(R);

impl<V, R: Clone> Produce<V, R> for Constant<R> {
    fn produce(&self, _value: &V) -> Outcome<R> {
        Outcome::Matched(self.0.clone())
    }
}

struct Always<F>(F);

impl<V, R, F: Fn(&V) -> R> Produce<V, R> for Always<F> {
    fn produce(&self, value: &V) -> Outcome<R> {
        Outcome::Matched((self.0)(value))
    }
}

struct Maybe<F>(F);

impl<V, R, F: Fn(&V) -> Outcome<R>> Produce<V, R> for Maybe<F> {
    fn produce(&self, value: &V) -> Outcome<R> {
        (self.0)(value)
    }
}

struct Declined;

impl<V, R> Produce<V, R> for Declined {
    fn produce(&self, _value: &V) -> Outcome<R> {
        Outcome::NoMatch
    }
}

/// A shared, type-erased [`Produce`] implementation.
///
/// # Examples
///
/// ```
/// use u_matcher::{Outcome, Producer};
///
/// let greet: Producer<String, String> = Producer::from_fn(|name: &String| format!("hi {name}"));
/// assert_eq!(greet.produce(&"ann".to_string()), Outcome::Matched("hi ann".to_string()));
///
/// let fixed: Producer<String, &str> = Producer::constant("fixed");
/// assert_eq!(fixed.produce(&String::new()), Outcome::Matched("fixed"));
/// ```
pub struct Producer<V, R>(Rc<dyn Produce<V, R>>);

impl<V: 'static, R: 'static> Producer<V, R> {
    /// Wraps any producer implementation.
    pub fn new<P: Produce<V, R> + 'static>(producer: P) -> Self {
        Self(Rc::new(producer))
    }

    /// Always produces a clone of `value`.
    pub fn constant(value: R) -> Self
    where
        R: Clone,
    {
        Self::new(Constant(value))
    }

    /// Always matches with the closure's result.
    pub fn from_fn<F: Fn(&V) -> R + 'static>(f: F) -> Self {
        Self::new(Always(f))
    }

    /// Uses the closure's outcome as-is, so it may decline with `NoMatch`.
    pub fn from_outcome_fn<F: Fn(&V) -> Outcome<R> + 'static>(f: F) -> Self {
        Self::new(Maybe(f))
    }

    /// Always declines.
    pub fn no_match() -> Self {
        Self::new(Declined)
    }
}

impl<V, R> Producer<V, R> {
    pub fn produce(&self, value: &V) -> Outcome<R> {
        self.0.produce(value)
    }

    /// Whether both handles point at the same producer.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<V, R> Clone for Producer<V, R> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<V, R> Produce<V, R> for Producer<V, R> {
    fn produce(&self, value: &V) -> Outcome<R> {
        self.0.produce(value)
    }
}

impl<V, R> fmt::Debug for Producer<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Producer(..)")
    }
}

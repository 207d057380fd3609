//! Composable value-dispatch engine.
//!
//! Generalizes chained `if`/`match` logic into a declarative, nestable rule
//! table:
//!
//! - **Classifiers**: named, prioritized functions mapping an input to a
//!   canonical [`Key`]. Higher priority runs first; ties keep
//!   registration order.
//! - **Rules**: bindings from `(classifier, key)` to a result producer.
//!   One producer per pair; re-adding replaces it.
//! - **Match engine**: [`MapMatcher`] probes classifiers in order and returns
//!   the first result (or all of them), falling back to a default.
//! - **Linked matchers**: engines sharing one registry with independent
//!   rules and defaults, composed into dispatch trees. A child that finds
//!   nothing answers [`Outcome::NoMatch`] and the parent keeps probing.
//! - **Post-processing**: [`PostMatcher`] rewrites results of any [`Matcher`].
//!
//! # Examples
//!
//! ```
//! use u_matcher::{MapMatcher, Outcome};
//!
//! # fn main() -> Result<(), u_matcher::MatchError> {
//! let matcher: MapMatcher<String, &str> = MapMatcher::new();
//! matcher
//!     .define_classifier("first", |s: &String| s.chars().next(), 0)
//!     .define_classifier("last", |s: &String| s.chars().last(), 100);
//! matcher
//!     .rule("first", 'a', "starts with a")?
//!     .rule("last", 'b', "finishes with b")?;
//!
//! // "last" has the higher priority
//! assert_eq!(matcher.match_value(&"aaaaaab".into()), Outcome::Matched("finishes with b"));
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! The crate is single-threaded: matchers are `Rc` handles with interior
//! mutability and are neither `Send` nor `Sync`. Classifier and producer
//! panics propagate to the caller unchanged.

pub mod classify;
pub mod engine;
pub mod error;
pub mod key;
pub mod post;
pub mod rules;

pub use classify::{classifier_fn, Classifier, ClassifierFn, ClassifierRef, ClassifierRegistry};
pub use engine::{MapMatcher, Matcher, MatcherConfig};
pub use error::MatchError;
pub use key::{FloatKey, Key};
pub use post::{PostMatcher, Transform};
pub use rules::{Outcome, Produce, Producer, RuleTable};

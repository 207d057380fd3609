//! Match engine and linked matcher trees.
//!
//! [`MapMatcher`] evaluates classifiers from a shared
//! [`ClassifierRegistry`](crate::ClassifierRegistry) in priority order and
//! dispatches on its own rule table:
//!
//! 1. For each classifier, canonicalize its key and look up a rule.
//! 2. A missing rule, or a producer answering [`Outcome::NoMatch`](crate::Outcome),
//!    moves on to the next classifier.
//! 3. The first matched result is returned; if there is none, the default
//!    producer answers (and may itself answer `NoMatch`).
//!
//! Linked matchers reuse the same registry with independent rules and
//! defaults. Bound as producers, they narrow a match progressively; a
//! linked matcher that finds nothing returns `NoMatch`, which its parent
//! treats like a missing rule.

mod config;
mod matcher;
mod types;

pub use config::MatcherConfig;
pub use matcher::MapMatcher;
pub use types::Matcher;

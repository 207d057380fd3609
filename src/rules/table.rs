//! Per-matcher rule storage.

use super::producer::Producer;
use crate::key::Key;
use std::collections::HashMap;
use tracing::debug;

/// Rules keyed by classifier name, then by canonical key.
///
/// Each `(classifier, key)` pair binds exactly one producer; inserting a
/// second one replaces the first.
pub struct RuleTable<V, R> {
    rules: HashMap<String, HashMap<Key, Producer<V, R>>>,
}

impl<V, R> RuleTable<V, R> {
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Makes sure a (possibly empty) rule set exists for `classifier`.
    pub fn ensure(&mut self, classifier: &str) {
        if !self.rules.contains_key(classifier) {
            self.rules.insert(classifier.to_owned(), HashMap::new());
        }
    }

    /// Binds `key` under `classifier` to `producer`, returning the producer
    /// it replaced.
    pub fn insert(&mut self, classifier: &str, key: Key, producer: Producer<V, R>) -> Option<Producer<V, R>> {
        self.ensure(classifier);
        let replaced = self
            .rules
            .get_mut(classifier)
            .and_then(|set| set.insert(key.clone(), producer));
        if replaced.is_some() {
            debug!(classifier, key = %key, "rule_replaced");
        }
        replaced
    }

    /// Returns the producer bound to `(classifier, key)`, if any.
    pub fn lookup(&self, classifier: &str, key: &Key) -> Option<Producer<V, R>> {
        self.rules.get(classifier)?.get(key).cloned()
    }

    /// Whether a rule set exists for `classifier`, even if empty.
    pub fn has_classifier(&self, classifier: &str) -> bool {
        self.rules.contains_key(classifier)
    }

    /// Number of rules bound under `classifier`.
    pub fn rules_for(&self, classifier: &str) -> usize {
        self.rules.get(classifier).map_or(0, HashMap::len)
    }

    /// Total number of rules.
    pub fn len(&self) -> usize {
        self.rules.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V, R> Default for RuleTable<V, R> {
    fn default() -> Self {
        Self::new()
    }
}

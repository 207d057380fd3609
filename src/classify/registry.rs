//! Ordered classifier registry.

use super::types::{Classifier, ClassifierFn};
use crate::error::MatchError;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// An evaluation-ordered snapshot of a registry.
pub type OrderedClassifiers<V> = Rc<[Rc<Classifier<V>>]>;

/// Named classifiers with a cached evaluation order.
///
/// Evaluation order is descending priority; classifiers with equal priority
/// keep their first-registration order. The order is recomputed lazily on
/// the first [`ordered_view`](Self::ordered_view) after a mutation.
///
/// # Examples
///
/// ```
/// use u_matcher::{classifier_fn, ClassifierRegistry};
///
/// let mut registry = ClassifierRegistry::new();
/// registry.register("first", classifier_fn(|s: &String| s.chars().next()), 0);
/// registry.register("last", classifier_fn(|s: &String| s.chars().last()), 100);
///
/// let names: Vec<_> = registry
///     .ordered_view()
///     .iter()
///     .map(|c| c.name.clone())
///     .collect();
/// assert_eq!(names, vec!["last", "first"]);
/// ```
pub struct ClassifierRegistry<V> {
    classifiers: HashMap<String, Rc<Classifier<V>>>,
    next_sequence: u64,
    /// `None` when stale.
    ordered: Option<OrderedClassifiers<V>>,
}

impl<V> ClassifierRegistry<V> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            classifiers: HashMap::new(),
            next_sequence: 0,
            ordered: None,
        }
    }

    /// Inserts or replaces the classifier registered under `name`.
    ///
    /// A replaced classifier keeps its original insertion sequence, so its
    /// position among equal-priority peers does not change. Returns `true`
    /// when `name` was not registered before.
    pub fn register(&mut self, name: impl Into<String>, function: ClassifierFn<V>, priority: i32) -> bool {
        let name = name.into();
        let (sequence, fresh) = match self.classifiers.get(&name) {
            Some(existing) => (existing.sequence, false),
            None => {
                let seq = self.next_sequence;
                self.next_sequence += 1;
                (seq, true)
            }
        };

        debug!(
            classifier = %name,
            priority,
            sequence,
            replaced = !fresh,
            "classifier_registered"
        );

        self.classifiers.insert(
            name.clone(),
            Rc::new(Classifier {
                name,
                function,
                priority,
                sequence,
            }),
        );
        self.ordered = None;
        fresh
    }

    /// Returns classifiers in evaluation order.
    ///
    /// The returned snapshot is independent of later mutations.
    pub fn ordered_view(&mut self) -> OrderedClassifiers<V> {
        if let Some(ordered) = &self.ordered {
            return Rc::clone(ordered);
        }

        let mut sorted: Vec<Rc<Classifier<V>>> = self.classifiers.values().cloned().collect();
        sorted.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.sequence.cmp(&b.sequence))
        });
        debug!(classifiers = sorted.len(), "classifier_order_rebuilt");

        let ordered: OrderedClassifiers<V> = sorted.into();
        self.ordered = Some(Rc::clone(&ordered));
        ordered
    }

    /// Whether the cached order must be rebuilt before the next evaluation.
    pub fn is_stale(&self) -> bool {
        self.ordered.is_none()
    }

    /// Looks up a classifier by name.
    pub fn get(&self, name: &str) -> Option<Rc<Classifier<V>>> {
        self.classifiers.get(name).cloned()
    }

    /// Returns the priority of the named classifier.
    pub fn priority(&self, name: &str) -> Result<i32, MatchError> {
        self.classifiers
            .get(name)
            .map(|c| c.priority)
            .ok_or_else(|| MatchError::UnknownClassifier(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classifiers.contains_key(name)
    }

    /// Name of a classifier registered with this exact function handle.
    ///
    /// Identity is by pointer, not behaviour: two separately built closures
    /// are always distinct classifiers.
    pub fn find_function(&self, function: &ClassifierFn<V>) -> Option<String> {
        self.classifiers
            .values()
            .filter(|c| Rc::ptr_eq(&c.function, function))
            .min_by_key(|c| c.sequence)
            .map(|c| c.name.clone())
    }

    /// Synthesizes a name of the form `{prefix}{n}` that is not yet taken.
    pub fn free_name(&self, prefix: &str) -> String {
        let mut index = self.classifiers.len();
        loop {
            let candidate = format!("{prefix}{index}");
            if !self.classifiers.contains_key(&candidate) {
                return candidate;
            }
            index += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }

    /// Names in evaluation order.
    pub fn names(&mut self) -> Vec<String> {
        self.ordered_view().iter().map(|c| c.name.clone()).collect()
    }
}

impl<V> Default for ClassifierRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

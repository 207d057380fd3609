//! The prioritized multi-classifier match engine.

use super::config::MatcherConfig;
use super::types::Matcher;
use crate::classify::{classifier_fn, Classifier, ClassifierFn, ClassifierRef, ClassifierRegistry};
use crate::error::MatchError;
use crate::key::Key;
use crate::rules::{Outcome, Produce, Producer, RuleTable};
use std::cell::RefCell;
use std::fmt;
use std::ops::ControlFlow;
use std::rc::{Rc, Weak};
use tracing::trace;

struct Inner<V, R> {
    registry: Rc<RefCell<ClassifierRegistry<V>>>,
    rules: RefCell<RuleTable<V, R>>,
    default: RefCell<Producer<V, R>>,
    parent: Option<Weak<Inner<V, R>>>,
    config: Rc<MatcherConfig>,
}

/// A rule-table matcher over a shared, prioritized classifier registry.
///
/// `MapMatcher` is a handle: cloning it yields another reference to the same
/// engine, and every builder method takes `&self`. Classifiers run in
/// descending priority (ties in registration order); the first rule whose
/// producer does not decline wins, otherwise the default producer answers.
///
/// Matchers created by [`linked_matcher`](Self::linked_matcher) share this
/// matcher's registry but own their rules and default, so they can be bound
/// as producers to build dispatch trees.
///
/// The engine is single-threaded. Registration is expected to finish before
/// matching starts; no borrow is held while classifiers or producers run,
/// so nested matchers can be evaluated from inside a parent's traversal.
///
/// # Examples
///
/// ```
/// use u_matcher::{MapMatcher, Outcome};
///
/// # fn main() -> Result<(), u_matcher::MatchError> {
/// let matcher: MapMatcher<String, &str> = MapMatcher::new();
/// matcher
///     .define_classifier("first", |s: &String| s.chars().next(), 0)
///     .define_classifier("last", |s: &String| s.chars().last(), 0);
/// matcher
///     .rule("first", 'a', "starts with a")?
///     .rule("last", 'b', "finishes with b")?;
///
/// assert_eq!(matcher.match_value(&"aaaaaab".into()), Outcome::Matched("starts with a"));
/// assert_eq!(matcher.match_value(&"caaaaab".into()), Outcome::Matched("finishes with b"));
/// assert_eq!(matcher.match_all(&"aaaaaab".into()), vec!["starts with a", "finishes with b"]);
/// assert_eq!(matcher.match_value(&"z".into()), Outcome::NoMatch);
/// # Ok(())
/// # }
/// ```
pub struct MapMatcher<V, R> {
    inner: Rc<Inner<V, R>>,
}

impl<V: 'static, R: 'static> MapMatcher<V, R> {
    /// Creates a root matcher with a fresh registry and a `NoMatch` default.
    pub fn new() -> Self {
        Self::build(
            Rc::new(RefCell::new(ClassifierRegistry::new())),
            Producer::no_match(),
            None,
            Rc::new(MatcherConfig::default()),
        )
    }

    /// Creates a root matcher whose default always yields `value`.
    pub fn with_default(value: R) -> Self
    where
        R: Clone,
    {
        let matcher = Self::new();
        matcher.set_default(value);
        matcher
    }

    /// Creates a root matcher with a custom configuration.
    pub fn with_config(config: MatcherConfig) -> Result<Self, MatchError> {
        config.validate().map_err(MatchError::InvalidConfig)?;
        Ok(Self::build(
            Rc::new(RefCell::new(ClassifierRegistry::new())),
            Producer::no_match(),
            None,
            Rc::new(config),
        ))
    }

    fn build(
        registry: Rc<RefCell<ClassifierRegistry<V>>>,
        default: Producer<V, R>,
        parent: Option<Weak<Inner<V, R>>>,
        config: Rc<MatcherConfig>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                registry,
                rules: RefCell::new(RuleTable::new()),
                default: RefCell::new(default),
                parent,
                config,
            }),
        }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.inner.config
    }

    // ---- Default ----

    /// The producer used when no rule applies.
    pub fn default_producer(&self) -> Producer<V, R> {
        self.inner.default.borrow().clone()
    }

    /// Sets a constant default result.
    pub fn set_default(&self, value: R) -> &Self
    where
        R: Clone,
    {
        self.set_default_producer(Producer::constant(value))
    }

    /// Sets a default computed from the input value.
    pub fn set_default_fn<F: Fn(&V) -> R + 'static>(&self, f: F) -> &Self {
        self.set_default_producer(Producer::from_fn(f))
    }

    pub fn set_default_producer(&self, producer: Producer<V, R>) -> &Self {
        *self.inner.default.borrow_mut() = producer;
        self
    }

    /// Resets the default to the `NoMatch` sentinel.
    pub fn clear_default(&self) -> &Self {
        self.set_default_producer(Producer::no_match())
    }

    // ---- Classifiers ----

    /// Registers (or replaces) a named classifier.
    ///
    /// The registry is shared with every linked matcher, so the classifier
    /// becomes visible to all of them.
    pub fn define_classifier<K, F>(&self, name: impl Into<String>, f: F, priority: i32) -> &Self
    where
        F: Fn(&V) -> K + 'static,
        K: Into<Key>,
    {
        self.define_classifier_fn(name, classifier_fn(f), priority)
    }

    /// Registers (or replaces) a named classifier from a shared handle.
    pub fn define_classifier_fn(&self, name: impl Into<String>, function: ClassifierFn<V>, priority: i32) -> &Self {
        self.register(name.into(), function, priority);
        self
    }

    fn register(&self, name: String, function: ClassifierFn<V>, priority: i32) {
        self.inner.rules.borrow_mut().ensure(&name);
        self.inner
            .registry
            .borrow_mut()
            .register(name, function, priority);
    }

    /// Looks up a registered classifier.
    pub fn classifier(&self, name: &str) -> Result<Rc<Classifier<V>>, MatchError> {
        self.inner
            .registry
            .borrow()
            .get(name)
            .ok_or_else(|| MatchError::UnknownClassifier(name.to_owned()))
    }

    /// Priority of a registered classifier.
    pub fn priority(&self, name: &str) -> Result<i32, MatchError> {
        self.inner.registry.borrow().priority(name)
    }

    /// Classifier names in evaluation order.
    pub fn classifier_names(&self) -> Vec<String> {
        self.inner.registry.borrow_mut().names()
    }

    /// Resolves a classifier reference to a registered name, registering ad
    /// hoc functions on the way.
    fn resolve(&self, classifier: ClassifierRef<V>) -> Result<String, MatchError> {
        match classifier {
            ClassifierRef::Name(name) => {
                if self.inner.registry.borrow().contains(&name) {
                    Ok(name)
                } else {
                    Err(MatchError::Configuration(name))
                }
            }
            ClassifierRef::Function(function) => {
                let existing = self.inner.registry.borrow().find_function(&function);
                if let Some(name) = existing {
                    return Ok(name);
                }
                let name = self
                    .inner
                    .registry
                    .borrow()
                    .free_name(&self.inner.config.anonymous_prefix);
                self.register(name.clone(), function, self.inner.config.auto_priority);
                Ok(name)
            }
            ClassifierRef::Named(name, function) => {
                let known = self.inner.registry.borrow().contains(&name);
                if !known {
                    self.register(name.clone(), function, self.inner.config.auto_priority);
                }
                Ok(name)
            }
        }
    }

    // ---- Rules ----

    /// Binds `expected` under `classifier` to a producer.
    ///
    /// Fails with [`MatchError::Configuration`] when `classifier` names an
    /// unregistered classifier and carries no function.
    pub fn rule_producer(
        &self,
        classifier: impl Into<ClassifierRef<V>>,
        expected: impl Into<Key>,
        producer: Producer<V, R>,
    ) -> Result<&Self, MatchError> {
        let name = self.resolve(classifier.into())?;
        self.inner
            .rules
            .borrow_mut()
            .insert(&name, expected.into(), producer);
        Ok(self)
    }

    /// Binds `expected` under `classifier` to a constant result.
    pub fn rule(
        &self,
        classifier: impl Into<ClassifierRef<V>>,
        expected: impl Into<Key>,
        result: R,
    ) -> Result<&Self, MatchError>
    where
        R: Clone,
    {
        self.rule_producer(classifier, expected, Producer::constant(result))
    }

    /// Binds `expected` under `classifier` to a result computed from the input.
    pub fn rule_with<F: Fn(&V) -> R + 'static>(
        &self,
        classifier: impl Into<ClassifierRef<V>>,
        expected: impl Into<Key>,
        f: F,
    ) -> Result<&Self, MatchError> {
        self.rule_producer(classifier, expected, Producer::from_fn(f))
    }

    /// Binds `expected` under `classifier` to a nested matcher.
    ///
    /// When the nested matcher yields `NoMatch`, this matcher carries on
    /// with its remaining classifiers.
    pub fn rule_matcher(
        &self,
        classifier: impl Into<ClassifierRef<V>>,
        expected: impl Into<Key>,
        nested: &MapMatcher<V, R>,
    ) -> Result<&Self, MatchError> {
        self.rule_producer(classifier, expected, Producer::from(nested.clone()))
    }

    /// Binds `expected` under `classifier` to a fresh linked matcher and
    /// returns it; use [`end`](Self::end) to come back.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_matcher::{MapMatcher, Outcome};
    ///
    /// # fn main() -> Result<(), u_matcher::MatchError> {
    /// let root: MapMatcher<String, &str> = MapMatcher::new();
    /// root.define_classifier("first", |s: &String| s.chars().next(), 0)
    ///     .define_classifier("last", |s: &String| s.chars().last(), 0);
    ///
    /// root.rule_branch("first", 'a')?
    ///     .rule("last", 'b', "a...b")?
    ///     .end()?
    ///     .rule("first", 'c', "c...")?;
    ///
    /// assert_eq!(root.match_value(&"axb".into()), Outcome::Matched("a...b"));
    /// assert_eq!(root.match_value(&"cxx".into()), Outcome::Matched("c..."));
    /// assert_eq!(root.match_value(&"axx".into()), Outcome::NoMatch);
    /// # Ok(())
    /// # }
    /// ```
    pub fn rule_branch(
        &self,
        classifier: impl Into<ClassifierRef<V>>,
        expected: impl Into<Key>,
    ) -> Result<MapMatcher<V, R>, MatchError> {
        let child = self.linked_matcher();
        self.rule_matcher(classifier, expected, &child)?;
        Ok(child)
    }

    /// Registers `f` as a new anonymous classifier at `priority` and binds
    /// `expected` under it to `result`.
    pub fn callback_rule<K, F>(&self, f: F, expected: impl Into<Key>, result: R, priority: i32) -> &Self
    where
        F: Fn(&V) -> K + 'static,
        K: Into<Key>,
        R: Clone,
    {
        let name = self
            .inner
            .registry
            .borrow()
            .free_name(&self.inner.config.anonymous_prefix);
        self.register(name.clone(), classifier_fn(f), priority);
        self.inner
            .rules
            .borrow_mut()
            .insert(&name, expected.into(), Producer::constant(result));
        self
    }

    /// Number of rules owned by this matcher (not its linked peers).
    pub fn rule_count(&self) -> usize {
        self.inner.rules.borrow().len()
    }

    // ---- Matching ----

    /// Walks classifiers in evaluation order, feeding each non-declined
    /// rule result to `on_match`.
    fn traverse<F>(&self, value: &V, mut on_match: F) -> ControlFlow<R>
    where
        F: FnMut(R) -> ControlFlow<R>,
    {
        let ordered = self.inner.registry.borrow_mut().ordered_view();

        for classifier in ordered.iter() {
            let key = classifier.classify(value);
            let producer = self.inner.rules.borrow().lookup(&classifier.name, &key);
            let Some(producer) = producer else {
                continue;
            };

            match producer.produce(value) {
                Outcome::Matched(result) => {
                    trace!(classifier = %classifier.name, key = %key, "rule_matched");
                    if let ControlFlow::Break(stop) = on_match(result) {
                        return ControlFlow::Break(stop);
                    }
                }
                Outcome::NoMatch => {
                    trace!(classifier = %classifier.name, key = %key, "rule_declined");
                }
            }
        }

        ControlFlow::Continue(())
    }

    /// Returns the first non-declined rule result, falling back to the
    /// default producer.
    pub fn match_value(&self, value: &V) -> Outcome<R> {
        if let ControlFlow::Break(result) = self.traverse(value, ControlFlow::Break) {
            return Outcome::Matched(result);
        }
        trace!("default_used");
        self.default_producer().produce(value)
    }

    /// Returns every non-declined rule result in evaluation order.
    pub fn match_all(&self, value: &V) -> Vec<R> {
        let mut results = Vec::new();
        let _ = self.traverse(value, |result| {
            results.push(result);
            ControlFlow::Continue(())
        });
        results
    }

    /// Looks up `(classifier, key)` directly, skipping classification, and
    /// runs the bound producer (or the default) on `probe`.
    ///
    /// An unknown classifier name is a plain miss, not an error.
    pub fn match_by_classifier_value(&self, classifier: &str, key: impl Into<Key>, probe: &V) -> Outcome<R> {
        let producer = self.inner.rules.borrow().lookup(classifier, &key.into());
        match producer {
            Some(producer) => producer.produce(probe),
            None => self.default_producer().produce(probe),
        }
    }

    // ---- Linking ----

    /// Creates a matcher sharing this matcher's registry, with its own
    /// empty rule table and a `NoMatch` default. Its [`end`](Self::end)
    /// returns `self`.
    pub fn linked_matcher(&self) -> MapMatcher<V, R> {
        Self::build(
            Rc::clone(&self.inner.registry),
            Producer::no_match(),
            Some(Rc::downgrade(&self.inner)),
            Rc::clone(&self.inner.config),
        )
    }

    /// Returns the matcher that created this one with
    /// [`linked_matcher`](Self::linked_matcher).
    ///
    /// The back-reference is weak: it fails once the parent has been dropped,
    /// as well as on a root matcher.
    pub fn end(&self) -> Result<MapMatcher<V, R>, MatchError> {
        let parent = self
            .inner
            .parent
            .as_ref()
            .ok_or(MatchError::Navigation("already at the root matcher"))?;
        parent
            .upgrade()
            .map(|inner| MapMatcher { inner })
            .ok_or(MatchError::Navigation("parent matcher has been dropped"))
    }

    /// Whether this matcher was created standalone.
    pub fn is_root(&self) -> bool {
        self.inner.parent.is_none()
    }

    /// Whether both matchers belong to the same linked family.
    pub fn shares_registry_with(&self, other: &MapMatcher<V, R>) -> bool {
        Rc::ptr_eq(&self.inner.registry, &other.inner.registry)
    }

    /// Whether both handles refer to the same matcher.
    pub fn ptr_eq(&self, other: &MapMatcher<V, R>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<V: 'static, R: 'static> Default for MapMatcher<V, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, R> Clone for MapMatcher<V, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: 'static, R: 'static> Matcher<V, R> for MapMatcher<V, R> {
    fn default_producer(&self) -> Producer<V, R> {
        MapMatcher::default_producer(self)
    }

    fn match_value(&self, value: &V) -> Outcome<R> {
        MapMatcher::match_value(self, value)
    }

    fn match_all(&self, value: &V) -> Vec<R> {
        MapMatcher::match_all(self, value)
    }
}

impl<V: 'static, R: 'static> Produce<V, R> for MapMatcher<V, R> {
    fn produce(&self, value: &V) -> Outcome<R> {
        self.match_value(value)
    }
}

impl<V: 'static, R: 'static> From<MapMatcher<V, R>> for Producer<V, R> {
    fn from(matcher: MapMatcher<V, R>) -> Self {
        Producer::new(matcher)
    }
}

impl<V, R> fmt::Debug for MapMatcher<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapMatcher")
            .field("classifiers", &self.inner.registry.borrow().len())
            .field("rules", &self.inner.rules.borrow().len())
            .field("root", &self.inner.parent.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;

    type StrMatcher = MapMatcher<String, &'static str>;

    fn first_letter(s: &String) -> Option<char> {
        s.chars().next()
    }

    fn last_letter(s: &String) -> Option<char> {
        s.chars().last()
    }

    fn letters(first_priority: i32, last_priority: i32) -> StrMatcher {
        let matcher = StrMatcher::new();
        matcher
            .define_classifier("first", first_letter, first_priority)
            .define_classifier("last", last_letter, last_priority);
        matcher
            .rule("first", 'a', "starts with a")
            .unwrap()
            .rule("first", 'x', "starts with x")
            .unwrap()
            .rule("last", 'b', "finishes with b")
            .unwrap()
            .rule("last", 'y', "finishes with y")
            .unwrap();
        matcher
    }

    fn hit(matcher: &StrMatcher, input: &str) -> Outcome<&'static str> {
        matcher.match_value(&input.to_string())
    }

    #[test]
    fn test_match() {
        let matcher = letters(0, 0);

        assert_eq!(hit(&matcher, "aaaaaab"), Outcome::Matched("starts with a"));
        assert_eq!(hit(&matcher, "xaaaaay"), Outcome::Matched("starts with x"));
        assert_eq!(hit(&matcher, "caaaaab"), Outcome::Matched("finishes with b"));
        assert_eq!(hit(&matcher, "caaaaay"), Outcome::Matched("finishes with y"));
    }

    #[test]
    fn test_match_with_priorities() {
        let matcher = letters(10, 100);

        assert_eq!(hit(&matcher, "aaaaaab"), Outcome::Matched("finishes with b"));
        assert_eq!(hit(&matcher, "xaaaaay"), Outcome::Matched("finishes with y"));
        assert_eq!(hit(&matcher, "aaaaaabc"), Outcome::Matched("starts with a"));
        assert_eq!(hit(&matcher, "xasdasd"), Outcome::Matched("starts with x"));
    }

    #[test]
    fn test_priority_beats_registration_order() {
        let matcher = letters(0, 100);
        assert_eq!(hit(&matcher, "aaaaaab"), Outcome::Matched("finishes with b"));
    }

    #[test]
    fn test_match_all() {
        let matcher = letters(0, 0);
        let all = |s: &str| matcher.match_all(&s.to_string());

        assert_eq!(all("aaaaaab"), vec!["starts with a", "finishes with b"]);
        assert_eq!(all("xaaaaay"), vec!["starts with x", "finishes with y"]);
        assert_eq!(all("caaaaab"), vec!["finishes with b"]);
        assert_eq!(all("caaaaay"), vec!["finishes with y"]);
        assert!(all("zzz").is_empty());
    }

    #[test]
    fn test_match_all_follows_priority() {
        let matcher = letters(0, 100);
        assert_eq!(
            matcher.match_all(&"aaaaaab".to_string()),
            vec!["finishes with b", "starts with a"]
        );
    }

    #[test]
    fn test_match_all_ignores_default() {
        let matcher = letters(0, 0);
        matcher.set_default("default");
        assert!(matcher.match_all(&"zzz".to_string()).is_empty());
        assert_eq!(hit(&matcher, "zzz"), Outcome::Matched("default"));
    }

    #[test]
    fn test_no_match_sentinel() {
        let matcher = StrMatcher::new();
        matcher
            .rule(ClassifierRef::named("upper", |s: &String| s.to_uppercase()), "A", "a")
            .unwrap();

        assert_eq!(hit(&matcher, "a"), Outcome::Matched("a"));
        assert_eq!(hit(&matcher, "z"), Outcome::NoMatch);
    }

    #[test]
    fn test_sentinel_distinct_from_empty_result() {
        let matcher: MapMatcher<String, String> = MapMatcher::new();
        matcher
            .define_classifier("len", |s: &String| s.len(), 0)
            .rule("len", 0, String::new())
            .unwrap();

        assert_eq!(matcher.match_value(&String::new()), Outcome::Matched(String::new()));
        assert_eq!(matcher.match_value(&"z".to_string()), Outcome::NoMatch);
    }

    #[test]
    fn test_default_fallback() {
        let matcher = StrMatcher::with_default("nothing");
        matcher.define_classifier("first", first_letter, 0);
        matcher.rule("first", 'a', "starts with a").unwrap();

        assert_eq!(hit(&matcher, "qqq"), Outcome::Matched("nothing"));
        assert_eq!(hit(&matcher, ""), Outcome::Matched("nothing"));

        matcher.clear_default();
        assert_eq!(hit(&matcher, "qqq"), Outcome::NoMatch);
    }

    #[test]
    fn test_default_fn_receives_value() {
        let matcher: MapMatcher<String, String> = MapMatcher::new();
        matcher.set_default_fn(|s: &String| format!("unmatched:{s}"));
        assert_eq!(
            matcher.match_value(&"q".to_string()),
            Outcome::Matched("unmatched:q".to_string())
        );
    }

    #[test]
    fn test_match_with_callable_result() {
        let matcher: MapMatcher<String, String> = MapMatcher::new();
        matcher
            .define_classifier("first", first_letter, 0)
            .define_classifier("last", last_letter, 0);
        matcher
            .rule_with("first", 'a', |v: &String| format!("a:{v}"))
            .unwrap()
            .rule_with("first", 'x', |v: &String| format!("x:{v}"))
            .unwrap();

        assert_eq!(
            matcher.match_value(&"aaaaaab".to_string()),
            Outcome::Matched("a:aaaaaab".to_string())
        );
        assert_eq!(
            matcher.match_value(&"xaaaaay".to_string()),
            Outcome::Matched("x:xaaaaay".to_string())
        );
    }

    #[test]
    fn test_declining_producer_continues() {
        let matcher = StrMatcher::new();
        matcher
            .define_classifier("first", first_letter, 10)
            .define_classifier("last", last_letter, 0);
        matcher
            .rule_producer(
                "first",
                'a',
                Producer::from_outcome_fn(|s: &String| {
                    if s.len() > 3 {
                        Outcome::Matched("long a-word")
                    } else {
                        Outcome::NoMatch
                    }
                }),
            )
            .unwrap()
            .rule("last", 'b', "finishes with b")
            .unwrap();

        assert_eq!(hit(&matcher, "aaaab"), Outcome::Matched("long a-word"));
        assert_eq!(hit(&matcher, "aab"), Outcome::Matched("finishes with b"));
        assert_eq!(matcher.match_all(&"aab".to_string()), vec!["finishes with b"]);
    }

    #[test]
    fn test_composite_key() {
        #[derive(Clone)]
        struct Item {
            kind: &'static str,
            in_stock: bool,
            price: u32,
        }

        let matcher: MapMatcher<Item, &str> = MapMatcher::new();
        matcher
            .define_classifier("price", |i: &Item| i.price, 100)
            .define_classifier("kind_stock", |i: &Item| (i.kind, i.in_stock), 0);
        matcher
            .rule("price", 0, "free")
            .unwrap()
            .rule("kind_stock", vec![Key::from("book"), Key::from(true)], "Bingo!")
            .unwrap();

        let book = Item {
            kind: "book",
            in_stock: true,
            price: 12,
        };
        assert_eq!(matcher.match_value(&book), Outcome::Matched("Bingo!"));

        let sold_out = Item {
            in_stock: false,
            ..book.clone()
        };
        assert_eq!(matcher.match_value(&sold_out), Outcome::NoMatch);

        let free = Item { price: 0, ..book };
        assert_eq!(matcher.match_value(&free), Outcome::Matched("free"));
    }

    #[test]
    fn test_constant_classifier_composite() {
        let matcher = StrMatcher::new();
        matcher
            .define_classifier("test", |_: &String| ["a", "b"], 0)
            .rule("test", ("a", "b"), "Bingo!")
            .unwrap();
        assert_eq!(hit(&matcher, "any value"), Outcome::Matched("Bingo!"));
    }

    #[test]
    fn test_match_by_classifier_value() {
        let matcher = letters(0, 0);
        let probe = String::new();

        assert_eq!(
            matcher.match_by_classifier_value("first", 'a', &probe),
            Outcome::Matched("starts with a")
        );
        assert_eq!(
            matcher.match_by_classifier_value("last", 'y', &probe),
            Outcome::Matched("finishes with y")
        );
        assert_eq!(matcher.match_by_classifier_value("last", "xxx", &probe), Outcome::NoMatch);
        assert_eq!(matcher.match_by_classifier_value("xxx", "xxx", &probe), Outcome::NoMatch);

        matcher.set_default("fallback");
        assert_eq!(
            matcher.match_by_classifier_value("xxx", "xxx", &probe),
            Outcome::Matched("fallback")
        );
    }

    #[test]
    fn test_match_by_classifier_value_passes_probe() {
        let matcher: MapMatcher<String, String> = MapMatcher::new();
        matcher.define_classifier("first", first_letter, 0);
        matcher
            .rule_with("first", 'a', |v: &String| v.to_uppercase())
            .unwrap();

        assert_eq!(
            matcher.match_by_classifier_value("first", 'a', &"probe".to_string()),
            Outcome::Matched("PROBE".to_string())
        );
    }

    #[test]
    fn test_callback_rules() {
        let matcher = StrMatcher::new();
        let lower = || ClassifierRef::named("lower", |s: &String| s.to_lowercase());
        let upper = || ClassifierRef::named("upper", |s: &String| s.to_uppercase());

        matcher
            .rule(lower(), "aaa", "first")
            .unwrap()
            .rule(lower(), "bbb", "second")
            .unwrap()
            .rule(upper(), "AA", "third")
            .unwrap()
            .rule(upper(), "BB", "fourth")
            .unwrap();

        assert_eq!(matcher.classifier_names(), vec!["lower", "upper"]);
        assert_eq!(hit(&matcher, "AaA"), Outcome::Matched("first"));
        assert_eq!(hit(&matcher, "bBb"), Outcome::Matched("second"));
        assert_eq!(hit(&matcher, "Aa"), Outcome::Matched("third"));
        assert_eq!(hit(&matcher, "bB"), Outcome::Matched("fourth"));
    }

    #[test]
    fn test_named_ref_uses_registered_classifier() {
        let matcher = StrMatcher::new();
        matcher.define_classifier("first", first_letter, 0);
        // the registered "first" wins over the function carried by the ref
        matcher
            .rule(ClassifierRef::named("first", last_letter), 'a', "starts with a")
            .unwrap();

        assert_eq!(hit(&matcher, "ab"), Outcome::Matched("starts with a"));
        assert_eq!(hit(&matcher, "ba"), Outcome::NoMatch);
    }

    #[test]
    fn test_match_with_ad_hoc_function() {
        let matcher = letters(0, 0);
        matcher
            .rule(
                ClassifierRef::function(|s: &String| s.chars().nth(1)),
                'w',
                "second is w",
            )
            .unwrap();

        assert_eq!(hit(&matcher, "awaaaab"), Outcome::Matched("starts with a"));
        assert_eq!(hit(&matcher, "xwaaaay"), Outcome::Matched("starts with x"));
        assert_eq!(hit(&matcher, "cwaaaab"), Outcome::Matched("finishes with b"));
        assert_eq!(hit(&matcher, "caaaaay"), Outcome::Matched("finishes with y"));
        assert_eq!(hit(&matcher, "jwgsdjhagsd"), Outcome::Matched("second is w"));

        assert_eq!(matcher.classifier_names(), vec!["first", "last", "#2"]);
        assert_eq!(matcher.priority("#2"), Ok(0));
    }

    #[test]
    fn test_same_function_handle_registers_once() {
        let matcher = StrMatcher::new();
        let length = classifier_fn(|s: &String| s.len());

        matcher
            .rule(&length, 1, "one")
            .unwrap()
            .rule(&length, 2, "two")
            .unwrap();

        assert_eq!(matcher.classifier_names().len(), 1);
        assert_eq!(hit(&matcher, "x"), Outcome::Matched("one"));
        assert_eq!(hit(&matcher, "xy"), Outcome::Matched("two"));
    }

    #[test]
    fn test_callback_rule_priority() {
        let matcher = letters(0, 0);
        matcher.callback_rule(|s: &String| s.len(), 7, "seven letters", 50);

        assert_eq!(hit(&matcher, "aaaaaab"), Outcome::Matched("seven letters"));
        assert_eq!(hit(&matcher, "aaaaab"), Outcome::Matched("starts with a"));
        assert_eq!(matcher.classifier_names()[0], "#2");
    }

    #[test]
    fn test_unknown_name_is_configuration_error() {
        let matcher = StrMatcher::new();
        let err = matcher.rule("missing", 'a', "x").unwrap_err();
        assert_eq!(err, MatchError::Configuration("missing".into()));
        assert_eq!(matcher.rule_count(), 0);
    }

    #[test]
    fn test_rule_replacement() {
        let matcher = letters(0, 0);
        matcher.rule("first", 'a', "replaced").unwrap();

        assert_eq!(hit(&matcher, "aaaaaab"), Outcome::Matched("replaced"));
        assert_eq!(
            matcher.match_all(&"aaaaaab".to_string()),
            vec!["replaced", "finishes with b"]
        );
        assert_eq!(matcher.rule_count(), 4);
    }

    #[test]
    fn test_one_producer_per_classifier_key() {
        let calls = Rc::new(Cell::new(0));
        let matcher = StrMatcher::new();
        matcher.define_classifier("first", first_letter, 0);
        for result in ["one", "two", "three"] {
            let calls = Rc::clone(&calls);
            matcher
                .rule_producer(
                    "first",
                    'a',
                    Producer::from_fn(move |_: &String| {
                        calls.set(calls.get() + 1);
                        result
                    }),
                )
                .unwrap();
        }

        assert_eq!(matcher.match_all(&"abc".to_string()), vec!["three"]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_rule_order_does_not_affect_evaluation() {
        let matcher = StrMatcher::new();
        matcher
            .define_classifier("first", first_letter, 0)
            .define_classifier("last", last_letter, 0);
        // rules added in reverse of registration order
        matcher
            .rule("last", 'b', "finishes with b")
            .unwrap()
            .rule("first", 'a', "starts with a")
            .unwrap();

        assert_eq!(hit(&matcher, "aaaaaab"), Outcome::Matched("starts with a"));
    }

    #[test]
    fn test_priority_and_classifier_queries() {
        let matcher = StrMatcher::new();
        matcher
            .define_classifier("a", |_: &String| (), 0)
            .define_classifier("b", |_: &String| (), 100)
            .define_classifier("c", |_: &String| (), -100);

        assert_eq!(matcher.priority("a"), Ok(0));
        assert_eq!(matcher.priority("b"), Ok(100));
        assert_eq!(matcher.priority("c"), Ok(-100));
        assert_eq!(matcher.classifier("b").unwrap().priority, 100);
        assert_eq!(
            matcher.classifier("zzz").unwrap_err(),
            MatchError::UnknownClassifier("zzz".into())
        );
        assert_eq!(matcher.classifier_names(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_with_config() {
        let config = MatcherConfig::default()
            .with_anonymous_prefix("anon-")
            .with_auto_priority(5);
        let matcher = StrMatcher::with_config(config).unwrap();
        matcher.define_classifier("first", first_letter, 0);
        matcher
            .rule(ClassifierRef::function(last_letter), 'b', "finishes with b")
            .unwrap()
            .rule("first", 'a', "starts with a")
            .unwrap();

        assert_eq!(matcher.classifier_names(), vec!["anon-1", "first"]);
        assert_eq!(hit(&matcher, "aab"), Outcome::Matched("finishes with b"));
        assert_eq!(matcher.linked_matcher().config().auto_priority, 5);
    }

    #[test]
    fn test_with_invalid_config() {
        let config = MatcherConfig::default().with_anonymous_prefix("");
        let err = StrMatcher::with_config(config).unwrap_err();
        assert!(matches!(err, MatchError::InvalidConfig(_)));
    }

    // ---- Linked matchers ----

    #[test]
    fn test_hierarchical_match() {
        let engine = StrMatcher::new();
        engine
            .define_classifier("first", first_letter, 0)
            .define_classifier("last", last_letter, 0)
            .define_classifier("third", |s: &String| s.chars().nth(2), 0);

        let linked = engine.linked_matcher();
        let innermost = linked.linked_matcher();
        innermost
            .set_default("starts and finishes with a")
            .rule("third", 'a', "starts with aa and finishes with a")
            .unwrap()
            .rule("third", 'b', "starts with ab and finishes with a")
            .unwrap();
        linked
            .rule_matcher("last", 'a', &innermost)
            .unwrap()
            .rule("last", 'b', "starts with a and finishes with b")
            .unwrap()
            .set_default("starts with a");
        engine
            .rule_matcher("first", 'a', &linked)
            .unwrap()
            .rule("first", 'b', "starts with b")
            .unwrap();

        assert_eq!(hit(&engine, "aaaaaab"), Outcome::Matched("starts with a and finishes with b"));
        assert_eq!(hit(&engine, "aaaaaabaaa"), Outcome::Matched("starts with aa and finishes with a"));
        assert_eq!(hit(&engine, "abaaaabaaa"), Outcome::Matched("starts with aa and finishes with a"));
        assert_eq!(hit(&engine, "abbaaabaaa"), Outcome::Matched("starts with ab and finishes with a"));
        assert_eq!(hit(&engine, "abcaaabaaa"), Outcome::Matched("starts and finishes with a"));
        assert_eq!(hit(&engine, "abaaaabaaax"), Outcome::Matched("starts with a"));
        assert_eq!(hit(&engine, "bbaaaabaaax"), Outcome::Matched("starts with b"));
        assert_eq!(hit(&engine, "cbaaaabaaax"), Outcome::NoMatch);
    }

    #[test]
    fn test_child_no_match_defers_to_parent() {
        let parent = StrMatcher::new();
        parent
            .define_classifier("first", first_letter, 10)
            .define_classifier("last", last_letter, 0);

        let child = parent.rule_branch("first", 'a').unwrap();
        child.rule("last", 'z', "a...z").unwrap();
        parent.rule("last", 'b', "finishes with b").unwrap();

        assert_eq!(hit(&parent, "aaz"), Outcome::Matched("a...z"));
        // child declines, parent moves on to "last"
        assert_eq!(hit(&parent, "aab"), Outcome::Matched("finishes with b"));
        assert_eq!(parent.match_all(&"aab".to_string()), vec!["finishes with b"]);
        assert_eq!(parent.match_all(&"zzb".to_string()), vec!["finishes with b"]);
    }

    #[test]
    fn test_child_default_is_final_answer() {
        let parent = StrMatcher::new();
        parent
            .define_classifier("first", first_letter, 10)
            .define_classifier("last", last_letter, 0);

        let child = parent.rule_branch("first", 'a').unwrap();
        child.set_default("starts with a");
        parent.rule("last", 'b', "finishes with b").unwrap();

        assert_eq!(hit(&parent, "aab"), Outcome::Matched("starts with a"));
    }

    #[test]
    fn test_linked_matcher_shares_registry() {
        let matcher = StrMatcher::new();
        matcher
            .define_classifier("a", |_: &String| "1", 0)
            .define_classifier("b", |_: &String| "2", 0);
        matcher
            .rule("a", "1", "v1")
            .unwrap()
            .rule("b", "2", "v2")
            .unwrap();

        let linked = matcher.linked_matcher();
        linked.define_classifier("c", |_: &String| "3", 0);
        linked.rule("a", "3", "v3").unwrap();

        assert!(matcher.shares_registry_with(&linked));
        assert!(Rc::ptr_eq(
            &matcher.classifier("c").unwrap(),
            &linked.classifier("c").unwrap()
        ));
        assert_eq!(matcher.classifier_names(), vec!["a", "b", "c"]);

        let probe = String::new();
        assert_eq!(matcher.match_by_classifier_value("a", "3", &probe), Outcome::NoMatch);
        assert_eq!(linked.match_by_classifier_value("a", "1", &probe), Outcome::NoMatch);
        assert_eq!(matcher.rule_count(), 2);
        assert_eq!(linked.rule_count(), 1);

        linked.set_default("Different default");
        assert_eq!(matcher.default_producer().produce(&probe), Outcome::NoMatch);
    }

    #[test]
    fn test_registration_in_child_visible_to_parent_matching() {
        let parent = StrMatcher::new();
        let child = parent.linked_matcher();
        child.define_classifier("last", last_letter, 0);
        parent.rule("last", 'b', "finishes with b").unwrap();

        assert_eq!(hit(&parent, "ab"), Outcome::Matched("finishes with b"));
        assert_eq!(hit(&child, "ab"), Outcome::NoMatch);
    }

    #[test]
    fn test_rules_added_after_binding_are_seen() {
        let parent = StrMatcher::new();
        parent
            .define_classifier("first", first_letter, 0)
            .define_classifier("last", last_letter, 0);
        let child = parent.linked_matcher();
        parent.rule_matcher("first", 'a', &child).unwrap();
        assert_eq!(hit(&parent, "ab"), Outcome::NoMatch);

        child.rule("last", 'b', "a...b").unwrap();
        assert_eq!(hit(&parent, "ab"), Outcome::Matched("a...b"));
    }

    #[test]
    fn test_end_navigation() {
        let root = StrMatcher::new();
        root.define_classifier("first", first_letter, 0)
            .define_classifier("last", last_letter, 0);

        let child = root.rule_branch("first", 'a').unwrap();
        let back = child.rule("last", 'b', "a...b").unwrap().end().unwrap();
        assert!(back.ptr_eq(&root));
        assert!(root.is_root());
        assert!(!child.is_root());

        let grandchild = child.linked_matcher();
        assert!(grandchild.end().unwrap().ptr_eq(&child));
        assert!(grandchild.end().unwrap().end().unwrap().ptr_eq(&root));
    }

    #[test]
    fn test_end_on_root_fails() {
        let root = StrMatcher::new();
        assert!(matches!(root.end(), Err(MatchError::Navigation(_))));
    }

    #[test]
    fn test_end_after_parent_dropped() {
        let child = {
            let root = StrMatcher::new();
            root.linked_matcher()
        };
        assert!(matches!(child.end(), Err(MatchError::Navigation(_))));
        // the shared registry outlives the root
        child.define_classifier("first", first_letter, 0);
        child.rule("first", 'a', "starts with a").unwrap();
        assert_eq!(hit(&child, "a"), Outcome::Matched("starts with a"));
    }

    #[test]
    fn test_matcher_trait_object() {
        let matcher = letters(0, 0);
        let dynamic: &dyn Matcher<String, &'static str> = &matcher;
        assert_eq!(
            dynamic.match_value(&"aaaaaab".to_string()),
            Outcome::Matched("starts with a")
        );
        assert_eq!(dynamic.match_all(&"zzz".to_string()), Vec::<&str>::new());
        assert!(dynamic.default_producer().produce(&String::new()).is_no_match());
    }

    #[test]
    fn test_debug_output() {
        let matcher = letters(0, 0);
        let shown = format!("{matcher:?}");
        assert!(shown.contains("classifiers: 2"));
        assert!(shown.contains("rules: 4"));
    }

    proptest! {
        #[test]
        fn prop_unmatched_falls_back_to_default(input in "[c-w]{1,8}") {
            let matcher = letters(0, 0);
            matcher.set_default("default");
            prop_assert_eq!(matcher.match_value(&input), Outcome::Matched("default"));
            prop_assert!(matcher.match_all(&input).is_empty());
        }

        #[test]
        fn prop_match_is_head_of_match_all(input in "[abcxyz]{1,6}", last_priority in -5i32..5) {
            let matcher = letters(0, last_priority);
            let all = matcher.match_all(&input);
            prop_assert!(all.len() <= 2);
            match all.first() {
                Some(first) => prop_assert_eq!(matcher.match_value(&input), Outcome::Matched(*first)),
                None => prop_assert_eq!(matcher.match_value(&input), Outcome::NoMatch),
            }
        }

        #[test]
        fn prop_structural_keys_match(parts in proptest::collection::vec("[a-z]{0,3}", 0..4)) {
            let matcher: MapMatcher<Vec<String>, usize> = MapMatcher::new();
            matcher
                .define_classifier("whole", |v: &Vec<String>| v.clone(), 0)
                .rule("whole", parts.clone(), parts.len())
                .unwrap();
            let copy: Vec<String> = parts.iter().cloned().collect();
            prop_assert_eq!(matcher.match_value(&copy), Outcome::Matched(parts.len()));
        }
    }
}

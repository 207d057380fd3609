//! Classifier definitions.

use crate::key::Key;
use std::fmt;
use std::rc::Rc;

/// A shared classification function.
///
/// Classifiers are shared by reference: the same handle registered twice is
/// recognized by pointer identity (see
/// [`ClassifierRegistry::find_function`](super::ClassifierRegistry::find_function)).
pub type ClassifierFn<V> = Rc<dyn Fn(&V) -> Key>;

/// Wraps a closure returning anything convertible into a [`Key`].
///
/// # Examples
///
/// ```
/// use u_matcher::{classifier_fn, Key};
///
/// let first = classifier_fn(|s: &String| s.chars().next());
/// assert_eq!(first(&"abc".to_string()), Key::from('a'));
/// ```
pub fn classifier_fn<V, K, F>(f: F) -> ClassifierFn<V>
where
    F: Fn(&V) -> K + 'static,
    K: Into<Key>,
{
    Rc::new(move |value: &V| f(value).into())
}

/// A named, prioritized classification function.
pub struct Classifier<V> {
    /// Unique name within a registry.
    pub name: String,
    /// Maps an input to its classification key.
    pub function: ClassifierFn<V>,
    /// Evaluation priority; higher runs first.
    pub priority: i32,
    /// Insertion counter used to break priority ties.
    pub sequence: u64,
}

impl<V> Classifier<V> {
    /// Applies the classification function to `value`.
    pub fn classify(&self, value: &V) -> Key {
        (self.function)(value)
    }
}

impl<V> Clone for Classifier<V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            function: Rc::clone(&self.function),
            priority: self.priority,
            sequence: self.sequence,
        }
    }
}

impl<V> fmt::Debug for Classifier<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

/// How a rule refers to the classifier it is keyed on.
///
/// Most callers never build one explicitly: `&str`/`String` convert into
/// [`ClassifierRef::Name`] and [`ClassifierFn`] handles into
/// [`ClassifierRef::Function`].
pub enum ClassifierRef<V> {
    /// A classifier that must already be registered.
    Name(String),
    /// An ad hoc function, registered under a synthesized name on first use.
    Function(ClassifierFn<V>),
    /// A name that is also callable: used as-is when registered, otherwise
    /// the function is registered under that name.
    Named(String, ClassifierFn<V>),
}

impl<V> ClassifierRef<V> {
    /// Builds a [`ClassifierRef::Named`] from a closure.
    pub fn named<K, F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&V) -> K + 'static,
        K: Into<Key>,
    {
        ClassifierRef::Named(name.into(), classifier_fn(f))
    }

    /// Builds a [`ClassifierRef::Function`] from a closure.
    pub fn function<K, F>(f: F) -> Self
    where
        F: Fn(&V) -> K + 'static,
        K: Into<Key>,
    {
        ClassifierRef::Function(classifier_fn(f))
    }
}

impl<V> From<&str> for ClassifierRef<V> {
    fn from(name: &str) -> Self {
        ClassifierRef::Name(name.to_owned())
    }
}

impl<V> From<String> for ClassifierRef<V> {
    fn from(name: String) -> Self {
        ClassifierRef::Name(name)
    }
}

impl<V> From<&String> for ClassifierRef<V> {
    fn from(name: &String) -> Self {
        ClassifierRef::Name(name.clone())
    }
}

impl<V> From<ClassifierFn<V>> for ClassifierRef<V> {
    fn from(function: ClassifierFn<V>) -> Self {
        ClassifierRef::Function(function)
    }
}

impl<V> From<&ClassifierFn<V>> for ClassifierRef<V> {
    fn from(function: &ClassifierFn<V>) -> Self {
        ClassifierRef::Function(Rc::clone(function))
    }
}

impl<V> fmt::Debug for ClassifierRef<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierRef::Name(name) => f.debug_tuple("Name").field(name).finish(),
            ClassifierRef::Function(_) => f.write_str("Function(..)"),
            ClassifierRef::Named(name, _) => f.debug_tuple("Named").field(name).finish(),
        }
    }
}

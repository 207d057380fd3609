//! Classifiers and the shared classifier registry.
//!
//! A classifier is a named function from an input value to a [`Key`](crate::Key),
//! carrying a priority. The registry orders classifiers for evaluation and
//! is shared by every matcher in a linked family.

mod registry;
mod types;

pub use registry::{ClassifierRegistry, OrderedClassifiers};
pub use types::{classifier_fn, Classifier, ClassifierFn, ClassifierRef};

//! The canonical key type.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A canonicalized classification key.
///
/// Keys compare and hash structurally. Build them through the `From`
/// conversions rather than by hand so that equivalent inputs land on the
/// same variant (see the module docs for the canonical forms).
///
/// # Examples
///
/// ```
/// use u_matcher::Key;
///
/// assert_eq!(Key::from(1u8), Key::from(1i64));
/// assert_eq!(Key::from(("book", true)), Key::from(vec![Key::from("book"), Key::from(true)]));
/// assert_ne!(Key::from("1"), Key::from(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    /// Absence of a value (`()` or `None`).
    #[default]
    Null,
    Bool(bool),
    /// Any integer representable as `i64`.
    Int(i64),
    /// Unsigned integers above `i64::MAX`. Never holds a value that fits in `Int`.
    UInt(u64),
    Float(FloatKey),
    Str(String),
    List(Vec<Key>),
    /// String-keyed composite, ordered by key.
    Map(BTreeMap<String, Key>),
}

impl Key {
    /// Builds a list key from any sequence of convertible items.
    pub fn list<I, K>(items: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        Key::List(items.into_iter().map(Into::into).collect())
    }

    /// Builds a map key from `(name, value)` pairs. Later duplicates win.
    pub fn map<I, S, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, K)>,
        S: Into<String>,
        K: Into<Key>,
    {
        Key::Map(
            entries
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }

    /// Whether this key is a scalar (not a list or map).
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Key::List(_) | Key::Map(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Key::Null)
    }

    /// Returns the string payload, if this is a `Str` key.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an `Int` key.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Null => f.write_str("null"),
            Key::Bool(b) => write!(f, "{b}"),
            Key::Int(i) => write!(f, "{i}"),
            Key::UInt(u) => write!(f, "{u}"),
            Key::Float(x) => write!(f, "{}", x.get()),
            Key::Str(s) => write!(f, "{s:?}"),
            Key::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Key::Map(entries) => {
                f.write_str("{")?;
                for (i, (name, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name:?}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// A float usable as a hash key.
///
/// Equality, ordering and hashing go through a canonical bit pattern:
/// `-0.0` is folded into `0.0` and every NaN payload into a single NaN.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatKey(f64);

impl FloatKey {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// The wrapped value, as given.
    pub fn get(self) -> f64 {
        self.0
    }

    fn canonical_bits(self) -> u64 {
        if self.0.is_nan() {
            f64::NAN.to_bits()
        } else if self.0 == 0.0 {
            0.0f64.to_bits()
        } else {
            self.0.to_bits()
        }
    }

    fn canonical(self) -> f64 {
        f64::from_bits(self.canonical_bits())
    }
}

impl PartialEq for FloatKey {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_bits() == other.canonical_bits()
    }
}

impl Eq for FloatKey {}

impl Hash for FloatKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_bits().hash(state);
    }
}

impl PartialOrd for FloatKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical().total_cmp(&other.canonical())
    }
}

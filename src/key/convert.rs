//! Conversions from Rust values into canonical keys.

use super::types::{FloatKey, Key};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

impl From<()> for Key {
    fn from(_: ()) -> Self {
        Key::Null
    }
}

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Key::Bool(b)
    }
}

macro_rules! lossless_into_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Key {
                fn from(i: $t) -> Self {
                    Key::Int(i64::from(i))
                }
            }
        )*
    };
}

lossless_into_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<isize> for Key {
    fn from(i: isize) -> Self {
        // isize is at most 64 bits on every supported target.
        Key::Int(i as i64)
    }
}

impl From<u64> for Key {
    fn from(u: u64) -> Self {
        match i64::try_from(u) {
            Ok(i) => Key::Int(i),
            Err(_) => Key::UInt(u),
        }
    }
}

impl From<usize> for Key {
    fn from(u: usize) -> Self {
        Key::from(u as u64)
    }
}

impl From<f64> for Key {
    fn from(x: f64) -> Self {
        Key::Float(FloatKey::new(x))
    }
}

impl From<f32> for Key {
    fn from(x: f32) -> Self {
        Key::Float(FloatKey::new(f64::from(x)))
    }
}

impl From<FloatKey> for Key {
    fn from(x: FloatKey) -> Self {
        Key::Float(x)
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Key::Str(c.to_string())
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Self {
        Key::Str(s.clone())
    }
}

impl From<Box<str>> for Key {
    fn from(s: Box<str>) -> Self {
        Key::Str(s.into_string())
    }
}

impl From<Cow<'_, str>> for Key {
    fn from(s: Cow<'_, str>) -> Self {
        Key::Str(s.into_owned())
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

impl<T: Into<Key>> From<Option<T>> for Key {
    fn from(value: Option<T>) -> Self {
        value.map_or(Key::Null, Into::into)
    }
}

impl<T: Into<Key>> From<Vec<T>> for Key {
    fn from(items: Vec<T>) -> Self {
        Key::list(items)
    }
}

impl<T: Clone + Into<Key>> From<&[T]> for Key {
    fn from(items: &[T]) -> Self {
        Key::list(items.iter().cloned())
    }
}

impl<T: Into<Key>, const N: usize> From<[T; N]> for Key {
    fn from(items: [T; N]) -> Self {
        Key::list(items)
    }
}

macro_rules! tuple_into_list {
    ($($name:ident),+) => {
        impl<$($name: Into<Key>),+> From<($($name,)+)> for Key {
            #[allow(non_snake_case)]
            fn from(($($name,)+): ($($name,)+)) -> Self {
                Key::List(vec![$($name.into()),+])
            }
        }
    };
}

tuple_into_list!(A);
tuple_into_list!(A, B);
tuple_into_list!(A, B, C);
tuple_into_list!(A, B, C, D);

impl<S: Into<String>, T: Into<Key>> From<BTreeMap<S, T>> for Key {
    fn from(entries: BTreeMap<S, T>) -> Self {
        Key::map(entries)
    }
}

impl<S: Into<String>, T: Into<Key>, H> From<HashMap<S, T, H>> for Key {
    fn from(entries: HashMap<S, T, H>) -> Self {
        Key::map(entries)
    }
}

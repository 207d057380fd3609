//! Key canonicalization.
//!
//! Classification functions may return any value convertible into a
//! [`Key`]. The conversion is the canonicalization step: scalars keep their
//! value, composites are rebuilt element-wise so that two structurally equal
//! values always produce equal (and equally hashed) keys, independent of
//! where they live in memory.
//!
//! # Canonical forms
//!
//! | Input | Key |
//! |-------|-----|
//! | `()`, `None` | `Null` |
//! | `bool` | `Bool` |
//! | any integer fitting in `i64` | `Int` |
//! | `u64`/`usize` above `i64::MAX` | `UInt` |
//! | `f32`, `f64` | `Float` (bit-canonical: `-0.0 == 0.0`, NaN == NaN) |
//! | `char`, `&str`, `String` | `Str` |
//! | slices, arrays, `Vec`, tuples | `List` |
//! | string-keyed `BTreeMap`/`HashMap` | `Map` (sorted) |

mod convert;
mod types;

pub use types::{FloatKey, Key};

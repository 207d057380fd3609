//! Rule tables, result producers and the no-match sentinel.

mod outcome;
mod producer;
mod table;

pub use outcome::Outcome;
pub use producer::{Produce, Producer};
pub use table::RuleTable;

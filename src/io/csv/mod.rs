//! Delimited text reading.

mod read;

pub use read::TextTable;
pub(crate) use read::*;

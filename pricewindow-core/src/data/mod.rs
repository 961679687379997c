//! Raw bar source contract.

pub mod source;

pub use source::{trim_to_period, BarSource, Period, SourceError};

//! # formkit-smart: Smart Value Parsers
//!
//! Converts free-text user input into numbers while tolerating the
//! formatting variants people actually type into forms: a trailing
//! percent sign, a comma as the decimal separator, stray whitespace
//! around `%`.
//!
//! ## Totality
//!
//! None of the parsers fail or panic. Input that does not match one of
//! the accepted shapes yields `None` ("no value"), and the caller decides
//! how to store that. Negative numbers and exponents are never matched.
//!
//! ## Crate Policy
//!
//! - Leaf of the workspace DAG: no internal dependencies.
//! - No `unwrap()` outside tests.

pub mod input;
pub mod parse;

pub use input::SmartInput;
pub use parse::{parse_smart_int, parse_smart_number, parse_smart_percent};

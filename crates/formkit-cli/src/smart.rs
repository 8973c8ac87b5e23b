//! # Smart Subcommand
//!
//! Runs one smart parser over a single input, mostly to check how a value
//! typed into a form will be read.

use clap::{Args, ValueEnum};
use formkit_smart::{parse_smart_int, parse_smart_number, parse_smart_percent};
use serde_json::{Number, Value};

/// Which parser to run.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SmartKind {
    /// Integer with floored percentages.
    Int,
    /// Decimal number with comma separators.
    Number,
    /// Percentage as a fraction.
    Percent,
}

/// Arguments for the smart subcommand.
#[derive(Args, Debug)]
pub struct SmartArgs {
    /// Parser to run.
    #[arg(value_enum)]
    pub kind: SmartKind,

    /// Text to parse.
    pub input: String,
}

/// Run the parser; no value is `null`.
pub fn run_smart(args: &SmartArgs) -> Value {
    let input = args.input.as_str();
    match args.kind {
        SmartKind::Int => parse_smart_int(input).map_or(Value::Null, Value::from),
        SmartKind::Number => float_value(parse_smart_number(input)),
        SmartKind::Percent => float_value(parse_smart_percent(input)),
    }
}

fn float_value(n: Option<f64>) -> Value {
    n.and_then(Number::from_f64).map_or(Value::Null, Value::Number)
}

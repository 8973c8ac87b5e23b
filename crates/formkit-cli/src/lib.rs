//! # formkit-cli: Command-Line Interface
//!
//! Subcommand modules for the `formkit` binary:
//!
//! - [`parse`]: run the full pipeline over a form snapshot file.
//! - [`smart`]: run one of the smart parsers over a single input.
//!
//! [`config`] loads form snapshots and parse options from JSON or YAML.

pub mod config;
pub mod parse;
pub mod smart;

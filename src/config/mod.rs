//! Configuration module for the Hypermindz tools
//!
//! Resolves endpoint configuration from explicit values and environment
//! variables, and loads optional settings from YAML files.

mod env;
mod settings;

pub use env::*;
pub use settings::*;

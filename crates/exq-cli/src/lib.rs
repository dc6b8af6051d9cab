//! Command-line host for the existential access rewrite.

pub mod args;
pub mod driver;
pub mod tracing_config;

pub use args::CliArgs;

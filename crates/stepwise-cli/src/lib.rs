//! Stepwise command line front end
//!
//! Argument parsing and configuration loading for the `stepwise` binary.

pub mod args;
pub mod config;

pub use args::Args;
pub use config::load_config;

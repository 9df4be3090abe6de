//! Reference rewriting

pub mod references;

pub use references::{fallback_locals, threaded_variables, ReferenceRewriter};

//! Flow analysis
//!
//! Range-scoped liveness queries over the procedure body and the per-step
//! inflow/outflow sets derived from them.

pub mod flow;
pub mod liveness;

pub use flow::FlowAnalyzer;
pub use liveness::{LivenessOracle, StructuralLiveness};

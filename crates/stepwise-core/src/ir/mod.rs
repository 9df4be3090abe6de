//! Pipeline IR
//!
//! The result of synthesizing a procedure: ordered steps, each with its
//! operation range, flow sets, input/output interfaces and rewritten
//! operations. A pipeline is built in one pass and never mutated afterwards.

pub mod flow;
pub mod interface;
pub mod pipeline;

pub use flow::{FlowSet, OperationRange, RegionFlow};
pub use interface::{Field, FieldKind, FieldSource, Interface, OutputBinding};
pub use pipeline::{Pipeline, Step};

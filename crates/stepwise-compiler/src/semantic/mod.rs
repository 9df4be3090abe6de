//! Structural validation and step partitioning

pub mod partitioner;

pub use partitioner::{Partition, StepPartitioner};

//! Per-step flow sets

use super::liveness::LivenessOracle;
use crate::semantic::Partition;
use stepwise_core::ir::{FlowSet, OperationRange};
use stepwise_core::Procedure;
use tracing::debug;

/// Computes inflow and outflow for every step of a partitioned procedure
pub struct FlowAnalyzer<'a> {
    oracle: &'a dyn LivenessOracle,
}

impl<'a> FlowAnalyzer<'a> {
    pub fn new(oracle: &'a dyn LivenessOracle) -> Self {
        Self { oracle }
    }

    /// One flow set per partition, in order.
    ///
    /// The inflow of a step is the live-in set of its own range; its outflow
    /// is the live-in set of everything from the next step to the end of the
    /// body. The terminal step has no outflow.
    pub fn analyze(&self, procedure: &Procedure, partitions: &[Partition]) -> Vec<FlowSet> {
        let last = partitions.last().map(|partition| partition.range.end);

        partitions
            .iter()
            .enumerate()
            .map(|(index, partition)| {
                let region = self.oracle.analyze_region(procedure, partition.range);
                let outflow = match (partitions.get(index + 1), last) {
                    (Some(next), Some(last)) => Some(
                        self.oracle
                            .analyze_region(procedure, OperationRange::new(next.range.start, last))
                            .flows_in,
                    ),
                    _ => None,
                };

                debug!(
                    step = %partition.name,
                    range = %partition.range,
                    inflow = region.flows_in.len(),
                    outflow = outflow.as_ref().map(|set| set.len()),
                    "analyzed step flow"
                );

                FlowSet { region, outflow }
            })
            .collect()
    }
}

//! Flow sets
//!
//! Liveness facts about a contiguous range of top-level operations.

use crate::ast::VarId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Inclusive range of top-level operation indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationRange {
    pub start: usize,
    pub end: usize,
}

impl OperationRange {
    /// Create a range; `end` is inclusive
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "empty operation range");
        Self { start, end }
    }

    /// Number of operations covered
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Ranges are never empty
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }

    /// Iterate covered indices
    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

impl fmt::Display for OperationRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..={}]", self.start, self.end)
    }
}

/// What a region of operations does with each variable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionFlow {
    /// Variables read anywhere in the region
    pub read_inside: BTreeSet<VarId>,

    /// Variables written anywhere in the region (declarations with an
    /// initializer count as writes)
    pub written_inside: BTreeSet<VarId>,

    /// Locals whose declaration lies in the region
    pub declared_inside: BTreeSet<VarId>,

    /// Variables whose value on entry to the region may be read inside it
    pub flows_in: BTreeSet<VarId>,

    /// Every variable touched by the region, in order of first appearance
    pub first_use: Vec<VarId>,
}

impl RegionFlow {
    /// Check if the region reads or writes the variable
    pub fn touches(&self, var: VarId) -> bool {
        self.read_inside.contains(&var) || self.written_inside.contains(&var)
    }

    /// Position of the variable in first-use order
    pub fn first_use_position(&self, var: VarId) -> Option<usize> {
        self.first_use.iter().position(|candidate| *candidate == var)
    }
}

/// Flow facts of one step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSet {
    /// Facts over the step's own range
    pub region: RegionFlow,

    /// Variables live on entry to the rest of the procedure; `None` for the
    /// terminal step
    pub outflow: Option<BTreeSet<VarId>>,
}

impl FlowSet {
    /// Variables the step needs from earlier steps
    pub fn inflow(&self) -> &BTreeSet<VarId> {
        &self.region.flows_in
    }

    /// Check if a variable must survive past the step
    pub fn flows_out(&self, var: VarId) -> bool {
        self.outflow
            .as_ref()
            .is_some_and(|outflow| outflow.contains(&var))
    }

    pub fn is_terminal(&self) -> bool {
        self.outflow.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::VariableArena;

    #[test]
    fn test_range_is_inclusive() {
        let range = OperationRange::new(2, 4);
        assert_eq!(range.len(), 3);
        assert!(range.contains(2));
        assert!(range.contains(4));
        assert!(!range.contains(5));
        assert_eq!(range.to_string(), "[2..=4]");
    }

    #[test]
    fn test_flow_set_terminal() {
        let mut arena = VariableArena::new();
        let id = arena.declare_local("id", "i32");

        let terminal = FlowSet::default();
        assert!(terminal.is_terminal());
        assert!(!terminal.flows_out(id));

        let inner = FlowSet {
            region: RegionFlow::default(),
            outflow: Some(BTreeSet::from([id])),
        };
        assert!(!inner.is_terminal());
        assert!(inner.flows_out(id));
    }
}

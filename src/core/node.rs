//! Immutable state nodes of a validated chart.

use std::collections::HashMap;

use crate::core::transition::TransitionId;
use crate::machine::scope::ActionFn;

/// Index of a state node inside its owning [`Chart`](crate::core::chart::Chart).
///
/// Nodes reference each other (parent, children, transition targets) through
/// these indices, so the chart is the single owner of the whole tree and no
/// reference cycles exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct StateId(pub(crate) u32);

impl StateId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Structural classification of a node.
///
/// The kind is derived, not declared: a node without children is atomic no
/// matter how it was flagged, otherwise the parallel flag picks between
/// orthogonal regions and a single active child.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StateKind {
    Atomic,
    Compound,
    Parallel,
}

/// One state of the machine, fixed in shape after construction.
pub(crate) struct StateNode {
    pub(crate) name: String,
    pub(crate) parent: Option<StateId>,
    pub(crate) is_parallel: bool,
    /// Children in declaration order. The order is observable: it drives
    /// entry order of parallel regions and its reverse drives exit order.
    pub(crate) children: Vec<StateId>,
    pub(crate) initial: Option<StateId>,
    pub(crate) entry_actions: Vec<ActionFn>,
    pub(crate) exit_actions: Vec<ActionFn>,
    /// Outgoing transitions indexed by triggering event, declaration order
    /// preserved within each event.
    pub(crate) transitions: HashMap<String, Vec<TransitionId>>,
}

impl StateNode {
    pub(crate) fn kind(&self) -> StateKind {
        if self.children.is_empty() {
            StateKind::Atomic
        } else if self.is_parallel {
            StateKind::Parallel
        } else {
            StateKind::Compound
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(name: &str) -> StateNode {
        StateNode {
            name: name.to_string(),
            parent: None,
            is_parallel: false,
            children: Vec::new(),
            initial: None,
            entry_actions: Vec::new(),
            exit_actions: Vec::new(),
            transitions: HashMap::new(),
        }
    }

    #[test]
    fn childless_node_is_atomic() {
        let node = bare("leaf");
        assert_eq!(node.kind(), StateKind::Atomic);
    }

    #[test]
    fn parallel_flag_without_children_is_still_atomic() {
        let mut node = bare("leaf");
        node.is_parallel = true;
        assert_eq!(node.kind(), StateKind::Atomic);
    }

    #[test]
    fn children_select_compound_or_parallel() {
        let mut node = bare("parent");
        node.children.push(StateId(1));
        assert_eq!(node.kind(), StateKind::Compound);
        node.is_parallel = true;
        assert_eq!(node.kind(), StateKind::Parallel);
    }
}

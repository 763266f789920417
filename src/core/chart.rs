//! The chart: single owner of every node and transition of a machine.

use std::collections::HashMap;

use crate::core::node::{StateId, StateNode};
use crate::core::transition::{Transition, TransitionId};

/// The validated state tree.
///
/// All nodes and transitions live in flat arenas and point at each other by
/// index, which resolves the tree's inherent cycles (children know their
/// parent, transitions target arbitrary nodes) without reference counting.
/// The synthetic root always occupies slot zero.
pub(crate) struct Chart {
    pub(crate) nodes: Vec<StateNode>,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) index: HashMap<String, StateId>,
}

impl Chart {
    pub(crate) const ROOT: StateId = StateId(0);

    pub(crate) fn node(&self, id: StateId) -> &StateNode {
        &self.nodes[id.index()]
    }

    pub(crate) fn transition(&self, id: TransitionId) -> &Transition {
        &self.transitions[id.index()]
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<StateId> {
        self.index.get(name).copied()
    }

    /// True when `check` is `against` or lies anywhere below it.
    pub(crate) fn is_descendant(&self, check: StateId, against: StateId) -> bool {
        let mut cur = Some(check);
        while let Some(id) = cur {
            if id == against {
                return true;
            }
            cur = self.node(id).parent;
        }
        false
    }

    /// Least common ancestor of `source` and `target`, searched from the
    /// source's parent upward so the result is always a proper ancestor of
    /// the source. Falls back to the root when nothing closer is shared.
    pub(crate) fn lca(&self, source: StateId, target: StateId) -> StateId {
        let mut cur = self.node(source).parent;
        while let Some(candidate) = cur {
            if self.is_descendant(target, candidate) {
                return candidate;
            }
            cur = self.node(candidate).parent;
        }
        Self::ROOT
    }
}

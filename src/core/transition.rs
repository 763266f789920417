//! Transition records owned by the chart.

use crate::core::node::StateId;
use crate::machine::scope::{ActionFn, ConditionFn, MachineView};

/// Index of a transition inside its owning chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct TransitionId(pub(crate) u32);

impl TransitionId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// An outgoing edge of a state.
///
/// A transition without a target never changes the configuration; it only
/// runs its action when its event matches. A transition without a condition
/// is always enabled.
pub(crate) struct Transition {
    pub(crate) source: StateId,
    pub(crate) target: Option<StateId>,
    pub(crate) event: String,
    pub(crate) condition: Option<ConditionFn>,
    pub(crate) action: Option<ActionFn>,
}

impl Transition {
    /// Evaluate the condition against a read-only view of the machine.
    pub(crate) fn test(&self, view: &MachineView<'_>) -> bool {
        match &self.condition {
            Some(condition) => condition(view),
            None => true,
        }
    }
}

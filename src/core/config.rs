//! Runtime configuration: which states are currently active.

use crate::core::chart::Chart;
use crate::core::node::StateId;

/// The set of active states, stored as one active-child slot per node plus
/// the machine-wide active flag.
///
/// Activity is derived rather than stored per state: the root is active when
/// the machine is, a child of a parallel node is active whenever its parent
/// is, and any other node is active when its parent's slot points at it.
/// Keeping slots instead of a set makes the closure invariant structural:
/// a non-parallel compound can never have two active children.
pub(crate) struct Configuration {
    active_child: Vec<Option<StateId>>,
    machine_active: bool,
}

impl Configuration {
    pub(crate) fn new(node_count: usize) -> Self {
        Self {
            active_child: vec![None; node_count],
            machine_active: false,
        }
    }

    pub(crate) fn machine_active(&self) -> bool {
        self.machine_active
    }

    pub(crate) fn set_machine_active(&mut self, active: bool) {
        self.machine_active = active;
    }

    pub(crate) fn active_child(&self, id: StateId) -> Option<StateId> {
        self.active_child[id.index()]
    }

    pub(crate) fn set_active_child(&mut self, id: StateId, child: Option<StateId>) {
        self.active_child[id.index()] = child;
    }

    pub(crate) fn is_active(&self, chart: &Chart, id: StateId) -> bool {
        match chart.node(id).parent {
            None => self.machine_active,
            Some(parent) => {
                if chart.node(parent).is_parallel {
                    self.is_active(chart, parent)
                } else {
                    self.active_child[parent.index()] == Some(id)
                }
            }
        }
    }

    /// Resolve a name and report whether that state is active. Unknown names
    /// are simply inactive.
    pub(crate) fn in_state(&self, chart: &Chart, name: &str) -> bool {
        chart
            .lookup(name)
            .is_some_and(|id| self.is_active(chart, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::machine::build_chart;
    use crate::builder::StateBuilder;

    fn chart() -> Chart {
        let root = StateBuilder::new("root")
            .state(
                StateBuilder::new("work")
                    .initial()
                    .parallel()
                    .state(StateBuilder::new("net"))
                    .state(StateBuilder::new("disk")),
            )
            .state(StateBuilder::new("done"));
        build_chart(root).expect("tree is well formed")
    }

    fn id(chart: &Chart, name: &str) -> StateId {
        chart.lookup(name).expect("state exists")
    }

    #[test]
    fn everything_inactive_before_entering() {
        let chart = chart();
        let config = Configuration::new(chart.nodes.len());
        assert!(!config.in_state(&chart, "root"));
        assert!(!config.in_state(&chart, "work"));
        assert!(!config.in_state(&chart, "net"));
    }

    #[test]
    fn slot_activates_a_compound_child() {
        let chart = chart();
        let mut config = Configuration::new(chart.nodes.len());
        config.set_machine_active(true);
        config.set_active_child(Chart::ROOT, Some(id(&chart, "work")));
        assert!(config.in_state(&chart, "root"));
        assert!(config.in_state(&chart, "work"));
        assert!(!config.in_state(&chart, "done"));
    }

    #[test]
    fn parallel_children_follow_their_parent() {
        let chart = chart();
        let mut config = Configuration::new(chart.nodes.len());
        config.set_machine_active(true);
        config.set_active_child(Chart::ROOT, Some(id(&chart, "work")));
        assert!(config.in_state(&chart, "net"));
        assert!(config.in_state(&chart, "disk"));

        config.set_active_child(Chart::ROOT, Some(id(&chart, "done")));
        assert!(!config.in_state(&chart, "net"));
        assert!(!config.in_state(&chart, "disk"));
    }

    #[test]
    fn unknown_names_are_inactive() {
        let chart = chart();
        let mut config = Configuration::new(chart.nodes.len());
        config.set_machine_active(true);
        assert!(!config.in_state(&chart, "no-such-state"));
    }
}

//! The interpreter: entering and leaving the machine, and the per-event
//! microstep (select, resolve conflicts, exit, act, enter).

use tracing::{debug, trace};

use crate::builder::StateMachineBuilder;
use crate::core::chart::Chart;
use crate::core::config::Configuration;
use crate::core::node::{StateId, StateKind};
use crate::core::transition::TransitionId;
use crate::machine::queue::EventQueue;
use crate::machine::scope::{ActionScope, MachineView};

/// A hierarchical state machine.
///
/// Built once from a declaration, immutable in shape afterwards. The machine
/// starts inactive: [`enter`](StateMachine::enter) establishes the initial
/// configuration, [`push_event`](StateMachine::push_event) drives it, and
/// [`leave`](StateMachine::leave) tears it down.
///
/// Event processing is synchronous and single-threaded; every callback runs
/// on the caller's thread before the triggering call returns. Callback
/// panics are not caught and propagate to the caller, leaving the
/// configuration wherever the microstep had advanced it.
///
/// # Example
///
/// ```
/// use statechart::{StateBuilder, StateMachine, TransitionBuilder};
///
/// let mut machine = StateMachine::builder()
///     .state(
///         StateBuilder::new("stopped")
///             .initial()
///             .transition(TransitionBuilder::new().on_event("play").target("playing")),
///     )
///     .state(
///         StateBuilder::new("playing")
///             .transition(TransitionBuilder::new().on_event("stop").target("stopped")),
///     )
///     .build()
///     .unwrap();
///
/// machine.enter();
/// assert!(machine.in_state("stopped"));
/// machine.push_event("play");
/// assert!(machine.in_state("playing"));
/// ```
pub struct StateMachine {
    chart: Chart,
    config: Configuration,
    queue: EventQueue,
}

impl StateMachine {
    /// Start declaring a machine.
    pub fn builder() -> StateMachineBuilder {
        StateMachineBuilder::new()
    }

    pub(crate) fn from_chart(chart: Chart) -> Self {
        let config = Configuration::new(chart.nodes.len());
        Self {
            chart,
            config,
            queue: EventQueue::new(),
        }
    }

    /// Activate the machine and establish the initial configuration, running
    /// entry actions outermost first. No-op when already active.
    ///
    /// Events enqueued by entry actions are processed before this returns.
    pub fn enter(&mut self) {
        if self.config.machine_active() {
            return;
        }
        debug!("entering state machine");
        self.config.set_machine_active(true);

        let mut stack = vec![Chart::ROOT];
        while let Some(id) = stack.pop() {
            enter_state(&self.chart, &mut self.config, &mut self.queue, id);
            let node = self.chart.node(id);
            match node.kind() {
                StateKind::Parallel => {
                    for &child in node.children.iter().rev() {
                        stack.push(child);
                    }
                }
                StateKind::Compound => {
                    if let Some(initial) = node.initial {
                        stack.push(initial);
                    }
                }
                StateKind::Atomic => {}
            }
        }

        self.drain();
    }

    /// Deactivate the machine, running exit actions on every active state,
    /// leaves first and root last. No-op when already inactive.
    pub fn leave(&mut self) {
        if !self.config.machine_active() {
            return;
        }
        debug!("leaving state machine");

        let mut active = Vec::new();
        collect_active(&self.chart, &self.config, Chart::ROOT, &mut active);
        for &id in active.iter().rev() {
            leave_state(&self.chart, &mut self.config, &mut self.queue, id);
        }

        self.config.set_machine_active(false);
        self.drain();
    }

    /// Enqueue an event by name and process the queue to quiescence.
    ///
    /// Events pushed while a callback is running are appended and handled by
    /// the loop already draining; events pushed while the machine is
    /// inactive are consumed without effect.
    pub fn push_event(&mut self, event: impl Into<String>) {
        self.queue.push(event.into());
        self.drain();
    }

    /// True when the named state is currently active. The synthetic root
    /// answers for the machine itself.
    pub fn in_state(&self, name: &str) -> bool {
        self.config.in_state(&self.chart, name)
    }

    /// True when the machine has been entered and not yet left.
    pub fn is_active(&self) -> bool {
        self.config.machine_active()
    }

    fn drain(&mut self) {
        while let Some(event) = self.queue.pop() {
            trace!("processing event {event}");
            self.microstep(&event);
        }
    }

    fn microstep(&mut self, event: &str) {
        let candidates = self.select_transitions(event);
        let accepted = self.remove_conflicts(candidates);
        self.exit_states(&accepted);
        self.run_transition_actions(&accepted);
        self.enter_states(&accepted);
    }

    /// Walk every active atomic state and ascend from each until some level
    /// offers a transition on `event` whose condition passes. All passing
    /// transitions at that first level are selected; levels above it are
    /// suppressed for this atomic.
    fn select_transitions(&self, event: &str) -> Vec<TransitionId> {
        let mut atomics = Vec::new();
        if self.config.machine_active() {
            collect_active_atomics(&self.chart, &self.config, Chart::ROOT, &mut atomics);
        }

        let mut candidates = Vec::new();
        for atomic in atomics {
            let mut cur = Some(atomic);
            while let Some(id) = cur {
                let node = self.chart.node(id);
                let mut matched = false;
                if let Some(tids) = node.transitions.get(event) {
                    for &tid in tids {
                        let view = MachineView::new(&self.chart, &self.config);
                        if self.chart.transition(tid).test(&view) {
                            candidates.push(tid);
                            matched = true;
                        }
                    }
                }
                if matched {
                    break;
                }
                cur = node.parent;
            }
        }
        candidates
    }

    /// Keep a conflict-free subset of the candidates, in discovery order.
    /// Two transitions conflict when their exit sets share a state; the
    /// earlier one stands unless the newcomer targets a descendant of its
    /// target, in which case the newcomer displaces it. Targetless
    /// transitions have empty exit sets and never conflict.
    fn remove_conflicts(&self, candidates: Vec<TransitionId>) -> Vec<TransitionId> {
        let mut accepted: Vec<TransitionId> = Vec::new();
        for tid in candidates {
            let Some(target) = self.chart.transition(tid).target else {
                accepted.push(tid);
                continue;
            };
            let exits = self.exit_set(tid);

            let mut preempted = false;
            let mut displaced = Vec::new();
            for &aid in &accepted {
                let Some(accepted_target) = self.chart.transition(aid).target else {
                    continue;
                };
                let accepted_exits = self.exit_set(aid);
                if exits.iter().all(|state| !accepted_exits.contains(state)) {
                    continue;
                }
                if self.chart.is_descendant(target, accepted_target) {
                    displaced.push(aid);
                } else {
                    preempted = true;
                    break;
                }
            }

            if !preempted {
                accepted.retain(|aid| !displaced.contains(aid));
                accepted.push(tid);
            }
        }
        accepted
    }

    /// Active states a transition will exit: every active descendant of its
    /// domain, in depth-first entry order. The domain itself stays active.
    fn exit_set(&self, tid: TransitionId) -> Vec<StateId> {
        let transition = self.chart.transition(tid);
        let Some(target) = transition.target else {
            return Vec::new();
        };
        let domain = self.chart.lca(transition.source, target);
        let mut out = Vec::new();
        if self.config.is_active(&self.chart, domain) {
            collect_active_below(&self.chart, &self.config, domain, &mut out);
        }
        out
    }

    fn exit_states(&mut self, accepted: &[TransitionId]) {
        let mut to_exit = Vec::new();
        for &tid in accepted {
            let mut set = self.exit_set(tid);
            set.reverse();
            to_exit.extend(set);
        }
        for id in to_exit {
            leave_state(&self.chart, &mut self.config, &mut self.queue, id);
        }
    }

    fn run_transition_actions(&mut self, accepted: &[TransitionId]) {
        for &tid in accepted {
            if let Some(action) = &self.chart.transition(tid).action {
                let mut scope = ActionScope::new(&self.chart, &self.config, &mut self.queue);
                action(&mut scope);
            }
        }
    }

    fn enter_states(&mut self, accepted: &[TransitionId]) {
        let mut to_enter = Vec::new();
        for &tid in accepted {
            let Some(target) = self.chart.transition(tid).target else {
                continue;
            };
            to_enter.extend(self.entry_list(target));
        }
        for id in to_enter {
            enter_state(&self.chart, &mut self.config, &mut self.queue, id);
        }
    }

    /// States to enter to activate `target`: its inactive ancestors topmost
    /// first, the target, then the default descent below it. Every region of
    /// a parallel ancestor on the way down is included in declaration order,
    /// each recursing into its own defaults.
    fn entry_list(&self, target: StateId) -> Vec<StateId> {
        let mut chain = vec![target];
        let mut cur = self.chart.node(target).parent;
        while let Some(ancestor) = cur {
            if self.config.is_active(&self.chart, ancestor) {
                break;
            }
            chain.push(ancestor);
            cur = self.chart.node(ancestor).parent;
        }
        chain.reverse();

        let mut out = Vec::new();
        self.add_entry(chain[0], &chain, 0, &mut out);
        out
    }

    fn add_entry(&self, id: StateId, chain: &[StateId], pos: usize, out: &mut Vec<StateId>) {
        out.push(id);
        let node = self.chart.node(id);
        let path_next = chain.get(pos + 1).copied();
        match node.kind() {
            StateKind::Parallel => {
                for &child in &node.children {
                    if Some(child) == path_next {
                        self.add_entry(child, chain, pos + 1, out);
                    } else {
                        self.add_default(child, out);
                    }
                }
            }
            StateKind::Compound => {
                if let Some(next) = path_next {
                    self.add_entry(next, chain, pos + 1, out);
                } else if let Some(initial) = node.initial {
                    self.add_default(initial, out);
                }
            }
            StateKind::Atomic => {}
        }
    }

    fn add_default(&self, id: StateId, out: &mut Vec<StateId>) {
        out.push(id);
        let node = self.chart.node(id);
        match node.kind() {
            StateKind::Parallel => {
                for &child in &node.children {
                    self.add_default(child, out);
                }
            }
            StateKind::Compound => {
                if let Some(initial) = node.initial {
                    self.add_default(initial, out);
                }
            }
            StateKind::Atomic => {}
        }
    }
}

/// Activate one state: point its slot at its initial child, point the
/// parent's slot at it, then run its entry actions in declaration order.
fn enter_state(chart: &Chart, config: &mut Configuration, queue: &mut EventQueue, id: StateId) {
    let node = chart.node(id);
    trace!("entering state {}", node.name);
    if !node.is_parallel {
        if let Some(initial) = node.initial {
            config.set_active_child(id, Some(initial));
        }
    }
    if let Some(parent) = node.parent {
        if !chart.node(parent).is_parallel {
            config.set_active_child(parent, Some(id));
        }
    }
    for action in &node.entry_actions {
        let mut scope = ActionScope::new(chart, config, queue);
        action(&mut scope);
    }
}

/// Deactivate one state: clear the parent's slot, then run its exit actions
/// in declaration order. A callback querying this state mid-exit already
/// sees it inactive.
fn leave_state(chart: &Chart, config: &mut Configuration, queue: &mut EventQueue, id: StateId) {
    let node = chart.node(id);
    trace!("leaving state {}", node.name);
    if let Some(parent) = node.parent {
        if !chart.node(parent).is_parallel {
            config.set_active_child(parent, None);
        }
    }
    for action in &node.exit_actions {
        let mut scope = ActionScope::new(chart, config, queue);
        action(&mut scope);
    }
}

/// Depth-first pre-order over the active configuration, `id` included.
fn collect_active(chart: &Chart, config: &Configuration, id: StateId, out: &mut Vec<StateId>) {
    out.push(id);
    collect_active_below(chart, config, id, out);
}

/// Depth-first pre-order over the active descendants of `id`, exclusive.
fn collect_active_below(
    chart: &Chart,
    config: &Configuration,
    id: StateId,
    out: &mut Vec<StateId>,
) {
    let node = chart.node(id);
    match node.kind() {
        StateKind::Parallel => {
            for &child in &node.children {
                collect_active(chart, config, child, out);
            }
        }
        StateKind::Compound => {
            if let Some(child) = config.active_child(id) {
                collect_active(chart, config, child, out);
            }
        }
        StateKind::Atomic => {}
    }
}

/// Active atomic states in depth-first pre-order.
fn collect_active_atomics(
    chart: &Chart,
    config: &Configuration,
    id: StateId,
    out: &mut Vec<StateId>,
) {
    let node = chart.node(id);
    match node.kind() {
        StateKind::Atomic => out.push(id),
        StateKind::Parallel => {
            for &child in &node.children {
                collect_active_atomics(chart, config, child, out);
            }
        }
        StateKind::Compound => {
            if let Some(child) = config.active_child(id) {
                collect_active_atomics(chart, config, child, out);
            }
        }
    }
}

//! Top-level builder and the two-pass validator.

use std::collections::{HashMap, VecDeque};
use std::mem;

use tracing::debug;

use crate::builder::error::BuildError;
use crate::builder::state::StateBuilder;
use crate::builder::transition::TransitionBuilder;
use crate::core::chart::Chart;
use crate::core::node::{StateId, StateNode};
use crate::core::transition::{Transition, TransitionId};
use crate::machine::scope::IntoAction;
use crate::machine::StateMachine;

/// Declares a whole machine and validates it into a [`StateMachine`].
///
/// The top level is itself a state: a synthetic root named `"root"` that
/// wraps everything declared here. Flags, hooks, and transitions given on
/// the builder attach to that root, and `in_state("root")` reports whether
/// the machine is active.
///
/// # Example
///
/// ```
/// use statechart::{StateBuilder, StateMachine};
///
/// let mut machine = StateMachine::builder()
///     .parallel()
///     .state(StateBuilder::new("net"))
///     .state(StateBuilder::new("disk"))
///     .build()
///     .unwrap();
///
/// machine.enter();
/// assert!(machine.in_state("net") && machine.in_state("disk"));
/// ```
pub struct StateMachineBuilder {
    root: StateBuilder,
}

impl StateMachineBuilder {
    pub fn new() -> Self {
        Self {
            root: StateBuilder::new("root"),
        }
    }

    /// Make the top-level states orthogonal regions.
    pub fn parallel(mut self) -> Self {
        self.root = self.root.parallel();
        self
    }

    /// Accepted for symmetry with nested states; the root has no siblings,
    /// so the flag has no effect.
    pub fn initial(mut self) -> Self {
        self.root = self.root.initial();
        self
    }

    /// Add a top-level state.
    pub fn state(mut self, child: StateBuilder) -> Self {
        self.root = self.root.state(child);
        self
    }

    /// Add an entry hook on the root, run when the machine is entered.
    pub fn on_entry<M>(mut self, action: impl IntoAction<M>) -> Self {
        self.root = self.root.on_entry(action);
        self
    }

    /// Add an exit hook on the root, run when the machine is left.
    pub fn on_exit<M>(mut self, action: impl IntoAction<M>) -> Self {
        self.root = self.root.on_exit(action);
        self
    }

    /// Shorthand for a root-level targetless transition.
    pub fn on_event<M>(mut self, event: impl Into<String>, action: impl IntoAction<M>) -> Self {
        self.root = self.root.on_event(event, action);
        self
    }

    /// Add a root-level transition.
    pub fn transition(mut self, transition: TransitionBuilder) -> Self {
        self.root = self.root.transition(transition);
        self
    }

    /// Validate the declaration and produce an inactive machine.
    pub fn build(self) -> Result<StateMachine, BuildError> {
        let chart = build_chart(self.root)?;
        debug!("built machine with {} states", chart.nodes.len());
        Ok(StateMachine::from_chart(chart))
    }
}

impl Default for StateMachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a declaration tree and assemble the chart.
///
/// Duplicate transition parts surface first (they were recorded when the
/// offending setter ran), then a breadth-first pass registers every name,
/// then a second breadth-first pass builds each node: initial children are
/// checked, transition targets resolved, hooks and transitions installed.
pub(crate) fn build_chart(mut root: StateBuilder) -> Result<Chart, BuildError> {
    check_fragments(&mut root)?;

    // Pass 1: breadth-first name registration.
    let mut flats: Vec<(Option<StateId>, StateBuilder)> = Vec::new();
    let mut index: HashMap<String, StateId> = HashMap::new();
    let mut pending: VecDeque<(Option<StateId>, StateBuilder)> = VecDeque::new();
    pending.push_back((None, root));
    while let Some((parent, mut decl)) = pending.pop_front() {
        let id = StateId(flats.len() as u32);
        if index.insert(decl.name.clone(), id).is_some() {
            return Err(BuildError::DuplicateStateIdentifier(decl.name));
        }
        let children = mem::take(&mut decl.children);
        flats.push((parent, decl));
        for child in children {
            pending.push_back((Some(id), child));
        }
    }

    // Siblings keep declaration order; breadth-first ids put every child
    // after its parent, so pass 2 can read child flags before consuming.
    let mut children_of: Vec<Vec<StateId>> = vec![Vec::new(); flats.len()];
    for (i, (parent, _)) in flats.iter().enumerate() {
        if let Some(parent) = parent {
            children_of[parent.index()].push(StateId(i as u32));
        }
    }

    // Pass 2: build every node.
    let mut nodes: Vec<StateNode> = Vec::with_capacity(flats.len());
    let mut transitions: Vec<Transition> = Vec::new();
    for i in 0..flats.len() {
        let id = StateId(i as u32);
        let name = flats[i].1.name.clone();

        let mut initial = None;
        for &child in &children_of[i] {
            if flats[child.index()].1.is_initial {
                if initial.is_some() {
                    return Err(BuildError::AlreadyHasInitial(name));
                }
                initial = Some(child);
            }
        }
        if !flats[i].1.is_parallel && !children_of[i].is_empty() && initial.is_none() {
            return Err(BuildError::NoInitialState(name));
        }

        let (parent, decl) = &mut flats[i];
        let mut by_event: HashMap<String, Vec<TransitionId>> = HashMap::new();
        for declared in mem::take(&mut decl.transitions) {
            let target = match declared.target {
                Some(target_name) => Some(
                    index
                        .get(&target_name)
                        .copied()
                        .ok_or(BuildError::NoSuchState(target_name))?,
                ),
                None => None,
            };
            let event = declared.event.unwrap_or_default();
            let tid = TransitionId(transitions.len() as u32);
            transitions.push(Transition {
                source: id,
                target,
                event: event.clone(),
                condition: declared.condition,
                action: declared.action,
            });
            by_event.entry(event).or_default().push(tid);
        }

        nodes.push(StateNode {
            name,
            parent: *parent,
            is_parallel: decl.is_parallel,
            children: children_of[i].clone(),
            initial,
            entry_actions: mem::take(&mut decl.entry_actions),
            exit_actions: mem::take(&mut decl.exit_actions),
            transitions: by_event,
        });
    }

    Ok(Chart {
        nodes,
        transitions,
        index,
    })
}

fn check_fragments(decl: &mut StateBuilder) -> Result<(), BuildError> {
    for transition in &mut decl.transitions {
        if let Some(error) = transition.error.take() {
            return Err(error);
        }
    }
    for child in &mut decl.children {
        check_fragments(child)?;
    }
    Ok(())
}

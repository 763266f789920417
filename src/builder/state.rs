//! Fluent declaration of a single state.

use crate::builder::transition::TransitionBuilder;
use crate::machine::scope::{ActionFn, IntoAction};

/// Declares one state: its flags, children, hooks, and transitions.
///
/// Declaration order of children and transitions is meaningful. Siblings are
/// entered in the order they were declared (and exited in reverse), and
/// transitions on the same event are tried in the order they were declared.
///
/// # Example
///
/// ```
/// use statechart::{StateBuilder, TransitionBuilder};
///
/// let playing = StateBuilder::new("playing")
///     .on_entry(|| println!("resume the stream"))
///     .transition(TransitionBuilder::new().on_event("pause").target("paused"))
///     .transition(TransitionBuilder::new().on_event("stop").target("stopped"));
/// ```
pub struct StateBuilder {
    pub(crate) name: String,
    pub(crate) is_initial: bool,
    pub(crate) is_parallel: bool,
    pub(crate) children: Vec<StateBuilder>,
    pub(crate) transitions: Vec<TransitionBuilder>,
    pub(crate) entry_actions: Vec<ActionFn>,
    pub(crate) exit_actions: Vec<ActionFn>,
}

impl StateBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_initial: false,
            is_parallel: false,
            children: Vec::new(),
            transitions: Vec::new(),
            entry_actions: Vec::new(),
            exit_actions: Vec::new(),
        }
    }

    /// Mark this state as the one its parent activates by default. Exactly
    /// one sibling under a non-parallel parent must carry this flag.
    pub fn initial(mut self) -> Self {
        self.is_initial = true;
        self
    }

    /// Make this state's children orthogonal regions, all active together.
    pub fn parallel(mut self) -> Self {
        self.is_parallel = true;
        self
    }

    /// Add a child state.
    pub fn state(mut self, child: StateBuilder) -> Self {
        self.children.push(child);
        self
    }

    /// Add an entry hook. Hooks run in declaration order when the state is
    /// entered.
    pub fn on_entry<M>(mut self, action: impl IntoAction<M>) -> Self {
        self.entry_actions.push(action.into_action());
        self
    }

    /// Add an exit hook. Hooks run in declaration order when the state is
    /// exited.
    pub fn on_exit<M>(mut self, action: impl IntoAction<M>) -> Self {
        self.exit_actions.push(action.into_action());
        self
    }

    /// Shorthand for a targetless transition: run `action` whenever `event`
    /// arrives while this state is active, without changing configuration.
    pub fn on_event<M>(self, event: impl Into<String>, action: impl IntoAction<M>) -> Self {
        self.transition(TransitionBuilder::new().on_event(event).action(action))
    }

    /// Add an outgoing transition.
    pub fn transition(mut self, transition: TransitionBuilder) -> Self {
        self.transitions.push(transition);
        self
    }
}

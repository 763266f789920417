//! The running machine: interpreter, event queue, and callback views.

pub(crate) mod interpreter;
pub(crate) mod queue;
pub(crate) mod scope;

pub use interpreter::StateMachine;
pub use scope::{ActionScope, IntoAction, IntoCondition, MachineView};

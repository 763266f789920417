//! Construction errors raised while validating a declaration.

use thiserror::Error;

/// Everything that can go wrong while building a machine.
///
/// All of these surface from [`build`](crate::StateMachineBuilder::build),
/// before any state is ever entered. There are no runtime errors: callback
/// panics propagate uncaught.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Two siblings under the same non-parallel parent are both flagged
    /// initial. Carries the parent's name.
    #[error("state {0} declares two initial children; only one initial child is permitted")]
    AlreadyHasInitial(String),

    /// A non-parallel state with children has no initial child. Carries the
    /// parent's name.
    #[error("state {0} is not parallel and has no initial child; non-parallel nested states require one")]
    NoInitialState(String),

    /// Two states share a name. Carries the name.
    #[error("two states are named {0}; state names must be unique")]
    DuplicateStateIdentifier(String),

    /// A transition targets a name that resolves to no state. Carries the
    /// target name.
    #[error("a transition targets a state named {0} which does not exist")]
    NoSuchState(String),

    /// A transition declares two targets. Carries the second target.
    #[error("a transition declares two targets (second: {0}); only one is allowed")]
    TargetAlreadySpecified(String),

    /// A transition declares two actions.
    #[error("a transition declares two actions; only one is allowed")]
    ActionAlreadySpecified,

    /// A transition declares two conditions.
    #[error("a transition declares two conditions; only one is allowed")]
    ConditionAlreadySpecified,

    /// A transition declares two events.
    #[error("a transition declares two events; only one is allowed")]
    EventAlreadySpecified,
}

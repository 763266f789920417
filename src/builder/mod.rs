//! Declaration surface: fluent builders and construction-time validation.
//!
//! A machine is declared as a tree of [`StateBuilder`]s carrying flags,
//! hooks, and [`TransitionBuilder`]s, wrapped by a [`StateMachineBuilder`]
//! whose `build()` runs every structural check before the machine can ever
//! be entered.

pub mod error;
pub mod machine;
pub mod state;
pub mod transition;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use state::StateBuilder;
pub use transition::TransitionBuilder;

//! Statechart: an embeddable hierarchical state machine engine.
//!
//! A machine is declared as a tree of states with compound nesting,
//! orthogonal (parallel) regions, entry/exit hooks, and guarded transitions,
//! then validated once and driven by pushing named events. The engine keeps
//! the active configuration consistent across compound and parallel
//! boundaries and invokes callbacks in a fixed order: exit actions, then
//! transition actions, then entry actions.
//!
//! The engine owns no I/O, timers, or threads. Events are processed
//! synchronously on the caller's thread, one microstep per event; callbacks
//! may enqueue further events, which are handled once the current microstep
//! finishes.
//!
//! # Example
//!
//! ```
//! use statechart::{StateBuilder, StateMachine, TransitionBuilder};
//!
//! let mut player = StateMachine::builder()
//!     .state(
//!         StateBuilder::new("stopped")
//!             .initial()
//!             .transition(TransitionBuilder::new().on_event("play").target("playing")),
//!     )
//!     .state(
//!         StateBuilder::new("playing")
//!             .on_entry(|| println!("spinning up"))
//!             .transition(TransitionBuilder::new().on_event("stop").target("stopped")),
//!     )
//!     .build()
//!     .unwrap();
//!
//! player.enter();
//! player.push_event("play");
//! assert!(player.in_state("playing"));
//! player.leave();
//! assert!(!player.is_active());
//! ```

pub mod builder;
mod core;
pub mod machine;

pub use builder::{BuildError, StateBuilder, StateMachineBuilder, TransitionBuilder};
pub use machine::{ActionScope, IntoAction, IntoCondition, MachineView, StateMachine};

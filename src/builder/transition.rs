//! Fluent declaration of a single transition.

use crate::builder::error::BuildError;
use crate::machine::scope::{ActionFn, ConditionFn, IntoAction, IntoCondition};

/// Declares one transition of the enclosing state.
///
/// Each part may be given at most once; a repeated part is reported from
/// `build()` on the machine builder, never mid-chain, so declarations stay
/// fluent. A transition without a target runs its action in place; a
/// transition without a condition is always enabled.
///
/// # Example
///
/// ```
/// use statechart::TransitionBuilder;
///
/// let declaration = TransitionBuilder::new()
///     .on_event("play")
///     .target("playing")
///     .condition(|| true)
///     .action(|| println!("spinning up"));
/// ```
pub struct TransitionBuilder {
    pub(crate) event: Option<String>,
    pub(crate) target: Option<String>,
    pub(crate) action: Option<ActionFn>,
    pub(crate) condition: Option<ConditionFn>,
    pub(crate) error: Option<BuildError>,
}

impl TransitionBuilder {
    pub fn new() -> Self {
        Self {
            event: None,
            target: None,
            action: None,
            condition: None,
            error: None,
        }
    }

    /// Name the event that triggers this transition.
    pub fn on_event(mut self, event: impl Into<String>) -> Self {
        if self.event.is_some() {
            self.record(BuildError::EventAlreadySpecified);
        } else {
            self.event = Some(event.into());
        }
        self
    }

    /// Name the state this transition activates.
    pub fn target(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if self.target.is_some() {
            self.record(BuildError::TargetAlreadySpecified(name));
        } else {
            self.target = Some(name);
        }
        self
    }

    /// Attach a callback, run after the exit phase and before the entry
    /// phase of the microstep that takes this transition.
    pub fn action<M>(mut self, action: impl IntoAction<M>) -> Self {
        if self.action.is_some() {
            self.record(BuildError::ActionAlreadySpecified);
        } else {
            self.action = Some(action.into_action());
        }
        self
    }

    /// Attach a predicate evaluated at selection time; returning false
    /// disables the transition for that event.
    pub fn condition<M>(mut self, condition: impl IntoCondition<M>) -> Self {
        if self.condition.is_some() {
            self.record(BuildError::ConditionAlreadySpecified);
        } else {
            self.condition = Some(condition.into_condition());
        }
        self
    }

    /// Keep the first duplicate-part error; it wins over later ones the same
    /// way the first offending argument would have thrown.
    fn record(&mut self, error: BuildError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

impl Default for TransitionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_are_stored() {
        let t = TransitionBuilder::new()
            .on_event("go")
            .target("there")
            .condition(|| true)
            .action(|| {});
        assert_eq!(t.event.as_deref(), Some("go"));
        assert_eq!(t.target.as_deref(), Some("there"));
        assert!(t.condition.is_some());
        assert!(t.action.is_some());
        assert!(t.error.is_none());
    }

    #[test]
    fn second_target_is_recorded_with_its_name() {
        let t = TransitionBuilder::new().target("a").target("b");
        assert!(matches!(
            t.error,
            Some(BuildError::TargetAlreadySpecified(ref name)) if name == "b"
        ));
        // the first target stands
        assert_eq!(t.target.as_deref(), Some("a"));
    }

    #[test]
    fn second_event_action_and_condition_are_recorded() {
        let t = TransitionBuilder::new().on_event("a").on_event("b");
        assert!(matches!(t.error, Some(BuildError::EventAlreadySpecified)));

        let t = TransitionBuilder::new().action(|| {}).action(|| {});
        assert!(matches!(t.error, Some(BuildError::ActionAlreadySpecified)));

        let t = TransitionBuilder::new()
            .condition(|| true)
            .condition(|| false);
        assert!(matches!(
            t.error,
            Some(BuildError::ConditionAlreadySpecified)
        ));
    }

    #[test]
    fn first_error_wins() {
        let t = TransitionBuilder::new()
            .on_event("a")
            .on_event("b")
            .target("x")
            .target("y");
        assert!(matches!(t.error, Some(BuildError::EventAlreadySpecified)));
    }
}

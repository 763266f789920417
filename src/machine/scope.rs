//! Views of the machine handed to user callbacks.
//!
//! Entry, exit, and transition actions receive an [`ActionScope`] that can
//! enqueue events and query the configuration. Conditions receive a
//! [`MachineView`] that can only query. Neither view can reach the drain
//! loop or mutate the tree, so a callback can never re-enter event
//! processing or change the machine's shape.

use crate::core::chart::Chart;
use crate::core::config::Configuration;
use crate::machine::queue::EventQueue;

/// Boxed, normalized action callback as stored in the chart.
pub(crate) type ActionFn = Box<dyn for<'a> Fn(&mut ActionScope<'a>) + Send + Sync>;

/// Boxed, normalized condition callback as stored in the chart.
pub(crate) type ConditionFn = Box<dyn for<'a> Fn(&MachineView<'a>) -> bool + Send + Sync>;

/// Mutable view of the machine passed to action callbacks.
///
/// The view observes the configuration exactly as it stands at the microstep
/// phase the action runs in: during an exit action the exiting state is
/// already inactive, during an entry action the entered state is already
/// active.
pub struct ActionScope<'m> {
    chart: &'m Chart,
    config: &'m Configuration,
    queue: &'m mut EventQueue,
}

impl<'m> ActionScope<'m> {
    pub(crate) fn new(
        chart: &'m Chart,
        config: &'m Configuration,
        queue: &'m mut EventQueue,
    ) -> Self {
        Self {
            chart,
            config,
            queue,
        }
    }

    /// Enqueue an event. It is processed after the current microstep and any
    /// events queued before it have completed, never immediately.
    pub fn push_event(&mut self, event: impl Into<String>) {
        self.queue.push(event.into());
    }

    /// True when the named state is currently active.
    pub fn in_state(&self, name: &str) -> bool {
        self.config.in_state(self.chart, name)
    }

    /// True when the machine has been entered and not yet left.
    pub fn is_active(&self) -> bool {
        self.config.machine_active()
    }
}

/// Read-only view of the machine passed to condition callbacks.
pub struct MachineView<'m> {
    chart: &'m Chart,
    config: &'m Configuration,
}

impl<'m> MachineView<'m> {
    pub(crate) fn new(chart: &'m Chart, config: &'m Configuration) -> Self {
        Self { chart, config }
    }

    /// True when the named state is currently active.
    pub fn in_state(&self, name: &str) -> bool {
        self.config.in_state(self.chart, name)
    }

    /// True when the machine has been entered and not yet left.
    pub fn is_active(&self) -> bool {
        self.config.machine_active()
    }
}

/// Conversion of user action callbacks into the stored form.
///
/// Actions may be written as nullary closures or as closures receiving the
/// [`ActionScope`]; the marker parameter lets both shapes coexist without
/// overlapping implementations. The engine only ever sees the scoped form.
pub trait IntoAction<Marker> {
    #[doc(hidden)]
    fn into_action(self) -> ActionFn;
}

impl<F> IntoAction<fn()> for F
where
    F: Fn() + Send + Sync + 'static,
{
    fn into_action(self) -> ActionFn {
        Box::new(move |_scope| self())
    }
}

impl<F> IntoAction<fn(&mut ActionScope<'_>)> for F
where
    F: for<'a> Fn(&mut ActionScope<'a>) + Send + Sync + 'static,
{
    fn into_action(self) -> ActionFn {
        Box::new(self)
    }
}

/// Conversion of user condition callbacks into the stored form, mirroring
/// [`IntoAction`] for predicates.
pub trait IntoCondition<Marker> {
    #[doc(hidden)]
    fn into_condition(self) -> ConditionFn;
}

impl<F> IntoCondition<fn() -> bool> for F
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    fn into_condition(self) -> ConditionFn {
        Box::new(move |_view| self())
    }
}

impl<F> IntoCondition<fn(&MachineView<'_>) -> bool> for F
where
    F: for<'a> Fn(&MachineView<'a>) -> bool + Send + Sync + 'static,
{
    fn into_condition(self) -> ConditionFn {
        Box::new(self)
    }
}

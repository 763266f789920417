//! Transition semantics: selection, conditions, phase ordering, cascades.

use statechart::{ActionScope, MachineView, StateBuilder, StateMachine, TransitionBuilder};
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<String>>>;

fn record(log: &Log, entry: &str) -> impl Fn() + Send + Sync + 'static {
    let log = Arc::clone(log);
    let entry = entry.to_string();
    move || log.lock().unwrap().push(entry.clone())
}

fn taken(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[test]
fn a_transition_moves_the_configuration() {
    let mut machine = StateMachine::builder()
        .state(
            StateBuilder::new("S1")
                .initial()
                .transition(TransitionBuilder::new().on_event("event").target("S2")),
        )
        .state(StateBuilder::new("S2"))
        .build()
        .unwrap();

    machine.enter();
    assert!(machine.in_state("S1"));
    machine.push_event("event");
    assert!(!machine.in_state("S1"));
    assert!(machine.in_state("S2"));
}

#[test]
fn unknown_events_change_nothing() {
    let mut machine = StateMachine::builder()
        .state(
            StateBuilder::new("S1")
                .initial()
                .transition(TransitionBuilder::new().on_event("event").target("S2")),
        )
        .state(StateBuilder::new("S2"))
        .build()
        .unwrap();

    machine.enter();
    machine.push_event("something-else");
    assert!(machine.in_state("S1"));
}

#[test]
fn microstep_runs_exit_then_action_then_entry() {
    let log = Log::default();
    let mut machine = StateMachine::builder()
        .state(
            StateBuilder::new("S1")
                .initial()
                .on_exit(record(&log, "S1 exit"))
                .transition(
                    TransitionBuilder::new()
                        .on_event("event")
                        .target("S2")
                        .action(record(&log, "action")),
                ),
        )
        .state(StateBuilder::new("S2").on_entry(record(&log, "S2 entry")))
        .build()
        .unwrap();

    machine.enter();
    machine.push_event("event");
    assert_eq!(taken(&log), ["S1 exit", "action", "S2 entry"]);
}

#[test]
fn deepest_match_suppresses_ancestor_transitions() {
    let log = Log::default();
    let mut machine = StateMachine::builder()
        .state(
            StateBuilder::new("S1")
                .initial()
                .transition(
                    TransitionBuilder::new()
                        .on_event("event")
                        .target("S2")
                        .action(record(&log, "from S1")),
                )
                .state(StateBuilder::new("S1A").initial().transition(
                    TransitionBuilder::new()
                        .on_event("event")
                        .target("S2")
                        .action(record(&log, "from S1A")),
                )),
        )
        .state(StateBuilder::new("S2"))
        .build()
        .unwrap();

    machine.enter();
    machine.push_event("event");
    assert_eq!(taken(&log), ["from S1A"]);
    assert!(machine.in_state("S2"));
    assert!(!machine.in_state("S1"));
}

#[test]
fn ancestor_transition_fires_when_no_descendant_matches() {
    let log = Log::default();
    let mut machine = StateMachine::builder()
        .state(
            StateBuilder::new("S1")
                .initial()
                .transition(
                    TransitionBuilder::new()
                        .on_event("escape")
                        .target("S2")
                        .action(record(&log, "from S1")),
                )
                .state(StateBuilder::new("S1A").initial()),
        )
        .state(StateBuilder::new("S2"))
        .build()
        .unwrap();

    machine.enter();
    machine.push_event("escape");
    assert_eq!(taken(&log), ["from S1"]);
    assert!(machine.in_state("S2"));
}

#[test]
fn false_condition_disables_the_transition() {
    let log = Log::default();
    let mut machine = StateMachine::builder()
        .state(
            StateBuilder::new("S1")
                .initial()
                .transition(
                    TransitionBuilder::new()
                        .on_event("event")
                        .target("S2")
                        .condition(|| false)
                        .action(record(&log, "blocked")),
                ),
        )
        .state(StateBuilder::new("S2"))
        .build()
        .unwrap();

    machine.enter();
    machine.push_event("event");
    assert!(taken(&log).is_empty());
    assert!(machine.in_state("S1"));
    assert!(!machine.in_state("S2"));
}

#[test]
fn a_false_condition_lets_later_declarations_match() {
    let mut machine = StateMachine::builder()
        .state(
            StateBuilder::new("S1")
                .initial()
                .transition(
                    TransitionBuilder::new()
                        .on_event("event")
                        .target("S2")
                        .condition(|| false),
                )
                .transition(TransitionBuilder::new().on_event("event").target("S3")),
        )
        .state(StateBuilder::new("S2"))
        .state(StateBuilder::new("S3"))
        .build()
        .unwrap();

    machine.enter();
    machine.push_event("event");
    assert!(machine.in_state("S3"));
}

#[test]
fn conditions_see_the_machine() {
    let mut machine = StateMachine::builder()
        .state(
            StateBuilder::new("S1")
                .initial()
                .transition(
                    TransitionBuilder::new()
                        .on_event("event")
                        .target("S2")
                        .condition(|view: &MachineView| view.in_state("S1")),
                ),
        )
        .state(StateBuilder::new("S2"))
        .build()
        .unwrap();

    machine.enter();
    machine.push_event("event");
    assert!(machine.in_state("S2"));
}

#[test]
fn targetless_root_transition_runs_in_place() {
    let log = Log::default();
    let mut machine = StateMachine::builder()
        .on_event("event", record(&log, "handled"))
        .build()
        .unwrap();

    machine.enter();
    assert!(taken(&log).is_empty());
    machine.push_event("event");
    assert_eq!(taken(&log), ["handled"]);
    assert!(machine.in_state("root"));
}

#[test]
fn actions_observe_the_phase_they_run_in() {
    let probes = Log::default();
    let during_exit = {
        let probes = Arc::clone(&probes);
        move |scope: &mut ActionScope| {
            probes
                .lock()
                .unwrap()
                .push(format!("exit: S1={}", scope.in_state("S1")));
        }
    };
    let during_action = {
        let probes = Arc::clone(&probes);
        move |scope: &mut ActionScope| {
            probes.lock().unwrap().push(format!(
                "action: S1={} S2={}",
                scope.in_state("S1"),
                scope.in_state("S2")
            ));
        }
    };
    let during_entry = {
        let probes = Arc::clone(&probes);
        move |scope: &mut ActionScope| {
            probes
                .lock()
                .unwrap()
                .push(format!("entry: S2={}", scope.in_state("S2")));
        }
    };

    let mut machine = StateMachine::builder()
        .state(
            StateBuilder::new("S1")
                .initial()
                .on_exit(during_exit)
                .transition(
                    TransitionBuilder::new()
                        .on_event("event")
                        .target("S2")
                        .action(during_action),
                ),
        )
        .state(StateBuilder::new("S2").on_entry(during_entry))
        .build()
        .unwrap();

    machine.enter();
    machine.push_event("event");
    assert_eq!(
        taken(&probes),
        [
            "exit: S1=false",
            "action: S1=false S2=false",
            "entry: S2=true"
        ]
    );
}

#[test]
fn events_pushed_by_actions_run_after_the_current_microstep() {
    let log = Log::default();
    let chain = {
        let log = Arc::clone(&log);
        move |scope: &mut ActionScope| {
            log.lock().unwrap().push("a->b".to_string());
            scope.push_event("again");
        }
    };
    let mut machine = StateMachine::builder()
        .state(
            StateBuilder::new("a")
                .initial()
                .transition(
                    TransitionBuilder::new()
                        .on_event("go")
                        .target("b")
                        .action(chain),
                ),
        )
        .state(
            StateBuilder::new("b")
                .on_entry(record(&log, "b entered"))
                .transition(
                    TransitionBuilder::new()
                        .on_event("again")
                        .target("c")
                        .action(record(&log, "b->c")),
                ),
        )
        .state(StateBuilder::new("c").on_entry(record(&log, "c entered")))
        .build()
        .unwrap();

    machine.enter();
    machine.push_event("go");
    // The cascaded event only fires once "b" is fully entered.
    assert_eq!(taken(&log), ["a->b", "b entered", "b->c", "c entered"]);
    assert!(machine.in_state("c"));
}

#[test]
fn self_targeting_transition_exits_and_reenters() {
    let log = Log::default();
    let mut machine = StateMachine::builder()
        .state(
            StateBuilder::new("loop")
                .initial()
                .on_entry(record(&log, "enter"))
                .on_exit(record(&log, "exit"))
                .transition(TransitionBuilder::new().on_event("again").target("loop")),
        )
        .build()
        .unwrap();

    machine.enter();
    machine.push_event("again");
    assert_eq!(taken(&log), ["enter", "exit", "enter"]);
    assert!(machine.in_state("loop"));
}

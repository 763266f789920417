//! Game screen flow driven by a state machine.
//!
//! Each screen is a state with a targetless `update` transition that renders
//! its prompt, so the dispatch of the regular update tick is the machine's
//! job, not a switch in the loop. Type a screen's command on stdin to move
//! between screens.

use statechart::{StateBuilder, StateMachine, TransitionBuilder};
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn prompt(text: &'static str) -> impl Fn() + Send + Sync + 'static {
    move || println!("{text}")
}

fn main() {
    tracing_subscriber::fmt::init();

    let running = Arc::new(AtomicBool::new(true));
    let quit = {
        let running = Arc::clone(&running);
        move || running.store(false, Ordering::Relaxed)
    };

    let mut game = StateMachine::builder()
        .state(
            StateBuilder::new("splashscreen")
                .initial()
                .on_event("update", prompt("SplashScreen -> command: done"))
                .transition(TransitionBuilder::new().on_event("done").target("menu")),
        )
        .state(
            StateBuilder::new("menu")
                .on_event("update", prompt("Menu -> commands: newgame, quit"))
                .on_event("quit", quit.clone())
                .transition(TransitionBuilder::new().on_event("newgame").target("loading")),
        )
        .state(
            StateBuilder::new("loading")
                .on_event("update", prompt("Loader -> command: loaded"))
                .transition(TransitionBuilder::new().on_event("loaded").target("ingame")),
        )
        .state(
            StateBuilder::new("ingame")
                .on_event("update", prompt("Game -> command: pause"))
                .transition(TransitionBuilder::new().on_event("pause").target("paused")),
        )
        .state(
            StateBuilder::new("paused")
                .on_event("update", prompt("Pause -> commands: unpause, quit"))
                .on_event("quit", quit)
                .transition(TransitionBuilder::new().on_event("unpause").target("ingame")),
        )
        .build()
        .expect("game flow is well formed");

    game.enter();
    game.push_event("update");

    let stdin = std::io::stdin();
    while running.load(Ordering::Relaxed) {
        let mut command = String::new();
        if stdin.lock().read_line(&mut command).unwrap_or(0) == 0 {
            break;
        }
        game.push_event(command.trim());
        game.push_event("update");
    }

    game.leave();
}

//! Audio player button logic driven by a state machine.
//!
//! Three states shape the interface: `stopped` shows the play button and
//! hides stop, `playing` swaps play for pause, `paused` shows play again
//! while stop stays available. The display is set from entry hooks, so it is
//! correct no matter which transition activated the state.
//!
//! Commands on stdin: `play`, `pause`, `stop`, `quit`.

use statechart::{StateBuilder, StateMachine, TransitionBuilder};
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct PlayerInterface {
    show_play: bool,
    enable_stop: bool,
}

impl PlayerInterface {
    fn print(&self) {
        let first = if self.show_play { "[ play ]" } else { "[ pause ]" };
        let second = if self.enable_stop { "[ stop ]" } else { "" };
        println!("{first} {second}");
        println!("commands: play, pause, stop, quit");
    }

    fn show_play(&mut self) {
        self.show_play = true;
    }

    fn show_pause(&mut self) {
        self.show_play = false;
    }

    fn enable_stop(&mut self, enable: bool) {
        self.enable_stop = enable;
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let gui = Arc::new(Mutex::new(PlayerInterface::default()));
    let running = Arc::new(AtomicBool::new(true));

    let mut player = StateMachine::builder()
        .on_event("quit", {
            let running = Arc::clone(&running);
            move || running.store(false, Ordering::Relaxed)
        })
        .state(
            StateBuilder::new("stopped")
                .initial()
                .on_entry({
                    let gui = Arc::clone(&gui);
                    move || {
                        let mut gui = gui.lock().unwrap();
                        gui.show_play();
                        gui.enable_stop(false);
                    }
                })
                .on_exit({
                    let gui = Arc::clone(&gui);
                    move || gui.lock().unwrap().enable_stop(true)
                })
                .transition(TransitionBuilder::new().on_event("play").target("playing")),
        )
        .state(
            StateBuilder::new("playing")
                .on_entry({
                    let gui = Arc::clone(&gui);
                    move || gui.lock().unwrap().show_pause()
                })
                .transition(TransitionBuilder::new().on_event("pause").target("paused"))
                .transition(TransitionBuilder::new().on_event("stop").target("stopped")),
        )
        .state(
            StateBuilder::new("paused")
                .on_entry({
                    let gui = Arc::clone(&gui);
                    move || gui.lock().unwrap().show_play()
                })
                .transition(TransitionBuilder::new().on_event("play").target("playing"))
                .transition(TransitionBuilder::new().on_event("stop").target("stopped")),
        )
        .build()
        .expect("player logic is well formed");

    player.enter();

    let stdin = std::io::stdin();
    while running.load(Ordering::Relaxed) {
        gui.lock().unwrap().print();
        let mut command = String::new();
        if stdin.lock().read_line(&mut command).unwrap_or(0) == 0 {
            break;
        }
        player.push_event(command.trim());
    }

    player.leave();
}

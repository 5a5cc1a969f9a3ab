#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use tideline::game::Command;
use tideline::{GameState, Strategy, TurnEngine};

/// Spawns and moves every unit north, so command rendering is exercised too.
struct Busy;

impl Strategy for Busy {
    fn name(&self) -> &str {
        "fuzz"
    }

    fn play_turn(&mut self, state: &mut GameState) -> Vec<Command> {
        let mut commands: Vec<Command> = state
            .me()
            .units()
            .map(|unit| unit.move_in(tideline::Direction::North))
            .collect();
        commands.push(state.me().shipyard.spawn());
        commands
    }
}

// Arbitrary input must end in Ok or Err, never a panic.
fuzz_target!(|data: &[u8]| {
    let mut engine = TurnEngine::new(Cursor::new(data), Vec::new());
    let _ = engine.run(&mut Busy);
});

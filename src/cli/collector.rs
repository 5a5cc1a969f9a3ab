//! Collector strategy: gather energy, bring it home, keep spawning early.

use tideline::config::keys;
use tideline::game::{Command, GameMap, Position, Unit};
use tideline::{ConfigDictionary, ConfigError, GameState, Strategy};
use tracing::{debug, error, info};

/// The two settings the collector reads from the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Limits {
    max_energy: i64,
    spawn_cost: i64,
}

impl Limits {
    fn read(config: &ConfigDictionary) -> Result<Self, ConfigError> {
        Ok(Self {
            max_energy: config.get_int(keys::MAX_ENERGY)?,
            spawn_cost: config.get_int(keys::SPAWN_COST)?,
        })
    }
}

/// Simple gathering bot.
///
/// - A unit with a full hold heads for the shipyard.
/// - A unit on a cell below a tenth of `max_energy` moves to the richest
///   neighbouring cell.
/// - Otherwise the unit stays and gathers.
/// - The shipyard spawns while the turn is at most `spawn_until`, energy
///   covers the cost, and nothing is on or headed for the shipyard cell.
///
/// Without usable energy settings the collector sends empty turns, which
/// leaves every unit in place.
#[derive(Debug, Clone)]
pub(crate) struct Collector {
    name: String,
    spawn_until: u32,
    limits: Option<Limits>,
}

impl Collector {
    pub(crate) fn new(name: String, spawn_until: u32) -> Self {
        Self {
            name,
            spawn_until,
            limits: None,
        }
    }

    fn unit_command(map: &mut GameMap, unit: &Unit, home: Position, max_energy: i64) -> Command {
        if unit.is_full(max_energy) {
            return unit.move_in(map.naive_navigate(unit, home));
        }
        let here = i64::from(map.cell_at(unit.position).energy);
        if here < max_energy / 10 {
            let target = richest_neighbour(map, map.normalize(unit.position));
            return unit.move_in(map.naive_navigate(unit, target));
        }
        unit.stay_still()
    }
}

impl Strategy for Collector {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_start(&mut self, state: &GameState) {
        self.limits = match Limits::read(&state.config) {
            Ok(limits) => Some(limits),
            Err(e) => {
                error!(error = %e, "collector.config");
                None
            }
        };
        info!(
            player = state.my_id(),
            spawn_until = self.spawn_until,
            idle = self.limits.is_none(),
            "collector.start"
        );
    }

    fn play_turn(&mut self, state: &mut GameState) -> Vec<Command> {
        let Some(Limits {
            max_energy,
            spawn_cost,
        }) = self.limits
        else {
            return Vec::new();
        };
        let home = state.me().shipyard.position;
        let units: Vec<Unit> = state.me().units().copied().collect();

        let mut commands = Vec::with_capacity(units.len() + 1);
        for unit in &units {
            commands.push(Self::unit_command(&mut state.map, unit, home, max_energy));
        }

        let me = state.me();
        if state.turn <= self.spawn_until
            && i64::from(me.energy) >= spawn_cost
            && !state.map.cell_at(home).is_occupied()
        {
            commands.push(me.shipyard.spawn());
        }

        debug!(turn = state.turn, commands = commands.len(), "collector.turn");
        commands
    }
}

/// Neighbouring position with the most energy; the first cardinal wins ties.
fn richest_neighbour(map: &GameMap, position: Position) -> Position {
    let mut best = position;
    let mut best_energy = i32::MIN;
    for candidate in position.surrounding_cardinals() {
        let energy = map.cell_at(candidate).energy;
        if energy > best_energy {
            best = candidate;
            best_energy = energy;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use tideline::game::{Direction, Player, Shipyard};

    const CONFIG: &str =
        r#"{"NEW_ENTITY_ENERGY_COST":"1000","MAX_ENERGY":"1000","DROPOFF_COST":"4000"}"#;

    fn started(state: &GameState) -> Collector {
        let mut collector = Collector::new("c".into(), 200);
        collector.on_start(state);
        collector
    }

    fn state(energy: i32, cell_energy: i32) -> GameState {
        state_with(CONFIG, energy, cell_energy)
    }

    fn state_with(config: &str, energy: i32, cell_energy: i32) -> GameState {
        let config = ConfigDictionary::parse(config).unwrap();
        let mut map = GameMap::new(8, 8).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                map.cell_at_mut(Position::new(x, y)).energy = cell_energy;
            }
        }
        let mut me = Player::new(
            0,
            Shipyard {
                owner: 0,
                position: Position::new(4, 4),
            },
        );
        me.energy = energy;
        GameState::new(config, 0, vec![me], map).unwrap()
    }

    fn add_unit(state: &mut GameState, id: u32, x: i32, y: i32, cargo: i32) {
        state.players[0]
            .insert_unit(Unit {
                id,
                owner: 0,
                position: Position::new(x, y),
                cargo,
            })
            .unwrap();
        let players = state.players.clone();
        state.map.refresh_occupancy(&players);
    }

    #[test]
    fn test_spawns_when_affordable() {
        let mut state = state(1000, 500);
        state.turn = 1;
        let commands = started(&state).play_turn(&mut state);
        assert_eq!(commands, vec![Command::Spawn]);
    }

    #[test]
    fn test_no_spawn_after_cutoff_or_when_poor() {
        let mut late = state(5000, 500);
        late.turn = 201;
        assert!(started(&late).play_turn(&mut late).is_empty());

        let mut poor = state(999, 500);
        poor.turn = 1;
        assert!(started(&poor).play_turn(&mut poor).is_empty());
    }

    #[test]
    fn test_full_unit_heads_home_and_blocks_spawn() {
        let mut state = state(5000, 500);
        state.turn = 1;
        add_unit(&mut state, 7, 5, 4, 1000);
        let commands = started(&state).play_turn(&mut state);
        assert_eq!(commands, vec![Command::Move(7, Direction::West)]);
    }

    #[test]
    fn test_unit_on_rich_cell_stays() {
        let mut state = state(0, 500);
        add_unit(&mut state, 2, 1, 1, 0);
        let commands = started(&state).play_turn(&mut state);
        assert_eq!(commands, vec![Command::Move(2, Direction::Still)]);
    }

    #[test]
    fn test_unit_on_depleted_cell_moves_to_richest_neighbour() {
        let mut state = state(0, 10);
        state.map.cell_at_mut(Position::new(1, 2)).energy = 300;
        add_unit(&mut state, 2, 1, 1, 0);
        let commands = started(&state).play_turn(&mut state);
        assert_eq!(commands, vec![Command::Move(2, Direction::South)]);
    }

    #[test]
    fn test_reads_limits_on_start() {
        let state = state(0, 0);
        let collector = started(&state);
        assert_eq!(
            collector.limits,
            Some(Limits {
                max_energy: 1000,
                spawn_cost: 1000
            })
        );
    }

    #[test]
    fn test_missing_setting_idles() {
        let mut state = state_with(r#"{"MAX_ENERGY":"1000"}"#, 5000, 10);
        state.turn = 1;
        add_unit(&mut state, 2, 1, 1, 0);
        let mut collector = started(&state);
        assert_eq!(collector.limits, None);
        assert!(collector.play_turn(&mut state).is_empty());
    }

    #[test]
    fn test_unparsable_setting_idles() {
        let mut state = state_with(
            r#"{"NEW_ENTITY_ENERGY_COST":"cheap","MAX_ENERGY":"1000"}"#,
            5000,
            500,
        );
        state.turn = 1;
        assert!(started(&state).play_turn(&mut state).is_empty());
    }
}

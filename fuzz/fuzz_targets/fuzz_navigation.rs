#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tideline::game::{Direction, GameMap, Player, Position, Shipyard, Unit};

/// Structured input for navigation fuzzing.
#[derive(Arbitrary, Debug)]
struct NavigationInput {
    width: u8,
    height: u8,
    /// Unit positions (unnormalized).
    units: Vec<(i32, i32)>,
    destination: (i32, i32),
}

fuzz_target!(|input: NavigationInput| {
    let width = i32::from(input.width.max(1));
    let height = i32::from(input.height.max(1));
    let Some(mut map) = GameMap::new(width, height) else {
        return;
    };

    let mut player = Player::new(
        0,
        Shipyard {
            owner: 0,
            position: Position::new(0, 0),
        },
    );
    for (id, &(x, y)) in (0u32..).zip(input.units.iter().take(256)) {
        let unit = Unit {
            id,
            owner: 0,
            position: map.normalize(Position::new(x, y)),
            cargo: 0,
        };
        if player.insert_unit(unit).is_err() {
            return;
        }
    }
    map.refresh_occupancy(std::slice::from_ref(&player));

    let destination = Position::new(input.destination.0, input.destination.1);
    let units: Vec<Unit> = player.units().copied().collect();
    for unit in &units {
        let before = map.clone();
        let distance = map.distance(unit.position, destination);
        assert!(distance <= width / 2 + height / 2);

        let direction = map.naive_navigate(unit, destination);
        if direction != Direction::Still {
            let target = unit.position.directional_offset(direction);
            assert!(!before.cell_at(target).is_occupied());
            assert_eq!(map.cell_at(target).unit, Some(unit.id));
        }
    }
});

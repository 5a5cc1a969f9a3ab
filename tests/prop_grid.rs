//! Property-based tests for toroidal geometry, occupancy and navigation.
//!
//! Run with: cargo test --release prop_grid

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use tideline::game::{Direction, GameMap, Player, Position, Shipyard, Unit};

fn dims() -> impl Strategy<Value = (i32, i32)> {
    (1i32..64, 1i32..64)
}

fn player_with_units(width: i32, height: i32, spots: &[(i32, i32)]) -> Player {
    let mut player = Player::new(
        0,
        Shipyard {
            owner: 0,
            position: Position::new(0, 0),
        },
    );
    for (i, &(x, y)) in spots.iter().enumerate() {
        player
            .insert_unit(Unit {
                id: u32::try_from(i).unwrap(),
                owner: 0,
                position: Position::new(x.rem_euclid(width), y.rem_euclid(height)),
                cargo: 0,
            })
            .unwrap();
    }
    player
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Normalizing twice is the same as normalizing once, and lands in range.
    #[test]
    fn prop_normalize_idempotent_and_in_range(
        (w, h) in dims(),
        x in -100_000i32..100_000,
        y in -100_000i32..100_000,
    ) {
        let map = GameMap::new(w, h).unwrap();
        let once = map.normalize(Position::new(x, y));
        prop_assert_eq!(map.normalize(once), once);
        prop_assert!((0..w).contains(&once.x));
        prop_assert!((0..h).contains(&once.y));
    }

    /// Distance is symmetric and bounded by half of each dimension.
    #[test]
    fn prop_distance_symmetric_and_bounded(
        (w, h) in dims(),
        a in (-500i32..500, -500i32..500),
        b in (-500i32..500, -500i32..500),
    ) {
        let map = GameMap::new(w, h).unwrap();
        let a = Position::new(a.0, a.1);
        let b = Position::new(b.0, b.1);
        let d = map.distance(a, b);
        prop_assert_eq!(d, map.distance(b, a));
        prop_assert!(d >= 0);
        prop_assert!(d <= w / 2 + h / 2);
    }

    /// Following the x and y moves reduces the distance by one per step.
    #[test]
    fn prop_unsafe_moves_shorten_distance(
        (w, h) in dims(),
        a in (0i32..64, 0i32..64),
        b in (0i32..64, 0i32..64),
    ) {
        let map = GameMap::new(w, h).unwrap();
        let a = map.normalize(Position::new(a.0, a.1));
        let b = map.normalize(Position::new(b.0, b.1));
        let before = map.distance(a, b);
        for direction in map.unsafe_moves(a, b) {
            if direction != Direction::Still {
                let step = a.directional_offset(direction);
                prop_assert_eq!(map.distance(step, b), before - 1);
            }
        }
    }

    /// After a refresh every unit's cell is occupied, and every occupied cell
    /// holds a unit that is actually there.
    #[test]
    fn prop_refresh_occupancy_round_trip(
        (w, h) in dims(),
        spots in prop::collection::vec((0i32..64, 0i32..64), 0..40),
    ) {
        let mut map = GameMap::new(w, h).unwrap();
        let player = player_with_units(w, h, &spots);
        map.refresh_occupancy(std::slice::from_ref(&player));

        for unit in player.units() {
            prop_assert!(map.cell_at(unit.position).is_occupied());
        }
        for cell in map.cells() {
            if let Some(id) = cell.unit {
                let unit = player.unit(id).unwrap();
                prop_assert_eq!(unit.position, cell.position);
            }
        }
    }

    /// Navigation never steps onto a cell that was occupied when it was called.
    #[test]
    fn prop_navigate_never_enters_occupied_cell(
        (w, h) in dims(),
        spots in prop::collection::vec((0i32..64, 0i32..64), 1..40),
        destination in (0i32..64, 0i32..64),
    ) {
        let mut map = GameMap::new(w, h).unwrap();
        let player = player_with_units(w, h, &spots);
        map.refresh_occupancy(std::slice::from_ref(&player));
        let before = map.clone();

        let unit = *player.unit(0).unwrap();
        let direction = map.naive_navigate(&unit, Position::new(destination.0, destination.1));

        if direction == Direction::Still {
            prop_assert_eq!(map, before);
        } else {
            let target = unit.position.directional_offset(direction);
            prop_assert!(!before.cell_at(target).is_occupied());
            prop_assert_eq!(map.cell_at(target).unit, Some(unit.id));
        }
    }
}

#[test]
fn test_surrounded_unit_stays_still() {
    let mut map = GameMap::new(5, 5).unwrap();
    let centre = (2, 2);
    let mut spots = vec![centre];
    spots.extend(
        Position::new(2, 2)
            .surrounding_cardinals()
            .iter()
            .map(|p| (p.x, p.y)),
    );
    let player = player_with_units(5, 5, &spots);
    map.refresh_occupancy(std::slice::from_ref(&player));

    let unit = *player.unit(0).unwrap();
    for destination in [(0, 0), (4, 4), (2, 0), (0, 2)] {
        let direction = map.naive_navigate(&unit, Position::new(destination.0, destination.1));
        assert_eq!(direction, Direction::Still);
    }
}

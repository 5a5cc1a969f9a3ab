//! Toroidal game map and local navigation.
//!
//! Both axes wrap: stepping off one edge re-enters from the opposite edge.
//! Every lookup normalizes its position first, so callers may pass raw
//! (unwrapped) coordinates.

use std::io::BufRead;

use tracing::trace;

use crate::error::{ProtocolError, ProtocolResult};
use crate::game::{Cell, Direction, Entity, Player, Position, StructureRef, Unit};
use crate::input::TokenStream;

/// Largest width or height accepted from the judge.
pub const MAX_DIMENSION: i32 = 1024;

/// The game map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMap {
    /// Width in cells, fixed for the game.
    width: i32,
    /// Height in cells, fixed for the game.
    height: i32,
    /// Cells stored in row-major order.
    cells: Vec<Cell>,
}

impl GameMap {
    /// Create a map with no energy on any cell.
    ///
    /// Returns `None` if either dimension is not positive or the cell count
    /// overflows.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Option<Self> {
        let size = cell_count(width, height)?;
        let cells = (0..size)
            .map(|idx| Cell::new(position_of(idx, width), 0))
            .collect();
        Some(Self {
            width,
            height,
            cells,
        })
    }

    /// Read the handshake map block: `width height` followed by
    /// `width * height` energy values in row-major order.
    ///
    /// # Errors
    ///
    /// Fails on dimensions outside `1..=MAX_DIMENSION`, a malformed token or
    /// a short read.
    pub fn read<R: BufRead>(input: &mut TokenStream<R>) -> ProtocolResult<Self> {
        let width = input.next_int()?;
        let height = input.next_int()?;
        let invalid = ProtocolError::InvalidDimensions { width, height };
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(invalid);
        }
        let mut map = Self::new(width, height).ok_or(invalid)?;
        for cell in &mut map.cells {
            cell.energy = input.next_int()?;
        }
        Ok(map)
    }

    /// Width in cells.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Total energy on the map.
    #[must_use]
    pub fn total_energy(&self) -> i64 {
        self.cells.iter().map(|cell| i64::from(cell.energy)).sum()
    }

    /// Wrap a position into `[0, width) x [0, height)`.
    ///
    /// Idempotent.
    #[must_use]
    pub const fn normalize(&self, position: Position) -> Position {
        Position::new(
            position.x.rem_euclid(self.width),
            position.y.rem_euclid(self.height),
        )
    }

    #[allow(clippy::cast_sign_loss)] // normalized coordinates are non-negative
    const fn index(&self, position: Position) -> usize {
        let normalized = self.normalize(position);
        normalized.y as usize * self.width as usize + normalized.x as usize
    }

    /// The cell at a position (normalized first).
    #[must_use]
    pub fn cell_at(&self, position: Position) -> &Cell {
        &self.cells[self.index(position)]
    }

    /// Mutable access to the cell at a position (normalized first).
    #[must_use]
    pub fn cell_at_mut(&mut self, position: Position) -> &mut Cell {
        let idx = self.index(position);
        &mut self.cells[idx]
    }

    /// The cell under an entity.
    #[must_use]
    pub fn cell_at_entity(&self, entity: &impl Entity) -> &Cell {
        self.cell_at(entity.position())
    }

    /// Mutable access to the cell under an entity.
    #[must_use]
    pub fn cell_at_entity_mut(&mut self, entity: &impl Entity) -> &mut Cell {
        self.cell_at_mut(entity.position())
    }

    /// Manhattan distance on the torus.
    ///
    /// Symmetric, and never more than `width / 2 + height / 2`.
    #[must_use]
    pub fn distance(&self, source: Position, target: Position) -> i32 {
        let source = self.normalize(source);
        let target = self.normalize(target);

        let dx = (source.x - target.x).abs();
        let dy = (source.y - target.y).abs();

        dx.min(self.width - dx) + dy.min(self.height - dy)
    }

    /// The x-axis and y-axis directions that bring `source` closer to
    /// `destination` along the shorter wrap-around path.
    ///
    /// An axis with no difference yields [`Direction::Still`]. When the direct
    /// and wrapped distances are equal the direct direction wins.
    #[must_use]
    pub fn unsafe_moves(&self, source: Position, destination: Position) -> [Direction; 2] {
        let source = self.normalize(source);
        let destination = self.normalize(destination);

        let x = axis_move(
            source.x,
            destination.x,
            self.width,
            Direction::East,
            Direction::West,
        );
        let y = axis_move(
            source.y,
            destination.y,
            self.height,
            Direction::South,
            Direction::North,
        );
        [x, y]
    }

    /// Pick the first of [`GameMap::unsafe_moves`] whose target cell is free,
    /// and claim that cell for the unit.
    ///
    /// Returns [`Direction::Still`] without claiming anything if no candidate
    /// is free. Greedy and x-before-y biased; not a path planner.
    pub fn naive_navigate(&mut self, unit: &Unit, destination: Position) -> Direction {
        let source = self.normalize(unit.position);
        for direction in self.unsafe_moves(source, destination) {
            if direction == Direction::Still {
                continue;
            }
            let target = self.normalize(source.directional_offset(direction));
            let cell = self.cell_at_mut(target);
            if !cell.is_occupied() {
                cell.mark_unsafe(unit.id);
                trace!(unit = unit.id, %target, %direction, "navigate.claim");
                return direction;
            }
        }
        Direction::Still
    }

    /// Rebuild occupancy from scratch for the given players.
    ///
    /// Clears every cell's unit, marks each unit's cell, and sets structure
    /// references for every shipyard and dropoff. Structures are never
    /// cleared.
    pub fn refresh_occupancy(&mut self, players: &[Player]) {
        for cell in &mut self.cells {
            cell.unit = None;
        }

        for player in players {
            for unit in player.units() {
                self.cell_at_entity_mut(unit).mark_unsafe(unit.id);
            }

            self.cell_at_entity_mut(&player.shipyard).structure =
                Some(StructureRef::Shipyard(player.id));

            for dropoff in player.dropoffs() {
                self.cell_at_entity_mut(dropoff).structure = Some(StructureRef::Dropoff(dropoff.id));
            }
        }
    }

    /// Read `count` `x y energy` triples and overwrite those cells' energy.
    ///
    /// # Errors
    ///
    /// Fails on a malformed token or a short read.
    pub fn apply_energy_deltas<R: BufRead>(
        &mut self,
        count: usize,
        input: &mut TokenStream<R>,
    ) -> ProtocolResult<()> {
        for _ in 0..count {
            let x = input.next_int()?;
            let y = input.next_int()?;
            let energy = input.next_int()?;
            self.cell_at_mut(Position::new(x, y)).energy = energy;
        }
        Ok(())
    }
}

/// Number of cells for the given dimensions, if they are valid.
fn cell_count(width: i32, height: i32) -> Option<usize> {
    if width <= 0 || height <= 0 {
        return None;
    }
    let width = usize::try_from(width).ok()?;
    let height = usize::try_from(height).ok()?;
    width.checked_mul(height)
}

/// Position of the cell at a row-major index.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)] // idx < width * height and width > 0
fn position_of(idx: usize, width: i32) -> Position {
    let width = width as usize;
    Position::new((idx % width) as i32, (idx / width) as i32)
}

/// Direction along one axis: `forward` increases the coordinate, `backward`
/// decreases it.
fn axis_move(
    source: i32,
    destination: i32,
    size: i32,
    forward: Direction,
    backward: Direction,
) -> Direction {
    let direct = (source - destination).abs();
    let wrapped = size - direct;

    if source < destination {
        if direct > wrapped { backward } else { forward }
    } else if source > destination {
        if direct > wrapped { forward } else { backward }
    } else {
        Direction::Still
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Shipyard;
    use std::io::Cursor;

    fn stream(text: &str) -> TokenStream<Cursor<Vec<u8>>> {
        TokenStream::new(Cursor::new(text.as_bytes().to_vec()))
    }

    fn unit(id: u32, x: i32, y: i32) -> Unit {
        Unit {
            id,
            owner: 0,
            position: Position::new(x, y),
            cargo: 0,
        }
    }

    #[test]
    fn test_map_creation() {
        let map = GameMap::new(4, 3).unwrap();
        assert_eq!(map.width(), 4);
        assert_eq!(map.height(), 3);
        assert_eq!(map.cells().len(), 12);
        assert_eq!(map.cells()[5].position, Position::new(1, 1));
    }

    #[test]
    fn test_map_invalid_size() {
        assert!(GameMap::new(0, 10).is_none());
        assert!(GameMap::new(10, -1).is_none());
    }

    #[test]
    fn test_read_row_major() {
        let mut input = stream("3 2\n1 2 3\n4 5 6\n");
        let map = GameMap::read(&mut input).unwrap();
        assert_eq!(map.cell_at(Position::new(2, 0)).energy, 3);
        assert_eq!(map.cell_at(Position::new(0, 1)).energy, 4);
        assert_eq!(map.total_energy(), 21);
    }

    #[test]
    fn test_read_rejects_bad_dimensions() {
        let mut input = stream("0 2\n");
        assert!(matches!(
            GameMap::read(&mut input),
            Err(ProtocolError::InvalidDimensions { width: 0, height: 2 })
        ));
    }

    #[test]
    fn test_read_rejects_oversized_map() {
        let mut input = stream("2000 2\n");
        assert!(matches!(
            GameMap::read(&mut input),
            Err(ProtocolError::InvalidDimensions { width: 2000, .. })
        ));
    }

    #[test]
    fn test_read_short_grid() {
        let mut input = stream("2 2\n1 2 3\n");
        assert!(GameMap::read(&mut input).unwrap_err().is_end_of_input());
    }

    #[test]
    fn test_normalize() {
        let map = GameMap::new(5, 4).unwrap();
        assert_eq!(map.normalize(Position::new(-1, -1)), Position::new(4, 3));
        assert_eq!(map.normalize(Position::new(5, 4)), Position::new(0, 0));
        assert_eq!(map.normalize(Position::new(-11, 9)), Position::new(4, 1));
        let p = map.normalize(Position::new(17, -6));
        assert_eq!(map.normalize(p), p);
    }

    #[test]
    fn test_cell_at_wraps() {
        let mut map = GameMap::new(5, 5).unwrap();
        map.cell_at_mut(Position::new(4, 0)).energy = 77;
        assert_eq!(map.cell_at(Position::new(-1, 5)).energy, 77);
    }

    #[test]
    fn test_distance() {
        let map = GameMap::new(10, 8).unwrap();
        assert_eq!(map.distance(Position::new(0, 0), Position::new(0, 0)), 0);
        assert_eq!(map.distance(Position::new(0, 0), Position::new(3, 2)), 5);
        // Wrapping is shorter on both axes.
        assert_eq!(map.distance(Position::new(0, 0), Position::new(9, 7)), 2);
        // Raw coordinates are normalized first.
        assert_eq!(map.distance(Position::new(-1, 0), Position::new(9, 0)), 0);
    }

    #[test]
    fn test_unsafe_moves_wraps() {
        let map = GameMap::new(5, 5).unwrap();
        assert_eq!(
            map.unsafe_moves(Position::new(4, 4), Position::new(0, 0)),
            [Direction::East, Direction::South]
        );
        assert_eq!(
            map.unsafe_moves(Position::new(0, 0), Position::new(4, 4)),
            [Direction::West, Direction::North]
        );
    }

    #[test]
    fn test_unsafe_moves_direct() {
        let map = GameMap::new(10, 10).unwrap();
        assert_eq!(
            map.unsafe_moves(Position::new(2, 5), Position::new(4, 3)),
            [Direction::East, Direction::North]
        );
        assert_eq!(
            map.unsafe_moves(Position::new(2, 5), Position::new(2, 5)),
            [Direction::Still, Direction::Still]
        );
        assert_eq!(
            map.unsafe_moves(Position::new(2, 5), Position::new(2, 9)),
            [Direction::Still, Direction::South]
        );
    }

    #[test]
    fn test_unsafe_moves_tie_prefers_direct() {
        let map = GameMap::new(6, 6).unwrap();
        // Distance 3 either way on a 6-wide axis.
        assert_eq!(
            map.unsafe_moves(Position::new(0, 0), Position::new(3, 3)),
            [Direction::East, Direction::South]
        );
        assert_eq!(
            map.unsafe_moves(Position::new(3, 3), Position::new(0, 0)),
            [Direction::West, Direction::North]
        );
    }

    #[test]
    fn test_naive_navigate_claims_target() {
        let mut map = GameMap::new(8, 8).unwrap();
        let u = unit(1, 2, 2);
        map.cell_at_mut(u.position).mark_unsafe(u.id);

        let direction = map.naive_navigate(&u, Position::new(5, 2));
        assert_eq!(direction, Direction::East);
        assert_eq!(map.cell_at(Position::new(3, 2)).unit, Some(1));
    }

    #[test]
    fn test_naive_navigate_falls_back_to_y() {
        let mut map = GameMap::new(8, 8).unwrap();
        let u = unit(1, 2, 2);
        map.cell_at_mut(Position::new(3, 2)).mark_unsafe(9);

        let direction = map.naive_navigate(&u, Position::new(5, 5));
        assert_eq!(direction, Direction::South);
        assert_eq!(map.cell_at(Position::new(2, 3)).unit, Some(1));
    }

    #[test]
    fn test_naive_navigate_blocked() {
        let mut map = GameMap::new(8, 8).unwrap();
        let u = unit(1, 0, 0);
        map.cell_at_mut(Position::new(0, 0)).mark_unsafe(1);
        for neighbour in u.position.surrounding_cardinals() {
            map.cell_at_mut(neighbour).mark_unsafe(9);
        }

        let before = map.clone();
        assert_eq!(map.naive_navigate(&u, Position::new(7, 7)), Direction::Still);
        assert_eq!(map, before);
    }

    #[test]
    fn test_naive_navigate_at_destination() {
        let mut map = GameMap::new(4, 4).unwrap();
        let u = unit(1, 1, 1);
        assert_eq!(map.naive_navigate(&u, Position::new(1, 1)), Direction::Still);
        assert!(!map.cell_at(Position::new(1, 1)).is_occupied());
    }

    #[test]
    fn test_two_units_do_not_claim_same_cell() {
        let mut map = GameMap::new(8, 8).unwrap();
        let a = unit(1, 2, 3);
        let b = unit(2, 4, 3);
        let dest = Position::new(3, 3);

        assert_eq!(map.naive_navigate(&a, dest), Direction::East);
        assert_eq!(map.naive_navigate(&b, dest), Direction::Still);
    }

    #[test]
    fn test_refresh_occupancy_rebuilds() {
        let mut map = GameMap::new(6, 6).unwrap();
        map.cell_at_mut(Position::new(5, 5)).mark_unsafe(42);

        let mut player = Player::new(
            0,
            Shipyard {
                owner: 0,
                position: Position::new(1, 1),
            },
        );
        player.insert_unit(unit(3, 2, 2)).unwrap();

        map.refresh_occupancy(std::slice::from_ref(&player));

        assert!(!map.cell_at(Position::new(5, 5)).is_occupied());
        assert_eq!(map.cell_at(Position::new(2, 2)).unit, Some(3));
        assert_eq!(
            map.cell_at(Position::new(1, 1)).structure,
            Some(StructureRef::Shipyard(0))
        );
    }

    #[test]
    fn test_apply_energy_deltas() {
        let mut map = GameMap::new(5, 5).unwrap();
        let mut input = stream("2 3 750\n");
        map.apply_energy_deltas(1, &mut input).unwrap();

        for cell in map.cells() {
            let expected = if cell.position == Position::new(2, 3) { 750 } else { 0 };
            assert_eq!(cell.energy, expected);
        }
    }

    #[test]
    fn test_apply_energy_deltas_short() {
        let mut map = GameMap::new(5, 5).unwrap();
        let mut input = stream("2 3\n");
        assert!(map.apply_energy_deltas(1, &mut input).is_err());
    }
}

//! Collision detection and rotation kicks
//!
//! A placement is legal only when both cells of the pair are in bounds and
//! empty. Rotation that would collide searches a fixed, ordered list of pivot
//! displacements before giving up.

use glam::IVec2;

use super::grid::Grid;
use super::piece::{Piece, Rotation};

/// Pivot displacements tried in order when a rotation collides.
///
/// One left, one right, two left, two right, one up. The order is part of
/// gameplay feel; earlier entries win ties.
pub const KICKS: [IVec2; 5] = [
    IVec2::new(-1, 0),
    IVec2::new(1, 0),
    IVec2::new(-2, 0),
    IVec2::new(2, 0),
    IVec2::new(0, -1),
];

/// True if either cell of `piece` is out of bounds or lands on a filled cell
#[inline]
pub fn collides(grid: &Grid, piece: &Piece) -> bool {
    piece
        .cells()
        .iter()
        .any(|&(pos, _)| !grid.in_bounds(pos) || grid.is_occupied(pos))
}

/// True if `piece` shifted by `delta` is a legal placement
#[inline]
pub fn can_move(grid: &Grid, piece: &Piece, delta: IVec2) -> bool {
    !collides(grid, &piece.shifted(delta))
}

/// Rotate `piece` in one direction, kicking the pivot if needed.
///
/// Returns the first legal placement, or `None` if the plain rotation and
/// every kick collide.
pub fn try_rotate(grid: &Grid, piece: &Piece, rotation: Rotation) -> Option<Piece> {
    let rotated = piece.rotated(rotation);
    if !collides(grid, &rotated) {
        return Some(rotated);
    }
    KICKS
        .iter()
        .map(|&kick| rotated.shifted(kick))
        .find(|candidate| !collides(grid, candidate))
}

/// Rotate in the requested direction, falling back to the opposite one.
///
/// A clockwise turn that fails entirely retries counterclockwise (and vice
/// versa). `None` means the piece must keep its current placement.
pub fn rotate_with_fallback(grid: &Grid, piece: &Piece, rotation: Rotation) -> Option<Piece> {
    try_rotate(grid, piece, rotation).or_else(|| try_rotate(grid, piece, rotation.opposite()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Cell;
    use proptest::prelude::*;

    fn red_pair(pivot: IVec2, offset: IVec2) -> Piece {
        Piece::new(pivot, offset, Cell::Red, Cell::Red)
    }

    #[test]
    fn test_collides_out_of_bounds() {
        let grid = Grid::new(6, 12);
        assert!(!collides(&grid, &red_pair(IVec2::new(2, 5), IVec2::NEG_Y)));
        // Sub cell above the top edge
        assert!(collides(&grid, &red_pair(IVec2::new(2, 0), IVec2::NEG_Y)));
        // Sub cell past the right wall
        assert!(collides(&grid, &red_pair(IVec2::new(5, 5), IVec2::X)));
        // Pivot below the floor
        assert!(collides(&grid, &red_pair(IVec2::new(2, 12), IVec2::NEG_Y)));
    }

    #[test]
    fn test_collides_occupied() {
        let mut grid = Grid::new(6, 12);
        grid.set(IVec2::new(3, 4), Cell::Blue);
        assert!(collides(&grid, &red_pair(IVec2::new(3, 5), IVec2::NEG_Y)));
        assert!(collides(&grid, &red_pair(IVec2::new(3, 4), IVec2::Y)));
        assert!(!collides(&grid, &red_pair(IVec2::new(2, 5), IVec2::NEG_Y)));
    }

    #[test]
    fn test_rotate_without_kick() {
        let grid = Grid::new(6, 12);
        let piece = red_pair(IVec2::new(2, 5), IVec2::NEG_Y);
        let rotated = try_rotate(&grid, &piece, Rotation::Clockwise).unwrap();
        assert_eq!(rotated.pivot, IVec2::new(2, 5));
        assert_eq!(rotated.offset(), IVec2::X);
    }

    #[test]
    fn test_right_wall_kicks_left() {
        let grid = Grid::new(6, 12);
        let piece = red_pair(IVec2::new(5, 5), IVec2::NEG_Y);
        let rotated = try_rotate(&grid, &piece, Rotation::Clockwise).unwrap();
        assert_eq!(rotated.pivot, IVec2::new(4, 5));
        assert_eq!(rotated.offset(), IVec2::X);
    }

    #[test]
    fn test_right_wall_blocked_left_is_noop() {
        let mut grid = Grid::new(6, 12);
        grid.set(IVec2::new(4, 5), Cell::Green);
        let piece = red_pair(IVec2::new(5, 5), IVec2::NEG_Y);
        assert_eq!(try_rotate(&grid, &piece, Rotation::Clockwise), None);
    }

    #[test]
    fn test_left_wall_kicks_right() {
        let grid = Grid::new(6, 12);
        let piece = red_pair(IVec2::new(0, 5), IVec2::NEG_Y);
        let rotated = try_rotate(&grid, &piece, Rotation::CounterClockwise).unwrap();
        assert_eq!(rotated.pivot, IVec2::new(1, 5));
        assert_eq!(rotated.offset(), IVec2::NEG_X);
    }

    #[test]
    fn test_floor_kicks_up() {
        // Narrow well: walls on both sides at the floor, only "up" frees it
        let grid = Grid::from_rows(&[
            "...", //
            "...", //
            "G.G", //
        ]);
        let piece = red_pair(IVec2::new(1, 1), IVec2::X);
        let rotated = try_rotate(&grid, &piece, Rotation::Clockwise).unwrap();
        // CW turns right into down; (1,2) is free so no kick is needed
        assert_eq!(rotated.pivot, IVec2::new(1, 1));
        assert_eq!(rotated.sub(), IVec2::new(1, 2));

        let blocked = Grid::from_rows(&[
            "...", //
            "G.G", //
            "GGG", //
        ]);
        let piece = red_pair(IVec2::new(1, 1), IVec2::NEG_Y);
        let rotated = try_rotate(&blocked, &piece, Rotation::Clockwise).unwrap();
        assert_eq!(rotated.pivot, IVec2::new(1, 0));
        assert_eq!(rotated.sub(), IVec2::new(2, 0));
    }

    #[test]
    fn test_fallback_to_opposite_direction() {
        // Every clockwise placement is blocked; only the counterclockwise
        // "up" kick reaches the open cell at (1,0)
        let grid = Grid::from_rows(&[
            "G..GG", //
            "GG.GG", //
            "GGGGG", //
        ]);
        let piece = red_pair(IVec2::new(2, 1), IVec2::NEG_Y);
        assert_eq!(try_rotate(&grid, &piece, Rotation::Clockwise), None);
        let rotated = rotate_with_fallback(&grid, &piece, Rotation::Clockwise).unwrap();
        assert_eq!(rotated.pivot, IVec2::new(2, 0));
        assert_eq!(rotated.sub(), IVec2::new(1, 0));

        // Fully boxed in: both directions fail
        let boxed = Grid::from_rows(&[
            "GG.GG", //
            "GG.GG", //
            "GGGGG", //
        ]);
        assert_eq!(rotate_with_fallback(&boxed, &piece, Rotation::Clockwise), None);
    }

    proptest! {
        #[test]
        fn prop_collides_iff_either_cell_illegal(
            filled in proptest::collection::vec(any::<bool>(), 6 * 12),
            x in -2i32..8,
            y in -2i32..14,
            dir in 0usize..4,
        ) {
            let mut grid = Grid::new(6, 12);
            for (i, &f) in filled.iter().enumerate() {
                if f {
                    grid.set(IVec2::new((i % 6) as i32, (i / 6) as i32), Cell::Yellow);
                }
            }
            let offset = [IVec2::X, IVec2::Y, IVec2::NEG_X, IVec2::NEG_Y][dir];
            let piece = red_pair(IVec2::new(x, y), offset);
            let legal = |p: IVec2| grid.in_bounds(p) && !grid.is_occupied(p);
            prop_assert_eq!(collides(&grid, &piece), !(legal(piece.pivot) && legal(piece.sub())));
        }
    }
}

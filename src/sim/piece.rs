//! Falling pair and the sources that spawn them

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::grid::Cell;

/// Rotation direction (y grows downward, so clockwise turns up into right)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    pub fn opposite(self) -> Self {
        match self {
            Rotation::Clockwise => Rotation::CounterClockwise,
            Rotation::CounterClockwise => Rotation::Clockwise,
        }
    }

    /// Rotate a unit offset by 90 degrees
    #[inline]
    pub fn apply(self, offset: IVec2) -> IVec2 {
        match self {
            Rotation::Clockwise => IVec2::new(-offset.y, offset.x),
            Rotation::CounterClockwise => IVec2::new(offset.y, -offset.x),
        }
    }
}

/// A two-cell piece: pivot cell plus a sub cell one step away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Piece {
    /// Pivot position (rotation center)
    pub pivot: IVec2,
    /// Sub-cell position relative to the pivot
    offset: IVec2,
    /// Pivot color
    pub pivot_color: Cell,
    /// Sub-cell color
    pub sub_color: Cell,
}

impl Piece {
    pub fn new(pivot: IVec2, offset: IVec2, pivot_color: Cell, sub_color: Cell) -> Self {
        assert_eq!(
            offset.x.abs() + offset.y.abs(),
            1,
            "piece offset must be a unit step, got {offset}"
        );
        assert!(
            !pivot_color.is_empty() && !sub_color.is_empty(),
            "piece colors must be non-empty"
        );
        Self {
            pivot,
            offset,
            pivot_color,
            sub_color,
        }
    }

    /// Sub-cell offset from the pivot (always Manhattan length 1)
    pub fn offset(&self) -> IVec2 {
        self.offset
    }

    /// Absolute sub-cell position
    #[inline]
    pub fn sub(&self) -> IVec2 {
        self.pivot + self.offset
    }

    /// Both cells with their colors, pivot first
    pub fn cells(&self) -> [(IVec2, Cell); 2] {
        [(self.pivot, self.pivot_color), (self.sub(), self.sub_color)]
    }

    /// Copy shifted by `delta`
    #[inline]
    pub fn shifted(&self, delta: IVec2) -> Self {
        Self {
            pivot: self.pivot + delta,
            ..*self
        }
    }

    /// Copy with the offset turned 90 degrees around the pivot
    #[inline]
    pub fn rotated(&self, rotation: Rotation) -> Self {
        Self {
            offset: rotation.apply(self.offset),
            ..*self
        }
    }
}

/// Supplies color pairs for new pieces.
///
/// Owned by the game state so runs can be seeded or scripted.
pub trait PieceSource {
    /// Colors for the next piece as (pivot, sub)
    fn next_colors(&mut self) -> (Cell, Cell);
}

/// Seeded random colors drawn from the first `color_count` palette entries
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: Pcg32,
    color_count: usize,
}

impl RandomSource {
    pub fn new(seed: u64, color_count: usize) -> Self {
        assert!(
            (1..=Cell::COLORS.len()).contains(&color_count),
            "color_count must be within 1..={}",
            Cell::COLORS.len()
        );
        Self {
            rng: Pcg32::seed_from_u64(seed),
            color_count,
        }
    }

    fn random_color(&mut self) -> Cell {
        Cell::COLORS[self.rng.random_range(0..self.color_count)]
    }
}

impl PieceSource for RandomSource {
    fn next_colors(&mut self) -> (Cell, Cell) {
        let pivot = self.random_color();
        let sub = self.random_color();
        (pivot, sub)
    }
}

/// Replays a fixed list of color pairs, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    pairs: VecDeque<(Cell, Cell)>,
}

impl ScriptedSource {
    pub fn new(pairs: impl IntoIterator<Item = (Cell, Cell)>) -> Self {
        let pairs: VecDeque<_> = pairs.into_iter().collect();
        assert!(!pairs.is_empty(), "scripted source needs at least one pair");
        Self { pairs }
    }
}

impl PieceSource for ScriptedSource {
    fn next_colors(&mut self) -> (Cell, Cell) {
        let pair = self.pairs[0];
        self.pairs.rotate_left(1);
        pair
    }
}

/// Spawn factory: a vertical pair with the sub cell above the pivot
pub fn spawn_piece(source: &mut impl PieceSource, spawn: IVec2) -> Piece {
    let (pivot_color, sub_color) = source.next_colors();
    Piece::new(spawn, IVec2::NEG_Y, pivot_color, sub_color)
}

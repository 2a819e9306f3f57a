//! Playfield grid
//!
//! Fixed-size board of cells. y=0 is the top row; gravity pulls toward
//! larger y.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Contents of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
}

impl Cell {
    /// Every non-empty color, in spawn-table order
    pub const COLORS: [Cell; 5] = [Cell::Red, Cell::Green, Cell::Blue, Cell::Yellow, Cell::Purple];

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cell::Empty => "Empty",
            Cell::Red => "Red",
            Cell::Green => "Green",
            Cell::Blue => "Blue",
            Cell::Yellow => "Yellow",
            Cell::Purple => "Purple",
        }
    }
}

/// W×H board of cells, stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        Self {
            width: width as i32,
            height: height as i32,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Build a grid from text rows, one char per cell.
    ///
    /// `.` is empty; `R G B Y P` are colors. Handy for tests and demos.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.chars().count(), width, "ragged grid row {y}");
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    'R' => Cell::Red,
                    'G' => Cell::Green,
                    'B' => Cell::Blue,
                    'Y' => Cell::Yellow,
                    'P' => Cell::Purple,
                    _ => Cell::Empty,
                };
                grid.set(IVec2::new(x as i32, y as i32), cell);
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    #[inline]
    pub fn in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    #[inline]
    fn index(&self, pos: IVec2) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    /// Cell at `pos`, or `None` when out of bounds
    #[inline]
    pub fn get(&self, pos: IVec2) -> Option<Cell> {
        self.in_bounds(pos).then(|| self.cells[self.index(pos)])
    }

    /// True iff `pos` is in bounds and holds a color
    #[inline]
    pub fn is_occupied(&self, pos: IVec2) -> bool {
        self.get(pos).is_some_and(|c| !c.is_empty())
    }

    /// Write a cell. Out-of-bounds writes are skipped and reported as `false`.
    #[inline]
    pub fn set(&mut self, pos: IVec2, cell: Cell) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        let idx = self.index(pos);
        self.cells[idx] = cell;
        true
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Number of non-empty cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// True if any cell in row `y` is occupied
    pub fn row_occupied(&self, y: usize) -> bool {
        (0..self.width).any(|x| self.is_occupied(IVec2::new(x, y as i32)))
    }

    /// Rows as slices, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// Column `x`, top to bottom. Panics if `x` is out of bounds.
    pub fn column(&self, x: usize) -> Vec<Cell> {
        assert!(x < self.width(), "column {x} outside a {}-wide grid", self.width);
        (0..self.height)
            .map(|y| self.cells[self.index(IVec2::new(x as i32, y))])
            .collect()
    }
}

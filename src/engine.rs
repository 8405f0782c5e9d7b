use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All four directions, in the order loss detection checks them.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(name)
    }
}

type Tile = u32;
type Score = u64;

/// Smallest board the engine accepts.
pub const MIN_SIZE: usize = 2;

/// Largest tile a `u32` cell can hold. Two of these never merge.
pub const MAX_TILE: Tile = 1 << 31;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum GridError {
    #[error("board size must be at least 2, got {0}")]
    Size(usize),
    #[error("row {row} has {len} cells, expected {size}")]
    Ragged { row: usize, len: usize, size: usize },
    #[error("cell ({row}, {col}) holds {value}, which is not a power of two >= 2")]
    Tile { row: usize, col: usize, value: Tile },
}

/// Square 2048 board with its running score and an owned random source.
///
/// Cells are stored row-major; `0` marks an empty cell and every other value
/// is a power of two >= 2. The RNG is only consulted when spawning tiles, so
/// a seeded `StdRng` makes a whole game reproducible.
#[derive(Clone)]
pub struct Grid<R: Rng = StdRng> {
    size: usize,
    cells: Vec<Tile>,
    score: Score,
    rng: R,
}

impl Grid<StdRng> {
    /// Create a board seeded from OS entropy, with two starting tiles.
    pub fn new(size: usize) -> Result<Self, GridError> {
        Self::with_rng(size, StdRng::from_entropy())
    }

    /// Create a reproducible board from a fixed seed, with two starting tiles.
    ///
    /// ```
    /// use term_2048::engine::Grid;
    /// let a = Grid::seeded(4, 7).unwrap();
    /// let b = Grid::seeded(4, 7).unwrap();
    /// assert_eq!(a.cells(), b.cells());
    /// assert_eq!(a.count_empty(), 14);
    /// ```
    pub fn seeded(size: usize, seed: u64) -> Result<Self, GridError> {
        Self::with_rng(size, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Grid<R> {
    /// Create a board driven by `rng`, reset with two starting tiles.
    pub fn with_rng(size: usize, rng: R) -> Result<Self, GridError> {
        if size < MIN_SIZE {
            return Err(GridError::Size(size));
        }
        let mut grid = Grid { size, cells: vec![0; size * size], score: 0, rng };
        grid.reset();
        Ok(grid)
    }

    /// Build a board from explicit rows (no tiles are spawned, score is 0).
    ///
    /// ```
    /// use term_2048::engine::{Grid, Move};
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let rows = vec![vec![2, 2, 0, 0], vec![0; 4], vec![0; 4], vec![0; 4]];
    /// let mut g = Grid::from_rows(rows, StdRng::seed_from_u64(1)).unwrap();
    /// assert_eq!(g.move_dir(Move::Left), 4);
    /// assert_eq!(g.rows()[0], vec![4, 0, 0, 0]);
    /// ```
    pub fn from_rows(rows: Vec<Vec<Tile>>, rng: R) -> Result<Self, GridError> {
        let size = rows.len();
        if size < MIN_SIZE {
            return Err(GridError::Size(size));
        }
        let mut cells = Vec::with_capacity(size * size);
        for (row, line) in rows.into_iter().enumerate() {
            if line.len() != size {
                return Err(GridError::Ragged { row, len: line.len(), size });
            }
            for (col, &value) in line.iter().enumerate() {
                if value != 0 && (value < 2 || !value.is_power_of_two()) {
                    return Err(GridError::Tile { row, col, value });
                }
            }
            cells.extend(line);
        }
        Ok(Grid { size, cells, score: 0, rng })
    }

    /// Clear every cell, zero the score and spawn two tiles.
    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = 0);
        self.score = 0;
        self.add_random_tile();
        self.add_random_tile();
    }

    /// Place a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
    ///
    /// Returns the `(row, col)` that received the tile.
    ///
    /// # Panics
    /// Panics if the board has no empty cell; callers must only spawn after a
    /// move that changed the board, which always frees a cell.
    pub fn add_random_tile(&mut self) -> (usize, usize) {
        let empty: Vec<usize> = (0..self.cells.len()).filter(|&i| self.cells[i] == 0).collect();
        assert!(!empty.is_empty(), "add_random_tile called on a full board");
        let idx = empty[self.rng.gen_range(0..empty.len())];
        self.cells[idx] = if self.rng.gen_range(0..100) >= 90 { 4 } else { 2 };
        (idx / self.size, idx % self.size)
    }

    /// Slide/merge every line toward `dir`. Returns the points gained.
    ///
    /// Left is the canonical move; the other three are built from it with
    /// paired `invert`/`transpose` calls so the board ends up in its original
    /// orientation.
    pub fn move_dir(&mut self, dir: Move) -> Score {
        let gained = match dir {
            Move::Left => self.move_left(),
            Move::Right => {
                self.invert();
                let g = self.move_left();
                self.invert();
                g
            }
            Move::Up => {
                self.transpose();
                let g = self.move_left();
                self.transpose();
                g
            }
            Move::Down => {
                self.transpose();
                self.invert();
                let g = self.move_left();
                self.invert();
                self.transpose();
                g
            }
        };
        self.score += gained;
        gained
    }

    /// True iff `move_dir(dir)` would change at least one cell. Never mutates.
    pub fn can_move(&self, dir: Move) -> bool {
        (0..self.size).any(|i| line_can_move_left(&self.line(dir, i)))
    }

    /// True if any of the four directions is playable.
    pub fn can_move_any(&self) -> bool {
        Move::ALL.iter().any(|&dir| self.can_move(dir))
    }

    fn move_left(&mut self) -> Score {
        let n = self.size;
        self.cells.chunks_mut(n).map(move_line_left).sum()
    }

    /// Line `idx` as seen when moving toward `dir`: index 0 is the leading edge.
    fn line(&self, dir: Move, idx: usize) -> Vec<Tile> {
        let n = self.size;
        match dir {
            Move::Left => (0..n).map(|c| self.cells[idx * n + c]).collect(),
            Move::Right => (0..n).rev().map(|c| self.cells[idx * n + c]).collect(),
            Move::Up => (0..n).map(|r| self.cells[r * n + idx]).collect(),
            Move::Down => (0..n).rev().map(|r| self.cells[r * n + idx]).collect(),
        }
    }

    pub(crate) fn transpose(&mut self) {
        let n = self.size;
        for r in 0..n {
            for c in (r + 1)..n {
                self.cells.swap(r * n + c, c * n + r);
            }
        }
    }

    pub(crate) fn invert(&mut self) {
        let n = self.size;
        self.cells.chunks_mut(n).for_each(|row| row.reverse());
    }

    #[inline]
    pub fn size(&self) -> usize { self.size }

    #[inline]
    pub fn score(&self) -> Score { self.score }

    /// Row-major cell values.
    #[inline]
    pub fn cells(&self) -> &[Tile] { &self.cells }

    pub fn rows(&self) -> Vec<Vec<Tile>> {
        self.cells.chunks(self.size).map(|r| r.to_vec()).collect()
    }

    pub fn get(&self, row: usize, col: usize) -> Tile {
        self.cells[row * self.size + col]
    }

    /// Highest tile on the board (0 for an empty board).
    pub fn max_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 0).count()
    }
}

impl<R: Rng> fmt::Debug for Grid<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("size", &self.size)
            .field("cells", &self.cells)
            .field("score", &self.score)
            .finish()
    }
}

impl<R: Rng> fmt::Display for Grid<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = "-".repeat(self.size * 7 + self.size - 1);
        for (i, row) in self.cells.chunks(self.size).enumerate() {
            if i > 0 {
                writeln!(f, "{sep}")?;
            }
            let vals: Vec<String> = row.iter().map(|&v| format_val(v)).collect();
            writeln!(f, "{}", vals.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(val: Tile) -> String {
    match val {
        0 => " ".repeat(7),
        x => format!("{x:^7}"),
    }
}

/// Squeeze non-zero tiles toward index 0, keeping their order.
pub fn tighten(line: &mut [Tile]) {
    let mut write = 0;
    for read in 0..line.len() {
        if line[read] != 0 {
            line.swap(write, read);
            write += 1;
        }
    }
}

#[inline]
fn mergeable(a: Tile, b: Tile) -> bool {
    a != 0 && a == b && a < MAX_TILE
}

/// Single merge pass from index 0: each equal adjacent pair becomes one
/// doubled tile at the first position and a zero at the second. A merged
/// tile is not merged again. Returns the sum of the doubled values.
pub fn merge(line: &mut [Tile]) -> Score {
    let mut gained = 0;
    let mut i = 0;
    while i + 1 < line.len() {
        if mergeable(line[i], line[i + 1]) {
            line[i] *= 2;
            line[i + 1] = 0;
            gained += line[i] as Score;
            i += 2;
        } else {
            i += 1;
        }
    }
    gained
}

/// Compact, merge, compact. Returns the points gained.
pub fn move_line_left(line: &mut [Tile]) -> Score {
    tighten(line);
    let gained = merge(line);
    tighten(line);
    gained
}

/// True if a left move would change `line`: some gap precedes a tile, or two
/// neighbouring tiles can merge.
pub fn line_can_move_left(line: &[Tile]) -> bool {
    line.windows(2).any(|w| (w[0] == 0 && w[1] != 0) || mergeable(w[0], w[1]))
}

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::grid::{Grid, Position};

/// Every cell of the grid is covered by the snake
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no free cell left for food on a {width}x{height} board")]
pub struct BoardFull {
    pub width: usize,
    pub height: usize,
}

/// Owns the current food cell and where the next one goes
#[derive(Debug, Clone)]
pub struct Food {
    grid: Grid,
    position: Position,
    max_attempts: usize,
    rng: StdRng,
}

impl Food {
    pub fn new(grid: Grid, max_attempts: usize) -> Self {
        Self::with_rng(grid, max_attempts, StdRng::from_entropy())
    }

    /// Deterministic placement, for tests
    pub fn seeded(grid: Grid, max_attempts: usize, seed: u64) -> Self {
        Self::with_rng(grid, max_attempts, StdRng::seed_from_u64(seed))
    }

    fn with_rng(grid: Grid, max_attempts: usize, rng: StdRng) -> Self {
        Self {
            grid,
            position: Position::new(0, 0),
            max_attempts: max_attempts.max(1),
            rng,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Move the food to a random free cell
    ///
    /// Uniform sampling is tried `max_attempts` times. After that the free
    /// cells are enumerated and one is picked uniformly, so a crowded board
    /// still terminates and only a full board is an error.
    pub fn respawn(&mut self, occupied: &[Position]) -> Result<Position, BoardFull> {
        for _ in 0..self.max_attempts {
            let x = self.rng.gen_range(0..self.grid.width()) as i32;
            let y = self.rng.gen_range(0..self.grid.height()) as i32;
            let pos = Position::new(x, y);

            if !occupied.contains(&pos) {
                self.position = pos;
                return Ok(pos);
            }
        }

        log::debug!(
            "food sampling exhausted {} attempts, scanning free cells",
            self.max_attempts
        );

        let pos = self
            .grid
            .cells()
            .filter(|cell| !occupied.contains(cell))
            .choose(&mut self.rng)
            .ok_or(BoardFull {
                width: self.grid.width(),
                height: self.grid.height(),
            })?;
        self.position = pos;
        Ok(pos)
    }

    /// Put the food somewhere specific
    pub fn place_at(&mut self, pos: Position) {
        self.position = pos;
    }
}

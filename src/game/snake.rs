use super::direction::Direction;
use super::grid::{Grid, Position};

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Outcome of a single `Snake::advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved,
    Collided(CollisionType),
}

/// The snake and its movement rules
///
/// The body is stored head first. A queued direction only takes effect on the
/// next `advance`, and is validated against the direction of the last move so
/// the head can never turn back into the neck.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    grid: Grid,
    body: Vec<Position>,
    direction: Direction,
    queued: Option<Direction>,
    grow_pending: bool,
}

impl Snake {
    /// Create a single-cell snake at the center of the grid, heading right
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            body: vec![grid.center()],
            direction: Direction::Right,
            queued: None,
            grow_pending: false,
        }
    }

    /// Build a snake from explicit segments, head first
    ///
    /// Returns `None` if the body is empty, leaves the grid, or repeats a cell.
    pub fn from_body(grid: Grid, body: Vec<Position>, direction: Direction) -> Option<Self> {
        if body.is_empty() || !body.iter().all(|&p| grid.contains(p)) {
            return None;
        }
        let distinct: std::collections::HashSet<_> = body.iter().collect();
        if distinct.len() != body.len() {
            return None;
        }

        Some(Self {
            grid,
            body,
            direction,
            queued: None,
            grow_pending: false,
        })
    }

    pub fn reset(&mut self) {
        self.body.clear();
        self.body.push(self.grid.center());
        self.direction = Direction::Right;
        self.queued = None;
        self.grow_pending = false;
    }

    /// Queue a turn for the next move. Reversals are ignored.
    pub fn change_direction(&mut self, new_direction: Direction) -> bool {
        if self.direction.is_opposite(new_direction) {
            return false;
        }
        self.queued = Some(new_direction);
        true
    }

    /// The tail stays put on the next advance
    pub fn mark_growth(&mut self) {
        self.grow_pending = true;
    }

    /// Move one cell in the current (or queued) direction
    ///
    /// On collision the snake is left untouched.
    pub fn advance(&mut self) -> Advance {
        let direction = self.queued.unwrap_or(self.direction);
        let new_head = self.head().moved_in_direction(direction);

        if !self.grid.contains(new_head) {
            return Advance::Collided(CollisionType::Wall);
        }

        // The tail cell is vacated this tick unless we are growing
        let checked = if self.grow_pending {
            &self.body[..]
        } else {
            &self.body[..self.body.len() - 1]
        };
        if checked.contains(&new_head) {
            return Advance::Collided(CollisionType::SelfCollision);
        }

        self.direction = direction;
        self.queued = None;
        self.body.insert(0, new_head);

        if self.grow_pending {
            self.grow_pending = false;
        } else {
            self.body.pop();
        }

        Advance::Moved
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    /// Direction used by the last move
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Direction the next move will take
    pub fn heading(&self) -> Direction {
        self.queued.unwrap_or(self.direction)
    }

    pub fn is_growing(&self) -> bool {
        self.grow_pending
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false: a snake has at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

use super::{
    config::GameConfig,
    direction::Direction,
    food::Food,
    grid::Position,
    snake::{Advance, CollisionType, Snake},
};

/// Why a round stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    Collision(CollisionType),
    /// The snake filled the board
    BoardFull,
}

/// Result of a round tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Not enough time has passed since the last move
    NotDue,
    Moved,
    AteFood { score: u32, speed: f32 },
    RoundEnded { final_score: u32, cause: EndCause },
}

/// Read-only view of a round for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSnapshot {
    pub body: Vec<Position>,
    pub direction: Direction,
    pub food: Position,
    pub score: u32,
    pub speed: f32,
}

/// Drives one round from start to the snake's death
///
/// Moves are throttled by `speed` (ticks per second); timestamps are
/// milliseconds from any fixed origin.
#[derive(Debug, Clone)]
pub struct Round {
    config: GameConfig,
    snake: Snake,
    food: Food,
    score: u32,
    speed: f32,
    last_tick: u64,
    ended: Option<EndCause>,
}

impl Round {
    /// Create a round and start it at `now`
    pub fn new(config: GameConfig, now: u64) -> Self {
        let food = Food::new(config.grid(), config.food_max_attempts);
        Self::with_food(config, food, now)
    }

    /// Like `new` but with reproducible food placement
    pub fn seeded(config: GameConfig, seed: u64, now: u64) -> Self {
        let food = Food::seeded(config.grid(), config.food_max_attempts, seed);
        Self::with_food(config, food, now)
    }

    fn with_food(config: GameConfig, food: Food, now: u64) -> Self {
        let mut round = Self {
            snake: Snake::new(config.grid()),
            food,
            score: 0,
            speed: config.initial_speed,
            last_tick: now,
            ended: None,
            config,
        };
        round.start(now);
        round
    }

    /// Reset the snake, place food, and zero score and speed
    pub fn start(&mut self, now: u64) {
        self.snake.reset();
        self.score = 0;
        self.speed = self.config.initial_speed;
        self.last_tick = now;
        self.ended = None;

        // A single-cell board has no room for food at all
        if let Err(full) = self.food.respawn(self.snake.body()) {
            log::warn!("round started on a full board: {}", full);
            self.ended = Some(EndCause::BoardFull);
        }
    }

    pub fn change_direction(&mut self, direction: Direction) -> bool {
        self.snake.change_direction(direction)
    }

    /// Advance the simulation if a move is due
    pub fn tick(&mut self, now: u64) -> TickOutcome {
        if let Some(cause) = self.ended {
            return TickOutcome::RoundEnded {
                final_score: self.score,
                cause,
            };
        }

        let elapsed = now.saturating_sub(self.last_tick) as f32;
        if elapsed < GameConfig::tick_interval_ms(self.speed) {
            return TickOutcome::NotDue;
        }
        self.last_tick = now;

        if let Advance::Collided(collision) = self.snake.advance() {
            return self.end(EndCause::Collision(collision));
        }

        if self.snake.head() != self.food.position() {
            return TickOutcome::Moved;
        }

        self.snake.mark_growth();
        self.score += self.config.food_score;
        self.speed = (self.speed + self.config.speed_step).min(self.config.max_speed);

        // The tail stays put on the next move, so the current body is exactly
        // what the food must avoid
        if self.food.respawn(self.snake.body()).is_err() {
            return self.end(EndCause::BoardFull);
        }

        TickOutcome::AteFood {
            score: self.score,
            speed: self.speed,
        }
    }

    fn end(&mut self, cause: EndCause) -> TickOutcome {
        log::debug!("round ended ({:?}) with score {}", cause, self.score);
        self.ended = Some(cause);
        TickOutcome::RoundEnded {
            final_score: self.score,
            cause,
        }
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            body: self.snake.body().to_vec(),
            direction: self.snake.heading(),
            food: self.food.position(),
            score: self.score,
            speed: self.speed,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Position {
        self.food.position()
    }

    pub fn is_over(&self) -> bool {
        self.ended.is_some()
    }

    /// Replace the snake, e.g. to set up a specific board
    pub fn set_snake(&mut self, snake: Snake) {
        self.snake = snake;
    }

    pub fn set_food(&mut self, pos: Position) {
        self.food.place_at(pos);
    }

    pub fn set_score(&mut self, score: u32) {
        self.score = score;
    }
}

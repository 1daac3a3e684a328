use super::{
    action::{Action, Direction},
    config::GameConfig,
    state::{CollisionType, GameState, Position, Snake, SnakeStatus},
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use tracing::debug;

/// Random picks tried before falling back to scanning the free cells
const SPAWN_ATTEMPTS: usize = 32;

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate a fruit this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game has ended
    pub terminated: bool,
    pub info: StepInfo,
}

impl StepResult {
    fn running(ate_food: bool) -> Self {
        Self {
            terminated: false,
            info: StepInfo {
                ate_food,
                collision_type: None,
            },
        }
    }

    fn finished(ate_food: bool, collision_type: Option<CollisionType>) -> Self {
        Self {
            terminated: true,
            info: StepInfo {
                ate_food,
                collision_type,
            },
        }
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose fruit placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Use a different configuration from the next `reset` on
    pub fn reconfigure(&mut self, config: GameConfig) {
        self.config = config;
    }

    /// Start a new game: snake centred and heading left, fruits scattered
    pub fn reset(&mut self) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(
            Position::new(center_x, center_y),
            Direction::Left,
            self.config.effective_snake_length(),
        );

        let mut state = GameState::new(
            snake,
            Vec::with_capacity(self.config.fruit_count),
            self.config.grid_width,
            self.config.grid_height,
        );

        for _ in 0..self.config.fruit_count {
            match self.spawn_fruit(&state) {
                Some(pos) => state.fruits.push(pos),
                None => break,
            }
        }

        state
    }

    /// Execute one tick of the game
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if !state.is_alive() {
            return StepResult::finished(false, None);
        }

        if let Action::Move(direction) = action {
            state.snake.turn(direction);
        }

        let new_head = state.snake.head().moved_in_direction(state.snake.direction);
        state.steps += 1;

        if !state.is_in_bounds(new_head) {
            return Self::kill(state, CollisionType::Wall);
        }

        let ate_food = state.has_fruit_at(new_head);

        if state.snake.collides_with_body(new_head, ate_food) {
            return Self::kill(state, CollisionType::SelfCollision);
        }

        state.snake.advance(ate_food);

        if ate_food {
            state.score += 1;
            state.fruits.retain(|&fruit| fruit != new_head);
            debug!(score = state.score, len = state.snake.len(), "fruit eaten");
        }

        self.replenish_fruit(state);

        if state.fruits.is_empty() {
            state.status = SnakeStatus::Won;
            return StepResult::finished(ate_food, None);
        }

        StepResult::running(ate_food)
    }

    /// Bring the board back up to `fruit_count`, as far as free cells allow.
    /// Fruit that found no room on an earlier tick is placed once the tail frees a cell.
    fn replenish_fruit(&mut self, state: &mut GameState) {
        while state.fruits.len() < self.config.fruit_count {
            match self.spawn_fruit(state) {
                Some(pos) => state.fruits.push(pos),
                None => break,
            }
        }
    }

    fn kill(state: &mut GameState, collision_type: CollisionType) -> StepResult {
        state.status = SnakeStatus::Dead(collision_type);
        StepResult::finished(false, Some(collision_type))
    }

    /// Pick a random cell free of snake and fruit, or `None` if the board is full
    fn spawn_fruit(&mut self, state: &GameState) -> Option<Position> {
        for _ in 0..SPAWN_ATTEMPTS {
            let x = self.rng.gen_range(0..state.grid_width) as i32;
            let y = self.rng.gen_range(0..state.grid_height) as i32;
            let pos = Position::new(x, y);

            if !state.is_occupied_by_snake(pos) && !state.has_fruit_at(pos) {
                return Some(pos);
            }
        }

        state.free_cells().choose(&mut self.rng).copied()
    }
}

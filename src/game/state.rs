use std::collections::VecDeque;

use super::action::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake: an ordered run of grid-aligned segments
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at the front
    pub body: VecDeque<Position>,
    /// Heading the snake moved in on its last tick
    pub direction: Direction,
}

impl Snake {
    /// Create a snake whose segments trail behind the head, opposite to `direction`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (back_dx, back_dy) = direction.opposite().delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(back_dx * i, back_dy * i))
            .collect();

        Self { body, direction }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Segments behind the head
    pub fn body_segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter().skip(1)
    }

    /// Change heading. Reversing onto the neck is refused and the heading is kept.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Whether moving the head to `pos` runs into the body.
    ///
    /// The tail leaves its cell during the same tick unless the snake grows,
    /// so it only counts as an obstacle when `growing` is set.
    pub fn collides_with_body(&self, pos: Position, growing: bool) -> bool {
        let checked = if growing {
            self.len().saturating_sub(1)
        } else {
            self.len().saturating_sub(2)
        };
        self.body_segments().take(checked).any(|&p| p == pos)
    }

    /// Move one cell along the heading, keeping the tail when `grow` is set
    pub fn advance(&mut self, grow: bool) {
        let new_head = self.head().moved_in_direction(self.direction);
        self.body.push_front(new_head);

        if !grow {
            self.body.pop_back();
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

impl CollisionType {
    pub fn describe(&self) -> &'static str {
        match self {
            CollisionType::Wall => "hit the wall",
            CollisionType::SelfCollision => "bit its own tail",
        }
    }
}

/// Whether the game is still running, and how it ended if not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeStatus {
    Alive,
    Dead(CollisionType),
    /// The snake filled every cell of the board
    Won,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub fruits: Vec<Position>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub steps: u32,
    pub status: SnakeStatus,
}

impl GameState {
    pub fn new(snake: Snake, fruits: Vec<Position>, grid_width: usize, grid_height: usize) -> Self {
        Self {
            snake,
            fruits,
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            status: SnakeStatus::Alive,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status == SnakeStatus::Alive
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.contains(pos)
    }

    pub fn has_fruit_at(&self, pos: Position) -> bool {
        self.fruits.contains(&pos)
    }

    /// Cells holding neither snake nor fruit
    pub fn free_cells(&self) -> Vec<Position> {
        (0..self.grid_height as i32)
            .flat_map(|y| (0..self.grid_width as i32).map(move |x| Position::new(x, y)))
            .filter(|&pos| !self.is_occupied_by_snake(pos) && !self.has_fruit_at(pos))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_in_direction(Direction::Down), Position::new(5, 6));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_snake_creation_trails_behind_head() {
        let snake = Snake::new(Position::new(5, 5), Direction::Left, 3);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.body[1], Position::new(6, 5));
        assert_eq!(snake.tail(), Position::new(7, 5));
    }

    #[test]
    fn test_snake_advance() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);

        snake.advance(false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(6, 5));
        assert_eq!(snake.tail(), Position::new(4, 5));

        snake.advance(true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(7, 5));
        assert_eq!(snake.tail(), Position::new(4, 5));
    }

    #[test]
    fn test_turn_refuses_reversal() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Left, 5);
        assert!(!snake.turn(Direction::Right));
        assert_eq!(snake.direction, Direction::Left);

        assert!(snake.turn(Direction::Up));
        assert_eq!(snake.direction, Direction::Up);
        assert!(snake.turn(Direction::Up));
    }

    #[test]
    fn test_collision_detection() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        assert!(!snake.collides_with_body(Position::new(5, 5), false)); // head
        assert!(snake.collides_with_body(Position::new(4, 5), false)); // body
        assert!(!snake.collides_with_body(Position::new(10, 10), false)); // empty
    }

    #[test]
    fn test_tail_cell_is_free_unless_growing() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 4);
        let tail = snake.tail();
        assert!(!snake.collides_with_body(tail, false));
        assert!(snake.collides_with_body(tail, true));
    }

    #[test]
    fn test_bounds_checking() {
        let state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            vec![Position::new(10, 10)],
            20,
            20,
        );

        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(19, 19)));
        assert!(!state.is_in_bounds(Position::new(-1, 0)));
        assert!(!state.is_in_bounds(Position::new(20, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 20)));
    }

    #[test]
    fn test_free_cells_excludes_snake_and_fruit() {
        let state = GameState::new(
            Snake::new(Position::new(1, 0), Direction::Right, 2),
            vec![Position::new(2, 2)],
            3,
            3,
        );

        let free = state.free_cells();
        assert_eq!(free.len(), 9 - 2 - 1);
        assert!(!free.contains(&Position::new(0, 0)));
        assert!(!free.contains(&Position::new(1, 0)));
        assert!(!free.contains(&Position::new(2, 2)));
    }

    #[test]
    fn test_status() {
        let mut state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Vec::new(),
            10,
            10,
        );
        assert!(state.is_alive());

        state.status = SnakeStatus::Dead(CollisionType::Wall);
        assert!(!state.is_alive());
    }
}

use crate::game::{Action, Difficulty, Direction, GameConfig, MAX_FRUIT_COUNT, SnakeLength};
use crate::input::KeyAction;

/// Rows of the main menu, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuField {
    Length,
    Fruits,
    Difficulty,
    Play,
}

impl MenuField {
    pub const ALL: [MenuField; 4] = [
        MenuField::Length,
        MenuField::Fruits,
        MenuField::Difficulty,
        MenuField::Play,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuField::Length => "Snake length",
            MenuField::Fruits => "Fruits",
            MenuField::Difficulty => "Difficulty",
            MenuField::Play => "PLAY",
        }
    }
}

/// Outcome of a key press on the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Play,
    Quit,
    None,
}

/// Choices made on the main menu before a game starts
#[derive(Debug, Clone, PartialEq)]
pub struct MenuState {
    pub selected: MenuField,
    pub length: SnakeLength,
    pub fruit_count: usize,
    pub difficulty: Difficulty,
    /// Shown under the menu when the chosen settings cannot be played
    pub error: Option<String>,
}

impl MenuState {
    pub fn new() -> Self {
        Self {
            selected: MenuField::Length,
            length: SnakeLength::Medium,
            fruit_count: 2,
            difficulty: Difficulty::Normal,
            error: None,
        }
    }

    /// Preselect the options closest to an existing configuration
    pub fn from_config(config: &GameConfig) -> Self {
        let length = match config.effective_snake_length() {
            0..=5 => SnakeLength::Short,
            6..=10 => SnakeLength::Medium,
            _ => SnakeLength::Large,
        };

        Self {
            length,
            fruit_count: config.fruit_count.clamp(1, MAX_FRUIT_COUNT),
            difficulty: config.difficulty,
            ..Self::new()
        }
    }

    pub fn handle_key(&mut self, action: &KeyAction) -> MenuCommand {
        match action {
            KeyAction::GameAction(Action::Move(Direction::Up)) => {
                self.selected = cycle(&MenuField::ALL, self.selected, false);
            }
            KeyAction::GameAction(Action::Move(Direction::Down)) => {
                self.selected = cycle(&MenuField::ALL, self.selected, true);
            }
            KeyAction::GameAction(Action::Move(Direction::Left)) => self.change_value(false),
            KeyAction::GameAction(Action::Move(Direction::Right)) => self.change_value(true),
            KeyAction::Confirm => return MenuCommand::Play,
            KeyAction::Quit => return MenuCommand::Quit,
            _ => {}
        }
        MenuCommand::None
    }

    fn change_value(&mut self, forward: bool) {
        self.error = None;
        match self.selected {
            MenuField::Length => self.length = cycle(&SnakeLength::ALL, self.length, forward),
            MenuField::Fruits => {
                let counts: Vec<usize> = (1..=MAX_FRUIT_COUNT).collect();
                self.fruit_count = cycle(&counts, self.fruit_count, forward);
            }
            MenuField::Difficulty => {
                self.difficulty = cycle(&Difficulty::ALL, self.difficulty, forward)
            }
            MenuField::Play => {}
        }
    }

    /// Text shown next to a field's label
    pub fn value_label(&self, field: MenuField) -> String {
        match field {
            MenuField::Length => format!("{} ({})", self.length.label(), self.length.segments()),
            MenuField::Fruits => self.fruit_count.to_string(),
            MenuField::Difficulty => self.difficulty.label().to_string(),
            MenuField::Play => String::new(),
        }
    }

    /// The menu choices layered over `base`, which supplies the grid settings
    pub fn apply(&self, base: &GameConfig) -> GameConfig {
        base.clone()
            .with_length(self.length)
            .with_fruit_count(self.fruit_count)
            .with_difficulty(self.difficulty)
    }
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new()
    }
}

/// Step to the neighbouring item, wrapping at both ends
fn cycle<T: Copy + PartialEq>(items: &[T], current: T, forward: bool) -> T {
    let index = items.iter().position(|&item| item == current).unwrap_or(0);
    let len = items.len();
    let next = if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    };
    items[next]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(direction: Direction) -> KeyAction {
        KeyAction::GameAction(Action::Move(direction))
    }

    #[test]
    fn test_defaults() {
        let menu = MenuState::new();
        assert_eq!(menu.selected, MenuField::Length);
        assert_eq!(menu.length, SnakeLength::Medium);
        assert_eq!(menu.fruit_count, 2);
        assert_eq!(menu.difficulty, Difficulty::Normal);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut menu = MenuState::new();

        menu.handle_key(&key(Direction::Up));
        assert_eq!(menu.selected, MenuField::Play);

        menu.handle_key(&key(Direction::Down));
        assert_eq!(menu.selected, MenuField::Length);

        menu.handle_key(&key(Direction::Down));
        assert_eq!(menu.selected, MenuField::Fruits);
    }

    #[test]
    fn test_change_values() {
        let mut menu = MenuState::new();

        menu.handle_key(&key(Direction::Right));
        assert_eq!(menu.length, SnakeLength::Large);
        menu.handle_key(&key(Direction::Right));
        assert_eq!(menu.length, SnakeLength::Short);

        menu.handle_key(&key(Direction::Down));
        menu.handle_key(&key(Direction::Left));
        menu.handle_key(&key(Direction::Left));
        assert_eq!(menu.fruit_count, MAX_FRUIT_COUNT);

        menu.handle_key(&key(Direction::Down));
        menu.handle_key(&key(Direction::Right));
        assert_eq!(menu.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_confirm_and_quit() {
        let mut menu = MenuState::new();
        assert_eq!(menu.handle_key(&KeyAction::Confirm), MenuCommand::Play);
        assert_eq!(menu.handle_key(&KeyAction::Quit), MenuCommand::Quit);
        assert_eq!(menu.handle_key(&KeyAction::Restart), MenuCommand::None);
    }

    #[test]
    fn test_apply_keeps_grid() {
        let mut menu = MenuState::new();
        menu.length = SnakeLength::Short;
        menu.fruit_count = 4;
        menu.difficulty = Difficulty::Easy;

        let config = menu.apply(&GameConfig::new(40, 30));
        assert_eq!(config.grid_width, 40);
        assert_eq!(config.grid_height, 30);
        assert_eq!(config.initial_snake_length, 5);
        assert_eq!(config.fruit_count, 4);
        assert_eq!(config.difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_from_config() {
        let config = GameConfig::default()
            .with_length(SnakeLength::Large)
            .with_fruit_count(3)
            .with_difficulty(Difficulty::Hard);

        let menu = MenuState::from_config(&config);
        assert_eq!(menu.length, SnakeLength::Large);
        assert_eq!(menu.fruit_count, 3);
        assert_eq!(menu.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_changing_value_clears_error() {
        let mut menu = MenuState::new();
        menu.error = Some("too long".to_string());
        menu.handle_key(&key(Direction::Left));
        assert!(menu.error.is_none());
    }
}

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use super::menu::{MenuCommand, MenuState};
use crate::game::{Action, Direction, GameConfig, GameEngine, GameState, SnakeStatus};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Render at roughly 30 FPS, independent of the movement tick
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Which screen the player is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    GameOver,
}

pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    menu: MenuState,
    /// Grid settings the menu choices are layered over
    base_config: GameConfig,
    screen: Screen,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    pending_direction: Option<Direction>,
    /// The snake stays put until the first movement key of a game
    started: bool,
    tick_interval: Duration,
    tick_interval_changed: bool,
}

impl HumanMode {
    pub fn with_engine(mut engine: GameEngine) -> Self {
        let base_config = engine.config().clone();
        let state = engine.reset();

        Self {
            tick_interval: base_config.tick_interval(),
            menu: MenuState::from_config(&base_config),
            base_config,
            engine,
            state,
            screen: Screen::Menu,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            pending_direction: None,
            started: false,
            tick_interval_changed: false,
        }
    }

    /// Go straight to a game with the engine's configuration
    pub fn skip_menu(mut self) -> Self {
        self.start_game();
        self
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut terminal = restore_on_error(open_terminal(), restore_terminal)?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = movement_timer(self.tick_interval);
        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| self.draw(frame)).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.tick_interval_changed {
                self.tick_interval_changed = false;
                tick_timer = movement_timer(self.tick_interval);
                debug!(interval_ms = self.tick_interval.as_millis() as u64, "tick timer rebuilt");
            }

            if self.should_quit {
                info!("quitting");
                break;
            }
        }

        Ok(())
    }

    fn draw(&self, frame: &mut ratatui::Frame) {
        match self.screen {
            Screen::Menu => self.renderer.render_menu(frame, &self.menu, &self.metrics),
            Screen::Playing | Screen::GameOver => self.renderer.render_game(
                frame,
                &self.state,
                &self.metrics,
                self.engine.config().difficulty,
                !self.started,
            ),
        }
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        let action = self.input_handler.handle_key_event(key);
        self.handle_action(action);
    }

    fn handle_action(&mut self, action: KeyAction) {
        match self.screen {
            Screen::Menu => match self.menu.handle_key(&action) {
                MenuCommand::Play => self.play_from_menu(),
                MenuCommand::Quit => self.should_quit = true,
                MenuCommand::None => {}
            },
            Screen::Playing => match action {
                KeyAction::GameAction(Action::Move(direction)) => {
                    self.pending_direction = Some(direction);
                    if !self.started {
                        self.started = true;
                        self.metrics.on_game_start();
                        debug!(?direction, "snake released");
                    }
                }
                KeyAction::Restart => self.start_game(),
                KeyAction::Menu => self.show_menu(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::GameAction(Action::Continue) | KeyAction::Confirm | KeyAction::None => {}
            },
            Screen::GameOver => match action {
                KeyAction::Restart => self.start_game(),
                KeyAction::Menu | KeyAction::Confirm => self.show_menu(),
                KeyAction::Quit => self.should_quit = true,
                _ => {}
            },
        }
    }

    fn update_game(&mut self) {
        if self.screen != Screen::Playing || !self.started {
            return;
        }

        let action = self
            .pending_direction
            .take()
            .map(Action::Move)
            .unwrap_or(Action::Continue);

        let result = self.engine.step(&mut self.state, action);

        if result.terminated {
            self.metrics.on_game_over(self.state.score);
            self.screen = Screen::GameOver;

            match self.state.status {
                SnakeStatus::Dead(cause) => info!(
                    score = self.state.score,
                    steps = self.state.steps,
                    ?cause,
                    "game over"
                ),
                SnakeStatus::Won => info!(score = self.state.score, "board filled"),
                SnakeStatus::Alive => {}
            }
        }
    }

    fn play_from_menu(&mut self) {
        let config = self.menu.apply(&self.base_config);

        if let Err(err) = config.validate() {
            warn!(%err, "menu settings rejected");
            self.menu.error = Some(err.to_string());
            return;
        }

        self.menu.error = None;
        self.engine.reconfigure(config);
        self.start_game();
    }

    fn start_game(&mut self) {
        self.state = self.engine.reset();
        self.screen = Screen::Playing;
        self.started = false;
        self.pending_direction = None;
        self.metrics.on_game_reset();

        let config = self.engine.config();
        let tick_interval = config.tick_interval();
        if tick_interval != self.tick_interval {
            self.tick_interval = tick_interval;
            self.tick_interval_changed = true;
        }

        info!(
            width = config.grid_width,
            height = config.grid_height,
            length = config.effective_snake_length(),
            fruits = config.fruit_count,
            difficulty = config.difficulty.label(),
            "new game"
        );
    }

    fn show_menu(&mut self) {
        self.screen = Screen::Menu;
        self.started = false;
        self.pending_direction = None;
        debug!("back to menu");
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Alternate screen, hidden cursor, cleared. Raw mode must already be on.
fn open_terminal() -> Result<Terminal<CrosstermBackend<Stderr>>> {
    let mut stderr = stderr();
    execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    terminal.hide_cursor().context("Failed to hide cursor")?;
    terminal.clear().context("Failed to clear terminal")?;
    Ok(terminal)
}

/// Best-effort undo of a half-finished setup; the setup error is what gets reported
fn restore_terminal() {
    if let Err(err) = disable_raw_mode() {
        warn!(%err, "failed to disable raw mode");
    }
    let mut stderr = stderr();
    if let Err(err) = execute!(stderr, LeaveAlternateScreen, Show) {
        warn!(%err, "failed to leave alternate screen");
    }
}

/// Run `restore` when `result` is an error, then pass the result through
fn restore_on_error<T>(result: Result<T>, restore: impl FnOnce()) -> Result<T> {
    if result.is_err() {
        restore();
    }
    result
}

fn movement_timer(period: Duration) -> Interval {
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

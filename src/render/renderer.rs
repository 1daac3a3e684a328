use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Difficulty, GameState, Position, SnakeStatus};
use crate::metrics::GameMetrics;
use crate::modes::menu::{MenuField, MenuState};

/// Rows taken by the header and footer around the grid
const CHROME_HEIGHT: usize = 6;

/// Terminal size (columns, rows) that shows every cell of the grid.
/// Each cell is two columns wide and the grid has a one-cell border.
pub fn required_size(grid_width: usize, grid_height: usize) -> (u16, u16) {
    let columns = grid_width.saturating_mul(2).saturating_add(2);
    let rows = grid_height.saturating_add(2 + CHROME_HEIGHT);
    (
        u16::try_from(columns).unwrap_or(u16::MAX),
        u16::try_from(rows).unwrap_or(u16::MAX),
    )
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render_menu(&self, frame: &mut Frame, menu: &MenuState, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(0),    // Options
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let title = Paragraph::new("S N A K E")
            .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let options = self.render_menu_options(menu, metrics);
        frame.render_widget(options, chunks[1]);

        let controls = Paragraph::new(Line::from(vec![
            Span::styled("↑↓", Style::default().fg(Color::Cyan)),
            Span::raw(" select | "),
            Span::styled("←→", Style::default().fg(Color::Cyan)),
            Span::raw(" change | "),
            Span::styled("Enter", Style::default().fg(Color::Green)),
            Span::raw(" play | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(controls, chunks[2]);
    }

    fn render_menu_options(&self, menu: &MenuState, metrics: &GameMetrics) -> Paragraph<'_> {
        let mut lines = vec![Line::from("")];

        for field in MenuField::ALL {
            let selected = field == menu.selected;
            let marker = if selected { "> " } else { "  " };
            let label_style = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };

            if field == MenuField::Play {
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled(marker, label_style),
                    Span::styled(field.label(), label_style),
                ]));
                continue;
            }

            let value = if selected {
                format!("◀ {} ▶", menu.value_label(field))
            } else {
                menu.value_label(field)
            };

            lines.push(Line::from(vec![
                Span::styled(marker, label_style),
                Span::styled(format!("{:<14}", field.label()), label_style),
                Span::styled(value, Style::default().fg(Color::White)),
            ]));
        }

        lines.push(Line::from(""));
        if let Some(error) = &menu.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }

        if metrics.games_played > 0 {
            lines.push(Line::from(vec![
                Span::styled("Best: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    metrics.high_score.to_string(),
                    Style::default().fg(Color::White),
                ),
                Span::raw("    "),
                Span::styled("Games: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    metrics.games_played.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]));
        }

        Paragraph::new(lines).alignment(Alignment::Center)
    }

    pub fn render_game(
        &self,
        frame: &mut Frame,
        state: &GameState,
        metrics: &GameMetrics,
        difficulty: Difficulty,
        awaiting_start: bool,
    ) {
        let area = frame.area();
        let (needed_width, needed_height) = required_size(state.grid_width, state.grid_height);

        // A clipped grid hides walls and fruit, so refuse to draw a partial one
        if state.is_alive() && (area.width < needed_width || area.height < needed_height) {
            let warning = self.render_too_small(area, needed_width, needed_height);
            frame.render_widget(warning, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(area);

        // Render header with basic stats
        let stats = self.render_stats(chunks[0], state, metrics, difficulty);
        frame.render_widget(stats, chunks[0]);

        // Render game grid or game over screen
        if state.is_alive() {
            // Exactly as wide as the grid, centred
            let grid_area = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Fill(1),
                    Constraint::Length(needed_width),
                    Constraint::Fill(1),
                ])
                .split(chunks[1])[1];
            let grid = self.render_grid(grid_area, state, awaiting_start);
            frame.render_widget(grid, grid_area);
        } else {
            let game_over = self.render_game_over(chunks[1], state, metrics);
            frame.render_widget(game_over, chunks[1]);
        }

        // Render footer with controls
        let controls = self.render_controls(chunks[2]);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, _area: Rect, state: &GameState, awaiting_start: bool) -> Paragraph<'_> {
        let head = state.snake.head();
        let mut lines = Vec::with_capacity(state.grid_height);

        for y in 0..state.grid_height {
            let mut spans = Vec::with_capacity(state.grid_width);

            for x in 0..state.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.is_occupied_by_snake(pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if state.has_fruit_at(pos) {
                    Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let title = if awaiting_start {
            " Press an arrow key to start "
        } else {
            " Snake "
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_too_small(&self, area: Rect, needed_width: u16, needed_height: u16) -> Paragraph<'_> {
        let (width, height) = (area.width, area.height);
        let text = vec![
            Line::from(Span::styled(
                "Terminal too small",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Need {needed_width}x{needed_height}, have {width}x{height}")),
            Line::from("Enlarge the window or pick a smaller grid"),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_stats(
        &self,
        _area: Rect,
        state: &GameState,
        metrics: &GameMetrics,
        difficulty: Difficulty,
    ) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("★ Score: ", label),
            Span::styled(state.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.max(state.score).to_string(), value),
            Span::raw("    "),
            Span::styled("Steps: ", label),
            Span::styled(state.steps.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
            Span::raw("    "),
            Span::styled(difficulty.label(), Style::default().fg(Color::Magenta)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(
        &self,
        _area: Rect,
        state: &GameState,
        metrics: &GameMetrics,
    ) -> Paragraph<'_> {
        let (headline, cause) = match state.status {
            SnakeStatus::Won => ("YOU WIN", "The snake filled the board".to_string()),
            SnakeStatus::Dead(collision) => ("GAME OVER", format!("The snake {}", collision.describe())),
            SnakeStatus::Alive => ("GAME OVER", String::new()),
        };

        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                headline,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(cause, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if metrics.new_high_score {
            text.push(Line::from(Span::styled(
                "New high score!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
        } else {
            text.push(Line::from(vec![
                Span::styled("Best: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    metrics.high_score.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to restart, ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Enter",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" for the menu or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, _area: Rect) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
            Span::styled("M", Style::default().fg(Color::Cyan)),
            Span::raw(" menu | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

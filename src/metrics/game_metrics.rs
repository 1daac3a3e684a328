use std::time::{Duration, Instant};

/// Per-session bookkeeping shown in the header and on the game-over screen
pub struct GameMetrics {
    /// Set while a game is running; the clock is frozen otherwise
    started_at: Option<Instant>,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    /// Whether the last finished game beat the previous best
    pub new_high_score: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            started_at: None,
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            new_high_score: false,
        }
    }

    pub fn update(&mut self) {
        if let Some(started_at) = self.started_at {
            self.elapsed_time = started_at.elapsed();
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Start the clock when the snake makes its first move
    pub fn on_game_start(&mut self) {
        self.started_at = Some(Instant::now());
        self.elapsed_time = Duration::ZERO;
        self.new_high_score = false;
    }

    /// Clear the clock for a game that has not started moving yet
    pub fn on_game_reset(&mut self) {
        self.started_at = None;
        self.elapsed_time = Duration::ZERO;
        self.new_high_score = false;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.update();
        self.started_at = None;
        self.games_played += 1;
        self.new_high_score = final_score > self.high_score;
        if self.new_high_score {
            self.high_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

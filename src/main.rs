use anyhow::{Context, Result};
use clap::Parser;
use snake_game::game::{Difficulty, GameConfig, GameEngine, SnakeLength};
use snake_game::modes::HumanMode;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;

#[derive(Parser)]
#[command(name = "snake")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Starting snake length
    #[arg(long, value_enum)]
    length: Option<SnakeLength>,

    /// Number of fruits on the board (1-5)
    #[arg(long)]
    fruits: Option<usize>,

    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Seed for fruit placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Start playing immediately instead of showing the menu
    #[arg(long)]
    skip_menu: bool,

    /// Where to write logs ("-" disables logging)
    #[arg(long, default_value = "snake.log")]
    log_file: String,
}

impl Cli {
    /// Defaults, then the config file, then command-line flags
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(length) = self.length {
            config = config.with_length(length);
        }
        if let Some(fruits) = self.fruits {
            config = config.with_fruit_count(fruits);
        }
        if let Some(difficulty) = self.difficulty {
            config = config.with_difficulty(difficulty);
        }

        config.validate().context("Invalid game settings")?;
        Ok(config)
    }
}

fn init_logging(log_file: &str) -> Result<()> {
    if log_file == "-" {
        return Ok(());
    }

    // The terminal belongs to the game, so logs go to a file
    let file =
        File::create(log_file).with_context(|| format!("Failed to create log file {log_file}"))?;
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let config = cli.game_config()?;
    info!(?config, seed = ?cli.seed, "starting snake");

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    };

    let mut human_mode = HumanMode::with_engine(engine);
    if cli.skip_menu {
        human_mode = human_mode.skip_menu();
    }
    human_mode.run().await?;

    Ok(())
}

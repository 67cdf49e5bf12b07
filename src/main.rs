use anyhow::{Context, Result};
use clap::Parser;
use fruit_snake::game::{Cell, GameConfig};
use fruit_snake::modes::HumanMode;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fruit_snake")]
#[command(version, about = "Snake with apples, oranges, grapes and bananas")]
struct Cli {
    /// Board width in board units
    #[arg(long, default_value = "810")]
    width: i32,

    /// Board height in board units
    #[arg(long, default_value = "600")]
    height: i32,

    /// Side length of one cell
    #[arg(long, default_value = "30")]
    cell_size: i32,

    /// Milliseconds between ticks at the start of each game
    #[arg(long, default_value = "100")]
    tick_ms: u64,

    /// Fastest tick interval food can push the game to
    #[arg(long, default_value = "20")]
    min_tick_ms: u64,

    /// Turn requests that may wait for a tick
    #[arg(long, default_value = "3")]
    turn_buffer: usize,

    /// Spawn column; defaults to the middle of the board
    #[arg(long)]
    spawn_col: Option<i32>,

    /// Spawn row; defaults to the middle of the board
    #[arg(long)]
    spawn_row: Option<i32>,

    /// Write logs here (filtered by RUST_LOG, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        let columns = self.width / self.cell_size.max(1);
        let rows = self.height / self.cell_size.max(1);
        let spawn = Cell::center_of(
            self.spawn_col.unwrap_or(columns / 2),
            self.spawn_row.unwrap_or(rows / 2),
            self.cell_size,
        );

        GameConfig {
            board_width: self.width,
            board_height: self.height,
            cell_size: self.cell_size,
            spawn,
            initial_tick_interval_ms: self.tick_ms,
            min_tick_interval_ms: self.min_tick_ms,
            turn_buffer_capacity: self.turn_buffer,
            ..GameConfig::default()
        }
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal UI owns stderr, so logs only go to a file when asked for
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = cli.game_config();
    tracing::info!(?config, "configuration loaded");

    let mut human_mode = HumanMode::new(config).context("Invalid game configuration")?;
    human_mode.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fruit_snake::game::ConfigError;

    #[test]
    fn test_default_flags_match_default_config() {
        let cli = Cli::parse_from(["fruit_snake"]);
        assert_eq!(cli.game_config(), GameConfig::default());
    }

    #[test]
    fn test_spawn_flags() {
        let cli = Cli::parse_from(["fruit_snake", "--spawn-col", "0", "--spawn-row", "2"]);
        assert_eq!(cli.game_config().spawn, Cell::new(15, 75));
    }

    #[test]
    fn test_far_spawn_flags_fail_validation() {
        let cli = Cli::parse_from(["fruit_snake", "--spawn-col", "100000000"]);
        assert!(matches!(
            cli.game_config().validate(),
            Err(ConfigError::SpawnOutOfBounds { .. })
        ));

        let cli = Cli::parse_from(["fruit_snake", "--spawn-row=-100000000"]);
        assert!(matches!(
            cli.game_config().validate(),
            Err(ConfigError::SpawnOutOfBounds { .. })
        ));
    }
}

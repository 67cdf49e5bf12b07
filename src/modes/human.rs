use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::game::{ConfigError, GameConfig, GameEngine};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Interactive play in the terminal
pub struct HumanMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

fn build_tick_timer(interval_ms: u64) -> Interval {
    let mut timer = interval(Duration::from_millis(interval_ms));
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

/// Tracks the period the tick timer was last built with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TickSchedule {
    current_ms: u64,
}

impl TickSchedule {
    fn new(interval_ms: u64) -> Self {
        Self {
            current_ms: interval_ms,
        }
    }

    /// Returns the new period when the session's interval moved away from the current one
    fn follow(&mut self, wanted_ms: u64) -> Option<Duration> {
        if wanted_ms == self.current_ms {
            return None;
        }
        debug!(from = self.current_ms, to = wanted_ms, "tick interval changed");
        self.current_ms = wanted_ms;
        Some(Duration::from_millis(wanted_ms))
    }
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let renderer = Renderer::new(config.cell_size);
        let engine = GameEngine::new(config)?;

        Ok(Self {
            engine,
            metrics: GameMetrics::new(),
            renderer,
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        info!(
            width = self.engine.config().board_width,
            height = self.engine.config().board_height,
            cell = self.engine.config().cell_size,
            "starting human mode"
        );

        let result = self.run_game_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // The tick rate follows the session and is rebuilt whenever food changes it
        let mut schedule = TickSchedule::new(self.engine.tick_interval_ms());
        let mut tick_timer = build_tick_timer(schedule.current_ms);

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = tick_timer.tick() => {
                    self.update_game();
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.engine.state(), &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            if schedule.follow(self.engine.tick_interval_ms()).is_some() {
                tick_timer = build_tick_timer(schedule.current_ms);
                tick_timer.reset();
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Turn(direction) => self.engine.turn(direction),
                KeyAction::Restart => self.restart(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    fn update_game(&mut self) {
        if self.engine.is_game_over() {
            return;
        }

        let result = self.engine.tick();

        if let Some(kind) = result.info.eaten {
            self.metrics.on_food_eaten(kind);
        }

        if result.game_over {
            self.metrics.on_game_over(self.engine.score());
        }
    }

    fn restart(&mut self) {
        if !self.engine.is_game_over() {
            return;
        }
        self.engine.restart();
        self.metrics.on_game_start();
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, Phase};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_game_initialization() {
        let mode = HumanMode::new(GameConfig::default()).expect("valid config");
        assert_eq!(mode.engine.phase(), Phase::Playing);
        assert_eq!(mode.engine.score(), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GameConfig {
            board_height: 0,
            ..GameConfig::default()
        };
        assert!(HumanMode::new(config).is_err());
    }

    #[test]
    fn test_quit_key() {
        let mut mode = HumanMode::new(GameConfig::default()).expect("valid config");
        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }

    #[test]
    fn test_game_over_then_restart() {
        let config = GameConfig {
            spawn: Cell::new(795, 315),
            ..GameConfig::default()
        };
        let mut mode = HumanMode::new(config).expect("valid config");

        mode.handle_event(key(KeyCode::Char('r')));
        assert_eq!(mode.metrics.games_played, 0);

        mode.update_game();
        assert!(mode.engine.is_game_over());
        assert_eq!(mode.metrics.games_played, 1);

        mode.update_game();
        assert_eq!(mode.metrics.games_played, 1);

        mode.handle_event(key(KeyCode::Char('r')));
        assert_eq!(mode.engine.phase(), Phase::Playing);
        assert_eq!(mode.engine.snake_cells(), &[Cell::new(795, 315)]);
    }

    #[test]
    fn test_tick_schedule_follows_interval_changes() {
        let mut schedule = TickSchedule::new(100);
        assert_eq!(schedule.follow(100), None);

        assert_eq!(schedule.follow(95), Some(Duration::from_millis(95)));
        assert_eq!(schedule.current_ms, 95);
        assert_eq!(schedule.follow(95), None);

        assert_eq!(schedule.follow(100), Some(Duration::from_millis(100)));
        assert_eq!(schedule.follow(100), None);
    }

    #[test]
    fn test_tick_schedule_catches_up_with_engine() {
        let mode = HumanMode::new(GameConfig::default()).expect("valid config");
        let mut schedule = TickSchedule::new(40);

        assert_eq!(
            schedule.follow(mode.engine.tick_interval_ms()),
            Some(Duration::from_millis(100))
        );
        assert_eq!(schedule.follow(mode.engine.tick_interval_ms()), None);
    }
}

use rand::Rng;
use rand::rngs::ThreadRng;
use tracing::{debug, info};

use super::{
    config::{ConfigError, GameConfig},
    direction::Direction,
    food::{Food, FoodKind},
    rules::{self, CollisionType},
    state::{Cell, GameState, Phase, Rgb, Snake},
};

/// Information about a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickInfo {
    /// Kind of food eaten this tick, if any
    pub eaten: Option<FoodKind>,
    /// Type of collision if one occurred
    pub collision: Option<CollisionType>,
}

/// Result of a game tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    /// Whether the session is over after this tick
    pub game_over: bool,
    /// Additional information about the tick
    pub info: TickInfo,
}

/// The game engine that owns one session and applies all game rules
///
/// Generic over the random source so food placement can be made
/// deterministic.
pub struct GameEngine<R = ThreadRng> {
    config: GameConfig,
    rng: R,
    state: GameState,
}

impl GameEngine<ThreadRng> {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> GameEngine<R> {
    /// Create an engine drawing food and colors from `rng`
    pub fn with_rng(config: GameConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = Self::initial_state(&config, &mut rng);

        Ok(Self { config, rng, state })
    }

    fn initial_state(config: &GameConfig, rng: &mut R) -> GameState {
        let snake = Snake::new(config.spawn, config.initial_direction, 1, config.cell_size)
            .with_turn_buffer(config.turn_buffer_capacity);
        let food = Food::spawn(rng, config.board_width, config.board_height, config.cell_size);

        GameState::new(
            snake,
            food,
            config.board_width,
            config.board_height,
            config.initial_tick_interval_ms,
        )
    }

    /// Advance the simulation by one step
    ///
    /// A no-op once the game is over.
    pub fn tick(&mut self) -> TickResult {
        if self.state.is_game_over() {
            return TickResult {
                game_over: true,
                info: TickInfo {
                    eaten: None,
                    collision: None,
                },
            };
        }

        self.state.snake.move_snake();
        self.state.steps += 1;

        if let Some(collision) = rules::detect_collision(
            &self.state.snake,
            self.state.board_width,
            self.state.board_height,
        ) {
            info!(
                ?collision,
                score = self.state.score,
                length = self.state.snake.len(),
                steps = self.state.steps,
                "game over"
            );
            self.state.phase = Phase::GameOver;
            self.state.snake.reset();

            return TickResult {
                game_over: true,
                info: TickInfo {
                    eaten: None,
                    collision: Some(collision),
                },
            };
        }

        let eaten = if rules::eats_food(&self.state.snake, &self.state.food) {
            let kind = self.state.food.kind;
            self.apply_food(kind);
            self.state.food.respawn(
                &mut self.rng,
                self.config.board_width,
                self.config.board_height,
                self.config.cell_size,
            );
            debug!(
                next = ?self.state.food.kind,
                at = ?self.state.food.position,
                "food respawned"
            );
            Some(kind)
        } else {
            None
        };

        TickResult {
            game_over: false,
            info: TickInfo {
                eaten,
                collision: None,
            },
        }
    }

    fn apply_food(&mut self, kind: FoodKind) {
        let effect = kind.effect();

        self.state.score += effect.score;
        self.state.tick_interval_ms = self
            .state
            .tick_interval_ms
            .saturating_add_signed(effect.speed_delta_ms)
            .max(self.config.min_tick_interval_ms);

        for _ in 0..effect.growth {
            self.state.snake.grow();
        }

        if effect.recolors_snake {
            self.state.snake.change_color_to_random(&mut self.rng);
        }

        debug!(
            food = kind.name(),
            score = self.state.score,
            interval_ms = self.state.tick_interval_ms,
            length = self.state.snake.len(),
            "food eaten"
        );
    }

    /// Submit a directional input for an upcoming tick
    ///
    /// Ignored when the game is over or when it reverses the last accepted turn.
    pub fn turn(&mut self, direction: Direction) {
        if self.state.is_game_over() {
            return;
        }
        self.state.snake.set_direction(direction);
    }

    /// Start a fresh game after a game over
    ///
    /// Does nothing while a game is still in progress.
    pub fn restart(&mut self) {
        if !self.state.is_game_over() {
            debug!("restart ignored while playing");
            return;
        }

        self.state.snake.reset();
        self.state.food.respawn(
            &mut self.rng,
            self.config.board_width,
            self.config.board_height,
            self.config.cell_size,
        );
        self.state.score = 0;
        self.state.steps = 0;
        self.state.tick_interval_ms = self.config.initial_tick_interval_ms;
        self.state.phase = Phase::Playing;

        info!("game restarted");
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snake_cells(&self) -> &[Cell] {
        &self.state.snake.body
    }

    pub fn snake_color(&self) -> Rgb {
        self.state.snake.color
    }

    pub fn food(&self) -> Food {
        self.state.food
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    /// Current delay between ticks in milliseconds
    pub fn tick_interval_ms(&self) -> u64 {
        self.state.tick_interval_ms
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }
}

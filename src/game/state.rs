use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::direction::Direction;
use super::food::Food;

/// A grid-aligned position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Centre point of the cell at grid column `col`, row `row`
    ///
    /// Saturates at the `i32` limits, which always lie off the board.
    pub fn center_of(col: i32, row: i32, cell_size: i32) -> Self {
        let center = |index: i32| index.saturating_mul(cell_size).saturating_add(cell_size / 2);
        Self {
            x: center(col),
            y: center(row),
        }
    }

    /// Move position by delta, saturating at the `i32` limits
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Step one cell in a direction
    pub fn stepped(&self, direction: Direction, cell_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx.saturating_mul(cell_size), dy.saturating_mul(cell_size))
    }

    /// True when this is the centre of some grid cell
    pub fn is_cell_center(&self, cell_size: i32) -> bool {
        let half = cell_size / 2;
        self.x.saturating_sub(half).rem_euclid(cell_size) == 0
            && self.y.saturating_sub(half).rem_euclid(cell_size) == 0
    }

    /// Grid column and row containing this position
    pub fn grid_index(&self, cell_size: i32) -> (i32, i32) {
        (self.x.div_euclid(cell_size), self.y.div_euclid(cell_size))
    }
}

/// Display color of the snake, channels in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Convert to 8-bit channels for a renderer
    pub fn to_u8(&self) -> (u8, u8, u8) {
        let scale = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (scale(self.r), scale(self.g), scale(self.b))
    }
}

const DEFAULT_TURN_BUFFER: usize = 3;

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Cell>,
    /// Direction used by the most recent move
    pub direction: Direction,
    /// Current display color
    pub color: Rgb,
    pending_turns: VecDeque<Direction>,
    last_accepted: Direction,
    turn_buffer: usize,
    cell_size: i32,
    spawn: Cell,
    spawn_direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    ///
    /// Extra segments are laid out behind the head; [`Snake::reset`] always
    /// returns to a single segment at `head`.
    pub fn new(head: Cell, direction: Direction, length: usize, cell_size: i32) -> Self {
        let mut body = vec![head];
        let back = direction.opposite();

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.stepped(back, cell_size));
        }

        Self {
            body,
            direction,
            color: Rgb::WHITE,
            pending_turns: VecDeque::with_capacity(DEFAULT_TURN_BUFFER),
            last_accepted: direction,
            turn_buffer: DEFAULT_TURN_BUFFER,
            cell_size,
            spawn: head,
            spawn_direction: direction,
        }
    }

    /// Limit how many turn requests may wait for a tick
    pub fn with_turn_buffer(mut self, capacity: usize) -> Self {
        self.turn_buffer = capacity.max(1);
        self
    }

    /// Get the head position
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Cell] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Cell) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Turns queued for upcoming ticks, oldest first
    pub fn pending_turns(&self) -> impl Iterator<Item = Direction> + '_ {
        self.pending_turns.iter().copied()
    }

    /// Direction the next reversal check is made against
    pub fn last_accepted_direction(&self) -> Direction {
        self.last_accepted
    }

    /// Queue a turn for a later tick
    ///
    /// Reversals of the last accepted direction are dropped, as are requests
    /// beyond the buffer capacity. Returns whether the turn was queued.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if direction.is_opposite(self.last_accepted) {
            trace!(?direction, last = ?self.last_accepted, "rejected reversing turn");
            return false;
        }

        if self.pending_turns.len() >= self.turn_buffer {
            trace!(?direction, "turn buffer full");
            return false;
        }

        self.pending_turns.push_back(direction);
        self.last_accepted = direction;
        true
    }

    /// Advance one cell, consuming at most one queued turn
    pub fn move_snake(&mut self) {
        if let Some(turn) = self.pending_turns.pop_front() {
            self.direction = turn;
        }

        let new_head = self.head().stepped(self.direction, self.cell_size);
        self.body.insert(0, new_head);
        self.body.pop();
    }

    /// Append one segment behind the tail, opposite to the direction of travel
    pub fn grow(&mut self) {
        let new_tail = self.tail().stepped(self.direction.opposite(), self.cell_size);
        self.body.push(new_tail);
    }

    /// Pick a fresh uniformly random display color
    pub fn change_color_to_random<R: Rng>(&mut self, rng: &mut R) {
        self.color = Rgb::new(rng.r#gen(), rng.r#gen(), rng.r#gen());
    }

    /// Return to the single spawn segment, default direction and color
    pub fn reset(&mut self) {
        self.body.clear();
        self.body.push(self.spawn);
        self.pending_turns.clear();
        self.direction = self.spawn_direction;
        self.last_accepted = self.spawn_direction;
        self.color = Rgb::WHITE;
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Whether the session is running or waiting for a restart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Playing,
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Food,
    pub board_width: i32,
    pub board_height: i32,
    pub score: u32,
    pub steps: u32,
    pub tick_interval_ms: u64,
    pub phase: Phase,
}

impl GameState {
    /// Create a new game state
    pub fn new(
        snake: Snake,
        food: Food,
        board_width: i32,
        board_height: i32,
        tick_interval_ms: u64,
    ) -> Self {
        Self {
            snake,
            food,
            board_width,
            board_height,
            score: 0,
            steps: 0,
            tick_interval_ms,
            phase: Phase::Playing,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Check if a position is within the half-open board bounds
    pub fn is_in_bounds(&self, pos: Cell) -> bool {
        pos.x >= 0 && pos.x < self.board_width && pos.y >= 0 && pos.y < self.board_height
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Cell) -> bool {
        self.snake.body.contains(&pos)
    }
}

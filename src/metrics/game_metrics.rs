use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::game::FoodKind;

pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    pub foods_eaten: HashMap<FoodKind, u32>,
    running: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            foods_eaten: HashMap::new(),
            running: true,
        }
    }

    /// Refresh the elapsed time; frozen once the game is over
    pub fn update(&mut self) {
        if self.running {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.foods_eaten.clear();
        self.running = true;
    }

    pub fn on_food_eaten(&mut self, kind: FoodKind) {
        *self.foods_eaten.entry(kind).or_insert(0) += 1;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.update();
        self.running = false;
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    pub fn eaten(&self, kind: FoodKind) -> u32 {
        self.foods_eaten.get(&kind).copied().unwrap_or(0)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_high_score_tracking() {
        let mut metrics = GameMetrics::new();

        metrics.on_game_over(10);
        assert_eq!(metrics.high_score, 10);
        assert_eq!(metrics.games_played, 1);

        metrics.on_game_over(5);
        assert_eq!(metrics.high_score, 10); // Should not decrease
        assert_eq!(metrics.games_played, 2);

        metrics.on_game_over(15);
        assert_eq!(metrics.high_score, 15);
        assert_eq!(metrics.games_played, 3);
    }

    #[test]
    fn test_food_counts_reset_per_game() {
        let mut metrics = GameMetrics::new();
        metrics.on_food_eaten(FoodKind::Apple);
        metrics.on_food_eaten(FoodKind::Apple);
        metrics.on_food_eaten(FoodKind::Banana);

        assert_eq!(metrics.eaten(FoodKind::Apple), 2);
        assert_eq!(metrics.eaten(FoodKind::Banana), 1);
        assert_eq!(metrics.eaten(FoodKind::Grape), 0);

        metrics.on_game_start();
        assert_eq!(metrics.eaten(FoodKind::Apple), 0);
    }

    #[test]
    fn test_clock_stops_at_game_over() {
        let mut metrics = GameMetrics::new();
        metrics.on_game_over(3);
        let frozen = metrics.elapsed_time;

        std::thread::sleep(Duration::from_millis(20));
        metrics.update();
        assert_eq!(metrics.elapsed_time, frozen);

        metrics.on_game_start();
        metrics.update();
        assert!(metrics.elapsed_time.as_millis() < 20);
    }
}

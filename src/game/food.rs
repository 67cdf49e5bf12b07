use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Cell, Rgb};

/// The kinds of food that can appear on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    Apple,
    Orange,
    Grape,
    Banana,
}

/// What eating a piece of food does to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoodEffect {
    /// Points added to the score
    pub score: u32,
    /// Change to the tick interval; negative speeds the game up
    pub speed_delta_ms: i64,
    /// Segments added to the snake
    pub growth: u32,
    /// Whether the snake takes a new random color
    pub recolors_snake: bool,
}

impl FoodKind {
    pub const ALL: [FoodKind; 4] = [
        FoodKind::Apple,
        FoodKind::Orange,
        FoodKind::Grape,
        FoodKind::Banana,
    ];

    /// Pick a kind uniformly at random
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn effect(&self) -> FoodEffect {
        match self {
            FoodKind::Apple => FoodEffect {
                score: 1,
                speed_delta_ms: -5,
                growth: 1,
                recolors_snake: false,
            },
            FoodKind::Orange => FoodEffect {
                score: 1,
                speed_delta_ms: 5,
                growth: 1,
                recolors_snake: false,
            },
            FoodKind::Grape => FoodEffect {
                score: 5,
                speed_delta_ms: 0,
                growth: 1,
                recolors_snake: false,
            },
            FoodKind::Banana => FoodEffect {
                score: 1,
                speed_delta_ms: 0,
                growth: 1,
                recolors_snake: true,
            },
        }
    }

    /// Fixed display color for renderers
    pub fn color(&self) -> Rgb {
        match self {
            FoodKind::Apple => Rgb::new(1.0, 0.0, 0.0),
            FoodKind::Orange => Rgb::new(1.0, 0.5, 0.0),
            FoodKind::Grape => Rgb::new(0.5, 0.0, 0.5),
            FoodKind::Banana => Rgb::new(1.0, 1.0, 0.0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FoodKind::Apple => "apple",
            FoodKind::Orange => "orange",
            FoodKind::Grape => "grape",
            FoodKind::Banana => "banana",
        }
    }
}

/// The single active piece of food
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub kind: FoodKind,
    pub position: Cell,
}

impl Food {
    pub fn new(kind: FoodKind, position: Cell) -> Self {
        Self { kind, position }
    }

    /// A random kind at a random cell centre
    pub fn spawn<R: Rng>(rng: &mut R, bounds_x: i32, bounds_y: i32, cell_size: i32) -> Self {
        let mut food = Self::new(FoodKind::random(rng), Cell::new(0, 0));
        food.place_random(rng, bounds_x, bounds_y, cell_size);
        food
    }

    /// Move to the centre of a uniformly chosen cell of the board
    ///
    /// Snake occupancy is not considered, so food can land on the body.
    pub fn place_random<R: Rng>(
        &mut self,
        rng: &mut R,
        bounds_x: i32,
        bounds_y: i32,
        cell_size: i32,
    ) {
        let col = rng.gen_range(0..bounds_x / cell_size);
        let row = rng.gen_range(0..bounds_y / cell_size);
        self.position = Cell::center_of(col, row, cell_size);
    }

    /// Replace this food in place with a fresh random one
    pub fn respawn<R: Rng>(&mut self, rng: &mut R, bounds_x: i32, bounds_y: i32, cell_size: i32) {
        *self = Self::spawn(rng, bounds_x, bounds_y, cell_size);
    }

    pub fn is_at(&self, pos: Cell) -> bool {
        self.position == pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashSet;

    #[test]
    fn test_effect_table() {
        let apple = FoodKind::Apple.effect();
        assert_eq!((apple.score, apple.speed_delta_ms, apple.growth), (1, -5, 1));
        assert!(!apple.recolors_snake);

        let orange = FoodKind::Orange.effect();
        assert_eq!((orange.score, orange.speed_delta_ms, orange.growth), (1, 5, 1));

        let grape = FoodKind::Grape.effect();
        assert_eq!((grape.score, grape.speed_delta_ms, grape.growth), (5, 0, 1));

        let banana = FoodKind::Banana.effect();
        assert_eq!((banana.score, banana.speed_delta_ms), (1, 0));
        assert!(banana.recolors_snake);
    }

    #[test]
    fn test_placement_is_cell_centred_and_in_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut food = Food::new(FoodKind::Apple, Cell::new(0, 0));

        for _ in 0..500 {
            food.place_random(&mut rng, 810, 600, 30);
            let Cell { x, y } = food.position;
            assert!((0..810).contains(&x));
            assert!((0..600).contains(&y));
            assert_eq!(x % 30, 15);
            assert_eq!(y % 30, 15);
        }
    }

    #[test]
    fn test_random_kind_covers_all_variants() {
        let mut rng = StdRng::seed_from_u64(3);
        let seen: HashSet<FoodKind> = (0..200).map(|_| FoodKind::random(&mut rng)).collect();
        assert_eq!(seen.len(), FoodKind::ALL.len());
    }

    #[test]
    fn test_single_cell_board() {
        let mut rng = StdRng::seed_from_u64(0);
        let food = Food::spawn(&mut rng, 30, 30, 30);
        assert!(food.is_at(Cell::new(15, 15)));
    }
}

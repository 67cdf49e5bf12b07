//! Collision predicates used by the engine each tick.
//!
//! Checks run against the head after it has moved, in a fixed order: walls,
//! then the snake's own body, then food.

use super::food::Food;
use super::state::{Cell, Snake};

/// Type of collision that ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the board
    Wall,
    /// Snake ran into itself
    SelfCollision,
}

/// True when `pos` lies outside `[0, width) x [0, height)`
pub fn hits_wall(pos: Cell, width: i32, height: i32) -> bool {
    pos.x < 0 || pos.x >= width || pos.y < 0 || pos.y >= height
}

/// True when the head overlaps any other segment
pub fn hits_self(snake: &Snake) -> bool {
    snake.collides_with_body(snake.head())
}

pub fn eats_food(snake: &Snake, food: &Food) -> bool {
    food.is_at(snake.head())
}

/// The fatal collision for the current head, walls taking precedence
pub fn detect_collision(snake: &Snake, width: i32, height: i32) -> Option<CollisionType> {
    if hits_wall(snake.head(), width, height) {
        return Some(CollisionType::Wall);
    }

    if hits_self(snake) {
        return Some(CollisionType::SelfCollision);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::direction::Direction;
    use crate::game::food::FoodKind;

    #[test]
    fn test_wall_bounds_are_half_open() {
        assert!(!hits_wall(Cell::new(0, 0), 810, 600));
        assert!(!hits_wall(Cell::new(795, 585), 810, 600));
        assert!(hits_wall(Cell::new(810, 315), 810, 600));
        assert!(hits_wall(Cell::new(405, 600), 810, 600));
        assert!(hits_wall(Cell::new(-15, 315), 810, 600));
        assert!(hits_wall(Cell::new(405, -15), 810, 600));
    }

    #[test]
    fn test_self_collision_ignores_head() {
        let mut snake = Snake::new(Cell::new(105, 105), Direction::Right, 3, 30);
        assert!(!hits_self(&snake));

        snake.body.push(Cell::new(105, 105));
        assert!(hits_self(&snake));
    }

    #[test]
    fn test_wall_reported_before_self() {
        let mut snake = Snake::new(Cell::new(825, 105), Direction::Right, 2, 30);
        snake.body.push(Cell::new(825, 105));
        assert_eq!(detect_collision(&snake, 810, 600), Some(CollisionType::Wall));

        snake.body[0] = Cell::new(795, 105);
        snake.body[2] = Cell::new(795, 105);
        assert_eq!(
            detect_collision(&snake, 810, 600),
            Some(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_food_requires_exact_match() {
        let snake = Snake::new(Cell::new(435, 315), Direction::Right, 1, 30);
        assert!(eats_food(&snake, &Food::new(FoodKind::Apple, Cell::new(435, 315))));
        assert!(!eats_food(&snake, &Food::new(FoodKind::Apple, Cell::new(465, 315))));
    }
}

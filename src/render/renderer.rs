use std::collections::HashSet;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{FoodKind, GameState, Rgb};
use crate::metrics::GameMetrics;

/// Draws a [`GameState`] as a character grid, one terminal cell pair per board cell
pub struct Renderer {
    cell_size: i32,
}

fn to_color(rgb: Rgb) -> Color {
    let (r, g, b) = rgb.to_u8();
    Color::Rgb(r, g, b)
}

impl Renderer {
    pub fn new(cell_size: i32) -> Self {
        Self { cell_size }
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, metrics), chunks[0]);

        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if state.is_game_over() {
            frame.render_widget(self.render_game_over(state, metrics), game_area);
        } else {
            frame.render_widget(self.render_grid(state), game_area);
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let columns = state.board_width / self.cell_size;
        let rows = state.board_height / self.cell_size;

        let head = state.snake.head().grid_index(self.cell_size);
        let body: HashSet<(i32, i32)> = state
            .snake
            .body_segments()
            .iter()
            .map(|cell| cell.grid_index(self.cell_size))
            .collect();
        let food = state.food.position.grid_index(self.cell_size);

        let snake_color = to_color(state.snake.color);
        let food_color = to_color(state.food.kind.color());

        let mut lines = Vec::with_capacity(rows as usize);

        for row in 0..rows {
            let mut spans = Vec::with_capacity(columns as usize);

            for col in 0..columns {
                let index = (col, row);

                let cell = if index == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(snake_color)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if body.contains(&index) {
                    Span::styled("□ ", Style::default().fg(snake_color))
                } else if index == food {
                    Span::styled(
                        food_glyph(state.food.kind),
                        Style::default().fg(food_color).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(state.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Length: ", label),
            Span::styled(state.snake.len().to_string(), value),
            Span::raw("    "),
            Span::styled("Tick: ", label),
            Span::styled(format!("{}ms", state.tick_interval_ms), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.to_string(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let eaten: Vec<Span> = FoodKind::ALL
            .iter()
            .flat_map(|kind| {
                [
                    Span::styled(
                        format!("{} ", food_glyph(*kind).trim_end()),
                        Style::default().fg(to_color(kind.color())),
                    ),
                    Span::styled(
                        format!("{}  ", metrics.eaten(*kind)),
                        Style::default().fg(Color::White),
                    ),
                ]
            })
            .collect();

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
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
            Line::from(eaten),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

fn food_glyph(kind: FoodKind) -> &'static str {
    match kind {
        FoodKind::Apple => "A ",
        FoodKind::Orange => "O ",
        FoodKind::Grape => "G ",
        FoodKind::Banana => "B ",
    }
}

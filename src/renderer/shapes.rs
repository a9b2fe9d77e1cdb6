//! Display list generation
//!
//! Turns a `GameState` into an ordered list of 2D primitives. Kept free of
//! browser types so the draw order and geometry can be tested natively.

use glam::Vec2;

use crate::sim::{GameState, Player, Pursuer, Rect, Viewport};

/// Background grid stroke
pub const GRID_COLOR: &str = "rgba(255,255,255,0.05)";
pub const GRID_LINE_WIDTH: f32 = 2.0;
/// Vertical distance between horizontal grid lines
pub const GRID_ROW_SPACING: f32 = 100.0;
/// Number of vertical grid columns
pub const GRID_COLUMNS: f32 = 5.0;

pub const PLAYER_GLOW: f32 = 15.0;
pub const OBSTACLE_GLOW: f32 = 10.0;
pub const COIN_STROKE_WIDTH: f32 = 2.0;

/// One drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Wipe the whole surface
    Clear { width: f32, height: f32 },
    Line {
        from: Vec2,
        to: Vec2,
        color: &'static str,
        width: f32,
    },
    /// Filled rectangle with a same-colored shadow glow
    GlowRect {
        rect: Rect,
        color: &'static str,
        blur: f32,
    },
    /// Portrait clipped to the circle inscribed in `rect`, then ringed.
    /// `fallback` fills the clip when the image can't be drawn.
    Portrait {
        rect: Rect,
        fallback: &'static str,
        ring: &'static str,
        ring_width: f32,
    },
    Disc {
        center: Vec2,
        radius: f32,
        fill: &'static str,
        stroke: &'static str,
        stroke_width: f32,
    },
}

/// Scrolling grid: fixed columns, rows drifting down with the game speed
pub fn background_grid(viewport: Viewport, frame_count: u64, game_speed: f32) -> Vec<Shape> {
    let mut shapes = Vec::new();
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return shapes;
    }

    let column_spacing = viewport.width / GRID_COLUMNS;
    let mut x = 0.0;
    while x < viewport.width {
        shapes.push(Shape::Line {
            from: Vec2::new(x, 0.0),
            to: Vec2::new(x, viewport.height),
            color: GRID_COLOR,
            width: GRID_LINE_WIDTH,
        });
        x += column_spacing;
    }

    let scroll = frame_count as f32 * game_speed;
    let mut row = 0.0;
    while row < viewport.height {
        let y = (row + scroll).rem_euclid(viewport.height);
        shapes.push(Shape::Line {
            from: Vec2::new(0.0, y),
            to: Vec2::new(viewport.width, y),
            color: GRID_COLOR,
            width: GRID_LINE_WIDTH,
        });
        row += GRID_ROW_SPACING;
    }

    shapes
}

pub fn player_shape(player: &Player) -> Shape {
    Shape::GlowRect {
        rect: player.rect(),
        color: Player::COLOR,
        blur: PLAYER_GLOW,
    }
}

pub fn pursuer_shape(pursuer: &Pursuer) -> Shape {
    Shape::Portrait {
        rect: pursuer.rect(),
        fallback: Pursuer::RING_COLOR,
        ring: Pursuer::RING_COLOR,
        ring_width: Pursuer::RING_WIDTH,
    }
}

/// Full frame: clear, grid, player, pursuer, obstacles, coins
pub fn scene(state: &GameState) -> Vec<Shape> {
    let viewport = state.viewport;
    let mut shapes = vec![Shape::Clear {
        width: viewport.width,
        height: viewport.height,
    }];
    shapes.extend(background_grid(viewport, state.frame_count, state.game_speed));
    shapes.push(player_shape(&state.player));
    shapes.push(pursuer_shape(&state.pursuer));

    shapes.extend(state.obstacles.iter().map(|o| Shape::GlowRect {
        rect: o.rect(),
        color: o.kind.color(),
        blur: OBSTACLE_GLOW,
    }));

    shapes.extend(state.coins.iter().map(|c| Shape::Disc {
        center: c.center,
        radius: c.radius,
        fill: crate::sim::Coin::FILL,
        stroke: crate::sim::Coin::STROKE,
        stroke_width: COIN_STROKE_WIDTH,
    }));

    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, tick};
    use crate::tuning::Tuning;

    fn horizontal_rows(shapes: &[Shape]) -> Vec<f32> {
        shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Line { from, to, .. } if from.y == to.y => Some(from.y),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_grid_columns_and_rows() {
        let shapes = background_grid(Viewport::new(1000.0, 450.0), 0, 3.5);
        let columns = shapes
            .iter()
            .filter(|s| matches!(s, Shape::Line { from, to, .. } if from.x == to.x))
            .count();
        assert_eq!(columns, 5);
        assert_eq!(horizontal_rows(&shapes), vec![0.0, 100.0, 200.0, 300.0, 400.0]);
    }

    #[test]
    fn test_grid_rows_scroll_and_wrap() {
        let shapes = background_grid(Viewport::new(1000.0, 450.0), 10, 5.0);
        assert_eq!(horizontal_rows(&shapes), vec![50.0, 150.0, 250.0, 350.0, 0.0]);
    }

    #[test]
    fn test_empty_viewport_draws_no_grid() {
        assert!(background_grid(Viewport::new(0.0, 0.0), 3, 4.0).is_empty());
    }

    #[test]
    fn test_scene_order() {
        let mut state = GameState::new(8, Viewport::new(1024.0, 768.0), Tuning::default());
        state.start();
        tick(&mut state, &TickInput::default());

        let shapes = scene(&state);
        assert!(matches!(shapes[0], Shape::Clear { .. }));
        let player_idx = shapes
            .iter()
            .position(|s| matches!(s, Shape::GlowRect { color, .. } if *color == Player::COLOR))
            .unwrap();
        assert!(matches!(shapes[player_idx + 1], Shape::Portrait { .. }));
        assert!(matches!(shapes.last(), Some(Shape::Disc { .. })));
        let glow_rects = shapes
            .iter()
            .filter(|s| matches!(s, Shape::GlowRect { .. }))
            .count();
        assert_eq!(glow_rects, 1 + state.obstacles.len());
    }
}

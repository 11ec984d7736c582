//! Mapping from play-field pixels to a character grid.
//!
//! Paddles are always drawn with the same number of rows wherever they sit,
//! so a paddle never appears to grow or shrink while it moves.

use crate::config::Config;
use crate::geometry::{clamp, Rect};
use crate::types::{PlayField, Side};

/// Inclusive cell bounds
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CellRect {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

/// Converts world rectangles into grid cells for a `cols × rows` grid
#[derive(Debug, Copy, Clone)]
pub struct RenderHelper {
    cols: usize,
    rows: usize,
    field: PlayField,
    paddle_rows: usize,
}

impl RenderHelper {
    pub fn new(cols: usize, rows: usize, config: &Config) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let field = config.field;
        let scaled = config.paddle_height / field.play_height() * rows as f32;
        let paddle_rows = (scaled.round() as usize).clamp(1, rows);

        RenderHelper {
            cols,
            rows,
            field,
            paddle_rows,
        }
    }

    /// Rows every paddle occupies
    pub fn paddle_height_pixels(&self) -> usize {
        self.paddle_rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column holding world x (clamped to the grid)
    pub fn column(&self, x: f32) -> usize {
        let fraction = clamp(x / self.field.width, 0.0, 1.0);
        ((fraction * self.cols as f32) as usize).min(self.cols - 1)
    }

    /// Row holding world y (clamped to the grid)
    pub fn row(&self, y: f32) -> usize {
        let fraction = clamp((y - self.field.top) / self.field.play_height(), 0.0, 1.0);
        ((fraction * self.rows as f32) as usize).min(self.rows - 1)
    }

    /// Cells covered by a paddle. The top row follows the paddle; the height
    /// is fixed.
    pub fn get_paddle_rect(&self, paddle: &Rect, side: Side) -> CellRect {
        let top = self.row(paddle.top()).min(self.rows - self.paddle_rows);
        let mut left = self.column(paddle.left());
        let mut right = self.column(paddle.right()).max(left);

        // Keep paddles off the centre line even on very narrow grids
        match side {
            Side::Left => right = right.min(self.cols / 2).max(left),
            Side::Right => left = left.max(self.cols / 2 + 1).min(right),
        }

        CellRect {
            left,
            right,
            top,
            bottom: top + self.paddle_rows - 1,
        }
    }

    /// Cell holding the ball's centre
    pub fn get_ball_position(&self, ball: &Rect) -> (usize, usize) {
        (self.column(ball.center_x()), self.row(ball.center_y()))
    }
}

//! Line drawing
//!
//! Integer lines are walked with Bresenham's error-accumulator algorithm
//! and visit every grid point between the end points, both inclusive.
//! Real-valued segments are walked in `⌈length⌉` equal steps, so the
//! point density does not depend on the pixel grid.
//!
//! Visitors return `false` to stop the walk early.

use super::BitmapData;
use crate::color::Color;
use crate::error::Result;
use crate::sample::Sample;
use crate::vector::Vector;

// =============================================================================
// Walkers
// =============================================================================

/// Visit every integer point of the line from (x0, y0) to (x1, y1).
///
/// Points are visited in order from the first end point to the second.
/// The walk stops as soon as `visit` returns `false`.
pub fn bresenham(x0: i32, y0: i32, x1: i32, y1: i32, mut visit: impl FnMut(i32, i32) -> bool) {
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        if !visit(x, y) {
            return;
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Visit `⌈length⌉ + 1` evenly spaced points of the segment from
/// (x0, y0) to (x1, y1), end points included.
///
/// A zero-length segment visits its start point once.
pub fn walk_segment(x0: f64, y0: f64, x1: f64, y1: f64, mut visit: impl FnMut(f64, f64) -> bool) {
    let len_x = x1 - x0;
    let len_y = y1 - y0;
    let steps = len_x.hypot(len_y).ceil() as u32;
    if steps == 0 {
        visit(x0, y0);
        return;
    }

    let dx = len_x / steps as f64;
    let dy = len_y / steps as f64;
    let (mut x, mut y) = (x0, y0);
    for _ in 0..=steps {
        if !visit(x, y) {
            return;
        }
        x += dx;
        y += dy;
    }
}

// =============================================================================
// Drawing on a bitmap
// =============================================================================

impl<T: Sample> BitmapData<'_, T> {
    /// Walk the line from (x0, y0) to (x1, y1), calling `visit` for each
    /// point that lies inside the image.
    ///
    /// `visit` gets the bitmap itself, so it can plot or inspect pixels.
    pub fn draw_with<F>(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, mut visit: F)
    where
        F: FnMut(&mut Self, i32, i32) -> bool,
    {
        bresenham(x0, y0, x1, y1, |x, y| {
            if self.in_bounds(x, y) {
                visit(self, x, y)
            } else {
                true
            }
        });
    }

    /// Draw a line in a fixed color.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAlpha`](crate::Error::InvalidAlpha) if the
    /// line touches the image and the image cannot store the alpha of
    /// `color`. The walk stops at the first such pixel, before any write.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color<T>) -> Result<()> {
        let mut result = Ok(());
        self.draw_with(x0, y0, x1, y1, |bmp, x, y| {
            result = bmp.plot(x, y, color);
            result.is_ok()
        });
        result
    }

    /// Walk a real-valued segment, calling `visit` for every step.
    ///
    /// Unlike [`draw_with`](Self::draw_with), points are not clipped to
    /// the image.
    pub fn draw_subpixel_with<F>(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, mut visit: F)
    where
        F: FnMut(&mut Self, f64, f64) -> bool,
    {
        walk_segment(x0, y0, x1, y1, |x, y| visit(self, x, y));
    }

    /// Draw a line from (x0, y0) along `v`, ending at the rounded tip.
    pub fn draw_vector(&mut self, x0: i32, y0: i32, v: &Vector, color: Color<T>) -> Result<()> {
        let x1 = (x0 as f64 + v.vx()).round() as i32;
        let y1 = (y0 as f64 + v.vy()).round() as i32;
        self.draw_line(x0, y0, x1, y1, color)
    }
}

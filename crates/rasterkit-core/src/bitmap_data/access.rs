//! Pixel access functions
//!
//! Reading and writing single pixels by channel role, filling, sub-pixel
//! sampling and the per-pixel color tests.
//!
//! Getters take unsigned coordinates and panic when they are out of
//! bounds. [`BitmapData::plot`] takes signed coordinates and ignores
//! pixels outside the image, which is what line drawing needs.

use super::BitmapData;
use crate::color::{Color, Scalar};
use crate::error::Result;
use crate::interpolation::{SampleDomain, interpolate};
use crate::sample::Sample;
use rayon::prelude::*;

impl<T: Sample> BitmapData<'_, T> {
    #[inline]
    fn pixel(&self, x: u32, y: u32) -> &[T] {
        let off = self.offset(x, y);
        &self.buffer[off..off + self.channels as usize]
    }

    /// Get the red sample at (x, y). Gray images return the gray sample.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn get_red(&self, x: u32, y: u32) -> T {
        self.pixel(x, y)[self.roles.red]
    }

    /// Get the green sample at (x, y). Gray images return the gray sample.
    #[inline]
    pub fn get_green(&self, x: u32, y: u32) -> T {
        self.pixel(x, y)[self.roles.green]
    }

    /// Get the blue sample at (x, y). Gray images return the gray sample.
    #[inline]
    pub fn get_blue(&self, x: u32, y: u32) -> T {
        self.pixel(x, y)[self.roles.blue]
    }

    /// Get the alpha sample at (x, y), or `T::MAX` without an alpha channel.
    #[inline]
    pub fn get_alpha(&self, x: u32, y: u32) -> T {
        match self.roles.alpha {
            Some(a) => self.pixel(x, y)[a],
            None => T::MAX,
        }
    }

    /// Get the gray value at (x, y).
    ///
    /// Color pixels are converted with [`Color::to_gray`].
    #[inline]
    pub fn get_gray(&self, x: u32, y: u32) -> T {
        match self.roles.gray {
            Some(g) => self.pixel(x, y)[g],
            None => self.get(x, y).to_gray(),
        }
    }

    /// Get the color at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Color<T> {
        self.roles.read(self.pixel(x, y))
    }

    /// Sample the color at a real position.
    ///
    /// The position is clamped into `[0, width-1] × [0, height-1]`; integer
    /// positions return the stored pixel unchanged.
    ///
    /// # Panics
    ///
    /// Panics on an empty bitmap.
    pub fn get_subpixel(&self, x: f64, y: f64) -> Color<T> {
        let domain = SampleDomain::for_image(self.width, self.height);
        interpolate(x, y, domain, |ix, iy| self.get(ix as u32, iy as u32))
    }

    /// Sample the gray value at a real position.
    pub fn get_gray_subpixel(&self, x: f64, y: f64) -> T {
        let domain = SampleDomain::for_image(self.width, self.height);
        interpolate(x, y, domain, |ix, iy| {
            Scalar(self.get_gray(ix as u32, iy as u32))
        })
        .value()
    }

    /// Write `color` at (x, y).
    ///
    /// Gray images store the gray value of `color`. Positions outside the
    /// image are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAlpha`](crate::Error::InvalidAlpha) if (x, y)
    /// lies inside an image without an alpha channel and `color` is not
    /// opaque. Nothing is written in that case.
    pub fn plot(&mut self, x: i32, y: i32, color: Color<T>) -> Result<()> {
        if !self.in_bounds(x, y) {
            return Ok(());
        }
        self.roles.check_alpha(&color)?;
        let off = self.offset(x as u32, y as u32);
        let roles = self.roles;
        let channels = self.channels as usize;
        roles.write(&mut self.buffer[off..off + channels], &color);
        Ok(())
    }

    /// Fill every pixel with `color`.
    ///
    /// # Errors
    ///
    /// Same alpha rule as [`plot`](Self::plot).
    pub fn set(&mut self, color: Color<T>) -> Result<()> {
        self.roles.check_alpha(&color)?;
        if self.is_empty() {
            return Ok(());
        }
        let roles = self.roles;
        let channels = self.channels as usize;
        self.buffer
            .par_chunks_mut(channels)
            .for_each(|pixel| roles.write(pixel, &color));
        Ok(())
    }

    /// Check whether red exceeds both green and blue at (x, y).
    pub fn is_red(&self, x: u32, y: u32) -> bool {
        if self.roles.gray.is_some() {
            return false;
        }
        let c = self.get(x, y);
        c.red() > c.green() && c.red() > c.blue()
    }

    /// Check whether green exceeds both red and blue at (x, y).
    pub fn is_green(&self, x: u32, y: u32) -> bool {
        if self.roles.gray.is_some() {
            return false;
        }
        let c = self.get(x, y);
        c.green() > c.red() && c.green() > c.blue()
    }

    /// Check whether blue exceeds both red and green at (x, y).
    pub fn is_blue(&self, x: u32, y: u32) -> bool {
        if self.roles.gray.is_some() {
            return false;
        }
        let c = self.get(x, y);
        c.blue() > c.red() && c.blue() > c.green()
    }

    /// Check whether (x, y) is strictly brighter than every neighbor.
    ///
    /// Only the neighbors inside the image take part, so a corner pixel is
    /// compared with three pixels and an edge pixel with five.
    pub fn is_brighter_than_neighbours(&self, x: u32, y: u32) -> bool {
        let center = self.get_gray(x, y);
        let (x, y) = (x as i64, y as i64);
        for ny in y - 1..=y + 1 {
            for nx in x - 1..=x + 1 {
                if (nx, ny) == (x, y)
                    || nx < 0
                    || ny < 0
                    || nx >= self.width as i64
                    || ny >= self.height as i64
                {
                    continue;
                }
                if self.get_gray(nx as u32, ny as u32) >= center {
                    return false;
                }
            }
        }
        true
    }
}

//! Image comparison
//!
//! Geometry and size comparison between bitmaps, color detection, and
//! the pixel-wise absolute difference.

use super::BitmapData;
use crate::error::Result;
use crate::sample::Sample;
use rayon::prelude::*;
use std::cmp::Ordering;

impl<T: Sample> BitmapData<'_, T> {
    /// Check whether `other` has the same width, height, channel count and
    /// depth.
    pub fn same_geometry<U: Sample>(&self, other: &BitmapData<'_, U>) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.channels == other.channels
            && T::DEPTH == U::DEPTH
    }

    /// Order two bitmaps by buffer size in bytes.
    pub fn cmp_size<U: Sample>(&self, other: &BitmapData<'_, U>) -> Ordering {
        self.size().cmp(&other.size())
    }

    /// Check whether any pixel has differing red, green and blue samples.
    ///
    /// Always `false` for gray images.
    pub fn contains_colors(&self) -> bool {
        if self.roles.gray.is_some() || self.is_empty() {
            return false;
        }
        let roles = self.roles;
        self.buffer
            .par_chunks(self.channels as usize)
            .any(|px| roles.read(px).is_colored())
    }

    /// Compute `|self - other|` per sample into a new owned bitmap.
    ///
    /// Differences are taken in a widened signed domain, so they never
    /// wrap. Every channel is processed, alpha included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GeometryMismatch`](crate::Error::GeometryMismatch)
    /// unless both bitmaps have the same width, height and channel count.
    pub fn absolute_diff(&self, other: &BitmapData<'_, T>) -> Result<BitmapData<'static, T>> {
        self.check_geometry("absolute_diff", other)?;
        let mut out = self.blank_like();
        out.buffer
            .par_iter_mut()
            .zip(self.buffer.par_iter().zip(other.buffer.par_iter()))
            .for_each(|(d, (&a, &b))| *d = a.abs_diff_widened(b));
        Ok(out)
    }
}

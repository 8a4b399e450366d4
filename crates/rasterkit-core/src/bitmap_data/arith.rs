//! Image arithmetic operations
//!
//! Pixel-wise saturating addition and subtraction of two bitmaps with the
//! same geometry. Each pixel is combined with [`Color`]'s saturating
//! arithmetic and written back, so results clamp to `[0, T::MAX]` and the
//! alpha of the left operand is kept.
//!
//! [`Color`]: crate::Color

use super::BitmapData;
use crate::color::Color;
use crate::error::Result;
use crate::sample::Sample;
use rayon::prelude::*;

impl<T: Sample> BitmapData<'_, T> {
    /// Add `other` to this bitmap in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GeometryMismatch`](crate::Error::GeometryMismatch)
    /// unless both bitmaps have the same width, height and channel count.
    /// Nothing is modified in that case.
    pub fn arith_add_inplace(&mut self, other: &BitmapData<'_, T>) -> Result<()> {
        self.check_geometry("arith_add_inplace", other)?;
        self.combine(other, |a, b| a + b);
        Ok(())
    }

    /// Subtract `other` from this bitmap in place, saturating at zero.
    ///
    /// # Errors
    ///
    /// Same as [`arith_add_inplace`](Self::arith_add_inplace).
    pub fn arith_subtract_inplace(&mut self, other: &BitmapData<'_, T>) -> Result<()> {
        self.check_geometry("arith_subtract_inplace", other)?;
        self.combine(other, |a, b| a - b);
        Ok(())
    }

    /// Add two bitmaps into a new owned bitmap.
    pub fn arith_add(&self, other: &BitmapData<'_, T>) -> Result<BitmapData<'static, T>> {
        self.check_geometry("arith_add", other)?;
        let mut out = self.to_owned_data();
        out.combine(other, |a, b| a + b);
        Ok(out)
    }

    /// Subtract `other` from this bitmap into a new owned bitmap.
    pub fn arith_subtract(&self, other: &BitmapData<'_, T>) -> Result<BitmapData<'static, T>> {
        self.check_geometry("arith_subtract", other)?;
        let mut out = self.to_owned_data();
        out.combine(other, |a, b| a - b);
        Ok(out)
    }

    /// Apply `op` to every pixel pair, row by row in parallel.
    ///
    /// Geometry must already match. `op` keeps the left alpha, so the
    /// result is always storable.
    fn combine<F>(&mut self, other: &BitmapData<'_, T>, op: F)
    where
        F: Fn(Color<T>, Color<T>) -> Color<T> + Sync,
    {
        if self.is_empty() {
            return;
        }
        let roles = self.roles;
        let channels = self.channels as usize;
        let row_len = self.stride();
        self.buffer
            .par_chunks_mut(row_len)
            .zip(other.buffer.par_chunks(row_len))
            .for_each(|(row, rhs)| {
                for (px, rpx) in row.chunks_exact_mut(channels).zip(rhs.chunks_exact(channels)) {
                    let color = op(roles.read(px), roles.read(rpx));
                    roles.write(px, &color);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_add_saturates() {
        let mut a = BitmapData::<u8>::from_vec(vec![250, 10, 0, 100], 2, 2, 1).unwrap();
        let b = BitmapData::<u8>::from_vec(vec![10, 10, 0, 200], 2, 2, 1).unwrap();
        a.arith_add_inplace(&b).unwrap();
        assert_eq!(a.as_slice(), [255, 20, 0, 255]);
    }

    #[test]
    fn test_subtract_saturates_at_zero() {
        let a = BitmapData::<u64>::from_vec(vec![3, 5, 7], 1, 1, 3).unwrap();
        let b = BitmapData::<u64>::from_vec(vec![5, 3, 2], 1, 1, 3).unwrap();
        let d = a.arith_subtract(&b).unwrap();
        assert_eq!(d.get(0, 0), Color::rgb(0, 2, 5));
        // operands untouched
        assert_eq!(a.as_slice(), [3, 5, 7]);
    }

    #[test]
    fn test_add_keeps_left_alpha() {
        let mut a = BitmapData::<u16>::from_vec(vec![7, 1, 1, 1], 1, 1, 4).unwrap();
        let b = BitmapData::<u16>::from_vec(vec![9, 2, 3, 4], 1, 1, 4).unwrap();
        a.arith_add_inplace(&b).unwrap();
        assert_eq!(a.get(0, 0), Color::rgba(3, 4, 5, 7));
    }

    #[test]
    fn test_geometry_mismatch_leaves_target() {
        let mut a = BitmapData::<u8>::from_vec(vec![1, 2], 2, 1, 1).unwrap();
        let b = BitmapData::<u8>::from_vec(vec![1, 2], 1, 2, 1).unwrap();
        let err = a.arith_subtract_inplace(&b).unwrap_err();
        assert_eq!(
            err,
            Error::GeometryMismatch {
                op: "arith_subtract_inplace",
                expected: (2, 1, 1),
                actual: (1, 2, 1),
            }
        );
        assert_eq!(a.as_slice(), [1, 2]);
    }

    #[test]
    fn test_float_add() {
        let a = BitmapData::<f64>::from_vec(vec![0.5, -1.0], 2, 1, 1).unwrap();
        let b = BitmapData::<f64>::from_vec(vec![0.25, 3.0], 2, 1, 1).unwrap();
        assert_eq!(a.arith_add(&b).unwrap().as_slice(), [0.75, 2.0]);
    }
}

//! Pixel buffer ownership
//!
//! A bitmap either owns its samples or borrows them from the caller for
//! the lifetime `'a`. Both forms deref to a flat `[T]`, so pixel code
//! never needs to know which one it has.

use std::ops::{Deref, DerefMut};

/// Flat row-major sample storage
#[derive(Debug)]
pub enum PixelBuffer<'a, T> {
    /// Samples allocated by the bitmap
    Owned(Vec<T>),
    /// Samples managed by the caller; must outlive the bitmap
    Borrowed(&'a mut [T]),
}

impl<T: Clone> PixelBuffer<'_, T> {
    /// Copy the samples into a new owned buffer.
    pub fn to_owned_buffer(&self) -> PixelBuffer<'static, T> {
        PixelBuffer::Owned(self.deref().to_vec())
    }
}

impl<T> PixelBuffer<'_, T> {
    /// Check whether the samples belong to the caller.
    #[inline]
    pub fn is_borrowed(&self) -> bool {
        matches!(self, PixelBuffer::Borrowed(_))
    }
}

impl<T> Default for PixelBuffer<'_, T> {
    fn default() -> Self {
        PixelBuffer::Owned(Vec::new())
    }
}

impl<T> Deref for PixelBuffer<'_, T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        match self {
            PixelBuffer::Owned(v) => v,
            PixelBuffer::Borrowed(s) => s,
        }
    }
}

impl<T> DerefMut for PixelBuffer<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        match self {
            PixelBuffer::Owned(v) => v,
            PixelBuffer::Borrowed(s) => s,
        }
    }
}

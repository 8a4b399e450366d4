//! BitmapData - The typed image container
//!
//! `BitmapData<'a, T>` is a width × height × channels grid of samples of
//! one numeric type `T` (see [`Sample`]). It also carries the display
//! range `[min, max]` used when the image is rendered to 8 bits.
//!
//! # Pixel layout
//!
//! - Samples are stored row-major with no padding
//! - The samples of one pixel are contiguous
//! - Channel roles depend on the channel count:
//!
//! | channels | gray | alpha | red | green | blue |
//! |---------:|-----:|------:|----:|------:|-----:|
//! | 1        | 0    | -     | 0   | 0     | 0    |
//! | 3        | -    | -     | 0   | 1     | 2    |
//! | 4        | -    | 0     | 1   | 2     | 3    |
//!
//! # Ownership model
//!
//! A bitmap either owns its buffer or borrows a caller-provided one for
//! the lifetime `'a` (see [`PixelBuffer`]). Writes through a borrowed
//! bitmap are visible to the caller. Cloning always produces an owned
//! deep copy.

mod access;
pub mod arith;
pub mod compare;
pub mod convert;
pub mod graphics;
pub mod statistics;
mod storage;

pub use convert::{Depth8Image, Depth8Options};
pub use graphics::{bresenham, walk_segment};
pub use statistics::{Extremum, GrayLow, GrayPeak, GrayStats, Region};
pub use storage::PixelBuffer;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::sample::{PixelDepth, Sample};

/// Sample indices of each channel role within one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct ChannelRoles {
    channels: usize,
    gray: Option<usize>,
    alpha: Option<usize>,
    red: usize,
    green: usize,
    blue: usize,
}

impl ChannelRoles {
    fn for_channels(channels: u32) -> Result<Self> {
        let roles = match channels {
            1 => Self {
                channels: 1,
                gray: Some(0),
                ..Self::default()
            },
            3 => Self {
                channels: 3,
                gray: None,
                alpha: None,
                red: 0,
                green: 1,
                blue: 2,
            },
            4 => Self {
                channels: 4,
                gray: None,
                alpha: Some(0),
                red: 1,
                green: 2,
                blue: 3,
            },
            _ => return Err(Error::UnsupportedChannels(channels)),
        };
        Ok(roles)
    }

    /// Decode one pixel.
    #[inline]
    pub(crate) fn read<T: Sample>(&self, pixel: &[T]) -> Color<T> {
        match self.gray {
            Some(g) => Color::gray(pixel[g]),
            None => Color::rgba(
                pixel[self.red],
                pixel[self.green],
                pixel[self.blue],
                self.alpha.map_or(T::MAX, |a| pixel[a]),
            ),
        }
    }

    /// Fail if `color` carries an alpha this layout cannot store.
    #[inline]
    pub(crate) fn check_alpha<T: Sample>(&self, color: &Color<T>) -> Result<()> {
        if self.alpha.is_none() && color.alpha() != T::MAX {
            return Err(Error::InvalidAlpha {
                alpha: color.alpha().to_string(),
                channels: self.channels as u32,
            });
        }
        Ok(())
    }

    /// Encode one pixel. The alpha must already have been checked.
    #[inline]
    pub(crate) fn write<T: Sample>(&self, pixel: &mut [T], color: &Color<T>) {
        match self.gray {
            Some(g) => pixel[g] = color.to_gray(),
            None => {
                pixel[self.red] = color.red();
                pixel[self.green] = color.green();
                pixel[self.blue] = color.blue();
                if let Some(a) = self.alpha {
                    pixel[a] = color.alpha();
                }
            }
        }
    }
}

/// Typed raster image
///
/// # See also
///
/// [`Bitmap`](crate::Bitmap) for the depth-erased façade.
#[derive(Debug)]
pub struct BitmapData<'a, T: Sample> {
    width: u32,
    height: u32,
    channels: u32,
    roles: ChannelRoles,
    buffer: PixelBuffer<'a, T>,
    min_displayed: T,
    max_displayed: T,
}

impl<'a, T: Sample> BitmapData<'a, T> {
    /// Create a new bitmap with all samples set to zero.
    ///
    /// # Arguments
    ///
    /// * `width` - Width in pixels
    /// * `height` - Height in pixels
    /// * `channels` - 1 (gray), 3 (RGB) or 4 (ARGB)
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedChannels`] for any other channel count
    /// and [`Error::InvalidDimension`] if the sample count overflows.
    pub fn new(width: u32, height: u32, channels: u32) -> Result<BitmapData<'static, T>> {
        let roles = ChannelRoles::for_channels(channels)?;
        let len = sample_count(width, height, channels)?;
        Ok(BitmapData::assemble(
            width,
            height,
            channels,
            roles,
            PixelBuffer::Owned(vec![T::ZERO; len]),
        ))
    }

    /// Create an owned bitmap from a sample vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSize`] if `samples.len()` is not
    /// `width * height * channels`.
    pub fn from_vec(
        samples: Vec<T>,
        width: u32,
        height: u32,
        channels: u32,
    ) -> Result<BitmapData<'static, T>> {
        let roles = ChannelRoles::for_channels(channels)?;
        check_len(samples.len(), width, height, channels)?;
        Ok(BitmapData::assemble(
            width,
            height,
            channels,
            roles,
            PixelBuffer::Owned(samples),
        ))
    }

    /// Wrap a caller-owned sample slice without copying.
    ///
    /// Every write through the returned bitmap lands in `samples`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSize`] if `samples.len()` is not
    /// `width * height * channels`.
    pub fn from_slice(samples: &'a mut [T], width: u32, height: u32, channels: u32) -> Result<Self> {
        let roles = ChannelRoles::for_channels(channels)?;
        check_len(samples.len(), width, height, channels)?;
        Ok(Self::assemble(
            width,
            height,
            channels,
            roles,
            PixelBuffer::Borrowed(samples),
        ))
    }

    /// Wrap a caller-owned raw buffer without copying.
    ///
    /// # Safety
    ///
    /// `ptr` must point to `width * height * channels` initialized samples
    /// that stay valid, and are not accessed through any other path, for
    /// the whole lifetime `'a`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MisalignedBuffer`] if `ptr` is null or not aligned
    /// for `T`.
    pub unsafe fn from_raw_parts(ptr: *mut T, width: u32, height: u32, channels: u32) -> Result<Self> {
        let roles = ChannelRoles::for_channels(channels)?;
        let len = sample_count(width, height, channels)?;
        if ptr.is_null() || !ptr.is_aligned() {
            return Err(Error::MisalignedBuffer(size_of::<T>()));
        }
        // SAFETY: non-null and aligned checked above; length and lifetime
        // are guaranteed by the caller.
        let samples = unsafe { std::slice::from_raw_parts_mut(ptr, len) };
        Ok(Self::assemble(
            width,
            height,
            channels,
            roles,
            PixelBuffer::Borrowed(samples),
        ))
    }

    fn assemble(
        width: u32,
        height: u32,
        channels: u32,
        roles: ChannelRoles,
        buffer: PixelBuffer<'a, T>,
    ) -> Self {
        Self {
            width,
            height,
            channels,
            roles,
            buffer,
            min_displayed: T::ZERO,
            max_displayed: T::MAX,
        }
    }

    /// Get the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of channels.
    #[inline]
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Get the depth of the sample type.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        T::DEPTH
    }

    /// Get the number of samples in one row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    /// Get the buffer size in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.buffer.len() * size_of::<T>()
    }

    /// Check whether the bitmap holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Check whether the samples belong to the caller.
    #[inline]
    pub fn is_borrowed(&self) -> bool {
        self.buffer.is_borrowed()
    }

    /// Get the number of bytes per pixel.
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.channels as usize * size_of::<T>()
    }

    /// Get the raw samples.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.buffer
    }

    /// Get mutable access to the raw samples.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.buffer
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buffer.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buffer.as_mut_ptr()
    }

    /// Get the lower bound of the display range.
    #[inline]
    pub fn min_displayed_brightness(&self) -> T {
        self.min_displayed
    }

    /// Get the upper bound of the display range.
    #[inline]
    pub fn max_displayed_brightness(&self) -> T {
        self.max_displayed
    }

    pub fn set_min_displayed_brightness(&mut self, value: T) {
        self.min_displayed = value;
    }

    pub fn set_max_displayed_brightness(&mut self, value: T) {
        self.max_displayed = value;
    }

    /// Make an owned deep copy that no longer depends on `'a`.
    pub fn to_owned_data(&self) -> BitmapData<'static, T> {
        BitmapData {
            width: self.width,
            height: self.height,
            channels: self.channels,
            roles: self.roles,
            buffer: self.buffer.to_owned_buffer(),
            min_displayed: self.min_displayed,
            max_displayed: self.max_displayed,
        }
    }

    /// Create an owned zeroed bitmap with the same geometry and display range.
    pub(crate) fn blank_like(&self) -> BitmapData<'static, T> {
        BitmapData {
            width: self.width,
            height: self.height,
            channels: self.channels,
            roles: self.roles,
            buffer: PixelBuffer::Owned(vec![T::ZERO; self.buffer.len()]),
            min_displayed: self.min_displayed,
            max_displayed: self.max_displayed,
        }
    }

    /// Copy pixels and display range into `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GeometryMismatch`] unless both bitmaps have the
    /// same width, height and channel count.
    pub fn copy_to(&self, dest: &mut BitmapData<'_, T>) -> Result<()> {
        self.check_geometry("copy_to", dest)?;
        dest.buffer.copy_from_slice(&self.buffer);
        dest.min_displayed = self.min_displayed;
        dest.max_displayed = self.max_displayed;
        Ok(())
    }

    /// Replace this bitmap's contents with a copy of `src`.
    ///
    /// The existing buffer is reused when the geometry matches; otherwise a
    /// new owned buffer is allocated.
    pub fn assign_from(&mut self, src: &BitmapData<'_, T>) {
        if self.check_geometry("assign_from", src).is_ok() {
            self.buffer.copy_from_slice(&src.buffer);
        } else {
            self.width = src.width;
            self.height = src.height;
            self.channels = src.channels;
            self.roles = src.roles;
            self.buffer = src.buffer.to_owned_buffer();
        }
        self.min_displayed = src.min_displayed;
        self.max_displayed = src.max_displayed;
    }

    pub(crate) fn check_geometry<U: Sample>(
        &self,
        op: &'static str,
        other: &BitmapData<'_, U>,
    ) -> Result<()> {
        if self.width != other.width
            || self.height != other.height
            || self.channels != other.channels
        {
            return Err(Error::GeometryMismatch {
                op,
                expected: (self.width, self.height, self.channels),
                actual: (other.width, other.height, other.channels),
            });
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels as usize
    }

    #[inline]
    pub(crate) fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as i64) < self.width as i64 && (y as i64) < self.height as i64
    }
}

impl<T: Sample> Default for BitmapData<'_, T> {
    /// An empty 0×0 gray bitmap.
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            channels: 1,
            roles: ChannelRoles {
                channels: 1,
                gray: Some(0),
                ..ChannelRoles::default()
            },
            buffer: PixelBuffer::default(),
            min_displayed: T::ZERO,
            max_displayed: T::MAX,
        }
    }
}

impl<T: Sample> Clone for BitmapData<'_, T> {
    fn clone(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            roles: self.roles,
            buffer: PixelBuffer::Owned(self.buffer.to_vec()),
            min_displayed: self.min_displayed,
            max_displayed: self.max_displayed,
        }
    }
}

fn sample_count(width: u32, height: u32, channels: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels as usize))
        .ok_or(Error::InvalidDimension {
            width: width as i64,
            height: height as i64,
        })
}

fn check_len(actual: usize, width: u32, height: u32, channels: u32) -> Result<()> {
    let expected = sample_count(width, height, channels)?;
    if actual != expected {
        return Err(Error::BufferSize { expected, actual });
    }
    Ok(())
}

//! Bitmap - Depth-erased image
//!
//! [`Bitmap`] holds a [`BitmapData`] of one of the five sample types and
//! forwards every operation to it. The variant is fixed at construction.
//!
//! This is the type used at the host boundary: it can be built from a
//! raw buffer plus a signed depth code, or from a [`ParamRecord`], and
//! turned back into one.

pub mod params;

pub use params::{
    BUFFER_KEY, CHANNELS_KEY, DEPTH_KEY, HEIGHT_KEY, IMAGE_KEYS, MAX_BRIGHTNESS_KEY,
    MIN_BRIGHTNESS_KEY, ParamRecord, ParamValue, WIDTH_KEY,
};

use crate::bitmap_data::{BitmapData, Depth8Image, Depth8Options};
use crate::error::{Error, Result};
use crate::gamma::GammaCache;
use crate::sample::{PixelDepth, Sample};
use log::{debug, warn};
use std::cmp::Ordering;

/// Image of any supported depth
#[derive(Debug, Clone)]
pub enum Bitmap<'a> {
    U8(BitmapData<'a, u8>),
    U16(BitmapData<'a, u16>),
    U32(BitmapData<'a, u32>),
    U64(BitmapData<'a, u64>),
    F64(BitmapData<'a, f64>),
}

/// Run `$body` with `$data` bound to the active `BitmapData`.
macro_rules! dispatch {
    ($bitmap:expr, $data:ident => $body:expr) => {
        match $bitmap {
            Bitmap::U8($data) => $body,
            Bitmap::U16($data) => $body,
            Bitmap::U32($data) => $body,
            Bitmap::U64($data) => $body,
            Bitmap::F64($data) => $body,
        }
    };
}

macro_rules! typed_access {
    ($($variant:ident, $t:ty, $get:ident, $get_mut:ident;)*) => {
        $(
            #[doc = concat!("Get the `", stringify!($t), "` data, if that is the active depth.")]
            pub fn $get(&self) -> Option<&BitmapData<'a, $t>> {
                match self {
                    Bitmap::$variant(data) => Some(data),
                    _ => None,
                }
            }

            pub fn $get_mut(&mut self) -> Option<&mut BitmapData<'a, $t>> {
                match self {
                    Bitmap::$variant(data) => Some(data),
                    _ => None,
                }
            }
        )*
    };
}

macro_rules! impl_from_data {
    ($($variant:ident, $t:ty;)*) => {
        $(
            impl<'a> From<BitmapData<'a, $t>> for Bitmap<'a> {
                fn from(data: BitmapData<'a, $t>) -> Self {
                    Bitmap::$variant(data)
                }
            }
        )*
    };
}

impl_from_data! {
    U8, u8;
    U16, u16;
    U32, u32;
    U64, u64;
    F64, f64;
}

impl Default for Bitmap<'_> {
    /// An empty 8-bit bitmap.
    fn default() -> Self {
        Bitmap::U8(BitmapData::default())
    }
}

impl<'a> Bitmap<'a> {
    /// Create a zeroed bitmap.
    ///
    /// # Arguments
    ///
    /// * `depth` - Signed depth code: 1, 2, 4, 8 or -8
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] or [`Error::UnsupportedChannels`]
    /// for an unsupported configuration.
    pub fn new(width: u32, height: u32, channels: u32, depth: i32) -> Result<Bitmap<'static>> {
        Ok(match PixelDepth::from_code(depth)? {
            PixelDepth::U8 => Bitmap::U8(BitmapData::new(width, height, channels)?),
            PixelDepth::U16 => Bitmap::U16(BitmapData::new(width, height, channels)?),
            PixelDepth::U32 => Bitmap::U32(BitmapData::new(width, height, channels)?),
            PixelDepth::U64 => Bitmap::U64(BitmapData::new(width, height, channels)?),
            PixelDepth::F64 => Bitmap::F64(BitmapData::new(width, height, channels)?),
        })
    }

    /// Wrap a caller-owned buffer of the given depth without copying.
    ///
    /// # Safety
    ///
    /// `ptr` must point to `width * height * channels` initialized samples
    /// of the type selected by `depth`, valid and exclusively used through
    /// this bitmap for the lifetime `'a`.
    pub unsafe fn from_raw_parts(
        ptr: *mut u8,
        width: u32,
        height: u32,
        channels: u32,
        depth: i32,
    ) -> Result<Self> {
        // SAFETY: forwarded to the caller
        unsafe {
            Ok(match PixelDepth::from_code(depth)? {
                PixelDepth::U8 => Bitmap::U8(BitmapData::from_raw_parts(ptr, width, height, channels)?),
                PixelDepth::U16 => {
                    Bitmap::U16(BitmapData::from_raw_parts(ptr.cast(), width, height, channels)?)
                }
                PixelDepth::U32 => {
                    Bitmap::U32(BitmapData::from_raw_parts(ptr.cast(), width, height, channels)?)
                }
                PixelDepth::U64 => {
                    Bitmap::U64(BitmapData::from_raw_parts(ptr.cast(), width, height, channels)?)
                }
                PixelDepth::F64 => {
                    Bitmap::F64(BitmapData::from_raw_parts(ptr.cast(), width, height, channels)?)
                }
            })
        }
    }

    /// Wrap the buffer described by a parameter record.
    ///
    /// See [`from_params_with_key`](Self::from_params_with_key).
    ///
    /// # Safety
    ///
    /// Same contract as [`from_raw_parts`](Self::from_raw_parts) for the
    /// pointer stored under [`BUFFER_KEY`].
    pub unsafe fn from_params(record: &ParamRecord) -> Result<Self> {
        // SAFETY: forwarded to the caller
        unsafe { Self::from_params_with_key(record, BUFFER_KEY) }
    }

    /// Wrap the buffer stored under `buffer_key` in a parameter record.
    ///
    /// Geometry is read from [`IMAGE_KEYS`]; the display range from the
    /// optional brightness keys, defaulting to the full sample range.
    ///
    /// # Safety
    ///
    /// Same contract as [`from_raw_parts`](Self::from_raw_parts).
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] or [`Error::FieldType`] for absent
    /// or ill-typed keys, and the errors of
    /// [`from_raw_parts`](Self::from_raw_parts).
    pub unsafe fn from_params_with_key(record: &ParamRecord, buffer_key: &str) -> Result<Self> {
        const SITE: &str = "Bitmap::from_params";

        let ptr = record.get_pointer(buffer_key, SITE)?;
        let width = record.get_integer(WIDTH_KEY, SITE)?;
        let height = record.get_integer(HEIGHT_KEY, SITE)?;
        let channels = record.get_integer(CHANNELS_KEY, SITE)?;
        let depth = record.get_integer(DEPTH_KEY, SITE)?;

        let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
            return Err(Error::InvalidDimension { width, height });
        };
        let c = u32::try_from(channels).map_err(|_| {
            Error::InvalidParameter(format!("{SITE}: unsupported channel count {channels}"))
        })?;
        let d = i32::try_from(depth).map_err(|_| {
            Error::InvalidParameter(format!("{SITE}: unsupported depth {depth}"))
        })?;

        debug!("wrapping {w}x{h}x{c} buffer of depth {d} at {ptr:p}");
        // SAFETY: forwarded to the caller
        let mut bitmap = unsafe { Self::from_raw_parts(ptr, w, h, c, d)? };

        let min = record.get_float_opt(MIN_BRIGHTNESS_KEY, SITE)?;
        let max = record.get_float_opt(MAX_BRIGHTNESS_KEY, SITE)?;
        if let (Some(lo), Some(hi)) = (min, max)
            && lo > hi
        {
            warn!("{SITE}: display range is inverted ({lo} > {hi})");
        }
        if let Some(lo) = min {
            bitmap.set_min_displayed_brightness(lo);
        }
        if let Some(hi) = max {
            bitmap.set_max_displayed_brightness(hi);
        }
        Ok(bitmap)
    }

    /// Describe this bitmap as a parameter record.
    ///
    /// The record points at this bitmap's buffer; it is only valid while
    /// the buffer is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyBitmap`] for an empty bitmap.
    pub fn to_params(&mut self) -> Result<ParamRecord> {
        if self.is_empty() {
            return Err(Error::EmptyBitmap("Bitmap::to_params"));
        }
        let mut record = ParamRecord::new();
        record.insert(BUFFER_KEY, self.as_mut_ptr());
        record.insert(WIDTH_KEY, self.width() as i64);
        record.insert(HEIGHT_KEY, self.height() as i64);
        record.insert(CHANNELS_KEY, self.channels() as i64);
        record.insert(DEPTH_KEY, self.depth() as i64);
        record.insert(MIN_BRIGHTNESS_KEY, self.min_displayed_brightness());
        record.insert(MAX_BRIGHTNESS_KEY, self.max_displayed_brightness());
        Ok(record)
    }

    typed_access! {
        U8, u8, as_u8, as_u8_mut;
        U16, u16, as_u16, as_u16_mut;
        U32, u32, as_u32, as_u32_mut;
        U64, u64, as_u64, as_u64_mut;
        F64, f64, as_f64, as_f64_mut;
    }

    pub fn width(&self) -> u32 {
        dispatch!(self, d => d.width())
    }

    pub fn height(&self) -> u32 {
        dispatch!(self, d => d.height())
    }

    pub fn channels(&self) -> u32 {
        dispatch!(self, d => d.channels())
    }

    /// Get the signed depth code.
    pub fn depth(&self) -> i32 {
        self.pixel_depth().code()
    }

    pub fn pixel_depth(&self) -> PixelDepth {
        dispatch!(self, d => d.depth())
    }

    /// Get the number of samples in one row.
    pub fn stride(&self) -> usize {
        dispatch!(self, d => d.stride())
    }

    /// Get the buffer size in bytes.
    pub fn size(&self) -> usize {
        dispatch!(self, d => d.size())
    }

    pub fn bytes_per_pixel(&self) -> usize {
        dispatch!(self, d => d.bytes_per_pixel())
    }

    pub fn is_empty(&self) -> bool {
        dispatch!(self, d => d.is_empty())
    }

    pub fn is_borrowed(&self) -> bool {
        dispatch!(self, d => d.is_borrowed())
    }

    /// Get the address of the first sample.
    pub fn as_ptr(&self) -> *const u8 {
        dispatch!(self, d => d.as_ptr().cast())
    }

    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        dispatch!(self, d => d.as_mut_ptr().cast())
    }

    /// Get the lower bound of the display range.
    pub fn min_displayed_brightness(&self) -> f64 {
        dispatch!(self, d => d.min_displayed_brightness().to_f64())
    }

    /// Get the upper bound of the display range.
    pub fn max_displayed_brightness(&self) -> f64 {
        dispatch!(self, d => d.max_displayed_brightness().to_f64())
    }

    /// Set the lower bound of the display range.
    ///
    /// Integer depths truncate `value` and saturate it to the sample range.
    pub fn set_min_displayed_brightness(&mut self, value: f64) {
        dispatch!(self, d => d.set_min_displayed_brightness(Sample::from_f64_trunc(value)))
    }

    /// Set the upper bound of the display range.
    pub fn set_max_displayed_brightness(&mut self, value: f64) {
        dispatch!(self, d => d.set_max_displayed_brightness(Sample::from_f64_trunc(value)))
    }

    /// Render to 8 bits per channel using the process-wide gamma cache.
    pub fn convert_to_depth8(&self, options: &Depth8Options) -> Result<Depth8Image> {
        dispatch!(self, d => d.convert_to_depth8(options))
    }

    /// Render to 8 bits per channel using `cache`.
    pub fn convert_to_depth8_with(
        &self,
        options: &Depth8Options,
        cache: &GammaCache,
    ) -> Result<Depth8Image> {
        dispatch!(self, d => d.convert_to_depth8_with(options, cache))
    }

    /// Compute the per-sample absolute difference into a new bitmap.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DepthMismatch`] if the depths differ and
    /// [`Error::GeometryMismatch`] if width, height or channels differ.
    pub fn absolute_diff(&self, other: &Bitmap<'_>) -> Result<Bitmap<'static>> {
        Ok(match (self, other) {
            (Bitmap::U8(a), Bitmap::U8(b)) => Bitmap::U8(a.absolute_diff(b)?),
            (Bitmap::U16(a), Bitmap::U16(b)) => Bitmap::U16(a.absolute_diff(b)?),
            (Bitmap::U32(a), Bitmap::U32(b)) => Bitmap::U32(a.absolute_diff(b)?),
            (Bitmap::U64(a), Bitmap::U64(b)) => Bitmap::U64(a.absolute_diff(b)?),
            (Bitmap::F64(a), Bitmap::F64(b)) => Bitmap::F64(a.absolute_diff(b)?),
            _ => {
                return Err(Error::DepthMismatch {
                    op: "absolute_diff",
                    expected: self.depth(),
                    actual: other.depth(),
                });
            }
        })
    }

    /// Check whether any pixel has differing red, green and blue samples.
    pub fn contains_colors(&self) -> bool {
        dispatch!(self, d => d.contains_colors())
    }

    /// Check whether `other` has the same width, height, channels and depth.
    pub fn same_geometry(&self, other: &Bitmap<'_>) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.channels() == other.channels()
            && self.depth() == other.depth()
    }

    /// Order two bitmaps by buffer size in bytes.
    pub fn cmp_size(&self, other: &Bitmap<'_>) -> Ordering {
        self.size().cmp(&other.size())
    }

    /// Make an owned deep copy that no longer depends on `'a`.
    pub fn to_owned_bitmap(&self) -> Bitmap<'static> {
        match self {
            Bitmap::U8(d) => Bitmap::U8(d.to_owned_data()),
            Bitmap::U16(d) => Bitmap::U16(d.to_owned_data()),
            Bitmap::U32(d) => Bitmap::U32(d.to_owned_data()),
            Bitmap::U64(d) => Bitmap::U64(d.to_owned_data()),
            Bitmap::F64(d) => Bitmap::F64(d.to_owned_data()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn test_new_per_depth() {
        for (depth, bytes) in [(1, 1), (2, 2), (4, 4), (8, 8), (-8, 8)] {
            let bmp = Bitmap::new(3, 2, 4, depth).unwrap();
            assert_eq!(bmp.depth(), depth);
            assert_eq!(bmp.size(), 3 * 2 * 4 * bytes);
            assert!(!bmp.is_empty());
        }
        assert_eq!(Bitmap::new(1, 1, 1, 3).unwrap_err(), Error::UnsupportedDepth(3));
    }

    #[test]
    fn test_default_is_empty_u8() {
        let bmp = Bitmap::default();
        assert!(bmp.is_empty());
        assert_eq!(bmp.depth(), 1);
        assert_eq!((bmp.width(), bmp.height()), (0, 0));
    }

    #[test]
    fn test_typed_access() {
        let mut bmp = Bitmap::new(2, 2, 1, 2).unwrap();
        assert!(bmp.as_u8().is_none());
        bmp.as_u16_mut().unwrap().plot(1, 1, Color::gray(500)).unwrap();
        assert_eq!(bmp.as_u16().unwrap().get_gray(1, 1), 500);
    }

    #[test]
    fn test_brightness_as_f64() {
        let mut bmp = Bitmap::new(1, 1, 1, 1).unwrap();
        assert_eq!(bmp.max_displayed_brightness(), 255.0);
        bmp.set_min_displayed_brightness(10.7);
        bmp.set_max_displayed_brightness(300.0);
        assert_eq!(bmp.min_displayed_brightness(), 10.0);
        assert_eq!(bmp.max_displayed_brightness(), 255.0);
    }

    #[test]
    fn test_absolute_diff_depth_mismatch() {
        let a = Bitmap::new(1, 1, 1, 1).unwrap();
        let b = Bitmap::new(1, 1, 1, -8).unwrap();
        assert_eq!(
            a.absolute_diff(&b).unwrap_err(),
            Error::DepthMismatch {
                op: "absolute_diff",
                expected: 1,
                actual: -8
            }
        );
    }

    #[test]
    fn test_to_params_of_empty_fails() {
        let mut bmp = Bitmap::default();
        assert_eq!(
            bmp.to_params().unwrap_err(),
            Error::EmptyBitmap("Bitmap::to_params")
        );
    }

    #[test]
    fn test_from_params_missing_key() {
        let mut record = ParamRecord::new();
        record.insert(WIDTH_KEY, 1i64);
        let err = unsafe { Bitmap::from_params(&record) }.unwrap_err();
        assert_eq!(
            err,
            Error::MissingField {
                key: BUFFER_KEY.to_string(),
                site: "Bitmap::from_params"
            }
        );
    }

    #[test]
    fn test_from_params_custom_key() {
        let mut samples = vec![0u32; 6];
        let mut record = ParamRecord::new();
        record.insert("pixels", samples.as_mut_ptr().cast::<u8>());
        record.insert(WIDTH_KEY, 2i64);
        record.insert(HEIGHT_KEY, 1i64);
        record.insert(CHANNELS_KEY, 3i64);
        record.insert(DEPTH_KEY, 4i64);
        let bmp = unsafe { Bitmap::from_params_with_key(&record, "pixels") }.unwrap();
        assert!(bmp.is_borrowed());
        assert_eq!(bmp.pixel_depth(), PixelDepth::U32);
        assert_eq!(bmp.max_displayed_brightness(), u32::MAX as f64);
    }

    #[test]
    fn test_clone_is_owned() {
        let mut samples = vec![5u8; 3];
        let bmp = Bitmap::from(BitmapData::from_slice(&mut samples, 1, 1, 3).unwrap());
        let copy = bmp.clone();
        assert!(bmp.is_borrowed());
        assert!(!copy.is_borrowed());
        assert!(copy.same_geometry(&bmp));
        assert_eq!(copy.cmp_size(&bmp), Ordering::Equal);
    }
}

//! Numeric sample types
//!
//! A bitmap stores one of five numeric sample types: four unsigned
//! integer widths and `f64`. The [`Sample`] trait collects the per-type
//! arithmetic the pixel algorithms need (bounded and saturating math,
//! rounding conversions, widened differences), and [`PixelDepth`] is the
//! signed depth code used at the host boundary.
//!
//! # Depth encoding
//!
//! | depth | sample type |
//! |------:|-------------|
//! | 1     | `u8`        |
//! | 2     | `u16`       |
//! | 4     | `u32`       |
//! | 8     | `u64`       |
//! | -8    | `f64`       |

use crate::error::{Error, Result};
use std::fmt::{Debug, Display};

/// Signed pixel depth: byte width of one sample, negative for floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum PixelDepth {
    /// 8-bit unsigned samples
    U8 = 1,
    /// 16-bit unsigned samples
    U16 = 2,
    /// 32-bit unsigned samples
    U32 = 4,
    /// 64-bit unsigned samples
    U64 = 8,
    /// 64-bit floating point samples
    F64 = -8,
}

impl PixelDepth {
    /// Create a `PixelDepth` from its signed code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] for anything but 1, 2, 4, 8 or -8.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            1 => Ok(PixelDepth::U8),
            2 => Ok(PixelDepth::U16),
            4 => Ok(PixelDepth::U32),
            8 => Ok(PixelDepth::U64),
            -8 => Ok(PixelDepth::F64),
            _ => Err(Error::UnsupportedDepth(code)),
        }
    }

    /// Get the signed depth code.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Get the number of bytes per sample.
    pub fn bytes(self) -> usize {
        self.code().unsigned_abs() as usize
    }

    /// Check whether samples are floating point.
    pub fn is_float(self) -> bool {
        self.code() < 0
    }
}

/// A numeric pixel sample.
///
/// Implemented for `u8`, `u16`, `u32`, `u64` and `f64`. Integer
/// conversions from `f64` saturate at the type bounds (Rust `as`
/// semantics), so out-of-range results clamp instead of wrapping.
pub trait Sample:
    Copy
    + Default
    + PartialEq
    + PartialOrd
    + Debug
    + Display
    + Send
    + Sync
    + std::ops::Div<Output = Self>
    + 'static
{
    /// Depth of this sample type.
    const DEPTH: PixelDepth;
    /// Largest representable value.
    const MAX: Self;
    /// Smallest representable value (`-f64::MAX` for floating point).
    const LOWEST: Self;
    /// Zero.
    const ZERO: Self;

    /// Widen to `f64`.
    fn to_f64(self) -> f64;

    /// Convert from `f64`, rounding half away from zero.
    fn from_f64(value: f64) -> Self;

    /// Convert from `f64`, truncating toward zero.
    fn from_f64_trunc(value: f64) -> Self;

    /// Widen an integer sample to `u128`; `None` for floating point.
    fn to_u128(self) -> Option<u128>;

    /// Convert from `u128`, saturating at `MAX`.
    fn from_u128(value: u128) -> Self;

    /// Add two samples, saturating at the type bounds.
    fn saturating_add(self, rhs: Self) -> Self;

    /// Subtract two samples, saturating at the type bounds.
    fn saturating_sub(self, rhs: Self) -> Self;

    /// Multiply two samples, saturating at the type maximum.
    fn saturating_mul(self, rhs: Self) -> Self;

    /// `|self - other|` computed in a widened signed domain and clamped
    /// to `[0, MAX]`.
    fn abs_diff_widened(self, other: Self) -> Self;

    /// Add a real offset, saturating at `MAX` and `LOWEST`.
    fn bounded_add(self, offset: f64) -> Self {
        let max = Self::MAX.to_f64();
        let lowest = Self::LOWEST.to_f64();
        let a = self.to_f64();
        if offset >= max || a > max - offset {
            return Self::MAX;
        }
        if offset <= -max || a < lowest - offset {
            return Self::LOWEST;
        }
        Self::from_f64_trunc(a + offset)
    }

    /// Subtract a real offset, saturating at `MAX` and `LOWEST`.
    fn bounded_sub(self, offset: f64) -> Self {
        self.bounded_add(-offset)
    }
}

macro_rules! impl_unsigned_sample {
    ($t:ty, $depth:expr) => {
        impl Sample for $t {
            const DEPTH: PixelDepth = $depth;
            const MAX: Self = <$t>::MAX;
            const LOWEST: Self = 0;
            const ZERO: Self = 0;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(value: f64) -> Self {
                value.round() as $t
            }

            #[inline]
            fn from_f64_trunc(value: f64) -> Self {
                value as $t
            }

            #[inline]
            fn to_u128(self) -> Option<u128> {
                Some(self as u128)
            }

            #[inline]
            fn from_u128(value: u128) -> Self {
                value.min(<$t>::MAX as u128) as $t
            }

            #[inline]
            fn saturating_add(self, rhs: Self) -> Self {
                <$t>::saturating_add(self, rhs)
            }

            #[inline]
            fn saturating_sub(self, rhs: Self) -> Self {
                <$t>::saturating_sub(self, rhs)
            }

            #[inline]
            fn saturating_mul(self, rhs: Self) -> Self {
                <$t>::saturating_mul(self, rhs)
            }

            #[inline]
            fn abs_diff_widened(self, other: Self) -> Self {
                let diff = (self as i128 - other as i128).abs();
                diff.clamp(0, <$t>::MAX as i128) as $t
            }
        }
    };
}

impl_unsigned_sample!(u8, PixelDepth::U8);
impl_unsigned_sample!(u16, PixelDepth::U16);
impl_unsigned_sample!(u32, PixelDepth::U32);
impl_unsigned_sample!(u64, PixelDepth::U64);

impl Sample for f64 {
    const DEPTH: PixelDepth = PixelDepth::F64;
    const MAX: Self = f64::MAX;
    const LOWEST: Self = f64::MIN;
    const ZERO: Self = 0.0;

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    /// Infinities saturate to the finite range; NaN passes through.
    #[inline]
    fn from_f64(value: f64) -> Self {
        value.clamp(f64::MIN, f64::MAX)
    }

    #[inline]
    fn from_f64_trunc(value: f64) -> Self {
        value.clamp(f64::MIN, f64::MAX)
    }

    #[inline]
    fn to_u128(self) -> Option<u128> {
        None
    }

    #[inline]
    fn from_u128(value: u128) -> Self {
        value as f64
    }

    #[inline]
    fn saturating_add(self, rhs: Self) -> Self {
        self + rhs
    }

    #[inline]
    fn saturating_sub(self, rhs: Self) -> Self {
        self - rhs
    }

    #[inline]
    fn saturating_mul(self, rhs: Self) -> Self {
        (self * rhs).min(f64::MAX)
    }

    /// Both operands are truncated to `i64` before differencing, so the
    /// result is always integral.
    #[inline]
    fn abs_diff_widened(self, other: Self) -> Self {
        let diff = (self as i64 as i128 - other as i64 as i128).abs();
        diff as f64
    }
}

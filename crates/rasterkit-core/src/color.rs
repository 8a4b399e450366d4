//! Pixel color values
//!
//! [`Color`] is an immutable RGBA value over a [`Sample`] type. A gray
//! color is simply one with `R == G == B`. [`Scalar`] wraps a single
//! sample so gray values can go through the same [`Mix`]-based
//! interpolation as colors.

use crate::sample::Sample;
use std::cmp::Ordering;
use std::ops::{Add, Div, Mul, Sub};

/// Values that can be blended with weighted neighbors.
///
/// `mix` gives each `(weight, value)` pair its weight and assigns the
/// remaining `clamp(1 - Σweight, 0, 1)` to `self`.
pub trait Mix: Sized {
    /// Blend `self` with weighted values.
    fn mix(&self, weighted: &[(f64, Self)]) -> Self;
}

/// RGBA pixel value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color<T: Sample> {
    red: T,
    green: T,
    blue: T,
    alpha: T,
}

impl<T: Sample> Color<T> {
    /// Create a color from all four components.
    pub const fn rgba(red: T, green: T, blue: T, alpha: T) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Create an opaque color.
    pub const fn rgb(red: T, green: T, blue: T) -> Self {
        Self::rgba(red, green, blue, T::MAX)
    }

    /// Create an opaque gray color.
    pub const fn gray(gray: T) -> Self {
        Self::rgba(gray, gray, gray, T::MAX)
    }

    /// Create a gray color with explicit alpha.
    pub const fn gray_alpha(gray: T, alpha: T) -> Self {
        Self::rgba(gray, gray, gray, alpha)
    }

    #[inline]
    pub fn red(&self) -> T {
        self.red
    }

    #[inline]
    pub fn green(&self) -> T {
        self.green
    }

    #[inline]
    pub fn blue(&self) -> T {
        self.blue
    }

    #[inline]
    pub fn alpha(&self) -> T {
        self.alpha
    }

    /// Gray value (luma).
    ///
    /// Exact when `R == G == B`, otherwise `0.299R + 0.587G + 0.114B`
    /// rounded to nearest.
    pub fn to_gray(&self) -> T {
        if self.red == self.green && self.red == self.blue {
            self.red
        } else {
            T::from_f64(
                0.299 * self.red.to_f64() + 0.587 * self.green.to_f64() + 0.114 * self.blue.to_f64(),
            )
        }
    }

    /// Check whether the RGB components differ.
    pub fn is_colored(&self) -> bool {
        self.red != self.green || self.red != self.blue
    }

    /// Same hue and saturation with luma `y`.
    ///
    /// Goes through YUV; each resulting component is clamped to
    /// `[0, MAX]` and rounded. Alpha is kept.
    pub fn with_brightness(&self, y: T) -> Self {
        if !self.is_colored() {
            return Self::gray_alpha(y, self.alpha);
        }

        let (r, g, b) = (self.red.to_f64(), self.green.to_f64(), self.blue.to_f64());
        let u = -0.14713 * r - 0.28886 * g + 0.436 * b;
        let v = 0.615 * r - 0.51498 * g - 0.10001 * b;
        let y = y.to_f64();

        let clamp = |c: f64| T::from_f64(c.clamp(0.0, T::MAX.to_f64()));
        Self::rgba(
            clamp(y + 1.13983 * v),
            clamp(y - 0.39465 * u - 0.58060 * v),
            clamp(y + 2.03211 * u),
            self.alpha,
        )
    }

    /// Order two colors, possibly of different sample types, by gray value.
    pub fn cmp_gray<U: Sample>(&self, other: &Color<U>) -> Option<Ordering> {
        self.to_gray().to_f64().partial_cmp(&other.to_gray().to_f64())
    }

    /// Check whether this color is strictly brighter than `other`.
    pub fn is_brighter_than<U: Sample>(&self, other: &Color<U>) -> bool {
        self.cmp_gray(other) == Some(Ordering::Greater)
    }

    /// Check whether this color is strictly darker than `other`.
    pub fn is_darker_than<U: Sample>(&self, other: &Color<U>) -> bool {
        self.cmp_gray(other) == Some(Ordering::Less)
    }
}

impl<T: Sample> From<T> for Color<T> {
    fn from(gray: T) -> Self {
        Self::gray(gray)
    }
}

impl<T: Sample> Mix for Color<T> {
    fn mix(&self, weighted: &[(f64, Self)]) -> Self {
        let mut sum_w = 0.0;
        let mut sum = [0.0f64; 4];
        for (weight, color) in weighted {
            sum_w += weight;
            sum[0] += weight * color.red.to_f64();
            sum[1] += weight * color.green.to_f64();
            sum[2] += weight * color.blue.to_f64();
            sum[3] += weight * color.alpha.to_f64();
        }

        let own = (1.0 - sum_w).clamp(0.0, 1.0);
        Self::rgba(
            T::from_f64(own * self.red.to_f64() + sum[0]),
            T::from_f64(own * self.green.to_f64() + sum[1]),
            T::from_f64(own * self.blue.to_f64() + sum[2]),
            T::from_f64(own * self.alpha.to_f64() + sum[3]),
        )
    }
}

/// Saturating component-wise addition of RGB; alpha of `self` is kept.
impl<T: Sample> Add for Color<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::rgba(
            self.red.saturating_add(rhs.red),
            self.green.saturating_add(rhs.green),
            self.blue.saturating_add(rhs.blue),
            self.alpha,
        )
    }
}

/// Saturating component-wise subtraction of RGB; alpha of `self` is kept.
impl<T: Sample> Sub for Color<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::rgba(
            self.red.saturating_sub(rhs.red),
            self.green.saturating_sub(rhs.green),
            self.blue.saturating_sub(rhs.blue),
            self.alpha,
        )
    }
}

/// Brighten every RGB component by a real offset, bounded to the type range.
impl<T: Sample> Add<f64> for Color<T> {
    type Output = Self;

    fn add(self, rhs: f64) -> Self {
        Self::rgba(
            self.red.bounded_add(rhs),
            self.green.bounded_add(rhs),
            self.blue.bounded_add(rhs),
            self.alpha,
        )
    }
}

/// Darken every RGB component by a real offset, bounded to the type range.
impl<T: Sample> Sub<f64> for Color<T> {
    type Output = Self;

    fn sub(self, rhs: f64) -> Self {
        Self::rgba(
            self.red.bounded_sub(rhs),
            self.green.bounded_sub(rhs),
            self.blue.bounded_sub(rhs),
            self.alpha,
        )
    }
}

impl<T: Sample> Mul<T> for Color<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        Self::rgba(
            self.red.saturating_mul(rhs),
            self.green.saturating_mul(rhs),
            self.blue.saturating_mul(rhs),
            self.alpha,
        )
    }
}

impl<T: Sample> Div<T> for Color<T> {
    type Output = Self;

    fn div(self, rhs: T) -> Self {
        Self::rgba(self.red / rhs, self.green / rhs, self.blue / rhs, self.alpha)
    }
}

/// A single sample that can be interpolated.
///
/// The mix result goes through [`Sample::from_f64`], so integer samples
/// are rounded and `f64` samples keep their fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scalar<T: Sample>(pub T);

impl<T: Sample> Scalar<T> {
    /// Get the wrapped sample.
    #[inline]
    pub fn value(self) -> T {
        self.0
    }
}

impl<T: Sample> Mix for Scalar<T> {
    fn mix(&self, weighted: &[(f64, Self)]) -> Self {
        let mut sum = 0.0;
        let mut sum_w = 0.0;
        for (weight, v) in weighted {
            sum_w += weight;
            sum += weight * v.0.to_f64();
        }
        let own = (1.0 - sum_w).clamp(0.0, 1.0);
        Scalar(T::from_f64(own * self.0.to_f64() + sum))
    }
}

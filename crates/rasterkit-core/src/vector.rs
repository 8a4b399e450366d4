//! 2-D direction vectors
//!
//! A [`Vector`] is stored in cartesian form; its angle and length are
//! computed on first use and cached. Used to draw lines with a
//! directional offset, see [`BitmapData::draw_vector`].
//!
//! [`BitmapData::draw_vector`]: crate::BitmapData::draw_vector

use crate::color::Mix;
use std::cell::Cell;
use std::cmp::Ordering;
use std::f64::consts::TAU;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

/// Direction and magnitude in the image plane
///
/// The default vector is invalid (see [`Vector::is_valid`]).
#[derive(Debug, Clone)]
pub struct Vector {
    vx: f64,
    vy: f64,
    phi: Cell<Option<f64>>,
    len: Cell<Option<f64>>,
}

impl Vector {
    /// Create a vector from polar form.
    pub fn from_polar(phi: f64, len: f64) -> Self {
        Self {
            vx: phi.cos() * len,
            vy: phi.sin() * len,
            phi: Cell::new(None),
            len: Cell::new(Some(len)),
        }
    }

    /// Create a unit vector pointing at angle `phi`.
    pub fn unit(phi: f64) -> Self {
        Self::from_polar(phi, 1.0)
    }

    /// Create a vector from cartesian components.
    pub fn new(vx: f64, vy: f64) -> Self {
        Self {
            vx,
            vy,
            phi: Cell::new(None),
            len: Cell::new(None),
        }
    }

    /// Check whether both components are set.
    pub fn is_valid(&self) -> bool {
        !self.vx.is_nan() && !self.vy.is_nan()
    }

    #[inline]
    pub fn vx(&self) -> f64 {
        self.vx
    }

    #[inline]
    pub fn vy(&self) -> f64 {
        self.vy
    }

    /// Get both components.
    pub fn components(&self) -> (f64, f64) {
        (self.vx, self.vy)
    }

    /// Angle in `[0, 2π)`.
    pub fn phi(&self) -> f64 {
        if let Some(phi) = self.phi.get() {
            return phi;
        }
        let phi = (self.vy.atan2(self.vx) + TAU) % TAU;
        self.phi.set(Some(phi));
        phi
    }

    /// Euclidean length.
    pub fn len(&self) -> f64 {
        if let Some(len) = self.len.get() {
            return len;
        }
        let len = self.vx.hypot(self.vy);
        self.len.set(Some(len));
        len
    }

    /// Same length, rotated by `angle` radians.
    pub fn rotated(&self, angle: f64) -> Self {
        Self::from_polar((self.phi() + angle + TAU) % TAU, self.len())
    }

    /// Order two vectors by length.
    pub fn cmp_len(&self, other: &Vector) -> Option<Ordering> {
        self.len().partial_cmp(&other.len())
    }
}

impl Default for Vector {
    fn default() -> Self {
        Self::new(f64::NAN, f64::NAN)
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.vx == other.vx && self.vy == other.vy
    }
}

impl Mix for Vector {
    fn mix(&self, weighted: &[(f64, Self)]) -> Self {
        let mut sum_w = 0.0;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        for (weight, v) in weighted {
            sum_w += weight;
            sum_x += weight * v.vx;
            sum_y += weight * v.vy;
        }
        let own = (1.0 - sum_w).clamp(0.0, 1.0);
        Self::new(own * self.vx + sum_x, own * self.vy + sum_y)
    }
}

impl Mul<f64> for Vector {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.vx * rhs, self.vy * rhs)
    }
}

impl Div<f64> for Vector {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.vx / rhs, self.vy / rhs)
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.vx + rhs.vx, self.vy + rhs.vy)
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.vx - rhs.vx, self.vy - rhs.vy)
    }
}

/// Adding an angle rotates counter-clockwise.
impl Add<f64> for Vector {
    type Output = Self;

    fn add(self, angle: f64) -> Self {
        self.rotated(angle)
    }
}

/// Subtracting an angle rotates clockwise.
impl Sub<f64> for Vector {
    type Output = Self;

    fn sub(self, angle: f64) -> Self {
        self.rotated(-angle)
    }
}

impl AddAssign<f64> for Vector {
    fn add_assign(&mut self, angle: f64) {
        *self = self.rotated(angle);
    }
}

impl SubAssign<f64> for Vector {
    fn sub_assign(&mut self, angle: f64) {
        *self = self.rotated(-angle);
    }
}

//! Display conversion to 8 bits per channel
//!
//! Renders a bitmap of any depth into a byte buffer for display, mapping
//! each sample through the display range `[min, max]` and an optional
//! gamma tone curve.
//!
//! # Output layout
//!
//! | source channels | output channels | row alignment | order |
//! |----------------:|----------------:|--------------:|-------|
//! | 1               | 1               | 4 bytes       | gray  |
//! | 3               | 4               | 1 byte        | BGRA, alpha 255 |
//! | 4               | 4               | 1 byte        | BGRA  |
//!
//! Destination pixels that have no source pixel are set to
//! [`FILL_BYTE`] on every channel.

use super::BitmapData;
use crate::error::{Error, Result};
use crate::gamma::GammaCache;
use crate::sample::Sample;
use log::debug;
use rayon::prelude::*;

/// Byte written where the destination has no source pixel.
pub const FILL_BYTE: u8 = 55;

/// Parameters of [`BitmapData::convert_to_depth8`]
///
/// A zero or negative size selects the default: the crop extends to the
/// right and bottom image edges, and the output is as large as the crop.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Depth8Options {
    /// Weight of the logarithmic tone curve, 0 for a linear mapping
    pub gamma: f64,
    /// Left edge of the source crop
    pub x: i32,
    /// Top edge of the source crop
    pub y: i32,
    /// Crop width
    pub width: i32,
    /// Crop height
    pub height: i32,
    /// Output width
    pub scaled_width: i32,
    /// Output height
    pub scaled_height: i32,
}

impl Depth8Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_crop(mut self, x: i32, y: i32, width: i32, height: i32) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_scale(mut self, scaled_width: i32, scaled_height: i32) -> Self {
        self.scaled_width = scaled_width;
        self.scaled_height = scaled_height;
        self
    }
}

/// 8-bit display rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Depth8Image {
    pub width: u32,
    pub height: u32,
    /// 1 (gray) or 4 (BGRA)
    pub channels: u32,
    /// Bytes per row, including alignment padding
    pub stride: usize,
    pub data: Vec<u8>,
}

impl Depth8Image {
    /// Get the bytes of one row, padding included.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.stride]
    }

    /// Get the bytes of the pixel at (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let start = y as usize * self.stride + x as usize * self.channels as usize;
        &self.data[start..start + self.channels as usize]
    }
}

/// Mapping from a sample to its display byte.
struct DisplayMap<T> {
    min: T,
    max: T,
    range: f64,
    gamma: f64,
    weight: f64,
    delta: f64,
    factor: f64,
}

impl<T: Sample> DisplayMap<T> {
    fn new(min: T, max: T, gamma: f64) -> Self {
        let delta = 9.0 - gamma * 6.0;
        let span = max.to_f64() - min.to_f64();
        Self {
            min,
            max,
            range: max.saturating_sub(min).to_f64(),
            gamma,
            weight: (gamma * 2.0).min(1.0),
            delta,
            factor: 256.0 / (span.ln_1p() / std::f64::consts::LN_2 - delta),
        }
    }

    fn map(&self, val: T) -> u8 {
        let v = if val < self.min { self.min } else { val };
        let v = if self.max < v { self.max } else { v };
        let diff = if v >= self.min {
            v.saturating_sub(self.min)
        } else {
            T::ZERO
        };
        let val0 = 255.0 * diff.to_f64() / self.range;

        let t = if self.gamma == 0.0 {
            val0
        } else {
            let r = v.to_f64().log2() - self.delta;
            let val1 = if r <= 0.0 { 0.0 } else { r * self.factor };
            self.weight * val1 + (1.0 - self.weight) * val0
        };
        // NaN maps to 0
        t.round().clamp(0.0, 255.0) as u8
    }

    fn write(&self, src: &[T], dest: &mut [u8]) {
        match src.len() {
            3 => {
                dest[0] = self.map(src[2]);
                dest[1] = self.map(src[1]);
                dest[2] = self.map(src[0]);
                dest[3] = 255;
            }
            4 => {
                dest[0] = self.map(src[3]);
                dest[1] = self.map(src[2]);
                dest[2] = self.map(src[1]);
                dest[3] = self.map(src[0]);
            }
            _ => dest[0] = self.map(src[0]),
        }
    }
}

impl<T: Sample> BitmapData<'_, T> {
    /// Map one sample to its 8-bit display value.
    ///
    /// The sample is clamped to the display range and scaled linearly to
    /// `[0, 255]`. A non-zero `gamma` blends in a logarithmic curve with
    /// weight `min(2·gamma, 1)`. The result is rounded.
    pub fn display_value(&self, val: T, gamma: f64) -> u8 {
        DisplayMap::new(self.min_displayed, self.max_displayed, gamma).map(val)
    }

    /// Render to 8 bits per channel using the process-wide gamma cache.
    ///
    /// # Errors
    ///
    /// See [`convert_to_depth8_with`](Self::convert_to_depth8_with).
    pub fn convert_to_depth8(&self, options: &Depth8Options) -> Result<Depth8Image> {
        self.convert_to_depth8_with(options, GammaCache::global())
    }

    /// Render to 8 bits per channel.
    ///
    /// Without scaling every source pixel of the crop maps to one output
    /// pixel. With scaling the crop is fitted into the output keeping its
    /// aspect ratio, sampled with nearest neighbor, and the unused bars are
    /// filled with [`FILL_BYTE`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyBitmap`] for an empty bitmap and
    /// [`Error::InvalidParameter`] if the crop or output size is empty.
    pub fn convert_to_depth8_with(
        &self,
        options: &Depth8Options,
        cache: &GammaCache,
    ) -> Result<Depth8Image> {
        if self.is_empty() {
            return Err(Error::EmptyBitmap("convert_to_depth8"));
        }

        let (x, y) = (options.x as i64, options.y as i64);
        let w = if options.width <= 0 {
            self.width as i64 - x
        } else {
            options.width as i64
        };
        let h = if options.height <= 0 {
            self.height as i64 - y
        } else {
            options.height as i64
        };
        let sw = if options.scaled_width <= 0 {
            w
        } else {
            options.scaled_width as i64
        };
        let sh = if options.scaled_height <= 0 {
            h
        } else {
            options.scaled_height as i64
        };
        if w <= 0 || h <= 0 || sw <= 0 || sh <= 0 {
            return Err(Error::InvalidParameter(format!(
                "convert_to_depth8: crop {x}/{y} {w}x{h} scaled to {sw}x{sh} is empty"
            )));
        }

        let gamma = cache.ensure(options.gamma);
        // gray rows are padded to 4 bytes
        let (dest_channels, align) = if self.channels == 1 {
            (1usize, 4usize)
        } else {
            (4, 1)
        };
        debug!(
            "converting to depth 8: {x}/{y} ({w}x{h} scaled to {sw}x{sh}), {dest_channels} destination channels"
        );

        let aligned_width = (sw as usize).div_ceil(align) * align;
        let stride = aligned_width * dest_channels;
        let map = DisplayMap::new(self.min_displayed, self.max_displayed, gamma);
        let channels = self.channels as usize;
        let source = |sx: i64, sy: i64| {
            if sx < 0 || sy < 0 || sx >= self.width as i64 || sy >= self.height as i64 {
                return None;
            }
            let off = self.offset(sx as u32, sy as u32);
            Some(&self.buffer[off..off + channels])
        };

        let data = if sw == w && sh == h {
            let mut data = vec![0u8; stride * sh as usize];
            data.par_chunks_mut(stride)
                .enumerate()
                .for_each(|(j, row)| {
                    for i in 0..w as usize {
                        let dest = &mut row[i * dest_channels..(i + 1) * dest_channels];
                        match source(x + i as i64, y + j as i64) {
                            Some(src) => map.write(src, dest),
                            None => dest.fill(FILL_BYTE),
                        }
                    }
                });
            data
        } else {
            let aspect = w as f64 / h as f64;
            let wider = sw as f64 / sh as f64 > aspect;
            let fill_w = if wider {
                ((sh as f64 * aspect).round() as i64).min(sw)
            } else {
                sw
            };
            let fill_h = if wider {
                sh
            } else {
                ((sw as f64 / aspect).round() as i64).min(sh)
            };

            let mut data = vec![FILL_BYTE; stride * sh as usize];
            data.par_chunks_mut(stride)
                .take(fill_h as usize)
                .enumerate()
                .for_each(|(j, row)| {
                    let sy = y + (j as f64 * h as f64 / fill_h as f64).round() as i64;
                    for i in 0..fill_w as usize {
                        let sx = x + (i as f64 * w as f64 / fill_w as f64).round() as i64;
                        if let Some(src) = source(sx, sy) {
                            map.write(src, &mut row[i * dest_channels..(i + 1) * dest_channels]);
                        }
                    }
                });
            data
        };

        Ok(Depth8Image {
            width: sw as u32,
            height: sh as u32,
            channels: dest_channels as u32,
            stride,
            data,
        })
    }
}

//! rasterkit Core - In-memory raster images
//!
//! This crate provides the image container and the pixel algorithms built
//! on it:
//!
//! - [`BitmapData`] - Image over one sample type (`u8`, `u16`, `u32`,
//!   `u64` or `f64`) that owns or borrows its buffer
//! - [`Bitmap`] - Depth-erased image, selected by a signed depth code
//! - [`Color`] / [`Scalar`] - Pixel values with saturating arithmetic
//! - [`Vector`] - 2-D direction vector for line drawing
//! - [`ParamRecord`] - Host parameter record describing an image buffer
//! - [`GammaCache`] - Gamma table for the 8-bit display conversion
//!
//! Pixels are stored interleaved, row-major, with 1 (gray), 3 (RGB) or
//! 4 (ARGB) channels per pixel.
//!
//! # Example
//!
//! ```
//! use rasterkit_core::{BitmapData, Color, Region};
//!
//! let mut bmp = BitmapData::<u16>::new(64, 48, 1).unwrap();
//! bmp.plot(10, 20, Color::gray(1000)).unwrap();
//!
//! let peak = bmp.max(Region::full()).unwrap();
//! assert_eq!((peak.x, peak.y), (10, 20));
//! ```

pub mod bitmap;
pub mod bitmap_data;
pub mod color;
pub mod error;
pub mod gamma;
pub mod interpolation;
pub mod sample;
pub mod vector;

pub use bitmap::{
    BUFFER_KEY, Bitmap, CHANNELS_KEY, DEPTH_KEY, HEIGHT_KEY, IMAGE_KEYS, MAX_BRIGHTNESS_KEY,
    MIN_BRIGHTNESS_KEY, ParamRecord, ParamValue, WIDTH_KEY,
};
pub use bitmap_data::convert::FILL_BYTE;
pub use bitmap_data::{
    BitmapData, Depth8Image, Depth8Options, Extremum, GrayLow, GrayPeak, GrayStats, PixelBuffer,
    Region, bresenham, walk_segment,
};
pub use color::{Color, Mix, Scalar};
pub use error::{Error, Result};
pub use gamma::{GAMMA_TABLE_LEN, GammaCache};
pub use interpolation::{SampleDomain, interpolate};
pub use sample::{PixelDepth, Sample};
pub use vector::Vector;

//! rasterkit - In-memory raster image engine
//!
//! Typed pixel buffers of 8, 16, 32 or 64-bit unsigned or 64-bit float
//! samples, with region statistics, line drawing, saturating arithmetic,
//! absolute differences and a gamma-corrected 8-bit display conversion.
//!
//! # Example
//!
//! ```
//! use rasterkit::{Bitmap, Depth8Options};
//!
//! let bmp = Bitmap::new(4, 4, 3, 2).unwrap();
//! let out = bmp.convert_to_depth8(&Depth8Options::default()).unwrap();
//! assert_eq!(out.channels, 4);
//! ```

pub use rasterkit_core::*;

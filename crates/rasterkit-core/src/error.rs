//! Error types for rasterkit-core
//!
//! Provides a unified error type for all operations in the core crate.
//! The variants follow the four failure families of the engine:
//! unsupported configuration, geometry mismatch, missing or ill-typed
//! parameter record fields, and alpha writes that the channel layout
//! cannot represent.

use thiserror::Error;

/// Rasterkit error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Channel count other than 1, 3 or 4
    #[error("unsupported number of channels: {0}")]
    UnsupportedChannels(u32),

    /// Depth value outside the signed encoding (1, 2, 4, 8, -8)
    #[error("unsupported image depth: {0}")]
    UnsupportedDepth(i32),

    /// Width or height that cannot describe a bitmap
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: i64, height: i64 },

    /// Two bitmaps that must share width, height and channels do not
    #[error(
        "{op}: geometry mismatch, expected {}x{}x{}, got {}x{}x{}",
        .expected.0, .expected.1, .expected.2, .actual.0, .actual.1, .actual.2
    )]
    GeometryMismatch {
        op: &'static str,
        expected: (u32, u32, u32),
        actual: (u32, u32, u32),
    },

    /// Two bitmaps of different depth were combined
    #[error("{op}: depth mismatch, {expected} vs {actual}")]
    DepthMismatch {
        op: &'static str,
        expected: i32,
        actual: i32,
    },

    /// Required key absent from a parameter record
    #[error("{site}: missing required key '{key}'")]
    MissingField { key: String, site: &'static str },

    /// Key present in a parameter record but holding the wrong kind of value
    #[error("{site}: key '{key}' does not hold a {expected} value")]
    FieldType {
        key: String,
        expected: &'static str,
        site: &'static str,
    },

    /// Non-opaque alpha written into a layout without an alpha channel
    #[error("cannot set alpha channel to {alpha} in an image with {channels} channels")]
    InvalidAlpha { alpha: String, channels: u32 },

    /// Buffer length does not match the declared geometry
    #[error("buffer size mismatch: expected {expected} samples, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// External buffer pointer is null or not aligned for the sample type
    #[error("external buffer is null or misaligned for {0}-byte samples")]
    MisalignedBuffer(usize),

    /// Operation requires pixel data but the bitmap is empty
    #[error("{0}: bitmap is empty")]
    EmptyBitmap(&'static str),

    /// Region that is empty after clamping to the image bounds
    #[error("region {x0},{y0}..{x1},{y1} is empty after clamping")]
    EmptyRegion { x0: i32, y0: i32, x1: i32, y1: i32 },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for rasterkit operations
pub type Result<T> = std::result::Result<T, Error>;

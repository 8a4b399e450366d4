//! rasterkit-test - Regression test framework for rasterkit
//!
//! Tracks numbered checks inside one regression test, in three modes:
//!
//! - **Generate**: Write golden files for comparison
//! - **Compare**: Compare results with golden files
//! - **Display**: Run tests without comparison
//!
//! # Usage
//!
//! ```ignore
//! use rasterkit_test::RegParams;
//!
//! let mut rp = RegParams::new("stats");
//! rp.compare_values(4452.0, sum, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "generate", "compare", or "display"

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use rasterkit_core::{Bitmap, BitmapData, Sample};

/// Build a deterministic test image.
///
/// Sample `i` of the buffer holds `(i * 37 + 11) % 251`, so neighbouring
/// pixels and channels differ and every depth gets the same pattern.
///
/// # Errors
///
/// Returns [`TestError::Core`] for an unsupported depth or channel count.
pub fn synthetic_bitmap(
    width: u32,
    height: u32,
    channels: u32,
    depth: i32,
) -> TestResult<Bitmap<'static>> {
    let mut bmp = Bitmap::new(width, height, channels, depth)?;
    match &mut bmp {
        Bitmap::U8(d) => fill_pattern(d),
        Bitmap::U16(d) => fill_pattern(d),
        Bitmap::U32(d) => fill_pattern(d),
        Bitmap::U64(d) => fill_pattern(d),
        Bitmap::F64(d) => fill_pattern(d),
    }
    Ok(bmp)
}

fn fill_pattern<T: Sample>(data: &mut BitmapData<'_, T>) {
    for (i, s) in data.as_mut_slice().iter_mut().enumerate() {
        *s = T::from_f64(((i * 37 + 11) % 251) as f64);
    }
}

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // rasterkit-test is at crates/rasterkit-test
    format!("{}/../..", manifest_dir)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}

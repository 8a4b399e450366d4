//! Regression test parameters and operations

use crate::error::TestResult;
use crate::{golden_dir, regout_dir};
use rasterkit_core::{Bitmap, Depth8Image};
use std::fs;
use std::path::Path;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Generate golden files
    Generate,
    /// Compare with golden files (default)
    #[default]
    Compare,
    /// Display mode - run without comparison
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "generate" => Self::Generate,
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, the index of the current check, the mode, and
/// whether every check so far has passed.
pub struct RegParams {
    /// Name of the test (e.g., "stats")
    pub test_name: String,
    /// Current check index (incremented before each check)
    index: usize,
    /// Test mode (generate, compare, or display)
    pub mode: RegTestMode,
    success: bool,
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode is taken from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        let _ = fs::create_dir_all(golden_dir());
        let _ = fs::create_dir_all(regout_dir());

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current check index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) -> bool {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
        false
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta || diff.is_nan() {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Compare two bitmaps for exact equality of depth, geometry and samples
    pub fn compare_bitmaps(&mut self, bmp1: &Bitmap<'_>, bmp2: &Bitmap<'_>) -> bool {
        self.index += 1;

        if !bmp1.same_geometry(bmp2) {
            let msg = format!(
                "Failure in {}_reg: bitmap comparison for index {} - geometry mismatch",
                self.test_name, self.index
            );
            return self.fail(msg);
        }

        let mismatch = match (bmp1, bmp2) {
            (Bitmap::U8(a), Bitmap::U8(b)) => first_mismatch(a.as_slice(), b.as_slice()),
            (Bitmap::U16(a), Bitmap::U16(b)) => first_mismatch(a.as_slice(), b.as_slice()),
            (Bitmap::U32(a), Bitmap::U32(b)) => first_mismatch(a.as_slice(), b.as_slice()),
            (Bitmap::U64(a), Bitmap::U64(b)) => first_mismatch(a.as_slice(), b.as_slice()),
            (Bitmap::F64(a), Bitmap::F64(b)) => first_mismatch(a.as_slice(), b.as_slice()),
            _ => Some(0),
        };

        match mismatch {
            Some(i) => {
                let stride = bmp1.stride().max(1);
                let channels = bmp1.channels().max(1) as usize;
                let msg = format!(
                    "Failure in {}_reg: bitmap comparison for index {} - sample mismatch at ({}, {})",
                    self.test_name,
                    self.index,
                    (i % stride) / channels,
                    i / stride
                );
                self.fail(msg)
            }
            None => true,
        }
    }

    /// Compare two 8-bit display renderings
    pub fn compare_depth8(&mut self, img1: &Depth8Image, img2: &Depth8Image) -> bool {
        self.index += 1;

        if img1 != img2 {
            let msg = format!(
                "Failure in {}_reg: depth8 comparison for index {}\n\
                 sizes: {}x{}x{} vs {}x{}x{}",
                self.test_name,
                self.index,
                img1.width,
                img1.height,
                img1.channels,
                img2.width,
                img2.height,
                img2.channels
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Compare two binary data arrays
    pub fn compare_strings(&mut self, data1: &[u8], data2: &[u8]) -> bool {
        self.index += 1;

        if data1 != data2 {
            let msg = format!(
                "Failure in {}_reg: string comparison for index {}\n\
                 sizes: {} vs {}",
                self.test_name,
                self.index,
                data1.len(),
                data2.len()
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Write data to file and check against golden file
    ///
    /// # Arguments
    ///
    /// * `data` - Data to write
    /// * `ext` - File extension (e.g., "d8", "raw")
    pub fn write_data_and_check(&mut self, data: &[u8], ext: &str) -> TestResult<()> {
        self.index += 1;

        let local_path = format!(
            "{}/{}.{:02}.{}",
            regout_dir(),
            self.test_name,
            self.index,
            ext
        );

        fs::write(&local_path, data)?;
        self.check_file(&local_path)
    }

    /// Check a file against its golden counterpart
    ///
    /// In generate mode, copies the file to golden.
    /// In compare mode, compares with golden file; a missing golden file
    /// is a failure.
    /// In display mode, does nothing.
    fn check_file(&mut self, local_path: &str) -> TestResult<()> {
        let ext = Path::new(local_path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        let golden_path = format!(
            "{}/{}_golden.{:02}.{}",
            golden_dir(),
            self.test_name,
            self.index,
            ext
        );

        match self.mode {
            RegTestMode::Generate => {
                fs::copy(local_path, &golden_path)?;
                eprintln!("Generated: {}", golden_path);
            }
            RegTestMode::Compare => {
                if !Path::new(&golden_path).exists() {
                    let msg = format!(
                        "Failure in {}_reg: golden file not found: {}",
                        self.test_name, golden_path
                    );
                    self.fail(msg);
                    return Ok(());
                }

                let local_data = fs::read(local_path)?;
                let golden_data = fs::read(&golden_path)?;

                if local_data != golden_data {
                    let msg = format!(
                        "Failure in {}_reg, index {}: comparing {} with {}",
                        self.test_name, self.index, local_path, golden_path
                    );
                    self.fail(msg);
                }
            }
            RegTestMode::Display => {}
        }

        Ok(())
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all checks passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

fn first_mismatch<T: PartialEq>(a: &[T], b: &[T]) -> Option<usize> {
    if a.len() != b.len() {
        return Some(a.len().min(b.len()));
    }
    a.iter().zip(b).position(|(x, y)| x != y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic_bitmap;

    #[test]
    fn test_mode_from_env() {
        let mode = RegTestMode::from_env();
        assert!(matches!(
            mode,
            RegTestMode::Compare | RegTestMode::Generate | RegTestMode::Display
        ));
    }

    #[test]
    fn test_compare_values() {
        let mut rp = RegParams::new("params_values");
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.is_success());
        assert_eq!(rp.index(), 2);
        assert_eq!(rp.failures().len(), 1);
    }

    #[test]
    fn test_compare_bitmaps() {
        let mut rp = RegParams::new("params_bitmaps");
        let a = synthetic_bitmap(5, 4, 3, 2).unwrap();
        let mut b = a.clone();
        assert!(rp.compare_bitmaps(&a, &b));

        b.as_u16_mut().unwrap().as_mut_slice()[3 * 5 + 3] += 1;
        assert!(!rp.compare_bitmaps(&a, &b));
        assert!(rp.failures()[0].contains("(1, 1)"));

        let c = synthetic_bitmap(5, 4, 3, 1).unwrap();
        assert!(!rp.compare_bitmaps(&a, &c));
    }

    #[test]
    fn test_missing_golden_file_fails() {
        let mut rp = RegParams::new("absent_golden");
        if rp.mode != RegTestMode::Compare {
            return;
        }
        rp.write_data_and_check(&[1, 2, 3], "d8").unwrap();
        assert!(!rp.is_success());
        assert!(rp.failures()[0].contains("golden file not found"));
    }

    #[test]
    fn test_synthetic_pattern_same_across_depths() {
        let a = synthetic_bitmap(3, 2, 1, 1).unwrap();
        let b = synthetic_bitmap(3, 2, 1, -8).unwrap();
        let a = a.as_u8().unwrap().as_slice().to_vec();
        let b = b.as_f64().unwrap().as_slice().to_vec();
        assert_eq!(a, [11, 48, 85, 122, 159, 196]);
        assert!(a.iter().zip(&b).all(|(&x, &y)| x as f64 == y));
    }
}

//! Region statistics
//!
//! Extremum searches, averages and standard deviation over a rectangular
//! region of a bitmap.
//!
//! # Reduction
//!
//! Every row of the region is reduced in parallel to a partial result.
//! The partials are collected in row order and merged on one thread, so
//! the outcome does not depend on scheduling.
//!
//! # Ties
//!
//! Pixels are ranked by value (best first), then by scan position (row
//! by row, left to right). The primary extremum is the first pixel in
//! that order and the secondary extremum the second one. Several pixels
//! sharing the extreme value therefore report the earliest as primary and
//! the next as secondary, with the same value.
//!
//! # Average
//!
//! Integer samples report `⌊(Σ + 1) / n⌋`. Floating point samples report
//! the plain mean `Σ / n`.

use super::BitmapData;
use crate::color::Color;
use crate::error::{Error, Result};
use crate::sample::Sample;
use rayon::prelude::*;

/// Inclusive pixel rectangle
///
/// Each coordinate is clamped into the image before use, so a rectangle
/// lying past an edge collapses onto the outermost row or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Region {
    /// Create a region from two inclusive corners.
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// A region covering any image.
    pub const fn full() -> Self {
        Self::new(0, 0, i32::MAX, i32::MAX)
    }

    fn clamp_to(&self, width: u32, height: u32) -> Result<Bounds> {
        let empty = Error::EmptyRegion {
            x0: self.x0,
            y0: self.y0,
            x1: self.x1,
            y1: self.y1,
        };
        if width == 0 || height == 0 || self.x0 > self.x1 || self.y0 > self.y1 {
            return Err(empty);
        }
        let clamp = |v: i32, len: u32| (v.max(0) as u32).min(len - 1);
        Ok(Bounds {
            x0: clamp(self.x0, width),
            y0: clamp(self.y0, height),
            x1: clamp(self.x1, width),
            y1: clamp(self.y1, height),
        })
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::full()
    }
}

/// Region after clamping to the image, never empty.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl Bounds {
    fn count(&self) -> u64 {
        (self.x1 - self.x0 + 1) as u64 * (self.y1 - self.y0 + 1) as u64
    }
}

/// A value and the pixel where it was found
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremum<V> {
    pub value: V,
    pub x: u32,
    pub y: u32,
}

/// Result of [`BitmapData::max_gray`]
#[derive(Debug, Clone, PartialEq)]
pub struct GrayStats<T> {
    /// Brightest pixel
    pub max: Extremum<T>,
    /// Second pixel in brightness order, `None` for a one-pixel region
    pub second_max: Option<Extremum<T>>,
    /// Darkest pixel
    pub min: Extremum<T>,
    pub average: T,
    /// Population standard deviation, only when requested
    pub std_deviation: Option<f64>,
}

/// Result of [`BitmapData::max_gray2`]
#[derive(Debug, Clone, PartialEq)]
pub struct GrayPeak<T> {
    pub max: T,
    /// Center of the bounding box of all pixels equal to `max`
    pub center: (f64, f64),
    pub second_max: Option<Extremum<T>>,
    pub average: T,
}

/// Result of [`BitmapData::min_gray`]
#[derive(Debug, Clone, PartialEq)]
pub struct GrayLow<T> {
    pub min: Extremum<T>,
    pub second_min: Option<Extremum<T>>,
    pub average: T,
}

/// First and second candidates in ranking order.
#[derive(Debug, Clone)]
struct TopTwo<V> {
    first: Option<Extremum<V>>,
    second: Option<Extremum<V>>,
}

impl<V> Default for TopTwo<V> {
    fn default() -> Self {
        Self {
            first: None,
            second: None,
        }
    }
}

impl<V: Copy> TopTwo<V> {
    /// Offer a candidate that comes after every candidate seen so far in
    /// scan order.
    fn push(&mut self, cand: Extremum<V>, better: fn(&V, &V) -> bool) {
        match self.first {
            None => self.first = Some(cand),
            Some(first) if better(&cand.value, &first.value) => {
                self.second = Some(first);
                self.first = Some(cand);
            }
            Some(_) => match self.second {
                Some(second) if !better(&cand.value, &second.value) => {}
                _ => self.second = Some(cand),
            },
        }
    }

    /// Fold in the candidates of a later part of the scan.
    fn merge(&mut self, later: Self, better: fn(&V, &V) -> bool) {
        if let Some(first) = later.first {
            self.push(first, better);
        }
        if let Some(second) = later.second {
            self.push(second, better);
        }
    }
}

fn greater<T: Sample>(a: &T, b: &T) -> bool {
    a > b
}

fn less<T: Sample>(a: &T, b: &T) -> bool {
    a < b
}

fn brighter<T: Sample>(a: &Color<T>, b: &Color<T>) -> bool {
    a.is_brighter_than(b)
}

fn darker<T: Sample>(a: &Color<T>, b: &Color<T>) -> bool {
    a.is_darker_than(b)
}

/// Partial gray statistics of a run of rows.
#[derive(Debug, Clone)]
struct GrayPartial<T> {
    high: TopTwo<T>,
    low: TopTwo<T>,
    /// Bounding box `(x0, y0, x1, y1)` of the pixels equal to `high.first`
    peak_box: Option<(u32, u32, u32, u32)>,
    /// Sum of floating point samples
    sum: f64,
    /// Exact sum of integer samples
    int_sum: u128,
    samples: Vec<T>,
}

impl<T: Sample> GrayPartial<T> {
    fn new() -> Self {
        Self {
            high: TopTwo::default(),
            low: TopTwo::default(),
            peak_box: None,
            sum: 0.0,
            int_sum: 0,
            samples: Vec::new(),
        }
    }

    fn push(&mut self, value: T, x: u32, y: u32, keep_samples: bool) {
        match self.high.first {
            Some(first) if value == first.value => {
                if let Some(b) = self.peak_box.as_mut() {
                    b.0 = b.0.min(x);
                    b.1 = b.1.min(y);
                    b.2 = b.2.max(x);
                    b.3 = b.3.max(y);
                }
            }
            Some(first) if value < first.value => {}
            _ => self.peak_box = Some((x, y, x, y)),
        }
        let cand = Extremum { value, x, y };
        self.high.push(cand, greater);
        self.low.push(cand, less);
        match value.to_u128() {
            Some(v) => self.int_sum += v,
            None => self.sum += value.to_f64(),
        }
        if keep_samples {
            self.samples.push(value);
        }
    }

    fn merge(mut self, later: Self) -> Self {
        let own = self.high.first.map(|e| e.value);
        let other = later.high.first.map(|e| e.value);
        self.peak_box = match (own, other, self.peak_box, later.peak_box) {
            (None, _, _, b) => b,
            (Some(a), Some(b), _, pb) if b > a => pb,
            (Some(a), Some(b), Some(l), Some(r)) if a == b => {
                Some((l.0.min(r.0), l.1.min(r.1), l.2.max(r.2), l.3.max(r.3)))
            }
            (_, _, pb, _) => pb,
        };
        self.high.merge(later.high, greater);
        self.low.merge(later.low, less);
        self.sum += later.sum;
        self.int_sum += later.int_sum;
        self.samples.extend(later.samples);
        self
    }
}

impl<T: Sample> GrayPartial<T> {
    fn mean(&self, count: u64) -> f64 {
        if T::DEPTH.is_float() {
            self.sum / count as f64
        } else {
            self.int_sum as f64 / count as f64
        }
    }

    /// Integer samples average as `(sum + 1) / count`, floating point as
    /// the plain mean.
    fn average(&self, count: u64) -> T {
        if T::DEPTH.is_float() {
            T::from_f64(self.sum / count as f64)
        } else {
            T::from_u128((self.int_sum + 1) / count as u128)
        }
    }
}

impl<T: Sample> BitmapData<'_, T> {
    /// Find the brightest pixel in `region`, comparing by gray value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRegion`] if `region` is inverted or the image
    /// is empty.
    pub fn max(&self, region: Region) -> Result<Extremum<Color<T>>> {
        self.color_extremum(region, brighter)
    }

    /// Find the darkest pixel in `region`, comparing by gray value.
    pub fn min(&self, region: Region) -> Result<Extremum<Color<T>>> {
        self.color_extremum(region, darker)
    }

    fn color_extremum(
        &self,
        region: Region,
        better: fn(&Color<T>, &Color<T>) -> bool,
    ) -> Result<Extremum<Color<T>>> {
        let b = region.clamp_to(self.width, self.height)?;
        let rows: Vec<TopTwo<Color<T>>> = (b.y0..=b.y1)
            .into_par_iter()
            .map(|y| {
                let mut acc = TopTwo::default();
                for x in b.x0..=b.x1 {
                    acc.push(Extremum { value: self.get(x, y), x, y }, better);
                }
                acc
            })
            .collect();

        rows.into_iter()
            .reduce(|mut acc, later| {
                acc.merge(later, better);
                acc
            })
            .and_then(|acc| acc.first)
            .ok_or(Error::EmptyRegion {
                x0: region.x0,
                y0: region.y0,
                x1: region.x1,
                y1: region.y1,
            })
    }

    fn gray_partial(&self, region: Region, keep_samples: bool) -> Result<(Bounds, GrayPartial<T>)> {
        let b = region.clamp_to(self.width, self.height)?;
        let rows: Vec<GrayPartial<T>> = (b.y0..=b.y1)
            .into_par_iter()
            .map(|y| {
                let mut acc = GrayPartial::new();
                for x in b.x0..=b.x1 {
                    acc.push(self.get_gray(x, y), x, y, keep_samples);
                }
                acc
            })
            .collect();

        let merged = rows
            .into_iter()
            .reduce(GrayPartial::merge)
            .unwrap_or_else(GrayPartial::new);
        Ok((b, merged))
    }

    /// Gray statistics of `region`: brightest, second brightest and
    /// darkest pixel, average, and optionally the standard deviation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRegion`] if `region` is inverted or the image
    /// is empty.
    pub fn max_gray(&self, region: Region, with_std_deviation: bool) -> Result<GrayStats<T>> {
        let (b, acc) = self.gray_partial(region, with_std_deviation)?;
        let count = b.count();
        let empty = empty_region(region);
        let max = acc.high.first.ok_or_else(empty)?;
        let min = acc.low.first.ok_or_else(empty)?;

        let std_deviation = with_std_deviation.then(|| {
            let mean = acc.mean(count);
            let sq: f64 = acc
                .samples
                .iter()
                .map(|v| {
                    let d = v.to_f64() - mean;
                    d * d
                })
                .sum();
            (sq / acc.samples.len() as f64).sqrt()
        });

        Ok(GrayStats {
            max,
            second_max: acc.high.second,
            min,
            average: acc.average(count),
            std_deviation,
        })
    }

    /// Like [`max_gray`](Self::max_gray), but locates the maximum as the
    /// center of the bounding box of every pixel that reaches it.
    pub fn max_gray2(&self, region: Region) -> Result<GrayPeak<T>> {
        let (b, acc) = self.gray_partial(region, false)?;
        let max = acc.high.first.ok_or_else(empty_region(region))?;
        let (x0, y0, x1, y1) = acc.peak_box.unwrap_or((max.x, max.y, max.x, max.y));
        Ok(GrayPeak {
            max: max.value,
            center: ((x0 as f64 + x1 as f64) / 2.0, (y0 as f64 + y1 as f64) / 2.0),
            second_max: acc.high.second,
            average: acc.average(b.count()),
        })
    }

    /// Darkest and second darkest pixel of `region` and its average.
    pub fn min_gray(&self, region: Region) -> Result<GrayLow<T>> {
        let (b, acc) = self.gray_partial(region, false)?;
        Ok(GrayLow {
            min: acc.low.first.ok_or_else(empty_region(region))?,
            second_min: acc.low.second,
            average: acc.average(b.count()),
        })
    }

    /// Check that no pixel within distance `r` of (cx, cy) is brighter than
    /// the center scaled by a radial distribution.
    ///
    /// A pixel at distance `d` may reach at most
    /// `⌈center_gray · distribution[center + ⌊d⌋] / distribution[center]⌉`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `r` is negative or not finite,
    /// or the distribution is too short for `r`.
    pub fn is_below_distribution(
        &self,
        cx: u32,
        cy: u32,
        r: f64,
        distribution: &[f64],
        center: usize,
    ) -> Result<bool> {
        if !r.is_finite() || r < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "is_below_distribution: radius {r} must be finite and not negative"
            )));
        }
        let reach = center + r.floor() as usize;
        if reach >= distribution.len() {
            return Err(Error::InvalidParameter(format!(
                "is_below_distribution: distribution of length {} does not reach index {reach}",
                distribution.len()
            )));
        }

        let center_gray = self.get_gray(cx, cy).to_f64();
        let norm = distribution[center];
        let (cxf, cyf) = (cx as f64, cy as f64);
        let x0 = (cxf - r).round().max(0.0) as u32;
        let y0 = (cyf - r).round().max(0.0) as u32;
        let x1 = ((cxf + r).round() as i64).min(self.width as i64 - 1);
        let y1 = ((cyf + r).round() as i64).min(self.height as i64 - 1);
        if x1 < 0 || y1 < 0 {
            return Ok(true);
        }
        let (x1, y1) = (x1 as u32, y1 as u32);

        let below = (y0..=y1).into_par_iter().all(|y| {
            (x0..=x1).all(|x| {
                let dx = x as f64 - cxf;
                let dy = y as f64 - cyf;
                let d = (dx * dx + dy * dy).sqrt();
                if d > r {
                    return true;
                }
                let scale = distribution[center + d as usize] / norm;
                let limit = T::from_f64_trunc((center_gray * scale).ceil());
                self.get_gray(x, y) <= limit
            })
        });
        Ok(below)
    }
}

fn empty_region(region: Region) -> impl Fn() -> Error + Copy {
    move || Error::EmptyRegion {
        x0: region.x0,
        y0: region.y0,
        x1: region.x1,
        y1: region.y1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rustfmt::skip]
    fn sample_gray() -> BitmapData<'static, u8> {
        BitmapData::from_vec(vec![
            1, 2, 3, 4,
            5, 9, 7, 8,
            0, 3, 9, 2,
        ], 4, 3, 1).unwrap()
    }

    #[test]
    fn test_region_clamps_to_image() {
        let b = Region::new(-5, 1, 100, 100).clamp_to(4, 3).unwrap();
        assert_eq!((b.x0, b.y0, b.x1, b.y1), (0, 1, 3, 2));
        assert_eq!(b.count(), 8);
    }

    #[test]
    fn test_region_past_edge_snaps() {
        let b = Region::new(10, 0, 20, 2).clamp_to(4, 3).unwrap();
        assert_eq!((b.x0, b.x1), (3, 3));
        assert_eq!(b.count(), 3);
    }

    #[test]
    fn test_region_inverted_or_image_empty() {
        assert!(matches!(
            Region::new(2, 0, 1, 2).clamp_to(4, 3),
            Err(Error::EmptyRegion { .. })
        ));
        assert!(Region::full().clamp_to(0, 0).is_err());
    }

    #[test]
    fn test_top_two_ranking() {
        let mut t = TopTwo::default();
        for (i, v) in [3u8, 3, 5].into_iter().enumerate() {
            t.push(Extremum { value: v, x: i as u32, y: 0 }, greater);
        }
        assert_eq!(t.first, Some(Extremum { value: 5, x: 2, y: 0 }));
        assert_eq!(t.second, Some(Extremum { value: 3, x: 0, y: 0 }));
    }

    #[test]
    fn test_top_two_merge_matches_sequential() {
        let values = [4u16, 9, 1, 9, 7, 4, 9, 2];
        let mut seq = TopTwo::default();
        for (i, &v) in values.iter().enumerate() {
            seq.push(Extremum { value: v, x: i as u32, y: 0 }, greater);
        }
        let mut left = TopTwo::default();
        let mut right = TopTwo::default();
        for (i, &v) in values.iter().enumerate() {
            let target = if i < 3 { &mut left } else { &mut right };
            target.push(Extremum { value: v, x: i as u32, y: 0 }, greater);
        }
        left.merge(right, greater);
        assert_eq!(left.first, seq.first);
        assert_eq!(left.second, seq.second);
        assert_eq!(seq.second.map(|e| e.x), Some(3));
    }

    #[test]
    fn test_max_gray_ties() {
        let stats = sample_gray().max_gray(Region::full(), false).unwrap();
        // two nines: the first in scan order wins, the other is second
        assert_eq!(stats.max, Extremum { value: 9, x: 1, y: 1 });
        assert_eq!(stats.second_max, Some(Extremum { value: 9, x: 2, y: 2 }));
        assert_eq!(stats.min, Extremum { value: 0, x: 0, y: 2 });
        // (53 + 1) / 12 = 4.5
        assert_eq!(stats.average, 4);
        assert_eq!(stats.std_deviation, None);
    }

    #[test]
    fn test_max_gray_std_deviation() {
        let bmp = BitmapData::<u8>::from_vec(vec![2, 4, 4, 4, 5, 5, 7, 9], 4, 2, 1).unwrap();
        let stats = bmp.max_gray(Region::full(), true).unwrap();
        assert_eq!(stats.std_deviation, Some(2.0));
        assert_eq!(stats.average, 5);
    }

    #[test]
    fn test_single_pixel_region() {
        let stats = sample_gray().max_gray(Region::new(3, 1, 3, 1), false).unwrap();
        assert_eq!(stats.max, Extremum { value: 8, x: 3, y: 1 });
        assert_eq!(stats.second_max, None);
        assert_eq!(stats.min, stats.max);
        // (8 + 1) / 1
        assert_eq!(stats.average, 9);
    }

    #[test]
    fn test_u64_average_is_exact() {
        let big = (1u64 << 53) + 1;
        let bmp = BitmapData::<u64>::from_vec(vec![big, big], 2, 1, 1).unwrap();
        let stats = bmp.max_gray(Region::full(), true).unwrap();
        assert_eq!(stats.average, big);
        assert!(stats.average >= stats.min.value);
        assert_eq!(bmp.min_gray(Region::full()).unwrap().average, big);

        let top = BitmapData::<u64>::from_vec(vec![u64::MAX; 3], 3, 1, 1).unwrap();
        assert_eq!(top.max_gray2(Region::full()).unwrap().average, u64::MAX);
    }

    #[test]
    fn test_float_average_is_mean() {
        let bmp = BitmapData::<f64>::from_vec(vec![0.5, 1.0, 1.5, 2.0], 2, 2, 1).unwrap();
        let stats = bmp.max_gray(Region::full(), false).unwrap();
        assert_eq!(stats.average, 1.25);
        assert_eq!(stats.max.value, 2.0);
    }

    #[test]
    fn test_max_gray2_center_of_ties() {
        let peak = sample_gray().max_gray2(Region::full()).unwrap();
        assert_eq!(peak.max, 9);
        assert_eq!(peak.center, (1.5, 1.5));
        assert_eq!(peak.second_max.map(|e| e.value), Some(9));
    }

    #[test]
    fn test_max_gray2_ignores_earlier_peaks() {
        let bmp = BitmapData::<u8>::from_vec(vec![5, 0, 5, 9], 2, 2, 1).unwrap();
        let peak = bmp.max_gray2(Region::full()).unwrap();
        assert_eq!(peak.center, (1.0, 1.0));
        assert_eq!(peak.second_max, Some(Extremum { value: 5, x: 0, y: 0 }));
    }

    #[test]
    fn test_min_gray() {
        let low = sample_gray().min_gray(Region::new(0, 0, 3, 1)).unwrap();
        assert_eq!(low.min, Extremum { value: 1, x: 0, y: 0 });
        assert_eq!(low.second_min, Some(Extremum { value: 2, x: 1, y: 0 }));
        // (39 + 1) / 8
        assert_eq!(low.average, 5);
    }

    #[test]
    fn test_color_max_min() {
        let bmp = BitmapData::<u8>::from_vec(vec![10, 10, 10, 200, 0, 0, 0, 0, 255], 3, 1, 3).unwrap();
        // gray: 10, 60, 29
        let max = bmp.max(Region::full()).unwrap();
        assert_eq!((max.value, max.x), (Color::rgb(200, 0, 0), 1));
        let min = bmp.min(Region::full()).unwrap();
        assert_eq!((min.value, min.x), (Color::rgb(10, 10, 10), 0));
    }

    #[test]
    fn test_below_distribution() {
        #[rustfmt::skip]
        let bmp = BitmapData::<u8>::from_vec(vec![
            10, 10, 10,
            10, 100, 10,
            10, 10, 60,
        ], 3, 3, 1).unwrap();
        let falling = [1.0, 0.5, 0.1];
        assert!(bmp.is_below_distribution(1, 1, 1.0, &falling, 0).unwrap());
        // the diagonal at distance 1.41 is outside the radius
        let steep = [1.0, 0.05];
        assert!(!bmp.is_below_distribution(1, 1, 1.0, &steep, 0).unwrap());
        assert!(bmp.is_below_distribution(1, 1, 1.0, &[1.0, 0.1], 0).unwrap());
        // radius 1.5 reaches the corner at 1.41 and its limit is ceil(100 * 0.5)
        assert!(!bmp.is_below_distribution(1, 1, 1.5, &falling, 0).unwrap());
    }

    #[test]
    fn test_below_distribution_short_table() {
        let bmp = BitmapData::<u8>::new(3, 3, 1).unwrap();
        assert!(matches!(
            bmp.is_below_distribution(1, 1, 2.0, &[1.0, 0.5], 0),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_below_distribution_rejects_non_finite_radius() {
        let bmp = BitmapData::<u8>::new(3, 3, 1).unwrap();
        for r in [f64::INFINITY, f64::NAN, -0.5] {
            assert!(matches!(
                bmp.is_below_distribution(1, 1, r, &[1.0, 0.5], 0),
                Err(Error::InvalidParameter(_))
            ));
        }
    }
}

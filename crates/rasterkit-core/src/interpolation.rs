//! Sub-pixel sampling
//!
//! [`interpolate`] samples any [`Mix`] value at a real position from a
//! getter that only knows integer coordinates. It is not plain bilinear
//! interpolation: in the general case it blends two candidates, one built
//! from the four edge midpoints and one directly from the four corners,
//! with a weight derived from the distance to the nearest edge.
//!
//! # Cases
//!
//! With `ix = ⌊x⌋`, `iy = ⌊y⌋` and fractional parts `fx`, `fy`:
//!
//! - `fx == 0` (or no right neighbor) and `fy == 0` (or no bottom
//!   neighbor): the exact sample at `(ix, iy)`
//! - only one axis has a fraction and a neighbor: 1-D mix of two samples
//! - otherwise: the 2-D blend described above

use crate::color::Mix;

/// Continuous sampling domain, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleDomain {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl SampleDomain {
    /// Domain `[0, width-1] × [0, height-1]` of an image.
    pub fn for_image(width: u32, height: u32) -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            max_x: width as f64 - 1.0,
            max_y: height as f64 - 1.0,
        }
    }
}

/// Sample a value at `(x, y)`.
///
/// The position is clamped into `domain` first. `get` is only called
/// with integer coordinates inside the domain.
pub fn interpolate<M, F>(x: f64, y: f64, domain: SampleDomain, get: F) -> M
where
    M: Mix + Clone,
    F: Fn(i32, i32) -> M,
{
    let x = x.min(domain.max_x).max(domain.min_x);
    let y = y.min(domain.max_y).max(domain.min_y);
    let ix = x.floor() as i32;
    let iy = y.floor() as i32;
    let fx = x - ix as f64;
    let fy = y - iy as f64;

    let no_right = fx <= 0.0 || (ix + 1) as f64 > domain.max_x;
    let no_below = fy <= 0.0 || (iy + 1) as f64 > domain.max_y;

    match (no_right, no_below) {
        (true, true) => get(ix, iy),
        (true, false) => get(ix, iy).mix(&[(fy, get(ix, iy + 1))]),
        (false, true) => get(ix, iy).mix(&[(fx, get(ix + 1, iy))]),
        (false, false) => blend(fx, fy, ix, iy, &get),
    }
}

/// General case: both fractions are non-zero and all four neighbors exist.
fn blend<M, F>(fx: f64, fy: f64, ix: i32, iy: i32, get: &F) -> M
where
    M: Mix + Clone,
    F: Fn(i32, i32) -> M,
{
    let fx_neg = 1.0 - fx;
    let fy_neg = 1.0 - fy;

    // corners: a top left, b top right, c bottom left, d bottom right
    let da = (fx * fx + fy * fy).sqrt();
    let db = (fx_neg * fx_neg + fy * fy).sqrt();
    let dc = (fx * fx + fy_neg * fy_neg).sqrt();
    let dd = (fx_neg * fx_neg + fy_neg * fy_neg).sqrt();
    // edge midpoints
    let dab = fy;
    let dcd = fy_neg;
    let dac = fx;
    let dbd = fx_neg;

    let weight = |d: f64| (1.0 - d).max(0.0);
    let (ai, bi, ci, di) = (weight(da), weight(db), weight(dc), weight(dd));
    let (abi, cdi, aci, bdi) = (weight(dab), weight(dcd), weight(dac), weight(dbd));
    let t = ai + bi + ci + di;
    let s = abi + cdi + aci + bdi;

    let a = get(ix, iy);
    let b = get(ix + 1, iy);
    let c = get(ix, iy + 1);
    let d = get(ix + 1, iy + 1);

    let ab = a.mix(&[(fx, b.clone())]);
    let cd = c.mix(&[(fx, d.clone())]);
    let ac = a.mix(&[(fy, c.clone())]);
    let bd = b.mix(&[(fy, d.clone())]);

    let edges = if s == 0.0 {
        ab.mix(&[(0.25, cd), (0.25, ac), (0.25, bd)])
    } else {
        ab.mix(&[(cdi / s, cd), (aci / s, ac), (bdi / s, bd)])
    };

    let corners = if t == 0.0 {
        a.mix(&[(0.25, b), (0.25, c), (0.25, d)])
    } else {
        a.mix(&[(bi / t, b), (ci / t, c), (di / t, d)])
    };

    let w = 2.0 * dab.min(dcd).min(dac).min(dbd);
    edges.mix(&[(w, corners)])
}

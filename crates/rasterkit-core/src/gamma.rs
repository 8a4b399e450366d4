//! Gamma lookup cache
//!
//! The display conversion blends a linear and a logarithmic tone curve,
//! weighted by a gamma value. [`GammaCache`] holds the gamma currently in
//! effect together with a 65,536-entry lookup table for 16-bit inputs,
//! and rebuilds the table only when a different gamma is requested.
//!
//! One process-wide cache is available through [`GammaCache::global`];
//! tests create their own with [`GammaCache::new`].
//!
//! # Table
//!
//! With `δ = 9 - 6γ` and `g = min(2γ, 1)`, entry `v` is
//! `g · max(log2(v) - δ, 0) · 256 / (16 - δ) + (1 - g) · v / 256`,
//! truncated to `u8`.

use log::debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard};

/// Number of table entries, one per 16-bit input value.
pub const GAMMA_TABLE_LEN: usize = 1 << 16;

#[derive(Debug)]
struct GammaState {
    gamma: Option<f64>,
    table: Vec<u8>,
}

/// Lazily rebuilt gamma lookup table
#[derive(Debug)]
pub struct GammaCache {
    state: Mutex<GammaState>,
    regenerations: AtomicUsize,
}

static GLOBAL: LazyLock<GammaCache> = LazyLock::new(GammaCache::new);

impl GammaCache {
    /// Create a cache with no gamma in effect.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GammaState {
                gamma: None,
                table: Vec::new(),
            }),
            regenerations: AtomicUsize::new(0),
        }
    }

    /// Get the process-wide cache.
    pub fn global() -> &'static GammaCache {
        &GLOBAL
    }

    fn lock(&self) -> MutexGuard<'_, GammaState> {
        // the state is rebuilt as a whole, a panic cannot leave it half-written
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make `gamma` the gamma in effect, rebuilding the table if it changed.
    ///
    /// Returns the gamma in effect after the call.
    pub fn ensure(&self, gamma: f64) -> f64 {
        let mut state = self.lock();
        if state.gamma != Some(gamma) {
            state.table = build_table(gamma);
            state.gamma = Some(gamma);
            self.regenerations.fetch_add(1, Ordering::Relaxed);
            debug!("gamma table rebuilt for gamma {gamma}");
        }
        gamma
    }

    /// Get the gamma in effect, if any has been requested yet.
    pub fn current_gamma(&self) -> Option<f64> {
        self.lock().gamma
    }

    /// Look up the table entry for a 16-bit value.
    ///
    /// Returns `None` before the first call to [`ensure`](Self::ensure).
    pub fn lookup(&self, value: u16) -> Option<u8> {
        self.lock().table.get(value as usize).copied()
    }

    /// Get how many times the table has been built.
    pub fn regenerations(&self) -> usize {
        self.regenerations.load(Ordering::Relaxed)
    }
}

impl Default for GammaCache {
    fn default() -> Self {
        Self::new()
    }
}

fn build_table(gamma: f64) -> Vec<u8> {
    let g = (gamma * 2.0).min(1.0);
    let delta = 9.0 - gamma * 6.0;
    let factor = 256.0 / (16.0 - delta);

    (0..GAMMA_TABLE_LEN)
        .map(|v| {
            let val0 = v as f64 / 256.0;
            let r = (v as f64).log2() - delta;
            let val1 = if r <= 0.0 { 0.0 } else { r * factor };
            (g * val1 + (1.0 - g) * val0) as u8
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_until_ensured() {
        let cache = GammaCache::new();
        assert_eq!(cache.current_gamma(), None);
        assert_eq!(cache.lookup(100), None);
        assert_eq!(cache.regenerations(), 0);
    }

    #[test]
    fn test_rebuild_only_on_change() {
        let cache = GammaCache::new();
        assert_eq!(cache.ensure(0.5), 0.5);
        cache.ensure(0.5);
        assert_eq!(cache.regenerations(), 1);
        cache.ensure(0.25);
        assert_eq!(cache.regenerations(), 2);
        assert_eq!(cache.current_gamma(), Some(0.25));
    }

    #[test]
    fn test_zero_gamma_is_linear() {
        let cache = GammaCache::new();
        cache.ensure(0.0);
        assert_eq!(cache.lookup(0), Some(0));
        assert_eq!(cache.lookup(256), Some(1));
        assert_eq!(cache.lookup(65535), Some(255));
    }

    #[test]
    fn test_full_gamma_is_logarithmic() {
        // gamma 0.5: g = 1, delta = 6, factor = 25.6
        let cache = GammaCache::new();
        cache.ensure(0.5);
        assert_eq!(cache.lookup(64), Some(0));
        // log2(256) - 6 = 2, 2 * 25.6 = 51.2
        assert_eq!(cache.lookup(256), Some(51));
        // log2(65535) is just below 16: (10 - ε) * 25.6
        assert_eq!(cache.lookup(65535), Some(255));
    }
}

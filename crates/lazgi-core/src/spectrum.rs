//! Rolling frequency-magnitude snapshot of the live audio output.

use crate::constants::{SPECTRUM_DB_FLOOR, SPECTRUM_DB_SPAN};

/// Convert an analyser reading in dB to \[0, 1\].
#[inline]
pub fn db_to_unit(db: f32) -> f32 {
    unit((db - SPECTRUM_DB_FLOOR) / SPECTRUM_DB_SPAN)
}

/// Clamp to \[0, 1\]; NaN and infinities read as silence.
#[inline]
fn unit(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Fixed-size magnitude snapshot, refreshed once per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectrumSnapshot {
    bins: Vec<f32>,
}

impl SpectrumSnapshot {
    pub fn new(bins: usize) -> Self {
        Self {
            bins: vec![0.0; bins.max(1)],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    /// Bin `i`, wrapping around the snapshot size.
    #[inline]
    pub fn wrapped(&self, i: usize) -> f32 {
        self.bins[i % self.bins.len()]
    }

    /// Refresh from analyser output in dB. Readings beyond the snapshot size are
    /// ignored; missing ones read as silence.
    pub fn update_from_db(&mut self, readings: &[f32]) {
        for (i, slot) in self.bins.iter_mut().enumerate() {
            *slot = readings.get(i).copied().map(db_to_unit).unwrap_or(0.0);
        }
    }

    /// Refresh from values already in \[0, 1\].
    pub fn update_linear(&mut self, values: &[f32]) {
        for (i, slot) in self.bins.iter_mut().enumerate() {
            *slot = values.get(i).copied().map(unit).unwrap_or(0.0);
        }
    }

}

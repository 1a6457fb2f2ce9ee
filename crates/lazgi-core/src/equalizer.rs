//! Audio-driven band of medallions along the bottom of the canvas.
//!
//! Unlike the fingertip pool nothing here is random: every slot is a pure
//! function of its index and its smoothed spectrum level, so the strip
//! animates only when the sound changes.

use crate::constants::EQUALIZER_BAND_Y;
use crate::medallion::{CenterOrnament, Layer, Medallion};
use crate::palette::PALETTE_SIZE;
use crate::spectrum::SpectrumSnapshot;
use glam::Vec2;
use smallvec::SmallVec;

pub struct EqualizerStrip {
    smoothed: Vec<f32>,
    smoothing: f32,
    shapes: Vec<Medallion>,
}

impl EqualizerStrip {
    pub fn new(count: usize, smoothing: f32) -> Self {
        Self {
            smoothed: vec![0.0; count],
            smoothing: smoothing.clamp(0.0, 1.0),
            shapes: Vec::with_capacity(count),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.smoothed.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.smoothed.is_empty()
    }

    pub fn levels(&self) -> &[f32] {
        &self.smoothed
    }

    /// Shapes built by the last [`Self::update`].
    pub fn shapes(&self) -> &[Medallion] {
        &self.shapes
    }

    /// Blend each slot toward its spectrum bin and rebuild the shapes.
    pub fn update(&mut self, spectrum: &SpectrumSnapshot, canvas_width: f32, canvas_height: f32) {
        let keep = self.smoothing;
        for (i, s) in self.smoothed.iter_mut().enumerate() {
            *s = keep * *s + (1.0 - keep) * spectrum.wrapped(i);
        }
        let count = self.smoothed.len().max(1) as f32;
        let y = canvas_height * EQUALIZER_BAND_Y;
        self.shapes.clear();
        for (i, &level) in self.smoothed.iter().enumerate() {
            let x = (i as f32 + 0.5) * canvas_width / count;
            self.shapes.push(slot_shape(i, level, Vec2::new(x, y)));
        }
    }

    pub fn reset(&mut self) {
        self.smoothed.iter_mut().for_each(|s| *s = 0.0);
        self.shapes.clear();
    }
}

/// Deterministic medallion for slot `i` at smoothed level `level`.
pub fn slot_shape(i: usize, level: f32, position: Vec2) -> Medallion {
    let level = level.clamp(0.0, 1.0);
    let layer_count = (2 + (3.0 * level).floor() as usize).min(5);
    let mut width = 10.0 + 30.0 * level;
    let mut height = width * 2.5;
    let blur = (level > 0.6).then_some(level);
    let mut layers: SmallVec<[Layer; 5]> = SmallVec::new();
    for k in 0..layer_count {
        if k > 0 {
            width *= 0.6;
            height *= 0.6;
        }
        layers.push(Layer {
            width,
            height,
            color: (i + 3 * k) % PALETTE_SIZE,
            jitter: Vec2::ZERO,
            blur,
            wobble_amp: 1.0 + 2.0 * level,
            wobble_phase: k as f32 * 1.7,
        });
    }
    let ornament = (level > 0.5 && i % 7 == 0).then(|| CenterOrnament {
        size: width * 0.5,
        color: (i + 7) % PALETTE_SIZE,
        blur: level > 0.8,
    });
    Medallion {
        id: i as u64,
        position,
        velocity: Vec2::ZERO,
        layers,
        ornament,
        wobble_seed: i as f32 * 13.7,
        life: 1.0,
        decay: 0.0,
    }
}

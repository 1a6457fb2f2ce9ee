//! Medallion particles: layered Ikat shapes shed from the fingertips.
//!
//! A medallion is spawned with life 1, ages by its own decay rate every tick
//! while drifting under a small gravity bias, and is dropped on the tick its
//! life reaches zero. The pool is capped; overflow evicts the oldest spawn
//! regardless of how much life it has left.

use crate::config::MedallionConfig;
use crate::landmarks::Hand;
use crate::palette::PALETTE_SIZE;
use crate::render::CanvasProjection;
use crate::session::InteractionMode;
use glam::Vec2;
use rand::prelude::*;
use rand::seq::index;
use smallvec::SmallVec;
use std::collections::VecDeque;

/// One nested shape of a medallion, outermost first. Baked at spawn time.
///
/// Fields:
/// - `width`, `height`: full extents in pixels
/// - `color`: index into [`crate::palette::PALETTE`]
/// - `jitter`: fixed offset from the medallion center
/// - `blur`: intensity of the extra fading copies, if this layer has them
/// - `wobble_amp`, `wobble_phase`: outline perturbation strength and noise offset
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub width: f32,
    pub height: f32,
    pub color: usize,
    pub jitter: Vec2,
    pub blur: Option<f32>,
    pub wobble_amp: f32,
    pub wobble_phase: f32,
}

/// Diamond nested inside the innermost layer.
#[derive(Clone, Debug, PartialEq)]
pub struct CenterOrnament {
    pub size: f32,
    pub color: usize,
    pub blur: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Medallion {
    pub id: u64,
    pub position: Vec2,
    pub velocity: Vec2,
    pub layers: SmallVec<[Layer; 5]>,
    pub ornament: Option<CenterOrnament>,
    pub wobble_seed: f32,
    pub life: f32,
    pub decay: f32,
}

impl Medallion {
    /// Advance one tick: integrate, apply gravity, age.
    pub fn step(&mut self, gravity: f32) {
        self.position += self.velocity;
        self.velocity.y += gravity;
        self.life -= self.decay;
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.life <= 0.0
    }

    /// Colors of all layers, outermost first.
    pub fn layer_colors(&self) -> impl Iterator<Item = usize> + '_ {
        self.layers.iter().map(|l| l.color)
    }
}

/// Bounded, exclusively owned pool of live medallions.
pub struct MedallionField {
    pool: VecDeque<Medallion>,
    config: MedallionConfig,
    rng: StdRng,
    next_id: u64,
    evicted: u64,
}

impl MedallionField {
    pub fn new(config: MedallionConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Use an explicit random source, e.g. for reproducible tests.
    pub fn with_rng(config: MedallionConfig, rng: StdRng) -> Self {
        let cap = config.pool_cap;
        Self {
            pool: VecDeque::with_capacity(cap + 1),
            config,
            rng,
            next_id: 0,
            evicted: 0,
        }
    }

    pub fn config(&self) -> &MedallionConfig {
        &self.config
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Live medallions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Medallion> {
        self.pool.iter()
    }

    /// Total evictions caused by the pool cap.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn clear(&mut self) {
        if !self.pool.is_empty() {
            log::debug!("[medallions] cleared {} live shapes", self.pool.len());
        }
        self.pool.clear();
    }

    /// Age every medallion by one tick and drop the ones whose life ran out.
    pub fn update(&mut self) {
        let gravity = self.config.gravity;
        for m in self.pool.iter_mut() {
            m.step(gravity);
        }
        self.pool.retain(|m| !m.is_expired());
    }

    /// Roll a spawn for each fingertip of `hand` with the mode's probability.
    /// Returns the number spawned.
    pub fn spawn_from_hand(
        &mut self,
        hand: &Hand,
        mode: InteractionMode,
        projection: &CanvasProjection,
    ) -> usize {
        let p = self.config.spawn_probability(mode) as f64;
        let mut spawned = 0;
        for tip in hand.fingertips() {
            if self.rng.gen_bool(p.clamp(0.0, 1.0)) {
                let j = self.config.spawn_jitter_px;
                let jitter = Vec2::new(
                    self.rng.gen_range(-j..=j),
                    self.rng.gen_range(-j..=j),
                );
                self.spawn_at(projection.to_screen(tip) + jitter);
                spawned += 1;
            }
        }
        spawned
    }

    /// Build a new medallion at `position` and add it, evicting the oldest if over cap.
    pub fn spawn_at(&mut self, position: Vec2) -> u64 {
        let m = self.build(position);
        let id = m.id;
        self.pool.push_back(m);
        while self.pool.len() > self.config.pool_cap {
            self.pool.pop_front();
            self.evicted += 1;
        }
        id
    }

    fn build(&mut self, position: Vec2) -> Medallion {
        let cfg = &self.config;
        let rng = &mut self.rng;

        let (lo, hi) = cfg.layer_count;
        let count = rng.gen_range(lo..=hi).min(PALETTE_SIZE);
        let colors = index::sample(rng, PALETTE_SIZE, count);

        let mut width = rng.gen_range(cfg.base_width.0..=cfg.base_width.1);
        let mut height = width * rng.gen_range(cfg.aspect.0..=cfg.aspect.1);
        let mut layers: SmallVec<[Layer; 5]> = SmallVec::with_capacity(count);
        for (k, color) in colors.into_iter().enumerate() {
            if k > 0 {
                let s = rng.gen_range(cfg.inner_scale.0..=cfg.inner_scale.1);
                width *= s;
                height *= s;
            }
            let blur = rng
                .gen_bool(cfg.layer_blur_chance as f64)
                .then(|| rng.gen_range(0.4..=1.0));
            let jp = cfg.layer_jitter_px;
            layers.push(Layer {
                width,
                height,
                color,
                jitter: Vec2::new(rng.gen_range(-jp..=jp), rng.gen_range(-jp..=jp)),
                blur,
                wobble_amp: rng.gen_range(cfg.wobble_amp.0..=cfg.wobble_amp.1),
                wobble_phase: rng.gen_range(0.0..std::f32::consts::TAU),
            });
        }

        let ornament = if rng.gen_bool(cfg.center_ornament_chance as f64) {
            let inner = layers.last().map(|l| l.width.min(l.height)).unwrap_or(width);
            Some(CenterOrnament {
                size: inner * 0.5,
                color: rng.gen_range(0..PALETTE_SIZE),
                blur: rng.gen_bool(cfg.center_ornament_blur_chance as f64),
            })
        } else {
            None
        };

        let velocity = Vec2::new(
            rng.gen_range(-crate::constants::INITIAL_VX_SPAN..=crate::constants::INITIAL_VX_SPAN),
            rng.gen_range(crate::constants::INITIAL_VY_MIN..=crate::constants::INITIAL_VY_MAX),
        );
        let decay = rng.gen_range(cfg.decay.0..=cfg.decay.1);
        let wobble_seed = rng.gen_range(0.0..1000.0);

        let id = self.next_id;
        self.next_id += 1;
        Medallion {
            id,
            position,
            velocity,
            layers,
            ornament,
            wobble_seed,
            life: 1.0,
            decay,
        }
    }
}

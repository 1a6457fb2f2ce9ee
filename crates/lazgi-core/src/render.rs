//! Triangle geometry for the rendering surface.
//!
//! The surface itself (canvas, GPU, window) lives outside the core. What it
//! receives here is a flat list of colored vertices, three per triangle, in
//! draw order. Layers are emitted outermost to innermost. Each layer is cut
//! into vertical stripes whose height falls off toward the edges to give the
//! almond silhouette; every stripe corner is nudged by seeded noise so the
//! outline looks hand drawn yet stays identical from frame to frame.

use crate::landmarks::{Hand, Landmark};
use crate::medallion::{CenterOrnament, Layer, Medallion};
use crate::noise::noise2;
use crate::palette;
use crate::templates::Template;
use glam::Vec2;

pub const STRIPES_PER_LAYER: usize = 14;
pub const FALLOFF_EXPONENT: f32 = 2.2;
pub const LAYER_SEED_STRIDE: f32 = 17.31;
pub const BLUR_SCALE_STEP: f32 = 0.08;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StripeVertex {
    pub pos: [f32; 2],
    pub color: [f32; 4],
}

/// Raw bytes of a vertex list, ready for a vertex buffer upload.
#[inline]
pub fn vertex_bytes(vertices: &[StripeVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Maps normalized landmark coordinates to canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasProjection {
    pub width: f32,
    pub height: f32,
    pub mirror_x: bool,
}

impl CanvasProjection {
    pub fn new(width: f32, height: f32, mirror_x: bool) -> Self {
        Self {
            width,
            height,
            mirror_x,
        }
    }

    #[inline]
    pub fn to_screen(&self, p: Landmark) -> Vec2 {
        let x = if self.mirror_x { 1.0 - p.x } else { p.x };
        Vec2::new(x * self.width, p.y * self.height)
    }
}

/// Half-height multiplier at normalized horizontal offset `u` in \[-1, 1\].
#[inline]
pub fn stripe_falloff(u: f32) -> f32 {
    (1.0 - u.abs().powf(FALLOFF_EXPONENT)).max(0.0)
}

/// Append the triangles for one medallion.
pub fn tessellate_medallion(m: &Medallion, out: &mut Vec<StripeVertex>) {
    let alpha = m.life.clamp(0.0, 1.0);
    for (k, layer) in m.layers.iter().enumerate() {
        let seed = m.wobble_seed + k as f32 * LAYER_SEED_STRIDE;
        let center = m.position + layer.jitter;
        if let Some(intensity) = layer.blur {
            // Widest, faintest copy first so the crisp layer lands on top.
            for pass in (1..=crate::constants::BLUR_PASSES).rev() {
                let scale = 1.0 + BLUR_SCALE_STEP * pass as f32;
                let fade = alpha * intensity * (1.0 - pass as f32 / 5.0);
                emit_layer(layer, center, scale, seed, fade, out);
            }
        }
        emit_layer(layer, center, 1.0, seed, alpha, out);
    }
    if let (Some(orn), Some(inner)) = (&m.ornament, m.layers.last()) {
        emit_ornament(orn, m.position + inner.jitter, alpha, out);
    }
}

fn emit_layer(
    layer: &Layer,
    center: Vec2,
    scale: f32,
    seed: f32,
    alpha: f32,
    out: &mut Vec<StripeVertex>,
) {
    let rgb = palette::color(layer.color);
    let color = [rgb[0], rgb[1], rgb[2], alpha];
    let half_w = layer.width * scale * 0.5;
    let half_h = layer.height * scale * 0.5;
    let n = STRIPES_PER_LAYER as f32;
    for s in 0..STRIPES_PER_LAYER {
        let u0 = -1.0 + 2.0 * s as f32 / n;
        let u1 = -1.0 + 2.0 * (s + 1) as f32 / n;
        let h0 = half_h * stripe_falloff(u0);
        let h1 = half_h * stripe_falloff(u1);
        let x0 = center.x + u0 * half_w;
        let x1 = center.x + u1 * half_w;
        let mut corners = [
            Vec2::new(x0, center.y - h0),
            Vec2::new(x1, center.y - h1),
            Vec2::new(x1, center.y + h1),
            Vec2::new(x0, center.y + h0),
        ];
        for (c, corner) in corners.iter_mut().enumerate() {
            let key = layer.wobble_phase + (s * 4 + c) as f32 * 0.37;
            let (dx, dy) = noise2(seed, key);
            *corner += Vec2::new(dx, dy) * layer.wobble_amp;
        }
        push_quad(corners, color, out);
    }
}

fn emit_ornament(orn: &CenterOrnament, center: Vec2, alpha: f32, out: &mut Vec<StripeVertex>) {
    let rgb = palette::color(orn.color);
    if orn.blur {
        for pass in (1..=crate::constants::BLUR_PASSES).rev() {
            let size = orn.size * (1.0 + BLUR_SCALE_STEP * pass as f32);
            let fade = alpha * (1.0 - pass as f32 / 5.0);
            push_diamond(center, size, [rgb[0], rgb[1], rgb[2], fade], out);
        }
    }
    push_diamond(center, orn.size, [rgb[0], rgb[1], rgb[2], alpha], out);
}

fn push_diamond(center: Vec2, size: f32, color: [f32; 4], out: &mut Vec<StripeVertex>) {
    let h = size * 0.5;
    push_quad(
        [
            center + Vec2::new(0.0, -h),
            center + Vec2::new(h, 0.0),
            center + Vec2::new(0.0, h),
            center + Vec2::new(-h, 0.0),
        ],
        color,
        out,
    );
}

#[inline]
fn push_quad(c: [Vec2; 4], color: [f32; 4], out: &mut Vec<StripeVertex>) {
    for i in [0, 1, 2, 0, 2, 3] {
        out.push(StripeVertex {
            pos: c[i].to_array(),
            color,
        });
    }
}

/// Everything the surface needs for one tick.
pub struct SceneFrame<'a> {
    pub medallions: Vec<&'a Medallion>,
    pub equalizer: &'a [Medallion],
    pub hands: &'a [Hand],
    /// Shown only in learn mode.
    pub template: Option<&'a Template>,
    pub score: f32,
}

impl<'a> SceneFrame<'a> {
    /// Equalizer strip first (background band), then the pool oldest to newest.
    pub fn vertices(&self, out: &mut Vec<StripeVertex>) {
        for m in self.equalizer {
            tessellate_medallion(m, out);
        }
        for m in &self.medallions {
            tessellate_medallion(m, out);
        }
    }

    /// Hand landmarks projected to the canvas, for skeleton overlays.
    pub fn hand_points(&self, projection: &CanvasProjection) -> Vec<Vec2> {
        self.hands
            .iter()
            .flat_map(|h| h.landmarks.iter().map(move |p| projection.to_screen(*p)))
            .collect()
    }
}

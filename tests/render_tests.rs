// Host-side tests for medallion tessellation and canvas projection.

use glam::{Vec2, Vec3};
use lazgi_core::config::MedallionConfig;
use lazgi_core::constants::BLUR_PASSES;
use lazgi_core::render::*;
use lazgi_core::{Medallion, MedallionField};

fn medallions(seed: u64, n: usize) -> Vec<Medallion> {
    let mut field = MedallionField::new(MedallionConfig::default(), seed);
    for i in 0..n {
        field.spawn_at(Vec2::new(100.0 + i as f32 * 20.0, 300.0));
    }
    field.iter().cloned().collect()
}

fn expected_vertex_count(m: &Medallion) -> usize {
    let quad = 6;
    let per_layer = STRIPES_PER_LAYER * quad;
    let layers: usize = m
        .layers
        .iter()
        .map(|l| if l.blur.is_some() { per_layer * (BLUR_PASSES + 1) } else { per_layer })
        .sum();
    let ornament = match &m.ornament {
        Some(o) if o.blur => quad * (BLUR_PASSES + 1),
        Some(_) => quad,
        None => 0,
    };
    layers + ornament
}

#[test]
fn vertex_count_matches_layers_and_blur() {
    for m in medallions(21, 60) {
        let mut out = Vec::new();
        tessellate_medallion(&m, &mut out);
        assert_eq!(out.len(), expected_vertex_count(&m));
        assert_eq!(out.len() % 3, 0);
    }
}

#[test]
fn tessellation_is_stable_across_frames() {
    let m = &medallions(22, 1)[0];
    let mut a = Vec::new();
    let mut b = Vec::new();
    tessellate_medallion(m, &mut a);
    tessellate_medallion(m, &mut b);
    assert_eq!(a, b);
}

#[test]
fn outline_stays_near_the_layer_bounds() {
    for m in medallions(23, 20) {
        let mut out = Vec::new();
        tessellate_medallion(&m, &mut out);
        let outer = &m.layers[0];
        let max_scale = 1.0 + BLUR_SCALE_STEP * BLUR_PASSES as f32;
        let reach = Vec2::new(outer.width, outer.height) * 0.5 * max_scale
            + Vec2::splat(outer.wobble_amp.max(6.0) + 3.0 + 1e-3);
        for v in &out {
            let d = (Vec2::from(v.pos) - m.position).abs();
            assert!(d.x <= reach.x && d.y <= reach.y, "vertex {:?} escapes {:?}", d, reach);
        }
    }
}

#[test]
fn alpha_follows_life() {
    let mut m = medallions(24, 1).remove(0);
    m.life = 0.4;
    let mut out = Vec::new();
    tessellate_medallion(&m, &mut out);
    assert!(out.iter().all(|v| v.color[3] <= 0.4 + 1e-6));
    // The crisp copy of the innermost layer is drawn last among the layers, at full life alpha.
    let crisp_tail = STRIPES_PER_LAYER * 6;
    let ornament = match &m.ornament {
        Some(o) if o.blur => 6 * (BLUR_PASSES + 1),
        Some(_) => 6,
        None => 0,
    };
    let layer_end = out.len() - ornament;
    for v in &out[layer_end - crisp_tail..layer_end] {
        assert!((v.color[3] - 0.4).abs() < 1e-6);
    }
}

#[test]
fn falloff_shapes_the_almond() {
    assert_eq!(stripe_falloff(0.0), 1.0);
    assert_eq!(stripe_falloff(1.0), 0.0);
    assert_eq!(stripe_falloff(-1.0), 0.0);
    assert!(stripe_falloff(0.5) > stripe_falloff(0.8));
    assert_eq!(stripe_falloff(0.3), stripe_falloff(-0.3));
    assert_eq!(stripe_falloff(1.5), 0.0);
}

#[test]
fn projection_scales_and_mirrors() {
    let plain = CanvasProjection::new(1280.0, 720.0, false);
    let mirrored = CanvasProjection::new(1280.0, 720.0, true);
    let p = Vec3::new(0.25, 0.5, 0.1);
    assert_eq!(plain.to_screen(p), Vec2::new(320.0, 360.0));
    assert_eq!(mirrored.to_screen(p), Vec2::new(960.0, 360.0));
}

#[test]
fn vertex_bytes_cover_every_vertex() {
    let m = &medallions(25, 1)[0];
    let mut out = Vec::new();
    tessellate_medallion(m, &mut out);
    assert_eq!(std::mem::size_of::<StripeVertex>(), 24);
    assert_eq!(vertex_bytes(&out).len(), out.len() * 24);
}

#[test]
fn scene_draws_equalizer_before_pool() {
    let pool = medallions(26, 2);
    let strip = medallions(27, 1);
    let scene = SceneFrame {
        medallions: pool.iter().collect(),
        equalizer: &strip,
        hands: &[],
        template: None,
        score: 0.0,
    };
    let mut out = Vec::new();
    scene.vertices(&mut out);

    let mut first = Vec::new();
    tessellate_medallion(&strip[0], &mut first);
    assert_eq!(&out[..first.len()], &first[..]);

    let total: usize = strip.iter().chain(pool.iter()).map(expected_vertex_count).sum();
    assert_eq!(out.len(), total);
    assert!(scene.hand_points(&CanvasProjection::new(1.0, 1.0, false)).is_empty());
}

// Host-side tests for the medallion pool: spawning, aging, eviction.

use glam::{Vec2, Vec3};
use lazgi_core::config::MedallionConfig;
use lazgi_core::palette::PALETTE_SIZE;
use lazgi_core::render::CanvasProjection;
use lazgi_core::{templates, Hand, Handedness, InteractionMode, MedallionField};
use std::collections::HashSet;

fn projection() -> CanvasProjection {
    CanvasProjection::new(1280.0, 720.0, false)
}

fn hand() -> Hand {
    Hand::new(templates::library()[0].landmarks, Handedness::Right, 1.0)
}

fn always_spawn() -> MedallionConfig {
    MedallionConfig {
        spawn_probability_perform: 1.0,
        spawn_probability_learn: 1.0,
        ..MedallionConfig::default()
    }
}

#[test]
fn pool_never_exceeds_cap() {
    let config = always_spawn();
    let cap = config.pool_cap;
    let mut field = MedallionField::new(config, 1);
    for _ in 0..100 {
        field.update();
        field.spawn_from_hand(&hand(), InteractionMode::Perform, &projection());
        field.spawn_from_hand(&hand(), InteractionMode::Perform, &projection());
        assert!(field.len() <= cap);
    }
    assert_eq!(field.len(), cap);
    assert!(field.evicted() > 0);
}

#[test]
fn overflow_evicts_oldest_first() {
    let config = MedallionConfig {
        pool_cap: 3,
        ..MedallionConfig::default()
    };
    let mut field = MedallionField::new(config, 2);
    let ids: Vec<u64> = (0..5).map(|i| field.spawn_at(Vec2::splat(i as f32))).collect();
    let live: Vec<u64> = field.iter().map(|m| m.id).collect();
    assert_eq!(live, ids[2..].to_vec());
    assert_eq!(field.evicted(), 2);
}

#[test]
fn layers_follow_shape_rules() {
    let config = MedallionConfig::default();
    let mut field = MedallionField::new(config.clone(), 3);
    for i in 0..200 {
        field.spawn_at(Vec2::new(i as f32, 0.0));
    }
    for m in field.iter() {
        let n = m.layers.len();
        assert!(n >= config.layer_count.0 && n <= config.layer_count.1);

        let colors: HashSet<usize> = m.layer_colors().collect();
        assert_eq!(colors.len(), n, "layer colors must be distinct");
        assert!(colors.iter().all(|&c| c < PALETTE_SIZE));

        let outer = &m.layers[0];
        assert!(outer.width >= config.base_width.0 && outer.width <= config.base_width.1);
        let aspect = outer.height / outer.width;
        assert!(aspect >= config.aspect.0 - 1e-4 && aspect <= config.aspect.1 + 1e-4);

        for pair in m.layers.windows(2) {
            let s = pair[1].width / pair[0].width;
            assert!(s >= config.inner_scale.0 - 1e-4 && s <= config.inner_scale.1 + 1e-4);
        }
        for layer in &m.layers {
            assert!(layer.jitter.abs().max_element() <= config.layer_jitter_px);
            let (lo, hi) = config.wobble_amp;
            assert!(layer.wobble_amp >= lo && layer.wobble_amp <= hi);
            if let Some(b) = layer.blur {
                assert!((0.0..=1.0).contains(&b));
            }
        }
        if let (Some(orn), Some(inner)) = (&m.ornament, m.layers.last()) {
            assert!(orn.size <= inner.width.min(inner.height));
        }
        assert_eq!(m.life, 1.0);
        assert!(m.decay >= config.decay.0 && m.decay <= config.decay.1);
    }
}

#[test]
fn some_layers_are_blurred_and_some_are_not() {
    let mut field = MedallionField::new(MedallionConfig::default(), 4);
    for _ in 0..50 {
        field.spawn_at(Vec2::ZERO);
    }
    let blurred = field
        .iter()
        .flat_map(|m| m.layers.iter())
        .filter(|l| l.blur.is_some())
        .count();
    let total: usize = field.iter().map(|m| m.layers.len()).sum();
    assert!(blurred > 0 && blurred < total);
}

#[test]
fn medallions_expire_after_their_life_runs_out() {
    let config = MedallionConfig {
        decay: (0.5, 0.5),
        ..MedallionConfig::default()
    };
    let mut field = MedallionField::new(config, 5);
    field.spawn_at(Vec2::ZERO);
    field.spawn_at(Vec2::ONE);
    field.update();
    assert_eq!(field.len(), 2);
    assert!(field.iter().all(|m| (m.life - 0.5).abs() < 1e-6));
    field.update();
    assert!(field.is_empty());
}

#[test]
fn life_only_decreases() {
    let mut field = MedallionField::new(MedallionConfig::default(), 6);
    field.spawn_at(Vec2::new(100.0, 100.0));
    let mut last = 1.0;
    let mut ticks = 0;
    loop {
        let life = match field.iter().next() {
            Some(m) => m.life,
            None => break,
        };
        assert!(life < last || ticks == 0);
        last = life;
        field.update();
        ticks += 1;
    }
    // Decay of at least 0.008 per tick empties the pool within 125 ticks.
    assert!(ticks <= 126);
}

#[test]
fn motion_applies_gravity() {
    let mut field = MedallionField::new(MedallionConfig::default(), 7);
    field.spawn_at(Vec2::new(640.0, 360.0));
    let before = field.iter().next().unwrap().clone();
    field.update();
    let after = field.iter().next().unwrap();
    assert!((after.position - (before.position + before.velocity)).length() < 1e-4);
    assert!((after.velocity.y - (before.velocity.y + 0.05)).abs() < 1e-6);
    assert_eq!(after.velocity.x, before.velocity.x);
    // Spawned drifting upward.
    assert!(before.velocity.y < 0.0);
}

#[test]
fn same_seed_same_medallions() {
    let spawn = |seed| {
        let mut field = MedallionField::new(always_spawn(), seed);
        field.spawn_from_hand(&hand(), InteractionMode::Perform, &projection());
        field.iter().cloned().collect::<Vec<_>>()
    };
    assert_eq!(spawn(9), spawn(9));
    assert_ne!(spawn(9), spawn(10));
}

#[test]
fn spawn_probability_bounds() {
    let mut field = MedallionField::new(always_spawn(), 8);
    assert_eq!(field.spawn_from_hand(&hand(), InteractionMode::Learn, &projection()), 5);

    let never = MedallionConfig {
        spawn_probability_perform: 0.0,
        spawn_probability_learn: 0.0,
        ..MedallionConfig::default()
    };
    let mut field = MedallionField::new(never, 8);
    for _ in 0..20 {
        assert_eq!(field.spawn_from_hand(&hand(), InteractionMode::Perform, &projection()), 0);
    }
    assert!(field.is_empty());
}

#[test]
fn spawns_land_near_fingertips() {
    let mut field = MedallionField::new(always_spawn(), 11);
    let h = hand().translated(Vec3::new(0.1, 0.0, 0.0));
    field.spawn_from_hand(&h, InteractionMode::Perform, &projection());
    let p = projection();
    for (m, tip) in field.iter().zip(h.fingertips()) {
        let d = m.position - p.to_screen(tip);
        assert!(d.abs().max_element() <= 12.0 + 1e-4);
    }
}

#[test]
fn clear_empties_the_pool() {
    let mut field = MedallionField::new(always_spawn(), 12);
    field.spawn_from_hand(&hand(), InteractionMode::Perform, &projection());
    assert!(!field.is_empty());
    field.clear();
    assert!(field.is_empty());
    field.update();
    assert!(field.is_empty());
}

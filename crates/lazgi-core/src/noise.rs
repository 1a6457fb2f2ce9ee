//! Smooth 1D value noise used for the hand-drawn wobble.
//!
//! Pure in (seed, x): the same medallion redraws with the same outline on
//! every frame. Output is in \[-1, 1\].

#[inline]
fn hash(mut x: u32) -> u32 {
    // xorshift32 rounds over a multiplicative mix
    x = x.wrapping_mul(0x9E37_79B9) ^ 0x85EB_CA6B;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    x.wrapping_mul(0x27D4_EB2D)
}

#[inline]
fn lattice(seed: u32, i: i32) -> f32 {
    let h = hash(seed ^ hash(i as u32));
    (h as f32 / u32::MAX as f32) * 2.0 - 1.0
}

/// Value noise at `x` for the stream selected by `seed`.
pub fn noise1(seed: f32, x: f32) -> f32 {
    let seed_bits = seed.to_bits();
    let x0 = x.floor();
    let t = x - x0;
    let s = t * t * (3.0 - 2.0 * t);
    let i = x0 as i32;
    let a = lattice(seed_bits, i);
    let b = lattice(seed_bits, i.wrapping_add(1));
    a + (b - a) * s
}

/// Two decorrelated noise samples for a 2D offset.
#[inline]
pub fn noise2(seed: f32, x: f32) -> (f32, f32) {
    (noise1(seed, x), noise1(seed + 101.3, x + 47.7))
}

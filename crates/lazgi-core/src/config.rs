//! Explicit configuration for the frame pipeline.
//!
//! Every recognized tunable lives here with its default taken from
//! `constants.rs`. Ranges are stored as `(min, max)` pairs.

use crate::constants::*;
use crate::error::ConfigError;
use crate::session::InteractionMode;

#[derive(Clone, Debug, PartialEq)]
pub struct MedallionConfig {
    pub spawn_probability_perform: f32,
    pub spawn_probability_learn: f32,
    pub spawn_jitter_px: f32,
    pub pool_cap: usize,
    pub layer_count: (usize, usize),
    pub base_width: (f32, f32),
    pub aspect: (f32, f32),
    pub inner_scale: (f32, f32),
    pub layer_blur_chance: f32,
    pub layer_jitter_px: f32,
    pub wobble_amp: (f32, f32),
    pub center_ornament_chance: f32,
    pub center_ornament_blur_chance: f32,
    pub decay: (f32, f32),
    pub gravity: f32,
}

impl Default for MedallionConfig {
    fn default() -> Self {
        Self {
            spawn_probability_perform: SPAWN_PROBABILITY_PERFORM,
            spawn_probability_learn: SPAWN_PROBABILITY_LEARN,
            spawn_jitter_px: SPAWN_JITTER_PX,
            pool_cap: MEDALLION_POOL_CAP,
            layer_count: (LAYER_COUNT_MIN, LAYER_COUNT_MAX),
            base_width: (BASE_WIDTH_MIN, BASE_WIDTH_MAX),
            aspect: (ASPECT_MIN, ASPECT_MAX),
            inner_scale: (INNER_SCALE_MIN, INNER_SCALE_MAX),
            layer_blur_chance: LAYER_BLUR_CHANCE,
            layer_jitter_px: LAYER_JITTER_PX,
            wobble_amp: (WOBBLE_AMP_MIN, WOBBLE_AMP_MAX),
            center_ornament_chance: CENTER_ORNAMENT_CHANCE,
            center_ornament_blur_chance: CENTER_ORNAMENT_BLUR_CHANCE,
            decay: (DECAY_MIN, DECAY_MAX),
            gravity: GRAVITY_PER_TICK,
        }
    }
}

impl MedallionConfig {
    #[inline]
    pub fn spawn_probability(&self, mode: InteractionMode) -> f32 {
        match mode {
            InteractionMode::Perform => self.spawn_probability_perform,
            InteractionMode::Learn => self.spawn_probability_learn,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AudioConfig {
    pub note_velocity_threshold: f32,
    pub filter_hz: (f32, f32),
    pub filter_open_hz: f32,
    pub filter_q: (f32, f32),
    pub reverb: (f32, f32),
    pub reverb_ceiling: f32,
    pub arm_spread_reverb_boost: f32,
    pub delay_wet_max: f32,
    pub drone_db: (f32, f32),
    pub tempo_from_velocity: (f32, f32),
    pub tempo_from_height: (f32, f32),
    pub default_tempo: f32,
    pub ramp_seconds: f32,
    pub note_duration_sec: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            note_velocity_threshold: NOTE_VELOCITY_THRESHOLD,
            filter_hz: (FILTER_MIN_HZ, FILTER_MAX_HZ),
            filter_open_hz: FILTER_OPEN_HZ,
            filter_q: (FILTER_Q_MIN, FILTER_Q_MAX),
            reverb: (REVERB_MIN, REVERB_MAX),
            reverb_ceiling: REVERB_CEILING,
            arm_spread_reverb_boost: ARM_SPREAD_REVERB_BOOST,
            delay_wet_max: DELAY_WET_MAX,
            drone_db: (DRONE_MIN_DB, DRONE_MAX_DB),
            tempo_from_velocity: (TEMPO_VELOCITY_MIN, TEMPO_VELOCITY_MAX),
            tempo_from_height: (TEMPO_HEIGHT_MIN, TEMPO_HEIGHT_MAX),
            default_tempo: DEFAULT_TEMPO_BPM,
            ramp_seconds: RAMP_SECONDS,
            note_duration_sec: NOTE_DURATION_SEC,
        }
    }
}

/// Top-level configuration handed to [`crate::Pipeline::new`].
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Flip x when projecting landmarks to the canvas (selfie view).
    pub mirror_x: bool,
    pub velocity_sensitivity: f32,
    pub match_normalization: f32,
    pub reward_threshold: f32,
    pub equalizer_count: usize,
    pub equalizer_smoothing: f32,
    pub spectrum_bins: usize,
    pub medallions: MedallionConfig,
    pub audio: AudioConfig,
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            mirror_x: true,
            velocity_sensitivity: VELOCITY_SENSITIVITY,
            match_normalization: MATCH_NORMALIZATION,
            reward_threshold: REWARD_THRESHOLD,
            equalizer_count: EQUALIZER_COUNT,
            equalizer_smoothing: EQUALIZER_SMOOTHING,
            spectrum_bins: SPECTRUM_BINS,
            medallions: MedallionConfig::default(),
            audio: AudioConfig::default(),
            seed: 42,
        }
    }
}

impl EngineConfig {
    /// Check every range and probability. Returns the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.medallions;
        let a = &self.audio;
        positive("canvas_width", self.canvas_width)?;
        positive("canvas_height", self.canvas_height)?;
        positive("velocity_sensitivity", self.velocity_sensitivity)?;
        positive("match_normalization", self.match_normalization)?;
        positive("spectrum_bins", self.spectrum_bins as f32)?;
        positive("pool_cap", m.pool_cap as f32)?;
        probability("reward_threshold", self.reward_threshold)?;
        probability("equalizer_smoothing", self.equalizer_smoothing)?;
        probability("spawn_probability_perform", m.spawn_probability_perform)?;
        probability("spawn_probability_learn", m.spawn_probability_learn)?;
        probability("layer_blur_chance", m.layer_blur_chance)?;
        probability("center_ornament_chance", m.center_ornament_chance)?;
        probability("center_ornament_blur_chance", m.center_ornament_blur_chance)?;
        range(
            "layer_count",
            (m.layer_count.0 as f32, m.layer_count.1 as f32),
        )?;
        positive("layer_count", m.layer_count.0 as f32)?;
        non_negative("spawn_jitter_px", m.spawn_jitter_px)?;
        non_negative("layer_jitter_px", m.layer_jitter_px)?;
        range("base_width", m.base_width)?;
        positive("base_width", m.base_width.0)?;
        range("aspect", m.aspect)?;
        range("inner_scale", m.inner_scale)?;
        range("wobble_amp", m.wobble_amp)?;
        non_negative("wobble_amp", m.wobble_amp.0)?;
        finite("gravity", m.gravity)?;
        range("decay", m.decay)?;
        positive("decay", m.decay.0)?;
        range("filter_hz", a.filter_hz)?;
        range("filter_q", a.filter_q)?;
        range("reverb", a.reverb)?;
        range("drone_db", a.drone_db)?;
        range("tempo_from_velocity", a.tempo_from_velocity)?;
        range("tempo_from_height", a.tempo_from_height)?;
        positive("default_tempo", a.default_tempo)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field })
    }
}

fn probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::NotAProbability { field, value })
    }
}

fn range(field: &'static str, (min, max): (f32, f32)) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange { field, min, max })
    }
}

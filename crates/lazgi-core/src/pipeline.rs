//! Per-frame wiring: landmarks → features → {matcher, medallions, audio}.
//!
//! Single-threaded and synchronous. Every stage is bounded by the fixed
//! landmark counts and the pool cap, so a frame never blocks the loop.

use crate::audio::{AudioCommand, AudioMapper, FrameFeatures};
use crate::config::EngineConfig;
use crate::equalizer::EqualizerStrip;
use crate::error::ConfigError;
use crate::features::{HandFeatures, VelocityTracker};
use crate::landmarks::{Arms, FrameInput, Hand, PoseSample};
use crate::medallion::MedallionField;
use crate::render::{CanvasProjection, SceneFrame};
use crate::session::{InteractionMode, Session};
use crate::spectrum::SpectrumSnapshot;
use crate::templates::{self, BestMatch, TemplateMatcher};
use smallvec::SmallVec;
use std::time::Duration;

/// What one processed frame produced, for the orchestrator and for tests.
#[derive(Clone, Debug, Default)]
pub struct FrameReport {
    pub features: SmallVec<[HandFeatures; 2]>,
    pub arms: Option<Arms>,
    /// Similarity to the session's template in learn mode, 0 otherwise.
    pub score: f32,
    pub best_match: Option<BestMatch>,
    pub spawned: usize,
    pub pool_size: usize,
    pub notes: usize,
    pub reward: bool,
}

pub struct Pipeline {
    config: EngineConfig,
    projection: CanvasProjection,
    tracker: VelocityTracker,
    matcher: TemplateMatcher,
    field: MedallionField,
    spectrum: SpectrumSnapshot,
    equalizer: EqualizerStrip,
    audio: AudioMapper,
    hands: SmallVec<[Hand; 2]>,
    /// Last pose result, held across frames the pose model skips.
    arms: Option<Arms>,
    score: f32,
    reward_armed: bool,
    frames: u64,
}

impl Pipeline {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        // Derive the medallion stream from the base seed so audio-side changes don't shift it
        let field_seed = config.seed ^ 0x9E37_79B9_7F4A_7C15;
        Ok(Self {
            projection: CanvasProjection::new(
                config.canvas_width,
                config.canvas_height,
                config.mirror_x,
            ),
            tracker: VelocityTracker::new(config.velocity_sensitivity),
            matcher: TemplateMatcher::new(config.match_normalization),
            field: MedallionField::new(config.medallions.clone(), field_seed),
            spectrum: SpectrumSnapshot::new(config.spectrum_bins),
            equalizer: EqualizerStrip::new(config.equalizer_count, config.equalizer_smoothing),
            audio: AudioMapper::new(config.audio.clone()),
            hands: SmallVec::new(),
            arms: None,
            score: 0.0,
            reward_armed: true,
            frames: 0,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn medallions(&self) -> &MedallionField {
        &self.field
    }

    pub fn equalizer(&self) -> &EqualizerStrip {
        &self.equalizer
    }

    pub fn audio(&self) -> &AudioMapper {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioMapper {
        &mut self.audio
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Refresh the spectrum snapshot from analyser output in dB.
    pub fn update_spectrum_db(&mut self, readings: &[f32]) {
        self.spectrum.update_from_db(readings);
    }

    /// Refresh the spectrum snapshot from magnitudes already in \[0, 1\].
    pub fn update_spectrum_linear(&mut self, values: &[f32]) {
        self.spectrum.update_linear(values);
    }

    pub fn spectrum(&self) -> &SpectrumSnapshot {
        &self.spectrum
    }

    /// Change mode and drop every in-flight medallion.
    pub fn switch_mode(&mut self, session: &mut Session, mode: InteractionMode) {
        if session.mode != mode {
            log::debug!("[pipeline] mode {:?} -> {:?}", session.mode, mode);
        }
        session.mode = mode;
        self.field.clear();
        self.reward_armed = true;
        self.score = 0.0;
    }

    /// Run every stage for one detector result.
    ///
    /// `dt` is the time since the previous frame; it drives the rhythmic loop.
    pub fn process_frame(
        &mut self,
        input: &FrameInput,
        session: &Session,
        dt: Duration,
        out_events: &mut Vec<AudioCommand>,
    ) -> FrameReport {
        self.frames += 1;

        let features = HandFeatures::extract_frame(&input.hands, &mut self.tracker);
        match &input.pose {
            PoseSample::Detected(pose) => self.arms = Some(pose.arms()),
            PoseSample::Missing => self.arms = None,
            PoseSample::Skipped => {}
        }
        let arms = self.arms;

        let best_match = self
            .matcher
            .find_best_match(input.hands.first(), templates::library());
        self.score = match session.mode {
            InteractionMode::Learn => {
                let template = session.current_template();
                input
                    .hands
                    .iter()
                    .map(|h| self.matcher.score(Some(h), template))
                    .fold(0.0, f32::max)
            }
            InteractionMode::Perform => 0.0,
        };

        self.field.update();
        let spawned: usize = input
            .hands
            .iter()
            .map(|h| self.field.spawn_from_hand(h, session.mode, &self.projection))
            .sum();

        self.equalizer.update(
            &self.spectrum,
            self.config.canvas_width,
            self.config.canvas_height,
        );

        let mut notes = 0;
        let mut reward = false;
        if session.sound_enabled {
            let frame = FrameFeatures {
                hands: &features,
                arms: arms.as_ref(),
            };
            notes = self.audio.map_frame(&frame, out_events);
            if session.mode == InteractionMode::Learn {
                reward = self.check_reward(out_events);
            }
            self.audio.tick(dt, out_events);
        }

        self.hands = input.hands.clone();
        FrameReport {
            features,
            arms,
            score: self.score,
            best_match,
            spawned,
            pool_size: self.field.len(),
            notes,
            reward,
        }
    }

    /// Fire the reward chord when the score crosses the threshold from below.
    fn check_reward(&mut self, out_events: &mut Vec<AudioCommand>) -> bool {
        let threshold = self.config.reward_threshold;
        if self.score >= threshold {
            if self.reward_armed && self.audio.is_active() {
                self.reward_armed = false;
                self.audio.trigger_reward(out_events);
                log::debug!("[pipeline] template matched at {:.2}", self.score);
                return true;
            }
        } else {
            self.reward_armed = true;
        }
        false
    }

    /// Draw inputs for the current state.
    pub fn scene<'a>(&'a self, session: &Session) -> SceneFrame<'a> {
        SceneFrame {
            medallions: self.field.iter().collect(),
            equalizer: self.equalizer.shapes(),
            hands: &self.hands,
            template: match session.mode {
                InteractionMode::Learn => session.current_template(),
                InteractionMode::Perform => None,
            },
            score: self.score,
        }
    }
}

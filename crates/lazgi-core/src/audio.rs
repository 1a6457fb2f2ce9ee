//! Modulation matrix from hand and arm features to the sound engine.
//!
//! The mapper never makes sound. It keeps the current target of every
//! continuous parameter and emits [`AudioCommand`]s for an external
//! synthesizer/sampler/mixer: ramps for continuous controls, one-shot
//! triggers for notes, drum hits and the reward chord, and transport calls.
//!
//! Each frame the targets are assembled first and flushed once, so a
//! parameter gets at most one ramp per frame even when several gestures
//! touch it.

use crate::config::AudioConfig;
use crate::features::HandFeatures;
use crate::landmarks::{Arms, Handedness};
use crate::music::{midi_to_hz, scale_step, DoiraLoop, PENTATONIC_MIDI};
use std::time::Duration;

/// Finger spread (normalized units) treated as a fully open hand.
pub const SPREAD_FULL_SCALE: f32 = 0.35;

const DEFAULT_FILTER_HZ: f32 = 1200.0;
const DEFAULT_FILTER_Q: f32 = 1.0;
const DEFAULT_REVERB: f32 = 0.25;
const DEFAULT_DELAY: f32 = 0.1;
const RAMP_EPSILON: f32 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stem {
    Rhythm,
    Melody,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrumVoice {
    Dum,
    Tak,
    Ka,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioParam {
    FilterCutoff,
    FilterQ,
    ReverbWet,
    DelayWet,
    DroneVolumeDb,
    Tempo,
    StemVolume(Stem),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OneShot {
    /// Chord stab for a matched template; notes in [`crate::music::REWARD_CHORD_MIDI`].
    RewardChord,
}

/// Instruction for the audio-rendering collaborator.
#[derive(Clone, Debug, PartialEq)]
pub enum AudioCommand {
    Ramp {
        param: AudioParam,
        target: f32,
        seconds: f32,
    },
    Note {
        hand: Handedness,
        finger: usize,
        midi: i32,
        frequency_hz: f32,
        duration_sec: f32,
    },
    Hit {
        drum: DrumVoice,
        velocity: f32,
    },
    OneShot(OneShot),
    SetTempo(f32),
    TransportStart,
    TransportStop,
}

/// Current targets of the sound engine for one running session.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioState {
    pub filter_cutoff: f32,
    pub filter_q: f32,
    pub reverb_wet: f32,
    pub delay_wet: f32,
    pub drone_db: f32,
    pub tempo: f32,
    /// Rhythm, melody.
    pub stems: [f32; 2],
    /// Last triggered scale step per hand (left, right) and finger.
    pub last_notes: [[Option<usize>; 5]; 2],
    pub rhythm_on: bool,
    pub active: bool,
}

impl AudioState {
    pub fn initial(config: &AudioConfig) -> Self {
        Self {
            filter_cutoff: DEFAULT_FILTER_HZ.clamp(config.filter_hz.0, config.filter_hz.1),
            filter_q: DEFAULT_FILTER_Q.clamp(config.filter_q.0, config.filter_q.1),
            reverb_wet: DEFAULT_REVERB.clamp(config.reverb.0, config.reverb.1),
            delay_wet: DEFAULT_DELAY.min(config.delay_wet_max),
            drone_db: config.drone_db.0,
            tempo: config.default_tempo,
            stems: [1.0, 0.3],
            last_notes: [[None; 5]; 2],
            rhythm_on: false,
            active: false,
        }
    }

    pub fn param(&self, param: AudioParam) -> f32 {
        match param {
            AudioParam::FilterCutoff => self.filter_cutoff,
            AudioParam::FilterQ => self.filter_q,
            AudioParam::ReverbWet => self.reverb_wet,
            AudioParam::DelayWet => self.delay_wet,
            AudioParam::DroneVolumeDb => self.drone_db,
            AudioParam::Tempo => self.tempo,
            AudioParam::StemVolume(Stem::Rhythm) => self.stems[0],
            AudioParam::StemVolume(Stem::Melody) => self.stems[1],
        }
    }

    fn set_param(&mut self, param: AudioParam, value: f32) {
        match param {
            AudioParam::FilterCutoff => self.filter_cutoff = value,
            AudioParam::FilterQ => self.filter_q = value,
            AudioParam::ReverbWet => self.reverb_wet = value,
            AudioParam::DelayWet => self.delay_wet = value,
            AudioParam::DroneVolumeDb => self.drone_db = value,
            AudioParam::Tempo => self.tempo = value,
            AudioParam::StemVolume(Stem::Rhythm) => self.stems[0] = value,
            AudioParam::StemVolume(Stem::Melody) => self.stems[1] = value,
        }
    }
}

const CONTINUOUS_PARAMS: [AudioParam; 8] = [
    AudioParam::FilterCutoff,
    AudioParam::FilterQ,
    AudioParam::ReverbWet,
    AudioParam::DelayWet,
    AudioParam::DroneVolumeDb,
    AudioParam::Tempo,
    AudioParam::StemVolume(Stem::Rhythm),
    AudioParam::StemVolume(Stem::Melody),
];

#[inline]
fn lerp((lo, hi): (f32, f32), t: f32) -> f32 {
    lo + (hi - lo) * t.clamp(0.0, 1.0)
}

/// Finger spread mapped to \[0, 1\].
#[inline]
pub fn normalized_spread(spread: f32) -> f32 {
    (spread / SPREAD_FULL_SCALE).clamp(0.0, 1.0)
}

/// Rhythm and melody stem volumes from wrist x and height, both in \[0, 1\].
///
/// Left of center favors the rhythm stem, right of center the melody stem.
/// A raised hand adds up to +0.3 to the stem on its own side.
pub fn stem_volumes(x: f32, height: f32) -> [f32; 2] {
    use crate::constants::{STEM_RAISED_BOOST, STEM_RAISED_HEIGHT, STEM_SLOPE};
    let x = x.clamp(0.0, 1.0);
    let mut rhythm = 1.0 - STEM_SLOPE * x;
    let mut melody = (1.0 - STEM_SLOPE) + STEM_SLOPE * x;
    if height > STEM_RAISED_HEIGHT {
        let raised = ((height - STEM_RAISED_HEIGHT) / (1.0 - STEM_RAISED_HEIGHT)).clamp(0.0, 1.0);
        if x < 0.5 {
            rhythm += STEM_RAISED_BOOST * raised;
        } else {
            melody += STEM_RAISED_BOOST * raised;
        }
    }
    [rhythm, melody]
}

/// Average of the velocity-based and height-based tempo estimates.
pub fn combined_tempo(config: &AudioConfig, velocity: f32, height: f32) -> f32 {
    let from_velocity = lerp(config.tempo_from_velocity, velocity);
    let from_height = lerp(config.tempo_from_height, height);
    (from_velocity + from_height) * 0.5
}

/// Features the mapper consumes for one frame.
pub struct FrameFeatures<'a> {
    /// In detector order; the first entry is the primary hand.
    pub hands: &'a [HandFeatures],
    pub arms: Option<&'a Arms>,
}

impl<'a> FrameFeatures<'a> {
    /// Highest per-hand velocity, 0 without hands.
    pub fn overall_velocity(&self) -> f32 {
        self.hands.iter().map(|h| h.velocity).fold(0.0, f32::max)
    }

    fn hand(&self, handedness: Handedness) -> Option<&HandFeatures> {
        self.hands.iter().find(|h| h.handedness == handedness)
    }
}

pub struct AudioMapper {
    config: AudioConfig,
    state: AudioState,
    doira: DoiraLoop,
}

impl AudioMapper {
    pub fn new(config: AudioConfig) -> Self {
        let state = AudioState::initial(&config);
        Self {
            config,
            state,
            doira: DoiraLoop::new(),
        }
    }

    pub fn state(&self) -> &AudioState {
        &self.state
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Begin a session: reset state, set tempo, start the transport and publish
    /// every parameter's starting value.
    pub fn start(&mut self, out_events: &mut Vec<AudioCommand>) {
        self.state = AudioState::initial(&self.config);
        self.state.active = true;
        self.doira.stop();
        out_events.push(AudioCommand::SetTempo(self.state.tempo));
        out_events.push(AudioCommand::TransportStart);
        for param in CONTINUOUS_PARAMS {
            out_events.push(AudioCommand::Ramp {
                param,
                target: self.state.param(param),
                seconds: self.config.ramp_seconds,
            });
        }
        log::info!("[audio] session started at {:.0} bpm", self.state.tempo);
    }

    /// End the session. Later frames produce no commands until [`Self::start`].
    pub fn stop(&mut self, out_events: &mut Vec<AudioCommand>) {
        if !self.state.active {
            return;
        }
        self.doira.stop();
        self.state.rhythm_on = false;
        self.state.active = false;
        out_events.push(AudioCommand::TransportStop);
        log::info!("[audio] session stopped");
    }

    pub fn start_rhythm(&mut self) {
        if self.state.active && !self.state.rhythm_on {
            self.doira.start();
            self.state.rhythm_on = true;
            log::debug!("[audio] doira loop on");
        }
    }

    pub fn stop_rhythm(&mut self) {
        if self.state.rhythm_on {
            self.doira.stop();
            self.state.rhythm_on = false;
            log::debug!("[audio] doira loop off");
        }
    }

    pub fn toggle_rhythm(&mut self) {
        if self.state.rhythm_on {
            self.stop_rhythm();
        } else {
            self.start_rhythm();
        }
    }

    /// Fire the template-match chord stab.
    pub fn trigger_reward(&mut self, out_events: &mut Vec<AudioCommand>) {
        if self.state.active {
            out_events.push(AudioCommand::OneShot(OneShot::RewardChord));
        }
    }

    /// Advance the rhythmic loop on the shared transport tempo.
    pub fn tick(&mut self, dt: Duration, out_events: &mut Vec<AudioCommand>) {
        if self.state.active {
            self.doira.tick(dt, self.state.tempo, out_events);
        }
    }

    /// Map one frame of features. Returns the number of notes triggered.
    pub fn map_frame(
        &mut self,
        frame: &FrameFeatures<'_>,
        out_events: &mut Vec<AudioCommand>,
    ) -> usize {
        if !self.state.active {
            return 0;
        }
        let mut targets = self.state.clone();
        let cfg = &self.config;

        let Some(primary) = frame.hands.first() else {
            // Nobody in frame: let the drone settle, leave the rest where it is.
            targets.drone_db = cfg.drone_db.0;
            self.flush(&targets, out_events);
            return 0;
        };

        let velocity = frame.overall_velocity();
        targets.filter_cutoff = lerp(cfg.filter_hz, velocity);
        targets.reverb_wet = lerp(cfg.reverb, normalized_spread(primary.spread));
        targets.drone_db = lerp(cfg.drone_db, primary.height);
        targets.tempo = combined_tempo(cfg, velocity, primary.height);
        targets.stems = stem_volumes(primary.wrist_x, primary.height);

        // Call and response: the left hand answers with space, the right with echoes and bite.
        let pair = (frame.hand(Handedness::Left), frame.hand(Handedness::Right));
        if let (Some(left), Some(right)) = pair {
            targets.reverb_wet = lerp(cfg.reverb, left.height);
            targets.delay_wet = lerp((0.0, cfg.delay_wet_max), right.height);
            targets.filter_q = lerp(cfg.filter_q, normalized_spread(right.spread));
        }

        if let Some(arms) = frame.arms {
            let boost = cfg.arm_spread_reverb_boost * arms.arms_spread;
            targets.reverb_wet = (targets.reverb_wet + boost).min(cfg.reverb_ceiling);
            if arms.both_arms_up {
                targets.filter_cutoff = cfg.filter_open_hz;
            }
        }

        self.flush(&targets, out_events);
        self.trigger_finger_notes(frame.hands, velocity, out_events)
    }

    fn flush(&mut self, targets: &AudioState, out_events: &mut Vec<AudioCommand>) {
        for param in CONTINUOUS_PARAMS {
            let target = targets.param(param);
            if (target - self.state.param(param)).abs() > RAMP_EPSILON {
                self.state.set_param(param, target);
                out_events.push(AudioCommand::Ramp {
                    param,
                    target,
                    seconds: self.config.ramp_seconds,
                });
            }
        }
    }

    fn trigger_finger_notes(
        &mut self,
        hands: &[HandFeatures],
        velocity: f32,
        out_events: &mut Vec<AudioCommand>,
    ) -> usize {
        if velocity <= self.config.note_velocity_threshold {
            return 0;
        }
        let mut triggered = 0;
        for hand in hands {
            let last = &mut self.state.last_notes[hand.handedness.index()];
            for (finger, &height) in hand.fingertip_heights.iter().enumerate() {
                let step = scale_step(height, PENTATONIC_MIDI.len());
                if last[finger] == Some(step) {
                    continue;
                }
                last[finger] = Some(step);
                let midi = PENTATONIC_MIDI[step];
                out_events.push(AudioCommand::Note {
                    hand: hand.handedness,
                    finger,
                    midi,
                    frequency_hz: midi_to_hz(midi as f32),
                    duration_sec: self.config.note_duration_sec,
                });
                triggered += 1;
            }
        }
        triggered
    }
}

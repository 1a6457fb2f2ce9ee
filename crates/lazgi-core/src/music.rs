use crate::audio::{AudioCommand, DrumVoice};
use std::time::Duration;

/// D minor pentatonic over two octaves, low to high. Fingertip height picks a step.
pub const PENTATONIC_MIDI: [i32; 10] = [62, 65, 67, 69, 72, 74, 77, 79, 81, 84];

/// Notes of the reward stab played when a template is matched.
pub const REWARD_CHORD_MIDI: [i32; 4] = [62, 69, 74, 77];

/// Steps in the ostinato: two measures of 4/4 at sixteenth-note resolution.
pub const DOIRA_STEPS: usize = 32;

/// Doira ostinato, one row per voice. `X` accented hit, `x` normal hit, `.` rest.
pub const DOIRA_PATTERN: [(DrumVoice, &str); 3] = [
    (DrumVoice::Dum, "X.....x...x.....X.....x...x..x.."),
    (DrumVoice::Tak, "....x.......x.x.....x.......x.x."),
    (DrumVoice::Ka, "..x...x.x...x.....x...x.x...x..x"),
];

/// Convert a MIDI note number to Hertz (A4=440 Hz).
pub fn midi_to_hz(midi: f32) -> f32 {
    440.0 * (2.0_f32).powf((midi - 69.0) / 12.0)
}

/// Map a normalized height (1 = top of frame) to a step in a scale of `step_count` notes.
#[inline]
pub fn scale_step(height: f32, step_count: usize) -> usize {
    if step_count == 0 {
        return 0;
    }
    let h = if height.is_finite() { height } else { 0.0 };
    let step = (h * step_count as f32).floor();
    (step.max(0.0) as usize).min(step_count - 1)
}

#[inline]
fn hit_velocity(c: u8) -> Option<f32> {
    match c {
        b'X' => Some(1.0),
        b'x' => Some(0.7),
        _ => None,
    }
}

/// Sixteenth-note scheduler for the doira pattern.
///
/// The clock is shared with the rest of the sound engine: callers pass the
/// current transport tempo into every [`DoiraLoop::tick`], so tempo ramps from
/// hand motion speed the loop up and down.
#[derive(Clone, Debug, Default)]
pub struct DoiraLoop {
    active: bool,
    step: usize,
    step_accum: f64,
}

impl DoiraLoop {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Step that will sound next.
    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn start(&mut self) {
        self.active = true;
        self.step = 0;
        self.step_accum = 0.0;
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.step_accum = 0.0;
    }

    /// Advance by `dt` at `bpm`, pushing drum hits for every step crossed.
    pub fn tick(&mut self, dt: Duration, bpm: f32, out_events: &mut Vec<AudioCommand>) {
        if !self.active || bpm <= 0.0 {
            return;
        }
        let seconds_per_step = 60.0 / bpm as f64 / 4.0;
        self.step_accum += dt.as_secs_f64();
        while self.step_accum >= seconds_per_step {
            self.step_accum -= seconds_per_step;
            self.schedule_step(out_events);
            self.step = (self.step + 1) % DOIRA_STEPS;
        }
    }

    fn schedule_step(&self, out_events: &mut Vec<AudioCommand>) {
        for (drum, row) in DOIRA_PATTERN.iter() {
            if let Some(velocity) = row.as_bytes().get(self.step).copied().and_then(hit_velocity) {
                out_events.push(AudioCommand::Hit {
                    drum: *drum,
                    velocity,
                });
            }
        }
    }
}

//! lazgi: headless run of the frame pipeline against a synthetic detector.
//!
//! Usage: `lazgi [frames] [learn|perform]`. Set `RUST_LOG=debug` for per-event logs.

mod synthetic;

use anyhow::Context;
use instant::Instant;
use lazgi_core::{
    AudioCommand, AudioParam, EngineConfig, InteractionMode, Pipeline, Session, SourceMonitor,
};
use std::time::Duration;
use synthetic::OrbitSource;

const FPS: f32 = 60.0;
const SUMMARY_EVERY: u64 = 60;

#[derive(Default)]
struct CommandTally {
    ramps: usize,
    notes: usize,
    hits: usize,
    one_shots: usize,
}

impl CommandTally {
    fn add(&mut self, cmds: &[AudioCommand]) {
        for c in cmds {
            match c {
                AudioCommand::Ramp { .. } => self.ramps += 1,
                AudioCommand::Note { .. } => self.notes += 1,
                AudioCommand::Hit { .. } => self.hits += 1,
                AudioCommand::OneShot(_) => self.one_shots += 1,
                _ => {}
            }
        }
    }
}

/// Crude stand-in for an analyser: loudness follows recent triggers, tilted toward the lows.
fn fake_spectrum_db(energy: f32, bins: usize) -> Vec<f32> {
    (0..bins)
        .map(|i| {
            let tilt = 1.0 - i as f32 / bins.max(1) as f32;
            -100.0 + 90.0 * (energy * tilt).clamp(0.0, 1.0)
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let frames: u64 = match args.next() {
        Some(a) => a.parse().with_context(|| format!("invalid frame count `{a}`"))?,
        None => 600,
    };
    let mode = match args.next() {
        Some(m) => InteractionMode::from_name(&m)
            .with_context(|| format!("unknown mode `{m}` (expected learn or perform)"))?,
        None => InteractionMode::Perform,
    };

    let config = EngineConfig::default();
    let mut pipeline = Pipeline::new(config).context("invalid engine configuration")?;
    let mut session = Session::new(mode);
    let mut source = SourceMonitor::acquire(OrbitSource::new(FPS).with_dropout(200, 230))
        .context("could not acquire the landmark source")?;

    let mut commands = Vec::new();
    let mut tally = CommandTally::default();
    pipeline.audio_mut().start(&mut commands);
    pipeline.audio_mut().start_rhythm();
    tally.add(&commands);

    log::info!("running {frames} frames in {:?} mode", session.mode);
    let dt = Duration::from_secs_f32(1.0 / FPS);
    let mut energy = 0.0_f32;
    let mut busiest = Duration::ZERO;
    let started = Instant::now();

    for frame in 1..=frames {
        let frame_start = Instant::now();
        commands.clear();

        let bins = pipeline.config().spectrum_bins;
        pipeline.update_spectrum_db(&fake_spectrum_db(energy, bins));

        let input = source.next_frame();
        let report = pipeline.process_frame(&input, &session, dt, &mut commands);
        tally.add(&commands);

        energy *= 0.9;
        for c in &commands {
            match c {
                AudioCommand::Note { .. } => energy += 0.15,
                AudioCommand::Hit { velocity, .. } => energy += 0.2 * velocity,
                _ => {}
            }
        }

        busiest = busiest.max(frame_start.elapsed());

        if frame % SUMMARY_EVERY == 0 {
            let state = pipeline.audio().state();
            log::info!(
                "frame {frame}: pool={} score={:.2} best={:?} cutoff={:.0}Hz reverb={:.2} tempo={:.1}{}",
                report.pool_size,
                report.score,
                report.best_match.map(|b| b.index),
                state.param(AudioParam::FilterCutoff),
                state.reverb_wet,
                state.tempo,
                if source.is_degraded() { " (source degraded)" } else { "" },
            );
        }
        // Halfway through, flip modes the way the UI toggle does.
        if frame == frames / 2 {
            let next = match session.mode {
                InteractionMode::Learn => InteractionMode::Perform,
                InteractionMode::Perform => InteractionMode::Learn,
            };
            pipeline.switch_mode(&mut session, next);
        }
    }

    commands.clear();
    pipeline.audio_mut().stop(&mut commands);
    source.release();

    log::info!(
        "done in {:.2?}: {} ramps, {} notes, {} drum hits, {} rewards, {} evictions, {} failed polls, slowest frame {:.2?}",
        started.elapsed(),
        tally.ramps,
        tally.notes,
        tally.hits,
        tally.one_shots,
        pipeline.medallions().evicted(),
        source.failures(),
        busiest,
    );
    Ok(())
}

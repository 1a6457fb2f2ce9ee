// Host-side end-to-end tests: frames in, report/scene/commands out.

use glam::Vec3;
use lazgi_core::{
    templates, AudioCommand, AudioParam, ConfigError, EngineConfig, FrameInput, Hand, Handedness,
    InteractionMode, OneShot, Pipeline, PoseSample, Session,
};
use std::time::Duration;

const DT: Duration = Duration::from_millis(16);

fn template_hand(index: usize, handedness: Handedness) -> Hand {
    Hand::new(templates::library()[index].landmarks, handedness, 0.95)
}

fn started(config: EngineConfig) -> Pipeline {
    let mut pipeline = Pipeline::new(config).unwrap();
    pipeline.audio_mut().start(&mut Vec::new());
    pipeline
}

fn count_rewards(events: &[AudioCommand]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, AudioCommand::OneShot(OneShot::RewardChord)))
        .count()
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = EngineConfig::default();
    config.reward_threshold = 2.0;
    assert!(matches!(
        Pipeline::new(config),
        Err(ConfigError::NotAProbability { field: "reward_threshold", .. })
    ));
}

#[test]
fn learning_a_template_scores_high_every_frame() {
    let mut pipeline = started(EngineConfig::default());
    let mut session = Session::new(InteractionMode::Learn);
    session.template_index = 1;
    let hand = template_hand(1, Handedness::Right);
    let mut events = Vec::new();
    for _ in 0..30 {
        let report = pipeline.process_frame(
            &FrameInput::with_hands([hand.clone()]),
            &session,
            DT,
            &mut events,
        );
        assert!(report.score >= 0.99, "score {}", report.score);
        assert_eq!(report.best_match.map(|b| b.index), Some(1));
    }
}

#[test]
fn learn_score_takes_the_better_hand() {
    let mut pipeline = started(EngineConfig::default());
    let session = Session::new(InteractionMode::Learn);
    let far = template_hand(0, Handedness::Left).translated(Vec3::new(0.4, 0.0, 0.0));
    let near = template_hand(0, Handedness::Right);
    let report = pipeline.process_frame(
        &FrameInput::with_hands([far, near]),
        &session,
        DT,
        &mut Vec::new(),
    );
    assert!(report.score >= 0.99);
}

#[test]
fn perform_mode_reports_no_score() {
    let mut pipeline = started(EngineConfig::default());
    let session = Session::new(InteractionMode::Perform);
    let report = pipeline.process_frame(
        &FrameInput::with_hands([template_hand(0, Handedness::Right)]),
        &session,
        DT,
        &mut Vec::new(),
    );
    assert_eq!(report.score, 0.0);
    assert!(report.best_match.is_some());
    assert!(pipeline.scene(&session).template.is_none());
}

#[test]
fn pool_fills_to_cap_and_stays_there() {
    let mut config = EngineConfig::default();
    config.medallions.spawn_probability_perform = 1.0;
    let cap = config.medallions.pool_cap;
    let mut pipeline = started(config);
    let session = Session::new(InteractionMode::Perform);
    let hands = [
        template_hand(0, Handedness::Left),
        template_hand(2, Handedness::Right),
    ];
    let mut events = Vec::new();
    for frame in 0..200 {
        let report = pipeline.process_frame(
            &FrameInput::with_hands(hands.clone()),
            &session,
            DT,
            &mut events,
        );
        assert_eq!(report.spawned, 10);
        assert!(report.pool_size <= cap, "frame {frame}: {}", report.pool_size);
        events.clear();
    }
    assert_eq!(pipeline.medallions().len(), cap);
    assert_eq!(pipeline.scene(&session).medallions.len(), cap);
}

#[test]
fn still_hand_plays_no_notes() {
    let mut pipeline = started(EngineConfig::default());
    let session = Session::new(InteractionMode::Perform);
    let hand = template_hand(3, Handedness::Right);
    let mut events = Vec::new();
    for _ in 0..50 {
        let report = pipeline.process_frame(
            &FrameInput::with_hands([hand.clone()]),
            &session,
            DT,
            &mut events,
        );
        assert_eq!(report.notes, 0);
        assert_eq!(report.features[0].velocity, 0.0);
    }
    assert!(!events.iter().any(|e| matches!(e, AudioCommand::Note { .. })));
    let cutoff = pipeline.audio().state().param(AudioParam::FilterCutoff);
    assert_eq!(cutoff, 200.0);
}

#[test]
fn moving_hand_plays_notes() {
    let mut pipeline = started(EngineConfig::default());
    let session = Session::new(InteractionMode::Perform);
    let hand = template_hand(0, Handedness::Right);
    let mut events = Vec::new();
    pipeline.process_frame(&FrameInput::with_hands([hand.clone()]), &session, DT, &mut events);
    // Rise by a full scale step (0.1) in one frame: velocity 1.5, clamped to 1.
    let raised = hand.translated(Vec3::new(0.0, -0.1, 0.0));
    let report =
        pipeline.process_frame(&FrameInput::with_hands([raised]), &session, DT, &mut events);
    assert_eq!(report.features[0].velocity, 1.0);
    assert!(report.notes > 0);
}

#[test]
fn switching_mode_clears_the_pool() {
    let mut config = EngineConfig::default();
    config.medallions.spawn_probability_perform = 1.0;
    let mut pipeline = started(config);
    let mut session = Session::new(InteractionMode::Perform);
    let hand = template_hand(0, Handedness::Right);
    let input = FrameInput::with_hands([hand]);
    for _ in 0..5 {
        pipeline.process_frame(&input, &session, DT, &mut Vec::new());
    }
    assert!(!pipeline.medallions().is_empty());

    pipeline.switch_mode(&mut session, InteractionMode::Learn);
    assert_eq!(session.mode, InteractionMode::Learn);
    assert!(pipeline.medallions().is_empty());

    let report = pipeline.process_frame(&FrameInput::empty(), &session, DT, &mut Vec::new());
    assert_eq!(report.pool_size, 0);
    assert_eq!(report.spawned, 0);
}

#[test]
fn empty_frames_are_neutral() {
    let mut pipeline = started(EngineConfig::default());
    let session = Session::new(InteractionMode::Learn);
    let mut events = Vec::new();
    for _ in 0..10 {
        let report = pipeline.process_frame(&FrameInput::empty(), &session, DT, &mut events);
        assert_eq!(report.score, 0.0);
        assert!(report.best_match.is_none());
        assert!(report.features.is_empty());
        assert!(report.arms.is_none());
        assert!(!report.reward);
        assert_eq!(report.notes, 0);
    }
    assert!(pipeline.scene(&session).hands.is_empty());
    assert!(pipeline.scene(&session).template.is_some());
    assert_eq!(pipeline.frames(), 10);
}

#[test]
fn sound_off_emits_nothing() {
    let mut pipeline = started(EngineConfig::default());
    pipeline.audio_mut().start_rhythm();
    let mut session = Session::new(InteractionMode::Learn);
    session.toggle_sound();
    let hand = template_hand(0, Handedness::Right);
    let mut events = Vec::new();
    for i in 0..30 {
        let moved = hand.translated(Vec3::new(0.0, -0.01 * i as f32, 0.0));
        pipeline.process_frame(&FrameInput::with_hands([moved]), &session, DT, &mut events);
    }
    assert!(events.is_empty());
}

#[test]
fn reward_fires_once_per_match() {
    let mut pipeline = started(EngineConfig::default());
    let session = Session::new(InteractionMode::Learn);
    let hand = template_hand(0, Handedness::Right);
    let mut events = Vec::new();

    let input = FrameInput::with_hands([hand.clone()]);
    let mut rewarded_frames = 0;
    for _ in 0..20 {
        let report = pipeline.process_frame(&input, &session, DT, &mut events);
        rewarded_frames += report.reward as usize;
    }
    assert_eq!(rewarded_frames, 1);
    assert_eq!(count_rewards(&events), 1);

    // Losing the hand re-arms; matching again fires again.
    pipeline.process_frame(&FrameInput::empty(), &session, DT, &mut events);
    pipeline.process_frame(&FrameInput::with_hands([hand]), &session, DT, &mut events);
    assert_eq!(count_rewards(&events), 2);
}

#[test]
fn no_reward_without_an_audio_session() {
    let mut pipeline = Pipeline::new(EngineConfig::default()).unwrap();
    let session = Session::new(InteractionMode::Learn);
    let mut events = Vec::new();
    let report = pipeline.process_frame(
        &FrameInput::with_hands([template_hand(0, Handedness::Right)]),
        &session,
        DT,
        &mut events,
    );
    assert!(report.score >= 0.99);
    assert!(!report.reward);
    assert!(events.is_empty());
}

#[test]
fn spectrum_feeds_the_equalizer() {
    let mut pipeline = started(EngineConfig::default());
    let session = Session::default();
    let loud = vec![0.0_f32; pipeline.config().spectrum_bins];
    pipeline.update_spectrum_db(&loud);
    for _ in 0..60 {
        pipeline.process_frame(&FrameInput::empty(), &session, DT, &mut Vec::new());
    }
    let eq = pipeline.equalizer();
    assert_eq!(eq.len(), 50);
    assert!(eq.levels().iter().all(|&l| l > 0.99 && l <= 1.0));
    assert_eq!(eq.shapes().len(), 50);
    // Level just under 1: four layers each.
    assert!(eq.shapes().iter().all(|m| m.layers.len() == 4));

    pipeline.update_spectrum_db(&[]);
    pipeline.process_frame(&FrameInput::empty(), &session, DT, &mut Vec::new());
    assert!(pipeline.equalizer().levels().iter().all(|&l| l < 0.9));
}

fn arms_up_pose() -> lazgi_core::Pose {
    use lazgi_core::landmarks::*;
    let mut points = [Vec3::splat(0.5); POSE_LANDMARK_COUNT];
    points[LEFT_SHOULDER] = Vec3::new(0.6, 0.5, 0.0);
    points[RIGHT_SHOULDER] = Vec3::new(0.4, 0.5, 0.0);
    points[LEFT_WRIST] = Vec3::new(0.7, 0.2, 0.0);
    points[RIGHT_WRIST] = Vec3::new(0.3, 0.2, 0.0);
    Pose::from_slice(&points).unwrap()
}

fn cutoff_ramps(events: &[AudioCommand]) -> Vec<f32> {
    events
        .iter()
        .filter_map(|e| match e {
            AudioCommand::Ramp {
                param: AudioParam::FilterCutoff,
                target,
                ..
            } => Some(*target),
            _ => None,
        })
        .collect()
}

#[test]
fn pose_reaches_the_report() {
    let input = FrameInput::with_hands([template_hand(0, Handedness::Right)])
        .with_pose(arms_up_pose());
    let mut pipeline = started(EngineConfig::default());
    pipeline.process_frame(&input, &Session::default(), DT, &mut Vec::new());
    let report = pipeline.process_frame(&input, &Session::default(), DT, &mut Vec::new());
    assert!(report.arms.map(|a| a.both_arms_up).unwrap_or(false));
    assert_eq!(pipeline.audio().state().filter_cutoff, 8000.0);
}

#[test]
fn pose_holds_between_samples() {
    let mut pipeline = started(EngineConfig::default());
    let session = Session::new(InteractionMode::Perform);
    let hand = template_hand(3, Handedness::Right);
    let mut per_frame = Vec::new();
    for frame in 0..6 {
        let mut input = FrameInput::with_hands([hand.clone()]);
        if frame % 3 == 0 {
            input = input.with_pose(arms_up_pose());
        }
        let mut events = Vec::new();
        let report = pipeline.process_frame(&input, &session, DT, &mut events);
        assert!(report.arms.map(|a| a.both_arms_up).unwrap_or(false), "frame {frame}");
        per_frame.push(cutoff_ramps(&events));
    }
    assert_eq!(per_frame[0], vec![8000.0]);
    assert!(per_frame[1..].iter().all(|r| r.is_empty()), "{per_frame:?}");

    // An explicit empty pose result releases the override.
    let input = FrameInput::with_hands([hand]).with_pose(PoseSample::Missing);
    let mut events = Vec::new();
    let report = pipeline.process_frame(&input, &session, DT, &mut events);
    assert!(report.arms.is_none());
    assert_eq!(cutoff_ramps(&events), vec![200.0]);
}

#[test]
fn same_label_static_hands_stay_silent() {
    let mut pipeline = started(EngineConfig::default());
    let session = Session::new(InteractionMode::Perform);
    let first = template_hand(0, Handedness::Left);
    let second = first.translated(Vec3::new(0.3, 0.0, 0.0));
    let input = FrameInput::with_hands([first, second]);
    let mut events = Vec::new();
    for frame in 0..5 {
        let report = pipeline.process_frame(&input, &session, DT, &mut events);
        let velocities: Vec<f32> = report.features.iter().map(|f| f.velocity).collect();
        assert_eq!(velocities, vec![0.0, 0.0], "frame {frame}");
        assert_eq!(report.notes, 0);
    }
    assert_eq!(pipeline.audio().state().param(AudioParam::FilterCutoff), 200.0);
}

#[test]
fn non_finite_spectrum_does_not_stick() {
    let mut pipeline = started(EngineConfig::default());
    let session = Session::default();
    let bins = pipeline.config().spectrum_bins;
    pipeline.update_spectrum_linear(&vec![f32::NAN; bins]);
    pipeline.process_frame(&FrameInput::empty(), &session, DT, &mut Vec::new());
    pipeline.update_spectrum_linear(&vec![0.5; bins]);
    for _ in 0..10 {
        pipeline.process_frame(&FrameInput::empty(), &session, DT, &mut Vec::new());
    }
    let levels = pipeline.equalizer().levels();
    assert!(levels.iter().all(|l| l.is_finite() && *l > 0.0 && *l <= 0.5));
}

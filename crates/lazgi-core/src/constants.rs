// Shared visual/audio tuning constants. `EngineConfig::default()` is built from these.

// Canvas
pub const CANVAS_WIDTH: f32 = 1280.0;
pub const CANVAS_HEIGHT: f32 = 720.0;

// Medallion spawning
pub const SPAWN_PROBABILITY_PERFORM: f32 = 0.25; // per fingertip, per frame
pub const SPAWN_PROBABILITY_LEARN: f32 = 0.12;
pub const SPAWN_JITTER_PX: f32 = 12.0; // max offset from the fingertip on each axis
pub const MEDALLION_POOL_CAP: usize = 80; // oldest evicted beyond this

// Medallion shape distributions
pub const LAYER_COUNT_MIN: usize = 2;
pub const LAYER_COUNT_MAX: usize = 5;
pub const BASE_WIDTH_MIN: f32 = 40.0;
pub const BASE_WIDTH_MAX: f32 = 80.0;
pub const ASPECT_MIN: f32 = 2.0; // height = width * aspect
pub const ASPECT_MAX: f32 = 3.5;
pub const INNER_SCALE_MIN: f32 = 0.5; // each inner layer relative to its parent
pub const INNER_SCALE_MAX: f32 = 0.7;
pub const LAYER_BLUR_CHANCE: f32 = 0.4;
pub const LAYER_JITTER_PX: f32 = 3.0;
pub const WOBBLE_AMP_MIN: f32 = 2.0;
pub const WOBBLE_AMP_MAX: f32 = 6.0;
pub const CENTER_ORNAMENT_CHANCE: f32 = 0.08;
pub const CENTER_ORNAMENT_BLUR_CHANCE: f32 = 0.3;
pub const BLUR_PASSES: usize = 4; // concentric expanding, fading copies

// Medallion motion
pub const DECAY_MIN: f32 = 0.008; // life lost per tick
pub const DECAY_MAX: f32 = 0.02;
pub const GRAVITY_PER_TICK: f32 = 0.05; // added to vy every tick (screen y grows downward)
pub const INITIAL_VX_SPAN: f32 = 0.6; // vx in [-span, span]
pub const INITIAL_VY_MIN: f32 = -1.5; // drift upward first
pub const INITIAL_VY_MAX: f32 = -0.3;

// Equalizer strip
pub const EQUALIZER_COUNT: usize = 50;
pub const EQUALIZER_SMOOTHING: f32 = 0.85; // new = s*old + (1-s)*bin
pub const EQUALIZER_BAND_Y: f32 = 0.88; // fraction of canvas height

// Spectrum snapshot
pub const SPECTRUM_BINS: usize = 64;
pub const SPECTRUM_DB_FLOOR: f32 = -100.0; // maps to 0
pub const SPECTRUM_DB_SPAN: f32 = 100.0; // floor + span maps to 1

// Features and matching
pub const VELOCITY_SENSITIVITY: f32 = 15.0; // mean displacement -> [0,1]
pub const ANGLE_EPSILON: f32 = 1e-4;
pub const MATCH_NORMALIZATION: f32 = 0.25; // avg landmark distance yielding score 0
pub const REWARD_THRESHOLD: f32 = 0.8;

// Audio mapping
pub const NOTE_VELOCITY_THRESHOLD: f32 = 0.1;
pub const FILTER_MIN_HZ: f32 = 200.0;
pub const FILTER_MAX_HZ: f32 = 4200.0;
pub const FILTER_OPEN_HZ: f32 = 8000.0; // both arms raised
pub const FILTER_Q_MIN: f32 = 0.5;
pub const FILTER_Q_MAX: f32 = 8.0;
pub const REVERB_MIN: f32 = 0.0;
pub const REVERB_MAX: f32 = 0.6;
pub const REVERB_CEILING: f32 = 0.8; // with pose boost
pub const ARM_SPREAD_REVERB_BOOST: f32 = 0.2;
pub const DELAY_WET_MAX: f32 = 0.5;
pub const DRONE_MIN_DB: f32 = -30.0;
pub const DRONE_MAX_DB: f32 = -15.0;
pub const TEMPO_VELOCITY_MIN: f32 = 80.0;
pub const TEMPO_VELOCITY_MAX: f32 = 180.0;
pub const TEMPO_HEIGHT_MIN: f32 = 80.0;
pub const TEMPO_HEIGHT_MAX: f32 = 160.0;
pub const DEFAULT_TEMPO_BPM: f32 = 110.0;
pub const RAMP_SECONDS: f32 = 0.2;
pub const NOTE_DURATION_SEC: f32 = 0.3;

// Stem balance
pub const STEM_SLOPE: f32 = 0.7;
pub const STEM_RAISED_HEIGHT: f32 = 0.6;
pub const STEM_RAISED_BOOST: f32 = 0.3;

// Pose
pub const ARM_UP_HEIGHT: f32 = 0.5;

//! Core of the Lazgi hand-motion piece: per-frame landmark features, template
//! matching, medallion particles and audio modulation. Platform free; the
//! camera, detector, surface and sound engine are external collaborators.

pub mod audio;
pub mod config;
pub mod constants;
pub mod equalizer;
pub mod error;
pub mod features;
pub mod landmarks;
pub mod medallion;
pub mod music;
pub mod noise;
pub mod palette;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod source;
pub mod spectrum;
pub mod templates;

pub use audio::{AudioCommand, AudioMapper, AudioParam, AudioState, DrumVoice, OneShot, Stem};
pub use config::{AudioConfig, EngineConfig, MedallionConfig};
pub use error::{ConfigError, LandmarkError, SourceError};
pub use features::{HandFeatures, VelocityTracker};
pub use landmarks::{Arms, FrameInput, Hand, Handedness, Landmark, Pose, PoseSample};
pub use medallion::{Medallion, MedallionField};
pub use pipeline::{FrameReport, Pipeline};
pub use session::{InteractionMode, Session};
pub use source::{LandmarkSource, SourceMonitor};
pub use templates::{find_best_match, get_closest_template, BestMatch, Template, TemplateMatcher};

//! Stand-in landmark source: two hands tracing slow orbits, plus an arm pose
//! sampled at a third of the hand rate.

use glam::Vec3;
use lazgi_core::landmarks::{
    Pose, LEFT_ELBOW, LEFT_SHOULDER, LEFT_WRIST, POSE_LANDMARK_COUNT, RIGHT_ELBOW,
    RIGHT_SHOULDER, RIGHT_WRIST,
};
use lazgi_core::{templates, FrameInput, Hand, Handedness, LandmarkSource, SourceError};

pub const POSE_EVERY_N_FRAMES: u64 = 3;

pub struct OrbitSource {
    frame: u64,
    fps: f32,
    /// Simulated tracker dropouts: polls in `[start, end)` fail.
    dropout: Option<(u64, u64)>,
    acquired: bool,
}

impl OrbitSource {
    pub fn new(fps: f32) -> Self {
        Self {
            frame: 0,
            fps,
            dropout: None,
            acquired: false,
        }
    }

    pub fn with_dropout(mut self, start: u64, end: u64) -> Self {
        self.dropout = Some((start, end));
        self
    }

    fn hands(&self, t: f32) -> [Hand; 2] {
        let shape = &templates::library()[0].landmarks;
        let right = Hand::new(*shape, Handedness::Right, 0.95)
            .translated(Vec3::new(0.18 * (t * 0.9).cos(), 0.15 * (t * 1.3).sin(), 0.0));
        let mirrored = shape.map(|p| Vec3::new(1.0 - p.x, p.y, p.z));
        let left = Hand::new(mirrored, Handedness::Left, 0.9)
            .translated(Vec3::new(-0.12 * (t * 0.7).sin(), 0.1 * (t * 0.5).cos(), 0.0));
        [left, right]
    }

    fn pose(&self, t: f32) -> Pose {
        let mut points = [Vec3::new(0.5, 0.5, 0.0); POSE_LANDMARK_COUNT];
        let raise = 0.5 + 0.5 * (t * 0.25).sin();
        points[LEFT_SHOULDER] = Vec3::new(0.62, 0.45, 0.0);
        points[RIGHT_SHOULDER] = Vec3::new(0.38, 0.45, 0.0);
        points[LEFT_ELBOW] = Vec3::new(0.72, 0.45 - 0.08 * raise, 0.0);
        points[RIGHT_ELBOW] = Vec3::new(0.28, 0.45 - 0.08 * raise, 0.0);
        points[LEFT_WRIST] = Vec3::new(0.78, 0.55 - 0.35 * raise, 0.0);
        points[RIGHT_WRIST] = Vec3::new(0.22, 0.55 - 0.35 * raise, 0.0);
        Pose { landmarks: points }
    }
}

impl LandmarkSource for OrbitSource {
    fn acquire(&mut self) -> Result<(), SourceError> {
        self.acquired = true;
        Ok(())
    }

    fn poll(&mut self) -> Result<FrameInput, SourceError> {
        if !self.acquired {
            return Err(SourceError::Unavailable("orbit source not acquired".into()));
        }
        let frame = self.frame;
        self.frame += 1;
        if let Some((start, end)) = self.dropout {
            if (start..end).contains(&frame) {
                return Err(SourceError::Disconnected);
            }
        }
        let t = frame as f32 / self.fps;
        let input = FrameInput::with_hands(self.hands(t));
        if frame % POSE_EVERY_N_FRAMES == 0 {
            Ok(input.with_pose(self.pose(t)))
        } else {
            Ok(input)
        }
    }

    fn release(&mut self) {
        self.acquired = false;
    }
}

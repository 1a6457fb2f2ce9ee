//! Per-frame landmark records delivered by the external detector.
//!
//! Coordinates are normalized to the camera frame: x and y in \[0, 1\] with y
//! growing downward, z a relative depth whose scale is left to the detector.
//! Nothing here persists across frames; hands and poses are rebuilt every time
//! the detector produces a result.

use crate::error::LandmarkError;
use crate::features;
use glam::Vec3;
use smallvec::SmallVec;

pub type Landmark = Vec3;

pub const HAND_LANDMARK_COUNT: usize = 21;
pub const POSE_LANDMARK_COUNT: usize = 33;

// Hand indices
pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

pub const FINGERTIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Four joints per finger, base to tip. The thumb starts at its CMC joint.
pub const FINGER_JOINTS: [[usize; 4]; 5] = [
    [THUMB_CMC, THUMB_MCP, THUMB_IP, THUMB_TIP],
    [INDEX_MCP, INDEX_PIP, INDEX_DIP, INDEX_TIP],
    [MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP, MIDDLE_TIP],
    [RING_MCP, RING_PIP, RING_DIP, RING_TIP],
    [PINKY_MCP, PINKY_PIP, PINKY_DIP, PINKY_TIP],
];

/// Wrist plus the four finger MCPs, averaged for the palm center.
pub const PALM_POINTS: [usize; 5] = [WRIST, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

// Pose indices
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Parse the detector's label: "Left"/"Right", their lowercase forms or "L"/"R".
    /// Anything else is rejected.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Left" | "left" | "L" => Some(Handedness::Left),
            "Right" | "right" | "R" => Some(Handedness::Right),
            _ => None,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Handedness::Left => 0,
            Handedness::Right => 1,
        }
    }
}

/// One tracked hand for one frame.
///
/// Fields:
/// - `landmarks`: the 21 detector points in anatomical order
/// - `handedness`: the detector's label, also used as the cross-frame identity
/// - `confidence`: detector score in \[0, 1\]
#[derive(Clone, Debug, PartialEq)]
pub struct Hand {
    pub landmarks: [Landmark; HAND_LANDMARK_COUNT],
    pub handedness: Handedness,
    pub confidence: f32,
}

impl Hand {
    pub fn new(
        landmarks: [Landmark; HAND_LANDMARK_COUNT],
        handedness: Handedness,
        confidence: f32,
    ) -> Self {
        Self {
            landmarks,
            handedness,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Build a hand from an untrusted slice of detector points.
    pub fn from_slice(
        points: &[Landmark],
        handedness: Handedness,
        confidence: f32,
    ) -> Result<Self, LandmarkError> {
        let landmarks = checked_array::<HAND_LANDMARK_COUNT>(points)?;
        Ok(Self::new(landmarks, handedness, confidence))
    }

    #[inline]
    pub fn wrist(&self) -> Landmark {
        self.landmarks[WRIST]
    }

    #[inline]
    pub fn fingertips(&self) -> [Landmark; 5] {
        FINGERTIPS.map(|i| self.landmarks[i])
    }

    /// Translate every landmark by `offset`.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            landmarks: self.landmarks.map(|p| p + offset),
            ..self.clone()
        }
    }
}

/// Full-body skeleton for one frame. Only the arm points are consumed.
#[derive(Clone, Debug, PartialEq)]
pub struct Pose {
    pub landmarks: [Landmark; POSE_LANDMARK_COUNT],
}

impl Pose {
    pub fn from_slice(points: &[Landmark]) -> Result<Self, LandmarkError> {
        Ok(Self {
            landmarks: checked_array::<POSE_LANDMARK_COUNT>(points)?,
        })
    }

    /// Derive the arm summary used by the audio mapper.
    pub fn arms(&self) -> Arms {
        let lm = &self.landmarks;
        let shoulder_width = lm[LEFT_SHOULDER]
            .truncate()
            .distance(lm[RIGHT_SHOULDER].truncate())
            .max(crate::constants::ANGLE_EPSILON);
        let left = Arm::new(lm[LEFT_SHOULDER], lm[LEFT_ELBOW], lm[LEFT_WRIST], shoulder_width);
        let right = Arm::new(
            lm[RIGHT_SHOULDER],
            lm[RIGHT_ELBOW],
            lm[RIGHT_WRIST],
            shoulder_width,
        );
        let wrist_dx = (left.wrist.x - right.wrist.x).abs();
        Arms {
            both_arms_up: left.is_up() && right.is_up(),
            arms_spread: (wrist_dx / (4.0 * shoulder_width)).clamp(0.0, 1.0),
            symmetry: (1.0 - (left.arm_height - right.arm_height).abs() / 2.0).clamp(0.0, 1.0),
            shoulder_width,
            left,
            right,
        }
    }
}

/// One side of the body, derived from the pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arm {
    pub shoulder: Landmark,
    pub elbow: Landmark,
    pub wrist: Landmark,
    /// Elbow interior angle in radians.
    pub arm_angle: f32,
    /// Wrist height above the shoulder in shoulder widths, clamped to \[-1, 1\].
    pub arm_height: f32,
}

impl Arm {
    fn new(shoulder: Landmark, elbow: Landmark, wrist: Landmark, shoulder_width: f32) -> Self {
        Self {
            shoulder,
            elbow,
            wrist,
            arm_angle: features::arm_angle(shoulder, elbow, wrist),
            arm_height: ((shoulder.y - wrist.y) / shoulder_width).clamp(-1.0, 1.0),
        }
    }

    #[inline]
    pub fn is_up(&self) -> bool {
        self.arm_height > crate::constants::ARM_UP_HEIGHT
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arms {
    pub left: Arm,
    pub right: Arm,
    pub both_arms_up: bool,
    /// Horizontal wrist separation in \[0, 1\].
    pub arms_spread: f32,
    pub shoulder_width: f32,
    /// 1 when both arms are at the same height.
    pub symmetry: f32,
}

/// Result of the pose model for one frame. Pose detection runs at a lower rate
/// than hand detection, so most frames carry no pose result at all.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PoseSample {
    /// The pose model did not run on this frame. Consumers keep the last result.
    #[default]
    Skipped,
    /// The pose model ran and found nobody.
    Missing,
    Detected(Pose),
}

impl PoseSample {
    pub fn pose(&self) -> Option<&Pose> {
        match self {
            PoseSample::Detected(pose) => Some(pose),
            _ => None,
        }
    }
}

impl From<Pose> for PoseSample {
    fn from(pose: Pose) -> Self {
        PoseSample::Detected(pose)
    }
}

impl From<Option<Pose>> for PoseSample {
    fn from(pose: Option<Pose>) -> Self {
        match pose {
            Some(pose) => PoseSample::Detected(pose),
            None => PoseSample::Missing,
        }
    }
}

/// Everything the detector produced for one frame. Always delivered, even when empty,
/// so consumers can settle instead of holding stale state.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameInput {
    pub hands: SmallVec<[Hand; 2]>,
    pub pose: PoseSample,
}

impl FrameInput {
    /// A frame where both models ran and found nothing.
    pub fn empty() -> Self {
        Self {
            hands: SmallVec::new(),
            pose: PoseSample::Missing,
        }
    }

    /// Hands only; the pose model skipped this frame.
    pub fn with_hands(hands: impl IntoIterator<Item = Hand>) -> Self {
        Self {
            hands: hands.into_iter().collect(),
            pose: PoseSample::Skipped,
        }
    }

    pub fn with_pose(mut self, pose: impl Into<PoseSample>) -> Self {
        self.pose = pose.into();
        self
    }

    pub fn hand(&self, handedness: Handedness) -> Option<&Hand> {
        self.hands.iter().find(|h| h.handedness == handedness)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hands.is_empty() && self.pose.pose().is_none()
    }
}

fn checked_array<const N: usize>(points: &[Landmark]) -> Result<[Landmark; N], LandmarkError> {
    if points.len() != N {
        return Err(LandmarkError::WrongCount {
            expected: N,
            actual: points.len(),
        });
    }
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(LandmarkError::NonFinite { index });
    }
    let mut out = [Landmark::ZERO; N];
    out.copy_from_slice(points);
    Ok(out)
}

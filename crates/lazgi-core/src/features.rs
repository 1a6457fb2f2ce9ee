//! Kinematic features derived from raw landmarks.
//!
//! Everything except velocity is a pure function of one snapshot. Velocity
//! needs the previous snapshot of the same hand, which [`VelocityTracker`]
//! keeps keyed by handedness label. A detector that relabels a hand between
//! frames therefore reads as a new hand and reports zero velocity for one frame.

use crate::constants::{ANGLE_EPSILON, VELOCITY_SENSITIVITY};
use crate::landmarks::{
    Hand, Handedness, Landmark, FINGERTIPS, FINGER_JOINTS, HAND_LANDMARK_COUNT, INDEX_TIP,
    MIDDLE_MCP, PALM_POINTS, PINKY_TIP, WRIST,
};
use fnv::FnvHashMap;
use glam::Vec3;
use smallvec::SmallVec;

/// Mean of the wrist and the four finger MCP joints.
pub fn palm_center(landmarks: &[Landmark; HAND_LANDMARK_COUNT]) -> Landmark {
    let sum: Vec3 = PALM_POINTS.iter().map(|&i| landmarks[i]).sum();
    sum / PALM_POINTS.len() as f32
}

/// Index-tip to pinky-tip distance in normalized units. Callers scale it.
pub fn finger_spread(landmarks: &[Landmark; HAND_LANDMARK_COUNT]) -> f32 {
    landmarks[INDEX_TIP].distance(landmarks[PINKY_TIP])
}

/// Angle between the MCP→PIP and PIP→TIP segments, in \[0, π\]. 0 is a straight finger.
pub fn finger_bend_angle(mcp: Landmark, pip: Landmark, tip: Landmark) -> f32 {
    angle_between(pip - mcp, tip - pip)
}

/// Bend angle for all five fingers, thumb first.
pub fn finger_bend_angles(landmarks: &[Landmark; HAND_LANDMARK_COUNT]) -> [f32; 5] {
    FINGER_JOINTS.map(|[base, pip, _, tip]| {
        finger_bend_angle(landmarks[base], landmarks[pip], landmarks[tip])
    })
}

/// Orientation of the wrist→middle-MCP vector, `atan2(dy, dx)`.
pub fn wrist_angle(landmarks: &[Landmark; HAND_LANDMARK_COUNT]) -> f32 {
    let d = landmarks[MIDDLE_MCP] - landmarks[WRIST];
    d.y.atan2(d.x)
}

/// Elbow interior angle in \[0, π\]. π is a fully straight arm.
pub fn arm_angle(shoulder: Landmark, elbow: Landmark, wrist: Landmark) -> f32 {
    angle_between(shoulder - elbow, wrist - elbow)
}

/// Wrist height where 1 is the top of the frame.
#[inline]
pub fn hand_height(landmarks: &[Landmark; HAND_LANDMARK_COUNT]) -> f32 {
    (1.0 - landmarks[WRIST].y).clamp(0.0, 1.0)
}

/// Mean per-landmark displacement, scaled and clamped to \[0, 1\].
/// Returns 0 when there is no previous snapshot.
pub fn hand_velocity(
    current: &[Landmark; HAND_LANDMARK_COUNT],
    previous: Option<&[Landmark; HAND_LANDMARK_COUNT]>,
    sensitivity: f32,
) -> f32 {
    let Some(previous) = previous else {
        return 0.0;
    };
    let total: f32 = current
        .iter()
        .zip(previous.iter())
        .map(|(c, p)| c.distance(*p))
        .sum();
    let mean = total / HAND_LANDMARK_COUNT as f32;
    let v = mean * sensitivity;
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[inline]
fn angle_between(a: Vec3, b: Vec3) -> f32 {
    let denom = a.length() * b.length() + ANGLE_EPSILON;
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}

/// One frame of history per hand identity, for velocity.
#[derive(Clone, Debug)]
pub struct VelocityTracker {
    previous: FnvHashMap<Handedness, [Landmark; HAND_LANDMARK_COUNT]>,
    sensitivity: f32,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new(VELOCITY_SENSITIVITY)
    }
}

impl VelocityTracker {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            previous: FnvHashMap::default(),
            sensitivity,
        }
    }

    /// Velocity of `hand` against its last snapshot, then store it as the new baseline.
    pub fn update(&mut self, hand: &Hand) -> f32 {
        let v = hand_velocity(
            &hand.landmarks,
            self.previous.get(&hand.handedness),
            self.sensitivity,
        );
        self.previous.insert(hand.handedness, hand.landmarks);
        v
    }

    /// Velocities for every hand of one frame, in input order.
    ///
    /// All hands read the baselines of the previous frame; the new baselines are
    /// committed only after the whole frame is measured. When the detector gives
    /// two hands the same label, the first one keeps the identity and the others
    /// read 0. Labels absent from the frame lose their baseline.
    pub fn update_frame(&mut self, hands: &[Hand]) -> SmallVec<[f32; 2]> {
        let mut next: FnvHashMap<Handedness, [Landmark; HAND_LANDMARK_COUNT]> =
            FnvHashMap::default();
        let velocities = hands
            .iter()
            .map(|hand| {
                if next.contains_key(&hand.handedness) {
                    return 0.0;
                }
                next.insert(hand.handedness, hand.landmarks);
                hand_velocity(
                    &hand.landmarks,
                    self.previous.get(&hand.handedness),
                    self.sensitivity,
                )
            })
            .collect();
        self.previous = next;
        velocities
    }

    pub fn has_baseline(&self, handedness: Handedness) -> bool {
        self.previous.contains_key(&handedness)
    }

    pub fn clear(&mut self) {
        self.previous.clear();
    }
}

/// Derived scalars for one hand in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandFeatures {
    pub handedness: Handedness,
    pub palm_center: Landmark,
    pub spread: f32,
    pub bend_angles: [f32; 5],
    pub wrist_angle: f32,
    pub velocity: f32,
    pub height: f32,
    /// Wrist x in \[0, 1\].
    pub wrist_x: f32,
    /// 1 − y for each fingertip, thumb first.
    pub fingertip_heights: [f32; 5],
}

impl HandFeatures {
    /// Every feature of `hand`, given its velocity for this frame.
    pub fn extract(hand: &Hand, velocity: f32) -> Self {
        let lm = &hand.landmarks;
        Self {
            handedness: hand.handedness,
            palm_center: palm_center(lm),
            spread: finger_spread(lm),
            bend_angles: finger_bend_angles(lm),
            wrist_angle: wrist_angle(lm),
            velocity,
            height: hand_height(lm),
            wrist_x: lm[WRIST].x.clamp(0.0, 1.0),
            fingertip_heights: FINGERTIPS.map(|i| (1.0 - lm[i].y).clamp(0.0, 1.0)),
        }
    }

    /// Features for every hand of one frame, advancing the tracker once.
    pub fn extract_frame(hands: &[Hand], tracker: &mut VelocityTracker) -> SmallVec<[Self; 2]> {
        let velocities = tracker.update_frame(hands);
        hands
            .iter()
            .zip(velocities)
            .map(|(hand, velocity)| Self::extract(hand, velocity))
            .collect()
    }
}

//! Reference hand shapes from the Lazgi vocabulary and the matcher that scores against them.
//!
//! Scores compare raw normalized coordinates, so a live hand must sit roughly
//! where the template was authored to score well. That is intentional: the
//! learn mode asks the dancer to mirror a shape shown at a fixed place on screen.

use crate::constants::MATCH_NORMALIZATION;
use crate::landmarks::{Hand, Landmark, HAND_LANDMARK_COUNT};
use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateCategory {
    Opening,
    Flowing,
    Angular,
    Closing,
}

/// Immutable reference shape.
#[derive(Clone, Debug)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: TemplateCategory,
    pub landmarks: [Landmark; HAND_LANDMARK_COUNT],
}

/// Result of scanning a library.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BestMatch {
    pub index: usize,
    pub score: f32,
}

/// Scores live hands against templates.
#[derive(Clone, Copy, Debug)]
pub struct TemplateMatcher {
    /// Average per-landmark distance at which the score reaches 0.
    pub normalization: f32,
}

impl Default for TemplateMatcher {
    fn default() -> Self {
        Self {
            normalization: MATCH_NORMALIZATION,
        }
    }
}

impl TemplateMatcher {
    pub fn new(normalization: f32) -> Self {
        Self { normalization }
    }

    /// Similarity in \[0, 1\]. Absent inputs score 0.
    pub fn score(&self, hand: Option<&Hand>, template: Option<&Template>) -> f32 {
        match (hand, template) {
            (Some(h), Some(t)) => self.score_landmarks(&h.landmarks, &t.landmarks),
            _ => 0.0,
        }
    }

    pub fn score_landmarks(
        &self,
        live: &[Landmark; HAND_LANDMARK_COUNT],
        reference: &[Landmark; HAND_LANDMARK_COUNT],
    ) -> f32 {
        let avg = average_distance(live, reference);
        let s = 1.0 - avg / self.normalization.max(f32::EPSILON);
        if s.is_finite() {
            s.max(0.0)
        } else {
            0.0
        }
    }

    /// Highest-scoring template. Ties go to the earliest entry.
    /// `None` when there is no hand or the library is empty.
    pub fn find_best_match(&self, hand: Option<&Hand>, library: &[Template]) -> Option<BestMatch> {
        let hand = hand?;
        let mut best: Option<BestMatch> = None;
        for (index, template) in library.iter().enumerate() {
            let score = self.score(Some(hand), Some(template));
            match best {
                Some(b) if score <= b.score => {}
                _ => best = Some(BestMatch { index, score }),
            }
        }
        best
    }
}

/// Score one hand against one template with the default normalization.
pub fn get_closest_template(hand: Option<&Hand>, template: Option<&Template>) -> f32 {
    TemplateMatcher::default().score(hand, template)
}

/// Best template in `library` with the default normalization.
pub fn find_best_match(hand: Option<&Hand>, library: &[Template]) -> Option<BestMatch> {
    TemplateMatcher::default().find_best_match(hand, library)
}

#[inline]
pub fn average_distance(
    a: &[Landmark; HAND_LANDMARK_COUNT],
    b: &[Landmark; HAND_LANDMARK_COUNT],
) -> f32 {
    let total: f32 = a.iter().zip(b.iter()).map(|(p, q)| p.distance(*q)).sum();
    total / HAND_LANDMARK_COUNT as f32
}

/// The built-in library, in presentation order.
pub fn library() -> &'static [Template] {
    &LIBRARY
}

pub fn template_by_id(id: &str) -> Option<&'static Template> {
    LIBRARY.iter().find(|t| t.id == id)
}

static LIBRARY: [Template; 5] = [
    Template {
        id: "sun_salutation",
        name: "Sun Salutation",
        description: "Open palm raised to the sun, fingers fanned wide",
        category: TemplateCategory::Opening,
        landmarks: SUN_SALUTATION,
    },
    Template {
        id: "trembling_flame",
        name: "Trembling Flame",
        description: "Fingers drawn together and softly curved upward like a flame",
        category: TemplateCategory::Flowing,
        landmarks: TREMBLING_FLAME,
    },
    Template {
        id: "broken_angle",
        name: "Broken Angle",
        description: "Wrist sharply bent, straight fingers pointing sideways",
        category: TemplateCategory::Angular,
        landmarks: BROKEN_ANGLE,
    },
    Template {
        id: "finger_flutter",
        name: "Finger Flutter",
        description: "Spread hand with index and ring fingers dipping in alternation",
        category: TemplateCategory::Flowing,
        landmarks: FINGER_FLUTTER,
    },
    Template {
        id: "closed_lotus",
        name: "Closed Lotus",
        description: "Fingertips gathered over the palm like a closed bud",
        category: TemplateCategory::Closing,
        landmarks: CLOSED_LOTUS,
    },
];

const SUN_SALUTATION: [Landmark; HAND_LANDMARK_COUNT] = [
    Vec3::new(0.5, 0.78, 0.0),
    Vec3::new(0.447, 0.752, -0.01),
    Vec3::new(0.401, 0.733, -0.02),
    Vec3::new(0.358, 0.718, -0.03),
    Vec3::new(0.32, 0.707, -0.04),
    Vec3::new(0.416, 0.632, -0.01),
    Vec3::new(0.385, 0.569, -0.02),
    Vec3::new(0.369, 0.527, -0.03),
    Vec3::new(0.358, 0.494, -0.04),
    Vec3::new(0.481, 0.616, -0.01),
    Vec3::new(0.477, 0.541, -0.02),
    Vec3::new(0.478, 0.491, -0.03),
    Vec3::new(0.482, 0.453, -0.04),
    Vec3::new(0.543, 0.631, -0.01),
    Vec3::new(0.567, 0.565, -0.02),
    Vec3::new(0.586, 0.524, -0.03),
    Vec3::new(0.602, 0.494, -0.04),
    Vec3::new(0.589, 0.665, -0.01),
    Vec3::new(0.626, 0.624, -0.02),
    Vec3::new(0.651, 0.6, -0.03),
    Vec3::new(0.674, 0.581, -0.04),
];

const TREMBLING_FLAME: [Landmark; HAND_LANDMARK_COUNT] = [
    Vec3::new(0.5, 0.78, 0.0),
    Vec3::new(0.461, 0.735, -0.01),
    Vec3::new(0.418, 0.709, -0.02),
    Vec3::new(0.374, 0.698, -0.03),
    Vec3::new(0.334, 0.701, -0.04),
    Vec3::new(0.477, 0.612, -0.01),
    Vec3::new(0.48, 0.542, -0.02),
    Vec3::new(0.49, 0.498, -0.03),
    Vec3::new(0.503, 0.465, -0.04),
    Vec3::new(0.495, 0.615, -0.01),
    Vec3::new(0.511, 0.542, -0.02),
    Vec3::new(0.533, 0.497, -0.03),
    Vec3::new(0.558, 0.468, -0.04),
    Vec3::new(0.511, 0.625, -0.01),
    Vec3::new(0.529, 0.558, -0.02),
    Vec3::new(0.547, 0.517, -0.03),
    Vec3::new(0.567, 0.488, -0.04),
    Vec3::new(0.525, 0.637, -0.01),
    Vec3::new(0.55, 0.588, -0.02),
    Vec3::new(0.575, 0.564, -0.03),
    Vec3::new(0.602, 0.551, -0.04),
];

const BROKEN_ANGLE: [Landmark; HAND_LANDMARK_COUNT] = [
    Vec3::new(0.5, 0.78, 0.0),
    Vec3::new(0.442, 0.797, -0.01),
    Vec3::new(0.396, 0.815, -0.02),
    Vec3::new(0.355, 0.835, -0.03),
    Vec3::new(0.321, 0.855, -0.04),
    Vec3::new(0.337, 0.731, -0.01),
    Vec3::new(0.272, 0.705, -0.02),
    Vec3::new(0.232, 0.685, -0.03),
    Vec3::new(0.202, 0.666, -0.04),
    Vec3::new(0.353, 0.705, -0.01),
    Vec3::new(0.289, 0.665, -0.02),
    Vec3::new(0.249, 0.635, -0.03),
    Vec3::new(0.221, 0.61, -0.04),
    Vec3::new(0.377, 0.686, -0.01),
    Vec3::new(0.325, 0.639, -0.02),
    Vec3::new(0.294, 0.606, -0.03),
    Vec3::new(0.273, 0.579, -0.04),
    Vec3::new(0.401, 0.674, -0.01),
    Vec3::new(0.367, 0.631, -0.02),
    Vec3::new(0.348, 0.602, -0.03),
    Vec3::new(0.333, 0.575, -0.04),
];

const FINGER_FLUTTER: [Landmark; HAND_LANDMARK_COUNT] = [
    Vec3::new(0.5, 0.78, 0.0),
    Vec3::new(0.456, 0.739, -0.01),
    Vec3::new(0.414, 0.712, -0.02),
    Vec3::new(0.372, 0.695, -0.03),
    Vec3::new(0.333, 0.686, -0.04),
    Vec3::new(0.458, 0.615, -0.01),
    Vec3::new(0.483, 0.55, -0.02),
    Vec3::new(0.52, 0.524, -0.03),
    Vec3::new(0.555, 0.525, -0.04),
    Vec3::new(0.513, 0.616, -0.01),
    Vec3::new(0.525, 0.542, -0.02),
    Vec3::new(0.538, 0.493, -0.03),
    Vec3::new(0.551, 0.457, -0.04),
    Vec3::new(0.561, 0.638, -0.01),
    Vec3::new(0.621, 0.601, -0.02),
    Vec3::new(0.665, 0.603, -0.03),
    Vec3::new(0.693, 0.625, -0.04),
    Vec3::new(0.595, 0.67, -0.01),
    Vec3::new(0.634, 0.632, -0.02),
    Vec3::new(0.661, 0.61, -0.03),
    Vec3::new(0.686, 0.593, -0.04),
];

const CLOSED_LOTUS: [Landmark; HAND_LANDMARK_COUNT] = [
    Vec3::new(0.5, 0.78, 0.0),
    Vec3::new(0.458, 0.737, -0.01),
    Vec3::new(0.455, 0.687, -0.02),
    Vec3::new(0.481, 0.651, -0.03),
    Vec3::new(0.52, 0.641, -0.04),
    Vec3::new(0.468, 0.613, -0.01),
    Vec3::new(0.51, 0.557, -0.02),
    Vec3::new(0.555, 0.553, -0.03),
    Vec3::new(0.58, 0.577, -0.04),
    Vec3::new(0.493, 0.615, -0.01),
    Vec3::new(0.548, 0.564, -0.02),
    Vec3::new(0.598, 0.571, -0.03),
    Vec3::new(0.618, 0.603, -0.04),
    Vec3::new(0.516, 0.626, -0.01),
    Vec3::new(0.573, 0.585, -0.02),
    Vec3::new(0.617, 0.594, -0.03),
    Vec3::new(0.634, 0.624, -0.04),
    Vec3::new(0.535, 0.639, -0.01),
    Vec3::new(0.582, 0.611, -0.02),
    Vec3::new(0.616, 0.619, -0.03),
    Vec3::new(0.632, 0.645, -0.04),
];

//! Core data types for the pose comparison engine.
//!
//! # Type Categories
//!
//! - **Input types**: [`Keypoint`], [`KeypointName`], [`PoseFrame`]
//! - **Output types**: [`ComparisonResult`], [`BodyPartScores`],
//!   [`JointAngleComparison`], [`PositionDifference`]
//!
//! Keypoints carry free-form string names so that any detector output can be
//! fed in unmodified; the canonical 17-entry COCO vocabulary is modeled by
//! [`KeypointName`] and drives ordering, the joint catalog, and the skeleton
//! edge table.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::KEYPOINT_COUNT;

// =============================================================================
// Keypoint Vocabulary
// =============================================================================

/// Canonical body keypoint names following COCO format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum KeypointName {
    /// Nose
    Nose = 0,
    /// Left eye
    LeftEye = 1,
    /// Right eye
    RightEye = 2,
    /// Left ear
    LeftEar = 3,
    /// Right ear
    RightEar = 4,
    /// Left shoulder
    LeftShoulder = 5,
    /// Right shoulder
    RightShoulder = 6,
    /// Left elbow
    LeftElbow = 7,
    /// Right elbow
    RightElbow = 8,
    /// Left wrist
    LeftWrist = 9,
    /// Right wrist
    RightWrist = 10,
    /// Left hip
    LeftHip = 11,
    /// Right hip
    RightHip = 12,
    /// Left knee
    LeftKnee = 13,
    /// Right knee
    RightKnee = 14,
    /// Left ankle
    LeftAnkle = 15,
    /// Right ankle
    RightAnkle = 16,
}

impl KeypointName {
    /// Returns all keypoint names in canonical order.
    #[must_use]
    pub fn all() -> &'static [Self; KEYPOINT_COUNT] {
        &[
            Self::Nose,
            Self::LeftEye,
            Self::RightEye,
            Self::LeftEar,
            Self::RightEar,
            Self::LeftShoulder,
            Self::RightShoulder,
            Self::LeftElbow,
            Self::RightElbow,
            Self::LeftWrist,
            Self::RightWrist,
            Self::LeftHip,
            Self::RightHip,
            Self::LeftKnee,
            Self::RightKnee,
            Self::LeftAnkle,
            Self::RightAnkle,
        ]
    }

    /// Returns the wire name used by pose detectors (`"left_shoulder"`, ...).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }

    /// Parses a wire name back into a canonical keypoint name.
    ///
    /// Returns `None` for names outside the canonical vocabulary; such
    /// keypoints are tolerated in input but never participate in canonical
    /// ordering or the joint catalog.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|kp| kp.as_str() == name)
    }

    /// Returns `true` if this is a face keypoint.
    #[must_use]
    pub fn is_face(&self) -> bool {
        matches!(
            self,
            Self::Nose | Self::LeftEye | Self::RightEye | Self::LeftEar | Self::RightEar
        )
    }

    /// Returns `true` if this is an upper body keypoint.
    #[must_use]
    pub fn is_upper_body(&self) -> bool {
        matches!(
            self,
            Self::LeftShoulder
                | Self::RightShoulder
                | Self::LeftElbow
                | Self::RightElbow
                | Self::LeftWrist
                | Self::RightWrist
        )
    }

    /// Returns `true` if this is a lower body keypoint.
    #[must_use]
    pub fn is_lower_body(&self) -> bool {
        matches!(
            self,
            Self::LeftHip
                | Self::RightHip
                | Self::LeftKnee
                | Self::RightKnee
                | Self::LeftAnkle
                | Self::RightAnkle
        )
    }
}

impl std::fmt::Display for KeypointName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Limb adjacency pairs of the canonical skeleton.
///
/// Exposed as plain data for consumers that visualize poses; the engine
/// itself never draws.
pub const SKELETON_EDGES: [(KeypointName, KeypointName); 16] = [
    (KeypointName::Nose, KeypointName::LeftEye),
    (KeypointName::Nose, KeypointName::RightEye),
    (KeypointName::LeftEye, KeypointName::LeftEar),
    (KeypointName::RightEye, KeypointName::RightEar),
    (KeypointName::LeftShoulder, KeypointName::RightShoulder),
    (KeypointName::LeftShoulder, KeypointName::LeftElbow),
    (KeypointName::LeftElbow, KeypointName::LeftWrist),
    (KeypointName::RightShoulder, KeypointName::RightElbow),
    (KeypointName::RightElbow, KeypointName::RightWrist),
    (KeypointName::LeftShoulder, KeypointName::LeftHip),
    (KeypointName::RightShoulder, KeypointName::RightHip),
    (KeypointName::LeftHip, KeypointName::RightHip),
    (KeypointName::LeftHip, KeypointName::LeftKnee),
    (KeypointName::LeftKnee, KeypointName::LeftAnkle),
    (KeypointName::RightHip, KeypointName::RightKnee),
    (KeypointName::RightKnee, KeypointName::RightAnkle),
];

// =============================================================================
// Input Types
// =============================================================================

/// A single detected body keypoint with position and confidence.
///
/// Coordinates are normalized to [0, 1] relative to the source frame before
/// entering the engine; `score` is the detector's confidence in [0, 1].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Keypoint {
    /// Detector-reported keypoint name
    pub name: String,
    /// X coordinate (normalized 0.0-1.0)
    pub x: f32,
    /// Y coordinate (normalized 0.0-1.0)
    pub y: f32,
    /// Detection confidence in [0, 1]
    pub score: f32,
}

impl Keypoint {
    /// Creates a new keypoint from a raw detector name.
    #[must_use]
    pub fn new(name: impl Into<String>, x: f32, y: f32, score: f32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            score,
        }
    }

    /// Creates a new keypoint from a canonical name.
    #[must_use]
    pub fn named(name: KeypointName, x: f32, y: f32, score: f32) -> Self {
        Self::new(name.as_str(), x, y, score)
    }

    /// Returns `true` if the keypoint meets the given confidence threshold.
    #[must_use]
    pub fn is_confident(&self, min_confidence: f32) -> bool {
        self.score >= min_confidence
    }

    /// Returns the 2D position as a tuple.
    #[must_use]
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Calculates the Euclidean distance to another keypoint.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A single timestamped frame of reference pose data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoseFrame {
    /// Millisecond offset from the start of the reference recording
    pub timestamp_ms: u64,
    /// Keypoints detected in this frame
    pub keypoints: Vec<Keypoint>,
}

impl PoseFrame {
    /// Creates a new pose frame.
    #[must_use]
    pub fn new(timestamp_ms: u64, keypoints: Vec<Keypoint>) -> Self {
        Self {
            timestamp_ms,
            keypoints,
        }
    }
}

/// Builds a name lookup over a keypoint slice.
///
/// Input sets are not guaranteed to carry unique names; when a name occurs
/// more than once, the later occurrence wins. This tie-break is part of the
/// engine's contract and must not change.
pub(crate) fn keypoint_map(keypoints: &[Keypoint]) -> HashMap<&str, &Keypoint> {
    let mut map = HashMap::with_capacity(keypoints.len());
    for keypoint in keypoints {
        map.insert(keypoint.name.as_str(), keypoint);
    }
    map
}

// =============================================================================
// Output Types
// =============================================================================

/// Broad anatomical regions used for the score breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum BodyPart {
    /// Shoulders and upper torso
    UpperBody = 0,
    /// Trunk and hips
    Core = 1,
    /// Hips, knees, and ankles
    LowerBody = 2,
    /// Elbows and wrists
    Arms = 3,
    /// Knees and ankles
    Legs = 4,
}

impl BodyPart {
    /// All body parts, in breakdown order.
    pub const ALL: [Self; 5] = [
        Self::UpperBody,
        Self::Core,
        Self::LowerBody,
        Self::Arms,
        Self::Legs,
    ];
}

/// Per-region aggregate scores, each in [0, 100].
///
/// The `Default` value (all regions at 0) is the breakdown half of the
/// engine's zero-result.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyPartScores {
    /// Shoulders and upper torso
    pub upper_body: f32,
    /// Trunk and hips
    pub core: f32,
    /// Hips, knees, and ankles
    pub lower_body: f32,
    /// Elbows and wrists
    pub arms: f32,
    /// Knees and ankles
    pub legs: f32,
}

impl BodyPartScores {
    /// Returns the score for a single region.
    #[must_use]
    pub fn get(&self, part: BodyPart) -> f32 {
        match part {
            BodyPart::UpperBody => self.upper_body,
            BodyPart::Core => self.core,
            BodyPart::LowerBody => self.lower_body,
            BodyPart::Arms => self.arms,
            BodyPart::Legs => self.legs,
        }
    }
}

/// Angle comparison for a single catalog joint.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointAngleComparison {
    /// Joint identifier (the vertex keypoint)
    pub joint: KeypointName,
    /// Angle measured on the user pose, degrees
    pub user_angle: f32,
    /// Angle measured on the reference pose, degrees
    pub target_angle: f32,
    /// Absolute difference in degrees, within [0, 180]
    pub difference: f32,
}

/// Normalized-space distance between matching user and reference keypoints.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PositionDifference {
    /// Canonical keypoint name
    pub keypoint: KeypointName,
    /// Euclidean distance in torso-normalized coordinates
    pub distance: f32,
}

/// Full output of a single pose comparison.
///
/// `Default` is the exact zero-result returned for empty input: overall
/// score 0, all body-part scores 0, empty angle and position lists.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComparisonResult {
    /// Blended fitness score in [0, 100]
    pub overall_score: f32,
    /// Per-region breakdown
    pub body_part_scores: BodyPartScores,
    /// Surviving joint-angle comparisons, in catalog order
    pub joint_angles: Vec<JointAngleComparison>,
    /// Distances for keypoints confident on both sides
    pub position_differences: Vec<PositionDifference>,
}

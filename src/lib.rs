//! # Pose Coach Core
//!
//! Pose comparison and scoring engine for real-time fitness coaching.
//!
//! A camera feed runs through an external pose detector; this crate scores
//! the detected body keypoints against a pre-recorded reference pose
//! sequence and turns the result into live feedback. The engine is pure
//! computation: no camera, no rendering, no model inference.
//!
//! # Architecture
//!
//! A comparison flows through four stages:
//!
//! 1. **Normalization** ([`normalize_keypoints`]): both keypoint sets are
//!    re-centered and re-scaled on torso geometry so camera distance and
//!    framing cannot bias the score.
//! 2. **Joint analysis** ([`compute_joint_angles`]): a fixed catalog of
//!    eight anatomical joints is measured on both poses and compared
//!    angle by angle.
//! 3. **Composite scoring** ([`compare_poses`]): joint-angle scores and a
//!    whole-body cosine similarity blend into one overall score plus a
//!    per-body-part breakdown.
//! 4. **Smoothing and labeling** ([`ScoreSmoother`], [`ScoreLabel`]): the
//!    score stream is damped with an exponential moving average and mapped
//!    to qualitative feedback.
//!
//! [`ComparisonSession`] packages the stateful loop (reference playback
//! position and smoother state) for hosts that want a ready-made driver;
//! everything underneath stays callable on its own.
//!
//! # Example
//!
//! ```rust
//! use pose_coach_core::{compare_poses, CompareConfig, Keypoint, KeypointName};
//!
//! let pose = vec![
//!     Keypoint::named(KeypointName::LeftShoulder, 0.42, 0.30, 0.95),
//!     Keypoint::named(KeypointName::RightShoulder, 0.58, 0.30, 0.95),
//!     Keypoint::named(KeypointName::LeftHip, 0.44, 0.55, 0.92),
//!     Keypoint::named(KeypointName::RightHip, 0.56, 0.55, 0.92),
//!     Keypoint::named(KeypointName::LeftElbow, 0.38, 0.42, 0.90),
//!     Keypoint::named(KeypointName::LeftKnee, 0.45, 0.75, 0.90),
//! ];
//!
//! // A pose always matches itself
//! let result = compare_poses(&pose, &pose, &CompareConfig::default());
//! assert!(result.overall_score > 99.0);
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: serialization/deserialization for the public data types

#![forbid(unsafe_code)]

pub mod angles;
pub mod compare;
pub mod geometry;
pub mod normalize;
pub mod reference;
pub mod session;
pub mod smoothing;
pub mod types;

pub use angles::{
    angle_difference_to_score, compute_joint_angles, definition_for, JointAngleDefinition,
    JOINT_ANGLE_DEFINITIONS,
};
pub use compare::{compare_poses, CompareConfig, ConfigError};
pub use normalize::normalize_keypoints;
pub use reference::ReferenceSequence;
pub use session::{ComparisonSession, SessionConfig, SessionError, SessionUpdate};
pub use smoothing::{
    exponential_moving_average, Language, ScoreLabel, ScoreSmoother,
};
pub use types::{
    BodyPart, BodyPartScores, ComparisonResult, JointAngleComparison, Keypoint, KeypointName,
    PoseFrame, PositionDifference, SKELETON_EDGES,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of keypoints in the canonical COCO skeleton
pub const KEYPOINT_COUNT: usize = 17;

/// Default confidence threshold below which keypoints are ignored
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.3;

/// Default blend weight of the joint-angle score
pub const DEFAULT_ANGLE_WEIGHT: f32 = 0.6;

/// Default blend weight of the whole-body similarity score
pub const DEFAULT_SIMILARITY_WEIGHT: f32 = 0.4;

/// Default EMA smoothing factor for the displayed score stream
pub const DEFAULT_SMOOTHING_FACTOR: f32 = 0.25;

/// Prelude module for convenient imports.
///
/// ```rust
/// use pose_coach_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::compare::{compare_poses, CompareConfig};
    pub use crate::reference::ReferenceSequence;
    pub use crate::session::{ComparisonSession, SessionConfig, SessionUpdate};
    pub use crate::smoothing::{Language, ScoreLabel, ScoreSmoother};
    pub use crate::types::{
        BodyPartScores, ComparisonResult, JointAngleComparison, Keypoint, KeypointName, PoseFrame,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_valid() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_constants() {
        assert_eq!(KEYPOINT_COUNT, 17);
        assert!(DEFAULT_MIN_CONFIDENCE > 0.0 && DEFAULT_MIN_CONFIDENCE < 1.0);
        assert!((DEFAULT_ANGLE_WEIGHT + DEFAULT_SIMILARITY_WEIGHT - 1.0).abs() < 1e-6);
        assert!((0.01..=1.0).contains(&DEFAULT_SMOOTHING_FACTOR));
    }
}

//! Whole-pose comparison and composite scoring.
//!
//! This is the engine's top-level entry point. A comparison normalizes both
//! keypoint sets, measures the catalog joints, computes a whole-body cosine
//! similarity over canonically ordered coordinates, and blends the two into
//! one overall score with a per-region breakdown.
//!
//! The comparator is a pure function: no I/O, no shared state, safe to call
//! concurrently from any number of threads.

use thiserror::Error;

use crate::angles::{angle_difference_to_score, compute_joint_angles, definition_for};
use crate::geometry::{clamp, cosine_similarity, euclidean_distance};
use crate::normalize::normalize_keypoints;
use crate::types::{
    keypoint_map, BodyPart, BodyPartScores, ComparisonResult, JointAngleComparison, Keypoint,
    KeypointName, PositionDifference,
};
use crate::{DEFAULT_ANGLE_WEIGHT, DEFAULT_MIN_CONFIDENCE, DEFAULT_SIMILARITY_WEIGHT};

/// Tunable comparison parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompareConfig {
    /// Keypoints below this confidence are ignored
    pub min_confidence: f32,
    /// Blend weight of the joint-angle score
    pub angle_weight: f32,
    /// Blend weight of the whole-body similarity score
    pub similarity_weight: f32,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            angle_weight: DEFAULT_ANGLE_WEIGHT,
            similarity_weight: DEFAULT_SIMILARITY_WEIGHT,
        }
    }
}

/// Configuration defects a caller may want to surface.
///
/// [`compare_poses`] itself never fails on these: bad weights are floored
/// and renormalized, and an out-of-range confidence threshold simply
/// filters everything (or nothing). `validate` exists so the hosting
/// application can log misconfiguration instead of silently degrading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Confidence threshold outside the meaningful range
    #[error("confidence threshold {value} outside [0, 1]")]
    ConfidenceOutOfRange {
        /// The offending threshold
        value: f32,
    },
    /// A blend weight that cannot contribute as given
    #[error("{which} weight {value} is negative or non-finite")]
    InvalidWeight {
        /// Which weight field is invalid
        which: &'static str,
        /// The offending weight
        value: f32,
    },
}

impl CompareConfig {
    /// Checks the configuration for values the engine would degrade on.
    ///
    /// # Errors
    ///
    /// Returns the first defect found; see [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_confidence.is_finite() || !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::ConfidenceOutOfRange {
                value: self.min_confidence,
            });
        }
        if !self.angle_weight.is_finite() || self.angle_weight < 0.0 {
            return Err(ConfigError::InvalidWeight {
                which: "angle",
                value: self.angle_weight,
            });
        }
        if !self.similarity_weight.is_finite() || self.similarity_weight < 0.0 {
            return Err(ConfigError::InvalidWeight {
                which: "similarity",
                value: self.similarity_weight,
            });
        }
        Ok(())
    }
}

/// Floors both weights at zero (non-finite values count as zero) and
/// renormalizes them to sum to 1. Falls back to the default split when
/// nothing remains.
fn resolve_weights(angle_weight: f32, similarity_weight: f32) -> (f32, f32) {
    let floor = |weight: f32| if weight.is_finite() { weight.max(0.0) } else { 0.0 };
    let safe_angle = floor(angle_weight);
    let safe_similarity = floor(similarity_weight);
    let total = safe_angle + safe_similarity;

    if total == 0.0 {
        (DEFAULT_ANGLE_WEIGHT, DEFAULT_SIMILARITY_WEIGHT)
    } else {
        (safe_angle / total, safe_similarity / total)
    }
}

/// Reorders a keypoint set into canonical order, padding missing names with
/// a zero-confidence placeholder at the origin.
fn canonical_keypoints(keypoints: &[Keypoint]) -> Vec<Keypoint> {
    let map = keypoint_map(keypoints);
    KeypointName::all()
        .iter()
        .map(|name| match map.get(name.as_str()) {
            Some(kp) => (*kp).clone(),
            None => Keypoint::new(name.as_str(), 0.0, 0.0, 0.0),
        })
        .collect()
}

/// Flattens canonically ordered keypoints into `[x0, y0, x1, y1, ...]`,
/// substituting `(0, 0)` for any keypoint below the confidence threshold.
fn interleaved_vector(keypoints: &[Keypoint], min_confidence: f32) -> Vec<f32> {
    let mut vector = Vec::with_capacity(keypoints.len() * 2);
    for kp in keypoints {
        if kp.is_confident(min_confidence) {
            vector.push(kp.x);
            vector.push(kp.y);
        } else {
            vector.push(0.0);
            vector.push(0.0);
        }
    }
    vector
}

/// Aggregates surviving joint scores into the five body-part regions.
///
/// A joint contributes its weighted score to every region it is tagged
/// with; a region with no surviving joints scores 0.
fn score_body_parts(joint_angles: &[JointAngleComparison]) -> BodyPartScores {
    let mut weighted = [0.0f32; BodyPart::ALL.len()];
    let mut weights = [0.0f32; BodyPart::ALL.len()];

    for comparison in joint_angles {
        let Some(definition) = definition_for(comparison.joint) else {
            continue;
        };
        let joint_score = angle_difference_to_score(comparison.difference);
        for part in definition.body_parts {
            weighted[*part as usize] += joint_score * definition.weight;
            weights[*part as usize] += definition.weight;
        }
    }

    let average = |part: BodyPart| {
        let index = part as usize;
        if weights[index] > 0.0 {
            weighted[index] / weights[index]
        } else {
            0.0
        }
    };

    BodyPartScores {
        upper_body: average(BodyPart::UpperBody),
        core: average(BodyPart::Core),
        lower_body: average(BodyPart::LowerBody),
        arms: average(BodyPart::Arms),
        legs: average(BodyPart::Legs),
    }
}

/// Per-keypoint distances for canonical names confident on both sides.
fn position_differences(
    user: &[Keypoint],
    target: &[Keypoint],
    min_confidence: f32,
) -> Vec<PositionDifference> {
    let user_map = keypoint_map(user);
    let target_map = keypoint_map(target);
    let mut differences = Vec::new();

    for name in KeypointName::all() {
        let (Some(user_kp), Some(target_kp)) =
            (user_map.get(name.as_str()), target_map.get(name.as_str()))
        else {
            continue;
        };
        if !user_kp.is_confident(min_confidence) || !target_kp.is_confident(min_confidence) {
            continue;
        }
        differences.push(PositionDifference {
            keypoint: *name,
            distance: euclidean_distance(user_kp.position(), target_kp.position()),
        });
    }

    differences
}

/// Compares a live user pose against a reference pose.
///
/// Either set being empty yields the zero-result immediately. Otherwise
/// both sets are torso-normalized, catalog joints are measured and scored,
/// a whole-body cosine similarity is taken over the canonical keypoint
/// order, and the two are blended by the (renormalized) configured weights.
///
/// The overall score and every body-part score are clamped to [0, 100].
#[must_use]
pub fn compare_poses(
    user: &[Keypoint],
    target: &[Keypoint],
    config: &CompareConfig,
) -> ComparisonResult {
    if user.is_empty() || target.is_empty() {
        return ComparisonResult::default();
    }

    let normalized_user = normalize_keypoints(user);
    let normalized_target = normalize_keypoints(target);

    let joint_angles =
        compute_joint_angles(&normalized_user, &normalized_target, config.min_confidence);

    let mut weighted_sum = 0.0f32;
    let mut total_weight = 0.0f32;
    for comparison in &joint_angles {
        if let Some(definition) = definition_for(comparison.joint) {
            weighted_sum += angle_difference_to_score(comparison.difference) * definition.weight;
            total_weight += definition.weight;
        }
    }
    let angle_score = if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    };

    let body_part_scores = score_body_parts(&joint_angles);

    let user_vector = interleaved_vector(&canonical_keypoints(&normalized_user), config.min_confidence);
    let target_vector =
        interleaved_vector(&canonical_keypoints(&normalized_target), config.min_confidence);
    let cosine = cosine_similarity(&user_vector, &target_vector);
    let similarity_score = clamp((cosine + 1.0) / 2.0 * 100.0, 0.0, 100.0);

    let (angle_weight, similarity_weight) =
        resolve_weights(config.angle_weight, config.similarity_weight);
    let overall_score = clamp(
        angle_score * angle_weight + similarity_score * similarity_weight,
        0.0,
        100.0,
    );

    ComparisonResult {
        overall_score,
        body_part_scores,
        joint_angles,
        position_differences: position_differences(
            &normalized_user,
            &normalized_target,
            config.min_confidence,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// A full standing body with every keypoint at full confidence.
    fn standing_pose() -> Vec<Keypoint> {
        vec![
            Keypoint::named(KeypointName::Nose, 0.50, 0.10, 1.0),
            Keypoint::named(KeypointName::LeftEye, 0.48, 0.09, 1.0),
            Keypoint::named(KeypointName::RightEye, 0.52, 0.09, 1.0),
            Keypoint::named(KeypointName::LeftEar, 0.46, 0.10, 1.0),
            Keypoint::named(KeypointName::RightEar, 0.54, 0.10, 1.0),
            Keypoint::named(KeypointName::LeftShoulder, 0.42, 0.22, 1.0),
            Keypoint::named(KeypointName::RightShoulder, 0.58, 0.22, 1.0),
            Keypoint::named(KeypointName::LeftElbow, 0.38, 0.36, 1.0),
            Keypoint::named(KeypointName::RightElbow, 0.62, 0.36, 1.0),
            Keypoint::named(KeypointName::LeftWrist, 0.36, 0.50, 1.0),
            Keypoint::named(KeypointName::RightWrist, 0.64, 0.50, 1.0),
            Keypoint::named(KeypointName::LeftHip, 0.45, 0.52, 1.0),
            Keypoint::named(KeypointName::RightHip, 0.55, 0.52, 1.0),
            Keypoint::named(KeypointName::LeftKnee, 0.44, 0.72, 1.0),
            Keypoint::named(KeypointName::RightKnee, 0.56, 0.72, 1.0),
            Keypoint::named(KeypointName::LeftAnkle, 0.44, 0.92, 1.0),
            Keypoint::named(KeypointName::RightAnkle, 0.56, 0.92, 1.0),
        ]
    }

    #[test]
    fn test_empty_inputs_yield_zero_result() {
        let pose = standing_pose();
        let config = CompareConfig::default();

        assert_eq!(compare_poses(&[], &pose, &config), ComparisonResult::default());
        assert_eq!(compare_poses(&pose, &[], &config), ComparisonResult::default());
        assert_eq!(compare_poses(&[], &[], &config), ComparisonResult::default());
    }

    #[test]
    fn test_identity_scores_near_perfect() {
        let pose = standing_pose();
        let result = compare_poses(&pose, &pose, &CompareConfig::default());

        assert!(result.overall_score > 99.5, "got {}", result.overall_score);
        assert_eq!(result.joint_angles.len(), 8);
        for comparison in &result.joint_angles {
            assert_abs_diff_eq!(comparison.difference, 0.0, epsilon = 1e-3);
        }
        for difference in &result.position_differences {
            assert_abs_diff_eq!(difference.distance, 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_scores_stay_in_range() {
        // A deliberately scrambled pose against the reference
        let mut user = standing_pose();
        for (i, kp) in user.iter_mut().enumerate() {
            kp.x = (i as f32 * 0.37) % 1.0;
            kp.y = (i as f32 * 0.61) % 1.0;
        }
        let result = compare_poses(&user, &standing_pose(), &CompareConfig::default());

        assert!((0.0..=100.0).contains(&result.overall_score));
        for part in BodyPart::ALL {
            assert!((0.0..=100.0).contains(&result.body_part_scores.get(part)));
        }
        for comparison in &result.joint_angles {
            assert!((0.0..=180.0).contains(&comparison.difference));
        }
    }

    #[test]
    fn test_zero_weights_fall_back_to_default_split() {
        let mut user = standing_pose();
        user[7].x = 0.55; // perturb the left elbow so the blend matters
        let target = standing_pose();

        let zeroed = compare_poses(
            &user,
            &target,
            &CompareConfig {
                angle_weight: 0.0,
                similarity_weight: 0.0,
                ..CompareConfig::default()
            },
        );
        let explicit = compare_poses(
            &user,
            &target,
            &CompareConfig {
                angle_weight: 0.6,
                similarity_weight: 0.4,
                ..CompareConfig::default()
            },
        );

        assert_abs_diff_eq!(zeroed.overall_score, explicit.overall_score, epsilon = 1e-4);
    }

    #[test]
    fn test_weight_renormalization_is_scale_free() {
        let mut user = standing_pose();
        user[13].y = 0.60; // bend the left knee
        let target = standing_pose();

        let small = compare_poses(
            &user,
            &target,
            &CompareConfig {
                angle_weight: 0.3,
                similarity_weight: 0.2,
                ..CompareConfig::default()
            },
        );
        let large = compare_poses(
            &user,
            &target,
            &CompareConfig {
                angle_weight: 3.0,
                similarity_weight: 2.0,
                ..CompareConfig::default()
            },
        );

        assert_abs_diff_eq!(small.overall_score, large.overall_score, epsilon = 1e-4);
    }

    #[test]
    fn test_non_finite_weight_degrades_to_other_term() {
        let mut user = standing_pose();
        user[9].y = 0.40; // raise the left wrist so angle and similarity diverge
        let target = standing_pose();

        let poisoned = compare_poses(
            &user,
            &target,
            &CompareConfig {
                angle_weight: f32::NAN,
                similarity_weight: 1.0,
                ..CompareConfig::default()
            },
        );
        let similarity_only = compare_poses(
            &user,
            &target,
            &CompareConfig {
                angle_weight: 0.0,
                similarity_weight: 1.0,
                ..CompareConfig::default()
            },
        );

        assert!(poisoned.overall_score.is_finite());
        assert_abs_diff_eq!(
            poisoned.overall_score,
            similarity_only.overall_score,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_low_confidence_keypoints_excluded_from_position_differences() {
        let user = standing_pose();
        let mut target = standing_pose();
        target[0].score = 0.1; // nose uncertain on the reference side

        let result = compare_poses(&user, &target, &CompareConfig::default());
        assert!(result
            .position_differences
            .iter()
            .all(|difference| difference.keypoint != KeypointName::Nose));
        assert_eq!(result.position_differences.len(), 16);
    }

    #[test]
    fn test_hip_joint_feeds_core_and_lower_body() {
        // Only the left hip chain is confident; its score must appear in
        // core and lower body and nowhere else.
        let chain = [
            KeypointName::LeftShoulder,
            KeypointName::LeftHip,
            KeypointName::LeftKnee,
        ];
        let pose: Vec<Keypoint> = standing_pose()
            .into_iter()
            .map(|mut kp| {
                let keep = KeypointName::from_name(&kp.name)
                    .is_some_and(|name| chain.contains(&name));
                if !keep {
                    kp.score = 0.0;
                }
                kp
            })
            .collect();

        let result = compare_poses(&pose, &pose, &CompareConfig::default());
        assert_eq!(result.joint_angles.len(), 1);
        assert_eq!(result.joint_angles[0].joint, KeypointName::LeftHip);

        assert!(result.body_part_scores.core > 99.0);
        assert!(result.body_part_scores.lower_body > 99.0);
        assert_eq!(result.body_part_scores.upper_body, 0.0);
        assert_eq!(result.body_part_scores.arms, 0.0);
        assert_eq!(result.body_part_scores.legs, 0.0);
    }

    #[test]
    fn test_validate_flags_defects() {
        assert!(CompareConfig::default().validate().is_ok());

        let bad_confidence = CompareConfig {
            min_confidence: 1.5,
            ..CompareConfig::default()
        };
        assert!(matches!(
            bad_confidence.validate(),
            Err(ConfigError::ConfidenceOutOfRange { .. })
        ));

        let bad_weight = CompareConfig {
            angle_weight: -0.2,
            ..CompareConfig::default()
        };
        assert!(matches!(
            bad_weight.validate(),
            Err(ConfigError::InvalidWeight { which: "angle", .. })
        ));
    }
}

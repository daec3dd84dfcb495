//! Anatomical joint-angle extraction and comparison.
//!
//! A fixed catalog of eight joints (shoulders, elbows, hips, knees) defines
//! which keypoint triples form meaningful angles. Each entry carries a
//! relative weight and the body-part regions it reports into. The catalog is
//! process-wide constant data and is never mutated at runtime.

use crate::geometry::{angle_degrees, clamp};
use crate::types::{keypoint_map, BodyPart, JointAngleComparison, Keypoint, KeypointName};

/// One catalog entry: the angle at vertex `b` formed by rays toward `a` and
/// `c`, identified by the vertex keypoint.
#[derive(Debug, Clone, Copy)]
pub struct JointAngleDefinition {
    /// Joint identifier (always the vertex keypoint)
    pub joint: KeypointName,
    /// First endpoint
    pub a: KeypointName,
    /// Vertex
    pub b: KeypointName,
    /// Second endpoint
    pub c: KeypointName,
    /// Relative weight in aggregate scores, always positive
    pub weight: f32,
    /// Body-part regions this joint reports into
    pub body_parts: &'static [BodyPart],
}

/// The fixed joint catalog, in output order.
pub const JOINT_ANGLE_DEFINITIONS: [JointAngleDefinition; 8] = [
    JointAngleDefinition {
        joint: KeypointName::LeftShoulder,
        a: KeypointName::LeftHip,
        b: KeypointName::LeftShoulder,
        c: KeypointName::LeftElbow,
        weight: 1.2,
        body_parts: &[BodyPart::UpperBody],
    },
    JointAngleDefinition {
        joint: KeypointName::RightShoulder,
        a: KeypointName::RightHip,
        b: KeypointName::RightShoulder,
        c: KeypointName::RightElbow,
        weight: 1.2,
        body_parts: &[BodyPart::UpperBody],
    },
    JointAngleDefinition {
        joint: KeypointName::LeftElbow,
        a: KeypointName::LeftShoulder,
        b: KeypointName::LeftElbow,
        c: KeypointName::LeftWrist,
        weight: 1.0,
        body_parts: &[BodyPart::Arms],
    },
    JointAngleDefinition {
        joint: KeypointName::RightElbow,
        a: KeypointName::RightShoulder,
        b: KeypointName::RightElbow,
        c: KeypointName::RightWrist,
        weight: 1.0,
        body_parts: &[BodyPart::Arms],
    },
    JointAngleDefinition {
        joint: KeypointName::LeftHip,
        a: KeypointName::LeftShoulder,
        b: KeypointName::LeftHip,
        c: KeypointName::LeftKnee,
        weight: 1.4,
        body_parts: &[BodyPart::Core, BodyPart::LowerBody],
    },
    JointAngleDefinition {
        joint: KeypointName::RightHip,
        a: KeypointName::RightShoulder,
        b: KeypointName::RightHip,
        c: KeypointName::RightKnee,
        weight: 1.4,
        body_parts: &[BodyPart::Core, BodyPart::LowerBody],
    },
    JointAngleDefinition {
        joint: KeypointName::LeftKnee,
        a: KeypointName::LeftHip,
        b: KeypointName::LeftKnee,
        c: KeypointName::LeftAnkle,
        weight: 1.1,
        body_parts: &[BodyPart::Legs, BodyPart::LowerBody],
    },
    JointAngleDefinition {
        joint: KeypointName::RightKnee,
        a: KeypointName::RightHip,
        b: KeypointName::RightKnee,
        c: KeypointName::RightAnkle,
        weight: 1.1,
        body_parts: &[BodyPart::Legs, BodyPart::LowerBody],
    },
];

/// Looks up the catalog entry for a joint identifier.
#[must_use]
pub fn definition_for(joint: KeypointName) -> Option<&'static JointAngleDefinition> {
    JOINT_ANGLE_DEFINITIONS
        .iter()
        .find(|definition| definition.joint == joint)
}

fn confident<'a>(
    map: &std::collections::HashMap<&str, &'a Keypoint>,
    name: KeypointName,
    min_confidence: f32,
) -> Option<&'a Keypoint> {
    map.get(name.as_str())
        .copied()
        .filter(|kp| kp.is_confident(min_confidence))
}

/// Computes user and reference angles for every catalog joint visible on
/// both sides.
///
/// A joint survives only when all three of its keypoints meet
/// `min_confidence` in the user set AND in the target set; anything else is
/// omitted from the output rather than reported as an error. Output order
/// follows the catalog, not the input sets.
#[must_use]
pub fn compute_joint_angles(
    user: &[Keypoint],
    target: &[Keypoint],
    min_confidence: f32,
) -> Vec<JointAngleComparison> {
    let user_map = keypoint_map(user);
    let target_map = keypoint_map(target);
    let mut comparisons = Vec::with_capacity(JOINT_ANGLE_DEFINITIONS.len());

    for definition in &JOINT_ANGLE_DEFINITIONS {
        let user_points = (
            confident(&user_map, definition.a, min_confidence),
            confident(&user_map, definition.b, min_confidence),
            confident(&user_map, definition.c, min_confidence),
        );
        let target_points = (
            confident(&target_map, definition.a, min_confidence),
            confident(&target_map, definition.b, min_confidence),
            confident(&target_map, definition.c, min_confidence),
        );

        let ((Some(ua), Some(ub), Some(uc)), (Some(ta), Some(tb), Some(tc))) =
            (user_points, target_points)
        else {
            continue;
        };

        let user_angle = angle_degrees(ua.position(), ub.position(), uc.position());
        let target_angle = angle_degrees(ta.position(), tb.position(), tc.position());

        comparisons.push(JointAngleComparison {
            joint: definition.joint,
            user_angle,
            target_angle,
            difference: (user_angle - target_angle).abs(),
        });
    }

    comparisons
}

/// Maps an angle difference in degrees to a per-joint score.
///
/// Linear falloff from 100 at a perfect match to 0 at 90 degrees or more of
/// discrepancy.
#[must_use]
pub fn angle_difference_to_score(difference: f32) -> f32 {
    clamp(100.0 - (difference / 90.0) * 100.0, 0.0, 100.0)
}

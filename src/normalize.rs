//! Torso-anchored keypoint normalization.
//!
//! Scoring must not depend on where the subject stands in the frame or how
//! far they are from the camera. Normalization re-centers a keypoint set on
//! the torso and re-scales by torso length so that the same pose produces
//! the same coordinates regardless of framing. Both the user's set and the
//! reference frame's set go through this step independently before any
//! comparison.

use crate::geometry::euclidean_distance;
use crate::types::{keypoint_map, Keypoint, KeypointName};

/// Normalizes a keypoint set to torso-relative, torso-scaled coordinates.
///
/// Requires all four torso landmarks (left/right shoulder, left/right hip).
/// If any is missing, or if the torso length degenerates to zero, the input
/// is returned unchanged; downstream scoring still runs on the raw
/// coordinates rather than failing the whole comparison.
///
/// Names and confidence scores are preserved on the output.
#[must_use]
pub fn normalize_keypoints(keypoints: &[Keypoint]) -> Vec<Keypoint> {
    let map = keypoint_map(keypoints);

    let (Some(left_shoulder), Some(right_shoulder), Some(left_hip), Some(right_hip)) = (
        map.get(KeypointName::LeftShoulder.as_str()),
        map.get(KeypointName::RightShoulder.as_str()),
        map.get(KeypointName::LeftHip.as_str()),
        map.get(KeypointName::RightHip.as_str()),
    ) else {
        return keypoints.to_vec();
    };

    let center_x = (left_shoulder.x + right_shoulder.x + left_hip.x + right_hip.x) / 4.0;
    let center_y = (left_shoulder.y + right_shoulder.y + left_hip.y + right_hip.y) / 4.0;

    let shoulder_mid = (
        (left_shoulder.x + right_shoulder.x) / 2.0,
        (left_shoulder.y + right_shoulder.y) / 2.0,
    );
    let hip_mid = (
        (left_hip.x + right_hip.x) / 2.0,
        (left_hip.y + right_hip.y) / 2.0,
    );
    let scale = euclidean_distance(shoulder_mid, hip_mid);

    if scale == 0.0 {
        return keypoints.to_vec();
    }

    keypoints
        .iter()
        .map(|kp| Keypoint {
            name: kp.name.clone(),
            x: (kp.x - center_x) / scale,
            y: (kp.y - center_y) / scale,
            score: kp.score,
        })
        .collect()
}

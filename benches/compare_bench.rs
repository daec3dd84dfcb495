//! Benchmarks for the pose comparison hot path.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pose_coach_core::{
    compare_poses, compute_joint_angles, normalize_keypoints, CompareConfig, Keypoint,
    KeypointName,
};

/// Create a realistic full-body detection with slight per-keypoint jitter.
fn create_pose(seed: u32) -> Vec<Keypoint> {
    KeypointName::all()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let jitter = ((seed.wrapping_mul(31).wrapping_add(i as u32 * 17)) % 100) as f32
                / 100.0
                * 0.02;
            let column = if name.as_str().starts_with("left") {
                0.42
            } else {
                0.58
            };
            let row = 0.1 + (i as f32 / 16.0) * 0.8;
            Keypoint::named(*name, column + jitter, row + jitter, 0.9)
        })
        .collect()
}

fn bench_compare_poses(c: &mut Criterion) {
    let user = create_pose(7);
    let target = create_pose(42);
    let config = CompareConfig::default();

    c.bench_function("compare_poses/full_body", |b| {
        b.iter(|| compare_poses(black_box(&user), black_box(&target), &config));
    });
}

fn bench_joint_angles(c: &mut Criterion) {
    let user = create_pose(7);
    let target = create_pose(42);

    c.bench_function("compute_joint_angles/full_body", |b| {
        b.iter(|| compute_joint_angles(black_box(&user), black_box(&target), 0.3));
    });
}

fn bench_normalize(c: &mut Criterion) {
    let pose = create_pose(7);

    c.bench_function("normalize_keypoints/full_body", |b| {
        b.iter(|| normalize_keypoints(black_box(&pose)));
    });
}

criterion_group!(
    benches,
    bench_compare_poses,
    bench_joint_angles,
    bench_normalize
);
criterion_main!(benches);

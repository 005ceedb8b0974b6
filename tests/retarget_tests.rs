//! Retargeting Tests
//!
//! Tests for:
//! - Track filtering (unmapped bones, bones the target lacks, scale tracks)
//! - Rest-frame conversion of rotation samples
//! - Hips-height scaling of translation samples
//! - VRM 0.x sign correction
//! - Timestamps and duration carried over unchanged

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

use vrm_pet::animation::{
    AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData, TrackMeta,
};
use vrm_pet::avatar::{ExpressionManager, HumanoidBone, MetaVersion, VrmAvatar};
use vrm_pet::errors::PetError;
use vrm_pet::retarget::{BoneNameMap, retarget};
use vrm_pet::scene::{Bone, Scene, Skeleton, Transform};

const EPSILON: f32 = 1e-5;

// ============================================================================
// Fixtures
// ============================================================================

fn rotation_track(node: &str, times: Vec<f32>, values: Vec<Quat>) -> Track {
    Track {
        meta: TrackMeta::new(node, TargetPath::Rotation),
        data: TrackData::Quaternion(KeyframeTrack::new(times, values, InterpolationMode::Linear)),
    }
}

fn translation_track(node: &str, times: Vec<f32>, values: Vec<Vec3>) -> Track {
    Track {
        meta: TrackMeta::new(node, TargetPath::Translation),
        data: TrackData::Vector3(KeyframeTrack::new(times, values, InterpolationMode::Linear)),
    }
}

/// Two-bone motion rig: hips at `hips_height`, spine above it.
fn motion_skeleton(hips: &str, spine: &str, hips_height: f32) -> Skeleton {
    Skeleton::new(
        "motion",
        vec![
            Bone::new(hips, None).with_position(Vec3::new(0.0, hips_height, 0.0)),
            Bone::new(spine, Some(0)).with_position(Vec3::new(0.0, 0.1, 0.0)),
        ],
    )
}

/// Avatar with `hips` and `spine` humanoid bones, identity rest rotations.
fn target_avatar(meta_version: MetaVersion, hips_height: f32) -> VrmAvatar {
    let mut scene = Scene::new();
    let root = scene.add_named("vrm_root", Transform::new(), None);
    let hips = scene.add_named(
        "hips",
        Transform::from_trs(Vec3::new(0.0, hips_height, 0.0), Quat::IDENTITY, Vec3::ONE),
        Some(root),
    );
    let spine = scene.add_named(
        "spine",
        Transform::from_trs(Vec3::new(0.0, 0.1, 0.0), Quat::IDENTITY, Vec3::ONE),
        Some(hips),
    );

    let mut humanoid = FxHashMap::default();
    humanoid.insert(HumanoidBone::Hips, hips);
    humanoid.insert(HumanoidBone::Spine, spine);

    VrmAvatar::new(scene, root, humanoid, meta_version, ExpressionManager::new())
}

fn quaternion_values(track: &Track) -> &[Quat] {
    match &track.data {
        TrackData::Quaternion(t) => &t.values,
        TrackData::Vector3(_) => panic!("expected a rotation track"),
    }
}

fn vector_values(track: &Track) -> &[Vec3] {
    match &track.data {
        TrackData::Vector3(t) => &t.values,
        TrackData::Quaternion(_) => panic!("expected a translation track"),
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn identity_rotation_passes_through_to_target_bone() {
    let clip = AnimationClip::new(
        "idle".to_string(),
        vec![rotation_track("Hips", vec![0.0, 1.0], vec![Quat::IDENTITY, Quat::IDENTITY])],
    );
    let skeleton = motion_skeleton("Hips", "Spine", 1.0);
    let bone_map = BoneNameMap::from_pairs([("Hips", HumanoidBone::Hips)]);
    let avatar = target_avatar(MetaVersion::V1, 1.0);

    let result = retarget(&clip, &skeleton, &bone_map, &avatar).unwrap();

    assert_eq!(result.tracks.len(), 1);
    let track = &result.tracks[0];
    assert_eq!(track.name(), "hips.quaternion");
    assert_eq!(track.data.times(), &[0.0, 1.0]);
    assert_eq!(quaternion_values(track), &[Quat::IDENTITY, Quat::IDENTITY]);
}

#[test]
fn unmapped_bone_produces_no_track() {
    let clip = AnimationClip::new(
        "walk".to_string(),
        vec![
            rotation_track("Hips", vec![0.0, 1.0], vec![Quat::IDENTITY; 2]),
            rotation_track("LeftToeBase", vec![0.0, 1.0], vec![Quat::IDENTITY; 2]),
        ],
    );
    let skeleton = Skeleton::new(
        "motion",
        vec![
            Bone::new("Hips", None).with_position(Vec3::Y),
            Bone::new("LeftToeBase", Some(0)),
        ],
    );
    let bone_map = BoneNameMap::from_pairs([("Hips", HumanoidBone::Hips)]);
    let avatar = target_avatar(MetaVersion::V1, 1.0);

    let result = retarget(&clip, &skeleton, &bone_map, &avatar).unwrap();

    assert_eq!(result.tracks.len(), 1);
    assert!(result.tracks.iter().all(|t| t.meta.node_name == "hips"));
}

#[test]
fn missing_reference_bone_is_an_error() {
    let clip = AnimationClip::new(
        "walk".to_string(),
        vec![rotation_track("Pelvis", vec![0.0, 1.0], vec![Quat::IDENTITY; 2])],
    );
    let skeleton = motion_skeleton("Pelvis", "Spine", 1.0);
    let avatar = target_avatar(MetaVersion::V1, 1.0);

    let err = retarget(&clip, &skeleton, &BoneNameMap::mixamo(), &avatar).unwrap_err();

    match err {
        PetError::MissingReferenceBone { tried } => {
            assert_eq!(tried, vec!["mixamorigHips".to_string(), "Hips".to_string()]);
        }
        other => panic!("expected MissingReferenceBone, got {other:?}"),
    }
}

// ============================================================================
// Track filtering
// ============================================================================

#[test]
fn bone_missing_on_target_is_skipped() {
    let clip = AnimationClip::new(
        "wave".to_string(),
        vec![
            rotation_track("mixamorigHips", vec![0.0, 1.0], vec![Quat::IDENTITY; 2]),
            rotation_track("mixamorigLeftArm", vec![0.0, 1.0], vec![Quat::IDENTITY; 2]),
        ],
    );
    let skeleton = Skeleton::new(
        "motion",
        vec![
            Bone::new("mixamorigHips", None).with_position(Vec3::Y),
            Bone::new("mixamorigLeftArm", Some(0)),
        ],
    );
    let avatar = target_avatar(MetaVersion::V1, 1.0);

    let result = retarget(&clip, &skeleton, &BoneNameMap::mixamo(), &avatar).unwrap();

    assert_eq!(result.tracks.len(), 1);
    assert_eq!(result.tracks[0].name(), "hips.quaternion");
}

#[test]
fn scale_tracks_are_dropped() {
    let clip = AnimationClip::new(
        "grow".to_string(),
        vec![Track {
            meta: TrackMeta::new("Hips", TargetPath::Scale),
            data: TrackData::Vector3(KeyframeTrack::new(
                vec![0.0, 1.0],
                vec![Vec3::ONE, Vec3::splat(2.0)],
                InterpolationMode::Linear,
            )),
        }],
    );
    let skeleton = motion_skeleton("Hips", "Spine", 1.0);
    let avatar = target_avatar(MetaVersion::V1, 1.0);

    let result = retarget(&clip, &skeleton, &BoneNameMap::mixamo(), &avatar).unwrap();
    assert!(result.tracks.is_empty());
}

#[test]
fn output_never_has_more_tracks_than_input() {
    let clip = AnimationClip::new(
        "mixed".to_string(),
        vec![
            rotation_track("Hips", vec![0.0, 1.0], vec![Quat::IDENTITY; 2]),
            translation_track("Hips", vec![0.0, 1.0], vec![Vec3::ZERO; 2]),
            rotation_track("Spine", vec![0.0, 1.0], vec![Quat::IDENTITY; 2]),
            rotation_track("Head", vec![0.0, 1.0], vec![Quat::IDENTITY; 2]),
            rotation_track("Tail", vec![0.0, 1.0], vec![Quat::IDENTITY; 2]),
        ],
    );
    let skeleton = motion_skeleton("Hips", "Spine", 1.0);
    let avatar = target_avatar(MetaVersion::V1, 1.0);

    let result = retarget(&clip, &skeleton, &BoneNameMap::mixamo(), &avatar).unwrap();

    assert!(result.tracks.len() <= clip.tracks.len());
    let names: Vec<String> = result.tracks.iter().map(Track::name).collect();
    assert_eq!(names, vec!["hips.quaternion", "hips.position", "spine.quaternion"]);
}

// ============================================================================
// Value transforms
// ============================================================================

#[test]
fn source_rest_pose_maps_to_identity() {
    let hips_rest = Quat::from_rotation_y(0.3);
    let spine_rest = Quat::from_rotation_x(0.5);
    let skeleton = Skeleton::new(
        "motion",
        vec![
            Bone::new("Hips", None)
                .with_position(Vec3::Y)
                .with_rotation(hips_rest),
            Bone::new("Spine", Some(0)).with_rotation(spine_rest),
        ],
    );
    let clip = AnimationClip::new(
        "rest".to_string(),
        vec![rotation_track("Spine", vec![0.0], vec![spine_rest])],
    );
    let avatar = target_avatar(MetaVersion::V1, 1.0);

    let result = retarget(&clip, &skeleton, &BoneNameMap::mixamo(), &avatar).unwrap();

    let q = quaternion_values(&result.tracks[0])[0];
    assert!(q.angle_between(Quat::IDENTITY) < 1e-4, "got {q}");
}

#[test]
fn rotation_is_conjugated_by_parent_and_bone_rest() {
    let hips_rest = Quat::from_rotation_z(FRAC_PI_2);
    let skeleton = Skeleton::new(
        "motion",
        vec![
            Bone::new("Hips", None)
                .with_position(Vec3::Y)
                .with_rotation(hips_rest),
            Bone::new("Spine", Some(0)),
        ],
    );
    let sample = Quat::from_rotation_x(0.4);
    let clip = AnimationClip::new(
        "bend".to_string(),
        vec![rotation_track("Spine", vec![0.0], vec![sample])],
    );
    let avatar = target_avatar(MetaVersion::V1, 1.0);

    let result = retarget(&clip, &skeleton, &BoneNameMap::mixamo(), &avatar).unwrap();

    // Spine rest world rotation equals the hips rest rotation here
    let expected = hips_rest * sample * hips_rest.inverse();
    let q = quaternion_values(&result.tracks[0])[0];
    assert!(q.angle_between(expected) < 1e-4, "got {q}, expected {expected}");
}

#[test]
fn translation_scales_with_hips_height_ratio() {
    let values = vec![Vec3::new(0.1, 1.0, -0.2), Vec3::new(0.3, 1.1, 0.4)];
    let clip = AnimationClip::new(
        "walk".to_string(),
        vec![translation_track("Hips", vec![0.0, 1.0], values.clone())],
    );
    let skeleton = motion_skeleton("Hips", "Spine", 1.0);
    let avatar = target_avatar(MetaVersion::V1, 2.0);

    let result = retarget(&clip, &skeleton, &BoneNameMap::mixamo(), &avatar).unwrap();

    let out = vector_values(&result.tracks[0]);
    for (before, after) in values.iter().zip(out) {
        assert!(after.distance(*before * 2.0) < EPSILON, "{after} != 2 * {before}");
    }
}

#[test]
fn mixamo_hips_name_wins_over_plain_hips() {
    let values = vec![Vec3::new(0.1, 1.0, -0.2), Vec3::new(0.3, 1.1, 0.4)];
    let clip = AnimationClip::new(
        "walk".to_string(),
        vec![translation_track("mixamorigHips", vec![0.0, 1.0], values.clone())],
    );
    let skeleton = Skeleton::new(
        "motion",
        vec![
            Bone::new("mixamorigHips", None).with_position(Vec3::new(0.0, 1.0, 0.0)),
            Bone::new("Hips", None).with_position(Vec3::new(0.0, 4.0, 0.0)),
        ],
    );
    let avatar = target_avatar(MetaVersion::V1, 2.0);

    let result = retarget(&clip, &skeleton, &BoneNameMap::mixamo(), &avatar).unwrap();

    // 2.0 / 1.0 from mixamorigHips, not 2.0 / 4.0 from Hips
    let out = vector_values(&result.tracks[0]);
    for (before, after) in values.iter().zip(out) {
        assert!(after.distance(*before * 2.0) < EPSILON, "{after} != 2 * {before}");
    }
}

#[test]
fn zero_motion_hips_height_leaves_translation_unscaled() {
    let values = vec![Vec3::new(0.5, 0.5, 0.5)];
    let clip = AnimationClip::new(
        "slide".to_string(),
        vec![translation_track("Hips", vec![0.0], values.clone())],
    );
    let skeleton = motion_skeleton("Hips", "Spine", 0.0);
    let avatar = target_avatar(MetaVersion::V1, 1.0);

    let result = retarget(&clip, &skeleton, &BoneNameMap::mixamo(), &avatar).unwrap();
    assert_eq!(vector_values(&result.tracks[0]), values.as_slice());
}

#[test]
fn current_format_leaves_values_uncorrected() {
    let sample = Quat::from_xyzw(0.1, 0.2, 0.3, 0.9).normalize();
    let clip = AnimationClip::new(
        "turn".to_string(),
        vec![
            rotation_track("Hips", vec![0.0], vec![sample]),
            translation_track("Hips", vec![0.0], vec![Vec3::new(1.0, 2.0, 3.0)]),
        ],
    );
    let skeleton = motion_skeleton("Hips", "Spine", 1.0);
    let avatar = target_avatar(MetaVersion::V1, 1.0);

    let result = retarget(&clip, &skeleton, &BoneNameMap::mixamo(), &avatar).unwrap();

    assert!(quaternion_values(&result.tracks[0])[0].abs_diff_eq(sample, EPSILON));
    assert!(vector_values(&result.tracks[1])[0].abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), EPSILON));
}

#[test]
fn legacy_format_negates_horizontal_components() {
    let sample = Quat::from_xyzw(0.1, 0.2, 0.3, 0.9).normalize();
    let clip = AnimationClip::new(
        "turn".to_string(),
        vec![
            rotation_track("Hips", vec![0.0], vec![sample]),
            translation_track("Hips", vec![0.0], vec![Vec3::new(1.0, 2.0, 3.0)]),
        ],
    );
    let skeleton = motion_skeleton("Hips", "Spine", 1.0);
    let avatar = target_avatar(MetaVersion::V0, 2.0);

    let result = retarget(&clip, &skeleton, &BoneNameMap::mixamo(), &avatar).unwrap();

    let q = quaternion_values(&result.tracks[0])[0];
    let expected = Quat::from_xyzw(-sample.x, sample.y, -sample.z, sample.w);
    assert!(q.abs_diff_eq(expected, EPSILON), "got {q}");

    // Scaled first, then flipped
    let v = vector_values(&result.tracks[1])[0];
    assert!(v.abs_diff_eq(Vec3::new(-2.0, 4.0, -6.0), EPSILON), "got {v}");
}

// ============================================================================
// Timing
// ============================================================================

#[test]
fn timestamps_and_duration_are_unchanged() {
    let times = vec![0.0, 0.033, 0.5, 1.25];
    let clip = AnimationClip::with_duration(
        "long".to_string(),
        4.0,
        vec![rotation_track(
            "mixamorigHips",
            times.clone(),
            vec![Quat::from_rotation_y(0.1); 4],
        )],
    );
    let skeleton = motion_skeleton("mixamorigHips", "mixamorigSpine", 1.0);
    let avatar = target_avatar(MetaVersion::V1, 1.0);

    let result = retarget(&clip, &skeleton, &BoneNameMap::mixamo(), &avatar).unwrap();

    assert_eq!(result.name, "long");
    assert_eq!(result.duration, 4.0);
    assert_eq!(result.tracks[0].data.times(), times.as_slice());
}

#[test]
fn empty_clip_is_not_an_error() {
    let clip = AnimationClip::new("nothing".to_string(), vec![]);
    let skeleton = motion_skeleton("Hips", "Spine", 1.0);
    let avatar = target_avatar(MetaVersion::V1, 1.0);

    let result = retarget(&clip, &skeleton, &BoneNameMap::mixamo(), &avatar).unwrap();
    assert!(result.tracks.is_empty());
}

//! Animation Retargeting
//!
//! Converts a clip authored for a Mixamo-style skeleton into a clip that
//! drives a VRM humanoid rig.
//!
//! For each mapped bone, rotation samples are re-expressed in the target's
//! normalized rest frame:
//!
//! ```text
//! q' = parent_rest_world * q * inverse(bone_rest_world)
//! ```
//!
//! Translation samples are scaled by the ratio of the target's hips height to
//! the motion's hips height, so a short avatar does not inherit a tall
//! actor's hip travel. VRM 0.x targets additionally get a fixed axis sign flip.
//!
//! Tracks whose bone is not in the [`BoneNameMap`], or that the target rig or
//! the motion skeleton cannot resolve, are left out of the result. Only a
//! missing hips bone in the motion skeleton is an error.

pub mod bone_map;

pub use bone_map::BoneNameMap;

use glam::{Quat, Vec3};

use crate::animation::{AnimationClip, TargetPath, Track, TrackData, TrackMeta};
use crate::avatar::{HumanoidBone, HumanoidRig};
use crate::errors::{PetError, Result};
use crate::scene::Skeleton;

/// Names tried, in order, for the motion skeleton's hips bone.
pub const REFERENCE_BONE_NAMES: [&str; 2] = ["mixamorigHips", "Hips"];

/// Retargets `clip`, authored for `skeleton`, onto `target`.
///
/// The result keeps the source clip's name, duration, timestamps and
/// interpolation modes. Only rotation and translation tracks are carried
/// over.
pub fn retarget<R>(
    clip: &AnimationClip,
    skeleton: &Skeleton,
    bone_map: &BoneNameMap,
    target: &R,
) -> Result<AnimationClip>
where
    R: HumanoidRig + ?Sized,
{
    let reference = REFERENCE_BONE_NAMES
        .iter()
        .find_map(|name| skeleton.bone_by_name(name))
        .ok_or_else(|| PetError::MissingReferenceBone {
            tried: REFERENCE_BONE_NAMES.iter().map(ToString::to_string).collect(),
        })?;

    let position_scale = hips_position_scale(reference.position.y, target);
    let legacy = target.meta_version().is_legacy();

    let mut tracks = Vec::with_capacity(clip.tracks.len());

    for track in &clip.tracks {
        let rig_name = track.meta.node_name.as_str();

        let Some(bone) = bone_map.get(rig_name) else {
            log::trace!("Skipping track '{}': bone not in map", track.name());
            continue;
        };
        let Some(target_node_name) = target.bone_node_name(bone) else {
            log::trace!("Skipping track '{}': target has no '{bone}' node", track.name());
            continue;
        };
        let Some(rig_index) = skeleton.find_bone(rig_name) else {
            log::trace!("Skipping track '{}': bone not in motion skeleton", track.name());
            continue;
        };

        let rest_rotation_inverse = skeleton
            .world_rotation(rig_index)
            .unwrap_or(Quat::IDENTITY)
            .inverse();
        let parent_rest_world_rotation = skeleton
            .parent_of(rig_index)
            .and_then(|p| skeleton.world_rotation(p))
            .unwrap_or(Quat::IDENTITY);

        let data = match (&track.data, track.meta.target) {
            (TrackData::Quaternion(keys), TargetPath::Rotation) => {
                TrackData::Quaternion(keys.map_values(|&q| {
                    let q = parent_rest_world_rotation * q * rest_rotation_inverse;
                    if legacy { flip_legacy_rotation(q) } else { q }
                }))
            }
            (TrackData::Vector3(keys), TargetPath::Translation) => {
                TrackData::Vector3(keys.map_values(|&v| {
                    let v = v * position_scale;
                    if legacy { flip_legacy_position(v) } else { v }
                }))
            }
            (_, target_path) => {
                log::trace!(
                    "Skipping track '{}': {target_path} tracks are not retargeted",
                    track.name()
                );
                continue;
            }
        };

        tracks.push(Track {
            meta: TrackMeta::new(target_node_name, track.meta.target),
            data,
        });
    }

    log::debug!(
        "Retargeted clip '{}': {} of {} tracks kept (hips scale {position_scale})",
        clip.name,
        tracks.len(),
        clip.tracks.len()
    );

    Ok(AnimationClip::with_duration(
        clip.name.clone(),
        clip.duration,
        tracks,
    ))
}

/// Ratio of the target's rest hips height to the motion's rest hips height.
fn hips_position_scale<R>(motion_hips_height: f32, target: &R) -> f32
where
    R: HumanoidRig + ?Sized,
{
    let Some(target_hips) = target.rest_position(HumanoidBone::Hips) else {
        log::warn!("Target rig has no hips rest position, leaving translation unscaled");
        return 1.0;
    };

    let scale = target_hips.y / motion_hips_height;
    if scale.is_finite() {
        scale
    } else {
        log::warn!("Motion hips height is {motion_hips_height}, leaving translation unscaled");
        1.0
    }
}

/// VRM 0.x correction for rotations: x and z negated.
#[inline]
fn flip_legacy_rotation(q: Quat) -> Quat {
    Quat::from_xyzw(-q.x, q.y, -q.z, q.w)
}

/// VRM 0.x correction for translations: every axis but the vertical negated.
#[inline]
fn flip_legacy_position(v: Vec3) -> Vec3 {
    Vec3::new(-v.x, v.y, -v.z)
}

//! Motion file loader.
//!
//! A motion file is a glTF document holding a rig and one or more
//! animations. Node names are sanitized on the way in so that track names
//! and bone names agree (`mixamorig:Hips` becomes `mixamorigHips`).

use std::fs;
use std::path::Path;

use glam::{Quat, Vec3};

use crate::animation::{
    AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData, TrackMeta,
};
use crate::errors::{PetError, Result};
use crate::scene::{Bone, Skeleton};

use super::{node_transform, parent_indices, sanitized_node_name};

/// Clip name Mixamo exports use for their single animation.
pub const MIXAMO_CLIP_NAME: &str = "mixamo.com";

/// Decoded motion file: its clips and the rest pose of its rig.
#[derive(Debug, Clone)]
pub struct MotionAsset {
    pub clips: Vec<AnimationClip>,
    pub skeleton: Skeleton,
    pub source_url: Option<String>,
}

impl MotionAsset {
    /// The clip named `preferred`, falling back to the first clip.
    #[must_use]
    pub fn clip_or_first(&self, preferred: &str) -> Option<&AnimationClip> {
        AnimationClip::find_by_name(&self.clips, preferred).or_else(|| self.clips.first())
    }

    /// The Mixamo clip if present, otherwise the first clip.
    #[must_use]
    pub fn primary_clip(&self) -> Option<&AnimationClip> {
        self.clip_or_first(MIXAMO_CLIP_NAME)
    }
}

pub struct MotionLoader;

impl MotionLoader {
    pub fn load(path: &Path) -> Result<MotionAsset> {
        let bytes = fs::read(path)?;
        let gltf = gltf::Gltf::from_slice(&bytes)?;
        let mut asset = Self::from_gltf(gltf, path.parent())?;
        asset.source_url = Some(path.display().to_string());
        Ok(asset)
    }

    /// Parses an in-memory `.glb` or `.gltf`. Buffers must be embedded
    /// (GLB binary chunk or `data:` URIs).
    pub fn from_slice(bytes: &[u8]) -> Result<MotionAsset> {
        let gltf = gltf::Gltf::from_slice(bytes)?;
        Self::from_gltf(gltf, None)
    }

    fn from_gltf(gltf: gltf::Gltf, base: Option<&Path>) -> Result<MotionAsset> {
        let gltf::Gltf { document, blob } = gltf;
        let buffers = gltf::import_buffers(&document, base, blob)?;

        let skeleton = load_skeleton(&document);
        let clips = load_animations(&document, &buffers)?;

        if clips.is_empty() {
            log::warn!("Motion file contains no animations");
        }
        log::debug!(
            "Loaded motion: {} bones, {} clips",
            skeleton.len(),
            clips.len()
        );

        Ok(MotionAsset {
            clips,
            skeleton,
            source_url: None,
        })
    }
}

fn load_skeleton(document: &gltf::Document) -> Skeleton {
    let parents = parent_indices(document);
    let bones = document
        .nodes()
        .map(|node| {
            let transform = node_transform(&node);
            Bone {
                name: sanitized_node_name(&node),
                parent: parents[node.index()],
                position: transform.position,
                rotation: transform.rotation,
                scale: transform.scale,
            }
        })
        .collect();
    Skeleton::new("motion", bones)
}

fn load_animations(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<Vec<AnimationClip>> {
    use gltf::animation::util::ReadOutputs;
    use gltf::animation::Interpolation;

    let mut animations = Vec::new();

    for anim in document.animations() {
        let mut tracks = Vec::new();

        for channel in anim.channels() {
            let reader = channel.reader(|buffer| Some(buffers.get(buffer.index())?.0.as_slice()));
            let node_name = sanitized_node_name(&channel.target().node());

            let times: Vec<f32> = reader
                .read_inputs()
                .ok_or_else(|| {
                    PetError::MalformedAsset(format!("channel for '{node_name}' has no keyframe times"))
                })?
                .collect();

            let interpolation = match channel.sampler().interpolation() {
                Interpolation::Linear => InterpolationMode::Linear,
                Interpolation::Step => InterpolationMode::Step,
                Interpolation::CubicSpline => InterpolationMode::CubicSpline,
            };

            // Cubic splines store in-tangent, value and out-tangent per key
            let expected_values = match interpolation {
                InterpolationMode::CubicSpline => times.len() * 3,
                InterpolationMode::Linear | InterpolationMode::Step => times.len(),
            };

            let outputs = reader.read_outputs().ok_or_else(|| {
                PetError::MalformedAsset(format!("channel for '{node_name}' has no keyframe values"))
            })?;

            let (target, data) = match outputs {
                ReadOutputs::Translations(iter) => (
                    TargetPath::Translation,
                    TrackData::Vector3(KeyframeTrack::new(
                        times,
                        iter.map(Vec3::from_array).collect(),
                        interpolation,
                    )),
                ),
                ReadOutputs::Rotations(iter) => (
                    TargetPath::Rotation,
                    TrackData::Quaternion(KeyframeTrack::new(
                        times,
                        iter.into_f32().map(Quat::from_array).collect(),
                        interpolation,
                    )),
                ),
                ReadOutputs::Scales(iter) => (
                    TargetPath::Scale,
                    TrackData::Vector3(KeyframeTrack::new(
                        times,
                        iter.map(Vec3::from_array).collect(),
                        interpolation,
                    )),
                ),
                ReadOutputs::MorphTargetWeights(_) => {
                    log::trace!("Skipping morph weight channel on '{node_name}'");
                    continue;
                }
            };

            if data.value_count() != expected_values {
                return Err(PetError::MalformedAsset(format!(
                    "{target} channel for '{node_name}' has {} values for {} keyframes",
                    data.value_count(),
                    data.times().len()
                )));
            }

            tracks.push(Track {
                meta: TrackMeta::new(node_name, target),
                data,
            });
        }

        animations.push(AnimationClip::new(
            anim.name().unwrap_or("anim").to_string(),
            tracks,
        ));
    }

    Ok(animations)
}

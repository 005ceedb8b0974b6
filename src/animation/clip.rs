use glam::{Quat, Vec3};

use crate::animation::binding::TargetPath;
use crate::animation::tracks::KeyframeTrack;
use crate::errors::{PetError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMeta {
    pub node_name: String,
    pub target: TargetPath,
}

impl TrackMeta {
    #[must_use]
    pub fn new(node_name: impl Into<String>, target: TargetPath) -> Self {
        Self {
            node_name: node_name.into(),
            target,
        }
    }

    /// Splits a track identifier such as `"mixamorigHips.quaternion"`.
    ///
    /// The property is everything after the last `.`.
    pub fn parse(track_name: &str) -> Result<Self> {
        let (node_name, property) = track_name
            .rsplit_once('.')
            .ok_or_else(|| PetError::InvalidTrackName(track_name.to_string()))?;
        if node_name.is_empty() {
            return Err(PetError::InvalidTrackName(track_name.to_string()));
        }

        Ok(Self {
            node_name: node_name.to_string(),
            target: property.parse()?,
        })
    }

    /// Renders the identifier back as `<node>.<property>`.
    #[must_use]
    pub fn track_name(&self) -> String {
        format!("{}.{}", self.node_name, self.target)
    }
}

#[derive(Debug, Clone)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
}

impl TrackData {
    #[must_use]
    pub fn times(&self) -> &[f32] {
        match self {
            TrackData::Vector3(track) => &track.times,
            TrackData::Quaternion(track) => &track.times,
        }
    }

    #[must_use]
    pub fn end_time(&self) -> f32 {
        match self {
            TrackData::Vector3(track) => track.end_time(),
            TrackData::Quaternion(track) => track.end_time(),
        }
    }

    #[must_use]
    pub fn value_count(&self) -> usize {
        match self {
            TrackData::Vector3(track) => track.values.len(),
            TrackData::Quaternion(track) => track.values.len(),
        }
    }
}

/// A complete track: metadata plus keyframe data.
#[derive(Debug, Clone)]
pub struct Track {
    pub meta: TrackMeta,
    pub data: TrackData,
}

impl Track {
    #[must_use]
    pub fn name(&self) -> String {
        self.meta.track_name()
    }
}

#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Creates a clip whose duration is the latest keyframe across all tracks.
    #[must_use]
    pub fn new(name: String, tracks: Vec<Track>) -> Self {
        let duration = tracks
            .iter()
            .map(|t| t.data.end_time())
            .fold(0.0_f32, f32::max);

        Self {
            name,
            duration,
            tracks,
        }
    }

    /// Creates a clip with an explicit duration.
    #[must_use]
    pub fn with_duration(name: String, duration: f32, tracks: Vec<Track>) -> Self {
        Self {
            name,
            duration,
            tracks,
        }
    }

    #[must_use]
    pub fn find_by_name<'a>(clips: &'a [AnimationClip], name: &str) -> Option<&'a AnimationClip> {
        clips.iter().find(|clip| clip.name == name)
    }

    #[must_use]
    pub fn track(&self, track_name: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.name() == track_name)
    }
}

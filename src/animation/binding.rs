use std::fmt;
use std::str::FromStr;

use glam::{Quat, Vec3};

use crate::errors::PetError;
use crate::scene::NodeHandle;

/// Defines the target property for animation data.
///
/// The string forms are the property names used in track identifiers
/// (`"Hips.quaternion"`, `"Hips.position"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPath {
    Translation, // Maps to transform.position
    Rotation,    // Maps to transform.rotation
    Scale,       // Maps to transform.scale
}

impl TargetPath {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TargetPath::Translation => "position",
            TargetPath::Rotation => "quaternion",
            TargetPath::Scale => "scale",
        }
    }
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetPath {
    type Err = PetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "position" => Ok(TargetPath::Translation),
            "quaternion" => Ok(TargetPath::Rotation),
            "scale" => Ok(TargetPath::Scale),
            other => Err(PetError::InvalidTrackName(format!(
                "unknown property '{other}'"
            ))),
        }
    }
}

/// Characters that cannot appear in the node part of a track identifier.
const RESERVED_CHARS: [char; 5] = ['[', ']', '.', ':', '/'];

/// Makes a node name usable in a track identifier: whitespace becomes `_`,
/// reserved characters are removed.
///
/// Exporters write Mixamo bones as `mixamorig:Hips`; after sanitizing they
/// match the `mixamorigHips` convention.
#[must_use]
pub fn sanitize_node_name(name: &str) -> String {
    name.chars()
        .filter(|c| !RESERVED_CHARS.contains(c))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// A sampled or captured property value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackValue {
    Vector3(Vec3),
    Quaternion(Quat),
}

/// Binding relationship: maps track `track_index` from a Clip to the target property
/// of `node_handle` in the scene.
#[derive(Debug, Clone)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub node_handle: NodeHandle,
    pub target: TargetPath,
    /// Property value when the binding was made; partial weights blend toward it.
    pub original: TrackValue,
}

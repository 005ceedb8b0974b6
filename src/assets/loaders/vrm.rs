//! VRM avatar loader.
//!
//! Reads the node hierarchy with the `gltf` crate and the VRM extension
//! (`VRMC_vrm` for 1.0, `VRM` for 0.x) with typed serde structs.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::avatar::{Expression, ExpressionManager, HumanoidBone, MetaVersion, VrmAvatar};
use crate::errors::{PetError, Result};
use crate::scene::{NodeHandle, Scene};

use super::build_node_hierarchy;

// ============================================================================
// Extension JSON
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct VrmDocument {
    #[serde(default)]
    extensions: VrmExtensions,
}

#[derive(Debug, Default, Deserialize)]
struct VrmExtensions {
    #[serde(rename = "VRMC_vrm")]
    vrmc_vrm: Option<VrmcVrm>,
    #[serde(rename = "VRM")]
    vrm0: Option<Vrm0>,
}

// --- VRM 1.0 ---

#[derive(Debug, Deserialize)]
struct VrmcVrm {
    humanoid: VrmcHumanoid,
    #[serde(default)]
    expressions: VrmcExpressions,
}

#[derive(Debug, Deserialize)]
struct VrmcHumanoid {
    #[serde(rename = "humanBones", default)]
    human_bones: BTreeMap<String, VrmcHumanBone>,
}

#[derive(Debug, Deserialize)]
struct VrmcHumanBone {
    node: usize,
}

#[derive(Debug, Default, Deserialize)]
struct VrmcExpressions {
    #[serde(default)]
    preset: BTreeMap<String, VrmcExpression>,
    #[serde(default)]
    custom: BTreeMap<String, VrmcExpression>,
}

#[derive(Debug, Default, Deserialize)]
struct VrmcExpression {
    #[serde(rename = "isBinary", default)]
    is_binary: bool,
}

// --- VRM 0.x ---

#[derive(Debug, Deserialize)]
struct Vrm0 {
    humanoid: Vrm0Humanoid,
    #[serde(rename = "blendShapeMaster", default)]
    blend_shape_master: Vrm0BlendShapeMaster,
}

#[derive(Debug, Deserialize)]
struct Vrm0Humanoid {
    #[serde(rename = "humanBones", default)]
    human_bones: Vec<Vrm0HumanBone>,
}

#[derive(Debug, Deserialize)]
struct Vrm0HumanBone {
    bone: String,
    node: usize,
}

#[derive(Debug, Default, Deserialize)]
struct Vrm0BlendShapeMaster {
    #[serde(rename = "blendShapeGroups", default)]
    blend_shape_groups: Vec<Vrm0BlendShapeGroup>,
}

#[derive(Debug, Deserialize)]
struct Vrm0BlendShapeGroup {
    #[serde(default)]
    name: String,
    #[serde(rename = "presetName", default)]
    preset_name: String,
    #[serde(rename = "isBinary", default)]
    is_binary: bool,
}

/// VRM 0.x blend shape preset to VRM 1.0 expression preset.
fn vrm0_preset_name(preset: &str) -> Option<&'static str> {
    Some(match preset {
        "a" => "aa",
        "i" => "ih",
        "u" => "ou",
        "e" => "ee",
        "o" => "oh",
        "blink" => "blink",
        "joy" => "happy",
        "angry" => "angry",
        "sorrow" => "sad",
        "fun" => "relaxed",
        "lookup" => "lookUp",
        "lookdown" => "lookDown",
        "lookleft" => "lookLeft",
        "lookright" => "lookRight",
        "blink_l" => "blinkLeft",
        "blink_r" => "blinkRight",
        "neutral" => "neutral",
        _ => return None,
    })
}

// ============================================================================
// Loader
// ============================================================================

pub struct VrmLoader;

impl VrmLoader {
    pub fn load(path: &Path) -> Result<VrmAvatar> {
        let bytes = fs::read(path)?;
        let avatar = Self::from_slice(&bytes)?;
        Ok(avatar.with_source_url(path.display().to_string()))
    }

    /// Parses a `.vrm`/`.glb` binary or a `.gltf` JSON document.
    pub fn from_slice(bytes: &[u8]) -> Result<VrmAvatar> {
        let gltf = gltf::Gltf::from_slice(bytes)?;
        let json = json_chunk(bytes)?;
        let vrm_document: VrmDocument = serde_json::from_slice(&json)?;

        let mut scene = Scene::new();
        let (root, node_mapping) = build_node_hierarchy(&gltf.document, &mut scene, "vrm_root");

        let extensions = vrm_document.extensions;
        let (meta_version, humanoid, expressions) = if let Some(vrmc) = extensions.vrmc_vrm {
            let humanoid = humanoid_from_vrmc(&vrmc.humanoid, &node_mapping)?;
            (MetaVersion::V1, humanoid, expressions_from_vrmc(&vrmc.expressions))
        } else if let Some(vrm0) = extensions.vrm0 {
            let humanoid = humanoid_from_vrm0(&vrm0.humanoid, &node_mapping)?;
            (MetaVersion::V0, humanoid, expressions_from_vrm0(&vrm0.blend_shape_master))
        } else {
            return Err(PetError::VrmPayloadMissing);
        };

        if !humanoid.contains_key(&HumanoidBone::Hips) {
            log::warn!("VRM humanoid defines no hips bone; motion will not be scaled");
        }

        log::debug!(
            "Loaded VRM {meta_version:?}: {} nodes, {} humanoid bones, {} expressions",
            node_mapping.len(),
            humanoid.len(),
            expressions.names().len()
        );

        Ok(VrmAvatar::new(scene, root, humanoid, meta_version, expressions))
    }
}

/// The JSON chunk of a GLB container, or the input itself for `.gltf` text.
fn json_chunk(bytes: &[u8]) -> Result<Cow<'_, [u8]>> {
    if bytes.starts_with(b"glTF") {
        Ok(gltf::Glb::from_slice(bytes)?.json)
    } else {
        Ok(Cow::Borrowed(bytes))
    }
}

fn resolve_node(node_mapping: &[NodeHandle], index: usize) -> Result<NodeHandle> {
    node_mapping.get(index).copied().ok_or_else(|| {
        PetError::MalformedAsset(format!("humanoid bone refers to missing node {index}"))
    })
}

fn humanoid_from_vrmc(
    humanoid: &VrmcHumanoid,
    node_mapping: &[NodeHandle],
) -> Result<FxHashMap<HumanoidBone, NodeHandle>> {
    let mut map = FxHashMap::default();
    for (name, bone) in &humanoid.human_bones {
        match name.parse::<HumanoidBone>() {
            Ok(humanoid_bone) => {
                map.insert(humanoid_bone, resolve_node(node_mapping, bone.node)?);
            }
            Err(err) => log::warn!("Skipping VRM bone: {err}"),
        }
    }
    Ok(map)
}

fn humanoid_from_vrm0(
    humanoid: &Vrm0Humanoid,
    node_mapping: &[NodeHandle],
) -> Result<FxHashMap<HumanoidBone, NodeHandle>> {
    let mut map = FxHashMap::default();
    for bone in &humanoid.human_bones {
        match HumanoidBone::from_vrm0_name(&bone.bone) {
            Ok(humanoid_bone) => {
                map.insert(humanoid_bone, resolve_node(node_mapping, bone.node)?);
            }
            Err(err) => log::warn!("Skipping VRM 0.x bone: {err}"),
        }
    }
    Ok(map)
}

fn expressions_from_vrmc(expressions: &VrmcExpressions) -> ExpressionManager {
    let mut manager = ExpressionManager::new();
    for (name, expression) in &expressions.preset {
        manager.add_preset(Expression::new(name.as_str()).binary(expression.is_binary));
    }
    for (name, expression) in &expressions.custom {
        manager.add_custom(Expression::new(name.as_str()).binary(expression.is_binary));
    }
    manager
}

fn expressions_from_vrm0(master: &Vrm0BlendShapeMaster) -> ExpressionManager {
    let mut manager = ExpressionManager::new();
    for group in &master.blend_shape_groups {
        let preset = group.preset_name.to_ascii_lowercase();
        if let Some(name) = vrm0_preset_name(&preset) {
            manager.add_preset(Expression::new(name).binary(group.is_binary));
        } else if !group.name.is_empty() {
            manager.add_custom(Expression::new(group.name.as_str()).binary(group.is_binary));
        }
    }
    manager
}

//! In-memory glTF documents shared by the loader and character tests.

#![allow(dead_code)]

use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};

/// Three-node humanoid: `Armature > J_Bip_C_Hips > J_Bip_C_Spine`.
fn humanoid_nodes() -> Value {
    json!([
        { "name": "Armature", "children": [1] },
        { "name": "J_Bip_C_Hips", "translation": [0.0, 0.9, 0.0], "children": [2] },
        { "name": "J_Bip_C_Spine", "translation": [0.0, 0.1, 0.0] }
    ])
}

fn gltf_with_extensions(extensions: Value) -> String {
    json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": humanoid_nodes(),
        "extensions": extensions
    })
    .to_string()
}

/// VRM 1.0 document (`VRMC_vrm`).
pub fn vrm1_json() -> String {
    gltf_with_extensions(json!({
        "VRMC_vrm": {
            "specVersion": "1.0",
            "humanoid": {
                "humanBones": {
                    "hips": { "node": 1 },
                    "spine": { "node": 2 },
                    "tail": { "node": 2 }
                }
            },
            "expressions": {
                "preset": {
                    "happy": {},
                    "relaxed": {},
                    "blink": { "isBinary": true }
                },
                "custom": {
                    "wink": {}
                }
            }
        }
    }))
}

/// VRM 0.x document (`VRM`).
pub fn vrm0_json() -> String {
    gltf_with_extensions(json!({
        "VRM": {
            "humanoid": {
                "humanBones": [
                    { "bone": "hips", "node": 1 },
                    { "bone": "spine", "node": 2 },
                    { "bone": "leftThumbIntermediate", "node": 2 }
                ]
            },
            "blendShapeMaster": {
                "blendShapeGroups": [
                    { "name": "Joy", "presetName": "joy" },
                    { "name": "A", "presetName": "a" },
                    { "name": "Blink", "presetName": "blink", "isBinary": true },
                    { "name": "Smirk", "presetName": "unknown" }
                ]
            }
        }
    }))
}

/// Plain glTF with no VRM extension.
pub fn plain_gltf_json() -> String {
    gltf_with_extensions(json!({}))
}

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Mixamo-style motion: `mixamorig:Hips` (rest height 1.0) with a child
/// `mixamorig:Spine`, one clip rotating the spine and moving the hips.
pub fn motion_gltf_json(clip_name: &str) -> String {
    motion_gltf_json_with_rotation_count(clip_name, 2)
}

/// Same as [`motion_gltf_json`], with the spine rotation accessor declaring
/// `rotation_count` values against two keyframe times.
pub fn motion_gltf_json_with_rotation_count(clip_name: &str, rotation_count: usize) -> String {
    let times = f32_bytes(&[0.0, 1.0]);
    let rotations = f32_bytes(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    let translations = f32_bytes(&[0.0, 1.0, 0.0, 0.5, 1.0, 0.0]);

    let mut buffer = Vec::new();
    buffer.extend_from_slice(&times);
    buffer.extend_from_slice(&rotations);
    buffer.extend_from_slice(&translations);

    json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "mixamorig:Hips", "translation": [0.0, 1.0, 0.0], "children": [1] },
            { "name": "mixamorig:Spine", "translation": [0.0, 0.1, 0.0] }
        ],
        "buffers": [{
            "byteLength": buffer.len(),
            "uri": format!("data:application/octet-stream;base64,{}", STANDARD.encode(&buffer))
        }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": times.len() },
            { "buffer": 0, "byteOffset": times.len(), "byteLength": rotations.len() },
            { "buffer": 0, "byteOffset": times.len() + rotations.len(), "byteLength": translations.len() }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 2, "type": "SCALAR", "min": [0.0], "max": [1.0] },
            { "bufferView": 1, "componentType": 5126, "count": rotation_count, "type": "VEC4" },
            { "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC3" }
        ],
        "animations": [{
            "name": clip_name,
            "samplers": [
                { "input": 0, "output": 1, "interpolation": "LINEAR" },
                { "input": 0, "output": 2, "interpolation": "LINEAR" }
            ],
            "channels": [
                { "sampler": 0, "target": { "node": 1, "path": "rotation" } },
                { "sampler": 1, "target": { "node": 0, "path": "translation" } }
            ]
        }]
    })
    .to_string()
}

/// Writes `contents` to a fresh file under the system temp directory.
pub fn write_temp(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vrm-pet-tests-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write temp file");
    path
}

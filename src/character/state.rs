use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Expression last requested through the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionState {
    pub name: String,
    pub value: f32,
}

/// Snapshot of what the character is showing, for hosts and agents to read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterState {
    pub vrm_url: Option<String>,
    pub motion_name: Option<String>,
    pub expression: Option<ExpressionState>,
}

/// Where a host camera should sit to frame the avatar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

use serde::{Deserialize, Serialize};

/// Requests an agent can make of the character.
///
/// Serialized with an `op` tag:
///
/// ```json
/// { "op": "playMotion", "url": "motions/wave.glb", "motionName": "wave" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum CharacterCommand {
    LoadVrm {
        url: String,
    },
    PlayMotion {
        url: String,
        #[serde(rename = "motionName", default, skip_serializing_if = "Option::is_none")]
        motion_name: Option<String>,
    },
    SetExpression {
        name: String,
        #[serde(default = "default_expression_value")]
        value: f32,
    },
}

fn default_expression_value() -> f32 {
    1.0
}

//! Character session settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// One step of the idle expression cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionStep {
    pub name: String,
    #[serde(default = "ExpressionStep::default_value")]
    pub value: f32,
}

impl ExpressionStep {
    #[must_use]
    pub fn new(name: impl Into<String>, value: f32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    fn default_value() -> f32 {
        1.0
    }
}

/// Tunables for [`CharacterController`](crate::character::CharacterController).
///
/// Every field has a default, so a settings file only needs the keys it
/// changes:
///
/// ```
/// use vrm_pet::settings::PetSettings;
///
/// let settings = PetSettings::from_json_str(r#"{ "crossfadeDuration": 1.0 }"#).unwrap();
/// assert_eq!(settings.crossfade_duration, 1.0);
/// assert_eq!(settings.expression_interval, 3.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PetSettings {
    /// Seconds spent cross-fading from the previous motion to a new one.
    pub crossfade_duration: f32,

    /// Seconds between idle expression changes.
    ///
    /// A value of zero or less turns the cycle off.
    pub expression_interval: f32,

    /// Expressions the idle cycle steps through, in order.
    pub expression_cycle: Vec<ExpressionStep>,

    /// Name given to a retargeted clip when the caller supplies none.
    pub default_motion_name: String,

    /// Clip picked from a motion file when it has more than one.
    pub preferred_clip_name: String,
}

impl Default for PetSettings {
    fn default() -> Self {
        Self {
            crossfade_duration: 0.4,
            expression_interval: 3.0,
            expression_cycle: vec![
                ExpressionStep::new("happy", 1.0),
                ExpressionStep::new("relaxed", 1.0),
                ExpressionStep::new("fun", 1.0),
                ExpressionStep::new("blink", 1.0),
            ],
            default_motion_name: "vrmAnimation".to_string(),
            preferred_clip_name: crate::assets::MIXAMO_CLIP_NAME.to_string(),
        }
    }
}

impl PetSettings {
    /// Parses settings from a JSON string. Missing keys take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Reads settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loading settings from {}", path.as_ref().display());
        Self::from_json_str(&contents)
    }
}

use std::path::Path;
use std::sync::Arc;

use glam::Vec3;

use crate::animation::{ActionHandle, AnimationMixer};
use crate::assets::{MotionAsset, MotionLoader, VrmLoader};
use crate::avatar::{HumanoidRig, VrmAvatar};
use crate::character::{CameraPose, CharacterCommand, CharacterState, ExpressionState};
use crate::errors::{PetError, Result};
use crate::retarget::{BoneNameMap, retarget};
use crate::settings::PetSettings;

/// One avatar on screen: the loaded VRM, the mixer driving it, the motion
/// currently playing and the idle expression cycle.
pub struct CharacterController {
    settings: PetSettings,
    bone_map: BoneNameMap,

    avatar: Option<VrmAvatar>,
    mixer: Option<AnimationMixer>,
    current_action: Option<ActionHandle>,

    expression_index: usize,
    expression_timer: f32,

    state: CharacterState,
}

impl Default for CharacterController {
    fn default() -> Self {
        Self::new(PetSettings::default())
    }
}

impl CharacterController {
    #[must_use]
    pub fn new(settings: PetSettings) -> Self {
        Self {
            settings,
            bone_map: BoneNameMap::mixamo(),
            avatar: None,
            mixer: None,
            current_action: None,
            expression_index: 0,
            expression_timer: 0.0,
            state: CharacterState::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &PetSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn avatar(&self) -> Option<&VrmAvatar> {
        self.avatar.as_ref()
    }

    #[inline]
    pub fn avatar_mut(&mut self) -> Option<&mut VrmAvatar> {
        self.avatar.as_mut()
    }

    #[inline]
    #[must_use]
    pub fn mixer(&self) -> Option<&AnimationMixer> {
        self.mixer.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn current_action(&self) -> Option<ActionHandle> {
        self.current_action
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &CharacterState {
        &self.state
    }

    // ========================================================================
    // Avatar
    // ========================================================================

    /// Loads a VRM file and makes it the current avatar.
    ///
    /// On failure the previous avatar and its animation keep playing.
    pub fn load_vrm(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        match VrmLoader::load(path) {
            Ok(avatar) => {
                self.set_avatar(avatar);
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to load VRM '{}': {err}", path.display());
                Err(err)
            }
        }
    }

    /// Replaces the current avatar. Any playing motion is dropped.
    pub fn set_avatar(&mut self, avatar: VrmAvatar) {
        self.mixer = Some(AnimationMixer::new(avatar.root()));
        self.current_action = None;
        self.expression_index = 0;
        self.expression_timer = 0.0;

        self.state.vrm_url.clone_from(&avatar.source_url);
        log::info!(
            "Avatar loaded ({:?}, {} expressions)",
            avatar.meta_version(),
            avatar.expression_names().len()
        );
        self.avatar = Some(avatar);
    }

    // ========================================================================
    // Motion
    // ========================================================================

    /// Loads a motion file and plays it on the current avatar.
    pub fn load_motion(
        &mut self,
        path: impl AsRef<Path>,
        motion_name: Option<&str>,
    ) -> Result<ActionHandle> {
        if self.avatar.is_none() {
            return Err(PetError::NoAvatarLoaded);
        }
        let asset = MotionLoader::load(path.as_ref())?;
        self.play_motion(&asset, motion_name)
    }

    /// Retargets the motion's primary clip onto the avatar and cross-fades to it.
    pub fn play_motion(
        &mut self,
        asset: &MotionAsset,
        motion_name: Option<&str>,
    ) -> Result<ActionHandle> {
        let Some(avatar) = self.avatar.as_ref() else {
            return Err(PetError::NoAvatarLoaded);
        };
        let clip = asset
            .clip_or_first(&self.settings.preferred_clip_name)
            .ok_or(PetError::NoAnimationClip)?;

        let mut retargeted = retarget(clip, &asset.skeleton, &self.bone_map, avatar)?;
        retargeted.name = motion_name
            .unwrap_or(&self.settings.default_motion_name)
            .to_string();

        let mixer = self
            .mixer
            .get_or_insert_with(|| AnimationMixer::new(avatar.root()));

        let handle = mixer.clip_action(Arc::new(retargeted), avatar.scene());
        if let Some(action) = mixer.action_mut(handle) {
            action.reset().play();
        }

        if let Some(previous) = self.current_action
            && previous != handle
        {
            // Actions that already faded out are no longer needed
            let stale: Vec<ActionHandle> = mixer
                .actions()
                .filter(|&(h, action)| h != previous && h != handle && !action.enabled)
                .map(|(h, _)| h)
                .collect();
            for h in stale {
                mixer.uncache_action(h);
            }

            mixer.cross_fade(previous, handle, self.settings.crossfade_duration);
        }
        self.current_action = Some(handle);

        let recorded = motion_name.unwrap_or(&clip.name).to_string();
        log::debug!("Playing motion '{recorded}'");
        self.state.motion_name = Some(recorded);

        Ok(handle)
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Sets one expression to `value` and every other expression to zero.
    ///
    /// Returns `false`, changing nothing, if there is no avatar or it has no
    /// expression called `name`.
    pub fn set_expression(&mut self, name: &str, value: f32) -> bool {
        let Some(avatar) = self.avatar.as_mut() else {
            return false;
        };
        if !avatar.expressions_mut().set_exclusive(name, value) {
            log::debug!("Avatar has no expression '{name}'");
            return false;
        }
        self.state.expression = Some(ExpressionState {
            name: name.to_string(),
            value,
        });
        true
    }

    fn update_expressions(&mut self, dt: f32) {
        let interval = self.settings.expression_interval;
        if interval <= 0.0 || self.settings.expression_cycle.is_empty() {
            return;
        }

        self.expression_timer += dt;
        if self.expression_timer < interval {
            return;
        }
        self.expression_timer = 0.0;

        let cycle = &self.settings.expression_cycle;
        let step = cycle[self.expression_index % cycle.len()].clone();
        self.expression_index = (self.expression_index + 1) % cycle.len();
        self.set_expression(&step.name, step.value);
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Advances animation and the expression cycle by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if self.avatar.is_none() {
            return;
        }

        if let (Some(mixer), Some(avatar)) = (self.mixer.as_mut(), self.avatar.as_mut()) {
            mixer.update(dt, avatar.scene_mut());
        }

        self.update_expressions(dt);

        if let Some(avatar) = self.avatar.as_mut() {
            avatar.scene_mut().update_matrix_world();
        }
    }

    /// Camera placement that fits the avatar's current pose in view.
    ///
    /// The bounds are taken over node origins, so mesh extents past the
    /// outermost joints are not included.
    #[must_use]
    pub fn frame_camera(&self) -> Option<CameraPose> {
        let avatar = self.avatar.as_ref()?;
        let scene = avatar.scene();

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for handle in scene.collect_subtree(avatar.root()) {
            if let Some(position) = scene.world_position(handle) {
                min = min.min(position);
                max = max.max(position);
            }
        }
        if !min.is_finite() || !max.is_finite() {
            return None;
        }

        let center = (min + max) * 0.5;
        let size = max - min;
        let distance = size.max_element() * 2.0;

        Some(CameraPose {
            position: center + Vec3::new(0.0, size.y * 0.3, distance),
            target: center,
        })
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Runs one agent command against the session.
    pub fn apply(&mut self, command: CharacterCommand) -> Result<()> {
        match command {
            CharacterCommand::LoadVrm { url } => self.load_vrm(url),
            CharacterCommand::PlayMotion { url, motion_name } => {
                self.load_motion(url, motion_name.as_deref()).map(|_| ())
            }
            CharacterCommand::SetExpression { name, value } => {
                self.set_expression(&name, value);
                Ok(())
            }
        }
    }
}

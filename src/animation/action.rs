use std::sync::Arc;

use crate::animation::{
    binding::{PropertyBinding, TrackValue},
    clip::{AnimationClip, TrackData},
    tracks::KeyframeCursor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    Loop,
    PingPong,
}

/// Linear ramp of the fade factor between two values.
#[derive(Debug, Clone, Copy, PartialEq)]
struct WeightFade {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

impl WeightFade {
    fn factor(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,
    pub enabled: bool,

    pub bindings: Vec<PropertyBinding>,

    pub(crate) track_cursors: Vec<KeyframeCursor>,

    fade_factor: f32,
    fade: Option<WeightFade>,
    // +1.0 or -1.0 while ping-ponging
    direction: f32,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Loop,
            paused: false,
            enabled: true,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
            fade_factor: 1.0,
            fade: None,
            direction: 1.0,
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    /// Rewinds to the start and clears pause, fades and cursors.
    pub fn reset(&mut self) -> &mut Self {
        self.time = 0.0;
        self.paused = false;
        self.enabled = true;
        self.fade = None;
        self.fade_factor = 1.0;
        self.direction = 1.0;
        for cursor in &mut self.track_cursors {
            cursor.last_index = 0;
        }
        self
    }

    pub fn play(&mut self) -> &mut Self {
        self.enabled = true;
        self.paused = false;
        self
    }

    pub fn stop(&mut self) -> &mut Self {
        self.enabled = false;
        self.fade = None;
        self
    }

    /// Weight actually applied by the mixer: `weight` scaled by the fade factor.
    #[must_use]
    pub fn effective_weight(&self) -> f32 {
        if self.enabled {
            self.weight * self.fade_factor
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        self.schedule_fade(0.0, 1.0, duration)
    }

    pub fn fade_out(&mut self, duration: f32) -> &mut Self {
        self.schedule_fade(self.fade_factor, 0.0, duration)
    }

    /// Fades `previous` out and `self` in over the same duration.
    pub fn cross_fade_from(&mut self, previous: &mut AnimationAction, duration: f32) -> &mut Self {
        previous.fade_out(duration);
        self.fade_in(duration)
    }

    fn schedule_fade(&mut self, from: f32, to: f32, duration: f32) -> &mut Self {
        let fade = WeightFade {
            from,
            to,
            elapsed: 0.0,
            duration: duration.max(0.0),
        };
        self.fade_factor = fade.factor();
        self.fade = Some(fade);
        self.settle_fade();
        self
    }

    fn advance_fade(&mut self, dt: f32) {
        if let Some(fade) = &mut self.fade {
            fade.elapsed += dt.abs();
            self.fade_factor = fade.factor();
        }
        self.settle_fade();
    }

    /// A finished fade is dropped; a finished fade-out disables the action.
    fn settle_fade(&mut self) {
        let Some(fade) = self.fade else {
            return;
        };
        if fade.finished() {
            self.fade = None;
            self.fade_factor = fade.to;
            if fade.to <= 0.0 {
                self.enabled = false;
                self.fade_factor = 1.0;
            }
        }
    }

    /// Core logic: advance time.
    pub fn update(&mut self, dt: f32) {
        if !self.enabled {
            return;
        }

        // Fades run on wall time, independent of pause and time scale
        self.advance_fade(dt);

        if self.paused || !self.enabled {
            return;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        // 1. Accumulate time
        self.time += dt * self.time_scale * self.direction;

        // 2. Handle loop mode
        match self.loop_mode {
            LoopMode::Once => {
                // Play once, stop at end or start
                if self.time >= duration {
                    self.time = duration;
                    self.paused = true;
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.paused = true;
                }
            }
            LoopMode::Loop => {
                if self.time >= duration {
                    self.time %= duration;
                } else if self.time < 0.0 {
                    // Reverse playback loop
                    self.time = duration + (self.time % duration);
                }
            }
            LoopMode::PingPong => {
                // Reflect off either end; a step longer than the clip settles at an end
                if self.time >= duration {
                    self.time = (2.0 * duration - self.time).max(0.0);
                    self.direction = -self.direction;
                } else if self.time < 0.0 {
                    self.time = (-self.time).min(duration);
                    self.direction = -self.direction;
                }
            }
        }
    }

    /// Gets the value of the specified track at the current time.
    pub fn sample_track(&mut self, track_index: usize) -> Option<TrackValue> {
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.track_cursors.get_mut(track_index)?;

        match &track.data {
            TrackData::Vector3(t) => t
                .sample_with_cursor(self.time, cursor)
                .map(TrackValue::Vector3),
            TrackData::Quaternion(t) => t
                .sample_with_cursor(self.time, cursor)
                .map(TrackValue::Quaternion),
        }
    }
}

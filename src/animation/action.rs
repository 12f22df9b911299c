use std::sync::Arc;

use crate::animation::{
    binding::PropertyBinding,
    clip::{AnimationClip, TrackData},
    tracks::KeyframeCursor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// Play to the end once, then finish.
    Once,
    Loop,
    PingPong,
}

/// Emitted by [`AnimationAction::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEvent {
    /// A [`LoopMode::Once`] action reached the end of its clip.
    Finished,
}

/// A linear weight ramp.
#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
    /// Set by `fade_out`; a fade-out starting at weight 0 still counts.
    out: bool,
}

impl Fade {
    fn value(&self) -> f32 {
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Playback state of one clip on one model.
///
/// An action does nothing until [`play`](Self::play) is called. Its weight
/// can be ramped with [`fade_in`](Self::fade_in) and
/// [`fade_out`](Self::fade_out); a completed fade-out stops the action.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub loop_mode: LoopMode,
    /// Hold the last pose after a `Once` clip ends instead of releasing it.
    pub clamp_when_finished: bool,
    pub paused: bool,
    pub enabled: bool,

    weight: f32,
    playing: bool,
    finished: bool,
    fade: Option<Fade>,

    pub bindings: Vec<PropertyBinding>,

    pub(crate) track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            loop_mode: LoopMode::Loop,
            clamp_when_finished: false,
            paused: false,
            enabled: true,
            weight: 1.0,
            playing: false,
            finished: false,
            fade: None,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    // ========================================================================
    // Control
    // ========================================================================

    pub fn play(&mut self) -> &mut Self {
        self.playing = true;
        self.enabled = true;
        self
    }

    /// Stops playback and rewinds. Weight fades are dropped.
    pub fn stop(&mut self) -> &mut Self {
        self.playing = false;
        self.fade = None;
        self.reset()
    }

    /// Rewinds to the start pose and clears finished/paused state and fades.
    pub fn reset(&mut self) -> &mut Self {
        self.time = 0.0;
        self.paused = false;
        self.enabled = true;
        self.finished = false;
        self.fade = None;
        for cursor in &mut self.track_cursors {
            cursor.last_index = 0;
        }
        self
    }

    pub fn set_loop(&mut self, mode: LoopMode) -> &mut Self {
        self.loop_mode = mode;
        self
    }

    pub fn set_weight(&mut self, weight: f32) -> &mut Self {
        self.fade = None;
        self.weight = weight.clamp(0.0, 1.0);
        self
    }

    /// Ramps the weight from 0 to 1 over `duration` seconds.
    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        self.schedule_fade(0.0, 1.0, duration, false)
    }

    /// Ramps the weight from its current value to 0 over `duration` seconds,
    /// then stops the action.
    pub fn fade_out(&mut self, duration: f32) -> &mut Self {
        self.schedule_fade(self.weight, 0.0, duration, true)
    }

    fn schedule_fade(&mut self, from: f32, to: f32, duration: f32, out: bool) -> &mut Self {
        if duration <= 0.0 {
            self.fade = None;
            self.weight = to;
            if to <= 0.0 {
                self.playing = false;
            }
        } else {
            self.weight = from;
            self.fade = Some(Fade {
                from,
                to,
                elapsed: 0.0,
                duration,
                out,
            });
        }
        self
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Current blend weight, including any fade in progress.
    #[inline]
    #[must_use]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Has been told to play and has not been stopped or faded out.
    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn is_fading_out(&self) -> bool {
        self.fade.is_some_and(|f| f.out)
    }

    /// Playing, advancing, and not on its way out.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.playing && self.enabled && !self.paused && !self.finished && !self.is_fading_out()
    }

    /// Whether the action's pose should be blended this frame.
    #[must_use]
    pub fn contributes(&self) -> bool {
        self.playing && self.enabled && self.weight > 0.0
    }

    // ========================================================================
    // Time
    // ========================================================================

    /// Advances weight fades and playback time.
    pub fn update(&mut self, dt: f32) -> Option<ActionEvent> {
        if !self.playing || !self.enabled {
            return None;
        }

        if let Some(fade) = &mut self.fade {
            fade.elapsed += dt;
            self.weight = fade.value();
            if fade.is_done() {
                self.fade = None;
                if self.weight <= 0.0 {
                    self.playing = false;
                    return None;
                }
            }
        }

        if self.paused || self.finished {
            return None;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return None;
        }

        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                let ended = self.time >= duration || self.time < 0.0;
                if ended {
                    self.time = self.time.clamp(0.0, duration);
                    self.finished = true;
                    if self.clamp_when_finished {
                        self.paused = true;
                    } else {
                        self.enabled = false;
                    }
                    return Some(ActionEvent::Finished);
                }
            }
            LoopMode::Loop => {
                self.time = self.time.rem_euclid(duration);
            }
            LoopMode::PingPong => {
                let double_duration = duration * 2.0;
                let t = self.time.rem_euclid(double_duration);
                self.time = if t > duration { double_duration - t } else { t };
            }
        }

        None
    }

    /// Samples track `track_index` at the current time.
    pub fn sample_track(&mut self, track_index: usize) -> Option<TrackValue> {
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.track_cursors.get_mut(track_index)?;

        Some(match &track.data {
            TrackData::Vector3(t) => TrackValue::Vector3(t.sample_with_cursor(self.time, cursor)),
            TrackData::Quaternion(t) => {
                TrackValue::Quaternion(t.sample_with_cursor(self.time, cursor))
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackValue {
    Vector3(glam::Vec3),
    Quaternion(glam::Quat),
}

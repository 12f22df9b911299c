use crate::experience::journey::Waypoint;

/// Where the story currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Opening one-shot clip, overview camera.
    Intro,
    /// No waypoint focused, idle clip.
    Overview,
    /// Waypoint `k` focused, its clip playing.
    Focused(usize),
}

/// The composer's state: the stage and the clip the avatar should play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneState {
    pub stage: Stage,
    pub requested_clip: String,
    intro_complete: bool,
}

impl SceneState {
    #[must_use]
    pub fn active_waypoint(&self) -> Option<usize> {
        match self.stage {
            Stage::Focused(k) => Some(k),
            Stage::Intro | Stage::Overview => None,
        }
    }

    #[must_use]
    pub fn intro_complete(&self) -> bool {
        self.intro_complete
    }
}

/// The click-driven state machine of the scene.
///
/// Transitions:
/// - `Intro -> Overview` when the intro clip finishes, once per load;
/// - `Overview -> Focused(k)` on a click on marker `k`;
/// - `Focused(k) -> Overview` on a second click on `k` or its close control;
/// - `Focused(k) -> Focused(j)` on a click on another marker `j`.
///
/// A click during the intro focuses the marker straight away and the intro
/// is considered over.
#[derive(Debug, Clone)]
pub struct Composer {
    waypoints: Vec<Waypoint>,
    idle_clip: String,
    intro_clip: String,
    state: SceneState,
}

impl Composer {
    #[must_use]
    pub fn new(waypoints: Vec<Waypoint>, idle_clip: &str, intro_clip: &str) -> Self {
        Self {
            waypoints,
            idle_clip: idle_clip.to_string(),
            intro_clip: intro_clip.to_string(),
            state: SceneState {
                stage: Stage::Intro,
                requested_clip: intro_clip.to_string(),
                intro_complete: false,
            },
        }
    }

    #[must_use]
    pub fn state(&self) -> &SceneState {
        &self.state
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    #[must_use]
    pub fn requested_clip(&self) -> &str {
        &self.state.requested_clip
    }

    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    #[must_use]
    pub fn active_waypoint(&self) -> Option<&Waypoint> {
        self.waypoints.get(self.state.active_waypoint()?)
    }

    /// Click on marker `k`: focus it, or return to the overview if it is
    /// already focused.
    pub fn click(&mut self, k: usize) {
        let Some(waypoint) = self.waypoints.get(k) else {
            log::warn!("Ignoring click on unknown waypoint {k}");
            return;
        };

        let next = if self.state.stage == Stage::Focused(k) {
            Stage::Overview
        } else {
            Stage::Focused(k)
        };
        let clip = match next {
            Stage::Focused(_) => waypoint.clip.clone(),
            Stage::Intro | Stage::Overview => self.idle_clip.clone(),
        };
        self.state.intro_complete = true;
        self.enter(next, clip);
    }

    /// Close control on marker `k`'s panel. Only acts while `k` is focused.
    pub fn close(&mut self, k: usize) {
        if self.state.stage == Stage::Focused(k) {
            let idle = self.idle_clip.clone();
            self.enter(Stage::Overview, idle);
        }
    }

    /// Reports that a one-shot clip ended. Ends the intro the first time the
    /// intro clip finishes; returns whether it did.
    pub fn on_clip_finished(&mut self, clip: &str) -> bool {
        if self.state.intro_complete || clip != self.intro_clip {
            return false;
        }
        self.state.intro_complete = true;
        if self.state.stage == Stage::Intro {
            let idle = self.idle_clip.clone();
            self.enter(Stage::Overview, idle);
        }
        true
    }

    fn enter(&mut self, stage: Stage, clip: String) {
        log::debug!("Stage {:?} -> {stage:?}, clip '{clip}'", self.state.stage);
        self.state.stage = stage;
        self.state.requested_clip = clip;
    }
}

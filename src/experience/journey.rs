//! The story the scene tells: an ordered list of waypoints and the playback
//! policy of the avatar's clips.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::animation::Playback;

/// Clip played once when the scene opens.
pub const HERO_DROP_CLIP: &str = "akash-herodrop";
/// Clip played whenever no waypoint is focused.
pub const IDLE_CLIP: &str = "akash - idle";

/// A fixed point of interest with narrative text and the clip the avatar
/// plays while it is focused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: [f32; 3],
    pub title: String,
    pub text: String,
    pub clip: String,
}

impl Waypoint {
    #[must_use]
    pub fn new(position: [f32; 3], title: &str, text: &str, clip: &str) -> Self {
        Self {
            position,
            title: title.to_string(),
            text: text.to_string(),
            clip: clip.to_string(),
        }
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// The five milestones of the built-in journey.
#[must_use]
pub fn default_journey() -> Vec<Waypoint> {
    vec![
        Waypoint::new(
            [0.0, 0.1, 0.0],
            "Akash's Journey Begins",
            "Welcome! I'm Akash, a developer passionate about creating immersive worlds. \
             This is my journey from code to artistry. Click on the milestones to explore.",
            IDLE_CLIP,
        ),
        Waypoint::new(
            [-5.0, 0.1, -2.0],
            "The Foundation: Education & Passion",
            "With a degree in Computer Science and 4+ years of hands-on experience, I built a \
             strong foundation in software engineering, always driven by a curiosity for \
             interactive 3D graphics.",
            IDLE_CLIP,
        ),
        Waypoint::new(
            [2.0, 0.1, -6.0],
            "The Unity Craftsman (Experiences)",
            "As a Senior Unity Developer, I specialized in crafting digital twins and training \
             simulators. My focus was on performance, realism, and creating systems that felt \
             alive through physics and game mechanics.",
            "akash - idle - vision pro",
        ),
        Waypoint::new(
            [-2.0, 0.1, -10.0],
            "The Web Explorer (Technical Skills)",
            "I expanded my skills into the web with Three.js and React Three Fiber, building \
             browser-based 3D experiences. This is where my love for storytelling through \
             interaction truly began to shine.",
            "akash-fight-quest",
        ),
        Waypoint::new(
            [6.0, 0.1, -12.0],
            "The Creative Technologist",
            "Now, as a Technical Artist, I bridge the gap between creativity and technology. I \
             use shaders, Blender, and XR prototyping to transform abstract ideas into visually \
             rich and emotionally resonant experiences.",
            IDLE_CLIP,
        ),
    ]
}

/// Per-clip playback rules. Clips without an entry loop.
#[derive(Debug, Clone)]
pub struct ClipPolicy {
    entries: Vec<(String, Playback)>,
}

impl ClipPolicy {
    /// Every clip loops.
    #[must_use]
    pub fn looping() -> Self {
        Self { entries: Vec::new() }
    }

    /// `hero_clip` plays once and holds; everything else loops.
    #[must_use]
    pub fn with_one_shot(hero_clip: &str) -> Self {
        Self::looping().set(hero_clip, Playback::ONCE_CLAMPED)
    }

    #[must_use]
    pub fn set(mut self, clip: &str, playback: Playback) -> Self {
        self.entries.retain(|(name, _)| name != clip);
        self.entries.push((clip.to_string(), playback));
        self
    }

    #[must_use]
    pub fn playback(&self, clip: &str) -> Playback {
        self.entries
            .iter()
            .find(|(name, _)| name == clip)
            .map_or(Playback::LOOP, |(_, playback)| *playback)
    }
}

impl Default for ClipPolicy {
    fn default() -> Self {
        Self::with_one_shot(HERO_DROP_CLIP)
    }
}

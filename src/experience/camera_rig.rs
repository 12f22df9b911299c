use glam::Vec3;

use crate::experience::journey::Waypoint;
use crate::scene::Transform;
use crate::settings::CameraRigSettings;
use crate::utils::OrbitControls;

/// Where the camera sits and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    /// Moves `self` a fraction `alpha` of the way toward `target`.
    #[must_use]
    pub fn lerp(self, target: CameraPose, alpha: f32) -> CameraPose {
        CameraPose {
            position: self.position.lerp(target.position, alpha),
            look_at: self.look_at.lerp(target.look_at, alpha),
        }
    }
}

/// Eases the camera toward the overview or the focused waypoint.
///
/// Each frame the camera covers `rate * dt` of its remaining distance to the
/// target, capped at the whole distance, so it approaches without overshoot
/// whatever the frame time.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub rate: f32,
    pub overview_position: Vec3,
    pub focus_offset: Vec3,
    pub look_lift: f32,
    /// The avatar's resting position; the overview looks at it.
    pub avatar_rest: Vec3,
}

impl CameraRig {
    #[must_use]
    pub fn new(settings: &CameraRigSettings, avatar_rest: Vec3) -> Self {
        Self {
            rate: settings.smoothing_rate,
            overview_position: Vec3::from_array(settings.overview_position),
            focus_offset: Vec3::from_array(settings.focus_offset),
            look_lift: settings.look_lift,
            avatar_rest,
        }
    }

    /// The pose the camera settles at for the given focus.
    #[must_use]
    pub fn target(&self, active: Option<&Waypoint>) -> CameraPose {
        match active {
            Some(waypoint) => {
                let position = waypoint.position();
                CameraPose {
                    position: position + self.focus_offset,
                    look_at: position + Vec3::Y * self.look_lift,
                }
            }
            None => CameraPose {
                position: self.overview_position,
                look_at: Vec3::new(self.avatar_rest.x, self.look_lift, self.avatar_rest.z),
            },
        }
    }

    /// Interpolation factor for a frame of `dt` seconds, in `[0, 1]`.
    #[must_use]
    pub fn alpha(&self, dt: f32) -> f32 {
        (self.rate * dt).clamp(0.0, 1.0)
    }

    /// One smoothing step from `current` toward `target`.
    #[must_use]
    pub fn step(&self, current: CameraPose, target: CameraPose, dt: f32) -> CameraPose {
        current.lerp(target, self.alpha(dt))
    }

    /// Moves the camera transform and the orbit focus one step toward the
    /// target for `active`, then re-aims the camera.
    pub fn update(
        &self,
        active: Option<&Waypoint>,
        dt: f32,
        transform: &mut Transform,
        controls: &mut OrbitControls,
    ) -> CameraPose {
        let current = CameraPose {
            position: transform.position,
            look_at: controls.center,
        };
        let next = self.step(current, self.target(active), dt);

        transform.position = next.position;
        controls.center = next.look_at;
        transform.look_at(next.look_at, Vec3::Y);
        next
    }
}

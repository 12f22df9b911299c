//! The portfolio scene.
//!
//! [`Experience`] composes the journey's pieces into one scene and runs them
//! every frame:
//!
//! - [`Composer`]: click-driven state ([`Stage`], requested clip)
//! - [`AvatarController`]: plays the requested clip on the avatar model
//! - [`CameraRig`]: eases the camera toward the overview or a waypoint
//! - [`StationMarker`]: one clickable sphere per waypoint
//! - [`PhysicsProps`]: decorative falling cubes

pub mod avatar;
pub mod camera_rig;
pub mod journey;
pub mod props;
pub mod state;
pub mod station;

pub use avatar::AvatarController;
pub use camera_rig::{CameraPose, CameraRig};
pub use journey::{ClipPolicy, HERO_DROP_CLIP, IDLE_CLIP, Waypoint, default_journey};
pub use props::PhysicsProps;
pub use state::{Composer, SceneState, Stage};
pub use station::StationMarker;

use glam::{Vec2, Vec3};

use crate::app::input::Input;
use crate::assets::LoadedModel;
use crate::scene::{Camera, Scene, Transform};
use crate::settings::{ExperienceSettings, RenderSettings};
use crate::utils::OrbitControls;

/// Overlay panel of the focused waypoint, positioned on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPanel {
    pub index: usize,
    pub title: String,
    pub text: String,
    /// Screen position (physical pixels, top-left origin) of the anchor.
    pub anchor: Vec2,
}

/// Everything in the scene that reacts to time or the pointer.
pub struct Experience {
    composer: Composer,
    avatar: Option<AvatarController>,
    finished_clips: Option<flume::Receiver<String>>,
    rig: CameraRig,
    controls: OrbitControls,
    markers: Vec<StationMarker>,
    props: PhysicsProps,
    hovered: Option<usize>,
}

impl Experience {
    /// Builds the scene: environment, camera, avatar (when a model is
    /// given), one marker per waypoint and the physics props.
    pub fn new(
        scene: &mut Scene,
        settings: &ExperienceSettings,
        render: &RenderSettings,
        model: Option<LoadedModel>,
        aspect: f32,
    ) -> Self {
        scene.environment = crate::scene::Environment::from_settings(render);

        let waypoints = settings.journey();
        let mut composer = Composer::new(waypoints.clone(), &settings.idle_clip, &settings.hero_clip);

        let avatar_rest = settings.avatar_position();
        let rig = CameraRig::new(&settings.camera, avatar_rest);
        let start = rig.target(None);

        let camera = Camera::new_perspective(render.fov, aspect, render.near, render.far);
        let mut camera_transform = Transform::from_position(start.position);
        camera_transform.look_at(start.look_at, Vec3::Y);
        scene.add_camera(camera, camera_transform);
        let controls = OrbitControls::new(start.look_at);

        let policy = ClipPolicy::with_one_shot(&settings.hero_clip);
        let mut avatar = model.map(|model| {
            AvatarController::new(
                scene,
                model,
                avatar_rest,
                settings.avatar_scale,
                policy,
                settings.fade_duration,
            )
        });
        let finished_clips = avatar.as_ref().map(AvatarController::finished_clips);
        match avatar.as_mut() {
            Some(avatar) => avatar.request(composer.requested_clip(), scene),
            None => {
                log::warn!("No avatar model; skipping the intro");
                let intro = settings.hero_clip.clone();
                composer.on_clip_finished(&intro);
            }
        }

        let geometry = station::marker_geometry();
        let markers = waypoints
            .into_iter()
            .enumerate()
            .map(|(i, waypoint)| {
                StationMarker::spawn(scene, i, waypoint, geometry.clone(), settings.hover_scale)
            })
            .collect();

        let props = PhysicsProps::spawn(scene, &settings.props);

        Self {
            composer,
            avatar,
            finished_clips,
            rig,
            controls,
            markers,
            props,
            hovered: None,
        }
    }

    #[must_use]
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    #[must_use]
    pub fn avatar(&self) -> Option<&AvatarController> {
        self.avatar.as_ref()
    }

    #[must_use]
    pub fn markers(&self) -> &[StationMarker] {
        &self.markers
    }

    #[must_use]
    pub fn props(&self) -> &PhysicsProps {
        &self.props
    }

    #[must_use]
    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    /// Marker under the pointer, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// A click on marker `k`, or on its panel's close control when `closing`.
    pub fn handle_click(&mut self, k: usize, closing: bool) {
        if closing {
            self.composer.close(k);
        } else {
            self.composer.click(k);
        }
    }

    /// Advances the scene by `dt` seconds: pointer picking, clip requests,
    /// animation, markers, physics and camera, in that order.
    pub fn update(&mut self, dt: f32, scene: &mut Scene, input: &Input) {
        self.handle_pointer(scene, input);

        if let Some(avatar) = &mut self.avatar {
            avatar.request(self.composer.requested_clip(), scene);
            avatar.update(dt, scene);
        }
        if let Some(rx) = &self.finished_clips {
            for clip in rx.try_iter() {
                if self.composer.on_clip_finished(&clip) {
                    log::info!("Intro finished");
                }
            }
        }
        // An intro-end transition changes the requested clip; apply it now.
        if let Some(avatar) = &mut self.avatar {
            avatar.request(self.composer.requested_clip(), scene);
        }

        let active = self.composer.state().active_waypoint();
        for marker in &mut self.markers {
            marker.update(dt, active == Some(marker.index), scene);
        }

        self.props.update(dt, scene);

        if let Some((transform, camera)) = scene.query_main_camera_bundle() {
            self.rig
                .update(self.composer.active_waypoint(), dt, transform, &mut self.controls);
            self.controls.update(transform, input, camera.fov_degrees(), dt);
        }
    }

    fn handle_pointer(&mut self, scene: &Scene, input: &Input) {
        let Some(camera) = scene.main_camera() else {
            return;
        };
        let size = input.screen_size();

        let hovered = input
            .hover_position()
            .and_then(|p| station::pick_nearest(&self.markers, &camera.screen_ray(p, size)));
        if hovered != self.hovered {
            for marker in &mut self.markers {
                marker.set_hovered(Some(marker.index) == hovered);
            }
            self.hovered = hovered;
        }

        if let Some(p) = input.click()
            && let Some(k) = station::pick_nearest(&self.markers, &camera.screen_ray(p, size))
        {
            self.handle_click(k, false);
        }
    }

    /// Panel of the focused marker, projected to the screen.
    #[must_use]
    pub fn overlay_panels(&self, scene: &Scene, screen_size: Vec2) -> Vec<OverlayPanel> {
        let Some(k) = self.composer.state().active_waypoint() else {
            return Vec::new();
        };
        let (Some(marker), Some(camera)) = (self.markers.get(k), scene.main_camera()) else {
            return Vec::new();
        };
        camera
            .world_to_screen(marker.overlay_anchor(), screen_size)
            .map(|anchor| OverlayPanel {
                index: k,
                title: marker.waypoint.title.clone(),
                text: marker.waypoint.text.clone(),
                anchor,
            })
            .into_iter()
            .collect()
    }
}

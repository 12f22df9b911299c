use std::sync::Arc;

use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use rapier3d::prelude::*;

use crate::resources::primitives::create_box;
use crate::resources::{Material, Mesh};
use crate::scene::{Node, NodeHandle, Scene};
use crate::settings::PropSettings;

/// Simulation step; frame time is consumed in steps of this size.
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
/// Steps taken at most per frame, so a stalled frame cannot spiral.
const MAX_SUBSTEPS: u32 = 5;
const GRAVITY: f32 = -9.81;

pub const CUBE_COLORS: [&str; 3] = ["#ff6347", "#4682b4", "#3cb371"];
pub const GROUND_COLOR: &str = "#eeeeee";
/// Half extents of the ground slab; its top face sits at y = 0.
pub const GROUND_HALF_EXTENTS: [f32; 3] = [10.0, 0.1, 10.0];
/// Horizontal spread of the spawn area, centred on the origin.
const SPAWN_SPREAD: f32 = 10.0;

/// Spawn point of cube `i`: random x/z in `[-5, 5)` and height `2 + 0.5 i`.
#[must_use]
pub fn spawn_positions(count: usize, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let x = (rng.random_range(0.0..1.0_f32) - 0.5) * SPAWN_SPREAD;
            let z = (rng.random_range(0.0..1.0_f32) - 0.5) * SPAWN_SPREAD;
            Vec3::new(x, 2.0 + i as f32 * 0.5, z)
        })
        .collect()
}

struct Cube {
    body: RigidBodyHandle,
    node: NodeHandle,
}

/// Decorative cubes falling onto a fixed ground slab.
pub struct PhysicsProps {
    physics_pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,

    cubes: Vec<Cube>,
    ground: NodeHandle,
    accumulator: f32,
}

impl PhysicsProps {
    /// Builds the physics world and the matching scene nodes.
    pub fn spawn(scene: &mut Scene, settings: &PropSettings) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = FIXED_TIMESTEP;

        let mut rigid_body_set = RigidBodySet::new();
        let mut collider_set = ColliderSet::new();

        let [hx, hy, hz] = GROUND_HALF_EXTENTS;
        let ground_body = RigidBodyBuilder::fixed().translation(vector![0.0, -hy, 0.0]).build();
        let ground_handle = rigid_body_set.insert(ground_body);
        collider_set.insert_with_parent(
            ColliderBuilder::cuboid(hx, hy, hz).friction(0.8).build(),
            ground_handle,
            &mut rigid_body_set,
        );

        let ground_mesh = Mesh::new(
            "ground",
            Arc::new(create_box(hx * 2.0, hy * 2.0, hz * 2.0)),
            Material::from_hex(GROUND_COLOR),
        )
        .with_shadows(false, true);
        let mut ground_node = Node::new("ground");
        ground_node.transform.position = Vec3::new(0.0, -hy, 0.0);
        let ground = scene.add_node(ground_node);
        scene.set_mesh(ground, ground_mesh);

        let size = settings.size;
        let cube_geometry = Arc::new(create_box(size, size, size));
        let half = size * 0.5;

        let mut cubes = Vec::with_capacity(settings.count);
        for (i, position) in spawn_positions(settings.count, settings.seed).into_iter().enumerate() {
            let body = RigidBodyBuilder::dynamic()
                .translation(vector![position.x, position.y, position.z])
                .build();
            let body = rigid_body_set.insert(body);
            collider_set.insert_with_parent(
                ColliderBuilder::cuboid(half, half, half)
                    .restitution(0.2)
                    .friction(0.6)
                    .build(),
                body,
                &mut rigid_body_set,
            );

            let mesh = Mesh::new(
                format!("cube_{i}"),
                cube_geometry.clone(),
                Material::from_hex(CUBE_COLORS[i % CUBE_COLORS.len()]),
            )
            .with_shadows(true, true);
            let mut node = Node::new(format!("cube_{i}"));
            node.transform.position = position;
            let node = scene.add_node(node);
            scene.set_mesh(node, mesh);

            cubes.push(Cube { body, node });
        }

        log::info!("Spawned {} physics cube(s)", cubes.len());

        Self {
            physics_pipeline: PhysicsPipeline::new(),
            integration_parameters,
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set,
            collider_set,
            cubes,
            ground,
            accumulator: 0.0,
        }
    }

    #[must_use]
    pub fn ground(&self) -> NodeHandle {
        self.ground
    }

    #[must_use]
    pub fn cube_count(&self) -> usize {
        self.cubes.len()
    }

    /// Runs as many fixed steps as `dt` covers and copies the body poses to
    /// the cube nodes.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        self.accumulator = (self.accumulator + dt.max(0.0)).min(FIXED_TIMESTEP * MAX_SUBSTEPS as f32);
        while self.accumulator >= FIXED_TIMESTEP {
            self.step();
            self.accumulator -= FIXED_TIMESTEP;
        }
        self.sync(scene);
    }

    fn step(&mut self) {
        self.physics_pipeline.step(
            &vector![0.0, GRAVITY, 0.0],
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    fn sync(&self, scene: &mut Scene) {
        for cube in &self.cubes {
            let Some(body) = self.rigid_body_set.get(cube.body) else {
                continue;
            };
            let Some(node) = scene.get_node_mut(cube.node) else {
                continue;
            };
            let t = body.translation();
            let r = body.rotation();
            node.transform.position = Vec3::new(t.x, t.y, t.z);
            node.transform.rotation = Quat::from_xyzw(r.i, r.j, r.k, r.w);
        }
    }

    /// World positions of the cube bodies.
    #[must_use]
    pub fn cube_positions(&self) -> Vec<Vec3> {
        self.cubes
            .iter()
            .filter_map(|cube| self.rigid_body_set.get(cube.body))
            .map(|body| {
                let t = body.translation();
                Vec3::new(t.x, t.y, t.z)
            })
            .collect()
    }

    /// Whether every cube has come to rest.
    #[must_use]
    pub fn all_sleeping(&self) -> bool {
        self.cubes
            .iter()
            .filter_map(|cube| self.rigid_body_set.get(cube.body))
            .all(|body| body.is_sleeping() || body.linvel().norm() < 1e-2)
    }
}

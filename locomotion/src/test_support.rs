//! Scripted collaborators for unit tests.

use std::cell::RefCell;

use crate::{
    capability::{
        AnimatorParams, CameraBasis, Collaborators, KinematicMover, PlanarCamera, ProbeHit,
        SceneQuery,
    },
    ik::ArmIk,
    settings::LocomotionSettings,
    types::Vec3,
};

/// Scene returning fixed probe results.
///
/// - Sphere casts hit iff `ground` is set.
/// - Rays pointing mostly down return `down_ray`; every other ray returns `forward_ray`.
/// - All casts are recorded.
#[derive(Default)]
pub struct ScriptedScene {
    pub ground: bool,
    pub down_ray: Option<ProbeHit>,
    pub forward_ray: Option<ProbeHit>,
    pub rays: RefCell<Vec<(Vec3, Vec3, f32)>>,
    pub spheres: RefCell<Vec<(Vec3, f32, Vec3, f32)>>,
}

impl ScriptedScene {
    pub fn grounded() -> Self {
        Self {
            ground: true,
            ..Self::default()
        }
    }
}

impl SceneQuery for ScriptedScene {
    fn cast_ray(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> Option<ProbeHit> {
        self.rays.borrow_mut().push((origin, dir, max_dist));
        if dir.y < -0.5 {
            self.down_ray
        } else {
            self.forward_ray
        }
    }

    fn cast_sphere(&self, origin: Vec3, radius: f32, dir: Vec3, max_dist: f32) -> Option<f32> {
        self.spheres
            .borrow_mut()
            .push((origin, radius, dir, max_dist));
        self.ground.then_some(0.0)
    }
}

/// Mover in empty space: applies every displacement unchanged and records it.
#[derive(Default)]
pub struct RecordingMover {
    pub moves: Vec<Vec3>,
}

impl KinematicMover for RecordingMover {
    fn move_character(&mut self, _position: Vec3, displacement: Vec3, _dt: f32) -> Vec3 {
        self.moves.push(displacement);
        displacement
    }
}

/// Every collaborator a controller test needs, owned in one place.
pub struct TestRig {
    pub scene: ScriptedScene,
    pub camera: PlanarCamera,
    pub mover: RecordingMover,
    pub animator: AnimatorParams,
    pub ik: ArmIk,
}

impl TestRig {
    pub fn new(settings: &LocomotionSettings) -> Self {
        Self {
            scene: ScriptedScene::grounded(),
            camera: PlanarCamera::default(),
            mover: RecordingMover::default(),
            animator: AnimatorParams::default(),
            ik: ArmIk::new(&settings.ik, Vec3::new(-0.2, 1.0, 0.0), Vec3::new(0.2, 1.0, 0.0)),
        }
    }

    pub fn frame(&mut self) -> Collaborators<'_> {
        Collaborators {
            scene: &self.scene,
            camera: &self.camera as &dyn CameraBasis,
            mover: &mut self.mover,
            animator: &mut self.animator,
            ik: &mut self.ik,
        }
    }
}

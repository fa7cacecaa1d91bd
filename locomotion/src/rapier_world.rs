//! Rapier-backed scene queries and character mover for static level geometry.
//!
//! Design goals
//! - Deterministic: given the same inputs (sorted by `id`), build identical in-memory sets.
//! - Query-focused: backs [`SceneQuery`] probes and the Rapier `KinematicCharacterController`.
//! - Immutable world: statics do not move after construction.
//!
//! Every collider carries a [`Surface`] classification in its `user_data`. Probes only see
//! `Surface::Ground`; the mover collides with every fixed collider.

// Re-export Rapier so hosts can build shapes and filters without depending on `rapier3d` directly.
pub use rapier3d;

use rapier3d::control::{CharacterLength, KinematicCharacterController};
use rapier3d::na::{Translation3, UnitQuaternion};
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::prelude::*;

use crate::{
    DIST_EPS,
    capability::{KinematicMover, ProbeHit, SceneQuery},
    types::{CapsuleSpec, Vec3},
};

/// Collision classification of a static collider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Surface {
    /// Walkable and grabbable: ground, ledges, climbable walls.
    #[default]
    Ground,
    /// Solid but invisible to the locomotion probes.
    Prop,
}

impl Surface {
    fn user_data(self) -> u128 {
        match self {
            Surface::Ground => 0,
            Surface::Prop => 1,
        }
    }

    fn from_user_data(data: u128) -> Self {
        match data {
            0 => Surface::Ground,
            _ => Surface::Prop,
        }
    }
}

/// Definition of an immutable level collider.
///
/// Conventions
/// - Units are meters.
/// - Rotation is a unit quaternion.
/// - For planes, the normal is pose-derived: `normal = rotation * +Y`,
///   and `dist = dot(normal, translation) + offset_along_normal`.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable unique identifier used to ensure deterministic insertion order.
    pub id: u32,
    pub translation: Vector<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub shape: ColliderShapeDef,
    pub surface: Surface,
}

impl WorldStaticDef {
    /// Axis-aligned definition at `translation`.
    pub fn new(
        id: u32,
        translation: Vector<f32>,
        shape: ColliderShapeDef,
        surface: Surface,
    ) -> Self {
        Self {
            id,
            translation,
            rotation: UnitQuaternion::identity(),
            shape,
            surface,
        }
    }
}

/// Supported static collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space) offset along its pose-derived normal.
    Plane { offset_along_normal: f32 },

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vector<f32> },

    /// Y-aligned cylinder (meters).
    CylinderY { radius: f32, half_height: f32 },
}

/// In-memory Rapier structures needed for scene queries and KCC against a static level.
pub struct RapierQueryWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
}

impl RapierQueryWorld {
    /// Build a query world from a list of static collider definitions.
    ///
    /// The input is sorted by `id` before insertion. NaN/invalid values should be rejected by
    /// the caller.
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        for def in defs.iter() {
            let iso = Isometry::from_parts(Translation3::from(def.translation), def.rotation);

            let rb = RigidBodyBuilder::fixed().pose(iso).build();
            let rb_handle = bodies.insert(rb);

            let collider = collider_from_def(def);
            colliders.insert_with_parent(collider, rb_handle, &mut bodies);
        }

        // Collision detection only (no dynamics): updates the broad-phase BVH and the
        // narrow-phase so queries can run.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut narrow_phase = NarrowPhase::new();
        let mut collision_pipeline = CollisionPipeline::new();
        collision_pipeline.step(
            0.0,
            &mut broad_phase,
            &mut narrow_phase,
            &mut bodies,
            &mut colliders,
            &(),
            &(),
        );

        log::debug!("built query world with {} static colliders", defs.len());

        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase,
        }
    }

    /// Borrowed `QueryPipeline` view for scene queries and KCC.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    fn ground_pipeline(&self) -> QueryPipeline<'_> {
        self.query_pipeline(QueryFilter::default().predicate(&is_ground))
    }
}

fn is_ground(_handle: ColliderHandle, collider: &Collider) -> bool {
    Surface::from_user_data(collider.user_data) == Surface::Ground
}

impl SceneQuery for RapierQueryWorld {
    fn cast_ray(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> Option<ProbeHit> {
        let dir = dir.try_normalize(DIST_EPS)?;
        let ray = Ray::new(origin.into(), dir);
        let pipeline = self.ground_pipeline();

        let (_handle, hit) = pipeline.cast_ray_and_get_normal(&ray, max_dist.max(0.0), true)?;
        Some(ProbeHit {
            point: ray.point_at(hit.time_of_impact).coords,
            normal: hit.normal,
            distance: hit.time_of_impact,
        })
    }

    fn cast_sphere(&self, origin: Vec3, radius: f32, dir: Vec3, max_dist: f32) -> Option<f32> {
        let dir = dir.try_normalize(DIST_EPS)?;
        let pipeline = self.ground_pipeline();
        let options = ShapeCastOptions::with_max_time_of_impact(max_dist.max(0.0));

        let (_handle, hit) = pipeline.cast_shape(
            &Isometry::translation(origin.x, origin.y, origin.z),
            &dir,
            &Ball::new(radius),
            options,
        )?;
        Some(hit.time_of_impact)
    }
}

/// `KinematicMover` over the character capsule, colliding with every fixed collider.
pub struct RapierMover<'w> {
    world: &'w RapierQueryWorld,
    controller: KinematicCharacterController,
    capsule: CapsuleSpec,
}

impl<'w> RapierMover<'w> {
    pub fn new(world: &'w RapierQueryWorld, capsule: CapsuleSpec) -> Self {
        let controller = KinematicCharacterController {
            offset: CharacterLength::Relative(0.025),
            snap_to_ground: None,
            autostep: None,
            ..KinematicCharacterController::default()
        };
        Self {
            world,
            controller,
            capsule,
        }
    }
}

impl KinematicMover for RapierMover<'_> {
    fn move_character(&mut self, position: Vec3, displacement: Vec3, dt: f32) -> Vec3 {
        let pipeline = self.world.query_pipeline(QueryFilter::only_fixed());
        let center = position + Vec3::y() * self.capsule.center_height();

        let corrected = self.controller.move_shape(
            dt,
            &pipeline,
            &Capsule::new_y(self.capsule.half_height, self.capsule.radius),
            &Isometry::translation(center.x, center.y, center.z),
            displacement,
            |_| {},
        );

        corrected.translation
    }
}

/// Build a Rapier collider from a `WorldStaticDef`.
///
/// The pose lives on the parent rigid-body, so the collider has an identity local transform
/// (planes excepted, see below).
fn collider_from_def(def: &WorldStaticDef) -> Collider {
    let builder = match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => {
            // n ⋅ x = dist, with dist = n ⋅ t + offset for pose translation t.
            let n = def.rotation * Vector::y();
            let dist = n.dot(&def.translation) + *offset_along_normal;
            let unit_n = UnitVector::new_normalize(n);

            ColliderBuilder::new(SharedShape::new(HalfSpace::new(unit_n)))
                .translation(unit_n.into_inner() * dist)
        }

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }

        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => ColliderBuilder::cylinder(*half_height, *radius),
    };

    builder.user_data(def.surface.user_data()).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::EnvironmentSensor;
    use crate::settings::LocomotionSettings;
    use crate::types::{CharacterTransform, Quat};

    fn ground_plane(id: u32, surface: Surface) -> WorldStaticDef {
        WorldStaticDef::new(
            id,
            vector![0.0, 0.0, 0.0],
            ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
            surface,
        )
    }

    /// 4 x 2.6 x 2 block whose top is at y = 2.6 and whose +Z face is at z = -3.
    fn ledge_block(id: u32, surface: Surface) -> WorldStaticDef {
        WorldStaticDef::new(
            id,
            vector![0.0, 1.3, -4.0],
            ColliderShapeDef::Cuboid {
                half_extents: vector![2.0, 1.3, 1.0],
            },
            surface,
        )
    }

    fn at(x: f32, y: f32, z: f32) -> CharacterTransform {
        CharacterTransform::new(Vec3::new(x, y, z), Quat::identity())
    }

    #[test]
    fn standing_on_plane_is_grounded() {
        let world = RapierQueryWorld::build(vec![ground_plane(1, Surface::Ground)]);
        let sensor = EnvironmentSensor::new(&LocomotionSettings::default());

        assert!(sensor.is_grounded(&world, &at(0.0, 0.0, 0.0)));
        assert!(sensor.is_grounded(&world, &at(3.0, 0.15, -7.0)));
        assert!(!sensor.is_grounded(&world, &at(0.0, 5.0, 0.0)));
    }

    #[test]
    fn props_are_invisible_to_probes() {
        let world = RapierQueryWorld::build(vec![ground_plane(1, Surface::Prop)]);
        let sensor = EnvironmentSensor::new(&LocomotionSettings::default());

        assert!(!sensor.is_grounded(&world, &at(0.0, 0.0, 0.0)));
        assert!(world.cast_ray(Vec3::new(0.0, 1.0, 0.0), -Vec3::y(), 5.0).is_none());
    }

    #[test]
    fn ray_reports_point_and_normal() {
        let world = RapierQueryWorld::build(vec![ledge_block(1, Surface::Ground)]);

        let hit = world
            .cast_ray(Vec3::new(0.5, 3.0, -4.0), -Vec3::y(), 1.0)
            .expect("ray should hit the block top");
        assert!((hit.point - Vec3::new(0.5, 2.6, -4.0)).norm() < 1.0e-4);
        assert!((hit.normal - Vec3::y()).norm() < 1.0e-4);
        assert!((hit.distance - 0.4).abs() < 1.0e-4);

        assert!(world.cast_ray(Vec3::new(0.5, 3.0, -4.0), -Vec3::y(), 0.3).is_none());
    }

    #[test]
    fn ledge_probe_against_block() {
        let world = RapierQueryWorld::build(vec![
            ledge_block(2, Surface::Ground),
            ground_plane(1, Surface::Ground),
        ]);
        let settings = LocomotionSettings::default();
        let sensor = EnvironmentSensor::new(&settings);
        let current = at(0.0, 0.8, -2.5);

        let ledge = sensor
            .probe_ledge(&world, &current)
            .expect("both ledge probes should hit");
        assert!((ledge.top_height - 2.6).abs() < 1.0e-4);
        assert!((ledge.face_point - Vec3::new(0.0, 2.3, -3.0)).norm() < 1.0e-4);
        assert!((ledge.normal - Vec3::z()).norm() < 1.0e-4);

        let snapped = ledge.grab_transform(&settings.ledge, &current);
        assert!((snapped.position - Vec3::new(0.0, 0.3, -2.8)).norm() < 1.0e-4);
        assert!((snapped.forward() + Vec3::z()).norm() < 1.0e-4);

        // Too far from the wall: the face ray falls short.
        assert!(sensor.probe_ledge(&world, &at(0.0, 0.8, -1.5)).is_none());
    }

    #[test]
    fn mover_is_blocked_by_walls_and_props() {
        for surface in [Surface::Ground, Surface::Prop] {
            let world = RapierQueryWorld::build(vec![ledge_block(1, surface)]);
            let mut mover = RapierMover::new(&world, CapsuleSpec::default());

            let applied =
                mover.move_character(Vec3::new(0.0, 0.0, -2.0), Vec3::new(0.0, 0.0, -2.0), 0.1);
            assert!(applied.z > -0.75, "surface={surface:?} applied={applied:?}");
            assert!(applied.z < -0.5, "surface={surface:?} applied={applied:?}");
        }
    }

    #[test]
    fn mover_moves_freely_in_open_space() {
        let world = RapierQueryWorld::build(vec![ledge_block(1, Surface::Ground)]);
        let mut mover = RapierMover::new(&world, CapsuleSpec::default());

        let applied =
            mover.move_character(Vec3::new(0.0, 0.0, 5.0), Vec3::new(1.0, 0.0, 0.0), 0.1);
        assert!((applied - Vec3::new(1.0, 0.0, 0.0)).norm() < 1.0e-3);
    }
}

//! Ray queries over circle colliders.
//!
//! Everything solid in the arena is a circle: wall elements and unit bodies.
//! The [`RaycastProvider`] trait is the seam between the simulation core and
//! whatever supplies collision geometry; [`CirclePhysics`] is the built-in
//! deterministic provider over the map's elements plus a snapshot of the
//! current unit circles.

use crate::engine::coordinates::Vec2;
use crate::models::{GameMap, TeamId, UnitId};

/// Offset added past a collider surface when starting a ray, so a unit never
/// hits its own body; also the inset applied to silhouette tangent points.
pub const RAY_STANDOFF: f32 = 0.01;

/// Stable identity of a collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderId {
    Unit { team_id: TeamId, unit_id: UnitId },
    MapElement(u32),
}

#[derive(Debug, Clone)]
pub struct RayHit {
    pub point: Vec2,
    pub distance: f32,
    /// Outward surface normal at the hit point.
    pub normal: Vec2,
    pub object: ColliderId,
}

/// Deterministic first-obstacle ray query. `max_distance` of `None` casts to
/// infinity. Must be deterministic for a fixed world state.
pub trait RaycastProvider {
    fn cast_ray(&self, origin: Vec2, direction: Vec2, max_distance: Option<f32>)
        -> Option<RayHit>;
}

/// Collision circle of one unit, snapshotted from the world store.
#[derive(Debug, Clone, Copy)]
pub struct UnitCircle {
    pub team_id: TeamId,
    pub unit_id: UnitId,
    pub position: Vec2,
    pub radius: f32,
}

/// Ray provider over the static map plus a unit snapshot taken at query time.
pub struct CirclePhysics<'a> {
    map: &'a GameMap,
    units: Vec<UnitCircle>,
}

impl<'a> CirclePhysics<'a> {
    pub fn new(map: &'a GameMap, units: Vec<UnitCircle>) -> Self {
        Self { map, units }
    }
}

impl RaycastProvider for CirclePhysics<'_> {
    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: Option<f32>,
    ) -> Option<RayHit> {
        let mut best: Option<(f32, Vec2, ColliderId)> = None;

        let mut consider = |t: Option<f32>, center: Vec2, object: ColliderId| {
            let t = match t {
                Some(t) => t,
                None => return,
            };
            if let Some(max) = max_distance {
                if t > max {
                    return;
                }
            }
            if best.as_ref().map_or(true, |(bt, _, _)| t < *bt) {
                best = Some((t, center, object));
            }
        };

        for element in &self.map.elements {
            consider(
                ray_circle(origin, direction, element.position, element.radius),
                element.position,
                ColliderId::MapElement(element.element_id),
            );
        }
        for unit in &self.units {
            consider(
                ray_circle(origin, direction, unit.position, unit.radius),
                unit.position,
                ColliderId::Unit { team_id: unit.team_id, unit_id: unit.unit_id },
            );
        }

        best.map(|(t, center, object)| {
            let point = origin + direction * t;
            let normal = (point - center)
                .try_normalize(1.0e-9)
                .unwrap_or_else(|| -direction);
            RayHit { point, distance: t, normal, object }
        })
    }
}

/// Distance along the ray to the first intersection with a circle, if any.
/// Rays starting inside a circle do not hit it.
fn ray_circle(origin: Vec2, direction: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let c = oc.dot(&oc) - radius * radius;
    if c < 0.0 {
        // Origin inside the circle.
        return None;
    }
    let b = oc.dot(&direction);
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    if t >= 0.0 {
        Some(t)
    } else {
        None
    }
}

//! Transient per-tick query results: ray hits and enemy sightings.

use serde::{Deserialize, Serialize};

use crate::engine::coordinates::Vec2;
use crate::models::{TeamId, UnitId};

/// Classification of what a ray struck, from the caster's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitKind {
    Friendly,
    Enemy,
    Map,
    /// The ray hit nothing; there is no accompanying [`HitData`].
    None,
    /// The requested direction was outside the caster's field of view; no
    /// ray was cast and there is no accompanying [`HitData`].
    OutOfFieldOfView,
}

/// Geometry of a ray hit.
#[derive(Debug, Clone, Serialize)]
pub struct HitData {
    pub point: Vec2,
    pub distance: f32,
    pub normal: Vec2,
    /// Identifier of the struck wall element; only present for [`HitKind::Map`].
    pub element_id: Option<u32>,
}

/// One opposing unit as perceived by an observer at the moment of the query.
/// Recomputed on every call, never cached.
#[derive(Debug, Clone, Serialize)]
pub struct EnemyObservation {
    pub team_id: TeamId,
    pub unit_id: UnitId,
    pub position: Vec2,
    pub heading: f32,
    pub direction: Vec2,
    /// The point on the silhouette that, when aimed at, gives the best chance
    /// of hitting: the midpoint of the two refined visibility bounds.
    pub best_shooting_point: Vec2,
    /// Angular width, from the observer, of the exposed part of the
    /// silhouette.
    pub seen_cone_angle: f32,
}

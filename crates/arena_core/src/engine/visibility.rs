//! Partial-silhouette visibility.
//!
//! Each opposing unit is modeled as a circle. Three candidate points on the
//! silhouette are probed directly (center, left tangent, right tangent); the
//! visible arc is then refined by bisection along the tangent chord until the
//! iteration budget runs out. The result per enemy is a best shooting point
//! (midpoint of the refined bounds) and the angular width of the exposed
//! silhouette as seen from the observer.
//!
//! The whole query is deterministic: probe order follows team/unit id order
//! and the raycast provider is pure geometry.

use crate::config::ArenaConfig;
use crate::engine::coordinates::{angle_between, perp_ccw, Vec2};
use crate::engine::physics::{CirclePhysics, ColliderId, RaycastProvider, RAY_STANDOFF};
use crate::engine::world::UnitStore;
use crate::models::{EnemyObservation, GameMap, UnitState};

/// Tangent candidates sit just inside the silhouette so the probe ray cannot
/// graze past the target's own boundary.
const TANGENT_INSET: f32 = 0.01;

/// A direction is in view iff its angle to the facing vector is strictly
/// less than half the field of view. Both arguments must be unit vectors.
#[inline]
pub(crate) fn in_field_of_view(facing: Vec2, direction: Vec2, half_fov: f32) -> bool {
    angle_between(facing, direction) < half_fov
}

/// Visibility probe for a single observer/target pair. `sees` combines the
/// field-of-view test with a line-of-sight ray that must strike the target
/// itself first.
struct SilhouetteProbe<'a> {
    origin: Vec2,
    facing: Vec2,
    half_fov: f32,
    standoff: f32,
    target: ColliderId,
    physics: &'a CirclePhysics<'a>,
}

impl SilhouetteProbe<'_> {
    fn sees(&self, point: Vec2) -> bool {
        let offset = point - self.origin;
        let distance = offset.norm();
        if distance <= self.standoff {
            // Point in contact with the observer's own body.
            return true;
        }
        let direction = offset / distance;
        if !in_field_of_view(self.facing, direction, self.half_fov) {
            return false;
        }
        let start = self.origin + direction * self.standoff;
        match self.physics.cast_ray(start, direction, None) {
            Some(hit) => hit.object == self.target,
            None => false,
        }
    }

    /// Bisect the chord from a known-visible point toward an unseen one,
    /// returning the visible point nearest `unseen` found within the budget.
    /// Never regresses: the result always passes `sees`.
    fn bisect(&self, visible: Vec2, unseen: Vec2, iterations: u32) -> Vec2 {
        let mut best = visible;
        let mut lo = visible;
        let mut hi = unseen;
        for _ in 0..iterations {
            let mid = (lo + hi) * 0.5;
            if self.sees(mid) {
                best = mid;
                lo = mid;
            } else {
                hi = mid;
            }
        }
        best
    }
}

/// Compute the set of opposing units the observer can currently see. Enemies
/// with no visible silhouette point are omitted entirely.
pub(crate) fn visible_enemies(
    observer: &UnitState,
    store: &UnitStore,
    map: &GameMap,
    config: &ArenaConfig,
) -> Vec<EnemyObservation> {
    let physics = CirclePhysics::new(map, store.unit_circles(config.unit_radius));
    let facing = observer.direction();
    let half_fov = config.half_fov();
    let iterations = config.visibility_iterations;

    let mut seen = Vec::new();
    for enemy in store.live_enemies(observer.team_id) {
        let toward = match (enemy.position - observer.position).try_normalize(1.0e-6) {
            Some(dir) => dir,
            None => continue,
        };
        let probe = SilhouetteProbe {
            origin: observer.position,
            facing,
            half_fov,
            standoff: config.unit_radius + RAY_STANDOFF,
            target: ColliderId::Unit {
                team_id: enemy.team_id,
                unit_id: enemy.unit_id,
            },
            physics: &physics,
        };

        let center = enemy.position;
        let side = perp_ccw(toward) * (config.unit_radius - TANGENT_INSET);
        let left = center + side;
        let right = center - side;

        let center_seen = probe.sees(center);
        let left_seen = probe.sees(left);
        let right_seen = probe.sees(right);

        let bounds = if center_seen {
            // Push unseen tangents outward from the center to widen the arc.
            let lb = if left_seen { left } else { probe.bisect(center, left, iterations) };
            let rb = if right_seen { right } else { probe.bisect(center, right, iterations) };
            Some((lb, rb))
        } else {
            match (left_seen, right_seen) {
                // Center obscured with both edges exposed: pull each tangent
                // inward and collapse both bounds onto the refined point
                // closer to the center. This degenerates the cone to a single
                // point; intentional, see DESIGN.md.
                (true, true) => {
                    let l = probe.bisect(left, center, iterations);
                    let r = probe.bisect(right, center, iterations);
                    let keep = if (l - center).norm_squared() <= (r - center).norm_squared() {
                        l
                    } else {
                        r
                    };
                    Some((keep, keep))
                }
                (true, false) => Some((left, probe.bisect(left, center, iterations))),
                (false, true) => Some((probe.bisect(right, center, iterations), right)),
                (false, false) => None,
            }
        };

        if let Some((a, b)) = bounds {
            let cone = match (
                (a - observer.position).try_normalize(1.0e-6),
                (b - observer.position).try_normalize(1.0e-6),
            ) {
                (Some(u), Some(v)) => angle_between(u, v),
                _ => 0.0,
            };
            seen.push(EnemyObservation {
                team_id: enemy.team_id,
                unit_id: enemy.unit_id,
                position: enemy.position,
                heading: enemy.heading,
                direction: enemy.direction(),
                best_shooting_point: (a + b) * 0.5,
                seen_cone_angle: cone,
            });
        }
    }
    seen
}

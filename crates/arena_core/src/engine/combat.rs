//! Combat resolver: shooting, hit classification, generic ray queries and
//! the shot-alert broadcast.

use std::collections::BTreeMap;
use std::f32::consts::PI;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::ArenaConfig;
use crate::engine::clock::SimClock;
use crate::engine::coordinates::{clamp01, is_normalized, rotate_vec, vec2, Vec2};
use crate::engine::events::{ArenaEvent, EffectsSink};
use crate::engine::physics::{CirclePhysics, ColliderId, RaycastProvider, RAY_STANDOFF};
use crate::engine::visibility::in_field_of_view;
use crate::engine::world::UnitStore;
use crate::error::{ArenaFault, Result};
use crate::models::{GameMap, HitData, HitKind, TeamId, UnitId, UnitState};

/// What a trigger pull produced. `alerts` carries the noisy shooter bearings
/// owed to every opposing team; the scheduler delivers them synchronously
/// before the firing team's update continues.
pub(crate) struct ShotResolution {
    pub fired: bool,
    pub alerts: Vec<(TeamId, BTreeMap<UnitId, Vec2>)>,
}

impl ShotResolution {
    fn held_fire() -> Self {
        Self { fired: false, alerts: Vec::new() }
    }
}

/// Fire the unit's weapon along its heading, perturbed by recoil. A no-op
/// while the cooldown runs. On an enemy hit the fixed shooting damage is
/// applied; friendly bodies absorb the shot without damage and self-hits are
/// ignored.
#[allow(clippy::too_many_arguments)]
pub(crate) fn shoot(
    store: &mut UnitStore,
    map: &GameMap,
    config: &ArenaConfig,
    clock: &SimClock,
    rng: &mut ChaCha8Rng,
    sink: &mut dyn EffectsSink,
    team_id: TeamId,
    unit_id: UnitId,
) -> Result<ShotResolution> {
    let shooter = store.unit(team_id, unit_id)?.clone();
    if clock.time() < shooter.next_shoot_time {
        return Ok(ShotResolution::held_fire());
    }
    store.set_next_shoot_time(team_id, unit_id, clock.time() + config.shooting_cooldown)?;

    // Everyone hears the shot before the projectile resolves.
    let alerts = shot_alerts(store, &shooter, map.size, rng);

    // Wider recoil cone while the shooter is on the move.
    let spread = if shooter.is_moving {
        config.shot_spread_moving
    } else {
        config.shot_spread
    };
    let wobble = if spread > 0.0 {
        rng.gen_range(-spread..=spread)
    } else {
        0.0
    };
    let aim = rotate_vec(vec2(1.0, wobble).normalize(), shooter.heading);
    let muzzle = shooter.position + shooter.direction() * (config.unit_radius + RAY_STANDOFF);

    let physics = CirclePhysics::new(map, store.unit_circles(config.unit_radius));
    match physics.cast_ray(muzzle, aim, None) {
        Some(hit) => {
            sink.notify(ArenaEvent::ProjectileFired {
                team_id,
                unit_id,
                from: muzzle,
                to: hit.point,
            });
            match hit.object {
                ColliderId::MapElement(_) => {
                    sink.notify(ArenaEvent::ImpactEffect { point: hit.point, normal: hit.normal });
                }
                ColliderId::Unit { team_id: t, unit_id: u } => {
                    if (t, u) == (team_id, unit_id) {
                        // Degenerate self-hit, explicitly ignored.
                    } else if t == team_id {
                        sink.notify(ArenaEvent::ImpactEffect {
                            point: hit.point,
                            normal: hit.normal,
                        });
                    } else {
                        sink.notify(ArenaEvent::BloodEffect { point: hit.point });
                        if let Some(health) = store.damage(t, u, config.shooting_damage) {
                            sink.notify(ArenaEvent::HealthChanged {
                                team_id: t,
                                unit_id: u,
                                health,
                            });
                        }
                    }
                }
            }
        }
        None => {
            sink.notify(ArenaEvent::ProjectileFired {
                team_id,
                unit_id,
                from: muzzle,
                to: muzzle + aim * config.projectile_range,
            });
        }
    }
    Ok(ShotResolution { fired: true, alerts })
}

/// Noisy bearing toward the shooter for every live unit of every other team.
/// Noise magnitude eases from zero at point-blank to a bounded maximum at
/// map-scale range, so close listeners localize the shot well.
fn shot_alerts(
    store: &UnitStore,
    shooter: &UnitState,
    map_size: f32,
    rng: &mut ChaCha8Rng,
) -> Vec<(TeamId, BTreeMap<UnitId, Vec2>)> {
    let mut alerts = Vec::new();
    for team in store.teams() {
        if team.team_id == shooter.team_id {
            continue;
        }
        let mut bearings = BTreeMap::new();
        for listener in team.live_units() {
            let to_shooter = shooter.position - listener.position;
            let distance = to_shooter.norm();
            let true_bearing = if distance > 1.0e-6 {
                to_shooter / distance
            } else {
                vec2(1.0, 0.0)
            };
            let noise = eased_noise(clamp01(distance / map_size));
            let offset = if noise > 0.0 {
                vec2(rng.gen_range(-noise..=noise), rng.gen_range(-noise..=noise))
            } else {
                Vec2::zeros()
            };
            let bearing = (true_bearing + offset)
                .try_normalize(1.0e-6)
                .unwrap_or(true_bearing);
            bearings.insert(listener.unit_id, bearing);
        }
        if !bearings.is_empty() {
            alerts.push((team.team_id, bearings));
        }
    }
    alerts
}

#[inline]
fn eased_noise(t: f32) -> f32 {
    -((PI * t).cos() - 1.0) / 5.0
}

/// Generic ray query from a unit. Directions outside the field of view short-
/// circuit to `OutOfFieldOfView` without casting. `max_distance`, when given,
/// must be positive.
pub(crate) fn cast_ray(
    store: &UnitStore,
    map: &GameMap,
    config: &ArenaConfig,
    team_id: TeamId,
    unit_id: UnitId,
    direction: Vec2,
    max_distance: Option<f32>,
) -> Result<(HitKind, Option<HitData>)> {
    if !is_normalized(direction) {
        return Err(ArenaFault::NotNormalized { magnitude: direction.norm() });
    }
    if let Some(d) = max_distance {
        if d <= 0.0 {
            return Err(ArenaFault::NonPositiveDistance(d));
        }
    }
    let unit = store.unit(team_id, unit_id)?;
    if !in_field_of_view(unit.direction(), direction, config.half_fov()) {
        return Ok((HitKind::OutOfFieldOfView, None));
    }
    let physics = CirclePhysics::new(map, store.unit_circles(config.unit_radius));
    let origin = unit.position + direction * (config.unit_radius + RAY_STANDOFF);
    match physics.cast_ray(origin, direction, max_distance) {
        Some(hit) => {
            let (kind, element_id) = match hit.object {
                ColliderId::MapElement(id) => (HitKind::Map, Some(id)),
                ColliderId::Unit { team_id: t, .. } if t == team_id => (HitKind::Friendly, None),
                ColliderId::Unit { .. } => (HitKind::Enemy, None),
            };
            Ok((
                kind,
                Some(HitData {
                    point: hit.point,
                    distance: hit.distance,
                    normal: hit.normal,
                    element_id,
                }),
            ))
        }
        None => Ok((HitKind::None, None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::events::EventLog;
    use crate::models::{MapElement, UnitState};
    use rand::SeedableRng;
    use std::f32::consts::PI;

    struct Fixture {
        store: UnitStore,
        map: GameMap,
        config: ArenaConfig,
        clock: SimClock,
        rng: ChaCha8Rng,
        log: EventLog,
    }

    /// Two units face to face on the X axis, ten units apart, no obstacles.
    fn head_on() -> Fixture {
        let mut store = UnitStore::new();
        store.register_team(1, "red".into());
        store.register_team(2, "blue".into());
        store.spawn_unit(UnitState::new(1, 0, vec2(-5.0, 0.0), 0.0));
        store.spawn_unit(UnitState::new(2, 0, vec2(5.0, 0.0), PI));
        Fixture {
            store,
            map: GameMap::open(100.0),
            config: ArenaConfig::training(),
            clock: SimClock::new(0.02),
            rng: ChaCha8Rng::seed_from_u64(7),
            log: EventLog::new(),
        }
    }

    #[test]
    fn test_head_on_shot_damages_enemy() {
        let mut f = head_on();
        let res = shoot(
            &mut f.store, &f.map, &f.config, &f.clock, &mut f.rng, &mut f.log, 1, 0,
        )
        .unwrap();
        assert!(res.fired);
        let target = f.store.unit(2, 0).unwrap();
        assert_eq!(target.health, 100.0 - f.config.shooting_damage);
        assert!(f
            .log
            .events()
            .iter()
            .any(|e| matches!(e, ArenaEvent::BloodEffect { .. })));
        assert!(f.log.events().iter().any(|e| matches!(
            e,
            ArenaEvent::HealthChanged { team_id: 2, unit_id: 0, .. }
        )));
    }

    #[test]
    fn test_alert_goes_to_opponents_only() {
        let mut f = head_on();
        let res = shoot(
            &mut f.store, &f.map, &f.config, &f.clock, &mut f.rng, &mut f.log, 1, 0,
        )
        .unwrap();
        assert_eq!(res.alerts.len(), 1);
        let (team_id, bearings) = &res.alerts[0];
        assert_eq!(*team_id, 2);
        // Listener at (5,0), shooter at (-5,0): bearing points along -X with
        // only a sliver of noise at this range.
        let bearing = bearings[&0];
        assert!(bearing.x < -0.9);
        assert!(is_normalized(bearing));
    }

    #[test]
    fn test_cooldown_holds_fire() {
        let mut f = head_on();
        assert!(shoot(&mut f.store, &f.map, &f.config, &f.clock, &mut f.rng, &mut f.log, 1, 0)
            .unwrap()
            .fired);
        let events_after_first = f.log.len();
        let res =
            shoot(&mut f.store, &f.map, &f.config, &f.clock, &mut f.rng, &mut f.log, 1, 0)
                .unwrap();
        assert!(!res.fired);
        assert!(res.alerts.is_empty());
        assert_eq!(f.log.len(), events_after_first);
        // Both shots in the same instant; target took damage once.
        assert_eq!(f.store.unit(2, 0).unwrap().health, 75.0);
    }

    #[test]
    fn test_cast_ray_classifies_map_hits() {
        let mut f = head_on();
        f.map = GameMap::with_elements(
            100.0,
            vec![MapElement { element_id: 3, position: vec2(0.0, 0.0), radius: 1.0 }],
        );
        let (kind, data) =
            cast_ray(&f.store, &f.map, &f.config, 1, 0, vec2(1.0, 0.0), None).unwrap();
        assert_eq!(kind, HitKind::Map);
        let data = data.unwrap();
        assert_eq!(data.element_id, Some(3));
        assert!((data.point.x + 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_cast_ray_sees_enemy_and_friendly() {
        let mut f = head_on();
        let (kind, _) = cast_ray(&f.store, &f.map, &f.config, 1, 0, vec2(1.0, 0.0), None).unwrap();
        assert_eq!(kind, HitKind::Enemy);

        // Park a teammate in front of the shooter.
        f.store.spawn_unit(UnitState::new(1, 1, vec2(0.0, 0.0), 0.0));
        let (kind, _) = cast_ray(&f.store, &f.map, &f.config, 1, 0, vec2(1.0, 0.0), None).unwrap();
        assert_eq!(kind, HitKind::Friendly);
    }

    #[test]
    fn test_cast_ray_preconditions() {
        let f = head_on();
        let err = cast_ray(&f.store, &f.map, &f.config, 1, 0, vec2(2.0, 0.0), None).unwrap_err();
        assert!(matches!(err, ArenaFault::NotNormalized { .. }));

        let err =
            cast_ray(&f.store, &f.map, &f.config, 1, 0, vec2(1.0, 0.0), Some(0.0)).unwrap_err();
        assert!(matches!(err, ArenaFault::NonPositiveDistance(_)));

        // Directly behind: outside the 90 degree cone, no ray cast.
        let (kind, data) =
            cast_ray(&f.store, &f.map, &f.config, 1, 0, vec2(-1.0, 0.0), None).unwrap();
        assert_eq!(kind, HitKind::OutOfFieldOfView);
        assert!(data.is_none());
    }

    #[test]
    fn test_max_distance_cuts_the_ray_short() {
        let f = head_on();
        let (kind, data) =
            cast_ray(&f.store, &f.map, &f.config, 1, 0, vec2(1.0, 0.0), Some(2.0)).unwrap();
        assert_eq!(kind, HitKind::None);
        assert!(data.is_none());
    }
}

//! Capability handle lent to team agents.
//!
//! A `TeamContext` scopes everything an agent may do to its own team: unit
//! queries, one move and one rotation per unit per tick, visibility queries,
//! ray casts and shooting. The handle borrows the engine's state for the
//! duration of a single callback; agents cannot stash it or reach the store
//! behind it.

use rand_chacha::ChaCha8Rng;

use crate::config::ArenaConfig;
use crate::engine::clock::SimClock;
use crate::engine::combat;
use crate::engine::coordinates::{heading_of, is_normalized, Vec2};
use crate::engine::events::EffectsSink;
use crate::engine::scheduler::{self, TeamSlot};
use crate::engine::visibility;
use crate::engine::world::UnitStore;
use crate::error::{ArenaFault, Result};
use crate::models::{
    EnemyObservation, GameMap, HitData, HitKind, TeamId, UnitId, UnitInfo, Zone,
};

pub struct TeamContext<'a, 'b> {
    team_id: TeamId,
    store: &'a mut UnitStore,
    map: &'a GameMap,
    zone: &'a Zone,
    clock: &'a SimClock,
    config: &'a ArenaConfig,
    rng: &'a mut ChaCha8Rng,
    sink: &'a mut dyn EffectsSink,
    /// The other teams' slots, for synchronous shot-alert delivery.
    listeners: &'a mut [&'b mut TeamSlot],
    disqualified: &'a mut Option<TeamId>,
}

impl<'a, 'b> TeamContext<'a, 'b> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        team_id: TeamId,
        store: &'a mut UnitStore,
        map: &'a GameMap,
        zone: &'a Zone,
        clock: &'a SimClock,
        config: &'a ArenaConfig,
        rng: &'a mut ChaCha8Rng,
        sink: &'a mut dyn EffectsSink,
        listeners: &'a mut [&'b mut TeamSlot],
        disqualified: &'a mut Option<TeamId>,
    ) -> Self {
        Self {
            team_id,
            store,
            map,
            zone,
            clock,
            config,
            rng,
            sink,
            listeners,
            disqualified,
        }
    }

    // ---- queries ---------------------------------------------------------

    pub fn team_id(&self) -> TeamId {
        self.team_id
    }

    pub fn time(&self) -> f32 {
        self.clock.time()
    }

    pub fn tick_delta(&self) -> f32 {
        self.clock.dt()
    }

    pub fn zone_radius(&self) -> f32 {
        self.zone.radius()
    }

    pub fn settings(&self) -> &ArenaConfig {
        self.config
    }

    pub fn map(&self) -> &GameMap {
        self.map
    }

    /// Ids of this team's live units, ascending.
    pub fn unit_ids(&self) -> Vec<UnitId> {
        self.store
            .team(self.team_id)
            .map(|t| t.live_unit_ids())
            .unwrap_or_default()
    }

    pub fn unit_info(&self, unit_id: UnitId) -> Result<UnitInfo> {
        self.store
            .unit_info(self.team_id, unit_id, self.zone, self.clock)
    }

    /// Everything this unit can currently see of the opposing teams.
    pub fn visible_enemies(&self, unit_id: UnitId) -> Result<Vec<EnemyObservation>> {
        let observer = self.store.unit(self.team_id, unit_id)?;
        Ok(visibility::visible_enemies(
            observer,
            self.store,
            self.map,
            self.config,
        ))
    }

    /// Whether a (unit vector) direction lies inside the unit's view cone.
    pub fn direction_in_field_of_view(&self, unit_id: UnitId, direction: Vec2) -> Result<bool> {
        if !is_normalized(direction) {
            return Err(ArenaFault::NotNormalized { magnitude: direction.norm() });
        }
        let unit = self.store.unit(self.team_id, unit_id)?;
        Ok(visibility::in_field_of_view(
            unit.direction(),
            direction,
            self.config.half_fov(),
        ))
    }

    pub fn point_in_field_of_view(&self, unit_id: UnitId, point: Vec2) -> Result<bool> {
        let unit = self.store.unit(self.team_id, unit_id)?;
        match (point - unit.position).try_normalize(1.0e-6) {
            Some(direction) => Ok(visibility::in_field_of_view(
                unit.direction(),
                direction,
                self.config.half_fov(),
            )),
            // The point is the unit's own position.
            None => Ok(true),
        }
    }

    /// Ray query to infinity along a unit-vector direction.
    pub fn cast_ray(
        &self,
        unit_id: UnitId,
        direction: Vec2,
    ) -> Result<(HitKind, Option<HitData>)> {
        combat::cast_ray(
            self.store, self.map, self.config, self.team_id, unit_id, direction, None,
        )
    }

    /// Ray query with an explicit maximum distance, which must be positive.
    pub fn cast_ray_limited(
        &self,
        unit_id: UnitId,
        direction: Vec2,
        max_distance: f32,
    ) -> Result<(HitKind, Option<HitData>)> {
        combat::cast_ray(
            self.store,
            self.map,
            self.config,
            self.team_id,
            unit_id,
            direction,
            Some(max_distance),
        )
    }

    /// Ray query toward a world point. With `stop_at_point` the ray is
    /// capped at the point's distance, otherwise it continues past it.
    pub fn cast_ray_towards_point(
        &self,
        unit_id: UnitId,
        point: Vec2,
        stop_at_point: bool,
    ) -> Result<(HitKind, Option<HitData>)> {
        let unit = self.store.unit(self.team_id, unit_id)?;
        let delta = point - unit.position;
        let distance = delta.norm();
        if distance <= 0.0 {
            return Err(ArenaFault::NonPositiveDistance(distance));
        }
        let max = stop_at_point.then_some(distance);
        combat::cast_ray(
            self.store,
            self.map,
            self.config,
            self.team_id,
            unit_id,
            delta / distance,
            max,
        )
    }

    // ---- actions ---------------------------------------------------------

    /// Move one step along a unit-vector direction. Returns `false` if the
    /// unit has already moved this tick.
    pub fn move_in_direction(&mut self, unit_id: UnitId, direction: Vec2) -> Result<bool> {
        let step = self.config.move_speed * self.clock.dt();
        self.store
            .try_move(self.team_id, unit_id, direction, step)
    }

    /// Move one step toward a world point.
    pub fn move_towards(&mut self, unit_id: UnitId, target: Vec2) -> Result<bool> {
        let step = self.config.move_speed * self.clock.dt();
        self.store
            .try_move_towards(self.team_id, unit_id, target, step)
    }

    /// Turn toward a unit-vector direction, at most one rotation step.
    pub fn rotate_towards(&mut self, unit_id: UnitId, direction: Vec2) -> Result<bool> {
        if !is_normalized(direction) {
            return Err(ArenaFault::NotNormalized { magnitude: direction.norm() });
        }
        let step = self.config.rotation_speed * self.clock.dt();
        self.store
            .try_rotate_towards(self.team_id, unit_id, heading_of(direction), step)
    }

    /// Turn toward a world point.
    pub fn rotate_towards_point(&mut self, unit_id: UnitId, point: Vec2) -> Result<bool> {
        let unit = self.store.unit(self.team_id, unit_id)?;
        let target = match (point - unit.position).try_normalize(1.0e-6) {
            Some(direction) => heading_of(direction),
            None => return Ok(false),
        };
        let step = self.config.rotation_speed * self.clock.dt();
        self.store
            .try_rotate_towards(self.team_id, unit_id, target, step)
    }

    /// Turn one rotation step clockwise or counterclockwise.
    pub fn rotate(&mut self, unit_id: UnitId, clockwise: bool) -> Result<bool> {
        let step = self.config.rotation_speed * self.clock.dt();
        self.store
            .try_rotate_step(self.team_id, unit_id, clockwise, step)
    }

    /// Fire the unit's weapon. Returns `false` while the cooldown runs.
    /// Opposing teams hear the shot before this call returns; a listener
    /// whose `on_shot_heard` fails is penalized on the spot.
    pub fn shoot(&mut self, unit_id: UnitId) -> Result<bool> {
        let resolution = combat::shoot(
            self.store,
            self.map,
            self.config,
            self.clock,
            self.rng,
            self.sink,
            self.team_id,
            unit_id,
        )?;
        for (team_id, bearings) in &resolution.alerts {
            if let Some(slot) = self.listeners.iter_mut().find(|s| s.team_id == *team_id) {
                if let Err(err) = slot.agent.on_shot_heard(bearings) {
                    let newly_out = scheduler::penalize(
                        self.store,
                        self.sink,
                        self.config,
                        *team_id,
                        self.disqualified,
                        &err.to_string(),
                    );
                    if newly_out {
                        scheduler::red_card_hook(&mut **slot);
                    }
                }
            }
        }
        Ok(resolution.fired)
    }
}

//! World state store: the single owner of all unit and team state.
//!
//! Every other component reads and mutates units exclusively through this
//! store's contract. Lookups of dead or unknown units fault: operating on a
//! dead unit is a programming error in agent code, surfaced rather than
//! silently ignored. Removal marking is idempotent so two hits landing on the
//! same unit within one tick cannot double-remove it.

use std::collections::BTreeMap;

use crate::engine::clock::SimClock;
use crate::engine::coordinates::{is_normalized, step_heading, wrap_angle, Vec2};
use crate::engine::physics::UnitCircle;
use crate::error::{ArenaFault, Result};
use crate::models::{TeamId, UnitId, UnitInfo, UnitState, Zone};

/// Per-team bookkeeping: the unit roster plus penalty state.
#[derive(Debug)]
pub struct CommandState {
    pub team_id: TeamId,
    pub name: String,
    pub(crate) units: BTreeMap<UnitId, UnitState>,
    yellow_card_count: u8,
    has_issued_red_card: bool,
}

impl CommandState {
    fn new(team_id: TeamId, name: String) -> Self {
        Self {
            team_id,
            name,
            units: BTreeMap::new(),
            yellow_card_count: 0,
            has_issued_red_card: false,
        }
    }

    pub fn yellow_card_count(&self) -> u8 {
        self.yellow_card_count
    }

    pub fn has_issued_red_card(&self) -> bool {
        self.has_issued_red_card
    }

    pub fn live_units(&self) -> impl Iterator<Item = &UnitState> {
        self.units.values().filter(|u| u.is_alive())
    }

    pub fn live_unit_ids(&self) -> Vec<UnitId> {
        self.live_units().map(|u| u.unit_id).collect()
    }

    pub fn has_live_units(&self) -> bool {
        self.live_units().next().is_some()
    }
}

#[derive(Debug, Default)]
pub struct UnitStore {
    teams: BTreeMap<TeamId, CommandState>,
    to_remove: Vec<(TeamId, UnitId)>,
}

impl UnitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register_team(&mut self, team_id: TeamId, name: String) {
        self.teams.insert(team_id, CommandState::new(team_id, name));
    }

    pub(crate) fn spawn_unit(&mut self, unit: UnitState) {
        if let Some(team) = self.teams.get_mut(&unit.team_id) {
            team.units.insert(unit.unit_id, unit);
        }
    }

    pub fn team(&self, team_id: TeamId) -> Option<&CommandState> {
        self.teams.get(&team_id)
    }

    /// Teams in ascending id order.
    pub fn teams(&self) -> impl Iterator<Item = &CommandState> {
        self.teams.values()
    }

    /// Look up a live unit. Faults if the unit is unknown or its health has
    /// reached zero, even when it is still awaiting purge.
    pub fn unit(&self, team_id: TeamId, unit_id: UnitId) -> Result<&UnitState> {
        self.teams
            .get(&team_id)
            .and_then(|t| t.units.get(&unit_id))
            .filter(|u| u.is_alive())
            .ok_or(ArenaFault::DeadUnit { team_id, unit_id })
    }

    fn unit_mut(&mut self, team_id: TeamId, unit_id: UnitId) -> Result<&mut UnitState> {
        self.teams
            .get_mut(&team_id)
            .and_then(|t| t.units.get_mut(&unit_id))
            .filter(|u| u.is_alive())
            .ok_or(ArenaFault::DeadUnit { team_id, unit_id })
    }

    /// All live units of every team.
    pub fn live_units(&self) -> impl Iterator<Item = &UnitState> {
        self.teams.values().flat_map(|t| t.live_units())
    }

    /// All live units belonging to teams other than `team_id`.
    pub fn live_enemies(&self, team_id: TeamId) -> impl Iterator<Item = &UnitState> {
        self.teams
            .values()
            .filter(move |t| t.team_id != team_id)
            .flat_map(|t| t.live_units())
    }

    /// Collision circles for every unit still in the store, including those
    /// awaiting purge; their bodies keep blocking rays until removal.
    pub fn unit_circles(&self, radius: f32) -> Vec<UnitCircle> {
        self.teams
            .values()
            .flat_map(|t| t.units.values())
            .map(|u| UnitCircle {
                team_id: u.team_id,
                unit_id: u.unit_id,
                position: u.position,
                radius,
            })
            .collect()
    }

    /// Read-only snapshot served to agent code.
    pub fn unit_info(
        &self,
        team_id: TeamId,
        unit_id: UnitId,
        zone: &Zone,
        clock: &SimClock,
    ) -> Result<UnitInfo> {
        let unit = self.unit(team_id, unit_id)?;
        Ok(UnitInfo {
            position: unit.position,
            heading: unit.heading,
            direction: unit.direction(),
            health: unit.health,
            has_moved: unit.has_moved,
            has_rotated: unit.has_rotated,
            is_moving: unit.is_moving,
            zone_distance: zone.distance_from_edge(unit.position),
            can_shoot: clock.time() >= unit.next_shoot_time,
            shoot_cooldown: (unit.next_shoot_time - clock.time()).max(0.0),
        })
    }

    // ---- per-tick maintenance -------------------------------------------

    /// Reset the one-action-per-kind flags. Called exactly once at tick start.
    pub(crate) fn reset_transient_flags(&mut self) {
        for unit in self.units_mut() {
            unit.has_moved = false;
            unit.has_rotated = false;
        }
    }

    /// Derive `is_moving` from `has_moved`. Called at tick end.
    pub(crate) fn derive_is_moving(&mut self) {
        for unit in self.units_mut() {
            unit.is_moving = unit.has_moved;
        }
    }

    fn units_mut(&mut self) -> impl Iterator<Item = &mut UnitState> {
        self.teams.values_mut().flat_map(|t| t.units.values_mut())
    }

    // ---- sanctioned mutations -------------------------------------------

    /// Displace a unit along a unit-vector direction. Returns `false` without
    /// moving if the unit already moved this tick.
    pub(crate) fn try_move(
        &mut self,
        team_id: TeamId,
        unit_id: UnitId,
        direction: Vec2,
        step: f32,
    ) -> Result<bool> {
        if !is_normalized(direction) {
            return Err(ArenaFault::NotNormalized { magnitude: direction.norm() });
        }
        let unit = self.unit_mut(team_id, unit_id)?;
        if unit.has_moved {
            return Ok(false);
        }
        unit.has_moved = true;
        unit.position += direction * step;
        Ok(true)
    }

    /// Move toward a target point; the direction is derived, so no
    /// normalization precondition applies. A target on top of the unit moves
    /// it nowhere but still consumes the tick's move.
    pub(crate) fn try_move_towards(
        &mut self,
        team_id: TeamId,
        unit_id: UnitId,
        target: Vec2,
        step: f32,
    ) -> Result<bool> {
        let unit = self.unit_mut(team_id, unit_id)?;
        if unit.has_moved {
            return Ok(false);
        }
        unit.has_moved = true;
        if let Some(direction) = (target - unit.position).try_normalize(1.0e-6) {
            unit.position += direction * step;
        }
        Ok(true)
    }

    /// Turn toward a target heading by at most `max_step` radians along the
    /// shorter arc. Returns `false` if the unit already rotated this tick.
    pub(crate) fn try_rotate_towards(
        &mut self,
        team_id: TeamId,
        unit_id: UnitId,
        target_heading: f32,
        max_step: f32,
    ) -> Result<bool> {
        let unit = self.unit_mut(team_id, unit_id)?;
        if unit.has_rotated {
            return Ok(false);
        }
        unit.has_rotated = true;
        unit.heading = step_heading(unit.heading, target_heading, max_step);
        Ok(true)
    }

    /// Turn a fixed step clockwise or counterclockwise.
    pub(crate) fn try_rotate_step(
        &mut self,
        team_id: TeamId,
        unit_id: UnitId,
        clockwise: bool,
        step: f32,
    ) -> Result<bool> {
        let unit = self.unit_mut(team_id, unit_id)?;
        if unit.has_rotated {
            return Ok(false);
        }
        unit.has_rotated = true;
        let delta = if clockwise { -step } else { step };
        unit.heading = wrap_angle(unit.heading + delta);
        Ok(true)
    }

    pub(crate) fn set_next_shoot_time(
        &mut self,
        team_id: TeamId,
        unit_id: UnitId,
        time: f32,
    ) -> Result<()> {
        self.unit_mut(team_id, unit_id)?.next_shoot_time = time;
        Ok(())
    }

    /// Apply damage to a unit, marking it for removal when health drops to
    /// zero or below. Works on units already awaiting purge. Returns the new
    /// health, or `None` if the unit is not in the store.
    pub(crate) fn damage(
        &mut self,
        team_id: TeamId,
        unit_id: UnitId,
        amount: f32,
    ) -> Option<f32> {
        let unit = self.teams.get_mut(&team_id)?.units.get_mut(&unit_id)?;
        unit.health -= amount;
        let health = unit.health;
        if health <= 0.0 {
            self.mark_for_removal(team_id, unit_id);
        }
        Some(health)
    }

    /// Queue a unit for removal at the end of the tick. Idempotent: marking
    /// an already-marked unit is a no-op.
    pub fn mark_for_removal(&mut self, team_id: TeamId, unit_id: UnitId) {
        let key = (team_id, unit_id);
        if !self.to_remove.contains(&key) {
            self.to_remove.push(key);
        }
    }

    /// Damage every unit outside the zone. Returns `(team, unit, new_health)`
    /// per damaged unit, in team/unit order.
    pub(crate) fn apply_zone_damage(&mut self, zone: &Zone, amount: f32) -> Vec<(TeamId, UnitId, f32)> {
        if amount <= 0.0 {
            return Vec::new();
        }
        let outside: Vec<(TeamId, UnitId)> = self
            .teams
            .values()
            .flat_map(|t| t.units.values())
            .filter(|u| !zone.contains(u.position))
            .map(|u| (u.team_id, u.unit_id))
            .collect();
        outside
            .into_iter()
            .filter_map(|(t, u)| self.damage(t, u, amount).map(|h| (t, u, h)))
            .collect()
    }

    /// Remove every queued unit from the store. Returns the removed ids in
    /// queue order; ids queued for already-removed units are dropped.
    pub(crate) fn purge_marked(&mut self) -> Vec<(TeamId, UnitId)> {
        let queued = std::mem::take(&mut self.to_remove);
        let mut removed = Vec::with_capacity(queued.len());
        for (team_id, unit_id) in queued {
            if let Some(team) = self.teams.get_mut(&team_id) {
                if team.units.remove(&unit_id).is_some() {
                    removed.push((team_id, unit_id));
                }
            }
        }
        removed
    }

    // ---- penalties ------------------------------------------------------

    /// Increment a team's yellow-card count; returns the new count.
    pub(crate) fn add_yellow_card(&mut self, team_id: TeamId) -> u8 {
        match self.teams.get_mut(&team_id) {
            Some(team) => {
                team.yellow_card_count = team.yellow_card_count.saturating_add(1);
                team.yellow_card_count
            }
            None => 0,
        }
    }

    /// Flag a team disqualified. Returns `true` only the first time; a team
    /// can be flagged once per round.
    pub(crate) fn issue_red_card(&mut self, team_id: TeamId) -> bool {
        match self.teams.get_mut(&team_id) {
            Some(team) if !team.has_issued_red_card => {
                team.has_issued_red_card = true;
                true
            }
            _ => false,
        }
    }
}

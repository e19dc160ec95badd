//! Unit state owned by the world store, plus the read-only snapshot served to
//! agent code.

use serde::Serialize;

use crate::engine::coordinates::{heading_dir, Vec2};
use crate::models::{TeamId, UnitId};

pub const INITIAL_HEALTH: f32 = 100.0;

/// Mutable per-unit simulation state. Owned exclusively by the world store;
/// every other component reads or mutates it through the store's contract.
#[derive(Debug, Clone)]
pub struct UnitState {
    pub team_id: TeamId,
    pub unit_id: UnitId,
    pub position: Vec2,
    /// Heading angle in radians.
    pub heading: f32,
    /// Unit is alive iff `health > 0`.
    pub health: f32,
    /// Set at most once per tick; reset at tick start.
    pub has_moved: bool,
    /// Set at most once per tick; reset at tick start.
    pub has_rotated: bool,
    /// Absolute simulation time at which the unit may shoot again.
    pub next_shoot_time: f32,
    /// Derived at tick end from `has_moved`; read by the combat resolver to
    /// widen shot spread while on the move.
    pub is_moving: bool,
}

impl UnitState {
    pub fn new(team_id: TeamId, unit_id: UnitId, position: Vec2, heading: f32) -> Self {
        Self {
            team_id,
            unit_id,
            position,
            heading,
            health: INITIAL_HEALTH,
            has_moved: false,
            has_rotated: false,
            next_shoot_time: 0.0,
            is_moving: false,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Unit vector along the current heading.
    #[inline]
    pub fn direction(&self) -> Vec2 {
        heading_dir(self.heading)
    }
}

/// Read-only snapshot of a unit, produced on demand for agent code.
#[derive(Debug, Clone, Serialize)]
pub struct UnitInfo {
    pub position: Vec2,
    pub heading: f32,
    pub direction: Vec2,
    pub health: f32,
    pub has_moved: bool,
    pub has_rotated: bool,
    pub is_moving: bool,
    /// Distance from the unit to the zone edge; negative when outside.
    pub zone_distance: f32,
    pub can_shoot: bool,
    /// Seconds until the unit may shoot again; zero when ready.
    pub shoot_cooldown: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::coordinates::vec2;

    #[test]
    fn test_new_unit_defaults() {
        let unit = UnitState::new(1, 0, vec2(3.0, -2.0), 0.0);
        assert!(unit.is_alive());
        assert_eq!(unit.health, INITIAL_HEALTH);
        assert!(!unit.has_moved);
        assert!(!unit.has_rotated);
        assert!(!unit.is_moving);
        assert_eq!(unit.next_shoot_time, 0.0);
    }

    #[test]
    fn test_alive_threshold_is_strict() {
        let mut unit = UnitState::new(1, 0, vec2(0.0, 0.0), 0.0);
        unit.health = 0.0;
        assert!(!unit.is_alive());
        unit.health = 0.01;
        assert!(unit.is_alive());
    }
}

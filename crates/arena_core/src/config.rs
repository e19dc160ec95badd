//! Match tuning configuration.
//!
//! All tuning constants live here so hosts can load them from JSON and tests
//! can pin them. Angles are radians, distances world units, rates per second.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Fixed simulation step in seconds.
    pub tick_delta: f32,
    /// Full field-of-view cone angle; a direction is in view iff its angle to
    /// the heading is strictly less than half of this.
    pub field_of_view: f32,
    pub move_speed: f32,
    pub rotation_speed: f32,
    /// Collision radius of a unit; also the silhouette radius used by the
    /// visibility engine.
    pub unit_radius: f32,
    pub shooting_damage: f32,
    pub shooting_cooldown: f32,
    /// Half-width of the angular spread applied to a standing shot.
    pub shot_spread: f32,
    /// Half-width of the angular spread applied while the shooter is moving.
    pub shot_spread_moving: f32,
    /// Distance a projectile travels when the ray hits nothing.
    pub projectile_range: f32,
    pub zone_start_radius: f32,
    pub zone_shrink_rate: f32,
    pub zone_damage_per_second: f32,
    /// Yellow cards a team may accumulate; exceeding this draws the red card.
    pub max_yellow_cards: u8,
    pub points_to_win: u32,
    /// Bisection iterations per silhouette bound refinement.
    pub visibility_iterations: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            tick_delta: 0.02,
            field_of_view: PI / 2.0,
            move_speed: 10.0,
            rotation_speed: PI,
            unit_radius: 0.5,
            shooting_damage: 25.0,
            shooting_cooldown: 1.0,
            shot_spread: 0.035,
            shot_spread_moving: 0.12,
            projectile_range: 120.0,
            zone_start_radius: 60.0,
            zone_shrink_rate: 0.5,
            zone_damage_per_second: 5.0,
            max_yellow_cards: 3,
            points_to_win: 3,
            visibility_iterations: 8,
        }
    }
}

impl ArenaConfig {
    /// The standard competitive ruleset.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Frozen zone and perfectly accurate rifles; useful for drills and for
    /// deterministic geometry tests.
    pub fn training() -> Self {
        Self {
            zone_shrink_rate: 0.0,
            zone_damage_per_second: 0.0,
            shot_spread: 0.0,
            shot_spread_moving: 0.0,
            ..Self::default()
        }
    }

    #[inline]
    pub fn half_fov(&self) -> f32 {
        self.field_of_view / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sane() {
        let cfg = ArenaConfig::default();
        assert!(cfg.tick_delta > 0.0);
        assert!(cfg.field_of_view > 0.0 && cfg.field_of_view <= 2.0 * PI);
        assert!(cfg.shot_spread_moving >= cfg.shot_spread);
        assert!(cfg.points_to_win >= 1);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let cfg: ArenaConfig = serde_json::from_str(r#"{"points_to_win": 5}"#).unwrap();
        assert_eq!(cfg.points_to_win, 5);
        assert_eq!(cfg.max_yellow_cards, ArenaConfig::default().max_yellow_cards);
    }

    #[test]
    fn test_serde_round_trip() {
        let cfg = ArenaConfig::training();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ArenaConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.zone_shrink_rate, 0.0);
        assert_eq!(back.shot_spread, 0.0);
    }
}

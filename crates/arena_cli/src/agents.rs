//! Demo agents for the command line runner.
//!
//! Both agents only use the public [`TeamContext`] surface, so they double as
//! reference implementations for match authors.

use std::collections::BTreeMap;

use arena_core::{vec2, AgentError, TeamAgent, TeamContext, UnitId, Vec2};

/// Scans until an enemy shows, then turns onto the most exposed silhouette,
/// closes the distance and fires. Remembers shot bearings to investigate.
pub struct Hunter {
    last_bearing: BTreeMap<UnitId, Vec2>,
}

impl Hunter {
    pub fn new() -> Self {
        Self { last_bearing: BTreeMap::new() }
    }
}

impl Default for Hunter {
    fn default() -> Self {
        Self::new()
    }
}

impl TeamAgent for Hunter {
    fn on_start(&mut self, _ctx: &mut TeamContext<'_, '_>) -> Result<(), AgentError> {
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut TeamContext<'_, '_>) -> Result<(), AgentError> {
        for unit_id in ctx.unit_ids() {
            let info = ctx.unit_info(unit_id)?;

            // Zone first: never die to the circle.
            if info.zone_distance < 2.0 {
                ctx.move_towards(unit_id, vec2(0.0, 0.0))?;
            }

            let seen = ctx.visible_enemies(unit_id)?;
            let target = seen
                .iter()
                .max_by(|a, b| a.seen_cone_angle.total_cmp(&b.seen_cone_angle));

            if let Some(target) = target {
                let to_target = target.best_shooting_point - info.position;
                let range = to_target.norm();
                if let Some(aim) = to_target.try_normalize(1.0e-6) {
                    ctx.rotate_towards(unit_id, aim)?;
                    if info.can_shoot && aim.dot(&info.direction) > 0.999 {
                        ctx.shoot(unit_id)?;
                    } else if range > 15.0 && !info.has_moved {
                        ctx.move_towards(unit_id, target.position)?;
                    }
                }
            } else if let Some(bearing) = self.last_bearing.remove(&unit_id) {
                ctx.rotate_towards(unit_id, bearing)?;
            } else {
                ctx.rotate(unit_id, false)?;
            }
        }
        Ok(())
    }

    fn on_shot_heard(&mut self, bearings: &BTreeMap<UnitId, Vec2>) -> Result<(), AgentError> {
        for (&unit_id, &bearing) in bearings {
            self.last_bearing.insert(unit_id, bearing);
        }
        Ok(())
    }
}

/// Keeps its face to the nearest visible enemy while strafing sideways,
/// flipping the strafe direction every couple of seconds. Turns toward heard
/// shots when nothing is in sight.
pub struct Skirmisher {
    heard: BTreeMap<UnitId, Vec2>,
}

impl Skirmisher {
    pub fn new() -> Self {
        Self { heard: BTreeMap::new() }
    }
}

impl Default for Skirmisher {
    fn default() -> Self {
        Self::new()
    }
}

impl TeamAgent for Skirmisher {
    fn on_start(&mut self, _ctx: &mut TeamContext<'_, '_>) -> Result<(), AgentError> {
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut TeamContext<'_, '_>) -> Result<(), AgentError> {
        let flip = if (ctx.time() / 2.0) as i64 % 2 == 0 { 1.0 } else { -1.0 };
        for unit_id in ctx.unit_ids() {
            let info = ctx.unit_info(unit_id)?;

            if info.zone_distance < 2.0 {
                ctx.move_towards(unit_id, vec2(0.0, 0.0))?;
            }

            let seen = ctx.visible_enemies(unit_id)?;
            let target = seen.iter().min_by(|a, b| {
                let da = (a.position - info.position).norm_squared();
                let db = (b.position - info.position).norm_squared();
                da.total_cmp(&db)
            });

            if let Some(target) = target {
                if let Some(aim) = (target.best_shooting_point - info.position).try_normalize(1.0e-6)
                {
                    ctx.rotate_towards(unit_id, aim)?;
                    if info.can_shoot && aim.dot(&info.direction) > 0.995 {
                        ctx.shoot(unit_id)?;
                    }
                    // Sidestep across the enemy's line of fire.
                    let strafe = vec2(-aim.y, aim.x) * flip;
                    if !info.has_moved {
                        ctx.move_in_direction(unit_id, strafe)?;
                    }
                }
            } else if let Some(bearing) = self.heard.remove(&unit_id) {
                ctx.rotate_towards(unit_id, bearing)?;
                if !info.has_moved {
                    ctx.move_in_direction(unit_id, bearing)?;
                }
            } else {
                ctx.rotate(unit_id, true)?;
            }
        }
        Ok(())
    }

    fn on_shot_heard(&mut self, bearings: &BTreeMap<UnitId, Vec2>) -> Result<(), AgentError> {
        for (&unit_id, &bearing) in bearings {
            self.heard.insert(unit_id, bearing);
        }
        Ok(())
    }
}

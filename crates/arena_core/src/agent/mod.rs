//! Team agent contract.
//!
//! Match authors supply one [`TeamAgent`] per team. Agents are untrusted:
//! every callback that can fail returns a `Result`, and the scheduler turns
//! errors into yellow cards instead of letting them propagate. Agents never
//! touch engine internals directly; all reads and actions go through the
//! [`TeamContext`] capability handle lent to each callback.

mod context;

pub use context::TeamContext;

use std::collections::BTreeMap;

use crate::engine::coordinates::Vec2;
use crate::error::AgentError;
use crate::models::UnitId;

/// Per-team controller logic, invoked by the engine each tick.
pub trait TeamAgent {
    /// Called once when the round starts, before the first tick.
    fn on_start(&mut self, ctx: &mut TeamContext<'_, '_>) -> Result<(), AgentError>;

    /// Called once per tick while the round is in progress.
    fn on_update(&mut self, ctx: &mut TeamContext<'_, '_>) -> Result<(), AgentError>;

    /// Called synchronously when an opposing unit fires. `bearings` maps each
    /// of this team's live unit ids to a noisy unit vector pointing toward
    /// the shooter; the noise grows with the listener's distance.
    fn on_shot_heard(&mut self, bearings: &BTreeMap<UnitId, Vec2>) -> Result<(), AgentError> {
        let _ = bearings;
        Ok(())
    }

    /// Called exactly once if the team is disqualified. Errors raised here
    /// are logged and go no further.
    fn on_red_card(&mut self) -> Result<(), AgentError> {
        Ok(())
    }

    /// Called when one of this team's units is removed from the arena, after
    /// the tick's updates and before the next tick.
    fn on_unit_death(&mut self, unit_id: UnitId) {
        let _ = unit_id;
    }
}

/// Constructor for a team's agent, invoked at round setup and again on every
/// round restart so each round starts from fresh agent state.
pub type AgentFactory = Box<dyn Fn() -> Box<dyn TeamAgent>>;

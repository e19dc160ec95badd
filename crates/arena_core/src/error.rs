//! Fault taxonomy for the arena core.
//!
//! Precondition and dead-unit faults always surface synchronously to the
//! caller; agent faults are caught at the scheduler's fault boundary and
//! converted into penalties instead of crashing the match.

use thiserror::Error;

use crate::models::{TeamId, UnitId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArenaFault {
    /// A direction argument was not a unit vector.
    #[error("direction must be a unit vector (magnitude {magnitude})")]
    NotNormalized { magnitude: f32 },

    /// An explicit ray distance was zero or negative.
    #[error("ray distance must be positive, got {0}")]
    NonPositiveDistance(f32),

    /// A query or action targeted a unit that is dead or was never spawned.
    #[error("unit {unit_id} of team {team_id} is dead or unknown")]
    DeadUnit { team_id: TeamId, unit_id: UnitId },

    /// The match plan failed validation at engine construction.
    #[error("invalid match plan: {0}")]
    InvalidPlan(String),
}

/// Error type returned by team agent callbacks.
///
/// Handle operations return [`ArenaFault`], so agent code can use `?` freely;
/// whatever escapes the callback is charged as a yellow card at the boundary.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Fault(#[from] ArenaFault),

    #[error("{0}")]
    Logic(String),
}

impl AgentError {
    pub fn logic(msg: impl Into<String>) -> Self {
        AgentError::Logic(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ArenaFault>;

//! # arena_core - Deterministic Tactical Combat Arena Simulation
//!
//! A fixed-tick, single-threaded simulation of two or more teams of
//! circular units fighting inside a shrinking zone.
//!
//! ## Features
//! - 100% deterministic simulation (same plan + seed = same event log)
//! - Partial-silhouette visibility with bisection-refined shooting points
//! - Untrusted team agents behind a result-typed fault boundary
//!   (yellow/red card penalties instead of crashes)
//! - Fire-and-forget event stream for presentation layers

// Agent-facing engine calls carry the full world context.
#![allow(clippy::too_many_arguments)]

pub mod agent;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;

pub use agent::{AgentFactory, TeamAgent, TeamContext};
pub use config::ArenaConfig;
pub use engine::{
    vec2, ArenaEngine, ArenaEvent, EventLog, MatchPlan, RoundState, TeamSetup, Vec2,
};
pub use error::{AgentError, ArenaFault, Result};
pub use models::{
    EnemyObservation, GameMap, HitData, HitKind, MapElement, TeamId, UnitId, UnitInfo, Zone,
};

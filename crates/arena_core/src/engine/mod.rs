//! Simulation engine: world state, geometry, visibility, combat and the
//! fixed-tick match loop.

pub mod arena;
pub mod clock;
pub(crate) mod combat;
pub mod coordinates;
pub mod events;
pub mod physics;
pub mod round;
pub(crate) mod scheduler;
pub(crate) mod visibility;
pub mod world;

pub use arena::{ArenaEngine, MatchPlan, TeamSetup};
pub use clock::SimClock;
pub use coordinates::{vec2, Vec2};
pub use events::{ArenaEvent, EffectsSink, EventLog, NullSink};
pub use physics::{ColliderId, RayHit, RaycastProvider};
pub use round::{RoundState, Scoreboard};
pub use world::{CommandState, UnitStore};

//! Fire-and-forget notifications for the presentation layer.
//!
//! The core pushes events into an [`EffectsSink`] and never reads back or
//! blocks on it. [`EventLog`] is the default collecting sink; it doubles as
//! the determinism witness in tests (same plan + seed must yield an identical
//! log).

use serde::Serialize;

use crate::engine::coordinates::Vec2;
use crate::engine::round::RoundState;
use crate::models::{TeamId, UnitId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ArenaEvent {
    ProjectileFired { team_id: TeamId, unit_id: UnitId, from: Vec2, to: Vec2 },
    ImpactEffect { point: Vec2, normal: Vec2 },
    BloodEffect { point: Vec2 },
    HealthChanged { team_id: TeamId, unit_id: UnitId, health: f32 },
    UnitRemoved { team_id: TeamId, unit_id: UnitId },
    YellowCard { team_id: TeamId, count: u8, reason: String },
    RedCard { team_id: TeamId },
    RoundStateChanged { state: RoundState },
}

pub trait EffectsSink {
    fn notify(&mut self, event: ArenaEvent);
}

/// Sink that keeps every event in order.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<ArenaEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ArenaEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<ArenaEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EffectsSink for EventLog {
    fn notify(&mut self, event: ArenaEvent) {
        self.events.push(event);
    }
}

/// Sink that discards everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl EffectsSink for NullSink {
    fn notify(&mut self, _event: ArenaEvent) {}
}

//! Pure data model: units, maps, zone and per-tick observation snapshots.

pub mod map;
pub mod observation;
pub mod unit;
pub mod zone;

pub use map::{GameMap, MapElement};
pub use observation::{EnemyObservation, HitData, HitKind};
pub use unit::{UnitInfo, UnitState, INITIAL_HEALTH};
pub use zone::Zone;

/// Stable team identifier, assigned at registration and never reused.
pub type TeamId = u32;

/// Stable unit identifier, unique within its team, assigned at spawn and
/// never reused.
pub type UnitId = u32;

//! Fault boundary bookkeeping for team agents.
//!
//! Agent callbacks return results rather than being trusted to succeed. Every
//! failure costs the team one yellow card; exceeding the configured limit
//! issues a red card exactly once and flags the team disqualified, which
//! short-circuits the round.

use tracing::warn;

use crate::agent::TeamAgent;
use crate::config::ArenaConfig;
use crate::engine::events::{ArenaEvent, EffectsSink};
use crate::engine::world::UnitStore;
use crate::models::TeamId;

/// One registered team: identity plus its (untrusted) agent.
pub(crate) struct TeamSlot {
    pub team_id: TeamId,
    pub name: String,
    pub agent: Box<dyn TeamAgent>,
}

/// Book a yellow card against a team and escalate to a red card when the
/// count exceeds the limit. Returns `true` only when this call is the one
/// that disqualifies the team; the caller then owes the agent its
/// `on_red_card` hook.
pub(crate) fn penalize(
    store: &mut UnitStore,
    sink: &mut dyn EffectsSink,
    config: &ArenaConfig,
    team_id: TeamId,
    disqualified: &mut Option<TeamId>,
    reason: &str,
) -> bool {
    let count = store.add_yellow_card(team_id);
    warn!(team_id, count, reason, "yellow card");
    sink.notify(ArenaEvent::YellowCard {
        team_id,
        count,
        reason: reason.to_string(),
    });
    if count > config.max_yellow_cards && store.issue_red_card(team_id) {
        warn!(team_id, "red card, team disqualified");
        sink.notify(ArenaEvent::RedCard { team_id });
        *disqualified = Some(team_id);
        return true;
    }
    false
}

/// Deliver `on_red_card` under a log-only boundary; a fault here is recorded
/// and goes no further.
pub(crate) fn red_card_hook(slot: &mut TeamSlot) {
    if let Err(err) = slot.agent.on_red_card() {
        warn!(team_id = slot.team_id, error = %err, "red card hook failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::events::EventLog;

    fn store() -> UnitStore {
        let mut store = UnitStore::new();
        store.register_team(1, "red".into());
        store
    }

    #[test]
    fn test_penalize_counts_up_to_disqualification() {
        let mut store = store();
        let mut log = EventLog::new();
        let config = ArenaConfig { max_yellow_cards: 2, ..ArenaConfig::standard() };
        let mut dq = None;

        assert!(!penalize(&mut store, &mut log, &config, 1, &mut dq, "boom"));
        assert!(!penalize(&mut store, &mut log, &config, 1, &mut dq, "boom"));
        assert!(dq.is_none());
        // Third fault exceeds the limit of two.
        assert!(penalize(&mut store, &mut log, &config, 1, &mut dq, "boom"));
        assert_eq!(dq, Some(1));

        // Further faults keep counting but never re-disqualify.
        assert!(!penalize(&mut store, &mut log, &config, 1, &mut dq, "boom"));
        assert_eq!(store.team(1).unwrap().yellow_card_count(), 4);

        let reds = log
            .events()
            .iter()
            .filter(|e| matches!(e, ArenaEvent::RedCard { .. }))
            .count();
        assert_eq!(reds, 1);
        let yellows = log
            .events()
            .iter()
            .filter(|e| matches!(e, ArenaEvent::YellowCard { .. }))
            .count();
        assert_eq!(yellows, 4);
    }
}

//! Round outcome evaluation and match scoring.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::engine::world::UnitStore;
use crate::models::TeamId;

/// Where the current round stands. Evaluated once per tick after removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundState {
    InProgress,
    /// One team has live units left; it takes the round point.
    RoundWon(TeamId),
    /// The round winner reached the match point target.
    GameWon(TeamId),
    /// No team has live units left; nobody scores.
    Draw,
    /// A team was disqualified mid-round; the round restarts without a point.
    Restarting(TeamId),
}

impl RoundState {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, RoundState::InProgress)
    }

    /// True once the match as a whole is decided.
    pub fn is_game_over(&self) -> bool {
        matches!(self, RoundState::GameWon(_))
    }
}

/// Match points per team, round wins only.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Scoreboard {
    points: BTreeMap<TeamId, u32>,
}

impl Scoreboard {
    pub fn register(&mut self, team_id: TeamId) {
        self.points.entry(team_id).or_insert(0);
    }

    pub fn award(&mut self, team_id: TeamId) -> u32 {
        let entry = self.points.entry(team_id).or_insert(0);
        *entry += 1;
        *entry
    }

    pub fn points(&self, team_id: TeamId) -> u32 {
        self.points.get(&team_id).copied().unwrap_or(0)
    }

    pub fn standings(&self) -> impl Iterator<Item = (TeamId, u32)> + '_ {
        self.points.iter().map(|(&t, &p)| (t, p))
    }
}

/// Decide the round. A pending disqualification preempts everything; after
/// that, a team "stands" if it has at least one live unit and is not over the
/// card limit.
pub(crate) fn evaluate(
    store: &UnitStore,
    max_yellow_cards: u8,
    disqualified: Option<TeamId>,
) -> RoundState {
    if let Some(team_id) = disqualified {
        return RoundState::Restarting(team_id);
    }
    let mut standing = store
        .teams()
        .filter(|t| t.has_live_units() && t.yellow_card_count() <= max_yellow_cards)
        .map(|t| t.team_id);
    match (standing.next(), standing.next()) {
        (None, _) => RoundState::Draw,
        (Some(winner), None) => RoundState::RoundWon(winner),
        _ => RoundState::InProgress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::coordinates::vec2;
    use crate::models::UnitState;

    fn two_team_store() -> UnitStore {
        let mut store = UnitStore::new();
        store.register_team(1, "red".into());
        store.register_team(2, "blue".into());
        store.spawn_unit(UnitState::new(1, 0, vec2(-5.0, 0.0), 0.0));
        store.spawn_unit(UnitState::new(2, 0, vec2(5.0, 0.0), 0.0));
        store
    }

    #[test]
    fn test_in_progress_while_both_teams_stand() {
        let store = two_team_store();
        assert_eq!(evaluate(&store, 3, None), RoundState::InProgress);
    }

    #[test]
    fn test_last_team_standing_wins_round() {
        let mut store = two_team_store();
        store.damage(2, 0, 200.0);
        store.purge_marked();
        assert_eq!(evaluate(&store, 3, None), RoundState::RoundWon(1));
    }

    #[test]
    fn test_mutual_destruction_is_a_draw() {
        let mut store = two_team_store();
        store.damage(1, 0, 200.0);
        store.damage(2, 0, 200.0);
        store.purge_marked();
        assert_eq!(evaluate(&store, 3, None), RoundState::Draw);
    }

    #[test]
    fn test_card_limit_eliminates_a_team() {
        let mut store = two_team_store();
        for _ in 0..4 {
            store.add_yellow_card(2);
        }
        assert_eq!(evaluate(&store, 3, None), RoundState::RoundWon(1));
    }

    #[test]
    fn test_disqualification_preempts_everything() {
        let store = two_team_store();
        assert_eq!(evaluate(&store, 3, Some(2)), RoundState::Restarting(2));
    }

    #[test]
    fn test_scoreboard_awards() {
        let mut board = Scoreboard::default();
        board.register(1);
        board.register(2);
        assert_eq!(board.award(1), 1);
        assert_eq!(board.award(1), 2);
        assert_eq!(board.points(2), 0);
    }
}

//! Match orchestration: spawning, the fixed-tick loop and round restarts.
//!
//! Tick order is load-bearing: (1) advance time, shrink the zone, reset the
//! per-unit action flags and apply zone damage; (2) run each team's update in
//! registration order under the fault boundary, stopping early on a
//! disqualification; (3) derive movement state and purge dead units; (4)
//! evaluate the round.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::agent::{AgentFactory, TeamContext};
use crate::config::ArenaConfig;
use crate::engine::clock::SimClock;
use crate::engine::coordinates::{heading_of, perp_ccw, vec2, Vec2};
use crate::engine::events::{ArenaEvent, EffectsSink, EventLog};
use crate::engine::round::{self, RoundState, Scoreboard};
use crate::engine::scheduler::{self, TeamSlot};
use crate::engine::world::UnitStore;
use crate::error::{ArenaFault, Result};
use crate::models::{GameMap, TeamId, UnitState, Zone};

/// One team as configured by the match author.
pub struct TeamSetup {
    pub name: String,
    pub unit_count: u32,
    pub spawn_point: Vec2,
    pub build_agent: AgentFactory,
}

/// Everything needed to set up a match.
pub struct MatchPlan {
    pub teams: Vec<TeamSetup>,
    pub map: GameMap,
    pub config: ArenaConfig,
    pub seed: u64,
}

pub struct ArenaEngine {
    config: ArenaConfig,
    map: GameMap,
    setups: Vec<TeamSetup>,
    store: UnitStore,
    zone: Zone,
    clock: SimClock,
    rng: ChaCha8Rng,
    slots: Vec<TeamSlot>,
    scoreboard: Scoreboard,
    round: u32,
    round_state: RoundState,
    disqualified: Option<TeamId>,
    events: EventLog,
}

impl std::fmt::Debug for ArenaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArenaEngine")
            .field("round", &self.round)
            .finish_non_exhaustive()
    }
}

impl ArenaEngine {
    /// Validate the plan and set up the first round. Call [`start`] (or
    /// [`run_match`]) before ticking so agents get their `on_start` hook.
    ///
    /// [`start`]: ArenaEngine::start
    /// [`run_match`]: ArenaEngine::run_match
    pub fn new(plan: MatchPlan) -> Result<Self> {
        if plan.teams.len() < 2 {
            return Err(ArenaFault::InvalidPlan(
                "a match needs at least two teams".into(),
            ));
        }
        for setup in &plan.teams {
            if setup.unit_count == 0 {
                return Err(ArenaFault::InvalidPlan(format!(
                    "team '{}' has no units",
                    setup.name
                )));
            }
        }
        let mut engine = Self {
            rng: ChaCha8Rng::seed_from_u64(plan.seed),
            clock: SimClock::new(plan.config.tick_delta),
            zone: Zone::new(plan.config.zone_start_radius),
            config: plan.config,
            map: plan.map,
            setups: plan.teams,
            store: UnitStore::new(),
            slots: Vec::new(),
            scoreboard: Scoreboard::default(),
            round: 0,
            round_state: RoundState::InProgress,
            disqualified: None,
            events: EventLog::new(),
        };
        for idx in 0..engine.setups.len() {
            engine.scoreboard.register((idx + 1) as TeamId);
        }
        engine.spawn_round();
        engine.rebuild_agents();
        Ok(engine)
    }

    /// Run every team's `on_start` under the fault boundary.
    pub fn start(&mut self) {
        for index in 0..self.slots.len() {
            self.run_team(index, true);
        }
    }

    /// Advance the simulation by one fixed tick. Returns the round state
    /// after the tick; calls on a decided round are no-ops.
    pub fn tick(&mut self) -> RoundState {
        if !self.round_state.is_in_progress() {
            return self.round_state;
        }
        self.clock.advance();
        self.zone.shrink(self.config.zone_shrink_rate, self.clock.dt());
        self.store.reset_transient_flags();

        let zone_tick_damage = self.config.zone_damage_per_second * self.clock.dt();
        for (team_id, unit_id, health) in self.store.apply_zone_damage(&self.zone, zone_tick_damage)
        {
            self.events.notify(ArenaEvent::HealthChanged { team_id, unit_id, health });
        }

        for index in 0..self.slots.len() {
            let team_id = self.slots[index].team_id;
            let benched = match self.store.team(team_id) {
                Some(team) => {
                    !team.has_live_units()
                        || team.yellow_card_count() > self.config.max_yellow_cards
                }
                None => true,
            };
            if benched {
                continue;
            }
            self.run_team(index, false);
            if self.disqualified.is_some() {
                // Immediate win-condition check; remaining teams sit the
                // rest of the tick out.
                break;
            }
        }

        self.store.derive_is_moving();
        for (team_id, unit_id) in self.store.purge_marked() {
            debug!(team_id, unit_id, "unit removed");
            if let Some(slot) = self.slots.iter_mut().find(|s| s.team_id == team_id) {
                slot.agent.on_unit_death(unit_id);
            }
            self.events.notify(ArenaEvent::UnitRemoved { team_id, unit_id });
        }

        let state = round::evaluate(&self.store, self.config.max_yellow_cards, self.disqualified);
        self.apply_round_state(state);
        self.round_state
    }

    /// Tick until the round is decided or `max_ticks` elapse.
    pub fn run_round(&mut self, max_ticks: u64) -> RoundState {
        for _ in 0..max_ticks {
            if !self.tick().is_in_progress() {
                break;
            }
        }
        self.round_state
    }

    /// Play rounds back to back until the game is won or `max_rounds` have
    /// been played. Undecided rounds (tick budget exhausted) are restarted
    /// like draws.
    pub fn run_match(&mut self, max_ticks_per_round: u64, max_rounds: u32) -> RoundState {
        self.start();
        for played in 1..=max_rounds {
            let state = self.run_round(max_ticks_per_round);
            if state.is_game_over() || played == max_rounds {
                break;
            }
            self.restart_round();
        }
        self.round_state
    }

    /// Tear the round down and set up the next one: fresh units, fresh zone,
    /// fresh clock, fresh agents. Scores and round count carry over.
    pub fn restart_round(&mut self) {
        self.round += 1;
        self.spawn_round();
        self.rebuild_agents();
        info!(round = self.round, "round restarted");
        for index in 0..self.slots.len() {
            self.run_team(index, true);
        }
    }

    pub fn round_state(&self) -> RoundState {
        self.round_state
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn time(&self) -> f32 {
        self.clock.time()
    }

    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn store(&self) -> &UnitStore {
        &self.store
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<ArenaEvent> {
        self.events.drain()
    }

    /// Invoke one team's `on_start` or `on_update` with a context wired to
    /// the other teams for synchronous shot alerts; charge a yellow card on
    /// failure.
    fn run_team(&mut self, index: usize, starting: bool) {
        let (left, rest) = self.slots.split_at_mut(index);
        let (current, right) = match rest.split_first_mut() {
            Some(split) => split,
            None => return,
        };
        let mut others: Vec<&mut TeamSlot> =
            left.iter_mut().chain(right.iter_mut()).collect();
        let mut ctx = TeamContext::new(
            current.team_id,
            &mut self.store,
            &self.map,
            &self.zone,
            &self.clock,
            &self.config,
            &mut self.rng,
            &mut self.events,
            &mut others,
            &mut self.disqualified,
        );
        let result = if starting {
            current.agent.on_start(&mut ctx)
        } else {
            current.agent.on_update(&mut ctx)
        };
        if let Err(err) = result {
            let newly_out = scheduler::penalize(
                &mut self.store,
                &mut self.events,
                &self.config,
                current.team_id,
                &mut self.disqualified,
                &err.to_string(),
            );
            if newly_out {
                scheduler::red_card_hook(current);
            }
        }
    }

    /// Register teams and place their rosters. Units line up perpendicular
    /// to the line toward the arena center, facing the center.
    fn spawn_round(&mut self) {
        self.store = UnitStore::new();
        for (idx, setup) in self.setups.iter().enumerate() {
            let team_id = (idx + 1) as TeamId;
            self.store.register_team(team_id, setup.name.clone());
            let toward_center = (-setup.spawn_point)
                .try_normalize(1.0e-6)
                .unwrap_or_else(|| vec2(1.0, 0.0));
            let heading = heading_of(toward_center);
            let across = perp_ccw(toward_center);
            let spacing = self.config.unit_radius * 3.0;
            let mid = (setup.unit_count as f32 - 1.0) / 2.0;
            for unit_id in 0..setup.unit_count {
                let offset = across * ((unit_id as f32 - mid) * spacing);
                self.store.spawn_unit(UnitState::new(
                    team_id,
                    unit_id,
                    setup.spawn_point + offset,
                    heading,
                ));
            }
        }
        self.zone = Zone::new(self.config.zone_start_radius);
        self.clock = SimClock::new(self.config.tick_delta);
        self.disqualified = None;
        self.round_state = RoundState::InProgress;
    }

    fn rebuild_agents(&mut self) {
        self.slots = self
            .setups
            .iter()
            .enumerate()
            .map(|(idx, setup)| TeamSlot {
                team_id: (idx + 1) as TeamId,
                name: setup.name.clone(),
                agent: (setup.build_agent)(),
            })
            .collect();
    }

    /// Fold the raw evaluation into the scoreboard: a round win that reaches
    /// the point target ends the game.
    fn apply_round_state(&mut self, state: RoundState) {
        let resolved = match state {
            RoundState::RoundWon(winner) => {
                let points = self.scoreboard.award(winner);
                info!(winner, points, "round won");
                if points >= self.config.points_to_win {
                    RoundState::GameWon(winner)
                } else {
                    RoundState::RoundWon(winner)
                }
            }
            other => other,
        };
        if resolved != self.round_state {
            info!(round = self.round, state = ?resolved, "round state changed");
            self.events.notify(ArenaEvent::RoundStateChanged { state: resolved });
            self.round_state = resolved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgentError;

    struct Idle;

    impl crate::agent::TeamAgent for Idle {
        fn on_start(&mut self, _ctx: &mut TeamContext<'_, '_>) -> std::result::Result<(), AgentError> {
            Ok(())
        }
        fn on_update(&mut self, _ctx: &mut TeamContext<'_, '_>) -> std::result::Result<(), AgentError> {
            Ok(())
        }
    }

    struct Faulty;

    impl crate::agent::TeamAgent for Faulty {
        fn on_start(&mut self, _ctx: &mut TeamContext<'_, '_>) -> std::result::Result<(), AgentError> {
            Ok(())
        }
        fn on_update(&mut self, _ctx: &mut TeamContext<'_, '_>) -> std::result::Result<(), AgentError> {
            Err(AgentError::logic("deliberate failure"))
        }
    }

    /// Shoots with every unit, every tick.
    struct TriggerHappy;

    impl crate::agent::TeamAgent for TriggerHappy {
        fn on_start(&mut self, _ctx: &mut TeamContext<'_, '_>) -> std::result::Result<(), AgentError> {
            Ok(())
        }
        fn on_update(&mut self, ctx: &mut TeamContext<'_, '_>) -> std::result::Result<(), AgentError> {
            for unit_id in ctx.unit_ids() {
                ctx.shoot(unit_id)?;
            }
            Ok(())
        }
    }

    fn plan(
        a: AgentFactory,
        b: AgentFactory,
        config: ArenaConfig,
    ) -> MatchPlan {
        MatchPlan {
            teams: vec![
                TeamSetup {
                    name: "red".into(),
                    unit_count: 1,
                    spawn_point: vec2(-10.0, 0.0),
                    build_agent: a,
                },
                TeamSetup {
                    name: "blue".into(),
                    unit_count: 1,
                    spawn_point: vec2(10.0, 0.0),
                    build_agent: b,
                },
            ],
            map: GameMap::open(100.0),
            config,
            seed: 42,
        }
    }

    #[test]
    fn test_plan_validation() {
        let p = MatchPlan {
            teams: vec![TeamSetup {
                name: "solo".into(),
                unit_count: 1,
                spawn_point: vec2(0.0, 0.0),
                build_agent: Box::new(|| Box::new(Idle)),
            }],
            map: GameMap::open(100.0),
            config: ArenaConfig::standard(),
            seed: 0,
        };
        assert!(matches!(
            ArenaEngine::new(p).unwrap_err(),
            ArenaFault::InvalidPlan(_)
        ));
    }

    #[test]
    fn test_spawned_units_face_the_center() {
        let p = plan(
            Box::new(|| Box::new(Idle)),
            Box::new(|| Box::new(Idle)),
            ArenaConfig::training(),
        );
        let engine = ArenaEngine::new(p).unwrap();
        let red = engine.store().unit(1, 0).unwrap();
        let blue = engine.store().unit(2, 0).unwrap();
        assert!(red.heading.abs() < 1e-5);
        assert!((blue.heading.abs() - std::f32::consts::PI).abs() < 1e-5);
    }

    #[test]
    fn test_faulty_agent_is_disqualified_once() {
        let config = ArenaConfig { max_yellow_cards: 3, ..ArenaConfig::training() };
        let p = plan(
            Box::new(|| Box::new(Idle)),
            Box::new(|| Box::new(Faulty)),
            config,
        );
        let mut engine = ArenaEngine::new(p).unwrap();
        engine.start();
        let state = engine.run_round(10);
        assert_eq!(state, RoundState::Restarting(2));

        let events = engine.events().events();
        let yellows = events
            .iter()
            .filter(|e| matches!(e, ArenaEvent::YellowCard { team_id: 2, .. }))
            .count();
        let reds = events
            .iter()
            .filter(|e| matches!(e, ArenaEvent::RedCard { team_id: 2 }))
            .count();
        // One card per tick; the fourth exceeds the limit of three.
        assert_eq!(yellows, 4);
        assert_eq!(reds, 1);
        // A discarded round scores nothing.
        assert_eq!(engine.scoreboard().points(1), 0);
    }

    #[test]
    fn test_zone_damage_accrues_per_tick() {
        let config = ArenaConfig {
            zone_start_radius: 1.0,
            zone_shrink_rate: 0.0,
            zone_damage_per_second: 5.0,
            ..ArenaConfig::training()
        };
        let p = plan(
            Box::new(|| Box::new(Idle)),
            Box::new(|| Box::new(Idle)),
            config,
        );
        let mut engine = ArenaEngine::new(p).unwrap();
        engine.start();
        for _ in 0..10 {
            engine.tick();
        }
        // 5 damage/s * 0.02 s/tick * 10 ticks = 1.0
        let unit = engine.store().unit(1, 0).unwrap();
        assert!((unit.health - 99.0).abs() < 1e-3);
    }

    #[test]
    fn test_first_shooter_takes_the_round() {
        let config = ArenaConfig { points_to_win: 1, ..ArenaConfig::training() };
        let p = plan(
            Box::new(|| Box::new(TriggerHappy)),
            Box::new(|| Box::new(TriggerHappy)),
            config,
        );
        let mut engine = ArenaEngine::new(p).unwrap();
        engine.start();
        // Four 25-damage hits at a one second cooldown; red updates first
        // each tick and lands the killing shot before blue replies.
        let state = engine.run_round(500);
        assert_eq!(state, RoundState::GameWon(1));
        assert_eq!(engine.scoreboard().points(1), 1);
        assert!(engine
            .events()
            .events()
            .iter()
            .any(|e| matches!(e, ArenaEvent::UnitRemoved { team_id: 2, unit_id: 0 })));
    }

    #[test]
    fn test_same_seed_same_event_log() {
        let build = || {
            plan(
                Box::new(|| Box::new(TriggerHappy)),
                Box::new(|| Box::new(TriggerHappy)),
                ArenaConfig { points_to_win: 1, ..ArenaConfig::standard() },
            )
        };
        let mut a = ArenaEngine::new(build()).unwrap();
        let mut b = ArenaEngine::new(build()).unwrap();
        a.start();
        b.start();
        a.run_round(500);
        b.run_round(500);
        assert_eq!(a.events().events(), b.events().events());
        assert!(!a.events().is_empty());
    }

    #[test]
    fn test_restart_resets_the_round() {
        let p = plan(
            Box::new(|| Box::new(TriggerHappy)),
            Box::new(|| Box::new(Idle)),
            ArenaConfig::training(),
        );
        let mut engine = ArenaEngine::new(p).unwrap();
        engine.start();
        let state = engine.run_round(500);
        assert_eq!(state, RoundState::RoundWon(1));
        assert_eq!(engine.scoreboard().points(1), 1);

        engine.restart_round();
        assert_eq!(engine.round(), 1);
        assert!(engine.round_state().is_in_progress());
        // Fresh rosters on both sides.
        assert!(engine.store().unit(2, 0).is_ok());
        assert_eq!(engine.store().unit(2, 0).unwrap().health, 100.0);
        // Scores survive the restart.
        assert_eq!(engine.scoreboard().points(1), 1);
    }
}

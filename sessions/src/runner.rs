// ═══════════════════════════════════════════════════════════════════════
// Game Runner — plays complete headless games with agents
//
// A `Table` is anything that holds one game and accepts actions: a bare
// in-memory GameState, or a session row in the store. The same loop
// drives both, so self-play and persisted games follow one code path.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::SessionError;
use palisade_agents::{Agent, AgentKind};
use palisade_engine::engine::{apply_action, Action};
use palisade_engine::scoring::{standings, Standing};
use palisade_engine::setup::{create_initial_state, BonusValues, GameConfig};
use palisade_engine::visibility::view_for;
use palisade_engine::{Faction, GameState, Outcome, PlayerId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Consecutive ignored actions before a game counts as stalled.
const MAX_IGNORED_IN_A_ROW: usize = 3;

pub trait Table {
    fn snapshot(&self) -> Result<GameState, SessionError>;
    fn submit(&mut self, action: Action) -> Result<Outcome, SessionError>;
}

impl Table for GameState {
    fn snapshot(&self) -> Result<GameState, SessionError> {
        Ok(self.clone())
    }

    fn submit(&mut self, action: Action) -> Result<Outcome, SessionError> {
        Ok(apply_action(self, action)?)
    }
}

/// Result of a completed game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Bonus shuffle seed, when the board was shuffled.
    pub seed: Option<u64>,
    pub winner: Option<PlayerId>,
    pub winner_name: Option<String>,
    pub decisions: usize,
    pub scores: Vec<Standing>,
}

impl GameResult {
    pub fn from_state(state: &GameState, seed: Option<u64>, decisions: usize) -> Self {
        GameResult {
            seed,
            winner: state.winner.clone(),
            winner_name: state.winner_name().ok().flatten().map(str::to_string),
            decisions,
            scores: standings(state),
        }
    }
}

/// One agent of `kind` per seat, ids `p1..pN`, each with its own seed.
pub fn make_agents(kind: AgentKind, players: usize, seed: u64) -> Vec<Box<dyn Agent>> {
    (0..players)
        .map(|i| kind.build(PlayerId::new(format!("p{}", i + 1)), seed.wrapping_add(i as u64)))
        .collect()
}

/// Seat every agent at the table, give each a distinct faction and ready
/// them all, then play until the game is over. Returns the final state and
/// the number of agent decisions taken.
pub fn play_out(
    table: &mut impl Table,
    agents: &mut [Box<dyn Agent>],
    max_decisions: usize, // safety limit against agents that never finish
) -> Result<(GameState, usize), SessionError> {
    for (i, agent) in agents.iter().enumerate() {
        let player = agent.player().clone();
        let name = format!("{}-{}", agent.name().to_lowercase(), i + 1);
        seat(table, Action::Join { name, player: player.clone() })?;
        if let Some(&faction) = Faction::ALL.get(i) {
            seat(table, Action::SetFaction { player, faction })?;
        }
    }
    for agent in agents.iter() {
        seat(table, Action::SignalReady { player: agent.player().clone() })?;
    }

    let mut decisions = 0;
    let mut ignored_in_a_row = 0;
    loop {
        let state = table.snapshot()?;
        if state.is_over() {
            return Ok((state, decisions));
        }

        let Some(current) = state.current_player.clone() else {
            return Err(SessionError::Stalled(format!("no player to move in phase {:?}", state.phase)));
        };
        let Some(agent) = agents.iter_mut().find(|a| a.player() == &current) else {
            return Err(SessionError::Stalled(format!("no agent for player {current}")));
        };

        let action = agent.decide(&view_for(&state, Some(&current)));
        debug!(player = %current, ?action, "agent decided");
        decisions += 1;
        if decisions > max_decisions {
            warn!(decisions, "decision limit reached");
            return Err(SessionError::Stalled(format!(
                "game exceeded {max_decisions} decisions without finishing"
            )));
        }

        match table.submit(action)? {
            Outcome::Applied => ignored_in_a_row = 0,
            Outcome::Ignored(reason) => {
                ignored_in_a_row += 1;
                if ignored_in_a_row >= MAX_IGNORED_IN_A_ROW {
                    return Err(SessionError::Stalled(format!(
                        "agent for {current} keeps submitting ignored actions ({reason:?})"
                    )));
                }
            }
        }
    }
}

fn seat(table: &mut impl Table, action: Action) -> Result<(), SessionError> {
    match table.submit(action)? {
        Outcome::Applied => Ok(()),
        Outcome::Ignored(reason) => Err(SessionError::Stalled(format!("lobby action ignored ({reason:?})"))),
    }
}

/// Run a complete in-memory game with the given agents.
pub fn run_game(
    agents: &mut [Box<dyn Agent>],
    config: &GameConfig,
    max_decisions: usize,
) -> Result<GameResult, SessionError> {
    let mut state = create_initial_state(config)?;
    let (state, decisions) = play_out(&mut state, agents, max_decisions)?;

    let seed = match config.bonus_values {
        BonusValues::Shuffled { seed } => Some(seed),
        BonusValues::Fixed(_) => None,
    };
    let result = GameResult::from_state(&state, seed, decisions);
    info!(?seed, winner = ?result.winner_name, decisions, "game finished");
    Ok(result)
}

/// Run one shuffled game per seed in parallel. Results come back in seed order.
pub fn run_batch(
    seeds: &[u64],
    kind: AgentKind,
    players: usize,
    max_decisions: usize,
) -> Vec<(u64, Result<GameResult, SessionError>)> {
    seeds
        .par_iter()
        .map(|&seed| {
            let mut agents = make_agents(kind, players, seed);
            (seed, run_game(&mut agents, &GameConfig::shuffled(seed), max_decisions))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SessionStore;
    use palisade_engine::Phase;

    #[test]
    fn test_random_game_finishes() {
        for players in 2..=4 {
            let mut agents = make_agents(AgentKind::Random, players, 42);
            let result = run_game(&mut agents, &GameConfig::shuffled(42), 10_000).unwrap();
            assert_eq!(result.seed, Some(42));
            assert_eq!(result.scores.len(), players);
            assert!(result.decisions > 0);
            if let Some(winner) = &result.winner {
                let top = result.scores.iter().map(|s| s.score).max().unwrap();
                let first_top = result.scores.iter().find(|s| s.score == top).unwrap();
                assert_eq!(&first_top.player, winner);
            }
        }
    }

    #[test]
    fn test_greedy_game_finishes_and_scores() {
        let mut agents = make_agents(AgentKind::Greedy, 2, 7);
        let result = run_game(&mut agents, &GameConfig::default(), 10_000).unwrap();
        assert_eq!(result.seed, None);
        // No walls: one territory, both players place all 27 strength,
        // so every bonus is split and the earlier joiner takes the tie.
        assert_eq!(result.scores.iter().map(|s| s.score).collect::<Vec<_>>(), vec![18, 18]);
        assert_eq!(result.winner, Some(PlayerId::from("p1")));
        assert_eq!(result.winner_name.as_deref(), Some("greedy-1"));
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut first = make_agents(AgentKind::Random, 3, 5);
        let mut second = make_agents(AgentKind::Random, 3, 5);
        let a = run_game(&mut first, &GameConfig::shuffled(5), 10_000).unwrap();
        let b = run_game(&mut second, &GameConfig::shuffled(5), 10_000).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decision_limit_stalls() {
        let mut agents = make_agents(AgentKind::Random, 2, 1);
        let result = run_game(&mut agents, &GameConfig::default(), 0);
        assert!(matches!(result, Err(SessionError::Stalled(_))));
    }

    #[test]
    fn test_batch_runs_every_seed() {
        let seeds: Vec<u64> = (0..8).collect();
        let results = run_batch(&seeds, AgentKind::Greedy, 3, 10_000);
        assert_eq!(results.iter().map(|(s, _)| *s).collect::<Vec<_>>(), seeds);
        assert!(results.iter().all(|(_, r)| r.is_ok()));
    }

    #[test]
    fn test_stored_session_plays_to_the_end() {
        let mut store = SessionStore::in_memory().unwrap();
        store.save("g1", &create_initial_state(&GameConfig::shuffled(9)).unwrap()).unwrap();

        let mut agents = make_agents(AgentKind::Random, 2, 9);
        let (state, _) = play_out(&mut store.session("g1"), &mut agents, 10_000).unwrap();
        assert_eq!(state.phase, Phase::GameOver);
        assert_eq!(store.load("g1").unwrap(), state);
    }
}

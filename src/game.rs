/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{Context, Result};
use rand::{rngs::StdRng, SeedableRng};

use crate::{Agent, AgentSpec, Board, Outcome, Player, State, DEFAULT_COLS, DEFAULT_ROWS};

/// Everything needed to set up and run games between agents.
///
/// Built once (usually from the command line) and passed to whatever runs the games.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Number of rows of the board. Must be odd.
    pub rows: usize,

    /// Number of columns of the board. Must be odd.
    pub cols: usize,

    /// Number of matches played between each pair of agents.
    pub matches: usize,

    /// Seed for the agents' random number generators. Drawn from entropy if `None`.
    pub seed: Option<u64>,

    /// Number of actions after which an unfinished match is declared a draw.
    pub max_turns: usize,

    /// If set, the board is logged after every action.
    pub log_moves: bool,
}

impl GameConfig {
    /// A new board in the starting layout for this configuration.
    #[inline(always)]
    pub fn new_board(&self) -> Result<Board> {
        Board::new(self.rows, self.cols)
            .with_context(|| format!("cannot play on a {}x{} board", self.rows, self.cols))
    }

    /// The random number generator for the agent playing as `player`.
    ///
    /// Seeded with `seed + player index` if a seed was given.
    pub fn agent_rng(&self, player: Player) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(player.index() as u64)),
            None => StdRng::from_entropy(),
        }
    }

    /// Builds the agents described by `specs`, the first playing as [`Player::One`].
    pub fn build_agents(&self, specs: [AgentSpec; 2]) -> [Box<dyn Agent>; 2] {
        [
            specs[0].build(self.agent_rng(Player::One)),
            specs[1].build(self.agent_rng(Player::Two)),
        ]
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            matches: 1,
            seed: None,
            max_turns: 500,
            log_moves: false,
        }
    }
}

/// A single game between two agents.
pub struct Match<'a> {
    config: &'a GameConfig,
    state: State,
    turns: usize,
}

impl<'a> Match<'a> {
    /// Sets up a match on a new board.
    pub fn new(config: &'a GameConfig) -> Result<Self> {
        Ok(Self::from_state(config, State::new(config.new_board()?)))
    }

    /// Sets up a match that continues from `state`.
    pub fn from_state(config: &'a GameConfig, state: State) -> Self {
        Self {
            config,
            state,
            turns: 0,
        }
    }

    #[inline(always)]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Number of actions played so far.
    #[inline(always)]
    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Lets `agents` take turns until the game is over, returning its outcome.
    ///
    /// `agents[0]` plays as [`Player::One`].
    /// A game is also a draw if the player to move has no legal action, or if it lasts longer than
    /// [`GameConfig::max_turns`].
    pub fn play(&mut self, agents: &mut [Box<dyn Agent>; 2]) -> Outcome {
        loop {
            let outcome = self.state.board().is_terminal();
            if outcome.is_over() {
                return outcome;
            }

            let mover = self.state.board().next_player();
            if self.state.board().valid_actions().is_empty() {
                log::warn!(
                    "Player {mover} has no legal action; declaring a draw on\n{}",
                    self.state.board()
                );
                return Outcome::Draw;
            }

            if self.turns >= self.config.max_turns {
                log::warn!(
                    "No result after {} actions; declaring a draw",
                    self.config.max_turns
                );
                return Outcome::Draw;
            }

            let action = agents[mover.index()].play_turn(&mut self.state);
            self.turns += 1;

            if self.config.log_moves {
                log::info!(
                    "Player {mover} played {action}\n{}",
                    self.state.board()
                );
            }
        }
    }
}

/// Tallies of a series of matches between the same two agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchStats {
    /// Wins of each player, indexed by [`Player::index`].
    pub wins: [usize; Player::COUNT],

    pub draws: usize,

    /// Actions played across all matches.
    pub turns: usize,
}

impl MatchStats {
    /// Total number of matches recorded.
    #[inline(always)]
    pub fn matches(&self) -> usize {
        self.wins.iter().sum::<usize>() + self.draws
    }

    /// Records the outcome of a finished match.
    pub fn record(&mut self, outcome: Outcome, turns: usize) {
        match outcome {
            Outcome::Winner(player) => self.wins[player.index()] += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Ongoing => {}
        }
        self.turns += turns;
    }

    /// Plays [`GameConfig::matches`] matches between the agents described by `specs`.
    ///
    /// The agents are built once and keep their random number generators across matches.
    pub fn run(config: &GameConfig, specs: [AgentSpec; 2]) -> Result<Self> {
        let mut agents = config.build_agents(specs);
        let names = [agents[0].name(), agents[1].name()];
        let mut stats = Self::default();

        for round in 1..=config.matches {
            let mut game = Match::new(config)?;
            let outcome = game.play(&mut agents);
            stats.record(outcome, game.turns());

            match outcome {
                Outcome::Winner(player) => log::info!(
                    "Match {round}/{}: player {player} ({}) wins after {} actions",
                    config.matches,
                    names[player.index()],
                    game.turns()
                ),
                _ => log::info!(
                    "Match {round}/{}: nobody wins after {} actions",
                    config.matches,
                    game.turns()
                ),
            }
        }

        log::info!("{} vs {}: {stats}", names[0], names[1]);
        Ok(stats)
    }
}

impl fmt::Display for MatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "player 1 won {}, player 2 won {}, {} draws",
            self.wins[Player::One.index()],
            self.wins[Player::Two.index()],
            self.draws
        )
    }
}

/// Plays every pairing of `contenders`, including each contender against itself.
///
/// Pairs are the combinations with replacement of `contenders`, in order, with the earlier contender as player one.
pub fn tournament(
    config: &GameConfig,
    contenders: &[AgentSpec],
) -> Result<Vec<(AgentSpec, AgentSpec, MatchStats)>> {
    let mut results = Vec::new();

    for (i, &first) in contenders.iter().enumerate() {
        for &second in &contenders[i..] {
            let stats = MatchStats::run(config, [first, second])
                .with_context(|| format!("failed to play {first} against {second}"))?;
            results.push((first, second, stats));
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Algorithm;

    fn config(matches: usize) -> GameConfig {
        GameConfig {
            matches,
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn test_random_match_finishes() {
        let config = config(1);
        let mut agents = config.build_agents([AgentSpec::Random, AgentSpec::Random]);
        let mut game = Match::new(&config).unwrap();

        let outcome = game.play(&mut agents);
        assert!(outcome.is_over());
        assert!(game.turns() <= config.max_turns);
        assert_eq!(game.state().history().len(), game.turns());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = config(3);
        let specs = [
            AgentSpec::Random,
            AgentSpec::Search {
                algorithm: Algorithm::Negamax,
                heuristic: Default::default(),
                depth: 2,
            },
        ];

        let first = MatchStats::run(&config, specs).unwrap();
        let second = MatchStats::run(&config, specs).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.matches(), 3);
    }

    #[test]
    fn test_turn_limit_declares_draw() {
        let config = GameConfig {
            max_turns: 2,
            ..config(1)
        };
        let mut agents = config.build_agents([AgentSpec::Random, AgentSpec::Random]);
        let mut game = Match::new(&config).unwrap();

        assert_eq!(game.play(&mut agents), Outcome::Draw);
        assert_eq!(game.turns(), 2);
    }

    #[test]
    fn test_blocked_player_draws() {
        // Player two's only piece is boxed in by pieces it cannot jump
        #[rustfmt::skip]
        let grid = [
            2, 1, 1,
            1, 1, 0,
            1, 0, 1,
        ];
        let board = Board::from_grid(3, 3, Player::Two, &grid).unwrap();
        assert!(board.valid_actions().is_empty());

        let config = config(1);
        let mut agents = config.build_agents([AgentSpec::Random, AgentSpec::Random]);
        let mut game = Match::from_state(&config, State::new(board));
        assert_eq!(game.play(&mut agents), Outcome::Draw);
        assert_eq!(game.turns(), 0);
    }

    #[test]
    fn test_tournament_pairs_with_replacement() {
        let config = GameConfig {
            rows: 3,
            cols: 3,
            ..config(1)
        };
        let contenders = [
            AgentSpec::Random,
            "minimax:border:2".parse().unwrap(),
            "minimax-tt:piece-count:3".parse().unwrap(),
        ];

        let results = tournament(&config, &contenders).unwrap();
        assert_eq!(results.len(), 6);
        assert_eq!(results[0].0, results[0].1);
        assert!(results.iter().all(|(_, _, stats)| stats.matches() == 1));
    }

    #[test]
    fn test_invalid_dimensions() {
        let config = GameConfig {
            rows: 4,
            ..Default::default()
        };
        assert!(Match::new(&config).is_err());
    }
}

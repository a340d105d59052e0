/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Context, Result};
use rand::{rngs::StdRng, seq::SliceRandom};

use crate::{Action, Algorithm, Heuristic, Search, SearchConfig, State};

/// Something that can choose actions for the player to move.
pub trait Agent {
    /// A human-readable name, used when reporting results.
    fn name(&self) -> String;

    /// Chooses an action for the player to move, without executing it.
    ///
    /// Any changes made to `state` while choosing must be reverted before returning.
    ///
    /// # Panics
    ///
    /// If the player to move has no legal actions.
    fn select(&mut self, state: &mut State) -> Action;

    /// Chooses an action and executes it, returning the action as executed.
    fn play_turn(&mut self, state: &mut State) -> Action {
        let action = self.select(state);
        state.execute(action);
        // The history holds the executed copy, which knows whether the turn changed
        state.last_action().copied().unwrap_or(action)
    }
}

/// Plays a uniformly random legal action.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    #[inline(always)]
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> String {
        String::from("Random")
    }

    fn select(&mut self, state: &mut State) -> Action {
        let actions = state.board().valid_actions();
        match actions.choose(&mut self.rng) {
            Some(&action) => action,
            None => panic!("Random agent has no legal action on\n{}", state.board()),
        }
    }
}

/// Plays the action chosen by a [`Search`] with a built-in [`Heuristic`].
#[derive(Debug, Clone)]
pub struct SearchAgent {
    heuristic: Heuristic,
    config: SearchConfig,
    rng: StdRng,
}

impl SearchAgent {
    #[inline(always)]
    pub fn new(heuristic: Heuristic, config: SearchConfig, rng: StdRng) -> Self {
        Self {
            heuristic,
            config,
            rng,
        }
    }
}

impl Agent for SearchAgent {
    fn name(&self) -> String {
        format!(
            "{} ({}, {})",
            self.config.algorithm, self.heuristic, self.config.max_depth
        )
    }

    fn select(&mut self, state: &mut State) -> Action {
        let res = Search::new(&self.heuristic, self.config, &mut self.rng).start(state);

        match res.bestmove {
            Some(action) => action,
            None => unreachable!("A search with legal actions always chooses one"),
        }
    }
}

/// A description of an [`Agent`], parsed from text such as `random` or `negamax:border:7`.
///
/// Search descriptions are `<algorithm>[:<heuristic>[:<depth>]]`, with omitted parts taking their defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentSpec {
    Random,
    Search {
        algorithm: Algorithm,
        heuristic: Heuristic,
        depth: u8,
    },
}

impl AgentSpec {
    /// The random agent, followed by every algorithm and heuristic pair at each of `depths`.
    pub fn contenders(depths: &[u8]) -> Vec<Self> {
        let mut contenders = vec![Self::Random];

        for algorithm in Algorithm::ALL {
            for heuristic in Heuristic::ALL {
                for &depth in depths {
                    contenders.push(Self::Search {
                        algorithm,
                        heuristic,
                        depth,
                    });
                }
            }
        }

        contenders
    }

    /// Creates the described agent, which will draw its randomness from `rng`.
    pub fn build(&self, rng: StdRng) -> Box<dyn Agent> {
        match *self {
            Self::Random => Box::new(RandomAgent::new(rng)),
            Self::Search {
                algorithm,
                heuristic,
                depth,
            } => Box::new(SearchAgent::new(
                heuristic,
                SearchConfig::new(depth, algorithm),
                rng,
            )),
        }
    }
}

impl FromStr for AgentSpec {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s == "random" {
            return Ok(Self::Random);
        }

        let mut parts = s.split(':');
        let algorithm = parts
            .next()
            .unwrap_or_default()
            .parse()
            .with_context(|| format!("invalid agent {s:?}"))?;

        let heuristic = match parts.next() {
            Some(heuristic) => heuristic
                .parse()
                .with_context(|| format!("invalid agent {s:?}"))?,
            None => Heuristic::default(),
        };

        let depth = match parts.next() {
            Some(depth) => depth
                .parse()
                .with_context(|| format!("invalid search depth {depth:?} in agent {s:?}"))?,
            None => SearchConfig::default().max_depth,
        };

        if let Some(extra) = parts.next() {
            bail!("unexpected {extra:?} in agent {s:?}");
        }
        if depth == 0 {
            bail!("search depth of agent {s:?} must be at least 1");
        }

        Ok(Self::Search {
            algorithm,
            heuristic,
            depth,
        })
    }
}

impl fmt::Display for AgentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::Search {
                algorithm,
                heuristic,
                depth,
            } => write!(f, "{algorithm}:{heuristic}:{depth}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Board, Outcome};
    use rand::SeedableRng;

    #[test]
    fn test_parse_agent_specs() {
        assert_eq!("random".parse::<AgentSpec>().unwrap(), AgentSpec::Random);
        assert_eq!(
            "negamax:border:7".parse::<AgentSpec>().unwrap(),
            AgentSpec::Search {
                algorithm: Algorithm::Negamax,
                heuristic: Heuristic::Border,
                depth: 7
            }
        );
        assert_eq!(
            "minimax-tt".parse::<AgentSpec>().unwrap(),
            AgentSpec::Search {
                algorithm: Algorithm::MinimaxTt,
                heuristic: Heuristic::PieceCount,
                depth: 5
            }
        );

        for bad in ["", "minimax:border:0", "minimax:border:5:1", "greedy", "negamax:mobility"] {
            assert!(bad.parse::<AgentSpec>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_display_parses_back() {
        for spec in AgentSpec::contenders(&[5, 7]) {
            assert_eq!(spec.to_string().parse::<AgentSpec>().unwrap(), spec);
        }
        assert_eq!(AgentSpec::contenders(&[5, 7]).len(), 13);
    }

    #[test]
    fn test_select_does_not_execute() {
        let mut state = State::new(Board::new(5, 5).unwrap());
        let before = state.board().clone();

        for spec in AgentSpec::contenders(&[3]) {
            let mut agent = spec.build(StdRng::seed_from_u64(0));
            let hint = agent.select(&mut state);
            assert_eq!(state.board(), &before, "{} modified the board", agent.name());
            assert!(before.valid_actions().contains(&hint));
        }
    }

    #[test]
    fn test_play_turn_records_history() {
        let mut state = State::new(Board::new(5, 5).unwrap());
        let mut first = AgentSpec::Random.build(StdRng::seed_from_u64(1));
        let mut second = "minimax:piece-count:2"
            .parse::<AgentSpec>()
            .unwrap()
            .build(StdRng::seed_from_u64(2));

        let mut turns = 0;
        while state.board().is_terminal() == Outcome::Ongoing
            && !state.board().valid_actions().is_empty()
            && turns < 40
        {
            let agent = if state.board().next_player() == crate::Player::One {
                &mut first
            } else {
                &mut second
            };
            let action = agent.play_turn(&mut state);
            assert_eq!(state.last_action(), Some(&action));
            turns += 1;
        }

        assert_eq!(state.history().len(), turns);
    }
}

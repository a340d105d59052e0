/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{cmp::Ordering, fmt, str::FromStr};

use anyhow::{bail, Result};
use rand::{rngs::StdRng, seq::SliceRandom};

use crate::{eval::score_for, Action, Board, Evaluate, Outcome, Player, Score, State, TTable, TTableEntry};

/// The search algorithms available to a [`Search`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// Depth-limited minimax with alpha-beta pruning.
    #[default]
    Minimax,

    /// The single-signed formulation of [`Algorithm::Minimax`]. Chooses the same actions.
    Negamax,

    /// Iterative-deepening minimax that orders actions with the game's [`TTable`].
    MinimaxTt,
}

impl Algorithm {
    /// Every available algorithm.
    pub const ALL: [Self; 3] = [Self::Minimax, Self::Negamax, Self::MinimaxTt];

    /// A short, stable name for this algorithm.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Minimax => "minimax",
            Self::Negamax => "negamax",
            Self::MinimaxTt => "minimax-tt",
        }
    }
}

impl FromStr for Algorithm {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minimax" => Ok(Self::Minimax),
            "negamax" => Ok(Self::Negamax),
            "minimax-tt" | "minimax_tt" | "tt" => Ok(Self::MinimaxTt),
            _ => bail!("unknown search algorithm {s:?}"),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The result of a search, containing the best action found, its score, and search statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// Best action found during the search.
    pub bestmove: Option<Action>,

    /// Score of the position after `bestmove`, from the searching player's perspective.
    pub score: Score,

    /// Number of nodes searched.
    pub nodes: u64,

    /// Number of times the evaluation function was called.
    pub evaluations: u64,

    /// Depth of the last completed iteration.
    pub depth: u8,
}

impl Default for SearchResult {
    /// A default search result should initialize to a *very bad* value,
    /// since there isn't an action to play.
    #[inline(always)]
    fn default() -> Self {
        Self {
            bestmove: None,
            score: -Score::INF,
            nodes: 0,
            evaluations: 0,
            depth: 0,
        }
    }
}

/// Configuration variables for executing a [`Search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum depth to execute the search.
    ///
    /// [`Algorithm::MinimaxTt`] deepens up to, but not including, this depth.
    pub max_depth: u8,

    /// Which algorithm to run.
    pub algorithm: Algorithm,
}

impl SearchConfig {
    #[inline(always)]
    pub const fn new(max_depth: u8, algorithm: Algorithm) -> Self {
        Self {
            max_depth,
            algorithm,
        }
    }
}

impl Default for SearchConfig {
    #[inline(always)]
    fn default() -> Self {
        Self::new(5, Algorithm::Minimax)
    }
}

/// Executes a search on a game's board, choosing an action for the player to move.
///
/// The board is mutated in place: every explored action is executed through an [`ActionGuard`](crate::ActionGuard)
/// and undone before its siblings are explored, so the board is unchanged once the search returns.
pub struct Search<'a, E> {
    /// Static evaluation used at the horizon.
    evaluator: &'a E,

    /// Configuration variables for this instance of the search.
    config: SearchConfig,

    /// Breaks ties between equally good root actions.
    rng: &'a mut StdRng,

    /// The player the search is choosing an action for.
    root: Player,

    nodes: u64,
    evaluations: u64,
}

impl<'a, E: Evaluate> Search<'a, E> {
    #[inline(always)]
    pub fn new(evaluator: &'a E, config: SearchConfig, rng: &'a mut StdRng) -> Self {
        Self {
            evaluator,
            config,
            rng,
            root: Player::One,
            nodes: 0,
            evaluations: 0,
        }
    }

    /// Start the search, returning the action it chose.
    ///
    /// If only one action is legal, it is returned without searching, scored by evaluating the position after it.
    ///
    /// # Panics
    ///
    /// If the player to move has no legal actions.
    pub fn start(mut self, state: &mut State) -> SearchResult {
        let actions = state.board().valid_actions();
        assert!(
            !actions.is_empty(),
            "Cannot search a position with no legal actions:\n{}",
            state.board()
        );

        self.root = state.board().next_player();

        if actions.len() == 1 {
            log::debug!("Only one legal action for player {}: {}", self.root, actions[0]);
            let child = state.board_mut().scoped(actions[0]);
            let score = match Self::terminal_score(&child, self.root) {
                Some(score) => score,
                None => self.evaluate(&child),
            };
            drop(child);

            return SearchResult {
                bestmove: Some(actions[0]),
                score,
                evaluations: self.evaluations,
                ..Default::default()
            };
        }

        let depth = self.config.max_depth.max(1);
        log::debug!(
            "Starting {} search at depth {depth} for player {}",
            self.config.algorithm,
            self.root
        );

        let (bestmove, score, depth) = match self.config.algorithm {
            Algorithm::Minimax => {
                let scored = self.score_root(state.board_mut(), &actions, |search, child| {
                    search.minimax(child, depth - 1, -Score::INF, Score::INF)
                });
                let (bestmove, score) = self.pick(&actions, &scored);
                (bestmove, score, depth)
            }

            Algorithm::Negamax => {
                let scored = self.score_root(state.board_mut(), &actions, |search, child| {
                    let root = search.root;
                    let score = search.negamax(child, depth - 1, -Score::INF, Score::INF);
                    if child.next_player() == root {
                        score
                    } else {
                        -score
                    }
                });
                let (bestmove, score) = self.pick(&actions, &scored);
                (bestmove, score, depth)
            }

            Algorithm::MinimaxTt => {
                let (board, ttable) = state.board_and_ttable();
                self.iterative_deepening(board, ttable, &actions)
            }
        };

        let result = SearchResult {
            bestmove,
            score,
            nodes: self.nodes,
            evaluations: self.evaluations,
            depth,
        };

        log::debug!(
            "Search chose {} with score {} after {} nodes and {} evaluations",
            result.bestmove.map(|a| a.to_string()).unwrap_or_default(),
            result.score,
            result.nodes,
            result.evaluations
        );
        if result.score.is_decisive() {
            let result_kind = if result.score > Score::DRAW { "win" } else { "loss" };
            log::debug!("Player {} has a forced {result_kind}", self.root);
        }
        if let Some(ttable) = state.ttable() {
            let (hits, accesses, collisions) = ttable.stats();
            log::debug!(
                "TTable: {hits} hits / {accesses} accesses, {collisions} collisions, {} entries",
                ttable.num_entries()
            );
        }

        result
    }

    /// Scores every action in `ordering` with a full window, so that tied actions have exact scores.
    fn score_root(
        &mut self,
        board: &mut Board,
        ordering: &[Action],
        mut child_score: impl FnMut(&mut Self, &mut Board) -> Score,
    ) -> Vec<(Action, Score)> {
        ordering
            .iter()
            .map(|&action| {
                self.nodes += 1;
                let mut child = board.scoped(action);
                let score = child_score(self, &mut *child);
                (action, score)
            })
            .collect()
    }

    /// Chooses uniformly at random among the best-scoring actions.
    ///
    /// Candidates are drawn in the order of `actions`, regardless of the order they were scored in.
    fn pick(&mut self, actions: &[Action], scored: &[(Action, Score)]) -> (Option<Action>, Score) {
        let best = scored
            .iter()
            .map(|&(_, score)| score)
            .fold(-Score::INF, Score::max);

        let tied = actions
            .iter()
            .copied()
            .filter(|action| scored.iter().any(|(a, score)| a == action && *score == best))
            .collect::<Vec<_>>();

        (tied.choose(&mut *self.rng).copied(), best)
    }

    /// Performs iterative deepening from depth 1, re-ordering actions at every visited node through `ttable`.
    fn iterative_deepening(
        &mut self,
        board: &mut Board,
        ttable: &mut TTable,
        actions: &[Action],
    ) -> (Option<Action>, Score, u8) {
        let key = board.key();
        let mut scored = Vec::new();
        let mut completed = 0;

        for depth in 1..self.config.max_depth.max(2) {
            let ordering = ttable
                .probe(&key, actions)
                .unwrap_or_else(|| actions.to_vec());

            scored = self.score_root(board, &ordering, |search, child| {
                search.minimax_tt(child, ttable, depth - 1, -Score::INF, Score::INF)
            });

            let mut sorted = scored.clone();
            sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
            ttable.store(TTableEntry::new(
                key,
                depth,
                sorted.into_iter().map(|(action, _)| action).collect(),
            ));

            completed = depth;
            log::debug!(
                "Completed depth {depth}: {} nodes, {} evaluations",
                self.nodes,
                self.evaluations
            );
        }

        let (bestmove, score) = self.pick(actions, &scored);
        (bestmove, score, completed)
    }

    /// Static evaluation of `board` from the root player's perspective.
    #[inline(always)]
    fn evaluate(&mut self, board: &Board) -> Score {
        self.evaluations += 1;
        score_for(self.evaluator.evaluate(board), self.root)
    }

    /// Score of a finished game from `player`'s perspective, if the game is over.
    #[inline(always)]
    fn terminal_score(board: &Board, player: Player) -> Option<Score> {
        match board.is_terminal() {
            Outcome::Ongoing => None,
            Outcome::Draw => Some(Score::DRAW),
            Outcome::Winner(winner) if winner == player => Some(Score::INF),
            Outcome::Winner(_) => Some(-Score::INF),
        }
    }

    /// Depth-limited minimax with alpha-beta pruning, scored from the root player's perspective.
    ///
    /// A node is maximizing whenever the root player is to move, so capture chains stay on the same side.
    fn minimax(&mut self, board: &mut Board, depth: u8, mut alpha: Score, mut beta: Score) -> Score {
        if let Some(score) = Self::terminal_score(board, self.root) {
            return score;
        }
        if depth == 0 {
            return self.evaluate(board);
        }

        let actions = board.valid_actions();
        if actions.is_empty() {
            return self.evaluate(board);
        }

        let maximizing = board.next_player() == self.root;
        let mut best = if maximizing { -Score::INF } else { Score::INF };

        for action in actions {
            self.nodes += 1;
            let mut child = board.scoped(action);
            let score = self.minimax(&mut child, depth - 1, alpha, beta);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }

            if alpha >= beta {
                break;
            }
        }

        best
    }

    /// Primary location of the negamax search.
    ///
    /// Scores are from the perspective of the player to move on `board`.
    /// A child's score is only negated when the turn passed to the opponent.
    fn negamax(&mut self, board: &mut Board, depth: u8, mut alpha: Score, beta: Score) -> Score {
        let mover = board.next_player();

        if let Some(score) = Self::terminal_score(board, mover) {
            return score;
        }
        if depth == 0 {
            self.evaluations += 1;
            return score_for(self.evaluator.evaluate(board), mover);
        }

        let actions = board.valid_actions();
        if actions.is_empty() {
            self.evaluations += 1;
            return score_for(self.evaluator.evaluate(board), mover);
        }

        // Start with a *really bad* initial score
        let mut best = -Score::INF;

        for action in actions {
            self.nodes += 1;
            let mut child = board.scoped(action);

            let score = if child.next_player() == mover {
                self.negamax(&mut child, depth - 1, alpha, beta)
            } else {
                -self.negamax(&mut child, depth - 1, -beta, -alpha)
            };

            best = best.max(score);
            alpha = alpha.max(best);
            if alpha >= beta {
                break;
            }
        }

        best
    }

    /// [`Self::minimax`], searching actions in the order cached for the position and caching the new order.
    ///
    /// Explored actions are stored best-first for the player to move, followed by any pruned actions in their old order.
    fn minimax_tt(
        &mut self,
        board: &mut Board,
        ttable: &mut TTable,
        depth: u8,
        mut alpha: Score,
        mut beta: Score,
    ) -> Score {
        if let Some(score) = Self::terminal_score(board, self.root) {
            return score;
        }
        if depth == 0 {
            return self.evaluate(board);
        }

        let actions = board.valid_actions();
        if actions.is_empty() {
            return self.evaluate(board);
        }

        let key = board.key();
        let ordering = ttable.probe(&key, &actions).unwrap_or(actions);

        let maximizing = board.next_player() == self.root;
        let mut best = if maximizing { -Score::INF } else { Score::INF };
        let mut scored = Vec::with_capacity(ordering.len());

        for &action in &ordering {
            self.nodes += 1;
            let score = {
                let mut child = board.scoped(action);
                self.minimax_tt(&mut child, ttable, depth - 1, alpha, beta)
            };
            scored.push((action, score));

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }

            if alpha >= beta {
                break;
            }
        }

        let explored = scored.len();
        scored.sort_by(|a, b| {
            let order = if maximizing {
                b.1.partial_cmp(&a.1)
            } else {
                a.1.partial_cmp(&b.1)
            };
            order.unwrap_or(Ordering::Equal)
        });

        let mut new_order = scored.into_iter().map(|(action, _)| action).collect::<Vec<_>>();
        new_order.extend_from_slice(&ordering[explored..]);
        ttable.store(TTableEntry::new(key, depth, new_order));

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cell, Heuristic};
    use rand::SeedableRng;

    fn run(board: &Board, config: SearchConfig, seed: u64) -> SearchResult {
        let mut state = State::new(board.clone());
        let mut rng = StdRng::seed_from_u64(seed);
        let res = Search::new(&Heuristic::PieceCount, config, &mut rng).start(&mut state);
        assert_eq!(
            state.board(),
            board,
            "Search with config {config:?} left the board modified"
        );
        res
    }

    fn example_board() -> Board {
        #[rustfmt::skip]
        let grid = [
            0, 0, 0, 0, 2,
            0, 1, 1, 2, 0,
            2, 2, 1, 1, 0,
            0, 2, 0, 0, 0,
            1, 0, 0, 0, 0,
        ];
        Board::from_grid(5, 5, Player::Two, &grid).unwrap()
    }

    #[test]
    fn test_minimax_and_negamax_agree() {
        for board in [Board::new(5, 5).unwrap(), example_board(), Board::new(7, 5).unwrap()] {
            for depth in 1..=4 {
                for seed in 0..4 {
                    let minimax = run(&board, SearchConfig::new(depth, Algorithm::Minimax), seed);
                    let negamax = run(&board, SearchConfig::new(depth, Algorithm::Negamax), seed);
                    assert_eq!(
                        minimax.score, negamax.score,
                        "Scores differ at depth {depth} on\n{board}"
                    );
                    assert_eq!(
                        minimax.bestmove, negamax.bestmove,
                        "Actions differ at depth {depth} with seed {seed} on\n{board}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_ttable_search_matches_minimax_one_ply_shallower() {
        let board = Board::new(5, 5).unwrap();
        for seed in 0..4 {
            let minimax = run(&board, SearchConfig::new(3, Algorithm::Minimax), seed);
            let tt = run(&board, SearchConfig::new(4, Algorithm::MinimaxTt), seed);

            assert_eq!(tt.depth, 3);
            assert_eq!(minimax.score, tt.score);
            assert_eq!(minimax.bestmove, tt.bestmove);
        }
    }

    #[test]
    fn test_ttable_persists_on_state() {
        let mut state = State::new(Board::new(5, 5).unwrap());
        let mut rng = StdRng::seed_from_u64(7);
        let config = SearchConfig::new(4, Algorithm::MinimaxTt);

        Search::new(&Heuristic::Border, config, &mut rng).start(&mut state);
        let ttable = state.ttable().unwrap();
        assert!(ttable.num_entries() > 0);
        assert!(ttable.get(&state.board().key()).is_some(), "The root ordering must be cached");
    }

    #[test]
    fn test_single_action_is_not_searched() {
        #[rustfmt::skip]
        let grid = [
            1, 2, 0,
            0, 0, 0,
            0, 0, 0,
        ];
        let board = Board::from_grid(3, 3, Player::One, &grid).unwrap();
        assert_eq!(board.valid_actions().len(), 1);

        for algorithm in Algorithm::ALL {
            let res = run(&board, SearchConfig::new(6, algorithm), 0);
            assert_eq!(res.evaluations, 0);
            assert_eq!(res.nodes, 0);
            assert_eq!(res.score, Score::INF, "Capturing the last piece wins");
            assert_eq!(
                res.bestmove,
                Some(Action::new_capture(Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)))
            );
        }
    }

    #[test]
    fn test_single_action_reports_child_score() {
        #[rustfmt::skip]
        let grid = [
            0, 0, 0,
            1, 2, 0,
            0, 0, 2,
        ];
        let board = Board::from_grid(3, 3, Player::One, &grid).unwrap();
        let actions = board.valid_actions();
        assert_eq!(actions.len(), 1);

        let mut child = board.clone();
        let mut action = actions[0];
        action.execute(&mut child);
        assert!(!child.is_terminal().is_over());
        assert_eq!(child.next_player(), Player::Two);

        for algorithm in Algorithm::ALL {
            let res = run(&board, SearchConfig::new(4, algorithm), 0);
            assert_eq!(res.nodes, 0);
            assert_eq!(res.evaluations, 1);
            assert_eq!(res.score, score_for(Heuristic::PieceCount.evaluate(&child), Player::One));
        }
    }

    #[test]
    fn test_finds_winning_capture() {
        #[rustfmt::skip]
        let grid = [
            1, 0, 0, 0, 0,
            0, 2, 0, 0, 0,
            1, 0, 0, 0, 0,
            0, 0, 0, 0, 0,
            0, 0, 0, 0, 0,
        ];
        let board = Board::from_grid(5, 5, Player::One, &grid).unwrap();
        assert_eq!(board.valid_actions().len(), 2);

        for algorithm in Algorithm::ALL {
            let res = run(&board, SearchConfig::new(3, algorithm), 1);
            assert_eq!(res.score, Score::INF, "{algorithm} should see the win");
            assert!(res.bestmove.unwrap().is_capture());
        }
    }

    #[test]
    fn test_ties_are_broken_by_seed() {
        let board = Board::new(5, 5).unwrap();
        let config = SearchConfig::new(1, Algorithm::Minimax);

        let chosen = (0..32)
            .filter_map(|seed| run(&board, config, seed).bestmove)
            .collect::<Vec<_>>();

        assert_eq!(run(&board, config, 3).bestmove, run(&board, config, 3).bestmove);
        assert!(
            chosen.iter().any(|a| *a != chosen[0]),
            "All opening actions tie at depth 1, so different seeds should pick different ones"
        );
    }

    #[test]
    fn test_algorithm_names_round_trip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>().unwrap(), algorithm);
        }
        assert!("alphabeta".parse::<Algorithm>().is_err());
    }
}

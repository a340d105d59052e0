/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::{bail, Context, Result};
use clap::{builder::PossibleValue, Args, Parser, Subcommand, ValueEnum};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    perft, tournament, Agent, AgentSpec, Algorithm, Board, Evaluate, GameConfig, Heuristic,
    MatchStats, Player, SearchAgent, SearchConfig, State, DEFAULT_COLS, DEFAULT_ROWS,
    DEFAULT_TOURNAMENT_DEPTHS,
};

/// Play, pit AIs against each other, and inspect positions of an Alquerque-style jumping game.
#[derive(Debug, Clone, Parser)]
#[command(version, about, rename_all = "lower")]
pub struct Cli {
    /// Logging filter, such as `debug` or `alquerque=trace`.
    ///
    /// If unset, `RUST_LOG` is used, falling back to `info`.
    #[arg(short = 'L', long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// A position to operate on.
#[derive(Debug, Clone, Args)]
pub struct BoardArgs {
    /// Number of rows. Must be odd.
    #[arg(short, long, default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    /// Number of columns. Must be odd.
    #[arg(short, long, default_value_t = DEFAULT_COLS)]
    pub cols: usize,

    /// Comma-separated piece values (0 empty, 1, or 2), row by row.
    ///
    /// If unset, the standard starting layout is used.
    #[arg(short, long, value_delimiter = ',')]
    pub grid: Option<Vec<u8>>,

    /// The player to move.
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub next: u8,
}

impl BoardArgs {
    /// Builds the described board.
    pub fn board(&self) -> Result<Board> {
        let next = Player::try_from(self.next)?;
        Board::with_options(self.rows, self.cols, next, self.grid.as_deref())
            .context("invalid board")
    }
}

/// Settings shared by every command that plays matches.
#[derive(Debug, Clone, Args)]
pub struct MatchArgs {
    /// Number of rows. Must be odd.
    #[arg(short, long, default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    /// Number of columns. Must be odd.
    #[arg(short, long, default_value_t = DEFAULT_COLS)]
    pub cols: usize,

    /// Number of matches between each pair of agents.
    #[arg(short, long, default_value_t = 1)]
    pub matches: usize,

    /// Seed for the agents' random number generators.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Number of actions after which a match is declared a draw.
    #[arg(short = 't', long, default_value_t = GameConfig::default().max_turns)]
    pub max_turns: usize,

    /// If set, the board is logged after every action.
    #[arg(short, long, default_value = "false")]
    pub log_moves: bool,
}

impl From<MatchArgs> for GameConfig {
    fn from(args: MatchArgs) -> Self {
        Self {
            rows: args.rows,
            cols: args.cols,
            matches: args.matches,
            seed: args.seed,
            max_turns: args.max_turns,
            log_moves: args.log_moves,
        }
    }
}

/// A command to execute.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Play matches between two agents.
    ///
    /// Agents are `random`, or `<algorithm>[:<heuristic>[:<depth>]]` such as `negamax:border:7`.
    Play {
        /// The agent playing as player one.
        one: AgentSpec,

        /// The agent playing as player two.
        two: AgentSpec,

        #[command(flatten)]
        settings: MatchArgs,
    },

    /// Play every pairing of the contenders, including each contender against itself.
    #[command(alias = "tourney")]
    Tournament {
        /// The contenders. Defaults to the random agent plus every algorithm and heuristic at each of `depths`.
        contenders: Vec<AgentSpec>,

        /// Comma-separated search depths of the default contenders.
        #[arg(short, long, value_delimiter = ',', default_values_t = DEFAULT_TOURNAMENT_DEPTHS)]
        depths: Vec<u8>,

        #[command(flatten)]
        settings: MatchArgs,
    },

    /// Print a visual representation of a position.
    #[command(alias = "d")]
    Display {
        #[command(flatten)]
        board: BoardArgs,
    },

    /// Print the evaluation of a position under every heuristic, or a specific one.
    Eval {
        #[arg(long)]
        heuristic: Option<Heuristic>,

        #[command(flatten)]
        board: BoardArgs,
    },

    /// Ask a search for the action it would play in a position.
    Hint {
        #[arg(short, long, default_value = "minimax")]
        algorithm: Algorithm,

        #[arg(long, default_value = "piece-count")]
        heuristic: Heuristic,

        #[arg(short, long, default_value_t = SearchConfig::default().max_depth)]
        depth: u8,

        /// Seed for breaking ties between equally good actions.
        #[arg(short, long)]
        seed: Option<u64>,

        #[command(flatten)]
        board: BoardArgs,
    },

    /// Shows all legal actions in a position, or those of a specific piece.
    Moves {
        /// Column of the piece whose actions to show.
        #[arg(short, long, requires = "y")]
        x: Option<isize>,

        /// Row of the piece whose actions to show.
        #[arg(short, long, requires = "x")]
        y: Option<isize>,

        #[command(flatten)]
        board: BoardArgs,
    },

    /// Performs a perft on a position at the supplied depth, printing total node count.
    Perft {
        depth: usize,

        /// If set, the count below each root action is logged as well.
        #[arg(short, long, default_value = "false")]
        split: bool,

        #[command(flatten)]
        board: BoardArgs,
    },
}

impl Command {
    /// Executes this command, printing its results.
    pub fn run(self) -> Result<()> {
        match self {
            Self::Play { one, two, settings } => {
                let config = GameConfig::from(settings);
                let stats = MatchStats::run(&config, [one, two])?;
                println!("{one} vs {two}: {stats}");
            }

            Self::Tournament {
                contenders,
                depths,
                settings,
            } => {
                let contenders = if contenders.is_empty() {
                    AgentSpec::contenders(&depths)
                } else {
                    contenders
                };

                let config = GameConfig::from(settings);
                for (one, two, stats) in tournament(&config, &contenders)? {
                    println!("{one} vs {two}: {stats}");
                }
            }

            Self::Display { board } => println!("{}", board.board()?),

            Self::Eval { heuristic, board } => {
                let board = board.board()?;
                let heuristics = match heuristic {
                    Some(heuristic) => vec![heuristic],
                    None => Heuristic::ALL.to_vec(),
                };

                for heuristic in heuristics {
                    println!("{heuristic}: {}", heuristic.evaluate(&board));
                }
            }

            Self::Hint {
                algorithm,
                heuristic,
                depth,
                seed,
                board,
            } => {
                let mut state = State::new(board.board()?);
                if state.board().is_terminal().is_over() {
                    bail!("the game is already over: {}", state.board().is_terminal());
                }
                if state.board().valid_actions().is_empty() {
                    bail!("player {} has no legal actions", state.board().next_player());
                }

                let rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                let config = SearchConfig::new(depth.max(1), algorithm);
                let mut agent = SearchAgent::new(heuristic, config, rng);
                println!("{}", agent.select(&mut state));
            }

            Self::Moves { x, y, board } => {
                let board = board.board()?;
                let actions = match (x, y) {
                    (Some(x), Some(y)) => board.piece_actions(x, y)?,
                    _ => board.valid_actions(),
                };

                for action in actions {
                    println!("{action}");
                }
            }

            Self::Perft { depth, split, board } => {
                let mut board = board.board()?;
                let nodes = if split {
                    perft::<true>(&mut board, depth)
                } else {
                    perft::<false>(&mut board, depth)
                };
                println!("{nodes}");
            }
        }

        Ok(())
    }
}

impl ValueEnum for Heuristic {
    fn value_variants<'a>() -> &'a [Self] {
        &Heuristic::ALL
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        let value = PossibleValue::new(self.name());

        // Numbered names are accepted as well
        let value = match self {
            Heuristic::PieceCount => value.aliases(["pieces", "eval1"]),
            Heuristic::Border => value.alias("eval2"),
        };

        Some(value)
    }
}

impl ValueEnum for Algorithm {
    fn value_variants<'a>() -> &'a [Self] {
        &Algorithm::ALL
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        let value = PossibleValue::new(self.name());

        let value = match self {
            Algorithm::Minimax | Algorithm::Negamax => value,
            Algorithm::MinimaxTt => value.aliases(["minimax_tt", "tt"]),
        };

        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FORCED_CAPTURE_GRID;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("alquerque").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_play() {
        let cli = parse(&["play", "random", "negamax:border:3", "--matches", "4", "--seed", "9"]);
        let Command::Play { one, two, settings } = cli.command else {
            panic!("expected a play command");
        };

        assert_eq!(one, AgentSpec::Random);
        assert_eq!(two.to_string(), "negamax:border:3");
        let config = GameConfig::from(settings);
        assert_eq!(config.matches, 4);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.rows, DEFAULT_ROWS);
    }

    #[test]
    fn test_parse_board_args() {
        let grid = FORCED_CAPTURE_GRID.map(|v| v.to_string()).join(",");
        let cli = parse(&["moves", "--grid", grid.as_str(), "--next", "2", "-L", "debug"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));

        let Command::Moves { x, y, board } = cli.command else {
            panic!("expected a moves command");
        };
        assert_eq!((x, y), (None, None));

        let board = board.board().unwrap();
        assert_eq!(board.next_player(), Player::Two);
        assert_eq!(board.piece_values(), FORCED_CAPTURE_GRID.to_vec());
    }

    #[test]
    fn test_rejects_bad_input() {
        let with = |args: &[&str]| {
            Cli::try_parse_from(std::iter::once("alquerque").chain(args.iter().copied()))
        };

        assert!(with(&["display", "--next", "3"]).is_err());
        assert!(with(&["play", "random", "alphabeta"]).is_err());
        assert!(with(&["moves", "-x", "1"]).is_err(), "-x requires -y");
        assert!(with(&["hint", "--algorithm", "tt", "--heuristic", "eval2"]).is_ok());

        let cli = parse(&["display", "--rows", "4"]);
        let Command::Display { board } = cli.command else {
            panic!("expected a display command");
        };
        assert!(board.board().is_err());
    }

    #[test]
    fn test_run_inspection_commands() {
        for args in [
            vec!["display"],
            vec!["eval", "--heuristic", "border"],
            vec!["moves", "-x", "1", "-y", "1"],
            vec!["perft", "2"],
            vec!["hint", "--depth", "2", "--seed", "0"],
        ] {
            let cli = parse(&args);
            assert!(cli.command.run().is_ok(), "{args:?} failed");
        }
    }
}

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use eyre::{Context, Result, eyre};
use itertools::Itertools;
use serde::Serialize;
use twistypuzzle_library::{
    PieceKind, Puzzle, PuzzleController, PuzzleId, ScrambleParams, ScrambleType,
    reverse_solve_durations, reverse_solve_tokens,
};

use crate::settings::Settings;

/// Length of one frame of the simulated clock.
const FRAME: Duration = Duration::from_millis(16);

/// Twisty puzzle command-line interface
#[derive(Debug, clap::Parser)]
#[command(version)]
pub(crate) struct Args {
    /// Settings file (YAML) layered over the built-in defaults.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Log more detail. Repeat for even more.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Subcommand {
    /// Print the IDs of the built-in puzzles.
    Puzzles,
    /// Print information about a puzzle as JSON.
    Info {
        /// Puzzle ID (such as `megaminx`, `cube:2x3x4`, or `mirror:3`)
        puzzle: PuzzleId,
    },
    /// Print a scramble for a puzzle.
    Scramble {
        /// Puzzle ID (such as `megaminx`, `cube:2x3x4`, or `mirror:3`)
        puzzle: PuzzleId,
        /// Random seed. A fresh one is drawn if omitted.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Apply moves to a puzzle and print the result as JSON.
    Apply {
        /// Puzzle ID (such as `megaminx`, `cube:2x3x4`, or `mirror:3`)
        puzzle: PuzzleId,
        /// Moves in notation (such as `R U' 2L2`).
        moves: Vec<String>,
        /// Scramble with this seed before applying the moves.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Apply moves to a solved puzzle and print the schedule that undoes
    /// them as JSON.
    Reverse {
        /// Puzzle ID (such as `megaminx`, `cube:2x3x4`, or `mirror:3`)
        puzzle: PuzzleId,
        /// Moves in notation (such as `R U' 2L2`).
        moves: Vec<String>,
    },
}

#[derive(Serialize, Debug)]
struct PuzzleInfo {
    id: String,
    name: String,
    pieces: BTreeMap<PieceKind, usize>,
    stickers: usize,
    axes: usize,
    cycle_length: u32,
    orientations: usize,
    log: Vec<String>,
}

#[derive(Serialize, Debug)]
struct ApplyOutput {
    scramble: Vec<String>,
    history: Vec<String>,
    solved: bool,
    elapsed_ms: u128,
}

#[derive(Serialize, Debug)]
struct ReverseStep {
    token: String,
    duration_ms: u128,
}

pub(crate) fn exec(args: Args) -> Result<()> {
    let settings = Settings::load(args.config.as_deref())?;
    let build = |id: PuzzleId| -> Puzzle {
        log::debug!("building {id}");
        settings.library.build_puzzle(id)
    };
    let controller = |id: PuzzleId| -> PuzzleController {
        PuzzleController::new(build(id), settings.interaction.clone())
    };

    match args.subcommand {
        Subcommand::Puzzles => {
            for id in twistypuzzle_library::BUILTIN_PUZZLE_IDS {
                println!("{id}");
            }
            Ok(())
        }

        Subcommand::Info { puzzle } => write_json_output(&puzzle_info(puzzle, &build(puzzle))),

        Subcommand::Scramble { puzzle, seed } => {
            let mut c = controller(puzzle);
            c.scramble(scramble_params(seed))?;
            c.run_until_idle();
            println!("{}", c.machine().scramble().iter().join(" "));
            Ok(())
        }

        Subcommand::Apply {
            puzzle,
            moves,
            seed,
        } => {
            let mut c = controller(puzzle);
            if seed.is_some() {
                c.scramble(scramble_params(seed))?;
                c.run_until_idle();
            }
            let mut elapsed = Duration::ZERO;
            for token in &moves {
                c.push_notation(token)
                    .wrap_err_with(|| format!("bad move {token:?}"))?;
                elapsed += run_clock(&mut c);
            }
            write_json_output(&ApplyOutput {
                scramble: c.machine().scramble().to_vec(),
                history: c.history().to_vec(),
                solved: c.is_solved(),
                elapsed_ms: elapsed.as_millis(),
            })
        }

        Subcommand::Reverse { puzzle, moves } => {
            let mut c = controller(puzzle);
            for token in &moves {
                c.push_notation(token)
                    .wrap_err_with(|| format!("bad move {token:?}"))?;
                c.run_until_idle();
            }
            let tokens = reverse_solve_tokens(c.history(), c.machine().scramble());
            let durations = reverse_solve_durations(
                tokens.len(),
                settings.interaction.reverse_duration(),
                settings.interaction.reverse_budget(),
            );
            let steps = std::iter::zip(tokens, durations)
                .map(|(token, d)| ReverseStep {
                    token,
                    duration_ms: d.as_millis(),
                })
                .collect_vec();
            write_json_output(&steps)
        }
    }
}

fn scramble_params(seed: Option<u64>) -> ScrambleParams {
    match seed {
        Some(seed) => ScrambleParams::from_seed(ScrambleType::Full, seed),
        None => ScrambleParams::new(ScrambleType::Full),
    }
}

/// Advances the controller frame by frame until it is idle and returns the
/// simulated time that took.
fn run_clock(c: &mut PuzzleController) -> Duration {
    let mut elapsed = Duration::ZERO;
    c.advance(Duration::ZERO);
    while !c.machine().is_idle() {
        c.advance(FRAME);
        elapsed += FRAME;
    }
    elapsed
}

fn puzzle_info(id: PuzzleId, puzzle: &Puzzle) -> PuzzleInfo {
    PuzzleInfo {
        id: id.to_string(),
        name: puzzle.family().name(),
        pieces: puzzle.pieces().iter().map(|p| p.kind).counts().into_iter().collect(),
        stickers: puzzle.pieces().iter().map(|p| p.stickers.len()).sum(),
        axes: puzzle.axis_count(),
        cycle_length: puzzle.cycle_length(),
        orientations: puzzle.registry().valid_orientations().len(),
        log: puzzle
            .logger()
            .lines()
            .iter()
            .map(|line| format!("[{}] {}", line.level, line.msg))
            .collect(),
    }
}

fn write_json_output<T: Serialize>(value: &T) -> Result<()> {
    serde_json::to_writer_pretty(std::io::stdout(), value)
        .context("error serializing data and writing to stdout")?;
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_info_counts_pieces() {
        let id: PuzzleId = "cube:3".parse().unwrap();
        let info = puzzle_info(id, &Settings::default().library.build_puzzle(id));
        assert_eq!(info.id, "cube:3");
        assert_eq!(info.stickers, 54);
        assert_eq!(info.axes, 3);
        assert_eq!(info.cycle_length, 4);
        assert_eq!(info.orientations, 24);
        assert_eq!(info.pieces[&PieceKind::Corner], 8);
        assert!(info.log.is_empty());
    }

    #[test]
    fn test_simulated_clock_runs_to_idle() {
        let id = PuzzleId::Cube([3, 3, 3]);
        let params = Settings::default().interaction;
        let mut c = PuzzleController::new(Settings::default().library.build_puzzle(id), params);
        c.push_notation("R").unwrap();
        let elapsed = run_clock(&mut c);
        assert!(elapsed >= Duration::from_millis(140));
        assert_eq!(c.history(), ["R"]);
        assert!(!c.is_solved());
    }

    #[test]
    fn test_args_parse() {
        use clap::Parser;

        let args = Args::try_parse_from(["twistycube", "-vv", "apply", "cube:2x3x4", "U2", "R2"])
            .unwrap();
        assert_eq!(args.verbose, 2);
        match args.subcommand {
            Subcommand::Apply { puzzle, moves, seed } => {
                assert_eq!(puzzle, PuzzleId::Cube([2, 3, 4]));
                assert_eq!(moves, ["U2", "R2"]);
                assert_eq!(seed, None);
            }
            other => panic!("wrong subcommand: {other:?}"),
        }
        assert!(Args::try_parse_from(["twistycube", "info", "dodecahedron"]).is_err());
    }
}

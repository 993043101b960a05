use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::style::Stylize;
use rand::{rngs::SmallRng, SeedableRng};
use slider_search::{
    strategy::DEFAULT_DEPTH_STEP, BoardState, CostCalculator, Puzzle, PuzzleError, Search, Strategy,
};
use std::{fs, path::Path, path::PathBuf, time::Instant};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Board file, tiles in row-major order with `_` for the blank
    board_file: Option<PathBuf>,

    /// Goal board file; defaults to ascending tiles with the blank last
    #[clap(short, long)]
    goal: Option<PathBuf>,

    /// Strategies to run, in order; defaults to the cost-guided heuristics
    #[clap(short, long = "strategy", value_enum)]
    strategies: Vec<StrategyArg>,

    /// Bound for depth-limited search and the cap for iterative deepening
    #[clap(long, default_value_t = 31)]
    depth_limit: u32,

    /// Maximum number of solution steps to print
    #[clap(long, default_value_t = 100)]
    trace: usize,

    /// Scramble the goal this many times and solve each scramble
    #[clap(long)]
    self_test: Option<usize>,

    /// Random moves per self-test scramble
    #[clap(long, default_value_t = 100)]
    scramble: usize,

    /// Seed for self-test scrambles
    #[clap(long, default_value_t = 514514)]
    seed: u64,

    /// Board width when neither a board nor a goal file is given
    #[clap(long, default_value_t = 3)]
    size: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    Bfs,
    Dfs,
    Dls,
    Ids,
    Bidirectional,
    Manhattan,
    ManhattanInversions,
    Greedy,
    Misplaced,
}

impl StrategyArg {
    const DEFAULTS: [StrategyArg; 3] = [
        StrategyArg::Manhattan,
        StrategyArg::ManhattanInversions,
        StrategyArg::Misplaced,
    ];

    fn strategy(self, depth_limit: u32) -> Strategy {
        match self {
            StrategyArg::Bfs => Strategy::breadth_first(),
            StrategyArg::Dfs => Strategy::depth_first(),
            StrategyArg::Dls => Strategy::depth_limited(depth_limit),
            StrategyArg::Ids => Strategy::iterative_deepening_with(
                DEFAULT_DEPTH_STEP.min(depth_limit),
                DEFAULT_DEPTH_STEP,
                depth_limit,
            ),
            StrategyArg::Bidirectional => Strategy::bidirectional(),
            StrategyArg::Manhattan
            | StrategyArg::ManhattanInversions
            | StrategyArg::Greedy
            | StrategyArg::Misplaced => Strategy::cost_guided(),
        }
    }

    fn calculator(self) -> CostCalculator {
        match self {
            StrategyArg::Manhattan => CostCalculator::Manhattan,
            StrategyArg::ManhattanInversions => CostCalculator::ManhattanInversions,
            StrategyArg::Greedy => CostCalculator::GreedyManhattan,
            StrategyArg::Misplaced => CostCalculator::MisplacedTiles,
            _ => CostCalculator::PathLength,
        }
    }
}

fn read_board(path: &Path) -> Result<BoardState> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    content
        .parse()
        .with_context(|| format!("The board in {} is not valid", path.display()))
}

/// Runs every requested strategy on `puzzle` and returns how many outcomes
/// contradict the parity prediction.
fn analyze(
    puzzle: &Puzzle,
    goal: &BoardState,
    args: &Args,
    strategies: &[StrategyArg],
) -> Result<usize> {
    let has_solution = puzzle.has_solution(goal);
    println!("Puzzle has solution?: {}", has_solution);

    let mut mismatches = 0;
    for &choice in strategies {
        let mut strategy = choice.strategy(args.depth_limit);
        let calculator = choice.calculator();

        println!("Attempting to solve puzzle:\n{}", puzzle);
        println!("Attempting to solve with {} ({})", strategy.name(), calculator.name());

        let begin = Instant::now();
        let report = Search::new(goal, calculator)
            .with_trace_limit(args.trace)
            .solve(puzzle, &mut strategy)?;
        let elapsed = begin.elapsed();

        if report.is_solved() {
            println!("Search complete: {}", "SUCCESS".green().bold());
        } else {
            println!("Search complete: {}", "FAILURE".red().bold());
        }
        println!("{}", report.stats);
        println!("Time taken: {}ms", elapsed.as_millis());

        if let Some(solution) = &report.solution {
            println!("Found a solution in {} moves", solution.moves.len());
            print!("{}", solution.trace);
        }

        let contradicts = if strategy.is_complete() {
            report.is_solved() != has_solution
        } else {
            report.is_solved() && !has_solution
        };
        if contradicts {
            println!("{}", "Outcome contradicts the parity check".red().bold());
            mismatches += 1;
        } else if !report.is_solved() && has_solution {
            println!("{}", "Bound too small to reach the goal".yellow());
        }
        println!();
    }
    Ok(mismatches)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let board = args.board_file.as_deref().map(read_board).transpose()?;
    let goal = match (&args.goal, &board) {
        (Some(path), _) => read_board(path)?,
        (None, Some(board)) => BoardState::goal(board.size())?,
        (None, None) => BoardState::goal(args.size)?,
    };
    if let Some(board) = &board {
        if board.size() != goal.size() {
            return Err(PuzzleError::SizeMismatch {
                expected: goal.size(),
                found: board.size(),
            })
            .context("Board and goal differ in size");
        }
    }

    let strategies = if args.strategies.is_empty() {
        StrategyArg::DEFAULTS.to_vec()
    } else {
        args.strategies.clone()
    };

    if board.is_none() && args.self_test.is_none() {
        bail!("Nothing to solve: give a board file or --self-test");
    }

    let mut mismatches = 0;
    if let Some(count) = args.self_test {
        println!("Running tests");
        println!("{}", goal);
        let mut rng = SmallRng::seed_from_u64(args.seed);
        for _ in 0..count {
            let mut puzzle = Puzzle::new(goal.clone());
            puzzle.scramble(args.scramble, &mut rng);
            mismatches += analyze(&puzzle, &goal, &args, &strategies)?;
        }
    }

    if let Some(board) = board {
        mismatches += analyze(&Puzzle::new(board), &goal, &args, &strategies)?;
    }

    if mismatches > 0 {
        bail!("{} searches contradicted the parity check", mismatches);
    }
    Ok(())
}

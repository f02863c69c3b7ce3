use std::time::Instant;

use clap::Parser;
use eight_puzzle::astar::{AStar, HeuristicKind, SearchConfig};
use eight_puzzle::engine::Board;
use eight_puzzle::trials::random_start;
use rand::Rng;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let cfg = SearchConfig { max_f: args.max_f, ..SearchConfig::default() };
    let start = match args.board {
        Some(board) => board,
        None => {
            let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
            log::info!("scrambling {} moves with seed {}", args.scramble, seed);
            random_start(cfg.goal, args.scramble, seed)
        }
    };

    let mut solver = AStar::with_config(args.heuristic.evaluator(cfg.goal), cfg);
    let timer = Instant::now();
    let solution = solver.solve(start)?;
    let elapsed = timer.elapsed().as_secs_f64();

    if !args.quiet {
        println!("{}", solution.path);
    }
    println!(
        "Solved {:?} in {} moves | heuristic: {} | discovered: {} | expanded: {} | {:.6}s",
        start,
        solution.moves,
        args.heuristic,
        solution.stats.discovered,
        solution.stats.expanded,
        elapsed
    );
    Ok(())
}

#[derive(Debug, Parser)]
#[command(name = "eight-puzzle", about = "Solve an 8-puzzle optimally with A*")]
struct Args {
    /// Start board: nine row-major digits with 0 for the blank (e.g. 123405786),
    /// or a packed 0x value
    #[arg(long)]
    board: Option<Board>,

    /// Random moves applied to the goal when no --board is given
    #[arg(long, default_value_t = 100_000, conflicts_with = "board")]
    scramble: usize,

    /// Seed for the random start board
    #[arg(long, conflicts_with = "board")]
    seed: Option<u64>,

    /// Heuristic: zero, misplaced or manhattan
    #[arg(long, default_value_t = HeuristicKind::Manhattan)]
    heuristic: HeuristicKind,

    /// Largest f-score the frontier accepts
    #[arg(long, default_value_t = 50)]
    max_f: u32,

    /// Print only the summary line
    #[arg(long)]
    quiet: bool,
}

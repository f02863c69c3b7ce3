use clap::Parser;
use eight_puzzle::astar::{HeuristicKind, SearchConfig};
use eight_puzzle::trials::{run_trials, TrialConfig, TrialSummary};
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new().num_threads(threads).build_global()?;
    }

    // Every heuristic solves the same boards.
    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    log::info!("base seed {}", seed);

    let heuristics = if args.heuristic.is_empty() { vec![HeuristicKind::Manhattan] } else { args.heuristic.clone() };
    let mut summaries = Vec::with_capacity(heuristics.len());
    for heuristic in heuristics {
        let cfg = TrialConfig {
            trials: args.trials,
            scramble_steps: args.scramble,
            heuristic,
            seed: Some(seed),
            search: SearchConfig { max_f: args.max_f, ..SearchConfig::default() },
        };

        let pb = if args.quiet { ProgressBar::hidden() } else { ProgressBar::new(args.trials as u64) };
        pb.set_style(
            ProgressStyle::with_template("{prefix:>10} [{bar:40}] {pos}/{len} {elapsed_precise}")?
                .progress_chars("=> "),
        );
        pb.set_prefix(heuristic.name());
        let summary = run_trials(&cfg, |_| pb.inc(1))?;
        pb.finish_and_clear();

        if !args.json {
            report(&summary);
        }
        summaries.push(summary);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    }

    let failures: usize = summaries.iter().map(|s| s.failures).sum();
    if failures > 0 {
        anyhow::bail!("{} trial(s) failed; rerun with RUST_LOG=error for details", failures);
    }
    Ok(())
}

fn report(summary: &TrialSummary) {
    println!("[{}] average time taken is {:.6}s", summary.heuristic, summary.avg_elapsed_s);
    println!("[{}] average discovered is {}", summary.heuristic, summary.avg_discovered);
    println!(
        "[{}] trials: {} | expanded: {} | moves: {:.2} avg, {} max",
        summary.heuristic, summary.trials, summary.avg_expanded, summary.avg_moves, summary.max_moves
    );
}

#[derive(Debug, Parser)]
#[command(name = "bench", about = "Average A* cost over random 8-puzzle boards")]
struct Args {
    /// Boards to solve per heuristic
    #[arg(long, default_value_t = 500)]
    trials: usize,

    /// Random moves applied to the goal for each start board
    #[arg(long, default_value_t = 100_000)]
    scramble: usize,

    /// Heuristic to run (zero, misplaced, manhattan); repeat to compare
    #[arg(long)]
    heuristic: Vec<HeuristicKind>,

    /// Largest f-score the frontier accepts
    #[arg(long, default_value_t = 50)]
    max_f: u32,

    /// Base seed; trial i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Hide the progress bar
    #[arg(long)]
    quiet: bool,

    /// Print the summaries as JSON instead of text
    #[arg(long)]
    json: bool,
}

//! Benchmark trials: scramble a random solvable board, solve it, time it.
//!
//! Trials are independent (each builds its own frontier and closed set), so
//! they run in parallel on the rayon pool. Seeds are `base + index`, making a
//! run with a fixed base seed reproducible and letting several heuristics be
//! compared on the same boards.

use std::time::Instant;

use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

use crate::astar::{
    AStar, ConfigError, Heuristic, HeuristicKind, Search, SearchConfig, SearchError, Solution,
};
use crate::engine::Board;

#[derive(Debug, Clone)]
pub struct TrialConfig {
    /// Number of random boards to solve.
    pub trials: usize,
    /// Random moves applied to the goal to build each start board.
    pub scramble_steps: usize,
    pub heuristic: HeuristicKind,
    /// Base seed; a random one is drawn when `None`.
    pub seed: Option<u64>,
    pub search: SearchConfig,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            trials: 500,
            scramble_steps: 100_000,
            heuristic: HeuristicKind::Manhattan,
            seed: None,
            search: SearchConfig::default(),
        }
    }
}

/// One solved trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrialOutcome {
    pub seed: u64,
    pub start: Board,
    pub moves: u32,
    /// Wall-clock seconds spent in the solve (generation excluded).
    pub elapsed_s: f64,
    pub discovered: usize,
    pub expanded: u64,
}

/// Averages over a batch of trials.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialSummary {
    pub heuristic: HeuristicKind,
    pub trials: usize,
    pub failures: usize,
    pub avg_elapsed_s: f64,
    pub avg_discovered: usize,
    pub avg_expanded: u64,
    pub avg_moves: f64,
    pub max_moves: u32,
}

/// Start board for trial `seed`: a random walk of `steps` moves from `goal`.
pub fn random_start(goal: Board, steps: usize, seed: u64) -> Board {
    let mut rng = StdRng::seed_from_u64(seed);
    goal.scramble(steps, &mut rng)
}

/// Generate and solve a single board.
pub fn run_trial(cfg: &TrialConfig, seed: u64) -> Result<TrialOutcome, SearchError> {
    let start = random_start(cfg.search.goal, cfg.scramble_steps, seed);
    let solver = AStar::with_config(cfg.heuristic.evaluator(cfg.search.goal), cfg.search.clone());
    let (solution, elapsed_s) = timed_run(solver.prepare(start)?)?;
    Ok(TrialOutcome {
        seed,
        start,
        moves: solution.moves,
        elapsed_s,
        discovered: solution.stats.discovered,
        expanded: solution.stats.expanded,
    })
}

/// Run a prepared search, timing only the expansion loop and path rebuild.
///
/// Table allocation happens in [`AStar::prepare`] and is not counted.
pub fn timed_run<H: Heuristic + ?Sized>(search: Search<'_, H>) -> Result<(Solution, f64), SearchError> {
    let timer = Instant::now();
    let solution = search.run()?;
    Ok((solution, timer.elapsed().as_secs_f64()))
}

/// Run `cfg.trials` trials in parallel and average them.
///
/// `on_trial` is called once per finished trial from whichever worker ran it.
/// A failed trial is logged and counted; it never affects the others.
pub fn run_trials<F>(cfg: &TrialConfig, on_trial: F) -> Result<TrialSummary, ConfigError>
where
    F: Fn(&Result<TrialOutcome, SearchError>) + Sync,
{
    cfg.search.validate()?;
    let base = cfg.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let results: Vec<Result<TrialOutcome, SearchError>> = (0..cfg.trials)
        .into_par_iter()
        .map(|i| {
            let result = run_trial(cfg, base.wrapping_add(i as u64));
            on_trial(&result);
            result
        })
        .collect();

    let mut outcomes = Vec::with_capacity(results.len());
    let mut failures = 0;
    for (i, result) in results.into_iter().enumerate() {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                failures += 1;
                log::error!("trial {} (seed {}) failed: {}", i, base.wrapping_add(i as u64), e);
            }
        }
    }
    Ok(summarize(cfg.heuristic, &outcomes, failures))
}

pub fn summarize(heuristic: HeuristicKind, outcomes: &[TrialOutcome], failures: usize) -> TrialSummary {
    let n = outcomes.len();
    let (elapsed, discovered, expanded, moves) = outcomes.iter().fold(
        (0.0, 0usize, 0u64, 0u64),
        |(t, d, e, m), o| (t + o.elapsed_s, d + o.discovered, e + o.expanded, m + o.moves as u64),
    );
    let max_moves = outcomes.iter().map(|o| o.moves).max().unwrap_or(0);
    if n == 0 {
        return TrialSummary {
            heuristic,
            trials: 0,
            failures,
            avg_elapsed_s: 0.0,
            avg_discovered: 0,
            avg_expanded: 0,
            avg_moves: 0.0,
            max_moves,
        };
    }
    TrialSummary {
        heuristic,
        trials: n,
        failures,
        avg_elapsed_s: elapsed / n as f64,
        avg_discovered: discovered / n,
        avg_expanded: expanded / n as u64,
        avg_moves: moves as f64 / n as f64,
        max_moves,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn small(heuristic: HeuristicKind) -> TrialConfig {
        TrialConfig { trials: 6, scramble_steps: 200, heuristic, seed: Some(1234), ..Default::default() }
    }

    #[test]
    fn random_start_is_seeded_and_solvable() {
        let a = random_start(Board::GOAL, 500, 7);
        let b = random_start(Board::GOAL, 500, 7);
        assert_eq!(a, b);
        assert!(a.is_solvable_from(Board::GOAL));
    }

    #[test]
    fn trial_reports_solution() {
        let cfg = small(HeuristicKind::Manhattan);
        let outcome = run_trial(&cfg, 42).unwrap();
        assert_eq!(outcome.start, random_start(Board::GOAL, 200, 42));
        assert!(outcome.moves <= 31);
        assert!(outcome.discovered >= outcome.moves as usize);
        assert!(outcome.elapsed_s >= 0.0);
    }

    #[test]
    fn timer_starts_after_setup() {
        let solver = AStar::new(HeuristicKind::Manhattan.evaluator(Board::GOAL));
        let setup = Instant::now();
        let search = solver.prepare(Board::GOAL).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(50));
        let setup_s = setup.elapsed().as_secs_f64();
        let (solution, elapsed_s) = timed_run(search).unwrap();
        assert_eq!(solution.moves, 0);
        assert!(setup_s >= 0.05);
        assert!(elapsed_s < 0.05, "timed {elapsed_s}s, which includes setup");
    }

    #[test]
    fn batch_calls_back_once_per_trial() {
        let cfg = small(HeuristicKind::Manhattan);
        let seen = AtomicUsize::new(0);
        let summary = run_trials(&cfg, |_| {
            seen.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
        assert_eq!(seen.load(Ordering::Relaxed), 6);
        assert_eq!(summary.trials, 6);
        assert_eq!(summary.failures, 0);
        assert!(summary.avg_discovered > 0);
        assert!(summary.max_moves <= 31);
    }

    #[test]
    fn heuristics_agree_on_same_seeds() {
        let manhattan = run_trials(&small(HeuristicKind::Manhattan), |_| {}).unwrap();
        let misplaced = run_trials(&small(HeuristicKind::Misplaced), |_| {}).unwrap();
        assert_eq!(manhattan.avg_moves, misplaced.avg_moves);
        assert_eq!(manhattan.max_moves, misplaced.max_moves);
        assert!(manhattan.avg_discovered <= misplaced.avg_discovered);
    }

    #[test]
    fn failing_trials_are_counted_not_fatal() {
        let mut cfg = small(HeuristicKind::Zero);
        cfg.scramble_steps = 10_000;
        cfg.search.closed_capacity = 97;
        cfg.search.probe_prime = 53;
        let summary = run_trials(&cfg, |_| {}).unwrap();
        assert_eq!(summary.trials + summary.failures, 6);
        assert!(summary.failures > 0);
    }

    #[test]
    fn invalid_search_config_is_rejected_up_front() {
        let mut cfg = small(HeuristicKind::Manhattan);
        cfg.search.max_f = 0;
        assert_eq!(run_trials(&cfg, |_| {}).unwrap_err(), ConfigError::ZeroMaxF);
    }

    #[test]
    fn summary_averages() {
        let o = |moves: u32, discovered: usize, elapsed_s: f64| TrialOutcome {
            seed: 0,
            start: Board::GOAL,
            moves,
            elapsed_s,
            discovered,
            expanded: discovered as u64 / 2,
        };
        let s = summarize(HeuristicKind::Zero, &[o(10, 100, 0.5), o(20, 301, 1.5)], 1);
        assert_eq!(s.trials, 2);
        assert_eq!(s.failures, 1);
        assert_eq!(s.avg_discovered, 200);
        assert_eq!(s.avg_moves, 15.0);
        assert_eq!(s.avg_elapsed_s, 1.0);
        assert_eq!(s.max_moves, 20);
        assert_eq!(summarize(HeuristicKind::Zero, &[], 0).trials, 0);
    }
}

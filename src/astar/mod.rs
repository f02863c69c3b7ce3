//! A* search for the 8-puzzle.
//!
//! The pieces:
//! - [`Heuristic`] evaluators: [`ZeroHeuristic`], [`MisplacedTiles`], [`Manhattan`].
//! - [`frontier::Frontier`]: open set bucketed by f-score.
//! - [`closed_set::ClosedSet`]: double-hashed table of best-known cost, parent and
//!   processed flag per board.
//! - [`AStar`]: the driver, plus [`Search`] for stepping a search by hand.
//!
//! Notes
//! - Processed boards are never reopened. With an admissible, consistent
//!   heuristic (all three built-ins) the first expansion of a board is via a
//!   shortest path; an inconsistent heuristic could yield a longer solution.
//! - Search state lives in the [`Search`] value, never in globals, so
//!   independent solves can run on separate threads.
//!
//! Quick start
//! ```
//! use eight_puzzle::astar::{AStar, HeuristicKind, SearchConfig};
//! use eight_puzzle::engine::Board;
//!
//! let cfg = SearchConfig::default();
//! let evaluator = HeuristicKind::Manhattan.evaluator(cfg.goal);
//! let mut solver = AStar::with_config(evaluator, cfg);
//! let solution = solver.solve(Board::from_raw(0x103452768)).unwrap();
//! assert_eq!(solution.moves, 31);
//! ```

use serde::Serialize;

use crate::engine::{Board, BoardError};

pub mod closed_set;
pub mod frontier;
mod heuristic;
mod path;
mod search;

pub use closed_set::{ClosedSet, ClosedSetError, Discovery};
pub use frontier::{Frontier, FrontierError, SearchNode};
pub use heuristic::{
    Evaluator, Heuristic, HeuristicKind, Manhattan, MisplacedTiles, UnknownHeuristic, ZeroHeuristic,
};
pub use path::{reconstruct, Path};
pub use search::{AStar, Search, Solution, Step};

/// Largest accepted `max_f`; the frontier allocates one bucket per f-score.
pub const MAX_F_LIMIT: u32 = 1 << 16;
/// Largest accepted `closed_capacity`.
pub const CLOSED_CAPACITY_LIMIT: usize = 1 << 31;

/// Search knobs. Defaults cover every solvable 8-puzzle.
///
/// - `goal`: board the search terminates on.
/// - `max_f`: largest f-score the frontier accepts.
/// - `closed_capacity`: closed-set slots; prime, above the 9! = 362,880 permutations.
/// - `probe_prime`: second prime for the double-hash step; below `closed_capacity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchConfig {
    pub goal: Board,
    pub max_f: u32,
    pub closed_capacity: usize,
    pub probe_prime: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { goal: Board::GOAL, max_f: 50, closed_capacity: 393_241, probe_prime: 24_593 }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        Board::try_from_raw(self.goal.raw()).map_err(ConfigError::InvalidGoal)?;
        if self.max_f == 0 {
            return Err(ConfigError::ZeroMaxF);
        }
        if self.max_f > MAX_F_LIMIT {
            return Err(ConfigError::MaxFTooLarge { max_f: self.max_f, limit: MAX_F_LIMIT });
        }
        if self.closed_capacity > CLOSED_CAPACITY_LIMIT {
            return Err(ConfigError::CapacityTooLarge {
                capacity: self.closed_capacity,
                limit: CLOSED_CAPACITY_LIMIT,
            });
        }
        if !is_prime(self.closed_capacity as u64) {
            return Err(ConfigError::CapacityNotPrime(self.closed_capacity));
        }
        if self.probe_prime >= self.closed_capacity as u64 {
            return Err(ConfigError::ProbeTooLarge {
                probe_prime: self.probe_prime,
                capacity: self.closed_capacity,
            });
        }
        if !is_prime(self.probe_prime) {
            return Err(ConfigError::ProbeNotPrime(self.probe_prime));
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("goal is not a valid board: {0}")]
    InvalidGoal(#[source] BoardError),
    #[error("max f-score must be positive")]
    ZeroMaxF,
    #[error("max f-score {max_f} exceeds the limit {limit}")]
    MaxFTooLarge { max_f: u32, limit: u32 },
    #[error("closed-set capacity {capacity} exceeds the limit {limit}")]
    CapacityTooLarge { capacity: usize, limit: usize },
    #[error("closed-set capacity {0} is not prime")]
    CapacityNotPrime(usize),
    #[error("probe prime {0} is not prime")]
    ProbeNotPrime(u64),
    #[error("probe prime {probe_prime} must be below closed-set capacity {capacity}")]
    ProbeTooLarge { probe_prime: u64, capacity: usize },
}

#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("invalid search configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid start board: {0}")]
    InvalidStart(#[from] BoardError),
    #[error("start {start:?} cannot reach goal {goal:?}: permutation parity differs")]
    Unsolvable { start: Board, goal: Board },
    #[error("frontier exhausted before reaching the goal from {start:?} ({discovered} states discovered)")]
    Exhausted { start: Board, discovered: usize },
    #[error("frontier: {0}")]
    Frontier(#[from] FrontierError),
    #[error("closed set: {0}")]
    Closed(#[from] ClosedSetError),
}

/// Counters for a single solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Closed-set entries created.
    pub discovered: usize,
    /// Boards taken off the frontier and expanded.
    pub expanded: u64,
    /// Open boards whose f-score was lowered.
    pub improved: u64,
    /// Improvements whose stale frontier copy was already gone.
    pub stale_misses: u64,
    /// Largest frontier size seen.
    pub peak_frontier: usize,
}

fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SearchConfig::default().validate(), Ok(()));
        let smaller = SearchConfig { closed_capacity: 196_613, ..SearchConfig::default() };
        assert_eq!(smaller.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_bad_tables() {
        let base = SearchConfig::default();
        let cfg = SearchConfig { closed_capacity: 393_240, ..base.clone() };
        assert_eq!(cfg.validate(), Err(ConfigError::CapacityNotPrime(393_240)));
        let cfg = SearchConfig { probe_prime: 24_591, ..base.clone() };
        assert_eq!(cfg.validate(), Err(ConfigError::ProbeNotPrime(24_591)));
        let cfg = SearchConfig { closed_capacity: 7, probe_prime: 11, ..base.clone() };
        assert!(matches!(cfg.validate(), Err(ConfigError::ProbeTooLarge { .. })));
        let cfg = SearchConfig { max_f: 0, ..base.clone() };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroMaxF));
        let cfg = SearchConfig { goal: Board::from_raw(0), ..base };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidGoal(_))));
    }

    #[test]
    fn validate_bounds_table_sizes() {
        let base = SearchConfig::default();
        let cfg = SearchConfig { max_f: 4_000_000_000, ..base.clone() };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::MaxFTooLarge { max_f: 4_000_000_000, limit: MAX_F_LIMIT })
        );
        let cfg = SearchConfig { max_f: MAX_F_LIMIT, ..base.clone() };
        assert_eq!(cfg.validate(), Ok(()));
        let cfg = SearchConfig { closed_capacity: usize::MAX, ..base };
        assert!(matches!(cfg.validate(), Err(ConfigError::CapacityTooLarge { .. })));

        let err = AStar::with_config(Manhattan::default(), SearchConfig { max_f: u32::MAX, ..Default::default() })
            .solve(Board::GOAL)
            .unwrap_err();
        assert!(matches!(err, SearchError::Config(ConfigError::MaxFTooLarge { .. })));
    }

    #[test]
    fn primes() {
        assert!(is_prime(2));
        assert!(is_prime(24_593));
        assert!(is_prime(196_613));
        assert!(is_prime(393_241));
        assert!(!is_prime(1));
        assert!(!is_prime(362_880));
        assert!(!is_prime(u64::MAX));
    }

    #[test]
    fn invalid_config_fails_the_search() {
        let cfg = SearchConfig { closed_capacity: 100, ..SearchConfig::default() };
        let err = AStar::with_config(Manhattan::default(), cfg).solve(Board::GOAL).unwrap_err();
        assert!(matches!(err, SearchError::Config(ConfigError::CapacityNotPrime(100))));
    }
}

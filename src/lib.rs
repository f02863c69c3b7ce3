//! eight-puzzle: optimal 3x3 sliding-puzzle solving with A*
//!
//! This crate provides:
//! - A compact `Board` type packed into 9 nibbles of a `u64` (`engine` module)
//! - A* search with swappable heuristics, a bucketed frontier and a
//!   double-hashed closed set (`astar` module)
//! - A parallel trial runner for comparing heuristics (`trials` module)
//!
//! Quick start:
//! ```
//! use eight_puzzle::astar::{AStar, Manhattan};
//! use eight_puzzle::engine::Board;
//!
//! // One of the hardest instances: 31 moves from the goal.
//! let start = Board::from_raw(0x123058746);
//! let mut solver = AStar::new(Manhattan::default());
//! let solution = solver.solve(start).unwrap();
//! assert_eq!(solution.moves, 31);
//! assert_eq!(solution.path.goal(), Board::GOAL);
//! ```
//!
//! Random solvable boards come from a seeded random walk away from the goal:
//! ```
//! use eight_puzzle::astar::{AStar, HeuristicKind};
//! use eight_puzzle::engine::Board;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let start = Board::GOAL.scramble(1_000, &mut rng);
//! let mut solver = AStar::new(HeuristicKind::Misplaced.evaluator(Board::GOAL));
//! let solution = solver.solve(start).unwrap();
//! assert_eq!(solution.path.len(), solution.moves as usize);
//! ```
//!
pub mod astar;
pub mod engine;
pub mod trials;

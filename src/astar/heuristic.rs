use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::engine::{Board, POSITIONS};

/// A cost estimate plugged into [`AStar`](super::AStar).
///
/// `estimate` is the remaining-moves guess `h`; `f_score` pre-adds the moves
/// already made so the frontier can bucket on it directly.
pub trait Heuristic {
    fn estimate(&self, board: Board) -> u32;

    #[inline]
    fn f_score(&self, board: Board, moves: u32) -> u32 { moves + self.estimate(board) }
}

impl<H: Heuristic + ?Sized> Heuristic for &H {
    #[inline]
    fn estimate(&self, board: Board) -> u32 { (**self).estimate(board) }
}

/// `h = 0`: A* degrades to uniform-cost search.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    #[inline]
    fn estimate(&self, _board: Board) -> u32 { 0 }
}

/// Number of non-blank tiles not on their goal cell.
#[derive(Debug, Clone, Copy)]
pub struct MisplacedTiles {
    goal: Board,
}

impl MisplacedTiles {
    pub fn new(goal: Board) -> Self { Self { goal } }
}

impl Default for MisplacedTiles {
    fn default() -> Self { Self::new(Board::GOAL) }
}

impl Heuristic for MisplacedTiles {
    #[inline]
    fn estimate(&self, board: Board) -> u32 {
        let mut raw = board.raw();
        let mut diff = raw ^ self.goal.raw();
        let mut misplaced = 0;
        for _ in 0..POSITIONS {
            if raw & 0xf != 0 && diff & 0xf != 0 {
                misplaced += 1;
            }
            raw >>= 4;
            diff >>= 4;
        }
        misplaced
    }
}

/// Sum over tiles of row plus column distance to the goal cell.
#[derive(Clone)]
pub struct Manhattan {
    // distance[tile][position]; the blank row stays zero
    distance: [[u8; POSITIONS]; POSITIONS],
}

impl Manhattan {
    pub fn new(goal: Board) -> Self {
        let mut distance = [[0u8; POSITIONS]; POSITIONS];
        for target in 0..POSITIONS {
            let tile = goal.tile_at(target) as usize;
            if tile == 0 {
                continue;
            }
            for (position, d) in distance[tile].iter_mut().enumerate() {
                *d = (row(position).abs_diff(row(target)) + col(position).abs_diff(col(target))) as u8;
            }
        }
        Self { distance }
    }
}

impl Default for Manhattan {
    fn default() -> Self { Self::new(Board::GOAL) }
}

impl fmt::Debug for Manhattan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("Manhattan") }
}

impl Heuristic for Manhattan {
    #[inline]
    fn estimate(&self, board: Board) -> u32 {
        let mut raw = board.raw();
        (0..POSITIONS).fold(0, |acc, position| {
            let tile = (raw & 0xf) as usize;
            raw >>= 4;
            acc + self.distance[tile][position] as u32
        })
    }
}

#[inline(always)]
fn row(position: usize) -> usize { position / 3 }

#[inline(always)]
fn col(position: usize) -> usize { position % 3 }

/// Selector for the built-in heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeuristicKind {
    Zero,
    Misplaced,
    #[default]
    Manhattan,
}

impl HeuristicKind {
    pub const ALL: [HeuristicKind; 3] =
        [HeuristicKind::Zero, HeuristicKind::Misplaced, HeuristicKind::Manhattan];

    pub fn name(self) -> &'static str {
        match self {
            HeuristicKind::Zero => "zero",
            HeuristicKind::Misplaced => "misplaced",
            HeuristicKind::Manhattan => "manhattan",
        }
    }

    /// Build the evaluator for `goal`.
    pub fn evaluator(self, goal: Board) -> Evaluator {
        match self {
            HeuristicKind::Zero => Evaluator::Zero(ZeroHeuristic),
            HeuristicKind::Misplaced => Evaluator::Misplaced(MisplacedTiles::new(goal)),
            HeuristicKind::Manhattan => Evaluator::Manhattan(Manhattan::new(goal)),
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown heuristic '{0}' (expected zero, misplaced or manhattan)")]
pub struct UnknownHeuristic(pub String);

impl FromStr for HeuristicKind {
    type Err = UnknownHeuristic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" | "none" | "dijkstra" => Ok(HeuristicKind::Zero),
            "misplaced" | "hamming" => Ok(HeuristicKind::Misplaced),
            "manhattan" => Ok(HeuristicKind::Manhattan),
            _ => Err(UnknownHeuristic(s.to_string())),
        }
    }
}

/// Runtime-selected heuristic with static dispatch.
#[derive(Debug, Clone)]
pub enum Evaluator {
    Zero(ZeroHeuristic),
    Misplaced(MisplacedTiles),
    Manhattan(Manhattan),
}

impl Evaluator {
    pub fn kind(&self) -> HeuristicKind {
        match self {
            Evaluator::Zero(_) => HeuristicKind::Zero,
            Evaluator::Misplaced(_) => HeuristicKind::Misplaced,
            Evaluator::Manhattan(_) => HeuristicKind::Manhattan,
        }
    }
}

impl Heuristic for Evaluator {
    #[inline]
    fn estimate(&self, board: Board) -> u32 {
        match self {
            Evaluator::Zero(h) => h.estimate(board),
            Evaluator::Misplaced(h) => h.estimate(board),
            Evaluator::Manhattan(h) => h.estimate(board),
        }
    }
}

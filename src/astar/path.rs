use std::fmt;

use crate::engine::{Board, Move};

use super::closed_set::{ClosedSet, ClosedSetError};

/// Boards from start to goal, inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    boards: Vec<Board>,
}

impl Path {
    pub fn boards(&self) -> &[Board] { &self.boards }

    pub fn start(&self) -> Board { self.boards[0] }

    pub fn goal(&self) -> Board { self.boards[self.boards.len() - 1] }

    /// Number of moves (one less than the number of boards).
    pub fn len(&self) -> usize { self.boards.len() - 1 }

    /// True when start and goal coincide.
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Direction the blank travels on each step.
    pub fn moves(&self) -> Vec<Move> {
        self.boards.windows(2).filter_map(|pair| pair[0].move_towards(pair[1])).collect()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "start:\n{}", self.start())?;
        for (i, (dir, board)) in self.moves().iter().zip(&self.boards[1..]).enumerate() {
            writeln!(f, "move {}: {}\n{}", i + 1, dir, board)?;
        }
        Ok(())
    }
}

/// Follow parent links from `goal` back to the board recorded without one.
pub fn reconstruct(closed: &ClosedSet, goal: Board) -> Result<Path, ClosedSetError> {
    let mut boards = vec![goal];
    let mut current = goal;
    while let Some(parent) = closed.parent_of(current)? {
        if boards.len() > closed.count_discovered() {
            return Err(ClosedSetError::ParentCycle { state: goal });
        }
        boards.push(parent);
        current = parent;
    }
    boards.reverse();
    Ok(Path { boards })
}

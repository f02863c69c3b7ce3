//! Open set: nodes bucketed by integer f-score.
//!
//! f-scores for the 8-puzzle are small integers, so a direct-indexed array of
//! buckets gives O(1) insert and amortized O(1) extract-min. Each bucket is a
//! `Vec` used as a stack (LIFO tie-break); removing a superseded node finds it
//! by board and removes it in place, keeping the count exact.

use std::collections::TryReserveError;

use crate::engine::{Board, Neighbors};

/// A board queued for expansion.
#[derive(Debug, Clone)]
pub struct SearchNode {
    board: Board,
    parent: Option<Board>,
    moves: u32,
    children: Neighbors,
}

impl SearchNode {
    /// Create a node, generating its successors once up front.
    pub fn new(board: Board, parent: Option<Board>, moves: u32) -> Self {
        Self { board, parent, moves, children: board.neighbors() }
    }

    #[inline]
    pub fn board(&self) -> Board { self.board }

    #[inline]
    pub fn parent(&self) -> Option<Board> { self.parent }

    /// Moves taken from the start (g-cost).
    #[inline]
    pub fn moves(&self) -> u32 { self.moves }

    #[inline]
    pub fn children(&self) -> &[Board] { &self.children }
}

#[derive(thiserror::Error, Debug)]
pub enum FrontierError {
    #[error("no elements to extract")]
    Empty,
    #[error("f-score {f_score} exceeds the frontier bound {max_f}")]
    ScoreOutOfRange { f_score: u32, max_f: u32 },
    #[error("failed to grow frontier bucket: {0}")]
    Alloc(#[from] TryReserveError),
}

#[derive(Debug)]
pub struct Frontier {
    buckets: Box<[Vec<SearchNode>]>,
    len: usize,
    // Lower bound on the smallest occupied bucket; None when empty.
    min_index: Option<usize>,
}

impl Frontier {
    /// Frontier accepting f-scores `0..=max_f`.
    pub fn new(max_f: u32) -> Self {
        let buckets = (0..=max_f).map(|_| Vec::new()).collect::<Vec<_>>().into_boxed_slice();
        Self { buckets, len: 0, min_index: None }
    }

    #[inline]
    pub fn len(&self) -> usize { self.len }

    #[inline]
    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Largest f-score this frontier accepts.
    #[inline]
    pub fn max_f(&self) -> u32 { (self.buckets.len() - 1) as u32 }

    /// Number of nodes queued at exactly `f_score`.
    pub fn bucket_len(&self, f_score: u32) -> usize {
        self.buckets.get(f_score as usize).map_or(0, Vec::len)
    }

    /// Smallest f-score currently queued.
    pub fn min_f_score(&self) -> Option<u32> {
        let start = self.min_index?;
        self.buckets[start..].iter().position(|b| !b.is_empty()).map(|offset| (start + offset) as u32)
    }

    /// Push `node` onto the bucket for `f_score`.
    pub fn insert(&mut self, node: SearchNode, f_score: u32) -> Result<(), FrontierError> {
        let index = f_score as usize;
        let max_f = self.max_f();
        let bucket = self
            .buckets
            .get_mut(index)
            .ok_or(FrontierError::ScoreOutOfRange { f_score, max_f })?;
        bucket.try_reserve(1)?;
        bucket.push(node);
        self.len += 1;
        match self.min_index {
            Some(min) if min <= index => {}
            _ => self.min_index = Some(index),
        }
        Ok(())
    }

    /// Pop the most recently inserted node among those with the lowest f-score.
    pub fn extract_min(&mut self) -> Result<SearchNode, FrontierError> {
        let start = self.min_index.ok_or(FrontierError::Empty)?;
        let offset = self.buckets[start..]
            .iter()
            .position(|b| !b.is_empty())
            .ok_or(FrontierError::Empty)?;
        let index = start + offset;
        let node = self.buckets[index].pop().ok_or(FrontierError::Empty)?;
        self.len -= 1;
        self.min_index = if self.len == 0 { None } else { Some(index) };
        Ok(node)
    }

    /// Remove the queued node for `board` from the `f_score` bucket.
    ///
    /// Returns `None` if no such node is queued, e.g. it was already extracted.
    pub fn remove(&mut self, board: Board, f_score: u32) -> Option<SearchNode> {
        let Some(bucket) = self.buckets.get_mut(f_score as usize) else {
            log::debug!("remove {board:?}: f-score {f_score} outside frontier");
            return None;
        };
        let Some(position) = bucket.iter().rposition(|node| node.board == board) else {
            log::debug!("remove {board:?}: not queued at f-score {f_score}");
            return None;
        };
        let node = bucket.remove(position);
        self.len -= 1;
        if self.len == 0 {
            self.min_index = None;
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(raw: u64) -> SearchNode { SearchNode::new(Board::from_raw(raw), None, 0) }

    fn boards() -> Vec<Board> {
        let mut out = vec![Board::GOAL];
        let mut b = Board::GOAL;
        for dir in [crate::engine::Move::Up, crate::engine::Move::Left, crate::engine::Move::Down] {
            b = b.apply_move(dir).unwrap();
            out.push(b);
        }
        out
    }

    #[test]
    fn extracts_in_f_score_order() {
        let bs = boards();
        let mut q = Frontier::new(50);
        q.insert(SearchNode::new(bs[0], None, 0), 12).unwrap();
        q.insert(SearchNode::new(bs[1], None, 0), 5).unwrap();
        q.insert(SearchNode::new(bs[2], None, 0), 9).unwrap();
        assert_eq!(q.len(), 3);
        assert_eq!(q.min_f_score(), Some(5));
        assert_eq!(q.extract_min().unwrap().board(), bs[1]);
        assert_eq!(q.extract_min().unwrap().board(), bs[2]);
        assert_eq!(q.extract_min().unwrap().board(), bs[0]);
        assert!(q.is_empty());
        assert!(matches!(q.extract_min(), Err(FrontierError::Empty)));
    }

    #[test]
    fn ties_pop_last_in_first() {
        let bs = boards();
        let mut q = Frontier::new(50);
        for &b in &bs {
            q.insert(SearchNode::new(b, None, 0), 7).unwrap();
        }
        let order: Vec<Board> = std::iter::from_fn(|| q.extract_min().ok().map(|n| n.board())).collect();
        let mut expected = bs.clone();
        expected.reverse();
        assert_eq!(order, expected);
    }

    #[test]
    fn lower_insert_after_extract_moves_min_back() {
        let bs = boards();
        let mut q = Frontier::new(50);
        q.insert(SearchNode::new(bs[0], None, 0), 10).unwrap();
        q.insert(SearchNode::new(bs[1], None, 0), 20).unwrap();
        assert_eq!(q.extract_min().unwrap().board(), bs[0]);
        q.insert(SearchNode::new(bs[2], None, 0), 15).unwrap();
        assert_eq!(q.min_f_score(), Some(15));
        assert_eq!(q.extract_min().unwrap().board(), bs[2]);
        assert_eq!(q.extract_min().unwrap().board(), bs[1]);
    }

    #[test]
    fn rejects_scores_past_bound() {
        let mut q = Frontier::new(10);
        assert_eq!(q.max_f(), 10);
        q.insert(node(0x087654321), 10).unwrap();
        assert!(matches!(
            q.insert(node(0x087654321), 11),
            Err(FrontierError::ScoreOutOfRange { f_score: 11, max_f: 10 })
        ));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn remove_from_middle_of_bucket() {
        let bs = boards();
        let mut q = Frontier::new(50);
        for &b in &bs {
            q.insert(SearchNode::new(b, None, 0), 4).unwrap();
        }
        let removed = q.remove(bs[1], 4).unwrap();
        assert_eq!(removed.board(), bs[1]);
        assert_eq!(q.len(), bs.len() - 1);
        assert_eq!(q.bucket_len(4), bs.len() - 1);
        let order: Vec<Board> = std::iter::from_fn(|| q.extract_min().ok().map(|n| n.board())).collect();
        assert_eq!(order, vec![bs[3], bs[2], bs[0]]);
    }

    #[test]
    fn remove_miss_leaves_frontier_untouched() {
        let bs = boards();
        let mut q = Frontier::new(50);
        q.insert(SearchNode::new(bs[0], None, 0), 3).unwrap();
        assert!(q.remove(bs[0], 4).is_none());
        assert!(q.remove(bs[1], 3).is_none());
        assert!(q.remove(bs[0], 99).is_none());
        assert_eq!(q.len(), 1);
        assert_eq!(q.extract_min().unwrap().board(), bs[0]);
    }

    #[test]
    fn removing_min_bucket_then_extracting_skips_ahead() {
        let bs = boards();
        let mut q = Frontier::new(50);
        q.insert(SearchNode::new(bs[0], None, 0), 2).unwrap();
        q.insert(SearchNode::new(bs[1], None, 0), 6).unwrap();
        assert!(q.remove(bs[0], 2).is_some());
        assert_eq!(q.len(), 1);
        assert_eq!(q.min_f_score(), Some(6));
        assert_eq!(q.extract_min().unwrap().board(), bs[1]);
        assert!(q.is_empty());
        assert_eq!(q.min_f_score(), None);
    }

    #[test]
    fn removing_last_node_resets() {
        let bs = boards();
        let mut q = Frontier::new(50);
        q.insert(SearchNode::new(bs[0], None, 0), 8).unwrap();
        assert!(q.remove(bs[0], 8).is_some());
        assert!(q.is_empty());
        assert!(matches!(q.extract_min(), Err(FrontierError::Empty)));
        q.insert(SearchNode::new(bs[1], None, 0), 30).unwrap();
        assert_eq!(q.extract_min().unwrap().board(), bs[1]);
    }

    #[test]
    fn node_caches_children() {
        let n = SearchNode::new(Board::GOAL, None, 0);
        assert_eq!(n.children(), Board::GOAL.neighbors().as_slice());
        assert_eq!(n.moves(), 0);
        assert_eq!(n.parent(), None);
    }
}

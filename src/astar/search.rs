use crate::engine::Board;

use super::closed_set::{ClosedSet, Discovery};
use super::frontier::{Frontier, FrontierError, SearchNode};
use super::heuristic::Heuristic;
use super::path::{reconstruct, Path};
use super::{SearchConfig, SearchError, SearchStats};

/// An optimal solve: move count, the boards along the way and search stats.
#[derive(Debug, Clone)]
pub struct Solution {
    pub start: Board,
    pub moves: u32,
    pub path: Path,
    pub stats: SearchStats,
}

/// A* solver with a heuristic fixed at construction.
///
/// Each call to [`solve`](Self::solve) builds a fresh frontier and closed set
/// and releases both before returning, so one solver can be reused for many
/// boards.
///
/// ```
/// use eight_puzzle::astar::{AStar, MisplacedTiles};
/// use eight_puzzle::engine::Board;
/// let start = Board::GOAL.swap(8, 5).swap(5, 4);
/// let mut solver = AStar::new(MisplacedTiles::default());
/// let solution = solver.solve(start).unwrap();
/// assert_eq!(solution.moves, 2);
/// assert_eq!(solution.path.goal(), Board::GOAL);
/// ```
#[derive(Debug)]
pub struct AStar<H> {
    heuristic: H,
    cfg: SearchConfig,
    stats: SearchStats,
}

impl<H: Heuristic> AStar<H> {
    pub fn new(heuristic: H) -> Self { Self::with_config(heuristic, SearchConfig::default()) }

    /// `heuristic` must estimate distances to `cfg.goal`.
    pub fn with_config(heuristic: H, cfg: SearchConfig) -> Self {
        Self { heuristic, cfg, stats: SearchStats::default() }
    }

    pub fn config(&self) -> &SearchConfig { &self.cfg }

    pub fn heuristic(&self) -> &H { &self.heuristic }

    /// Find a shortest move sequence from `start` to the configured goal.
    pub fn solve(&mut self, start: Board) -> Result<Solution, SearchError> {
        let solution = self.prepare(start)?.run()?;
        self.stats = solution.stats;
        Ok(solution)
    }

    /// Validate `start` and allocate the search tables without expanding
    /// anything. Run the result with [`Search::run`].
    pub fn prepare(&self, start: Board) -> Result<Search<'_, H>, SearchError> {
        Search::new(&self.heuristic, &self.cfg, start)
    }

    /// Statistics from the last call to [`solve`](Self::solve).
    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    #[inline]
    pub fn reset_stats(&mut self) { self.stats = SearchStats::default(); }
}

impl<H: Heuristic + Default> Default for AStar<H> {
    fn default() -> Self { Self::new(H::default()) }
}

/// Outcome of one [`Search::step`].
#[derive(Debug)]
pub enum Step {
    /// The board was expanded and its children queued.
    Expanded(Board),
    /// The goal was extracted from the frontier.
    Solved(SearchNode),
}

/// A single in-flight search that owns its frontier and closed set.
#[derive(Debug)]
pub struct Search<'a, H: ?Sized> {
    heuristic: &'a H,
    goal: Board,
    start: Board,
    frontier: Frontier,
    closed: ClosedSet,
    stats: SearchStats,
}

impl<'a, H: Heuristic + ?Sized> Search<'a, H> {
    /// Validate the inputs and seed both sets with `start`.
    pub fn new(heuristic: &'a H, cfg: &SearchConfig, start: Board) -> Result<Self, SearchError> {
        cfg.validate()?;
        let start = Board::try_from_raw(start.raw())?;
        if !start.is_solvable_from(cfg.goal) {
            return Err(SearchError::Unsolvable { start, goal: cfg.goal });
        }
        let mut frontier = Frontier::new(cfg.max_f);
        let mut closed = ClosedSet::new(cfg.closed_capacity, cfg.probe_prime)?;
        let f_score = heuristic.f_score(start, 0);
        closed.discover_or_improve(start, None, f_score)?;
        frontier.insert(SearchNode::new(start, None, 0), f_score)?;
        let stats = SearchStats { discovered: 1, peak_frontier: 1, ..SearchStats::default() };
        Ok(Self { heuristic, goal: cfg.goal, start, frontier, closed, stats })
    }

    /// Expand the best frontier node, or report that it is the goal.
    pub fn step(&mut self) -> Result<Step, SearchError> {
        let current = match self.frontier.extract_min() {
            Ok(node) => node,
            Err(FrontierError::Empty) => {
                return Err(SearchError::Exhausted {
                    start: self.start,
                    discovered: self.closed.count_discovered(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        if current.board() == self.goal {
            return Ok(Step::Solved(current));
        }

        let moves = current.moves() + 1;
        for &child in current.children() {
            let f_score = self.heuristic.f_score(child, moves);
            match self.closed.discover_or_improve(child, Some(current.board()), f_score)? {
                Discovery::NoChange => continue,
                Discovery::Improved { previous } => {
                    self.stats.improved += 1;
                    if self.frontier.remove(child, previous).is_none() {
                        self.stats.stale_misses += 1;
                    }
                }
                Discovery::NewlyDiscovered => {}
            }
            self.frontier.insert(SearchNode::new(child, Some(current.board()), moves), f_score)?;
        }

        self.closed.mark_processed(current.board())?;
        self.stats.expanded += 1;
        self.stats.discovered = self.closed.count_discovered();
        self.stats.peak_frontier = self.stats.peak_frontier.max(self.frontier.len());
        Ok(Step::Expanded(current.board()))
    }

    /// Step until the goal is extracted, then rebuild the path.
    pub fn run(mut self) -> Result<Solution, SearchError> {
        let node = loop {
            match self.step()? {
                Step::Expanded(_) => continue,
                Step::Solved(node) => break node,
            }
        };
        let path = reconstruct(&self.closed, node.board())?;
        let stats = self.stats;
        log::debug!(
            "solved {:?} in {} moves (discovered {}, expanded {}, improved {})",
            self.start,
            node.moves(),
            stats.discovered,
            stats.expanded,
            stats.improved
        );
        Ok(Solution { start: self.start, moves: node.moves(), path, stats })
    }

    pub fn frontier(&self) -> &Frontier { &self.frontier }

    pub fn closed(&self) -> &ClosedSet { &self.closed }

    #[inline]
    pub fn stats(&self) -> SearchStats { self.stats }
}

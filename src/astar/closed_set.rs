//! Closed set: fixed-capacity open-addressing table keyed by packed board.
//!
//! Slots are probed with double hashing, `(s mod M + i * (P - s mod P)) mod M`
//! for prime `M` (capacity) and prime `P < M`, so every probe sequence visits
//! all slots. Raw value 0 is never a valid board and marks an empty slot; it
//! also stands in for "no parent".

use std::collections::TryReserveError;

use crate::engine::Board;

const EMPTY: u64 = 0;

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    state: u64,
    parent: u64,
    f_score: u32,
    processed: bool,
}

/// A recorded board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub board: Board,
    pub parent: Option<Board>,
    pub f_score: u32,
    pub processed: bool,
}

/// Result of [`ClosedSet::discover_or_improve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discovery {
    /// First time this board was seen.
    NewlyDiscovered,
    /// A cheaper path replaced the stored one; `previous` is the old f-score.
    Improved { previous: u32 },
    /// Already processed, or not cheaper than what is stored.
    NoChange,
}

#[derive(thiserror::Error, Debug)]
pub enum ClosedSetError {
    #[error("state {state:?} not yet discovered")]
    NotDiscovered { state: Board },
    #[error("no free slot for {state:?} in closed set of capacity {capacity}")]
    Full { state: Board, capacity: usize },
    #[error("parent chain from {state:?} does not terminate")]
    ParentCycle { state: Board },
    #[error("probe prime {probe_prime} must be in 2..{capacity}")]
    InvalidProbe { probe_prime: u64, capacity: usize },
    #[error("failed to allocate closed set: {0}")]
    Alloc(#[from] TryReserveError),
}

enum Probe {
    Occupied(usize),
    Vacant(usize),
}

pub struct ClosedSet {
    slots: Box<[Slot]>,
    modulus: u64,
    probe_prime: u64,
    discovered: usize,
}

impl ClosedSet {
    /// Allocate an empty table. `probe_prime` outside `2..capacity` is rejected
    /// here; primality of both is checked by
    /// [`SearchConfig::validate`](super::SearchConfig::validate).
    pub fn new(capacity: usize, probe_prime: u64) -> Result<Self, ClosedSetError> {
        if probe_prime < 2 || probe_prime >= capacity as u64 {
            return Err(ClosedSetError::InvalidProbe { probe_prime, capacity });
        }
        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity)?;
        slots.resize(capacity, Slot::default());
        Ok(Self {
            slots: slots.into_boxed_slice(),
            modulus: capacity as u64,
            probe_prime,
            discovered: 0,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize { self.slots.len() }

    /// Number of boards recorded so far.
    #[inline]
    pub fn count_discovered(&self) -> usize { self.discovered }

    #[inline]
    fn slot_index(&self, raw: u64, attempt: u64) -> usize {
        let home = raw % self.modulus;
        let step = self.probe_prime - raw % self.probe_prime;
        ((home + attempt * step) % self.modulus) as usize
    }

    fn probe(&self, raw: u64) -> Option<Probe> {
        (0..self.modulus).find_map(|attempt| {
            let index = self.slot_index(raw, attempt);
            match self.slots[index].state {
                EMPTY => Some(Probe::Vacant(index)),
                s if s == raw => Some(Probe::Occupied(index)),
                _ => None,
            }
        })
    }

    fn find(&self, board: Board) -> Option<usize> {
        match self.probe(board.raw()) {
            Some(Probe::Occupied(index)) => Some(index),
            _ => None,
        }
    }

    /// Record `board` reached from `parent` with `f_score`, or lower its stored
    /// score if it is still open and this path is strictly cheaper.
    ///
    /// Processed boards are never reopened.
    pub fn discover_or_improve(
        &mut self,
        board: Board,
        parent: Option<Board>,
        f_score: u32,
    ) -> Result<Discovery, ClosedSetError> {
        debug_assert_ne!(board.raw(), EMPTY);
        let parent_raw = parent.map_or(EMPTY, Board::into_raw);
        match self.probe(board.raw()) {
            Some(Probe::Vacant(index)) => {
                self.slots[index] = Slot { state: board.raw(), parent: parent_raw, f_score, processed: false };
                self.discovered += 1;
                Ok(Discovery::NewlyDiscovered)
            }
            Some(Probe::Occupied(index)) => {
                let slot = &mut self.slots[index];
                if slot.processed || f_score >= slot.f_score {
                    return Ok(Discovery::NoChange);
                }
                let previous = slot.f_score;
                slot.f_score = f_score;
                slot.parent = parent_raw;
                log::trace!("improved {board:?}: f {previous} -> {f_score}");
                Ok(Discovery::Improved { previous })
            }
            None => Err(ClosedSetError::Full { state: board, capacity: self.capacity() }),
        }
    }

    /// Flag `board` as expanded. Returns `false` if it already was.
    pub fn mark_processed(&mut self, board: Board) -> Result<bool, ClosedSetError> {
        let index = self.find(board).ok_or(ClosedSetError::NotDiscovered { state: board })?;
        let slot = &mut self.slots[index];
        if slot.processed {
            log::debug!("state {board:?} already processed");
            return Ok(false);
        }
        slot.processed = true;
        Ok(true)
    }

    pub fn get(&self, board: Board) -> Option<Entry> {
        self.find(board).map(|index| {
            let slot = self.slots[index];
            Entry {
                board,
                parent: (slot.parent != EMPTY).then(|| Board::from_raw(slot.parent)),
                f_score: slot.f_score,
                processed: slot.processed,
            }
        })
    }

    /// Parent recorded for `board`; `None` for the start board.
    pub fn parent_of(&self, board: Board) -> Result<Option<Board>, ClosedSetError> {
        self.get(board)
            .map(|entry| entry.parent)
            .ok_or(ClosedSetError::NotDiscovered { state: board })
    }
}

impl std::fmt::Debug for ClosedSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosedSet")
            .field("capacity", &self.capacity())
            .field("probe_prime", &self.probe_prime)
            .field("discovered", &self.discovered)
            .finish()
    }
}

use arrayvec::ArrayVec;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A direction the blank slides in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Move::Up => "Up",
            Move::Down => "Down",
            Move::Left => "Left",
            Move::Right => "Right",
        };
        f.write_str(s)
    }
}

type BoardRaw = u64;
type Tile = u8;

/// Number of cells on the board.
pub const POSITIONS: usize = 9;
const SIDE: usize = 3;
const NIBBLE: BoardRaw = 0xf;
const BOARD_MASK: BoardRaw = 0xf_ffff_ffff; // 9 nibbles
const LOW_BITS: BoardRaw = 0x1_1111_1111; // lowest bit of each nibble

/// Cells adjacent to each position, ascending.
const ADJACENT: [&[usize]; POSITIONS] = [
    &[1, 3],
    &[0, 2, 4],
    &[1, 5],
    &[0, 4, 6],
    &[1, 3, 5, 7],
    &[2, 4, 8],
    &[3, 7],
    &[4, 6, 8],
    &[5, 7],
];

/// Boards reachable by one legal move (2 to 4 of them).
pub type Neighbors = ArrayVec<Board, 4>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("tile {tile} at position {position} is out of range 0..=8")]
    InvalidTile { position: usize, tile: u8 },
    #[error("tile {0} appears more than once")]
    DuplicateTile(u8),
    #[error("expected 9 tiles, got {0}")]
    WrongLength(usize),
    #[error("packed value {0:#x} has bits above the ninth cell")]
    StrayBits(u64),
    #[error("cannot parse board: {0}")]
    Parse(String),
}

/// Packed 3x3 board as 9 4-bit nibbles in a `u64`.
///
/// Position `p` (row-major, 0..9) occupies bits `4p..4p+4`, so position 0 is
/// the least-significant nibble. Tile 0 is the blank.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Board(BoardRaw);

impl Board {
    /// Tiles 1..=8 in row-major order with the blank last.
    pub const GOAL: Board = Board(0x0_8765_4321);

    /// Construct a `Board` from its packed representation without validation.
    #[inline]
    pub const fn from_raw(raw: BoardRaw) -> Self { Board(raw) }

    /// Construct a `Board` from its packed representation, checking that it
    /// holds a permutation of 0..=8.
    pub fn try_from_raw(raw: BoardRaw) -> Result<Self, BoardError> {
        if raw & !BOARD_MASK != 0 {
            return Err(BoardError::StrayBits(raw));
        }
        Self::from_tiles(Board(raw).to_tiles())
    }

    /// Pack a row-major tile array.
    ///
    /// ```
    /// use eight_puzzle::engine::Board;
    /// let b = Board::from_tiles([1, 2, 3, 4, 5, 6, 7, 8, 0]).unwrap();
    /// assert_eq!(b, Board::GOAL);
    /// ```
    pub fn from_tiles(tiles: [Tile; POSITIONS]) -> Result<Self, BoardError> {
        let mut seen = 0u16;
        let mut raw = 0;
        for (position, &tile) in tiles.iter().enumerate() {
            if tile as usize >= POSITIONS {
                return Err(BoardError::InvalidTile { position, tile });
            }
            if seen & (1 << tile) != 0 {
                return Err(BoardError::DuplicateTile(tile));
            }
            seen |= 1 << tile;
            raw |= (tile as BoardRaw) << shift(position);
        }
        Ok(Board(raw))
    }

    /// Consume this `Board`, returning the packed `u64`.
    #[inline]
    pub fn into_raw(self) -> BoardRaw { self.0 }

    /// Borrow the packed `u64` for this `Board`.
    #[inline]
    pub fn raw(&self) -> BoardRaw { self.0 }

    /// Unpack into a row-major tile array.
    pub fn to_tiles(self) -> [Tile; POSITIONS] {
        let mut tiles = [0; POSITIONS];
        for (position, slot) in tiles.iter_mut().enumerate() {
            *slot = self.tile_at(position);
        }
        tiles
    }

    /// Tile at `position` (0 for the blank).
    #[inline]
    pub fn tile_at(self, position: usize) -> Tile {
        debug_assert!(position < POSITIONS);
        ((self.0 >> shift(position)) & NIBBLE) as Tile
    }

    /// Position holding `tile`, if any.
    pub fn position_of(self, tile: Tile) -> Option<usize> {
        (0..POSITIONS).find(|&position| self.tile_at(position) == tile)
    }

    /// Position of the blank.
    ///
    /// Panics if the packed value has no empty nibble, which only an
    /// unchecked `from_raw` can produce.
    #[inline]
    pub fn blank_index(self) -> usize {
        // Fold each nibble onto its low bit; a zero low bit marks an empty nibble.
        let mut folded = self.0;
        folded |= folded >> 1;
        folded |= folded >> 2;
        let empty = !folded & LOW_BITS;
        if empty == 0 {
            panic!("no blank on board {:#011x}", self.0);
        }
        empty.trailing_zeros() as usize / 4
    }

    /// Exchange the contents of two positions.
    #[inline]
    pub fn swap(self, a: usize, b: usize) -> Self {
        let (sa, sb) = (shift(a), shift(b));
        let ta = (self.0 >> sa) & NIBBLE;
        let tb = (self.0 >> sb) & NIBBLE;
        let cleared = self.0 & !((NIBBLE << sa) | (NIBBLE << sb));
        Board(cleared | (ta << sb) | (tb << sa))
    }

    /// All boards one legal move away, ordered by the position the blank moves to.
    ///
    /// ```
    /// use eight_puzzle::engine::Board;
    /// // Blank in the bottom-right corner: two moves.
    /// assert_eq!(Board::GOAL.neighbors().len(), 2);
    /// ```
    #[inline]
    pub fn neighbors(self) -> Neighbors {
        let blank = self.blank_index();
        ADJACENT[blank].iter().map(|&target| self.swap(blank, target)).collect()
    }

    /// Slide the blank in `dir`, or `None` if it would leave the board.
    pub fn apply_move(self, dir: Move) -> Option<Self> {
        let blank = self.blank_index();
        let (row, col) = (blank / SIDE, blank % SIDE);
        let target = match dir {
            Move::Up if row > 0 => blank - SIDE,
            Move::Down if row + 1 < SIDE => blank + SIDE,
            Move::Left if col > 0 => blank - 1,
            Move::Right if col + 1 < SIDE => blank + 1,
            _ => return None,
        };
        Some(self.swap(blank, target))
    }

    /// The move that turns `self` into `next`, if they are adjacent.
    pub fn move_towards(self, next: Board) -> Option<Move> {
        Move::ALL.into_iter().find(|&dir| self.apply_move(dir) == Some(next))
    }

    /// Apply one uniformly chosen legal move, using the provided RNG.
    ///
    /// ```
    /// use eight_puzzle::engine::Board;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(3);
    /// let b = Board::GOAL.with_random_move(&mut rng);
    /// assert!(Board::GOAL.neighbors().contains(&b));
    /// ```
    #[inline]
    pub fn with_random_move<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        let next = self.neighbors();
        next[rng.gen_range(0..next.len())]
    }

    /// Random walk of `steps` legal moves. The result is always reachable
    /// from `self`.
    pub fn scramble<R: Rng + ?Sized>(self, steps: usize, rng: &mut R) -> Self {
        (0..steps).fold(self, |board, _| board.with_random_move(rng))
    }

    /// Count of out-of-order pairs among the non-blank tiles.
    pub fn inversions(self) -> u32 {
        let tiles = self.to_tiles();
        let mut count = 0;
        for (i, &a) in tiles.iter().enumerate().filter(|&(_, &t)| t != 0) {
            count += tiles[i + 1..].iter().filter(|&&b| b != 0 && b < a).count() as u32;
        }
        count
    }

    /// True if `goal` is reachable from `self` by legal moves.
    ///
    /// On an odd-width board a move never changes inversion parity, so the two
    /// boards are connected exactly when their parities agree.
    pub fn is_solvable_from(self, goal: Board) -> bool {
        self.inversions() % 2 == goal.inversions() % 2
    }
}

impl Default for Board {
    fn default() -> Self { Board::GOAL }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:#011x})", self.0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_tiles().chunks(SIDE) {
            write!(f, "|")?;
            for &tile in row {
                match tile {
                    0 => write!(f, "   |")?,
                    t => write!(f, " {} |", t)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// Accepts nine row-major digits (separators `,`, `_`, `/`, `|` and
    /// whitespace are ignored) or a `0x`-prefixed packed value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            let raw = BoardRaw::from_str_radix(&hex.replace('_', ""), 16)
                .map_err(|e| BoardError::Parse(format!("{s}: {e}")))?;
            return Board::try_from_raw(raw);
        }
        let mut tiles = Vec::with_capacity(POSITIONS);
        for c in s.chars() {
            match c {
                ',' | '_' | '/' | '|' => {}
                c if c.is_whitespace() => {}
                c => {
                    let digit = c
                        .to_digit(10)
                        .ok_or_else(|| BoardError::Parse(format!("unexpected character '{c}'")))?;
                    tiles.push(digit as Tile);
                }
            }
        }
        let tiles: [Tile; POSITIONS] =
            tiles.try_into().map_err(|v: Vec<Tile>| BoardError::WrongLength(v.len()))?;
        Board::from_tiles(tiles)
    }
}

impl TryFrom<BoardRaw> for Board {
    type Error = BoardError;
    fn try_from(raw: BoardRaw) -> Result<Self, Self::Error> { Board::try_from_raw(raw) }
}

impl From<Board> for BoardRaw { fn from(b: Board) -> Self { b.into_raw() } }

/// Boards one legal move from `board`.
pub fn decode_neighbors(board: Board) -> Neighbors { board.neighbors() }

/// Apply a uniformly chosen legal move using thread-local RNG.
///
/// For reproducible behavior, prefer `Board::with_random_move(&mut impl Rng)`.
pub fn apply_random_move(board: Board) -> Board {
    let mut rng = rand::thread_rng();
    board.with_random_move(&mut rng)
}

#[inline(always)]
const fn shift(position: usize) -> u32 { (position * 4) as u32 }

//! Files, ranks, colours and mailbox square indices.

use std::fmt;

/// Board files, `A` through `H`, plus a "no file" marker.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    #[default]
    None,
}

/// Board ranks, `R1` through `R8`, plus a "no rank" marker.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Rank {
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    #[default]
    None,
}

/// Side colours. `Both` indexes per-position tables that aggregate sides.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Colour {
    #[default]
    White,
    Black,
    Both,
}

/// Index into the 120-entry mailbox board.
///
/// Playable squares are grouped by file: `A1 = 21 .. A8 = 28`,
/// `B1 = 31 .. B8 = 38`, up to `H8 = 98`. [`NO_SQ`] (99) marks "no square".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(pub u8);

/// The "no square" marker, e.g. when no en passant capture is possible.
pub const NO_SQ: Square = Square(99);

impl Square {
    /// Mailbox index of `file`/`rank`, or [`NO_SQ`] if either is `None`.
    pub const fn new(file: File, rank: Rank) -> Self {
        match (file, rank) {
            (File::None, _) | (_, Rank::None) => NO_SQ,
            (file, rank) => Square(21 + 10 * file as u8 + rank as u8),
        }
    }

    /// The index as a `usize`, for board lookups.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for Square {
    fn default() -> Self {
        NO_SQ
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

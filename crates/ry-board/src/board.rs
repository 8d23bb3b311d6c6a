//! The board record.

use crate::square::{Colour, Square, NO_SQ};

/// Number of entries in the mailbox board, borders included.
pub const BRD_SQ_NUM: usize = 120;

/// Piece occupying a square. `W*` are white pieces, `B*` black.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Piece {
    #[default]
    Empty,
    WP,
    WN,
    WB,
    WR,
    WQ,
    WK,
    BP,
    BN,
    BB,
    BR,
    BQ,
    BK,
}

impl Piece {
    /// Number of piece kinds, `Empty` included; the length of `Board::piece_num`.
    pub const COUNT: usize = 13;
}

/// One position, laid out as a fixed-size value.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    /// Occupant of every mailbox entry.
    pub pieces: [Piece; BRD_SQ_NUM],
    /// Pawn bitboards for white, black and both sides.
    pub pawns: [u64; 3],
    /// King squares for white and black.
    pub king_sq: [Square; 2],
    /// Side to move.
    pub side: Colour,
    /// En passant target, or [`NO_SQ`].
    pub en_pas: Square,
    /// Half-moves since the last capture or pawn move.
    pub fifty_move: u32,
    /// Half-moves in the current search.
    pub ply: u32,
    /// Half-moves in the whole game.
    pub his_ply: u32,
    /// Position hash key.
    pub pos_key: u64,
    /// Count of each piece kind on the board.
    pub piece_num: [u32; Piece::COUNT],
    /// Non-pawn pieces per side (white, black, both).
    pub big_piece: [u32; 3],
    /// Rooks and queens per side.
    pub major_piece: [u32; 3],
    /// Bishops and knights per side.
    pub minor_piece: [u32; 3],
}

impl Default for Board {
    /// An empty board, white to move, no kings placed.
    fn default() -> Self {
        Self {
            pieces: [Piece::Empty; BRD_SQ_NUM],
            pawns: [0; 3],
            king_sq: [NO_SQ; 2],
            side: Colour::White,
            en_pas: NO_SQ,
            fifty_move: 0,
            ply: 0,
            his_ply: 0,
            pos_key: 0,
            piece_num: [0; Piece::COUNT],
            big_piece: [0; 3],
            major_piece: [0; 3],
            minor_piece: [0; 3],
        }
    }
}

//! Shared workloads for ry benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]

use ry_board::{Board, Colour};
use ry_buf::{Buf, RawBuf};

/// Append `n` little `u32`s to a fresh untyped buffer.
pub fn fill_raw(n: u32) -> RawBuf {
    let mut buf = RawBuf::new(4);
    for i in 0..n {
        buf.push(&i.to_ne_bytes());
    }
    buf
}

/// Append `n` `u32`s to a fresh typed buffer.
pub fn fill_typed(n: u32) -> Buf<u32> {
    let mut buf = Buf::new();
    for i in 0..n {
        buf.push(i);
    }
    buf
}

/// A game history of `plies` boards.
pub fn board_history(plies: u32) -> Buf<Board> {
    let mut history = Buf::new();
    for ply in 0..plies {
        let mut board = Board::default();
        board.his_ply = ply;
        board.side = if ply % 2 == 0 { Colour::White } else { Colour::Black };
        history.push(board);
    }
    history
}

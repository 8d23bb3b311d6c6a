//! Fixed-layout chess board record.
//!
//! Plain data: a 120-square mailbox board plus the counters and keys a
//! search keeps per position. Nothing here validates or generates moves;
//! the types exist so positions can be stored by value, e.g. in a
//! `ry_buf::Buf<Board>`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod board;
pub mod square;

pub use board::{Board, Piece, BRD_SQ_NUM};
pub use square::{Colour, File, Rank, Square, NO_SQ};

//! ry: header-prefixed growable buffers over a fail-fast heap.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all ry sub-crates. For most users, adding `ry` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use ry::prelude::*;
//!
//! // Untyped: elements are 4-byte strings.
//! let mut raw = RawBuf::new(4);
//! for i in 0..17u32 {
//!     raw.push(&i.to_ne_bytes());
//! }
//! assert_eq!(raw.capacity(), 32);
//! assert_eq!(raw.get(16), Some(&16u32.to_ne_bytes()[..]));
//!
//! // Typed: the element size comes from the type.
//! let mut history: Buf<Board> = Buf::new();
//! history.push(Board::default());
//! assert_eq!(history.element_size(), std::mem::size_of::<Board>());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `ry-core` | Source locations, fatal reporting, allocation errors |
//! | [`heap`] | `ry-alloc` | `Heap` trait, `SystemHeap`, fail-fast wrappers |
//! | [`buf`] | `ry-buf` | `RawBuf`, `Buf<T>`, growth policy |
//! | [`board`] | `ry-board` | Fixed-layout board record |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Source locations, the fatal reporter and allocation errors (`ry-core`).
pub use ry_core as types;

/// The heap boundary and its fail-fast wrappers (`ry-alloc`).
///
/// Implement [`heap::Heap`] to put buffers on a custom heap.
pub use ry_alloc as heap;

/// Header-prefixed buffers (`ry-buf`).
///
/// [`buf::RawBuf`] for runtime element sizes, [`buf::Buf`] for typed elements.
pub use ry_buf as buf;

/// The board record (`ry-board`).
pub use ry_board as board;

/// Common imports for typical ry usage.
///
/// ```rust
/// use ry::prelude::*;
/// ```
pub mod prelude {
    // Buffers
    pub use ry_buf::{Buf, BufConfig, RawBuf};

    // Heap
    pub use ry_alloc::{Heap, SystemHeap};

    // Board
    pub use ry_board::{Board, Colour, File, Piece, Rank, Square};
}

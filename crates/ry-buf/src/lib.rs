//! Header-prefixed growable buffers.
//!
//! A buffer is one heap block: a small header holding capacity, length and
//! element size, followed by the element payload. The handle is the payload
//! address; the header is reached by a fixed backward offset
//! ([`HEADER_SIZE`]) instead of a stored pointer.
//!
//! - [`RawBuf`] is the type-erased form: elements are byte strings of a
//!   runtime element size.
//! - [`Buf<T>`] fixes the element type at compile time on top of `RawBuf`.
//!
//! Growth follows [`grown_capacity`]: double the capacity, never below the
//! requested minimum or [`MIN_GROWTH_CAPACITY`]. Allocation failure is fatal
//! (see `ry-alloc`); there is no error path for callers to handle.
//!
//! ```
//! use ry_buf::RawBuf;
//!
//! let mut buf = RawBuf::new(4);
//! assert_eq!((buf.capacity(), buf.len()), (0, 0));
//! for i in 0..17u32 {
//!     buf.push(&i.to_ne_bytes());
//! }
//! assert_eq!((buf.capacity(), buf.len()), (32, 17));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod config;
mod header;
pub mod raw;
pub mod typed;

pub use config::{grown_capacity, BufConfig, GROWTH_FACTOR, MIN_GROWTH_CAPACITY};
pub use header::{block_bytes, HEADER_SIZE};
pub use raw::RawBuf;
pub use typed::Buf;

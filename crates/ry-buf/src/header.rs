//! The bookkeeping header stored in front of every buffer's payload.
//!
//! ```text
//! block ─► ┌──────────────────────────────┐
//!          │ Header { capacity, len,      │
//!          │          element_size }      │
//!          │ (padding to BLOCK_ALIGN)     │
//! handle ─►├──────────────────────────────┤
//!          │ element 0                    │
//!          │ element 1                    │
//!          │ …  capacity * element_size   │
//!          └──────────────────────────────┘
//! ```
//!
//! The header is found from the handle by subtracting [`HEADER_SIZE`]; no
//! back-pointer is stored.

use ry_alloc::BLOCK_ALIGN;
use ry_core::AllocError;

/// Buffer metadata, located `HEADER_SIZE` bytes before the payload.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Header {
    /// Number of elements the block can hold.
    pub(crate) capacity: usize,
    /// Number of elements in use. Always `<= capacity`.
    pub(crate) len: usize,
    /// Size of one element in bytes. Fixed at creation.
    pub(crate) element_size: usize,
}

impl Header {
    pub(crate) const fn empty(element_size: usize) -> Self {
        Self {
            capacity: 0,
            len: 0,
            element_size,
        }
    }
}

/// Distance in bytes from the start of a block to its payload.
///
/// The header size rounded up to [`BLOCK_ALIGN`], so the payload keeps the
/// block's alignment.
pub const HEADER_SIZE: usize = round_up(std::mem::size_of::<Header>(), BLOCK_ALIGN);

const fn round_up(n: usize, align: usize) -> usize {
    (n + align - 1) & !(align - 1)
}

/// Bytes needed for a block holding `capacity` elements of `element_size`.
///
/// Fails with [`AllocError::SizeOverflow`] past `isize::MAX`, the largest
/// object size Rust pointers can address.
pub fn block_bytes(capacity: usize, element_size: usize) -> Result<usize, AllocError> {
    capacity
        .checked_mul(element_size)
        .and_then(|payload| payload.checked_add(HEADER_SIZE))
        .filter(|&total| total <= isize::MAX as usize)
        .ok_or(AllocError::SizeOverflow {
            count: capacity,
            size: element_size,
        })
}

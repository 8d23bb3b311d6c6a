//! The heap boundary: allocate, zero-allocate, reallocate, free.

#![allow(unsafe_code)]

use std::ptr::NonNull;

use ry_core::{AllocError, AllocRequest};

/// Alignment of every block returned by a [`Heap`].
///
/// Matches what C `malloc` guarantees on the supported platforms, which is
/// enough for any header of `usize` fields and for payloads of primitive types.
pub const BLOCK_ALIGN: usize = 2 * std::mem::size_of::<usize>();

/// A source of raw, untyped memory blocks.
///
/// # Safety
///
/// Implementations must return blocks that are valid for reads and writes of
/// the requested size and aligned to [`BLOCK_ALIGN`]. `zero_allocate` must
/// return zeroed bytes. `reallocate` must preserve the contents up to the
/// smaller of the old and new sizes and, on success, take ownership of the
/// old block. A block must stay valid until passed to `free` or `reallocate`.
pub unsafe trait Heap {
    /// Allocate `bytes` bytes of uninitialised memory.
    fn allocate(&self, bytes: usize) -> Result<NonNull<u8>, AllocError>;

    /// Allocate `count * size` zeroed bytes.
    fn zero_allocate(&self, count: usize, size: usize) -> Result<NonNull<u8>, AllocError>;

    /// Resize `block` to `bytes` bytes, possibly moving it.
    ///
    /// On error the original block is untouched and still owned by the caller.
    ///
    /// # Safety
    ///
    /// `block` must have been returned by this heap and not yet freed or
    /// reallocated. After success the old address must not be used.
    unsafe fn reallocate(&self, block: NonNull<u8>, bytes: usize)
        -> Result<NonNull<u8>, AllocError>;

    /// Return `block` to the heap.
    ///
    /// # Safety
    ///
    /// `block` must have been returned by this heap and not yet freed or
    /// reallocated.
    unsafe fn free(&self, block: NonNull<u8>);
}

// SAFETY: forwards every call to `H`, which upholds the contract.
unsafe impl<H: Heap + ?Sized> Heap for &H {
    fn allocate(&self, bytes: usize) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(bytes)
    }

    fn zero_allocate(&self, count: usize, size: usize) -> Result<NonNull<u8>, AllocError> {
        (**self).zero_allocate(count, size)
    }

    unsafe fn reallocate(
        &self,
        block: NonNull<u8>,
        bytes: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        // SAFETY: same contract, forwarded.
        unsafe { (**self).reallocate(block, bytes) }
    }

    unsafe fn free(&self, block: NonNull<u8>) {
        // SAFETY: same contract, forwarded.
        unsafe { (**self).free(block) }
    }
}

/// The process heap, via the C allocator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemHeap;

/// `errno` after a failed libc allocation call.
fn last_errno() -> i32 {
    std::io::Error::last_os_error()
        .raw_os_error()
        .filter(|&code| code != 0)
        .unwrap_or(libc::ENOMEM)
}

fn out_of_memory(request: AllocRequest) -> AllocError {
    AllocError::OutOfMemory {
        request,
        errno: last_errno(),
    }
}

// SAFETY: malloc/calloc/realloc return blocks aligned for any fundamental
// type (>= BLOCK_ALIGN), calloc zeroes, realloc preserves contents and frees
// the old block only on success.
unsafe impl Heap for SystemHeap {
    fn allocate(&self, bytes: usize) -> Result<NonNull<u8>, AllocError> {
        // SAFETY: malloc accepts any size; zero is bumped to 1 so a null
        // result always means failure.
        let ptr = unsafe { libc::malloc(bytes.max(1)) };
        NonNull::new(ptr.cast::<u8>())
            .ok_or_else(|| out_of_memory(AllocRequest::Allocate { bytes }))
    }

    fn zero_allocate(&self, count: usize, size: usize) -> Result<NonNull<u8>, AllocError> {
        if count.checked_mul(size).is_none() {
            return Err(AllocError::SizeOverflow { count, size });
        }
        // SAFETY: the product fits in usize; an empty request asks for 1 byte.
        let ptr = if count == 0 || size == 0 {
            unsafe { libc::calloc(1, 1) }
        } else {
            unsafe { libc::calloc(count, size) }
        };
        NonNull::new(ptr.cast::<u8>())
            .ok_or_else(|| out_of_memory(AllocRequest::ZeroAllocate { count, size }))
    }

    unsafe fn reallocate(
        &self,
        block: NonNull<u8>,
        bytes: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        // SAFETY: caller guarantees `block` came from malloc/calloc/realloc
        // and is still live.
        let ptr = unsafe { libc::realloc(block.as_ptr().cast(), bytes.max(1)) };
        NonNull::new(ptr.cast::<u8>())
            .ok_or_else(|| out_of_memory(AllocRequest::Reallocate { bytes }))
    }

    unsafe fn free(&self, block: NonNull<u8>) {
        // SAFETY: caller guarantees `block` is live and owned by this heap.
        unsafe { libc::free(block.as_ptr().cast()) }
    }
}

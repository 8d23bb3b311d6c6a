//! Type-erased, header-prefixed growable buffer.
//!
//! A [`RawBuf`] is a single pointer to the payload of one heap block whose
//! first [`HEADER_SIZE`] bytes hold the capacity, length and element size.
//! Growth reallocates the whole block, which may move it; because every
//! growing operation takes `&mut self`, the buffer updates its own pointer
//! and no stale copy of the old address can survive in safe code.

#![allow(unsafe_code)]

use std::fmt;
use std::mem::ManuallyDrop;
use std::ptr::{self, NonNull};
use std::slice;

use ry_alloc::{Heap, SystemHeap};

use crate::config::{grown_capacity, BufConfig};
use crate::header::{block_bytes, Header, HEADER_SIZE};

/// A growable array of fixed-size, untyped elements.
///
/// Only the element size is known; callers interpret the bytes. Allocation
/// failure never surfaces as an error: it terminates the process through
/// `ry-alloc`.
pub struct RawBuf<H: Heap = SystemHeap> {
    /// Payload address. The header sits `HEADER_SIZE` bytes before it.
    data: NonNull<u8>,
    heap: H,
}

impl RawBuf {
    /// Create an empty buffer of `element_size`-byte elements on the system heap.
    ///
    /// The buffer owns a header-only block: capacity and length are 0, but
    /// [`as_ptr`](Self::as_ptr) is a valid, non-null address.
    #[track_caller]
    pub fn new(element_size: usize) -> Self {
        Self::new_in(element_size, SystemHeap)
    }

    /// Create a buffer from `config` on the system heap.
    #[track_caller]
    pub fn with_config(config: &BufConfig) -> Self {
        Self::with_config_in(config, SystemHeap)
    }

    /// Re-own a handle produced by [`into_raw`](Self::into_raw).
    ///
    /// # Safety
    ///
    /// `data` must come from `into_raw` on a system-heap buffer and must not
    /// have been re-owned already.
    pub unsafe fn from_raw(data: NonNull<u8>) -> Self {
        // SAFETY: forwarded from the caller.
        unsafe { Self::from_raw_parts_in(data, SystemHeap) }
    }

    /// Give up ownership and return the handle (the payload address).
    ///
    /// The block stays allocated until re-owned with
    /// [`from_raw`](Self::from_raw) and dropped.
    pub fn into_raw(self) -> NonNull<u8> {
        self.into_raw_parts().0
    }
}

impl<H: Heap> RawBuf<H> {
    /// Create an empty buffer of `element_size`-byte elements on `heap`.
    ///
    /// Performs exactly one allocation of [`HEADER_SIZE`] bytes.
    #[track_caller]
    pub fn new_in(element_size: usize, heap: H) -> Self {
        let block = ry_alloc::allocate(&heap, HEADER_SIZE);
        // SAFETY: the block is HEADER_SIZE bytes, aligned to BLOCK_ALIGN.
        unsafe {
            block.as_ptr().cast::<Header>().write(Header::empty(element_size));
            Self::from_block(block, heap)
        }
    }

    /// Create a buffer from `config` on `heap`.
    #[track_caller]
    pub fn with_config_in(config: &BufConfig, heap: H) -> Self {
        let mut buf = Self::new_in(config.element_size, heap);
        if config.initial_capacity > 0 {
            buf.ensure_capacity(config.initial_capacity);
        }
        buf
    }

    /// Create an empty buffer with room for at least `capacity` elements.
    #[track_caller]
    pub fn with_capacity_in(element_size: usize, capacity: usize, heap: H) -> Self {
        Self::with_config_in(
            &BufConfig::new(element_size).with_initial_capacity(capacity),
            heap,
        )
    }

    /// Create a buffer of `len` zero-filled elements with exactly `len` capacity.
    ///
    /// Uses a single zero-initialised allocation.
    #[track_caller]
    pub fn zeroed_in(element_size: usize, len: usize, heap: H) -> Self {
        let bytes = match block_bytes(len, element_size) {
            Ok(bytes) => bytes,
            Err(err) => ry_alloc::fail(err),
        };
        let block = ry_alloc::zero_allocate(&heap, 1, bytes);
        // SAFETY: the block holds a header plus `len` elements.
        unsafe {
            block.as_ptr().cast::<Header>().write(Header {
                capacity: len,
                len,
                element_size,
            });
            Self::from_block(block, heap)
        }
    }

    /// Re-own a handle produced by [`into_raw_parts`](Self::into_raw_parts).
    ///
    /// # Safety
    ///
    /// `data` must be the payload address of a live buffer block allocated
    /// by `heap` (or a heap that frees compatibly), and nothing else may own
    /// it.
    pub unsafe fn from_raw_parts_in(data: NonNull<u8>, heap: H) -> Self {
        Self { data, heap }
    }

    /// Give up ownership, returning the handle and the heap.
    pub fn into_raw_parts(self) -> (NonNull<u8>, H) {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so the heap is moved out exactly once.
        let heap = unsafe { ptr::read(&this.heap) };
        (this.data, heap)
    }

    /// # Safety
    ///
    /// `block` must start with an initialised [`Header`] whose capacity and
    /// element size describe the block's size.
    unsafe fn from_block(block: NonNull<u8>, heap: H) -> Self {
        // SAFETY: the block is at least HEADER_SIZE bytes long.
        let data = unsafe { NonNull::new_unchecked(block.as_ptr().add(HEADER_SIZE)) };
        Self { data, heap }
    }

    fn block(&self) -> NonNull<u8> {
        // SAFETY: `data` is always HEADER_SIZE bytes into a live block.
        unsafe { NonNull::new_unchecked(self.data.as_ptr().sub(HEADER_SIZE)) }
    }

    fn header(&self) -> &Header {
        // SAFETY: the block starts with an initialised, aligned header.
        unsafe { &*self.block().as_ptr().cast::<Header>() }
    }

    fn header_mut(&mut self) -> &mut Header {
        // SAFETY: as above; `&mut self` gives exclusive access to the block.
        unsafe { &mut *self.block().as_ptr().cast::<Header>() }
    }

    /// Number of elements the current allocation can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.header().capacity
    }

    /// Number of elements in use.
    #[inline]
    pub fn len(&self) -> usize {
        self.header().len
    }

    /// Whether the buffer holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of one element in bytes, fixed at creation.
    #[inline]
    pub fn element_size(&self) -> usize {
        self.header().element_size
    }

    /// Size in bytes of the underlying block, header included.
    pub fn block_bytes(&self) -> usize {
        let header = self.header();
        // Cannot overflow: the block was allocated with this size.
        HEADER_SIZE + header.capacity * header.element_size
    }

    /// The heap this buffer allocates from.
    pub fn heap(&self) -> &H {
        &self.heap
    }

    /// The handle: address of the first element slot. Never null.
    ///
    /// Invalidated by any call that grows the buffer.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }

    /// Mutable handle. Invalidated by any call that grows the buffer.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.data.as_ptr()
    }

    /// The bytes of all elements in use.
    pub fn as_bytes(&self) -> &[u8] {
        let header = self.header();
        // SAFETY: the first len * element_size payload bytes are initialised.
        unsafe { slice::from_raw_parts(self.as_ptr(), header.len * header.element_size) }
    }

    /// Mutable bytes of all elements in use.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let header = *self.header();
        // SAFETY: as above, with exclusive access.
        unsafe {
            slice::from_raw_parts_mut(self.as_mut_ptr(), header.len * header.element_size)
        }
    }

    /// Bytes of the element at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        let size = self.element_size();
        (index < self.len()).then(|| &self.as_bytes()[index * size..(index + 1) * size])
    }

    /// Mutable bytes of the element at `index`, or `None` past the end.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        let size = self.element_size();
        if index < self.len() {
            Some(&mut self.as_bytes_mut()[index * size..(index + 1) * size])
        } else {
            None
        }
    }

    /// Make room for at least `min_capacity` elements.
    ///
    /// A no-op that performs no allocation when the capacity already
    /// suffices. Otherwise the block is reallocated to
    /// [`grown_capacity`]`(capacity, min_capacity)` elements and may move;
    /// previously obtained pointers are invalid afterwards.
    #[track_caller]
    pub fn ensure_capacity(&mut self, min_capacity: usize) {
        if min_capacity > self.capacity() {
            self.grow(min_capacity);
        }
    }

    #[cold]
    #[track_caller]
    fn grow(&mut self, min_capacity: usize) {
        let Header {
            capacity,
            element_size,
            ..
        } = *self.header();
        let new_capacity = grown_capacity(capacity, min_capacity);
        let bytes = match block_bytes(new_capacity, element_size) {
            Ok(bytes) => bytes,
            Err(err) => ry_alloc::fail(err),
        };

        let old = self.block();
        // SAFETY: `old` is this buffer's live block, allocated by `self.heap`.
        let block = unsafe { ry_alloc::reallocate(&self.heap, old, bytes) };
        // SAFETY: the new block holds the old header and `new_capacity` slots.
        unsafe {
            (*block.as_ptr().cast::<Header>()).capacity = new_capacity;
            self.data = NonNull::new_unchecked(block.as_ptr().add(HEADER_SIZE));
        }
        log::trace!(
            "buffer grew {capacity} -> {new_capacity} elements ({bytes} bytes, {:p} -> {:p})",
            old,
            block
        );
    }

    /// Append one element, given as exactly [`element_size`](Self::element_size) bytes.
    ///
    /// Grows with [`ensure_capacity`](Self::ensure_capacity)`(len + 1)`
    /// first, so the buffer may move.
    ///
    /// # Panics
    ///
    /// Panics if `element.len()` differs from the element size.
    #[track_caller]
    pub fn push(&mut self, element: &[u8]) {
        let size = self.element_size();
        assert_eq!(
            element.len(),
            size,
            "element is {} bytes, buffer holds {size}-byte elements",
            element.len()
        );
        let len = self.len();
        self.ensure_capacity(len + 1);
        // SAFETY: capacity > len, so slot `len` lies inside the block and
        // cannot overlap `element`, which the caller borrows separately.
        unsafe {
            let slot = self.as_mut_ptr().add(len * size);
            ptr::copy_nonoverlapping(element.as_ptr(), slot, size);
        }
        self.header_mut().len = len + 1;
    }

    /// Drop every element from the length. The capacity is kept.
    pub fn clear(&mut self) {
        self.header_mut().len = 0;
    }

    /// Set the length directly.
    ///
    /// # Safety
    ///
    /// `new_len` must not exceed the capacity, and the bytes of every
    /// element below `new_len` must be initialised.
    pub unsafe fn set_len(&mut self, new_len: usize) {
        debug_assert!(new_len <= self.capacity());
        self.header_mut().len = new_len;
    }

    /// Free the whole block, header and payload, in one call.
    ///
    /// Equivalent to dropping the buffer.
    pub fn release(self) {
        drop(self);
    }
}

impl<H: Heap> Drop for RawBuf<H> {
    fn drop(&mut self) {
        let block = self.block();
        log::trace!("releasing buffer block {:p} ({} bytes)", block, self.block_bytes());
        // SAFETY: the block is live and owned by this buffer.
        unsafe { ry_alloc::release(&self.heap, block) };
    }
}

impl<H: Heap> fmt::Debug for RawBuf<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBuf")
            .field("data", &self.data)
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("element_size", &self.element_size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_GROWTH_CAPACITY;
    use ry_alloc::BLOCK_ALIGN;
    use ry_test_utils::CountingHeap;

    fn push_u32<H: Heap>(buf: &mut RawBuf<H>, value: u32) {
        buf.push(&value.to_ne_bytes());
    }

    fn read_u32<H: Heap>(buf: &RawBuf<H>, index: usize) -> u32 {
        u32::from_ne_bytes(buf.get(index).unwrap().try_into().unwrap())
    }

    #[test]
    fn new_buffer_is_empty_with_valid_handle() {
        let buf = RawBuf::new(4);
        assert_eq!(buf.capacity(), 0);
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.element_size(), 4);
        assert!(buf.is_empty());
        assert!(!buf.as_ptr().is_null());
        assert!(buf.as_bytes().is_empty());
    }

    #[test]
    fn raw_buf_is_one_pointer_on_system_heap() {
        assert_eq!(
            std::mem::size_of::<RawBuf>(),
            std::mem::size_of::<*const u8>()
        );
        assert_eq!(
            std::mem::size_of::<Option<RawBuf>>(),
            std::mem::size_of::<*const u8>()
        );
    }

    #[test]
    fn handle_is_payload_past_header() {
        let heap = CountingHeap::new();
        let buf = RawBuf::new_in(4, &heap);
        assert_eq!(heap.last_bytes(), Some(HEADER_SIZE));
        assert_eq!(buf.as_ptr() as usize % BLOCK_ALIGN, 0);
        assert_eq!(
            buf.block().as_ptr() as usize + HEADER_SIZE,
            buf.as_ptr() as usize
        );
    }

    #[test]
    fn create_allocates_once() {
        let heap = CountingHeap::new();
        let buf = RawBuf::new_in(8, &heap);
        assert_eq!(heap.allocations(), 1);
        assert_eq!(heap.reallocations(), 0);
        drop(buf);
        assert_eq!(heap.frees(), 1);
    }

    #[test]
    fn first_push_grows_to_sixteen() {
        let mut buf = RawBuf::new(4);
        push_u32(&mut buf, 1);
        assert_eq!(buf.capacity(), MIN_GROWTH_CAPACITY);
        assert_eq!(buf.len(), 1);
        assert_eq!(read_u32(&buf, 0), 1);
    }

    #[test]
    fn push_and_read_back_in_order() {
        let mut buf = RawBuf::new(4);
        for i in 0..100u32 {
            push_u32(&mut buf, i * 3);
        }
        assert_eq!(buf.len(), 100);
        for i in 0..100u32 {
            assert_eq!(read_u32(&buf, i as usize), i * 3);
        }
        assert_eq!(buf.get(100), None);
    }

    #[test]
    fn seventeenth_push_doubles() {
        let heap = CountingHeap::new();
        let mut buf = RawBuf::new_in(4, &heap);
        for i in 0..16 {
            push_u32(&mut buf, i);
        }
        assert_eq!(buf.capacity(), 16);
        assert_eq!(heap.reallocations(), 1);
        push_u32(&mut buf, 16);
        assert_eq!(buf.capacity(), 32);
        assert_eq!(buf.len(), 17);
        assert_eq!(heap.reallocations(), 2);
        assert_eq!(heap.last_bytes(), Some(HEADER_SIZE + 32 * 4));
    }

    #[test]
    fn ensure_capacity_within_capacity_is_noop() {
        let heap = CountingHeap::new();
        let mut buf = RawBuf::new_in(4, &heap);
        buf.ensure_capacity(1);
        let before = buf.as_ptr();
        let reallocs = heap.reallocations();
        buf.ensure_capacity(5);
        buf.ensure_capacity(16);
        assert_eq!(buf.as_ptr(), before);
        assert_eq!(heap.reallocations(), reallocs);
    }

    #[test]
    fn ensure_capacity_zero_on_fresh_buffer_is_noop() {
        let heap = CountingHeap::new();
        let mut buf = RawBuf::new_in(4, &heap);
        buf.ensure_capacity(0);
        assert_eq!(buf.capacity(), 0);
        assert_eq!(heap.reallocations(), 0);
    }

    #[test]
    fn ensure_capacity_honours_large_request() {
        let mut buf = RawBuf::new(2);
        buf.ensure_capacity(1000);
        assert_eq!(buf.capacity(), 1000);
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn growth_preserves_contents() {
        let mut buf = RawBuf::new(4);
        for i in 0..16 {
            push_u32(&mut buf, 0xDEAD_0000 + i);
        }
        buf.ensure_capacity(10_000);
        for i in 0..16 {
            assert_eq!(read_u32(&buf, i as usize), 0xDEAD_0000 + i);
        }
    }

    #[test]
    fn zeroed_buffer_is_full_and_zero() {
        let heap = CountingHeap::new();
        let buf = RawBuf::zeroed_in(8, 10, &heap);
        assert_eq!(heap.counts().zero_allocations, 1);
        assert_eq!(buf.len(), 10);
        assert_eq!(buf.capacity(), 10);
        assert!(buf.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(buf.as_bytes().len(), 80);
    }

    #[test]
    fn zeroed_buffer_grows_by_doubling() {
        let mut buf = RawBuf::zeroed_in(1, 20, SystemHeap);
        buf.push(&[9]);
        assert_eq!(buf.capacity(), 40);
        assert_eq!(buf.get(20), Some(&[9u8][..]));
    }

    #[test]
    fn with_config_reserves_initial_capacity() {
        let buf = RawBuf::with_config(&BufConfig::new(4).with_initial_capacity(3));
        assert_eq!(buf.capacity(), MIN_GROWTH_CAPACITY);
        let buf = RawBuf::with_capacity_in(4, 100, SystemHeap);
        assert_eq!(buf.capacity(), 100);
        assert!(buf.is_empty());
    }

    #[test]
    fn get_mut_writes_through() {
        let mut buf = RawBuf::new(2);
        buf.push(&[1, 2]);
        buf.push(&[3, 4]);
        buf.get_mut(1).unwrap().copy_from_slice(&[7, 8]);
        assert_eq!(buf.as_bytes(), &[1, 2, 7, 8]);
        assert!(buf.get_mut(2).is_none());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buf = RawBuf::new(1);
        for b in 0..20u8 {
            buf.push(&[b]);
        }
        let capacity = buf.capacity();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), capacity);
        assert_eq!(buf.element_size(), 1);
    }

    #[test]
    fn zero_sized_elements_still_count() {
        let heap = CountingHeap::new();
        let mut buf = RawBuf::new_in(0, &heap);
        for _ in 0..40 {
            buf.push(&[]);
        }
        assert_eq!(buf.len(), 40);
        assert_eq!(buf.capacity(), 64);
        assert_eq!(buf.block_bytes(), HEADER_SIZE);
        assert_eq!(buf.get(39), Some(&[][..]));
    }

    #[test]
    #[should_panic(expected = "buffer holds 4-byte elements")]
    fn push_rejects_wrong_width() {
        let mut buf = RawBuf::new(4);
        buf.push(&[1, 2]);
    }

    #[test]
    fn release_frees_exactly_once() {
        let heap = CountingHeap::new();
        let mut buf = RawBuf::new_in(4, &heap);
        for i in 0..50 {
            push_u32(&mut buf, i);
        }
        assert_eq!(heap.live_blocks(), 1);
        buf.release();
        assert_eq!(heap.frees(), 1);
        assert_eq!(heap.live_blocks(), 0);
    }

    #[test]
    fn into_raw_and_back_keeps_contents() {
        let mut buf = RawBuf::new(4);
        push_u32(&mut buf, 11);
        push_u32(&mut buf, 22);
        let handle = buf.into_raw();
        let buf = unsafe { RawBuf::from_raw(handle) };
        assert_eq!(buf.len(), 2);
        assert_eq!(read_u32(&buf, 1), 22);
    }

    #[test]
    fn into_raw_parts_does_not_free() {
        let heap = CountingHeap::new();
        let buf = RawBuf::new_in(4, &heap);
        let (handle, heap_ref) = buf.into_raw_parts();
        assert_eq!(heap.frees(), 0);
        drop(unsafe { RawBuf::from_raw_parts_in(handle, heap_ref) });
        assert_eq!(heap.frees(), 1);
    }

    #[test]
    fn debug_shows_bookkeeping() {
        let mut buf = RawBuf::new(4);
        push_u32(&mut buf, 5);
        let text = format!("{buf:?}");
        assert!(text.contains("capacity: 16"));
        assert!(text.contains("len: 1"));
        assert!(text.contains("element_size: 4"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn n_pushes_give_len_n(n in 0usize..300, size in 0usize..24) {
                let mut buf = RawBuf::new(size);
                let element = vec![0x5Au8; size];
                for _ in 0..n {
                    buf.push(&element);
                }
                prop_assert_eq!(buf.len(), n);
                prop_assert!(buf.capacity() >= n);
                prop_assert_eq!(buf.element_size(), size);
            }

            #[test]
            fn reallocations_follow_growth_law(n in 1usize..500) {
                let heap = CountingHeap::new();
                let mut buf = RawBuf::new_in(4, &heap);
                for i in 0..n {
                    let before_cap = buf.capacity();
                    let before_len = buf.len();
                    let before_reallocs = heap.reallocations();
                    push_u32(&mut buf, i as u32);
                    if before_len < before_cap {
                        prop_assert_eq!(buf.capacity(), before_cap);
                        prop_assert_eq!(heap.reallocations(), before_reallocs);
                    } else {
                        prop_assert_eq!(
                            buf.capacity(),
                            (2 * before_cap).max((before_len + 1).max(16))
                        );
                        prop_assert_eq!(heap.reallocations(), before_reallocs + 1);
                    }
                }
            }

            #[test]
            fn ensure_capacity_is_idempotent(start in 0usize..64, min in 0usize..4096) {
                let heap = CountingHeap::new();
                let mut buf = RawBuf::new_in(8, &heap);
                buf.ensure_capacity(start);
                let base = heap.reallocations();
                buf.ensure_capacity(min);
                let handle = buf.as_ptr();
                let after_first = heap.reallocations();
                buf.ensure_capacity(min);
                prop_assert!(after_first - base <= 1);
                prop_assert_eq!(heap.reallocations(), after_first);
                prop_assert_eq!(buf.as_ptr(), handle);
                prop_assert!(buf.capacity() >= min);
            }

            #[test]
            fn one_live_block_until_release(ops in proptest::collection::vec(0usize..64, 0..40)) {
                let heap = CountingHeap::new();
                let mut buf = RawBuf::new_in(3, &heap);
                for op in ops {
                    if op % 2 == 0 {
                        buf.push(&[op as u8; 3]);
                    } else {
                        buf.ensure_capacity(op * 4);
                    }
                    prop_assert_eq!(heap.live_blocks(), 1);
                    prop_assert_eq!(buf.element_size(), 3);
                }
                buf.release();
                prop_assert_eq!(heap.live_blocks(), 0);
                prop_assert_eq!(heap.frees(), 1);
            }
        }
    }
}

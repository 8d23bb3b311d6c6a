//! Instrumented heaps.

#![allow(unsafe_code)]

use std::cell::Cell;
use std::ptr::NonNull;

use ry_alloc::{Heap, SystemHeap};
use ry_core::{AllocError, AllocRequest};

/// Snapshot of the calls a [`CountingHeap`] has served.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeapCounts {
    pub allocations: usize,
    pub zero_allocations: usize,
    pub reallocations: usize,
    pub frees: usize,
}

impl HeapCounts {
    /// Blocks handed out and not yet freed.
    pub fn live_blocks(&self) -> usize {
        self.allocations + self.zero_allocations - self.frees
    }
}

/// A [`SystemHeap`] that counts every call.
///
/// Pass it by reference (`&CountingHeap` is itself a [`Heap`]) so the test
/// keeps access to the counters while a buffer owns the reference.
#[derive(Debug, Default)]
pub struct CountingHeap {
    counts: Cell<HeapCounts>,
    last_bytes: Cell<Option<usize>>,
}

impl CountingHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> HeapCounts {
        self.counts.get()
    }

    pub fn allocations(&self) -> usize {
        self.counts.get().allocations
    }

    pub fn reallocations(&self) -> usize {
        self.counts.get().reallocations
    }

    pub fn frees(&self) -> usize {
        self.counts.get().frees
    }

    pub fn live_blocks(&self) -> usize {
        self.counts.get().live_blocks()
    }

    /// Byte size of the most recent successful request.
    pub fn last_bytes(&self) -> Option<usize> {
        self.last_bytes.get()
    }

    fn bump(&self, f: impl FnOnce(&mut HeapCounts)) {
        let mut counts = self.counts.get();
        f(&mut counts);
        self.counts.set(counts);
    }
}

#[allow(unsafe_code)]
// SAFETY: every block comes from `SystemHeap`.
unsafe impl Heap for CountingHeap {
    fn allocate(&self, bytes: usize) -> Result<NonNull<u8>, AllocError> {
        let block = SystemHeap.allocate(bytes)?;
        self.bump(|c| c.allocations += 1);
        self.last_bytes.set(Some(bytes));
        Ok(block)
    }

    fn zero_allocate(&self, count: usize, size: usize) -> Result<NonNull<u8>, AllocError> {
        let block = SystemHeap.zero_allocate(count, size)?;
        self.bump(|c| c.zero_allocations += 1);
        self.last_bytes.set(Some(count * size));
        Ok(block)
    }

    unsafe fn reallocate(
        &self,
        block: NonNull<u8>,
        bytes: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        let block = unsafe { SystemHeap.reallocate(block, bytes)? };
        self.bump(|c| c.reallocations += 1);
        self.last_bytes.set(Some(bytes));
        Ok(block)
    }

    unsafe fn free(&self, block: NonNull<u8>) {
        self.bump(|c| c.frees += 1);
        unsafe { SystemHeap.free(block) }
    }
}

/// A [`SystemHeap`] that serves a fixed number of requests, then fails.
///
/// Failures report `ENOMEM` with the request that was refused. `free` is
/// always honoured and does not count as a request.
#[derive(Debug)]
pub struct FailingHeap {
    remaining: Cell<usize>,
}

impl FailingHeap {
    /// Succeed for the first `successes` allocate/zero-allocate/reallocate
    /// calls, fail for every call after that.
    pub fn after(successes: usize) -> Self {
        Self {
            remaining: Cell::new(successes),
        }
    }

    /// Fail every request.
    pub fn always() -> Self {
        Self::after(0)
    }

    fn admit(&self, request: AllocRequest) -> Result<(), AllocError> {
        match self.remaining.get() {
            0 => Err(AllocError::OutOfMemory {
                request,
                errno: libc::ENOMEM,
            }),
            n => {
                self.remaining.set(n - 1);
                Ok(())
            }
        }
    }
}

#[allow(unsafe_code)]
// SAFETY: every block comes from `SystemHeap`.
unsafe impl Heap for FailingHeap {
    fn allocate(&self, bytes: usize) -> Result<NonNull<u8>, AllocError> {
        self.admit(AllocRequest::Allocate { bytes })?;
        SystemHeap.allocate(bytes)
    }

    fn zero_allocate(&self, count: usize, size: usize) -> Result<NonNull<u8>, AllocError> {
        self.admit(AllocRequest::ZeroAllocate { count, size })?;
        SystemHeap.zero_allocate(count, size)
    }

    unsafe fn reallocate(
        &self,
        block: NonNull<u8>,
        bytes: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        self.admit(AllocRequest::Reallocate { bytes })?;
        unsafe { SystemHeap.reallocate(block, bytes) }
    }

    unsafe fn free(&self, block: NonNull<u8>) {
        unsafe { SystemHeap.free(block) }
    }
}

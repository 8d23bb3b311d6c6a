//! Fail-fast wrappers over a [`Heap`].
//!
//! Each wrapper returns a valid block or does not return at all. Failures
//! are reported through [`ry_core::fatal`] at the location of the outermost
//! `#[track_caller]` caller, naming the wrapper that failed.

#![allow(unsafe_code)]

use std::ptr::NonNull;

use ry_core::{fatal, function_name, AllocError, SourceLocation};

use crate::heap::Heap;

/// Terminate the process, reporting `err` at the caller's location.
#[cold]
#[track_caller]
pub fn fail(err: AllocError) -> ! {
    report(SourceLocation::caller(function_name!()), err)
}

#[cold]
fn report(location: SourceLocation, err: AllocError) -> ! {
    fatal(location, format_args!("{err}"))
}

/// Allocate `bytes` bytes from `heap`, or terminate the process.
#[track_caller]
pub fn allocate<H: Heap + ?Sized>(heap: &H, bytes: usize) -> NonNull<u8> {
    match heap.allocate(bytes) {
        Ok(block) => block,
        Err(err) => report(SourceLocation::caller(function_name!()), err),
    }
}

/// Allocate `count * size` zeroed bytes from `heap`, or terminate the process.
#[track_caller]
pub fn zero_allocate<H: Heap + ?Sized>(heap: &H, count: usize, size: usize) -> NonNull<u8> {
    match heap.zero_allocate(count, size) {
        Ok(block) => block,
        Err(err) => report(SourceLocation::caller(function_name!()), err),
    }
}

/// Resize `block` to `bytes` bytes, or terminate the process.
///
/// The returned address may differ from `block`; the old address must not
/// be used afterwards.
///
/// # Safety
///
/// Same as [`Heap::reallocate`].
#[track_caller]
pub unsafe fn reallocate<H: Heap + ?Sized>(
    heap: &H,
    block: NonNull<u8>,
    bytes: usize,
) -> NonNull<u8> {
    // SAFETY: forwarded from the caller.
    match unsafe { heap.reallocate(block, bytes) } {
        Ok(block) => block,
        Err(err) => report(SourceLocation::caller(function_name!()), err),
    }
}

/// Return `block` to `heap`.
///
/// # Safety
///
/// Same as [`Heap::free`].
pub unsafe fn release<H: Heap + ?Sized>(heap: &H, block: NonNull<u8>) {
    // SAFETY: forwarded from the caller.
    unsafe { heap.free(block) }
}

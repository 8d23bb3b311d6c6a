//! Typed view over [`RawBuf`].
//!
//! [`Buf<T>`] fixes the element size to `size_of::<T>()` and lets the type
//! system guarantee element layout, so no caller ever reinterprets bytes.
//! Storage, growth and release are exactly those of the underlying
//! [`RawBuf`].

#![allow(unsafe_code)]

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr;
use std::slice;

use ry_alloc::{Heap, SystemHeap, BLOCK_ALIGN};

use crate::raw::RawBuf;

/// A growable array of `T` stored in a header-prefixed block.
pub struct Buf<T, H: Heap = SystemHeap> {
    raw: RawBuf<H>,
    _marker: PhantomData<T>,
}

impl<T> Buf<T> {
    /// Create an empty buffer on the system heap.
    #[track_caller]
    pub fn new() -> Self {
        Self::new_in(SystemHeap)
    }

    /// Create an empty buffer with room for at least `capacity` elements.
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, SystemHeap)
    }
}

impl<T, H: Heap> Buf<T, H> {
    const ALIGN_OK: () = assert!(
        mem::align_of::<T>() <= BLOCK_ALIGN,
        "element alignment exceeds the buffer block alignment"
    );

    /// Create an empty buffer on `heap`.
    #[track_caller]
    pub fn new_in(heap: H) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::ALIGN_OK;
        Self {
            raw: RawBuf::new_in(mem::size_of::<T>(), heap),
            _marker: PhantomData,
        }
    }

    /// Create an empty buffer on `heap` with room for at least `capacity` elements.
    #[track_caller]
    pub fn with_capacity_in(capacity: usize, heap: H) -> Self {
        let mut buf = Self::new_in(heap);
        buf.ensure_capacity(capacity);
        buf
    }

    /// Number of elements in use.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether the buffer holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Number of elements the current allocation can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// `size_of::<T>()`, as recorded in the header.
    #[inline]
    pub fn element_size(&self) -> usize {
        self.raw.element_size()
    }

    /// Make room for at least `min_capacity` elements.
    ///
    /// See [`RawBuf::ensure_capacity`].
    #[track_caller]
    pub fn ensure_capacity(&mut self, min_capacity: usize) {
        self.raw.ensure_capacity(min_capacity);
    }

    /// Append `value`, growing the buffer if it is full.
    #[track_caller]
    pub fn push(&mut self, value: T) {
        let len = self.len();
        self.raw.ensure_capacity(len + 1);
        // SAFETY: capacity > len and the payload is aligned for T.
        unsafe {
            self.raw.as_mut_ptr().cast::<T>().add(len).write(value);
            self.raw.set_len(len + 1);
        }
    }

    /// Remove and return the last element. The capacity is kept.
    pub fn pop(&mut self) -> Option<T> {
        let len = self.len().checked_sub(1)?;
        // SAFETY: slot `len` is initialised and is forgotten by the new length.
        unsafe {
            self.raw.set_len(len);
            Some(self.raw.as_ptr().cast::<T>().add(len).read())
        }
    }

    /// Drop every element. The capacity is kept.
    pub fn clear(&mut self) {
        let elements: *mut [T] = self.as_mut_slice();
        // SAFETY: the length is reset before dropping, so a panicking
        // destructor cannot lead to a double drop.
        unsafe {
            self.raw.set_len(0);
            ptr::drop_in_place(elements);
        }
    }

    /// The elements in use.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the payload is aligned for T and holds `len` initialised
        // elements; for an empty buffer the pointer is non-null and aligned.
        unsafe { slice::from_raw_parts(self.raw.as_ptr().cast::<T>(), self.len()) }
    }

    /// The elements in use, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len();
        // SAFETY: as above, with exclusive access.
        unsafe { slice::from_raw_parts_mut(self.raw.as_mut_ptr().cast::<T>(), len) }
    }
}

impl<T, H: Heap> Drop for Buf<T, H> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, H: Heap> Deref for Buf<T, H> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, H: Heap> DerefMut for Buf<T, H> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> Default for Buf<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, H: Heap> Extend<T> for Buf<T, H> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.ensure_capacity(self.len().saturating_add(lower));
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> FromIterator<T> for Buf<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut buf = Self::new();
        buf.extend(iter);
        buf
    }
}

impl<T: fmt::Debug, H: Heap> fmt::Debug for Buf<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

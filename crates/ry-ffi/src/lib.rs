//! C ABI for ry buffers.
//!
//! Exposes the raw-handle contract: a buffer is the address of its first
//! element slot, with the header `HEADER_SIZE` bytes before it. Every call
//! that can grow a buffer returns the handle to use from then on; the
//! caller must overwrite its stored handle with it, as any other copy may
//! now dangle.
//!
//! ```c
//! uint8_t *buf = ry_buf_create(sizeof(int32_t));
//! for (int32_t i = 0; i < 100; i++) {
//!     buf = ry_buf_append(buf, (const uint8_t *)&i);
//! }
//! size_t n = ry_buf_len(buf);  /* 100 */
//! ry_buf_release(buf);
//! ```
//!
//! A null handle is tolerated: queries return 0, growing calls return null
//! and release does nothing. Allocation failure terminates the process.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::mem::ManuallyDrop;
use std::ptr::{self, NonNull};
use std::slice;

use ry_buf::RawBuf;

/// Borrow the buffer behind `handle` without taking ownership.
#[allow(unsafe_code)]
fn borrow(handle: *mut u8) -> Option<ManuallyDrop<RawBuf>> {
    let data = NonNull::new(handle)?;
    // SAFETY: the caller of the C API promises `handle` is a live handle
    // from this library; ManuallyDrop keeps the block alive.
    Some(ManuallyDrop::new(unsafe { RawBuf::from_raw(data) }))
}

/// Create an empty buffer of `element_size`-byte elements.
///
/// Returns a non-null handle with capacity and length 0.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ry_buf_create(element_size: usize) -> *mut u8 {
    RawBuf::new(element_size).into_raw().as_ptr()
}

/// Number of elements the buffer can hold without growing.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ry_buf_capacity(handle: *mut u8) -> usize {
    borrow(handle).map_or(0, |buf| buf.capacity())
}

/// Number of elements in use.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ry_buf_len(handle: *mut u8) -> usize {
    borrow(handle).map_or(0, |buf| buf.len())
}

/// Size of one element in bytes.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ry_buf_element_size(handle: *mut u8) -> usize {
    borrow(handle).map_or(0, |buf| buf.element_size())
}

/// Make room for at least `min_capacity` elements.
///
/// Returns the handle to use from now on: `handle` itself when the capacity
/// already sufficed, otherwise possibly a new address.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ry_buf_ensure_capacity(handle: *mut u8, min_capacity: usize) -> *mut u8 {
    match borrow(handle) {
        Some(mut buf) => {
            buf.ensure_capacity(min_capacity);
            buf.as_mut_ptr()
        }
        None => ptr::null_mut(),
    }
}

/// Append one element, copying `element_size` bytes from `element`.
///
/// Returns the handle to use from now on. `element` may point at an element
/// already in the buffer (`buf = ry_buf_append(buf, buf)`); it is read after
/// any growth. `element` may be null only for zero-sized elements.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ry_buf_append(handle: *mut u8, element: *const u8) -> *mut u8 {
    let Some(mut buf) = borrow(handle) else {
        return ptr::null_mut();
    };
    let size = buf.element_size();
    if size == 0 {
        buf.push(&[]);
        return buf.as_mut_ptr();
    }

    let len = buf.len();
    let offset = (element as usize).wrapping_sub(handle as usize);
    let aliased = offset
        .checked_add(size)
        .is_some_and(|end| end <= len * size);
    buf.ensure_capacity(len + 1);
    let source = if aliased {
        // SAFETY: `offset` lies within the in-use elements, which growth
        // carried over to the new block.
        unsafe { buf.as_ptr().add(offset) }
    } else {
        element
    };
    // SAFETY: `source` points to `size` readable bytes: either a live
    // element of this buffer or caller memory outside its block. The
    // capacity now exceeds `len`, so `push` does not move the block.
    let bytes = unsafe { slice::from_raw_parts(source, size) };
    buf.push(bytes);
    buf.as_mut_ptr()
}

/// Free the buffer. `handle` and every copy of it become invalid.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ry_buf_release(handle: *mut u8) {
    if let Some(buf) = borrow(handle) {
        ManuallyDrop::into_inner(buf).release();
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;

    fn append_i32(handle: *mut u8, value: i32) -> *mut u8 {
        ry_buf_append(handle, value.to_ne_bytes().as_ptr())
    }

    fn read_i32(handle: *mut u8, index: usize) -> i32 {
        assert!(index < ry_buf_len(handle));
        unsafe { handle.cast::<i32>().add(index).read() }
    }

    #[test]
    fn create_gives_empty_non_null_handle() {
        let h = ry_buf_create(4);
        assert!(!h.is_null());
        assert_eq!(ry_buf_capacity(h), 0);
        assert_eq!(ry_buf_len(h), 0);
        assert_eq!(ry_buf_element_size(h), 4);
        ry_buf_release(h);
    }

    #[test]
    fn append_returns_current_handle() {
        let mut h = ry_buf_create(4);
        for i in 0..17 {
            h = append_i32(h, i * 2);
        }
        assert_eq!(ry_buf_len(h), 17);
        assert_eq!(ry_buf_capacity(h), 32);
        assert_eq!(read_i32(h, 0), 0);
        assert_eq!(read_i32(h, 16), 32);
        ry_buf_release(h);
    }

    #[test]
    fn ensure_capacity_within_capacity_returns_same_handle() {
        let mut h = ry_buf_create(4);
        h = ry_buf_ensure_capacity(h, 16);
        let same = ry_buf_ensure_capacity(h, 5);
        assert_eq!(same, h);
        assert_eq!(ry_buf_capacity(h), 16);
        ry_buf_release(h);
    }

    #[test]
    fn append_own_element_across_growth() {
        let mut h = ry_buf_create(4);
        for i in 0..16 {
            h = append_i32(h, 100 + i);
        }
        assert_eq!(ry_buf_capacity(h), 16);
        h = ry_buf_append(h, h);
        assert_eq!(ry_buf_capacity(h), 32);
        assert_eq!(ry_buf_len(h), 17);
        assert_eq!(read_i32(h, 16), 100);

        let last = unsafe { h.add(16 * 4) };
        h = ry_buf_append(h, last);
        assert_eq!(read_i32(h, 17), 100);
        ry_buf_release(h);
    }

    #[test]
    fn zero_sized_elements_accept_null_element() {
        let mut h = ry_buf_create(0);
        for _ in 0..3 {
            h = ry_buf_append(h, ptr::null());
        }
        assert_eq!(ry_buf_len(h), 3);
        ry_buf_release(h);
    }

    #[test]
    fn null_handle_is_tolerated() {
        let null = ptr::null_mut();
        assert_eq!(ry_buf_capacity(null), 0);
        assert_eq!(ry_buf_len(null), 0);
        assert_eq!(ry_buf_element_size(null), 0);
        assert!(ry_buf_ensure_capacity(null, 10).is_null());
        assert!(ry_buf_append(null, [0u8; 4].as_ptr()).is_null());
        ry_buf_release(null);
    }

    #[test]
    fn handle_round_trips_into_rust_buffer() {
        let mut h = ry_buf_create(2);
        h = ry_buf_append(h, [1u8, 2].as_ptr());
        let buf = unsafe { RawBuf::from_raw(NonNull::new(h).unwrap()) };
        assert_eq!(buf.as_bytes(), &[1, 2]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn appended_values_read_back(values in proptest::collection::vec(any::<i32>(), 0..200)) {
                let mut h = ry_buf_create(4);
                for &v in &values {
                    h = append_i32(h, v);
                }
                prop_assert_eq!(ry_buf_len(h), values.len());
                for (i, &v) in values.iter().enumerate() {
                    prop_assert_eq!(read_i32(h, i), v);
                }
                ry_buf_release(h);
            }
        }
    }
}

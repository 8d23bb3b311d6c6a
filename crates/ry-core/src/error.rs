//! Allocation error types.
//!
//! Allocation failure is the only error kind in ry. Heaps report it as an
//! [`AllocError`]; the fail-fast wrappers in `ry-alloc` turn it into process
//! termination, so buffer callers never see it.

use std::error::Error;
use std::fmt;
use std::io;

/// The heap request that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocRequest {
    /// A plain allocation of `bytes` bytes.
    Allocate {
        /// Number of bytes requested.
        bytes: usize,
    },
    /// A zero-initialised allocation of `count` items of `size` bytes each.
    ZeroAllocate {
        /// Number of items requested.
        count: usize,
        /// Size of each item in bytes.
        size: usize,
    },
    /// Resizing an existing block to `bytes` bytes.
    Reallocate {
        /// New size of the block in bytes.
        bytes: usize,
    },
}

impl AllocRequest {
    /// Total number of bytes asked for, if it fits in a `usize`.
    pub fn bytes(&self) -> Option<usize> {
        match *self {
            Self::Allocate { bytes } | Self::Reallocate { bytes } => Some(bytes),
            Self::ZeroAllocate { count, size } => count.checked_mul(size),
        }
    }
}

/// Errors reported by a heap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The heap could not satisfy the request.
    OutOfMemory {
        /// What was asked for.
        request: AllocRequest,
        /// Platform error code observed after the failure.
        errno: i32,
    },
    /// The requested size cannot be represented as an allocation size.
    SizeOverflow {
        /// Number of items requested.
        count: usize,
        /// Size of each item in bytes.
        size: usize,
    },
}

impl AllocError {
    /// Platform description of the `errno` carried by an out-of-memory error.
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::OutOfMemory { errno, .. } => {
                Some(io::Error::from_raw_os_error(*errno).to_string())
            }
            Self::SizeOverflow { .. } => None,
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { request, errno } => {
                match *request {
                    AllocRequest::Allocate { bytes } => {
                        write!(f, "failed to allocate {bytes} bytes")?
                    }
                    AllocRequest::ZeroAllocate { count, size } => write!(
                        f,
                        "failed to allocate {count} items of size {size} ({} bytes)",
                        count.saturating_mul(size)
                    )?,
                    AllocRequest::Reallocate { bytes } => {
                        write!(f, "failed to reallocate {bytes} bytes")?
                    }
                }
                write!(f, "\nerrno {errno}: {}", io::Error::from_raw_os_error(*errno))
            }
            Self::SizeOverflow { count, size } => write!(
                f,
                "requested {count} items of {size} bytes exceeds the addressable size"
            ),
        }
    }
}

impl Error for AllocError {}

//! Fail-fast allocation layer for ry.
//!
//! Thin wrappers over the platform heap that never hand back a null or an
//! error: every failure is routed to [`ry_core::fatal`] with the requested
//! size and the platform error, and the process exits. This crate is one of
//! two that may contain `unsafe` code (along with `ry-buf`).
//!
//! ```text
//! ry-buf ──► checked::{allocate, zero_allocate, reallocate, release}
//!                 │
//!                 ▼
//!            Heap (SystemHeap = libc malloc/calloc/realloc/free)
//!                 │ Err(AllocError)
//!                 ▼
//!            ry_core::fatal  ──►  process::exit(1)
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod checked;
pub mod heap;

pub use checked::{allocate, fail, reallocate, release, zero_allocate};
pub use heap::{Heap, SystemHeap, BLOCK_ALIGN};
pub use ry_core::{AllocError, AllocRequest};

//! Test utilities for ry development.
//!
//! Provides instrumented [`Heap`] implementations ([`CountingHeap`],
//! [`FailingHeap`]) and [`run_in_child`] for asserting on code paths that
//! terminate the process.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod child;
pub mod heaps;

pub use child::{is_child, run_in_child, CHILD_ENV};
pub use heaps::{CountingHeap, FailingHeap, HeapCounts};

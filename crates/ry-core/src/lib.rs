//! Core types for the ry workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! pieces every other crate reports failures through: source locations,
//! the fail-fast [`fatal`](fatal::fatal) reporter, and [`AllocError`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod fatal;
pub mod location;

pub use error::{AllocError, AllocRequest};
pub use fatal::{fatal, FatalReport, EXIT_FAILURE, FATAL_TAG};
pub use location::SourceLocation;

//! Output Generation
//!
//! Snapshot generation and file output.

pub mod snapshot;

pub use snapshot::*;

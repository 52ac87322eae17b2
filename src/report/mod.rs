//! Report module - conversion summaries and data previews

pub mod preview;
pub mod summary;

pub use preview::*;
pub use summary::*;

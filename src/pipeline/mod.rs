//! Pipeline module - read, convert, write and fetch steps

pub mod error;
pub mod fetch;
pub mod input;
pub mod loader;
pub mod records;
pub mod writer;

pub use error::*;
pub use fetch::*;
pub use input::*;
pub use loader::*;
pub use records::*;
pub use writer::*;

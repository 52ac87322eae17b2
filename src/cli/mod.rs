//! CLI module - argument parsing, line sources and the interactive session

mod args;
pub mod convert;
pub mod prompts;
pub mod session;

pub use args::Cli;
pub use convert::*;
pub use prompts::*;
pub use session::*;

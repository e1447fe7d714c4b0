//! gmoshui library
//!
//! Command definitions and terminal helpers behind the `gmoshui` binary.

pub mod cli;
pub mod commands;
pub mod utils;

//! Shared utilities for the gmoshui CLI

pub mod format;
pub mod gmod;
pub mod io;
pub mod progress;
pub mod table;
pub mod tree;

pub use format::*;
pub use gmod::*;
pub use io::*;
pub use progress::*;
pub use table::*;
pub use tree::*;

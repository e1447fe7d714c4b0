//! # gmod_lua_cache - Lua cache decoder
//!
//! Garry's Mod stores the client-side Lua it receives from servers under
//! `garrysmod/cache/lua/`, one compressed file per script. This crate turns
//! those files back into source.
//!
//! ```no_run
//! use gmod_lua_cache::decode_file;
//!
//! # fn main() -> Result<(), gmod_lua_cache::Error> {
//! let source = decode_file("garrysmod/cache/lua/0a1b2c3d.lua")?;
//! println!("{}", String::from_utf8_lossy(&source));
//! # Ok(())
//! # }
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod decode;
pub mod directory;
pub mod error;

pub use decode::{FRAMING_LEN, decode, decode_file};
pub use directory::{CacheSummary, cache_dir, extract_directory, list_entries};
pub use error::{Error, Result};

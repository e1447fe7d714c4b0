//! Common test utilities and fixtures

#![allow(dead_code)]

#[path = "../../src/test_utils.rs"]
mod gma_builder;

pub use gma_builder::GmaBuilder;

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Route library logging to the test harness, once per process
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Create a temporary directory for tests
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Generate test data of a specific size
pub fn generate_test_data(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// A representative addon with nested folders and a binary asset
pub fn sample_addon() -> GmaBuilder {
    GmaBuilder::new("Sample Addon")
        .description(r#"{"description": "Adds things", "type": "tool", "tags": ["build", "fun"]}"#)
        .require("104815552")
        .file("addon.json", br#"{"title": "Sample Addon"}"#)
        .file("lua/autorun/sample_init.lua", b"include('sample/core.lua')\n")
        .file("lua/sample/core.lua", b"SAMPLE = SAMPLE or {}\n")
        .file("materials/sample/icon.png", &generate_test_data(3000))
        .file("sound/sample/empty.wav", b"")
}

/// Write a fixture archive into `dir`
pub fn write_archive(dir: &Path, name: &str, builder: &GmaBuilder) -> PathBuf {
    let path = dir.join(name);
    builder.write_to(&path).expect("Failed to write test archive");
    path
}

//! Opening archives from disk and from memory

use crate::common::{GmaBuilder, init_logging, sample_addon, temp_dir, write_archive};
use gmod_gma::{Archive, Error, FormatVersion, OpenOptions};
use pretty_assertions::assert_eq;

#[test]
fn test_open_from_disk_matches_from_bytes() {
    let dir = temp_dir();
    let builder = sample_addon();
    let path = write_archive(dir.path(), "sample.gma", &builder);

    let from_disk = Archive::open(&path).unwrap();
    let from_memory = Archive::from_bytes(&builder.build()).unwrap();

    assert_eq!(from_disk.entries(), from_memory.entries());
    assert_eq!(from_disk.content_start(), from_memory.content_start());
    assert_eq!(from_disk.metadata().name, "Sample Addon");
}

#[test]
fn test_metadata_fields() {
    let data = sample_addon().author(76561198000000000, 1_600_000_000).build();
    let archive = Archive::from_bytes(&data).unwrap();
    let meta = archive.metadata();

    assert_eq!(meta.version, 3);
    assert_eq!(meta.format, FormatVersion::V3);
    assert_eq!(meta.author_id, 76561198000000000);
    assert_eq!(meta.timestamp, 1_600_000_000);
    assert_eq!(meta.required_content, Some(vec!["104815552".to_string()]));
    assert_eq!(meta.author_name, "Author Name");

    let info = meta.description_info();
    assert_eq!(info.description.as_deref(), Some("Adds things"));
    assert_eq!(info.addon_type.as_deref(), Some("tool"));
    assert_eq!(info.tags, vec!["build", "fun"]);
    assert_eq!(meta.display_description(), "Adds things");
}

#[test]
fn test_plain_description_is_not_fatal() {
    let data = GmaBuilder::new("Legacy")
        .description("Made in 2013, no JSON here")
        .file("lua/a.lua", b"x")
        .build();
    let archive = Archive::from_bytes(&data).unwrap();

    assert!(archive.metadata().description_info().is_empty());
    assert_eq!(
        archive.metadata().display_description(),
        "Made in 2013, no JSON here"
    );
}

#[test]
fn test_version_one_skips_required_content() {
    let data = GmaBuilder::new("Old")
        .version(1)
        .require("ignored for v1")
        .file("a.txt", b"abc")
        .build();
    let archive = Archive::from_bytes(&data).unwrap();

    assert_eq!(archive.metadata().required_content, None);
    assert_eq!(archive.entries()[0].path, "a.txt");
}

#[test]
fn test_future_version_best_effort() {
    init_logging();
    let data = GmaBuilder::new("Future").version(9).file("a.txt", b"abc").build();

    let archive = Archive::from_bytes(&data).unwrap();
    assert_eq!(archive.metadata().version, 9);
    assert_eq!(archive.len(), 1);

    let strict = OpenOptions::new().strict_version(true).from_bytes(&data);
    assert!(matches!(strict, Err(Error::UnsupportedVersion(9))));
}

#[test]
fn test_not_a_gma() {
    let dir = temp_dir();
    let path = dir.path().join("readme.txt");
    std::fs::write(&path, "This is not an addon archive").unwrap();

    let err = Archive::open(&path).unwrap_err();
    assert!(err.is_format_error());
    assert!(matches!(err, Error::BadMagic { found } if &found == b"This"));
}

#[test]
fn test_empty_archive() {
    let data = GmaBuilder::new("Empty").build();
    let archive = Archive::from_bytes(&data).unwrap();

    assert!(archive.is_empty());
    assert_eq!(archive.total_size(), 0);
    assert_eq!(archive.content_start(), data.len() as u64);
}

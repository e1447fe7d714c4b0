//! Extraction round trips: every extracted file reads back byte-for-byte

use crate::common::{GmaBuilder, generate_test_data, sample_addon, temp_dir, write_archive};
use gmod_gma::{
    Archive, Error, ExtractOptions, extract, extract_file, hierarchy, progress::NullSink,
};
use std::fs;
use std::io::Cursor;

fn assert_round_trip(data: &[u8]) {
    let archive = Archive::from_bytes(data).unwrap();
    let dir = temp_dir();

    let count = extract(
        &archive,
        &mut Cursor::new(data),
        dir.path(),
        &ExtractOptions::new(),
        &mut NullSink,
    )
    .unwrap();
    assert_eq!(count, archive.len());

    let mut source = Cursor::new(data);
    for entry in archive.entries() {
        let on_disk = fs::read(dir.path().join(&entry.path)).unwrap();
        let stored = archive.read_entry(&mut source, entry).unwrap();
        assert_eq!(on_disk, stored, "{} differs", entry.path);
        assert_eq!(on_disk.len() as u64, entry.size);
    }
}

#[test]
fn test_round_trip_sample() {
    assert_round_trip(&sample_addon().build());
}

#[test]
fn test_round_trip_various_sizes() {
    let builder = [0usize, 1, 255, 4096, 70_000]
        .iter()
        .fold(GmaBuilder::new("Sizes"), |b, &size| {
            b.file(&format!("data/file_{size}.bin"), &generate_test_data(size))
        });
    assert_round_trip(&builder.build());
}

#[test]
fn test_extract_file_from_disk_with_folder_selection() {
    let dir = temp_dir();
    let builder = sample_addon();
    let path = write_archive(dir.path(), "sample.gma", &builder);
    let out = dir.path().join("out");

    let archive = Archive::open(&path).unwrap();
    let selection = hierarchy::build(archive.entries())
        .find("materials")
        .unwrap()
        .file_paths();

    let mut totals = Vec::new();
    let mut sink = |text: &str| totals.push(text.to_string());
    let count = extract_file(
        &path,
        &out,
        &ExtractOptions::new().select(selection),
        &mut sink,
    )
    .unwrap();

    assert_eq!(count, 1);
    assert_eq!(totals.len(), 1);
    assert_eq!(
        fs::read(out.join("materials/sample/icon.png")).unwrap(),
        generate_test_data(3000)
    );
    assert!(!out.join("lua").exists());
}

#[test]
fn test_extract_truncated_file_fails_to_open() {
    let dir = temp_dir();
    let mut data = sample_addon().build();
    data.truncate(data.len() - 100);
    let path = dir.path().join("cut.gma");
    fs::write(&path, &data).unwrap();

    let result = extract_file(&path, dir.path().join("out"), &ExtractOptions::new(), &mut NullSink);
    assert!(matches!(result, Err(Error::Truncated { .. })));
    assert!(!dir.path().join("out").exists());
}

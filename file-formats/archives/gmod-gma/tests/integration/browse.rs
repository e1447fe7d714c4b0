//! Browsing an archive through its folder hierarchy

use crate::common::{GmaBuilder, sample_addon};
use gmod_gma::{Archive, hierarchy};
use pretty_assertions::assert_eq;

#[test]
fn test_hierarchy_from_table() {
    let data = GmaBuilder::new("Example")
        .file("lua/init.lua", &[b'-'; 10])
        .file("lua/sub/a.lua", &[b'-'; 5])
        .build();
    let archive = Archive::from_bytes(&data).unwrap();
    let root = hierarchy::build(archive.entries());

    assert_eq!(root.size, 15);
    assert_eq!(root.find("lua").unwrap().size, 15);
    assert_eq!(root.find("lua/sub").unwrap().size, 5);
}

#[test]
fn test_hierarchy_reordered_table_is_identical() {
    let archive = Archive::from_bytes(&sample_addon().build()).unwrap();
    let mut reversed = archive.entries().to_vec();
    reversed.reverse();

    let forward = hierarchy::build(archive.entries());
    let backward = hierarchy::build(&reversed);

    assert_eq!(forward, backward);
    assert_eq!(forward.size, archive.total_size());
    assert_eq!(forward.file_count(), archive.len());
}

#[test]
fn test_selected_folder_maps_to_entries() {
    let archive = Archive::from_bytes(&sample_addon().build()).unwrap();
    let root = hierarchy::build(archive.entries());

    let selection = root.find("lua").unwrap().file_paths();
    assert_eq!(
        selection,
        vec!["lua/autorun/sample_init.lua", "lua/sample/core.lua"]
    );
    for path in &selection {
        assert!(archive.find(path).is_some());
    }
}

#[test]
fn test_empty_file_is_a_leaf() {
    let archive = Archive::from_bytes(&sample_addon().build()).unwrap();
    let root = hierarchy::build(archive.entries());
    let wav = root.find("sound/sample/empty.wav").unwrap();

    assert!(wav.is_leaf());
    assert_eq!(wav.size, 0);
    assert_eq!(wav.name, "empty.wav");
}

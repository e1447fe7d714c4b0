//! Folder hierarchy built from a flat file table
//!
//! GMA archives only store full paths. For browsing, the paths are grouped
//! into a tree whose nodes carry the total size of everything beneath them.
//! Children live in a `BTreeMap`, so the tree is the same whatever order
//! the entries arrive in and traversal visits siblings by name.
//!
//! A path can name a file and a folder at once (`lua` next to `lua/a.lua`),
//! and the same path can appear more than once. Nodes therefore count the
//! entries ending at them instead of inferring files from leaves.

use crate::FileEntry;
use std::collections::BTreeMap;

/// Label of the synthetic root node
pub const ROOT_NAME: &str = "GMA File";

/// A folder or file in the archive hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyNode {
    /// Final path segment (the fixed root label for the root)
    pub name: String,
    /// Slash-joined path from the root, empty for the root
    pub path: String,
    /// Sum of the sizes of all files at or below this node
    pub size: u64,
    /// Number of table entries whose path ends at this node
    pub files: usize,
    /// Children keyed by name
    pub children: BTreeMap<String, HierarchyNode>,
}

impl HierarchyNode {
    fn new(name: &str, path: String) -> Self {
        Self {
            name: name.to_string(),
            path,
            size: 0,
            files: 0,
            children: BTreeMap::new(),
        }
    }

    /// Whether this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether at least one entry ends at this node
    pub fn is_file(&self) -> bool {
        self.files > 0
    }

    /// Whether this is the synthetic root
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Find a descendant by slash-separated path; "" is this node
    pub fn find(&self, path: &str) -> Option<&HierarchyNode> {
        segments(path).try_fold(self, |node, segment| node.children.get(segment))
    }

    /// Number of entries at or below this node, duplicates included
    pub fn file_count(&self) -> usize {
        self.walk().map(|(_, node)| node.files).sum()
    }

    /// Paths of all files at or below this node, in display order
    ///
    /// Maps a selected folder to the entry paths the extractor expects.
    /// A duplicated path is listed once.
    pub fn file_paths(&self) -> Vec<String> {
        self.walk()
            .filter(|(_, node)| node.is_file())
            .map(|(_, node)| node.path.clone())
            .collect()
    }

    /// Depth-first traversal yielding `(depth, node)`, siblings sorted by name
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }
}

/// Pre-order iterator over a hierarchy
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<(usize, &'a HierarchyNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a HierarchyNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.values().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Build the hierarchy for an archive's file table
pub fn build(entries: &[FileEntry]) -> HierarchyNode {
    build_from(entries.iter().map(|e| (e.path.as_str(), e.size)))
}

/// Build a hierarchy from `(path, size)` pairs
pub fn build_from<I, S>(files: I) -> HierarchyNode
where
    I: IntoIterator<Item = (S, u64)>,
    S: AsRef<str>,
{
    let mut root = HierarchyNode::new(ROOT_NAME, String::new());

    for (path, size) in files {
        root.size += size;

        let mut node = &mut root;
        let mut placed = false;
        for segment in segments(path.as_ref()) {
            let child_path = if node.path.is_empty() {
                segment.to_string()
            } else {
                format!("{}/{segment}", node.path)
            };
            node = node
                .children
                .entry(segment.to_string())
                .or_insert_with(|| HierarchyNode::new(segment, child_path));
            node.size += size;
            placed = true;
        }
        if placed {
            node.files += 1;
        }
    }

    root
}

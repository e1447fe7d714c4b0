//! Fixture builder for GMA archives used in tests
//!
//! Produces byte-exact archives in the layout gmad writes, with knobs for
//! producing the malformed variants the parser has to reject. The module
//! has no crate-internal imports so integration tests can include it
//! directly.

use std::path::Path;

const MAGIC: [u8; 4] = *b"GMAD";

/// Builds an in-memory GMA archive
#[derive(Debug, Clone)]
pub struct GmaBuilder {
    name: String,
    description: String,
    author_name: String,
    author_id: u64,
    timestamp: u64,
    version: u8,
    required_content: Vec<String>,
    files: Vec<(String, Vec<u8>)>,
    indices: Option<Vec<i32>>,
    record_crc: bool,
}

impl GmaBuilder {
    /// Start a version 3 archive with the given addon name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: "Description".to_string(),
            author_name: "Author Name".to_string(),
            author_id: 76561197960287930,
            timestamp: 1_500_000_000,
            version: 3,
            required_content: Vec::new(),
            files: Vec::new(),
            indices: None,
            record_crc: true,
        }
    }

    /// Set the raw description field
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Set the version byte
    pub fn version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    /// Set author id and timestamp
    pub fn author(mut self, author_id: u64, timestamp: u64) -> Self {
        self.author_id = author_id;
        self.timestamp = timestamp;
        self
    }

    /// Add a required-content entry (written only for version 2+)
    pub fn require(mut self, content: &str) -> Self {
        self.required_content.push(content.to_string());
        self
    }

    /// Append a file
    pub fn file(mut self, path: &str, data: &[u8]) -> Self {
        self.files.push((path.to_string(), data.to_vec()));
        self
    }

    /// Override the file indices written to the table
    pub fn with_indices(mut self, indices: Vec<i32>) -> Self {
        self.indices = Some(indices);
        self
    }

    /// Write zero instead of the real CRC for every entry
    pub fn without_crc(mut self) -> Self {
        self.record_crc = false;
        self
    }

    /// Serialise the archive
    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&MAGIC);
        out.push(self.version);
        out.extend_from_slice(&self.author_id.to_le_bytes());
        out.extend_from_slice(&self.timestamp.to_le_bytes());

        if self.version >= 2 {
            for content in &self.required_content {
                push_cstring(&mut out, content);
            }
            out.push(0);
        }

        push_cstring(&mut out, &self.name);
        push_cstring(&mut out, &self.description);
        push_cstring(&mut out, &self.author_name);
        out.extend_from_slice(&1i32.to_le_bytes());

        for (i, (path, data)) in self.files.iter().enumerate() {
            let index = self
                .indices
                .as_ref()
                .and_then(|indices| indices.get(i).copied())
                .unwrap_or(i as i32 + 1);
            let crc = if self.record_crc {
                crc32fast::hash(data)
            } else {
                0
            };

            out.extend_from_slice(&index.to_le_bytes());
            push_cstring(&mut out, path);
            out.extend_from_slice(&(data.len() as i64).to_le_bytes());
            out.extend_from_slice(&crc.to_le_bytes());
        }
        out.extend_from_slice(&0i32.to_le_bytes());

        for (_, data) in &self.files {
            out.extend_from_slice(data);
        }

        out
    }

    /// Serialise the archive to a file
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        std::fs::write(path, self.build())
    }
}

fn push_cstring(out: &mut Vec<u8>, value: &str) {
    out.extend_from_slice(value.as_bytes());
    out.push(0);
}

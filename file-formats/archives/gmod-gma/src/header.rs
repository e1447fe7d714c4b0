//! GMA header structures and parsing
//!
//! The header is everything between the magic marker and the file table:
//! author identity, timestamp, the optional required-content list, the
//! three addon strings and the addon version integer.

use crate::io::ReadCString;
use crate::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use serde::Deserialize;
use std::io::BufRead;
use std::sync::OnceLock;

/// GMA archive signature ('GMAD')
pub const GMA_SIGNATURE: [u8; 4] = *b"GMAD";

/// GMA format version
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormatVersion {
    /// Version 1 - no required-content list
    V1 = 1,
    /// Version 2 - adds the required-content list
    V2 = 2,
    /// Version 3 - current gmad output, same shape as version 2
    V3 = 3,
}

impl FormatVersion {
    /// Create from raw version byte
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(FormatVersion::V1),
            2 => Some(FormatVersion::V2),
            3 => Some(FormatVersion::V3),
            _ => None,
        }
    }

    /// Closest known layout for a version byte outside the known range
    pub fn nearest(raw: u8) -> Self {
        match raw {
            0 | 1 => FormatVersion::V1,
            2 => FormatVersion::V2,
            _ => FormatVersion::V3,
        }
    }

    /// Whether this layout carries a required-content list
    pub fn has_required_content(&self) -> bool {
        *self >= FormatVersion::V2
    }
}

/// Addon metadata stored in the archive header
#[derive(Debug, Clone)]
pub struct AddonMetadata {
    /// Version byte as stored in the file
    pub version: u8,
    /// Layout used to parse the header
    pub format: FormatVersion,
    /// SteamID64 of the author
    pub author_id: u64,
    /// Creation time, seconds since the Unix epoch
    pub timestamp: u64,
    /// Required content identifiers (version 2+ only)
    pub required_content: Option<Vec<String>>,
    /// Addon title
    pub name: String,
    /// Raw description text
    pub description: String,
    /// Legacy author name, usually "Author Name" or empty
    pub author_name: String,
    /// Addon version integer (unused by the game)
    pub addon_version: i32,
    description_info: OnceLock<DescriptionInfo>,
}

impl AddonMetadata {
    /// Best-effort decode of the structured payload embedded in the description
    pub fn description_info(&self) -> &DescriptionInfo {
        self.description_info
            .get_or_init(|| DescriptionInfo::parse(&self.description))
    }

    /// Description text for display: the embedded one when present, else the raw field
    pub fn display_description(&self) -> &str {
        self.description_info()
            .description
            .as_deref()
            .unwrap_or(&self.description)
    }
}

/// Fields gmad embeds in the description as a JSON object
///
/// Every field is optional; a description that is plain text decodes to
/// [`DescriptionInfo::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionInfo {
    /// Embedded secondary description
    pub description: Option<String>,
    /// Addon type tag ("gamemode", "map", "weapon", ...)
    pub addon_type: Option<String>,
    /// Free-form tags
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
struct RawDescription {
    description: Option<String>,
    #[serde(rename = "type")]
    addon_type: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

impl DescriptionInfo {
    /// Decode a description, never failing
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if !trimmed.starts_with('{') {
            return Self::default();
        }

        match serde_json::from_str::<RawDescription>(trimmed) {
            Ok(raw) => Self {
                description: raw.description,
                addon_type: raw.addon_type,
                tags: raw.tags,
            },
            Err(e) => {
                log::debug!("Description is not a structured payload: {e}");
                Self::default()
            }
        }
    }

    /// Whether nothing was decoded
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.addon_type.is_none() && self.tags.is_empty()
    }
}

/// Read the header that follows the version byte
pub(crate) fn read_header<R: BufRead>(
    reader: &mut R,
    version: u8,
    strict: bool,
) -> Result<AddonMetadata> {
    let format = match FormatVersion::from_raw(version) {
        Some(format) => format,
        None if strict => return Err(Error::UnsupportedVersion(version)),
        None => {
            let nearest = FormatVersion::nearest(version);
            log::warn!("Unknown GMA version {version}, parsing as {nearest:?}");
            nearest
        }
    };

    let author_id = reader.read_u64::<LittleEndian>()?;
    let timestamp = reader.read_u64::<LittleEndian>()?;

    let required_content = if format.has_required_content() {
        let mut list = Vec::new();
        loop {
            let entry = reader.read_cstring()?;
            if entry.is_empty() {
                break;
            }
            list.push(entry);
        }
        Some(list)
    } else {
        None
    };

    let name = reader.read_cstring()?;
    let description = reader.read_cstring()?;
    let author_name = reader.read_cstring()?;
    let addon_version = reader.read_i32::<LittleEndian>()?;

    log::debug!(
        "GMA header: version={version} name={name:?} author_id={author_id} required={}",
        required_content.as_ref().map_or(0, Vec::len)
    );

    Ok(AddonMetadata {
        version,
        format,
        author_id,
        timestamp,
        required_content,
        name,
        description,
        author_name,
        addon_version,
        description_info: OnceLock::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn header_bytes(required: &[&str]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&76561197960287930u64.to_le_bytes());
        data.extend_from_slice(&1_400_000_000u64.to_le_bytes());
        for entry in required {
            data.extend_from_slice(entry.as_bytes());
            data.push(0);
        }
        data.push(0);
        data.extend_from_slice(b"Test Addon\0Plain description\0Author Name\0");
        data.extend_from_slice(&1i32.to_le_bytes());
        data
    }

    #[test]
    fn test_format_version_values() {
        assert_eq!(FormatVersion::from_raw(3), Some(FormatVersion::V3));
        assert_eq!(FormatVersion::from_raw(4), None);
        assert_eq!(FormatVersion::nearest(0), FormatVersion::V1);
        assert_eq!(FormatVersion::nearest(9), FormatVersion::V3);
        assert!(!FormatVersion::V1.has_required_content());
        assert!(FormatVersion::V2.has_required_content());
    }

    #[test]
    fn test_read_header_v3() {
        let data = header_bytes(&["123456", "789"]);
        let meta = read_header(&mut Cursor::new(data), 3, false).unwrap();

        assert_eq!(meta.author_id, 76561197960287930);
        assert_eq!(meta.timestamp, 1_400_000_000);
        assert_eq!(
            meta.required_content,
            Some(vec!["123456".to_string(), "789".to_string()])
        );
        assert_eq!(meta.name, "Test Addon");
        assert_eq!(meta.author_name, "Author Name");
        assert_eq!(meta.addon_version, 1);
    }

    #[test]
    fn test_read_header_v1_has_no_required_list() {
        let mut data = Vec::new();
        data.extend_from_slice(&1u64.to_le_bytes());
        data.extend_from_slice(&2u64.to_le_bytes());
        data.extend_from_slice(b"Old\0Desc\0\0");
        data.extend_from_slice(&7i32.to_le_bytes());

        let meta = read_header(&mut Cursor::new(data), 1, false).unwrap();
        assert_eq!(meta.required_content, None);
        assert_eq!(meta.name, "Old");
        assert_eq!(meta.author_name, "");
        assert_eq!(meta.addon_version, 7);
    }

    #[test]
    fn test_unknown_version_lenient_and_strict() {
        let data = header_bytes(&[]);
        let meta = read_header(&mut Cursor::new(data.clone()), 4, false).unwrap();
        assert_eq!(meta.version, 4);
        assert_eq!(meta.format, FormatVersion::V3);

        match read_header(&mut Cursor::new(data), 4, true) {
            Err(Error::UnsupportedVersion(4)) => {}
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn test_description_info_structured() {
        let info = DescriptionInfo::parse(
            r#"{"description": "A fun addon", "type": "gamemode", "tags": ["fun", "roleplay"]}"#,
        );
        assert_eq!(
            info,
            DescriptionInfo {
                description: Some("A fun addon".to_string()),
                addon_type: Some("gamemode".to_string()),
                tags: vec!["fun".to_string(), "roleplay".to_string()],
            }
        );
    }

    #[test]
    fn test_description_info_degrades_gracefully() {
        assert!(DescriptionInfo::parse("Just some text").is_empty());
        assert!(DescriptionInfo::parse("{not json").is_empty());
        assert!(DescriptionInfo::parse(r#"{"tags": "wrong shape"}"#).is_empty());
        assert!(DescriptionInfo::parse("").is_empty());

        let partial = DescriptionInfo::parse(r#"{"type": "map"}"#);
        assert_eq!(partial.addon_type.as_deref(), Some("map"));
        assert_eq!(partial.description, None);
        assert!(partial.tags.is_empty());
    }

    #[test]
    fn test_display_description_prefers_embedded() {
        let mut data = Vec::new();
        data.extend_from_slice(&0u64.to_le_bytes());
        data.extend_from_slice(&0u64.to_le_bytes());
        data.push(0);
        data.extend_from_slice(b"Name\0{\"description\":\"inner\"}\0\0");
        data.extend_from_slice(&1i32.to_le_bytes());

        let meta = read_header(&mut Cursor::new(data), 3, false).unwrap();
        assert_eq!(meta.display_description(), "inner");
    }
}

//! Path utilities for GMA archives
//!
//! GMA entry paths are stored with forward slashes and are always relative
//! to the game's `garrysmod/` directory. Archives come from the internet,
//! so every path is checked before it is joined onto a destination
//! directory.

use crate::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Characters that cannot appear in a directory name on common filesystems
pub const FORBIDDEN_NAME_CHARS: &[char] = &['\\', '/', ':', '"', '*', '?', '<', '>', '|'];

/// Check that an entry path stays inside the directory it is extracted to
///
/// Rejects absolute paths, drive prefixes, and `..` segments under either
/// separator.
///
/// # Examples
///
/// ```
/// use gmod_gma::path::validate_entry_path;
///
/// assert!(validate_entry_path("lua/autorun/init.lua").is_ok());
/// assert!(validate_entry_path("../outside.lua").is_err());
/// assert!(validate_entry_path("lua\\..\\..\\outside.lua").is_err());
/// ```
pub fn validate_entry_path(path: &str) -> Result<()> {
    if path.is_empty() || path.starts_with('/') || path.starts_with('\\') {
        return Err(Error::UnsafePath(path.to_string()));
    }

    if path.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(Error::UnsafePath(path.to_string()));
    }

    let escapes = Path::new(path).components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(Error::UnsafePath(path.to_string()));
    }

    Ok(())
}

/// Destination path for an entry, after validation
pub fn entry_output_path(destination: &Path, path: &str) -> Result<PathBuf> {
    validate_entry_path(path)?;

    let mut output = destination.to_path_buf();
    for segment in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
        output.push(segment);
    }
    Ok(output)
}

/// Make an addon title usable as a directory name
///
/// Each forbidden character is replaced with its own underscore; runs are
/// not collapsed, so `a//b` becomes `a__b` and distinct titles stay
/// distinct. The result may still be empty or a dot name such as `..`;
/// use [`directory_name`] when the result is joined onto a destination.
///
/// # Examples
///
/// ```
/// use gmod_gma::path::sanitize_name;
///
/// assert_eq!(sanitize_name("a/b:c*d"), "a_b_c_d");
/// assert_eq!(sanitize_name("Wiremod"), "Wiremod");
/// ```
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if FORBIDDEN_NAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Directory name for an addon title, or `None` if nothing usable is left
///
/// The title is sanitized and trimmed. Names made only of dots and
/// whitespace, such as `.` and `..`, would resolve to the destination or
/// its parent and are rejected.
///
/// ```
/// use gmod_gma::path::directory_name;
///
/// assert_eq!(directory_name(" Wire: Extras "), Some("Wire_ Extras".to_string()));
/// assert_eq!(directory_name(".."), None);
/// assert_eq!(directory_name("   "), None);
/// ```
pub fn directory_name(title: &str) -> Option<String> {
    let sanitized = sanitize_name(title);
    let name = sanitized.trim();
    if name.chars().all(|c| c == '.' || c.is_whitespace()) {
        return None;
    }
    Some(name.to_string())
}

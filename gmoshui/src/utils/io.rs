//! I/O and path utilities

use std::path::Path;

/// Truncate a path for display, keeping the file name
pub fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let filename = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path);
    let name_len = filename.chars().count();

    if name_len + 4 > max_len {
        let keep = max_len.saturating_sub(3);
        let tail: String = filename.chars().skip(name_len.saturating_sub(keep)).collect();
        return format!("...{tail}");
    }

    // Fill the remaining space with the leading directories
    let budget = max_len - name_len - 4;
    let head: String = path.chars().take(budget).collect();
    format!("{head}.../{filename}")
}

/// Simple wildcard pattern matching, case insensitive
///
/// A pattern without `*` matches any text containing it.
pub fn matches_pattern(text: &str, pattern: &str) -> bool {
    if pattern.is_empty() || pattern == "*" {
        return true;
    }

    let pattern = pattern.to_lowercase();
    let text = text.to_lowercase();

    if !pattern.contains('*') {
        return text.contains(&pattern);
    }

    let parts: Vec<&str> = pattern.split('*').collect();
    let mut pos = 0;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            if !text.starts_with(part) {
                return false;
            }
            pos = part.len();
            continue;
        }
        match text[pos..].find(part) {
            Some(found) => pos += found + part.len(),
            None => return false,
        }
    }

    if let Some(last) = parts.last()
        && !last.is_empty()
        && !text.ends_with(last)
    {
        return false;
    }

    true
}

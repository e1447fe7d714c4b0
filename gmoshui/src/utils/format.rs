//! Formatting utilities

use chrono::{Local, TimeZone};
use humansize::{DECIMAL, format_size};

/// Format file size in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, DECIMAL)
}

/// Format a timestamp
pub fn format_timestamp(timestamp: u64) -> String {
    if timestamp == 0 {
        "N/A".to_string()
    } else {
        match Local.timestamp_opt(timestamp as i64, 0) {
            chrono::LocalResult::Single(datetime) => {
                datetime.format("%Y-%m-%d %H:%M:%S").to_string()
            }
            _ => "Invalid timestamp".to_string(),
        }
    }
}

/// Format a SteamID64 together with its profile URL
pub fn format_steam_id(id: u64) -> String {
    if id == 0 {
        "N/A".to_string()
    } else {
        format!("{id} (https://steamcommunity.com/profiles/{id})")
    }
}

/// Join a list for display, or "none"
pub fn format_list<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

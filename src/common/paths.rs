//! Path helpers for archive-relative names
//!
//! Archive entries and wizard copy ops use `/`-separated names that may carry
//! Windows separators and arbitrary casing. Matching here is ASCII
//! case-insensitive so byte offsets stay valid after folding.

use std::path::PathBuf;

/// Convert backslash separators to forward slashes
pub fn to_unix(path: &str) -> String {
    path.replace('\\', "/")
}

/// Build a safe relative path from a `/`-separated name
///
/// Empty and `.` segments are dropped. Returns `None` for names that would
/// escape their root (`..` segments, drive prefixes) or that are empty.
pub fn safe_relative(name: &str) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for segment in name.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if s.contains(':') => return None,
            s => out.push(s),
        }
    }
    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Whether archive entry `entry` is `name` itself or ends with `/name`
pub fn matches_name(entry: &str, name: &str) -> bool {
    let entry = entry.to_ascii_lowercase();
    let name = name.trim_start_matches('/').to_ascii_lowercase();
    if name.is_empty() {
        return false;
    }
    entry == name || entry.ends_with(&format!("/{name}"))
}

/// Return what follows `prefix` inside `entry`, if `prefix` starts at a segment boundary
///
/// `prefix` is treated as a directory: `textures` matches `Mod/Textures/sky.dds`
/// (remainder `sky.dds`) but not `Mod/textures2/sky.dds`.
pub fn remainder_after<'a>(entry: &'a str, prefix: &str) -> Option<&'a str> {
    let folded = entry.to_ascii_lowercase();
    let mut prefix = prefix.trim_matches('/').to_ascii_lowercase();
    if prefix.is_empty() {
        return Some(entry);
    }
    prefix.push('/');

    if folded.starts_with(&prefix) {
        return Some(&entry[prefix.len()..]);
    }
    let needle = format!("/{prefix}");
    folded
        .find(&needle)
        .map(|pos| &entry[pos + needle.len()..])
}

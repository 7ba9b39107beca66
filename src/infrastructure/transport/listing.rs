//! `LIST` response parsing
//!
//! Servers answer `LIST` with free-form lines. Two layouts cover nearly all
//! of them:
//!
//! ```text
//! drwxr-xr-x    2 ftp      ftp          4096 Jan 01 12:00 node_modules
//! 01-01-24  12:00PM       <DIR>          node_modules
//! ```

use crate::domain::ports::{EntryKind, RemoteEntry, TransportError, TransportResult};

/// Parse every non-empty line, skipping `total N` headers and `.`/`..`
pub fn parse_listing(lines: &[String]) -> TransportResult<Vec<RemoteEntry>> {
    let mut entries = Vec::new();
    for line in lines {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() || line.starts_with("total ") {
            continue;
        }
        let entry = parse_line(line)?;
        if entry.name == "." || entry.name == ".." {
            continue;
        }
        entries.push(entry);
    }
    Ok(entries)
}

/// Parse a single `LIST` line
pub fn parse_line(line: &str) -> TransportResult<RemoteEntry> {
    let first = line.chars().next().unwrap_or(' ');
    if first.is_ascii_digit() {
        parse_dos_line(line)
    } else {
        parse_unix_line(line)
    }
}

fn parse_unix_line(line: &str) -> TransportResult<RemoteEntry> {
    let malformed = || TransportError::MalformedListing(line.to_string());

    let kind = match line.chars().next() {
        Some('d') => EntryKind::Directory,
        Some('l') => EntryKind::Symlink,
        Some('-') => EntryKind::File,
        Some('p' | 's' | 'b' | 'c' | 'D') => EntryKind::Other,
        _ => return Err(malformed()),
    };

    // permissions, links, owner, group, size, month, day, time/year, name...
    let (mut fields, mut name) = split_fields(line, 8).ok_or_else(malformed)?;

    // Device nodes show `major, minor` where the size would be
    if fields[4].ends_with(',') {
        (fields, name) = split_fields(line, 9).ok_or_else(malformed)?;
        fields.remove(5);
    }

    let name = match kind {
        EntryKind::Symlink => name.split(" -> ").next().unwrap_or(name),
        _ => name,
    };

    Ok(RemoteEntry {
        name: name.to_string(),
        kind,
        size: fields[4].parse().ok(),
    })
}

fn parse_dos_line(line: &str) -> TransportResult<RemoteEntry> {
    let malformed = || TransportError::MalformedListing(line.to_string());

    // date, time, <DIR>|size, name...
    let (fields, name) = split_fields(line, 3).ok_or_else(malformed)?;

    if fields[2].eq_ignore_ascii_case("<DIR>") {
        Ok(RemoteEntry::directory(name))
    } else {
        let size = fields[2].parse().map_err(|_| malformed())?;
        Ok(RemoteEntry::file(name, size))
    }
}

/// Split off `count` whitespace-separated fields; the rest (which may
/// contain spaces) is the name
fn split_fields(line: &str, count: usize) -> Option<(Vec<&str>, &str)> {
    let mut fields = Vec::with_capacity(count);
    let mut rest = line.trim_start();
    for _ in 0..count {
        let end = rest.find(char::is_whitespace)?;
        fields.push(&rest[..end]);
        rest = rest[end..].trim_start();
    }
    if rest.is_empty() {
        return None;
    }
    Some((fields, rest))
}

use chrono::{DateTime, Local};
use std::fs::Metadata;
use std::io;
use std::path::Path;

const NEWLINE: &str = "\r\n";
const OWNER: &str = "user";
const GROUP: &str = "group";
const TIME_PATTERN: &str = "%b %e %H:%M";

/// A directory entry handed to a [`ListFormatter`].
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub metadata: Metadata,
}

/// Renders a set of entries into the bytes sent over the data channel.
pub trait ListFormatter: Send + Sync {
    fn format(&self, entries: &[FileEntry]) -> Vec<u8>;
}

/// NLST: one name per line.
#[derive(Debug, Default)]
pub struct NameListFormatter;

impl ListFormatter for NameListFormatter {
    fn format(&self, entries: &[FileEntry]) -> Vec<u8> {
        let mut buf = String::new();
        for entry in entries {
            buf.push_str(&entry.name);
            buf.push_str(NEWLINE);
        }
        buf.into_bytes()
    }
}

/// LIST: `ls -l` style lines.
#[derive(Debug, Default)]
pub struct LongListFormatter;

impl ListFormatter for LongListFormatter {
    fn format(&self, entries: &[FileEntry]) -> Vec<u8> {
        let mut buf = String::new();
        for entry in entries {
            buf.push_str(&format_long_line(entry));
            buf.push_str(NEWLINE);
        }
        buf.into_bytes()
    }
}

pub fn format_long_line(entry: &FileEntry) -> String {
    let modified = entry
        .metadata
        .modified()
        .map(|t| DateTime::<Local>::from(t).format(TIME_PATTERN).to_string())
        .unwrap_or_else(|_| "Jan  1 00:00".to_string());

    format!(
        "{}   {:>3} {} {} {:>12} {} {}",
        mode_string(&entry.metadata),
        link_count(&entry.metadata),
        OWNER,
        GROUP,
        entry.metadata.len(),
        modified,
        entry.name
    )
}

#[cfg(unix)]
fn mode_string(metadata: &Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;

    let mode = metadata.permissions().mode();
    let file_type = metadata.file_type();
    let kind = if file_type.is_dir() {
        'd'
    } else if file_type.is_symlink() {
        'l'
    } else {
        '-'
    };

    let mut out = String::with_capacity(10);
    out.push(kind);
    for shift in [6u32, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

#[cfg(not(unix))]
fn mode_string(metadata: &Metadata) -> String {
    let kind = if metadata.is_dir() { "d" } else { "-" };
    let write = if metadata.permissions().readonly() { "-" } else { "w" };
    format!("{kind}r{write}-r{write}-r{write}-")
}

#[cfg(unix)]
fn link_count(metadata: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.nlink()
}

#[cfg(not(unix))]
fn link_count(_metadata: &Metadata) -> u64 {
    1
}

/// Lists `path` with `formatter`.
///
/// A plain file yields a single entry; a directory yields its children sorted
/// by name.
pub async fn get_file_list(path: &Path, formatter: &dyn ListFormatter) -> io::Result<Vec<u8>> {
    let metadata = tokio::fs::metadata(path).await?;

    if !metadata.is_dir() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        return Ok(formatter.format(&[FileEntry { name, metadata }]));
    }

    let mut entries = Vec::new();
    let mut dir = tokio::fs::read_dir(path).await?;
    while let Some(child) = dir.next_entry().await? {
        let metadata = match child.metadata().await {
            Ok(metadata) => metadata,
            Err(_) => continue, // vanished between readdir and stat
        };
        entries.push(FileEntry {
            name: child.file_name().to_string_lossy().to_string(),
            metadata,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(formatter.format(&entries))
}

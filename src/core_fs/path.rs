//! Virtual path resolution.
//!
//! Clients only ever see a `/`-rooted virtual namespace. Every path is cleaned
//! lexically before it is joined onto the user's home directory, so `..` can
//! never climb above the virtual root.

use std::path::{Path, PathBuf};

/// A client path resolved against the session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Real filesystem path inside the home directory.
    pub real: PathBuf,
    /// Normalized virtual path, always `/`-separated.
    pub virtual_path: String,
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Cleans a virtual path into its canonical absolute form.
///
/// `.` segments and repeated separators are dropped, `..` pops one segment and
/// stops at the root. Backslashes are accepted as separators and always
/// rendered as `/`.
pub fn clean_virtual_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(is_separator) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Resolves `arg` against `current_dir` and returns the cleaned virtual path.
pub fn resolve_virtual_path(current_dir: &str, arg: &str) -> String {
    if arg.is_empty() {
        return current_dir.to_string();
    }
    if arg.starts_with('/') {
        clean_virtual_path(arg)
    } else {
        clean_virtual_path(&format!("{}/{}", current_dir, arg))
    }
}

/// Maps a virtual path onto the real filesystem below `home_dir`.
pub fn to_real_path(home_dir: &Path, virtual_path: &str) -> PathBuf {
    let cleaned = clean_virtual_path(virtual_path);
    let mut real = home_dir.to_path_buf();
    for segment in cleaned.split('/').filter(|s| !s.is_empty()) {
        real.push(segment);
    }
    real
}

pub fn resolve(home_dir: &Path, current_dir: &str, arg: &str) -> ResolvedPath {
    let virtual_path = resolve_virtual_path(current_dir, arg);
    ResolvedPath {
        real: to_real_path(home_dir, &virtual_path),
        virtual_path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_virtual_path() {
        assert_eq!(clean_virtual_path("/"), "/");
        assert_eq!(clean_virtual_path(""), "/");
        assert_eq!(clean_virtual_path("/a/./b//c/"), "/a/b/c");
        assert_eq!(clean_virtual_path("/a/b/../c"), "/a/c");
        assert_eq!(clean_virtual_path("/../../x"), "/x");
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        assert_eq!(resolve_virtual_path("/pub", ""), "/pub");
        assert_eq!(resolve_virtual_path("/pub", "docs"), "/pub/docs");
        assert_eq!(resolve_virtual_path("/pub", ".."), "/");
        assert_eq!(resolve_virtual_path("/pub", "/etc"), "/etc");
        assert_eq!(resolve_virtual_path("/pub/a", "../b/./c"), "/pub/b/c");
    }

    #[test]
    fn test_separator_normalization() {
        assert_eq!(resolve_virtual_path("/", "a\\b\\c"), "/a/b/c");
        assert_eq!(resolve_virtual_path("/x", "..\\y"), "/y");
        assert!(!resolve_virtual_path("/", "dir\\sub").contains('\\'));
    }

    #[test]
    fn test_real_path_stays_in_home() {
        let home = Path::new("/srv/ftp/alice");
        let attempts = [
            "..",
            "../..",
            "/../../etc/passwd",
            "a/../../../../b",
            "..\\..\\windows",
            "./../.././..",
            "x/y/z/../../../../../../..",
        ];
        for current in ["/", "/deep/nested/dir"] {
            for attempt in attempts {
                let resolved = resolve(home, current, attempt);
                assert!(
                    resolved.real.starts_with(home),
                    "{} from {} escaped to {:?}",
                    attempt,
                    current,
                    resolved.real
                );
                assert!(resolved.virtual_path.starts_with('/'));
                assert!(!resolved.virtual_path.contains(".."));
            }
        }
    }

    #[test]
    fn test_to_real_path() {
        let home = Path::new("/home/bob");
        assert_eq!(to_real_path(home, "/"), PathBuf::from("/home/bob"));
        assert_eq!(
            to_real_path(home, "/music/a.mp3"),
            PathBuf::from("/home/bob/music/a.mp3")
        );
    }
}

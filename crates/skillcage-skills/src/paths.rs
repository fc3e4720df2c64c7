//! Lexical path handling for skill confinement
//!
//! Nothing here touches the filesystem: `.` and `..` are resolved on the path
//! text alone so a symlink inside a bundle cannot change the outcome of the
//! confinement check.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` segments without consulting the filesystem.
///
/// `..` at the root stays at the root, as the OS does.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(segment) => out.push(segment),
        }
    }
    out
}

/// Make `path` absolute against the current directory and normalize it.
///
/// # Errors
/// Fails only when the current directory cannot be determined.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(normalize(&absolute))
}

/// Expand a leading `~` to the home directory
#[must_use]
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Join `relative` onto `root` and return the normalized result if it is
/// `root` itself or a descendant of it.
///
/// `root` must already be absolute and normalized.
#[must_use]
pub fn resolve_within(root: &Path, relative: &Path) -> Option<PathBuf> {
    let candidate = normalize(&root.join(relative));
    candidate.starts_with(root).then_some(candidate)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_dots() {
        assert_eq!(
            normalize(Path::new("/skills/foo/assets/./template.html")),
            PathBuf::from("/skills/foo/assets/template.html")
        );
        assert_eq!(
            normalize(Path::new("/skills/foo/../bar/x")),
            PathBuf::from("/skills/bar/x")
        );
        assert_eq!(normalize(Path::new("/../../etc")), PathBuf::from("/etc"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn test_resolve_within_accepts_descendants() {
        let root = Path::new("/skills/foo");
        assert_eq!(
            resolve_within(root, Path::new("assets/./template.html")),
            Some(PathBuf::from("/skills/foo/assets/template.html"))
        );
        assert_eq!(
            resolve_within(root, Path::new("scripts/../SKILL.md")),
            Some(PathBuf::from("/skills/foo/SKILL.md"))
        );
        assert_eq!(
            resolve_within(root, Path::new(".")),
            Some(PathBuf::from("/skills/foo"))
        );
    }

    #[test]
    fn test_resolve_within_rejects_escapes() {
        let root = Path::new("/skills/foo");
        assert_eq!(resolve_within(root, Path::new("../bar/secret.txt")), None);
        assert_eq!(resolve_within(root, Path::new("a/../../foo2/x")), None);
        assert_eq!(resolve_within(root, Path::new("/etc/passwd")), None);
        // sibling sharing a name prefix is not a descendant
        assert_eq!(resolve_within(root, Path::new("../foobar/x")), None);
    }

    #[test]
    fn test_absolute_inside_root_is_allowed() {
        let root = Path::new("/skills/foo");
        assert_eq!(
            resolve_within(root, Path::new("/skills/foo/notes.md")),
            Some(PathBuf::from("/skills/foo/notes.md"))
        );
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_home("relative"), PathBuf::from("relative"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/skills"), home.join("skills"));
            assert_eq!(expand_home("~"), home);
        }
    }

    #[test]
    fn test_absolutize_relative() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(absolutize(Path::new("x/./y")).unwrap(), cwd.join("x").join("y"));
    }
}

//! Utility functions for path handling.

use std::{
    env, io,
    path::{Path, PathBuf},
};

/// Resolves `path` against the current working directory.
///
/// # Errors
///
/// Returns an error if the working directory cannot be read (e.g. it was
/// deleted).
pub fn resolve_from_cwd(path: &str) -> Result<PathBuf, io::Error> {
    Ok(join_path(&env::current_dir()?, path))
}

/// Joins `path` onto `base`, unless `path` is already absolute.
///
/// # Examples
///
/// ```
/// # use herald::utils::join_path;
/// # use std::path::{Path, PathBuf};
/// assert_eq!(join_path(Path::new("/srv/bot"), "commands"), PathBuf::from("/srv/bot/commands"));
/// assert_eq!(join_path(Path::new("/srv/bot"), "/etc/commands"), PathBuf::from("/etc/commands"));
/// ```
pub fn join_path(base: &Path, path: &str) -> PathBuf {
    base.join(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path_relative() {
        let path = join_path(Path::new("/home/bot"), "commands");
        #[cfg(unix)]
        assert_eq!(path, PathBuf::from("/home/bot/commands"));
        #[cfg(windows)]
        assert_eq!(path, PathBuf::from("\\home\\bot\\commands"));
    }

    #[test]
    fn test_join_path_nested() {
        let path = join_path(Path::new("/home/bot"), "src/commands");
        #[cfg(unix)]
        assert_eq!(path, PathBuf::from("/home/bot/src/commands"));
    }

    #[test]
    fn test_join_path_current_dir() {
        let path = join_path(Path::new("/home/bot"), ".");
        #[cfg(unix)]
        assert_eq!(path, PathBuf::from("/home/bot/."));
    }

    #[cfg(unix)]
    #[test]
    fn test_join_path_absolute_is_kept() {
        let path = join_path(Path::new("/home/bot"), "/etc/herald/commands");
        assert_eq!(path, PathBuf::from("/etc/herald/commands"));
    }

    #[test]
    fn test_resolve_from_cwd() {
        let path = resolve_from_cwd("commands").unwrap();

        assert!(path.is_absolute());
        assert!(path.ends_with("commands"));
    }
}

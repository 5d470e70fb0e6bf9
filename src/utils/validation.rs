//! Centralized validation and helper functions.

use itertools::Itertools;
use std::hash::Hash;
use std::path::Path;

/// What is at a path, as far as a reader cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathState {
    /// Nothing exists at the path
    Missing,
    /// Something exists but it is not a regular file (e.g. a directory)
    NotAFile,
    /// A regular file (or a symlink to one)
    File,
}

/// Inspect a path without opening it.
#[must_use]
pub fn path_state(path: &Path) -> PathState {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => PathState::File,
        Ok(_) => PathState::NotAFile,
        Err(_) => PathState::Missing,
    }
}

/// True if the path names an existing regular file.
#[must_use]
pub fn is_existing_file(path: &Path) -> bool {
    path_state(path) == PathState::File
}

/// Lowercased file extension, if any.
#[must_use]
pub fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

/// Values that occur more than once, each reported once, in the order their
/// second occurrence is seen.
///
/// # Examples
///
/// ```
/// use mplx_qc::utils::validation::find_duplicates;
///
/// assert_eq!(find_duplicates(&["A", "B", "A", "A"]), vec!["A"]);
/// assert!(find_duplicates(&["A", "B"]).is_empty());
/// ```
#[must_use]
pub fn find_duplicates<T>(values: &[T]) -> Vec<T>
where
    T: Clone + Eq + Hash,
{
    values.iter().duplicates().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_state() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.tsv");
        std::fs::write(&file, "x").unwrap();

        assert_eq!(path_state(&file), PathState::File);
        assert_eq!(path_state(dir.path()), PathState::NotAFile);
        assert_eq!(path_state(&dir.path().join("nope")), PathState::Missing);
        assert!(is_existing_file(&file));
        assert!(!is_existing_file(dir.path()));
    }

    #[test]
    fn test_lowercase_extension() {
        assert_eq!(lowercase_extension(Path::new("a.XLSX")), Some("xlsx".to_string()));
        assert_eq!(lowercase_extension(Path::new("a.tsv")), Some("tsv".to_string()));
        assert_eq!(lowercase_extension(Path::new("noext")), None);
    }

    #[test]
    fn test_find_duplicates() {
        let values = vec!["A".to_string(), "B".to_string(), "A".to_string()];
        assert_eq!(find_duplicates(&values), vec!["A".to_string()]);

        let triple = ["C", "C", "C", "D", "D"];
        assert_eq!(find_duplicates(&triple), vec!["C", "D"]);

        let empty: [&str; 0] = [];
        assert!(find_duplicates(&empty).is_empty());
    }
}

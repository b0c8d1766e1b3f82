//! Lazy folder enumeration.
//!
//! Walks a root folder (optionally recursive), yielding a [`FileDescriptor`]
//! for every file whose name matches the include wildcard. The walk is a
//! single forward pass in filesystem order; callers must not assume sorted
//! output. Symlinks are followed, and every entry is resolved and checked to
//! still live under the root — a file escaping the root aborts the run.

use chrono::{DateTime, Utc};
use globset::{Glob, GlobMatcher};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// One enumerated file. Immutable, scoped to a single walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Absolute path as enumerated (symlinks not resolved).
    pub absolute_path: PathBuf,
    /// Path relative to the walk root, as enumerated.
    pub relative_path: String,
    /// File size in bytes.
    pub size: u64,
    /// Last modification time (UTC).
    pub modified: DateTime<Utc>,
}

/// Enumeration failure. The run treats every variant as fatal.
#[derive(Debug)]
pub enum WalkError {
    /// The root folder does not exist (or is not a folder).
    RootNotFound(PathBuf),
    /// An entry resolved to a path outside the root folder.
    ScopeEscape(PathBuf),
    /// The include wildcard does not compile.
    Pattern(globset::Error),
    Io(std::io::Error),
    Walk(walkdir::Error),
}

impl std::fmt::Display for WalkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalkError::RootNotFound(path) => {
                write!(f, "source folder does not exist: {}", path.display())
            }
            WalkError::ScopeEscape(path) => write!(
                f,
                "file resolves outside the source folder: {}",
                path.display()
            ),
            WalkError::Pattern(e) => write!(f, "invalid include pattern: {}", e),
            WalkError::Io(e) => write!(f, "I/O error while walking: {}", e),
            WalkError::Walk(e) => write!(f, "walk failed: {}", e),
        }
    }
}

impl std::error::Error for WalkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WalkError::Pattern(e) => Some(e),
            WalkError::Io(e) => Some(e),
            WalkError::Walk(e) => Some(e),
            _ => None,
        }
    }
}

/// Lazy iterator over the files of one folder.
#[derive(Debug)]
pub struct FileWalker {
    root: PathBuf,
    matcher: GlobMatcher,
    it: walkdir::IntoIter,
}

impl FileWalker {
    /// Prepares a walk of `root`. `include` is a wildcard matched against
    /// file names (`*`, `*.md`, `report-?.txt`); `recursive` controls whether
    /// sub-folders are visited.
    pub fn new(root: &Path, include: &str, recursive: bool) -> Result<Self, WalkError> {
        if !root.is_dir() {
            return Err(WalkError::RootNotFound(root.to_path_buf()));
        }
        let root = root.canonicalize().map_err(WalkError::Io)?;
        let matcher = Glob::new(include)
            .map_err(WalkError::Pattern)?
            .compile_matcher();

        let mut walker = WalkDir::new(&root).follow_links(true);
        if !recursive {
            walker = walker.max_depth(1);
        }

        Ok(Self {
            root,
            matcher,
            it: walker.into_iter(),
        })
    }

    /// The canonicalized walk root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn describe(&self, entry: &DirEntry) -> Result<FileDescriptor, WalkError> {
        // Resolve symlinks, then require the target to still sit under the
        // root. Checked per entry, never assumed. Identity stays with the
        // enumerated path; resolution is only for the scope check.
        let resolved = entry.path().canonicalize().map_err(WalkError::Io)?;
        if !resolved.starts_with(&self.root) {
            return Err(WalkError::ScopeEscape(entry.path().to_path_buf()));
        }

        let metadata = entry.metadata().map_err(WalkError::Walk)?;
        let modified: DateTime<Utc> = metadata.modified().map_err(WalkError::Io)?.into();

        let relative_path = entry
            .path()
            .strip_prefix(&self.root)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .to_string();

        Ok(FileDescriptor {
            absolute_path: entry.path().to_path_buf(),
            relative_path,
            size: metadata.len(),
            modified,
        })
    }
}

impl Iterator for FileWalker {
    type Item = Result<FileDescriptor, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.it.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(WalkError::Walk(e))),
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if !self.matcher.is_match(entry.file_name()) {
                continue;
            }
            return Some(self.describe(&entry));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn collect(walker: FileWalker) -> Vec<FileDescriptor> {
        walker.map(|d| d.unwrap()).collect()
    }

    #[test]
    fn missing_root_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        let err = FileWalker::new(&missing, "*", true).unwrap_err();
        assert!(matches!(err, WalkError::RootNotFound(_)));
    }

    #[test]
    fn file_as_root_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("plain.txt");
        fs::write(&file, "x").unwrap();
        let err = FileWalker::new(&file, "*", true).unwrap_err();
        assert!(matches!(err, WalkError::RootNotFound(_)));
    }

    #[test]
    fn bad_pattern_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let err = FileWalker::new(tmp.path(), "a{", true).unwrap_err();
        assert!(matches!(err, WalkError::Pattern(_)));
    }

    #[test]
    fn empty_folder_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        let walker = FileWalker::new(tmp.path(), "*", true).unwrap();
        assert!(collect(walker).is_empty());
    }

    #[test]
    fn include_pattern_filters_by_name() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "a").unwrap();
        fs::write(tmp.path().join("b.txt"), "b").unwrap();
        fs::write(tmp.path().join("c.md"), "c").unwrap();

        let walker = FileWalker::new(tmp.path(), "*.md", true).unwrap();
        let mut names: Vec<String> = collect(walker)
            .into_iter()
            .map(|d| d.relative_path)
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.md", "c.md"]);
    }

    #[test]
    fn non_recursive_skips_sub_folders() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("top.txt"), "t").unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub").join("nested.txt"), "n").unwrap();

        let walker = FileWalker::new(tmp.path(), "*", false).unwrap();
        let descriptors = collect(walker);
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].relative_path, "top.txt");
    }

    #[test]
    fn recursive_reaches_sub_folders_with_relative_paths() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("top.txt"), "t").unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub").join("nested.txt"), "n").unwrap();

        let walker = FileWalker::new(tmp.path(), "*", true).unwrap();
        let mut paths: Vec<String> = collect(walker)
            .into_iter()
            .map(|d| d.relative_path)
            .collect();
        paths.sort();
        let nested = Path::new("sub").join("nested.txt");
        assert_eq!(paths, vec![nested.to_string_lossy().to_string(), "top.txt".to_string()]);
    }

    #[test]
    fn descriptor_carries_size_and_absolute_path() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("sized.txt"), "12345").unwrap();

        let walker = FileWalker::new(tmp.path(), "*", true).unwrap();
        let descriptors = collect(walker);
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].size, 5);
        assert!(descriptors[0].absolute_path.is_absolute());
        assert!(descriptors[0].absolute_path.ends_with("sized.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_escaping_root_is_rejected() {
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("secret.txt"), "s").unwrap();

        let root = TempDir::new().unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("secret.txt"),
            root.path().join("link.txt"),
        )
        .unwrap();

        let mut walker = FileWalker::new(root.path(), "*", true).unwrap();
        let err = walker.next().unwrap().unwrap_err();
        assert!(matches!(err, WalkError::ScopeEscape(_)));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_inside_root_is_accepted() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("real.txt"), "r").unwrap();
        std::os::unix::fs::symlink(
            root.path().join("real.txt"),
            root.path().join("alias.txt"),
        )
        .unwrap();

        let walker = FileWalker::new(root.path(), "*", true).unwrap();
        let descriptors = collect(walker);
        // Both names enumerate; both resolve inside the root.
        assert_eq!(descriptors.len(), 2);
    }
}

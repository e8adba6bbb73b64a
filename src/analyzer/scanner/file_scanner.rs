use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::AnalysisConfig;
use crate::constants::scanner::DEFAULT_MAX_FILE_SIZE;
use crate::types::{Result, ScopeError};

pub struct FileScanner {
    root: PathBuf,
    exclude: Vec<glob::Pattern>,
    max_file_size: u64,
    include_hidden: bool,
    respect_gitignore: bool,
}

impl FileScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            exclude: vec![],
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            include_hidden: false,
            respect_gitignore: true,
        }
    }

    /// Scanner configured from the analysis settings; invalid globs are dropped
    pub fn from_config<P: AsRef<Path>>(root: P, config: &AnalysisConfig) -> Self {
        Self::new(root)
            .with_exclude(&config.exclude)
            .with_max_file_size(config.max_file_size)
            .include_hidden(config.include_hidden)
            .respect_gitignore(config.respect_gitignore)
    }

    pub fn with_exclude(mut self, patterns: &[String]) -> Self {
        self.exclude = patterns
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    debug!(pattern = %p, error = %e, "Ignoring invalid exclude pattern");
                    None
                }
            })
            .collect();
        self
    }

    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Walk the root. Regular files and symlinks are listed; a symlink whose
    /// target is missing is kept so that reading it later reports the failure.
    pub fn scan(&self) -> Result<ScanResult> {
        if !self.root.exists() {
            return Err(ScopeError::NotFound(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(ScopeError::NotADirectory(self.root.clone()));
        }

        let walker = WalkBuilder::new(&self.root)
            .hidden(!self.include_hidden)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .follow_links(false) // Security: prevent symlink traversal attacks
            .build();

        let mut result = ScanResult::default();
        for entry in walker.filter_map(|e| e.ok()) {
            let Some(file_type) = entry.file_type() else {
                continue;
            };
            if !(file_type.is_file() || file_type.is_symlink()) {
                continue;
            }

            let path = entry.path();
            if self.should_exclude(path) {
                continue;
            }

            // Follows the link; dangling links have no size and are not skipped
            let size = path.metadata().map(|m| m.len()).ok();
            if let Some(size) = size
                && size > self.max_file_size
            {
                debug!(path = %path.display(), size, "Skipping oversized file");
                result.skipped.push(path.to_path_buf());
                continue;
            }

            result.files.push(ScannedFile {
                path: path.to_path_buf(),
                size: size.unwrap_or(0),
            });
        }

        result.files.sort_by(|a, b| a.path.cmp(&b.path));
        result.skipped.sort();
        Ok(result)
    }

    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.exclude
            .iter()
            .any(|pattern| pattern.matches_path(path) || pattern.matches_path(relative))
    }
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub files: Vec<ScannedFile>,
    /// Files over the size limit
    pub skipped: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(result: &ScanResult) -> Vec<String> {
        result
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_scan_lists_sorted_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/a.py"), "a").unwrap();

        let result = FileScanner::new(dir.path()).scan().unwrap();
        assert_eq!(result.files.len(), 2);
        assert!(result.files[0].path < result.files[1].path);
    }

    #[test]
    fn test_hidden_files_are_opt_in() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".env"), "A=1").unwrap();
        fs::write(dir.path().join("visible.md"), "# hi").unwrap();

        let default = FileScanner::new(dir.path()).scan().unwrap();
        assert_eq!(names(&default), vec!["visible.md"]);

        let all = FileScanner::new(dir.path()).include_hidden(true).scan().unwrap();
        assert_eq!(all.files.len(), 2);
    }

    #[test]
    fn test_gitignore_and_exclude() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), "ignored.log\n").unwrap();
        fs::write(dir.path().join("ignored.log"), "x").unwrap();
        fs::create_dir(dir.path().join("build")).unwrap();
        fs::write(dir.path().join("build/out.js"), "x").unwrap();
        fs::write(dir.path().join("keep.rs"), "fn main() {}").unwrap();

        let result = FileScanner::new(dir.path())
            .with_exclude(&["build/**".to_string()])
            .scan()
            .unwrap();
        assert_eq!(names(&result), vec!["keep.rs"]);

        let unfiltered = FileScanner::new(dir.path())
            .respect_gitignore(false)
            .scan()
            .unwrap();
        assert!(names(&unfiltered).contains(&"ignored.log".to_string()));
    }

    #[test]
    fn test_oversized_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("big.txt"), "0123456789").unwrap();
        fs::write(dir.path().join("small.txt"), "01").unwrap();

        let result = FileScanner::new(dir.path())
            .with_max_file_size(5)
            .scan()
            .unwrap();
        assert_eq!(names(&result), vec!["small.txt"]);
        assert_eq!(result.skipped.len(), 1);
    }

    #[test]
    fn test_missing_root_and_file_root() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            FileScanner::new(&missing).scan(),
            Err(ScopeError::NotFound(_))
        ));

        let file = dir.path().join("f.txt");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            FileScanner::new(&file).scan(),
            Err(ScopeError::NotADirectory(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_listed() {
        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("link.txt")).unwrap();

        let result = FileScanner::new(dir.path()).scan().unwrap();
        assert_eq!(names(&result), vec!["link.txt"]);
        assert_eq!(result.files[0].size, 0);
    }
}

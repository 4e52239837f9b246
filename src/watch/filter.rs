// src/watch/filter.rs

use std::fmt;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::errors::Result;

/// Compiled `[watch].exclude` patterns.
///
/// Patterns are matched against the path relative to the watch root (with
/// forward slashes), so `"*.tmp"` and `"**/.~lock*"` behave as expected.
/// Paths outside the root are matched as-is.
#[derive(Clone)]
pub struct ExcludeFilter {
    root: PathBuf,
    patterns: Vec<String>,
    set: GlobSet,
}

impl fmt::Debug for ExcludeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExcludeFilter")
            .field("root", &self.root)
            .field("patterns", &self.patterns)
            .finish()
    }
}

impl ExcludeFilter {
    pub fn new(root: impl Into<PathBuf>, patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern)?);
        }
        Ok(Self {
            root: root.into(),
            patterns: patterns.to_vec(),
            set: builder.build()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.is_empty() {
            return false;
        }
        match path.strip_prefix(&self.root) {
            Ok(rel) => self.set.is_match(rel.to_string_lossy().replace('\\', "/")),
            Err(_) => self.set.is_match(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(patterns: &[&str]) -> ExcludeFilter {
        let patterns: Vec<String> = patterns.iter().map(|s| s.to_string()).collect();
        ExcludeFilter::new("/srv/share", &patterns).unwrap()
    }

    #[test]
    fn matches_relative_to_root() {
        let f = filter(&["*.tmp", "**/.~lock*"]);
        assert!(f.is_excluded(Path::new("/srv/share/a.tmp")));
        assert!(f.is_excluded(Path::new("/srv/share/docs/.~lock.report.odt#")));
        assert!(!f.is_excluded(Path::new("/srv/share/report.odt")));
    }

    #[test]
    fn empty_filter_excludes_nothing() {
        let f = filter(&[]);
        assert!(!f.is_excluded(Path::new("/srv/share/a.tmp")));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(ExcludeFilter::new("/srv/share", &["a[".to_string()]).is_err());
    }
}

//! File selection for hooks
//!
//! `files` / `exclude` are regular expressions searched anywhere in the
//! repository-relative path (not anchored), matching how the external
//! runner treats them. Type filters work on the tag sets from
//! [`super::tags`].

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::BTreeSet;

/// Include/exclude regex pair
#[derive(Debug, Clone)]
pub struct FileFilter {
    include: Option<Regex>,
    exclude: Option<Regex>,
}

impl FileFilter {
    /// An absent or empty pattern imposes no restriction
    pub fn new(files: Option<&str>, exclude: Option<&str>) -> Result<Self> {
        Ok(Self {
            include: compile("files", files)?,
            exclude: compile("exclude", exclude)?,
        })
    }

    pub fn allow_all() -> Self {
        Self {
            include: None,
            exclude: None,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        let path = normalize(path);
        let included = self.include.as_ref().is_none_or(|re| re.is_match(&path));
        let excluded = self.exclude.as_ref().is_some_and(|re| re.is_match(&path));
        included && !excluded
    }

    /// Keep the paths that pass the filter, preserving order
    pub fn filter<'a, S: AsRef<str>>(&self, paths: &'a [S]) -> Vec<&'a str> {
        paths
            .iter()
            .map(AsRef::as_ref)
            .filter(|path| self.matches(path))
            .collect()
    }
}

fn compile(field: &str, pattern: Option<&str>) -> Result<Option<Regex>> {
    match pattern {
        None | Some("") => Ok(None),
        Some(pattern) => Regex::new(pattern).map(Some).map_err(|source| Error::Regex {
            field: field.to_string(),
            source,
        }),
    }
}

fn normalize(path: &str) -> std::borrow::Cow<'_, str> {
    if path.contains('\\') {
        path.replace('\\', "/").into()
    } else {
        path.into()
    }
}

/// `types` (all of), `types_or` (any of) and `exclude_types` (none of)
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    all: Vec<String>,
    any: Vec<String>,
    none: Vec<String>,
}

impl TagFilter {
    pub fn new(types: &[String], types_or: &[String], exclude_types: &[String]) -> Self {
        Self {
            all: types.to_vec(),
            any: types_or.to_vec(),
            none: exclude_types.to_vec(),
        }
    }

    /// Hooks without type restrictions see every file
    pub fn is_unrestricted(&self) -> bool {
        self.all.is_empty() && self.any.is_empty() && self.none.is_empty()
    }

    pub fn matches(&self, tags: &BTreeSet<&'static str>) -> bool {
        self.all.iter().all(|t| tags.contains(t.as_str()))
            && (self.any.is_empty() || self.any.iter().any(|t| tags.contains(t.as_str())))
            && !self.none.iter().any(|t| tags.contains(t.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&'static str]) -> BTreeSet<&'static str> {
        list.iter().copied().collect()
    }

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_files_regex_is_searched_not_anchored() {
        let filter = FileFilter::new(Some(r"\.pyx$"), None).unwrap();
        assert!(filter.matches("cupy/_core/core.pyx"));
        assert!(!filter.matches("cupy/_core/core.pxd"));

        let filter = FileFilter::new(Some("_core"), None).unwrap();
        assert!(filter.matches("cupy/_core/core.pyx"));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let filter = FileFilter::new(Some(r"\.py$"), Some("^third_party/")).unwrap();
        assert!(filter.matches("cupy/__init__.py"));
        assert!(!filter.matches("third_party/jitify/setup.py"));
    }

    #[test]
    fn test_empty_patterns_allow_everything() {
        let filter = FileFilter::new(Some(""), Some("")).unwrap();
        assert!(filter.matches("anything/at/all.txt"));
        assert!(FileFilter::allow_all().matches("README.md"));
    }

    #[test]
    fn test_windows_separators_are_normalized() {
        let filter = FileFilter::new(Some("^docs/"), None).unwrap();
        assert!(filter.matches(r"docs\source\index.rst"));
    }

    #[test]
    fn test_filter_preserves_order() {
        let filter = FileFilter::new(Some(r"\.py$"), None).unwrap();
        let paths = strings(&["b.py", "a.txt", "a.py"]);
        assert_eq!(filter.filter(&paths), vec!["b.py", "a.py"]);
    }

    #[test]
    fn test_invalid_pattern_names_field() {
        let err = FileFilter::new(None, Some("(")).unwrap_err();
        assert!(matches!(err, Error::Regex { ref field, .. } if field == "exclude"));
    }

    #[test]
    fn test_tag_filter_semantics() {
        let python = tags(&["file", "text", "python"]);
        let cython = tags(&["file", "text", "cython"]);
        let png = tags(&["file", "binary", "image", "png"]);

        let all = TagFilter::new(&strings(&["file", "python"]), &[], &[]);
        assert!(all.matches(&python));
        assert!(!all.matches(&cython));

        let any = TagFilter::new(&[], &strings(&["python", "cython"]), &[]);
        assert!(any.matches(&python));
        assert!(any.matches(&cython));
        assert!(!any.matches(&png));

        let none = TagFilter::new(&[], &[], &strings(&["binary"]));
        assert!(none.matches(&python));
        assert!(!none.matches(&png));

        assert!(TagFilter::default().is_unrestricted());
        assert!(TagFilter::default().matches(&png));
    }
}

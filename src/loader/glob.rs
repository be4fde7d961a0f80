//! Lazy expansion of wildcard resources into matching filesystem entries.
//!
//! A pattern is split into a literal prefix, located through the
//! [`FileLocator`], and a wildcard suffix that is matched below it. Brace
//! alternatives (`{a,b}`) are expanded up front; `*`, `?`, `[...]` and `**`
//! are handled by the `glob` crate and matched directories are descended with
//! an `ignore` walker when recursion is requested.

use std::collections::HashSet;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob::{MatchOptions, Paths, Pattern};
use ignore::{Walk, WalkBuilder};
use tracing::{debug, trace};

use super::locator::FileLocator;
use crate::error::{LoadError, Result};

/// Characters that turn a resource name into a glob pattern.
pub const WILDCARDS: &[char] = &['*', '?', '{', '['];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Returns `true` when `resource` contains any wildcard character.
#[must_use]
pub fn is_glob(resource: &str) -> bool {
    resource.contains(WILDCARDS)
}

/// Returns `true` when the literal part of `pattern` names a directory.
///
/// Such patterns never fall back to a literal import when nothing matches.
#[must_use]
pub fn has_directory_prefix(pattern: &str) -> bool {
    match pattern.find(WILDCARDS) {
        Some(0) => false,
        Some(index) => pattern[..index].contains('/'),
        None => pattern.contains('/'),
    }
}

/// Split `pattern` into the directory to locate and the suffix to match below it.
pub(crate) fn split_pattern(pattern: &str) -> (String, String) {
    let Some(index) = pattern.find(WILDCARDS) else {
        return (pattern.to_string(), String::new());
    };

    let literal = &pattern[..index];
    let Some(cut) = literal.rfind('/') else {
        return (".".to_string(), format!("/{pattern}"));
    };

    let prefix = pattern[..cut].trim_end_matches('/');
    let prefix = if prefix.is_empty() { "/" } else { prefix };
    (prefix.to_string(), pattern[prefix.len()..].to_string())
}

/// Expand `{a,b}` alternatives into separate patterns, in declaration order.
pub(crate) fn expand_braces(pattern: &str) -> Vec<String> {
    let Some((open, close)) = find_brace_group(pattern) else {
        return vec![pattern.to_string()];
    };

    let head = &pattern[..open];
    let tail = &pattern[close + 1..];
    split_alternatives(&pattern[open + 1..close])
        .into_iter()
        .flat_map(|alternative| expand_braces(&format!("{head}{alternative}{tail}")))
        .collect()
}

fn find_brace_group(pattern: &str) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut open = None;
    for (index, ch) in pattern.char_indices() {
        match ch {
            '{' => {
                if depth == 0 {
                    open = Some(index);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return open.map(|open| (open, index));
                }
            }
            _ => {}
        }
    }
    None
}

fn split_alternatives(body: &str) -> Vec<&str> {
    let mut alternatives = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, ch) in body.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                alternatives.push(&body[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    alternatives.push(&body[start..]);
    alternatives
}

fn join_pattern(root: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        return root.to_string();
    }
    match (root.ends_with('/'), suffix.starts_with('/')) {
        (true, true) => format!("{root}{}", &suffix[1..]),
        (false, false) => format!("{root}/{suffix}"),
        _ => format!("{root}{suffix}"),
    }
}

/// Dot-prefixed names, which wildcards never match.
fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Render a path with forward slashes for use as an exclusion key.
#[must_use]
pub fn normalize_separators(path: &Path) -> String {
    let rendered = path.to_string_lossy().replace('\\', "/");
    if rendered.len() > 1 {
        rendered.trim_end_matches('/').to_string()
    } else {
        rendered
    }
}

/// Paths skipped during expansion, together with everything beneath them.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    paths: HashSet<String>,
}

impl ExclusionSet {
    pub fn insert(&mut self, path: &Path) {
        self.paths.insert(normalize_separators(path));
    }

    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(&normalize_separators(path))
    }

    /// Returns `true` when `path` or one of its ancestors below `root` is excluded.
    #[must_use]
    pub fn covers(&self, path: &Path, root: &Path) -> bool {
        if self.paths.is_empty() {
            return false;
        }
        for ancestor in path.ancestors() {
            if self.contains(ancestor) {
                return true;
            }
            if ancestor == root {
                break;
            }
        }
        false
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// How a pattern should be expanded.
#[derive(Debug, Clone, Default)]
pub struct GlobOptions {
    /// Yield every file below a matched directory.
    pub recursive: bool,
    /// Yield matched directories themselves instead of their content.
    pub for_exclusion: bool,
    /// Report a missing prefix as [`Expansion::Missing`] instead of failing.
    pub ignore_errors: bool,
    pub excluded: ExclusionSet,
}

/// One filesystem entry produced by an expansion.
#[derive(Debug, Clone)]
pub struct GlobMatch {
    pub path: PathBuf,
    pub metadata: Metadata,
}

/// Result of expanding a pattern.
pub enum Expansion {
    Matches(GlobMatches),
    /// The literal prefix could not be located; carries the searched locations.
    Missing { searched: Vec<PathBuf> },
}

impl Expansion {
    /// Iterate the matches, yielding nothing for a missing prefix.
    pub fn into_matches(self) -> impl Iterator<Item = GlobMatch> {
        match self {
            Self::Matches(matches) => Some(matches),
            Self::Missing { .. } => None,
        }
        .into_iter()
        .flatten()
    }
}

/// Expands patterns relative to a current directory.
#[derive(Debug, Clone, Copy)]
pub struct GlobExpander<'a> {
    locator: &'a FileLocator,
    current_dir: Option<&'a Path>,
}

impl<'a> GlobExpander<'a> {
    #[must_use]
    pub fn new(locator: &'a FileLocator, current_dir: Option<&'a Path>) -> Self {
        Self {
            locator,
            current_dir,
        }
    }

    pub fn expand(&self, pattern: &str, options: GlobOptions) -> Result<Expansion> {
        let (prefix, suffix) = split_pattern(pattern);

        let root = match self.locator.locate(&prefix, self.current_dir) {
            Ok(root) => root,
            Err(LoadError::ResourceNotFound { searched, .. }) if options.ignore_errors => {
                debug!(pattern, prefix = %prefix, "glob prefix not found, skipping");
                return Ok(Expansion::Missing { searched });
            }
            Err(err) => return Err(err),
        };

        let escaped_root = Pattern::escape(&root.to_string_lossy());
        let patterns = expand_braces(&suffix)
            .into_iter()
            .map(|suffix| {
                let full = join_pattern(&escaped_root, &suffix);
                glob::glob_with(&full, MATCH_OPTIONS).map_err(|err| LoadError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: err.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Expansion::Matches(GlobMatches::new(root, patterns, options)))
    }
}

/// Lazy, single-pass sequence of entries matching an expanded pattern.
pub struct GlobMatches {
    root: PathBuf,
    pending: std::vec::IntoIter<Paths>,
    current: Option<Paths>,
    walk: Option<Walk>,
    recursive: bool,
    for_exclusion: bool,
    excluded: Arc<ExclusionSet>,
    seen: HashSet<PathBuf>,
}

impl GlobMatches {
    fn new(root: PathBuf, patterns: Vec<Paths>, options: GlobOptions) -> Self {
        Self {
            root,
            pending: patterns.into_iter(),
            current: None,
            walk: None,
            recursive: options.recursive,
            for_exclusion: options.for_exclusion,
            excluded: Arc::new(options.excluded),
            seen: HashSet::new(),
        }
    }

    /// The located directory the pattern was matched below.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn accept(&mut self, path: PathBuf) -> Option<GlobMatch> {
        if self.excluded.covers(&path, &self.root) {
            trace!(path = %path.display(), "excluded");
            return None;
        }

        let metadata = fs::metadata(&path).ok()?;
        if metadata.is_file() {
            return self.emit(path, metadata);
        }
        if !metadata.is_dir() {
            return None;
        }
        if self.for_exclusion {
            return self.emit(path, metadata);
        }
        if self.recursive {
            self.walk = Some(self.walker(&path));
        }
        None
    }

    fn walker(&self, dir: &Path) -> Walk {
        let excluded = Arc::clone(&self.excluded);
        let root = self.root.clone();
        WalkBuilder::new(dir)
            .standard_filters(false)
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                (entry.depth() == 0 || !is_hidden(entry.file_name()))
                    && !excluded.covers(entry.path(), &root)
            })
            .build()
    }

    fn emit(&mut self, path: PathBuf, metadata: Metadata) -> Option<GlobMatch> {
        if !self.seen.insert(path.clone()) {
            return None;
        }
        trace!(path = %path.display(), "glob match");
        Some(GlobMatch { path, metadata })
    }

    fn next_walked(&mut self) -> Option<Option<GlobMatch>> {
        let walk = self.walk.as_mut()?;
        let Some(entry) = walk.next() else {
            self.walk = None;
            return Some(None);
        };
        match entry {
            Ok(entry) => {
                let metadata = fs::metadata(entry.path()).ok();
                Some(
                    metadata
                        .filter(Metadata::is_file)
                        .and_then(|metadata| self.emit(entry.into_path(), metadata)),
                )
            }
            Err(err) => {
                debug!(error = %err, "skipping unreadable entry");
                Some(None)
            }
        }
    }

    fn next_globbed(&mut self) -> Option<Option<GlobMatch>> {
        if self.current.is_none() {
            self.current = Some(self.pending.next()?);
        }
        let paths = self.current.as_mut()?;
        match paths.next() {
            Some(Ok(path)) => Some(self.accept(path)),
            Some(Err(err)) => {
                debug!(error = %err, "skipping unreadable glob entry");
                Some(None)
            }
            None => {
                self.current = None;
                Some(None)
            }
        }
    }
}

impl Iterator for GlobMatches {
    type Item = GlobMatch;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let step = if self.walk.is_some() {
                self.next_walked()
            } else {
                self.next_globbed()
            };
            match step {
                Some(Some(found)) => return Some(found),
                Some(None) => continue,
                None => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::{TempDir, tempdir};

    use super::*;

    fn tree(files: &[&str]) -> TempDir {
        let dir = tempdir().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        dir
    }

    fn expand(dir: &TempDir, pattern: &str, options: GlobOptions) -> Vec<String> {
        let locator = FileLocator::new([dir.path()]);
        let expander = GlobExpander::new(&locator, None);
        expander
            .expand(pattern, options)
            .unwrap()
            .into_matches()
            .map(|found| {
                found
                    .path
                    .strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn detects_wildcards() {
        assert!(is_glob("sub/*.yml"));
        assert!(is_glob("a?.yml"));
        assert!(is_glob("{a,b}.yml"));
        assert!(is_glob("[ab].yml"));
        assert!(!is_glob("sub/a.yml"));
    }

    #[test]
    fn splits_literal_prefix_from_wildcard_suffix() {
        assert_eq!(split_pattern("sub/*.yml"), ("sub".into(), "/*.yml".into()));
        assert_eq!(split_pattern("a/b/c*/d.yml"), ("a/b".into(), "/c*/d.yml".into()));
        assert_eq!(split_pattern("*.yml"), (".".into(), "/*.yml".into()));
        assert_eq!(split_pattern("x*.yml"), (".".into(), "/x*.yml".into()));
        assert_eq!(split_pattern("/*.yml"), ("/".into(), "*.yml".into()));
        assert_eq!(split_pattern("sub/a.yml"), ("sub/a.yml".into(), String::new()));
    }

    #[test]
    fn directory_prefix_detection() {
        assert!(has_directory_prefix("sub/*.yml"));
        assert!(!has_directory_prefix("*.yml"));
        assert!(!has_directory_prefix("x*/a.yml"));
    }

    #[test]
    fn braces_expand_in_order_and_nest() {
        assert_eq!(expand_braces("/{a,b}.yml"), vec!["/a.yml", "/b.yml"]);
        assert_eq!(
            expand_braces("/{x,y{1,2}}/*.yml"),
            vec!["/x/*.yml", "/y1/*.yml", "/y2/*.yml"]
        );
        assert_eq!(expand_braces("/{a,b"), vec!["/{a,b"]);
    }

    #[test]
    fn non_recursive_expansion_yields_sorted_files_only() {
        let dir = tree(&["sub/b.yml", "sub/a.yml", "sub/nested/c.yml", "sub/.hidden.yml"]);
        let found = expand(&dir, "sub/*", GlobOptions::default());
        assert_eq!(found, vec!["sub/a.yml", "sub/b.yml"]);
    }

    #[test]
    fn recursive_expansion_descends_into_matched_directories() {
        let dir = tree(&["sub/a.yml", "sub/nested/c.yml", "sub/nested/deeper/d.yml"]);
        let found = expand(
            &dir,
            "sub/*",
            GlobOptions {
                recursive: true,
                ..GlobOptions::default()
            },
        );
        assert_eq!(
            found,
            vec!["sub/a.yml", "sub/nested/c.yml", "sub/nested/deeper/d.yml"]
        );
    }

    #[test]
    fn recursive_expansion_skips_hidden_entries() {
        let dir = tree(&[
            "sub/nested/c.yml",
            "sub/nested/.hidden.yml",
            "sub/nested/.cache/d.yml",
        ]);
        let found = expand(
            &dir,
            "sub/*",
            GlobOptions {
                recursive: true,
                ..GlobOptions::default()
            },
        );
        assert_eq!(found, vec!["sub/nested/c.yml"]);
    }

    #[test]
    fn exclusion_mode_yields_directories() {
        let dir = tree(&["sub/a.yml", "sub/skip/c.yml"]);
        let found = expand(
            &dir,
            "sub/*",
            GlobOptions {
                recursive: true,
                for_exclusion: true,
                ..GlobOptions::default()
            },
        );
        assert_eq!(found, vec!["sub/a.yml", "sub/skip"]);
    }

    #[test]
    fn excluded_paths_and_their_children_are_skipped() {
        let dir = tree(&["sub/a.yml", "sub/b.yml", "sub/skip/c.yml"]);
        let mut excluded = ExclusionSet::default();
        excluded.insert(&dir.path().join("sub/b.yml"));
        excluded.insert(&dir.path().join("sub/skip"));

        let found = expand(
            &dir,
            "sub/*",
            GlobOptions {
                recursive: true,
                excluded,
                ..GlobOptions::default()
            },
        );
        assert_eq!(found, vec!["sub/a.yml"]);
    }

    #[test]
    fn brace_alternatives_are_matched_without_duplicates() {
        let dir = tree(&["conf/a.yml", "conf/b.yaml", "conf/c.txt"]);
        let found = expand(&dir, "conf/*.{yml,yaml,yml}", GlobOptions::default());
        assert_eq!(found, vec!["conf/a.yml", "conf/b.yaml"]);
    }

    #[test]
    fn missing_prefix_fails_unless_errors_are_ignored() {
        let dir = tree(&[]);
        let locator = FileLocator::new([dir.path()]);
        let expander = GlobExpander::new(&locator, None);

        assert!(matches!(
            expander.expand("missing/*.yml", GlobOptions::default()),
            Err(LoadError::ResourceNotFound { .. })
        ));

        let expansion = expander
            .expand(
                "missing/*.yml",
                GlobOptions {
                    ignore_errors: true,
                    ..GlobOptions::default()
                },
            )
            .unwrap();
        match expansion {
            Expansion::Missing { searched } => {
                assert_eq!(searched, vec![dir.path().join("missing")]);
            }
            Expansion::Matches(_) => panic!("expected a missing prefix"),
        }
    }

    #[test]
    fn current_directory_anchors_relative_patterns() {
        let dir = tree(&["nested/x.yml"]);
        let locator = FileLocator::default();
        let nested = dir.path().join("nested");
        let expander = GlobExpander::new(&locator, Some(&nested));

        let found: Vec<PathBuf> = expander
            .expand("*.yml", GlobOptions::default())
            .unwrap()
            .into_matches()
            .map(|found| found.path)
            .collect();
        assert_eq!(found, vec![nested.join("x.yml")]);
    }

    #[test]
    fn separators_are_normalized_for_exclusion_keys() {
        assert_eq!(normalize_separators(Path::new("a\\b\\c")), "a/b/c");
        assert_eq!(normalize_separators(Path::new("/a/b/")), "/a/b");
        assert_eq!(normalize_separators(Path::new("/")), "/");
    }
}

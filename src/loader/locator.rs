use std::path::{Component, Path, PathBuf};

use crate::error::{LoadError, Result};

/// Resolves resource names against a list of base directories.
///
/// When a current directory is supplied it is searched before the configured
/// base directories. Both files and directories count as a match, so the same
/// locator serves literal imports and glob prefixes.
#[derive(Debug, Clone, Default)]
pub struct FileLocator {
    paths: Vec<PathBuf>,
}

impl FileLocator {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Return the first existing location of `name`.
    pub fn locate(&self, name: &str, current_dir: Option<&Path>) -> Result<PathBuf> {
        let mut found = self.search(name, current_dir, true)?;
        Ok(found.remove(0))
    }

    /// Return every existing location of `name`, in search order.
    pub fn locate_all(&self, name: &str, current_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
        self.search(name, current_dir, false)
    }

    fn search(&self, name: &str, current_dir: Option<&Path>, first: bool) -> Result<Vec<PathBuf>> {
        if name.is_empty() {
            return Err(LoadError::ResourceNotFound {
                resource: String::new(),
                searched: Vec::new(),
            });
        }

        let candidate = Path::new(name);
        if candidate.is_absolute() {
            let path = normalize(candidate);
            if path.exists() {
                return Ok(vec![path]);
            }
            return Err(LoadError::ResourceNotFound {
                resource: name.to_string(),
                searched: vec![path],
            });
        }

        let mut found = Vec::new();
        let mut searched = Vec::new();
        for dir in self.search_dirs(current_dir) {
            let path = normalize(&dir.join(candidate));
            if path.exists() {
                if first {
                    return Ok(vec![path]);
                }
                found.push(path);
            } else {
                searched.push(path);
            }
        }

        if found.is_empty() {
            return Err(LoadError::ResourceNotFound {
                resource: name.to_string(),
                searched,
            });
        }

        Ok(found)
    }

    fn search_dirs<'a>(&'a self, current_dir: Option<&'a Path>) -> Vec<&'a Path> {
        let mut dirs: Vec<&Path> = Vec::with_capacity(self.paths.len() + 1);
        for dir in current_dir
            .into_iter()
            .chain(self.paths.iter().map(PathBuf::as_path))
        {
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs
    }
}

/// Drop `.` components so that joined paths stay readable and comparable.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn first_match_wins_and_current_dir_is_searched_first() {
        let base = tempdir().unwrap();
        let current = tempdir().unwrap();
        fs::write(base.path().join("jobs.yml"), "").unwrap();
        fs::write(current.path().join("jobs.yml"), "").unwrap();

        let locator = FileLocator::new([base.path()]);

        assert_eq!(
            locator.locate("jobs.yml", None).unwrap(),
            base.path().join("jobs.yml")
        );
        assert_eq!(
            locator.locate("jobs.yml", Some(current.path())).unwrap(),
            current.path().join("jobs.yml")
        );
    }

    #[test]
    fn locate_all_collects_every_match() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        let empty = tempdir().unwrap();
        fs::write(first.path().join("a.yml"), "").unwrap();
        fs::write(second.path().join("a.yml"), "").unwrap();

        let locator = FileLocator::new([first.path(), empty.path(), second.path()]);
        let found = locator.locate_all("a.yml", None).unwrap();

        assert_eq!(
            found,
            vec![first.path().join("a.yml"), second.path().join("a.yml")]
        );
    }

    #[test]
    fn missing_resource_reports_searched_locations() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        let locator = FileLocator::new([first.path(), second.path()]);

        let err = locator.locate("nope.yml", None).unwrap_err();
        match err {
            LoadError::ResourceNotFound { resource, searched } => {
                assert_eq!(resource, "nope.yml");
                assert_eq!(
                    searched,
                    vec![first.path().join("nope.yml"), second.path().join("nope.yml")]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn absolute_paths_bypass_base_directories() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("abs.yml");
        fs::write(&file, "").unwrap();
        let locator = FileLocator::new(Vec::<PathBuf>::new());

        assert_eq!(
            locator.locate(file.to_str().unwrap(), None).unwrap(),
            file
        );
        assert!(locator
            .locate(dir.path().join("other.yml").to_str().unwrap(), None)
            .is_err());
    }

    #[test]
    fn directories_are_located_and_dot_is_normalized() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let locator = FileLocator::new([dir.path()]);

        assert_eq!(locator.locate("sub", None).unwrap(), dir.path().join("sub"));
        assert_eq!(locator.locate(".", None).unwrap(), dir.path().to_path_buf());
    }

    #[test]
    fn empty_names_are_rejected() {
        let locator = FileLocator::new([std::env::temp_dir()]);
        assert!(matches!(
            locator.locate("", None),
            Err(LoadError::ResourceNotFound { .. })
        ));
    }
}

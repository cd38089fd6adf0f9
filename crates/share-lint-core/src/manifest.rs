//! Nearest-manifest lookup with ancestor memoization.
//!
//! Every source file belongs to the package whose `package.json` is the
//! closest one found walking up from the file's directory. Sibling files
//! share ancestors, so every directory visited during a search is bound to
//! the search result and later lookups from any of them take a single step.

use dashmap::DashMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Default manifest file name.
pub const DEFAULT_MANIFEST: &str = "package.json";

/// Errors raised while loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest (or the working directory) could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The manifest exists but is not valid.
    #[error("invalid manifest {path}: {source}")]
    Parse {
        /// Path of the malformed manifest.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// A parsed package manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Absolute path of the manifest file.
    #[serde(skip)]
    pub located_path: PathBuf,

    /// Package name, if declared.
    #[serde(default)]
    pub name: Option<String>,

    /// Runtime dependencies, in declaration order.
    #[serde(default)]
    pub dependencies: Option<Map<String, Value>>,

    /// Every other manifest field, kept as-is.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Manifest {
    /// Parses manifest JSON.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if `content` is not a valid manifest.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Returns true if `package` is a key of the `dependencies` map.
    #[must_use]
    pub fn has_dependency(&self, package: &str) -> bool {
        self.dependencies
            .as_ref()
            .is_some_and(|deps| deps.contains_key(package))
    }

    /// Iterates declared dependency names in declaration order.
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .iter()
            .flat_map(|deps| deps.keys().map(String::as_str))
    }

    /// Name to show in messages: the package name, or the manifest path.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.located_path.display().to_string())
    }
}

/// Filesystem access used by [`ManifestLocator`].
pub trait ManifestFs: Send + Sync {
    /// Returns true if `path` is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Reads a file to a string.
    ///
    /// # Errors
    ///
    /// Returns the IO error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;
}

/// [`ManifestFs`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl ManifestFs for OsFs {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Locates and caches the nearest manifest for source files.
pub struct ManifestLocator {
    file_name: String,
    fs: Box<dyn ManifestFs>,
    cache: DashMap<PathBuf, Option<Arc<Manifest>>>,
    cache_missing: bool,
}

impl std::fmt::Debug for ManifestLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestLocator")
            .field("file_name", &self.file_name)
            .field("cached_dirs", &self.cache.len())
            .field("cache_missing", &self.cache_missing)
            .finish_non_exhaustive()
    }
}

impl Default for ManifestLocator {
    fn default() -> Self {
        Self::new(DEFAULT_MANIFEST)
    }
}

impl ManifestLocator {
    /// Creates a locator looking for `file_name` on the real filesystem.
    #[must_use]
    pub fn new(file_name: impl Into<String>) -> Self {
        Self::with_fs(file_name, OsFs)
    }

    /// Creates a locator over a custom filesystem.
    #[must_use]
    pub fn with_fs(file_name: impl Into<String>, fs: impl ManifestFs + 'static) -> Self {
        Self {
            file_name: file_name.into(),
            fs: Box::new(fs),
            cache: DashMap::new(),
            cache_missing: true,
        }
    }

    /// Sets whether directory chains without any manifest are cached too
    /// (default: true). When disabled, such chains are walked again on every
    /// lookup, so manifests created mid-run are picked up.
    #[must_use]
    pub fn cache_missing(mut self, enabled: bool) -> Self {
        self.cache_missing = enabled;
        self
    }

    /// Returns the manifest file name searched for.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Number of directories currently bound in the cache.
    #[must_use]
    pub fn cached_dirs(&self) -> usize {
        self.cache.len()
    }

    /// Finds the manifest closest to `start`, searching from its containing
    /// directory up to the filesystem root.
    ///
    /// Returns `Ok(None)` when no manifest exists on the way up.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Parse`] if the nearest manifest is malformed and
    /// [`ManifestError::Io`] if it cannot be read. Nothing is cached in that
    /// case.
    pub fn locate(&self, start: &Path) -> Result<Option<Arc<Manifest>>, ManifestError> {
        let start = absolutize(start)?;
        let Some(mut dir) = start.parent().map(Path::to_path_buf) else {
            return Ok(None);
        };

        let mut visited: Vec<PathBuf> = Vec::new();

        let found = loop {
            if let Some(hit) = self.cached(&dir) {
                debug!("Manifest cache hit for {}", dir.display());
                break hit;
            }

            let candidate = dir.join(&self.file_name);
            visited.push(dir);

            if self.fs.is_file(&candidate) {
                break Some(Arc::new(self.load(candidate)?));
            }

            match visited.last().and_then(|d| d.parent()) {
                Some(parent) => dir = parent.to_path_buf(),
                None => break None,
            }
        };

        if found.is_some() || self.cache_missing {
            for dir in visited {
                self.cache.insert(dir, found.clone());
            }
        }

        Ok(found)
    }

    fn cached(&self, dir: &Path) -> Option<Option<Arc<Manifest>>> {
        self.cache.get(dir).map(|entry| entry.value().clone())
    }

    fn load(&self, path: PathBuf) -> Result<Manifest, ManifestError> {
        debug!("Reading manifest {}", path.display());
        let content = self
            .fs
            .read_to_string(&path)
            .map_err(|source| ManifestError::Io {
                path: path.clone(),
                source,
            })?;
        let mut manifest = Manifest::parse(&content).map_err(|source| ManifestError::Parse {
            path: path.clone(),
            source,
        })?;
        manifest.located_path = path;
        Ok(manifest)
    }
}

/// Makes `path` absolute and lexically resolves `.` and `..` components.
fn absolutize(path: &Path) -> Result<PathBuf, ManifestError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|source| ManifestError::Io {
            path: PathBuf::from("."),
            source,
        })?;
        cwd.join(path)
    };
    Ok(normalize(&joined))
}

/// Lexically resolves `.` and `..` components without touching the
/// filesystem.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

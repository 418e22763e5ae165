//! Resource lookup across an ordered search path.
//!
//! A [`SearchPath`] resolves symbolic locations such as
//! `"modlet/providers/ModletProvider"` against a list of root directories,
//! the way a classpath resolves resource names against its entries.

use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A resource found on the search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// The symbolic location the resource was found under.
    pub location: String,
    /// Absolute path of the backing file.
    pub path: PathBuf,
}

impl Resource {
    pub fn read_to_string(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))
    }
}

/// Enumerates resources matching a symbolic location, plus the single
/// platform-override file.
pub trait ResourceLocator: Send + Sync {
    /// All resources matching `location`, in search-path order.
    ///
    /// Absence of any match is not an error and yields an empty sequence.
    /// Enumeration order within one root is stable for a single run but not
    /// guaranteed across runs.
    fn find_resources(&self, location: &str) -> Result<Vec<Resource>>;

    /// The platform-override file, if one is configured and present.
    ///
    /// A configured file that exists but cannot be opened is a fatal error.
    fn find_platform_overrides(&self) -> Result<Option<Resource>>;
}

/// The standard locator: an ordered list of root directories plus an
/// optional platform-override file path.
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    roots: Vec<PathBuf>,
    platform_overrides: Option<PathBuf>,
}

impl SearchPath {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            platform_overrides: None,
        }
    }

    pub fn with_platform_overrides(mut self, path: impl Into<PathBuf>) -> Self {
        self.platform_overrides = Some(path.into());
        self
    }

    pub fn push_root(&mut self, root: impl Into<PathBuf>) {
        self.roots.push(root.into());
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn collect_from_root(&self, root: &Path, location: &str, out: &mut Vec<Resource>) -> Result<()> {
        let candidate = root.join(location);
        if candidate.is_file() {
            out.push(Resource {
                location: location.to_string(),
                path: candidate,
            });
        } else if candidate.is_dir() {
            let entries = fs::read_dir(&candidate).map_err(|e| Error::io(&candidate, e))?;
            let mut files: Vec<PathBuf> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_file())
                .collect();
            // Directory enumeration order is substrate-defined; sort by file
            // name so one run stays deterministic.
            files.sort();
            for path in files {
                out.push(Resource {
                    location: location.to_string(),
                    path,
                });
            }
        }
        Ok(())
    }
}

impl ResourceLocator for SearchPath {
    fn find_resources(&self, location: &str) -> Result<Vec<Resource>> {
        let mut resources = Vec::new();
        for root in &self.roots {
            self.collect_from_root(root, location, &mut resources)?;
        }
        tracing::debug!(location, count = resources.len(), "resolved resources");
        Ok(resources)
    }

    fn find_platform_overrides(&self) -> Result<Option<Resource>> {
        let Some(path) = &self.platform_overrides else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        // Opening up-front surfaces unreadable override files as a fatal
        // error instead of silently skipping deployment configuration.
        fs::File::open(path).map_err(|e| Error::io(path, e))?;
        Ok(Some(Resource {
            location: path.display().to_string(),
            path: path.clone(),
        }))
    }
}

//! Temporary search-root fixture.

use modlet_discovery::SearchPath;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory laid out like one modlet search root, with the
/// default locations (`modlet/`, `modlet/providers/`,
/// `modlet/transforms/`) and an optional platform override file.
pub struct Workspace {
    temp: TempDir,
    platform_overrides: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("create workspace tempdir");
        let platform_overrides = temp.path().join("overrides.properties");
        Self {
            temp,
            platform_overrides,
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Write an arbitrary file relative to the root.
    pub fn write_file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.temp.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, content).expect("write file");
        path
    }

    /// Write a provider-list resource for a capability type, one
    /// implementation name per line.
    pub fn write_provider_list(&self, capability: &str, names: &[&str]) -> PathBuf {
        let mut content = names.join("\n");
        content.push('\n');
        self.write_file(&format!("modlet/providers/{capability}"), &content)
    }

    /// Write a modlet document under the default document location.
    pub fn write_document(&self, file_name: &str, content: &str) -> PathBuf {
        self.write_file(&format!("modlet/{file_name}"), content)
    }

    /// Write a transformation program under the default transform
    /// location.
    pub fn write_transform(&self, file_name: &str, content: &str) -> PathBuf {
        self.write_file(&format!("modlet/transforms/{file_name}"), content)
    }

    /// Write the platform override file.
    pub fn write_overrides(&self, content: &str) -> PathBuf {
        fs::write(&self.platform_overrides, content).expect("write overrides");
        self.platform_overrides.clone()
    }

    /// A search path over this workspace's root, wired to its platform
    /// override file.
    pub fn search_path(&self) -> SearchPath {
        SearchPath::new(vec![self.temp.path().to_path_buf()])
            .with_platform_overrides(&self.platform_overrides)
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

//! Resource search paths
//!
//! A search path answers "find all resources with this logical name". Results
//! are ordered: earlier roots and layers come first, and callers rely on that
//! order when merging values.

use crate::{Error, Resource, Result};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Locate resources by logical name and open them as lines.
pub trait ResourceSearchPath: Send + Sync {
    /// All resources with the given logical name, in search order.
    fn find(&self, name: &str) -> Result<Vec<Resource>>;

    /// Raw lines of a resource previously returned by [`find`](Self::find).
    fn open(&self, resource: &Resource) -> Result<Vec<String>> {
        resource.read_lines()
    }
}

/// Check that a logical resource name is a relative path without traversal.
pub fn validate_resource_name(name: &str) -> Result<()> {
    let path = Path::new(name);
    let valid = !name.trim().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidName {
            name: name.to_string(),
        })
    }
}

/// Searches a list of directories, like a class path.
#[derive(Debug, Clone, Default)]
pub struct DirectorySearchPath {
    roots: Vec<PathBuf>,
}

impl DirectorySearchPath {
    /// Create a search path over the given roots, searched in order.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Search the current working directory, then the user config directory
    /// (`<config_dir>/kernel`).
    pub fn discover() -> Self {
        let mut roots = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            roots.push(cwd);
        }
        if let Some(config) = dirs::config_dir() {
            roots.push(config.join("kernel"));
        }
        Self { roots }
    }

    /// Append a root to the end of the search order.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// The configured roots.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl ResourceSearchPath for DirectorySearchPath {
    fn find(&self, name: &str) -> Result<Vec<Resource>> {
        validate_resource_name(name)?;
        let mut found: Vec<Resource> = Vec::new();
        for root in &self.roots {
            let candidate = root.join(name);
            if !candidate.is_file() {
                continue;
            }
            let path = dunce::canonicalize(&candidate).unwrap_or(candidate);
            let resource = Resource::file(path);
            if !found.contains(&resource) {
                tracing::trace!(name, location = resource.location(), "Found resource");
                found.push(resource);
            }
        }
        Ok(found)
    }
}

/// In-memory resources, useful for bundled defaults and tests.
#[derive(Debug, Clone, Default)]
pub struct InlineResources {
    entries: Vec<(String, Resource)>,
}

impl InlineResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource under a logical name. The same name may be added more
    /// than once; all entries are returned in insertion order.
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<Arc<str>>) {
        let name = name.into();
        let location = format!("inline/{}#{}", name, self.entries.len());
        self.entries
            .push((name, Resource::inline(location, content)));
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        self.insert(name, content);
        self
    }

    /// Add a resource with an explicit location label.
    pub fn with_located(
        mut self,
        name: impl Into<String>,
        location: impl Into<String>,
        content: impl Into<Arc<str>>,
    ) -> Self {
        self.entries
            .push((name.into(), Resource::inline(location, content)));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceSearchPath for InlineResources {
    fn find(&self, name: &str) -> Result<Vec<Resource>> {
        validate_resource_name(name)?;
        Ok(self
            .entries
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, r)| r.clone())
            .collect())
    }
}

/// Concatenates several search paths, earlier layers first.
#[derive(Clone, Default)]
pub struct LayeredSearchPath {
    layers: Vec<Arc<dyn ResourceSearchPath>>,
}

impl LayeredSearchPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer after the existing ones.
    pub fn with_layer(mut self, layer: Arc<dyn ResourceSearchPath>) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl fmt::Debug for LayeredSearchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayeredSearchPath")
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl ResourceSearchPath for LayeredSearchPath {
    fn find(&self, name: &str) -> Result<Vec<Resource>> {
        let mut found = Vec::new();
        for layer in &self.layers {
            for resource in layer.find(name)? {
                if !found.contains(&resource) {
                    found.push(resource);
                }
            }
        }
        Ok(found)
    }
}
